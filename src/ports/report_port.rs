//! Report writing port trait.

use std::path::Path;

use crate::domain::error::FoliotrackError;
use crate::domain::report::InvestorReport;

/// Port for persisting investor reports.
pub trait ReportPort {
    fn write(&self, report: &InvestorReport, output_path: &Path) -> Result<(), FoliotrackError>;
}

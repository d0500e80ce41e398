//! Data ingestion port trait.

use std::path::Path;

use crate::domain::asset::Asset;
use crate::domain::batch::{SkippedRow, TransactionRow};
use crate::domain::error::FoliotrackError;
use crate::domain::investor::Investor;

/// Result of loading one feed: the rows that parsed, plus a tally of the
/// ones that didn't. A malformed row is never fatal to the load.
#[derive(Debug, Clone)]
pub struct LoadOutcome<T> {
    pub items: Vec<T>,
    pub skipped: Vec<SkippedRow>,
}

impl<T> Default for LoadOutcome<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            skipped: Vec::new(),
        }
    }
}

impl<T> LoadOutcome<T> {
    pub fn skip(&mut self, index: usize, reason: impl Into<String>) {
        self.skipped.push(SkippedRow {
            index,
            reason: reason.into(),
        });
    }
}

pub trait DataPort {
    /// Load every asset feed the source knows about.
    fn load_assets(&self) -> Result<LoadOutcome<Asset>, FoliotrackError>;

    fn load_investors(&self) -> Result<LoadOutcome<Investor>, FoliotrackError>;

    fn load_transactions(&self, path: &Path) -> Result<LoadOutcome<TransactionRow>, FoliotrackError>;
}

//! JSON report adapter.

use std::fs;
use std::path::Path;

use crate::domain::error::FoliotrackError;
use crate::domain::report::InvestorReport;
use crate::ports::report_port::ReportPort;

pub struct JsonReportAdapter;

impl ReportPort for JsonReportAdapter {
    fn write(&self, report: &InvestorReport, output_path: &Path) -> Result<(), FoliotrackError> {
        let rendered =
            serde_json::to_string_pretty(report).map_err(|e| FoliotrackError::Report {
                reason: e.to_string(),
            })?;
        fs::write(output_path, rendered)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::Asset;
    use crate::domain::catalog::AssetCatalog;
    use crate::domain::investor::{Address, Investor, RiskProfile};
    use crate::domain::report::build_report;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    #[test]
    fn writes_parseable_json_with_expected_shape() {
        let mut catalog = AssetCatalog::new();
        let asset = Asset::crypto("Bitcoin", "BTC", dec!(100), false, "PoW", None, dec!(5)).unwrap();
        let mut investor = Investor::individual(
            "Ana",
            "123456789",
            NaiveDate::from_ymd_opt(1993, 12, 1).unwrap(),
            "",
            Address {
                street: "Rua F".into(),
                number: "11".into(),
                district: "Oeste".into(),
                postal_code: "44444-444".into(),
                city: "Manaus".into(),
                state: "AM".into(),
            },
            dec!(80_000),
            RiskProfile::Aggressive,
        )
        .unwrap();
        investor.buy(&asset, dec!(2), dec!(90)).unwrap();
        catalog.insert(asset).unwrap();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");
        JsonReportAdapter
            .write(&build_report(&investor, &catalog), &path)
            .unwrap();

        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();

        assert_eq!(parsed["identifier"], "123456789");
        assert_eq!(parsed["name"], "Ana");
        assert_eq!(parsed["positions"][0]["ticker"], "BTC");
        assert_eq!(parsed["positions"][0]["quantity"], 2.0);
        assert_eq!(parsed["positions"][0]["cost_basis"], 900.0);
        assert_eq!(parsed["positions"][0]["current_value"], 1000.0);
        assert_eq!(parsed["total_value"], 1000.0);
        assert_eq!(parsed["allocation"]["foreign_pct"], 100.0);
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let catalog = AssetCatalog::new();
        let investor = Investor::institutional(
            "Fund Co",
            "12345678000100",
            NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            "",
            Address {
                street: "Av G".into(),
                number: "1".into(),
                district: "Centro".into(),
                postal_code: "55555-555".into(),
                city: "Brasilia".into(),
                state: "DF".into(),
            },
            dec!(0),
            "Fund Co SA",
        )
        .unwrap();

        let result = JsonReportAdapter.write(
            &build_report(&investor, &catalog),
            Path::new("/no/such/dir/report.json"),
        );
        assert!(matches!(result, Err(FoliotrackError::Io(_))));
    }
}

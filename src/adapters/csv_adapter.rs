//! CSV file data adapter.
//!
//! Reads one file per asset variant plus the investor roster and transaction
//! feeds from a data directory. Each file has a header row. Malformed rows
//! are skipped and tallied; only an unreadable file is an error.
//!
//! File layouts:
//! - `equities.csv`        ticker,name,price,qualified
//! - `treasuries.csv`      ticker,name,price,yield_kind,maturity (dd/mm/yyyy)
//! - `funds.csv`           ticker,name,segment,price,last_dividend,admin_fee_pct
//! - `foreign_stocks.csv`  ticker,name,price,qualified,exchange,sector,conversion_rate
//! - `crypto.csv`          ticker,name,price,qualified,algorithm,max_supply,conversion_rate
//! - `investors.csv`       kind,name,identifier,birth_date,phone,street,number,
//!                         district,postal_code,city,state,net_worth,profile_or_legal_name
//! - transactions          kind,ticker,quantity,price (price empty = at market)

use chrono::NaiveDate;
use csv::StringRecord;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};

use crate::domain::asset::{Asset, YieldKind};
use crate::domain::batch::{TradeKind, TransactionRow};
use crate::domain::error::FoliotrackError;
use crate::domain::investor::{Address, Investor, RiskProfile};
use crate::ports::data_port::{DataPort, LoadOutcome};

pub struct CsvDataAdapter {
    data_dir: PathBuf,
}

fn csv_error(path: &Path, reason: impl std::fmt::Display) -> FoliotrackError {
    FoliotrackError::CsvParse {
        file: path.display().to_string(),
        reason: reason.to_string(),
    }
}

fn field<'r>(record: &'r StringRecord, index: usize, name: &str) -> Result<&'r str, String> {
    record
        .get(index)
        .map(str::trim)
        .ok_or_else(|| format!("missing {name} column"))
}

/// Decimal parse tolerating comma decimal separators and `-` placeholders,
/// which the upstream exports use for "no value".
fn parse_decimal(raw: &str, name: &str) -> Result<Decimal, String> {
    let cleaned = raw.trim().replace(',', ".");
    if cleaned.is_empty() || cleaned == "-" {
        return Ok(Decimal::ZERO);
    }
    cleaned
        .parse()
        .map_err(|e| format!("invalid {name} value {raw:?}: {e}"))
}

fn parse_flag(raw: &str, name: &str) -> Result<bool, String> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" | "" => Ok(false),
        other => Err(format!("invalid {name} flag {other:?}")),
    }
}

fn parse_yield_kind(raw: &str) -> Result<YieldKind, String> {
    match raw.trim().to_uppercase().as_str() {
        "FLOATING" => Ok(YieldKind::FloatingRate),
        "PREFIXED" => Ok(YieldKind::Prefixed),
        "INFLATION" => Ok(YieldKind::InflationLinked),
        other => Err(format!("invalid yield kind {other:?}")),
    }
}

fn parse_risk_profile(raw: &str) -> Result<RiskProfile, String> {
    match raw.trim().to_uppercase().as_str() {
        "CONSERVATIVE" => Ok(RiskProfile::Conservative),
        "MODERATE" => Ok(RiskProfile::Moderate),
        "AGGRESSIVE" => Ok(RiskProfile::Aggressive),
        other => Err(format!("invalid risk profile {other:?}")),
    }
}

impl CsvDataAdapter {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    fn read_rows(&self, path: &Path) -> Result<Vec<StringRecord>, FoliotrackError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| csv_error(path, e))?;
        let mut rows = Vec::new();
        for result in reader.records() {
            rows.push(result.map_err(|e| csv_error(path, e))?);
        }
        Ok(rows)
    }

    fn load_file<F>(
        &self,
        file_name: &str,
        outcome: &mut LoadOutcome<Asset>,
        parse: F,
    ) -> Result<(), FoliotrackError>
    where
        F: Fn(&StringRecord) -> Result<Asset, String>,
    {
        let path = self.data_dir.join(file_name);
        for (index, record) in self.read_rows(&path)?.iter().enumerate() {
            match parse(record) {
                Ok(asset) => outcome.items.push(asset),
                Err(reason) => outcome.skip(index, format!("{file_name}: {reason}")),
            }
        }
        Ok(())
    }
}

fn parse_equity(record: &StringRecord) -> Result<Asset, String> {
    let ticker = field(record, 0, "ticker")?;
    let name = field(record, 1, "name")?;
    let price = parse_decimal(field(record, 2, "price")?, "price")?;
    let qualified = parse_flag(field(record, 3, "qualified")?, "qualified")?;
    Asset::equity(name, ticker, price, qualified).map_err(|e| e.to_string())
}

fn parse_treasury(record: &StringRecord) -> Result<Asset, String> {
    let ticker = field(record, 0, "ticker")?;
    let name = field(record, 1, "name")?;
    let price = parse_decimal(field(record, 2, "price")?, "price")?;
    let yield_kind = parse_yield_kind(field(record, 3, "yield kind")?)?;
    let raw_maturity = field(record, 4, "maturity")?;
    let maturity = NaiveDate::parse_from_str(raw_maturity, "%d/%m/%Y")
        .map_err(|e| format!("invalid maturity {raw_maturity:?}: {e}"))?;
    // Treasuries are never qualified-restricted in the upstream feed.
    Asset::fixed_income(name, ticker, price, false, yield_kind, maturity).map_err(|e| e.to_string())
}

fn parse_fund(record: &StringRecord) -> Result<Asset, String> {
    let ticker = field(record, 0, "ticker")?;
    let name = field(record, 1, "name")?;
    let segment = field(record, 2, "segment")?;
    let price = parse_decimal(field(record, 3, "price")?, "price")?;
    let dividend = parse_decimal(field(record, 4, "last dividend")?, "last dividend")?;
    let fee = parse_decimal(field(record, 5, "admin fee")?, "admin fee")?;
    Asset::real_estate_fund(name, ticker, price, false, segment, dividend, fee)
        .map_err(|e| e.to_string())
}

fn parse_foreign_stock(record: &StringRecord) -> Result<Asset, String> {
    let ticker = field(record, 0, "ticker")?;
    let name = field(record, 1, "name")?;
    let price = parse_decimal(field(record, 2, "price")?, "price")?;
    let qualified = parse_flag(field(record, 3, "qualified")?, "qualified")?;
    let exchange = field(record, 4, "exchange")?;
    let sector = field(record, 5, "sector")?;
    let rate = parse_decimal(field(record, 6, "conversion rate")?, "conversion rate")?;
    Asset::foreign_equity(name, ticker, price, qualified, exchange, sector, rate)
        .map_err(|e| e.to_string())
}

fn parse_crypto(record: &StringRecord) -> Result<Asset, String> {
    let ticker = field(record, 0, "ticker")?;
    let name = field(record, 1, "name")?;
    let price = parse_decimal(field(record, 2, "price")?, "price")?;
    let qualified = parse_flag(field(record, 3, "qualified")?, "qualified")?;
    let algorithm = field(record, 4, "algorithm")?;
    let raw_supply = field(record, 5, "max supply")?;
    let max_supply = if raw_supply.is_empty() || raw_supply == "-" {
        None
    } else {
        Some(parse_decimal(raw_supply, "max supply")?)
    };
    let rate = parse_decimal(field(record, 6, "conversion rate")?, "conversion rate")?;
    Asset::crypto(name, ticker, price, qualified, algorithm, max_supply, rate)
        .map_err(|e| e.to_string())
}

fn parse_investor(record: &StringRecord) -> Result<Investor, String> {
    let kind = field(record, 0, "kind")?.to_uppercase();
    let name = field(record, 1, "name")?;
    let identifier = field(record, 2, "identifier")?;
    let raw_birth = field(record, 3, "birth date")?;
    let birth_date = NaiveDate::parse_from_str(raw_birth, "%Y-%m-%d")
        .map_err(|e| format!("invalid birth date {raw_birth:?}: {e}"))?;
    let phone = field(record, 4, "phone")?;
    let address = Address {
        street: field(record, 5, "street")?.to_string(),
        number: field(record, 6, "number")?.to_string(),
        district: field(record, 7, "district")?.to_string(),
        postal_code: field(record, 8, "postal code")?.to_string(),
        city: field(record, 9, "city")?.to_string(),
        state: field(record, 10, "state")?.to_string(),
    };
    let net_worth = parse_decimal(field(record, 11, "net worth")?, "net worth")?;
    let extra = field(record, 12, "profile or legal name")?;

    let investor = match kind.as_str() {
        "INDIVIDUAL" => Investor::individual(
            name,
            identifier,
            birth_date,
            phone,
            address,
            net_worth,
            parse_risk_profile(extra)?,
        ),
        "INSTITUTIONAL" => {
            Investor::institutional(name, identifier, birth_date, phone, address, net_worth, extra)
        }
        other => return Err(format!("invalid investor kind {other:?}")),
    };
    investor.map_err(|e| e.to_string())
}

fn parse_transaction(record: &StringRecord) -> Result<TransactionRow, String> {
    let kind = match field(record, 0, "kind")?.to_uppercase().as_str() {
        "BUY" => TradeKind::Buy,
        "SELL" => TradeKind::Sell,
        other => return Err(format!("invalid transaction kind {other:?}")),
    };
    let ticker = field(record, 1, "ticker")?;
    if ticker.is_empty() {
        return Err("ticker must not be empty".to_string());
    }
    let quantity = parse_decimal(field(record, 2, "quantity")?, "quantity")?;
    let raw_price = record.get(3).map(str::trim).unwrap_or("");
    let execution_price = if raw_price.is_empty() {
        None
    } else {
        Some(parse_decimal(raw_price, "price")?)
    };

    Ok(TransactionRow {
        kind,
        ticker: ticker.to_string(),
        quantity,
        execution_price,
    })
}

impl DataPort for CsvDataAdapter {
    fn load_assets(&self) -> Result<LoadOutcome<Asset>, FoliotrackError> {
        let mut outcome = LoadOutcome::default();
        self.load_file("equities.csv", &mut outcome, parse_equity)?;
        self.load_file("treasuries.csv", &mut outcome, parse_treasury)?;
        self.load_file("funds.csv", &mut outcome, parse_fund)?;
        self.load_file("foreign_stocks.csv", &mut outcome, parse_foreign_stock)?;
        self.load_file("crypto.csv", &mut outcome, parse_crypto)?;
        Ok(outcome)
    }

    fn load_investors(&self) -> Result<LoadOutcome<Investor>, FoliotrackError> {
        let path = self.data_dir.join("investors.csv");
        let mut outcome = LoadOutcome::default();
        for (index, record) in self.read_rows(&path)?.iter().enumerate() {
            match parse_investor(record) {
                Ok(investor) => outcome.items.push(investor),
                Err(reason) => outcome.skip(index, format!("investors.csv: {reason}")),
            }
        }
        Ok(outcome)
    }

    fn load_transactions(
        &self,
        path: &Path,
    ) -> Result<LoadOutcome<TransactionRow>, FoliotrackError> {
        let mut outcome = LoadOutcome::default();
        for (index, record) in self.read_rows(path)?.iter().enumerate() {
            match parse_transaction(record) {
                Ok(row) => outcome.items.push(row),
                Err(reason) => outcome.skip(index, reason),
            }
        }
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::{AssetKind, AssetDetail};
    use rust_decimal_macros::dec;
    use std::fs;
    use tempfile::TempDir;

    fn write_all_asset_files(dir: &Path) {
        fs::write(
            dir.join("equities.csv"),
            "ticker,name,price,qualified\n\
             VALE3,Vale,61.50,0\n\
             PETR4,Petrobras,38.20,0\n\
             BAD!!,Broken,10.00,0\n",
        )
        .unwrap();
        fs::write(
            dir.join("treasuries.csv"),
            "ticker,name,price,yield_kind,maturity\n\
             T2031,Treasury 2031,102.55,FLOATING,01/03/2031\n\
             T2035,Treasury 2035,95.10,INFLATION,15/05/2035\n",
        )
        .unwrap();
        fs::write(
            dir.join("funds.csv"),
            "ticker,name,segment,price,last_dividend,admin_fee_pct\n\
             HGLG11,CSHG Logistica,Logistics,160.00,\"1,10\",-\n",
        )
        .unwrap();
        fs::write(
            dir.join("foreign_stocks.csv"),
            "ticker,name,price,qualified,exchange,sector,conversion_rate\n\
             AAPL,Apple,210.00,0,NASDAQ,Technology,5.00\n",
        )
        .unwrap();
        fs::write(
            dir.join("crypto.csv"),
            "ticker,name,price,qualified,algorithm,max_supply,conversion_rate\n\
             BTC,Bitcoin,65000.00,1,PoW,21000000,5.00\n\
             ETH,Ethereum,3200.00,0,PoS,-,5.00\n",
        )
        .unwrap();
    }

    fn write_investors(dir: &Path) {
        fs::write(
            dir.join("investors.csv"),
            "kind,name,identifier,birth_date,phone,street,number,district,postal_code,city,state,net_worth,profile_or_legal_name\n\
             INDIVIDUAL,Ana Souza,123456789,1991-04-12,11987654321,Rua A,100,Centro,01000-000,Sao Paulo,SP,2500000,AGGRESSIVE\n\
             INSTITUTIONAL,Fund Co,12345678000100,2005-09-01,1133334444,Av B,200,Sul,02000-000,Sao Paulo,SP,90000000,Fund Co Asset Management SA\n\
             INDIVIDUAL,No Profile,987654321,1980-01-01,11911112222,Rua C,1,Norte,03000-000,Rio,RJ,1000,NOT_A_PROFILE\n",
        )
        .unwrap();
    }

    #[test]
    fn loads_all_asset_variants_and_skips_bad_rows() {
        let dir = TempDir::new().unwrap();
        write_all_asset_files(dir.path());
        let adapter = CsvDataAdapter::new(dir.path().to_path_buf());

        let outcome = adapter.load_assets().unwrap();

        // 9 data rows, only the malformed equity ticker is rejected.
        assert_eq!(outcome.items.len(), 8);
        assert_eq!(outcome.skipped.len(), 1);
        assert!(outcome.skipped[0].reason.contains("equities.csv"));

        let kinds: Vec<AssetKind> = outcome.items.iter().map(|a| a.kind()).collect();
        assert_eq!(kinds.iter().filter(|k| **k == AssetKind::Equity).count(), 2);
        assert_eq!(
            kinds.iter().filter(|k| **k == AssetKind::FixedIncome).count(),
            2
        );
        assert_eq!(
            kinds.iter().filter(|k| **k == AssetKind::Crypto).count(),
            2
        );
    }

    #[test]
    fn fund_row_tolerates_comma_decimals_and_dash() {
        let dir = TempDir::new().unwrap();
        write_all_asset_files(dir.path());
        let adapter = CsvDataAdapter::new(dir.path().to_path_buf());

        let outcome = adapter.load_assets().unwrap();
        let fund = outcome
            .items
            .iter()
            .find(|a| a.kind() == AssetKind::RealEstateFund)
            .unwrap();

        match fund.detail() {
            AssetDetail::RealEstateFund {
                last_dividend,
                admin_fee_pct,
                ..
            } => {
                assert_eq!(*last_dividend, dec!(1.10));
                assert_eq!(*admin_fee_pct, dec!(0));
            }
            other => panic!("unexpected detail {other:?}"),
        }
    }

    #[test]
    fn crypto_dash_supply_is_none() {
        let dir = TempDir::new().unwrap();
        write_all_asset_files(dir.path());
        let adapter = CsvDataAdapter::new(dir.path().to_path_buf());

        let outcome = adapter.load_assets().unwrap();
        let eth = outcome
            .items
            .iter()
            .find(|a| a.ticker() == "ETH")
            .unwrap();
        match eth.detail() {
            AssetDetail::Crypto { max_supply, .. } => assert!(max_supply.is_none()),
            other => panic!("unexpected detail {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let adapter = CsvDataAdapter::new(dir.path().to_path_buf());
        assert!(adapter.load_assets().is_err());
    }

    #[test]
    fn loads_investors_and_skips_invalid_profile() {
        let dir = TempDir::new().unwrap();
        write_investors(dir.path());
        let adapter = CsvDataAdapter::new(dir.path().to_path_buf());

        let outcome = adapter.load_investors().unwrap();

        assert_eq!(outcome.items.len(), 2);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].index, 2);

        let ana = &outcome.items[0];
        assert_eq!(ana.name(), "Ana Souza");
        assert_eq!(ana.net_worth(), dec!(2500000));
        assert_eq!(ana.address().city, "Sao Paulo");
    }

    #[test]
    fn loads_transactions_with_optional_price() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("moves.csv");
        fs::write(
            &path,
            "kind,ticker,quantity,price\n\
             BUY,VALE3,10,55.00\n\
             buy,BTC,\"0,5\",\n\
             SELL,VALE3,4,\n\
             HOLD,VALE3,1,\n",
        )
        .unwrap();
        let adapter = CsvDataAdapter::new(dir.path().to_path_buf());

        let outcome = adapter.load_transactions(&path).unwrap();

        assert_eq!(outcome.items.len(), 3);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].index, 3);

        assert_eq!(outcome.items[0].execution_price, Some(dec!(55.00)));
        assert_eq!(outcome.items[1].kind, TradeKind::Buy);
        assert_eq!(outcome.items[1].quantity, dec!(0.5));
        assert_eq!(outcome.items[1].execution_price, None);
        assert_eq!(outcome.items[2].kind, TradeKind::Sell);
    }
}

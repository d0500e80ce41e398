#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use foliotrack::domain::asset::Asset;
use foliotrack::domain::catalog::{AssetCatalog, InvestorDirectory};
use foliotrack::ports::data_port::DataPort;
use rust_decimal_macros::dec;
use tempfile::TempDir;

/// Write the full CSV fixture set into a fresh directory and return it.
pub fn fixture_dir() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().to_path_buf();

    fs::write(
        path.join("equities.csv"),
        "ticker,name,price,qualified\n\
         VALE3,Vale,60.00,0\n\
         PETR4,Petrobras,38.00,0\n\
         REST3,Restricted Co,500.00,1\n",
    )
    .unwrap();
    fs::write(
        path.join("treasuries.csv"),
        "ticker,name,price,yield_kind,maturity\n\
         T2031,Treasury 2031,100.00,FLOATING,01/03/2031\n",
    )
    .unwrap();
    fs::write(
        path.join("funds.csv"),
        "ticker,name,segment,price,last_dividend,admin_fee_pct\n\
         HGLG11,CSHG Logistica,Logistics,160.00,\"1,10\",0.60\n",
    )
    .unwrap();
    fs::write(
        path.join("foreign_stocks.csv"),
        "ticker,name,price,qualified,exchange,sector,conversion_rate\n\
         AAPL,Apple,200.00,0,NASDAQ,Technology,5.00\n",
    )
    .unwrap();
    fs::write(
        path.join("crypto.csv"),
        "ticker,name,price,qualified,algorithm,max_supply,conversion_rate\n\
         BTC,Bitcoin,100.00,0,PoW,21000000,5.00\n",
    )
    .unwrap();
    fs::write(
        path.join("investors.csv"),
        "kind,name,identifier,birth_date,phone,street,number,district,postal_code,city,state,net_worth,profile_or_legal_name\n\
         INDIVIDUAL,Ana Souza,123456789,1991-04-12,11987654321,Rua A,100,Centro,01000-000,Sao Paulo,SP,2500000,AGGRESSIVE\n\
         INDIVIDUAL,Caio Lima,555666777,1988-01-30,11911113333,Rua B,55,Sul,02000-000,Campinas,SP,30000,CONSERVATIVE\n\
         INSTITUTIONAL,Fund Co,12345678000100,2005-09-01,1133334444,Av C,200,Norte,03000-000,Sao Paulo,SP,90000000,Fund Co Asset Management SA\n",
    )
    .unwrap();

    (dir, path)
}

pub fn write_transactions(dir: &Path, name: &str, rows: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("kind,ticker,quantity,price\n{rows}")).unwrap();
    path
}

pub fn write_config(dir: &Path, data_dir: &Path) -> PathBuf {
    let path = dir.join("folio.ini");
    fs::write(
        &path,
        format!(
            "[data]\ndir = {}\n\n[report]\noutput = {}\n",
            data_dir.display(),
            dir.join("report.json").display()
        ),
    )
    .unwrap();
    path
}

/// Build catalog and directory straight from a data port, failing the test
/// on any unexpected skip.
pub fn load_clean_state(adapter: &impl DataPort) -> (AssetCatalog, InvestorDirectory) {
    let assets = adapter.load_assets().unwrap();
    assert!(
        assets.skipped.is_empty(),
        "unexpected skipped assets: {:?}",
        assets.skipped
    );
    let mut catalog = AssetCatalog::new();
    for asset in assets.items {
        catalog.insert(asset).unwrap();
    }

    let investors = adapter.load_investors().unwrap();
    assert!(
        investors.skipped.is_empty(),
        "unexpected skipped investors: {:?}",
        investors.skipped
    );
    let mut directory = InvestorDirectory::new();
    for investor in investors.items {
        directory.insert(investor).unwrap();
    }

    (catalog, directory)
}

pub fn bitcoin() -> Asset {
    Asset::crypto("Bitcoin", "BTC", dec!(100), false, "PoW", None, dec!(5)).unwrap()
}

pub fn vale() -> Asset {
    Asset::equity("Vale", "VALE3", dec!(60), false).unwrap()
}

//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvDataAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::asset::{normalize_ticker, AssetKind};
use crate::domain::batch::{apply_batch, TradeKind};
use crate::domain::catalog::{AssetCatalog, InvestorDirectory};
use crate::domain::error::FoliotrackError;
use crate::domain::investor::InvestorKind;
use crate::domain::report::build_report;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "foliotrack", about = "Investment portfolio tracker")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List catalog assets
    ListAssets {
        #[arg(short, long)]
        config: PathBuf,
        /// equity | fixed-income | fund | foreign | crypto
        #[arg(long)]
        kind: Option<String>,
    },
    /// Apply a transaction feed to an investor's portfolio
    Apply {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        investor: String,
        #[arg(short, long)]
        transactions: PathBuf,
    },
    /// Buy a single asset for an investor
    Buy {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        investor: String,
        #[arg(long)]
        ticker: String,
        #[arg(short, long)]
        quantity: Decimal,
        /// Execution price; defaults to the asset's current price
        #[arg(short, long)]
        price: Option<Decimal>,
    },
    /// Sell part or all of a single position
    Sell {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        investor: String,
        #[arg(long)]
        ticker: String,
        #[arg(short, long)]
        quantity: Decimal,
    },
    /// Write an investor's JSON report
    Report {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        investor: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show an investor's allocation percentages
    Allocation {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        investor: String,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::ListAssets { config, kind } => run_list_assets(&config, kind.as_deref()),
        Command::Apply {
            config,
            investor,
            transactions,
        } => run_apply(&config, &investor, &transactions),
        Command::Buy {
            config,
            investor,
            ticker,
            quantity,
            price,
        } => run_trade(&config, &investor, &ticker, TradeKind::Buy, quantity, price),
        Command::Sell {
            config,
            investor,
            ticker,
            quantity,
        } => run_trade(&config, &investor, &ticker, TradeKind::Sell, quantity, None),
        Command::Report {
            config,
            investor,
            output,
        } => run_report(&config, &investor, output.as_deref()),
        Command::Allocation { config, investor } => run_allocation(&config, &investor),
    }
}

fn fail(err: &FoliotrackError) -> ExitCode {
    eprintln!("error: {err}");
    ExitCode::from(err)
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = FoliotrackError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        fail(&err)
    })
}

fn data_adapter(config: &FileConfigAdapter) -> Result<CsvDataAdapter, FoliotrackError> {
    let dir = config
        .get_string("data", "dir")
        .ok_or(FoliotrackError::ConfigMissing {
            section: "data".to_string(),
            key: "dir".to_string(),
        })?;
    Ok(CsvDataAdapter::new(PathBuf::from(dir)))
}

/// Load the catalog and directory from the configured data directory.
/// Per-row skips and duplicate identities are reported on stderr; only an
/// unreadable feed aborts.
fn load_state(
    adapter: &CsvDataAdapter,
) -> Result<(AssetCatalog, InvestorDirectory), FoliotrackError> {
    let assets = adapter.load_assets()?;
    for skipped in &assets.skipped {
        eprintln!("warning: skipped asset row {}: {}", skipped.index, skipped.reason);
    }
    let mut catalog = AssetCatalog::new();
    for asset in assets.items {
        if let Err(err) = catalog.insert(asset) {
            eprintln!("warning: {err}");
        }
    }

    let investors = adapter.load_investors()?;
    for skipped in &investors.skipped {
        eprintln!(
            "warning: skipped investor row {}: {}",
            skipped.index, skipped.reason
        );
    }
    let mut directory = InvestorDirectory::new();
    for investor in investors.items {
        if let Err(err) = directory.insert(investor) {
            eprintln!("warning: {err}");
        }
    }

    Ok((catalog, directory))
}

fn parse_kind(raw: &str) -> Result<AssetKind, FoliotrackError> {
    match raw.to_lowercase().as_str() {
        "equity" => Ok(AssetKind::Equity),
        "fixed-income" => Ok(AssetKind::FixedIncome),
        "fund" => Ok(AssetKind::RealEstateFund),
        "foreign" => Ok(AssetKind::ForeignEquity),
        "crypto" => Ok(AssetKind::Crypto),
        other => Err(FoliotrackError::ConfigParse {
            file: "--kind".to_string(),
            reason: format!("unknown asset kind {other:?}"),
        }),
    }
}

fn run_list_assets(config_path: &Path, kind: Option<&str>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let result = (|| {
        let adapter = data_adapter(&config)?;
        let (catalog, _) = load_state(&adapter)?;
        let filter = kind.map(parse_kind).transpose()?;

        let mut assets: Vec<_> = catalog
            .iter()
            .filter(|asset| filter.is_none_or(|k| asset.kind() == k))
            .collect();
        assets.sort_by(|a, b| a.ticker().cmp(b.ticker()));

        for asset in assets {
            let restricted = if asset.qualified_only() {
                " [qualified only]"
            } else {
                ""
            };
            println!(
                "{:<10} {:<30} {:<16} price {}{}",
                asset.ticker(),
                asset.name(),
                asset.kind().label(),
                asset.current_price(),
                restricted
            );
        }
        Ok(())
    })();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fail(&err),
    }
}

fn run_apply(config_path: &Path, investor_id: &str, transactions: &Path) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let result = (|| {
        let adapter = data_adapter(&config)?;
        let (catalog, mut directory) = load_state(&adapter)?;

        let feed = adapter.load_transactions(transactions)?;
        for skipped in &feed.skipped {
            eprintln!(
                "warning: unparseable transaction row {}: {}",
                skipped.index, skipped.reason
            );
        }

        let investor =
            directory
                .get_mut(investor_id)
                .ok_or_else(|| FoliotrackError::InvestorNotFound {
                    identifier: investor_id.to_string(),
                })?;

        let outcome = apply_batch(investor, &catalog, &feed.items);
        for skipped in &outcome.skipped {
            eprintln!("rejected row {}: {}", skipped.index, skipped.reason);
        }
        println!(
            "applied {} of {} transactions for {} ({} rejected)",
            outcome.applied,
            feed.items.len(),
            investor.name(),
            outcome.skipped.len()
        );
        println!(
            "portfolio now holds {} position(s), cost basis {}",
            investor.portfolio().len(),
            investor.portfolio().total_cost_basis()
        );
        Ok(())
    })();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fail(&err),
    }
}

/// Apply one buy or sell against loaded state. Returns the confirmation line
/// to print on success.
fn execute_trade(
    catalog: &AssetCatalog,
    directory: &mut InvestorDirectory,
    investor_id: &str,
    ticker: &str,
    kind: TradeKind,
    quantity: Decimal,
    price: Option<Decimal>,
) -> Result<String, FoliotrackError> {
    let asset = catalog
        .find_by_ticker(ticker)
        .ok_or_else(|| FoliotrackError::AssetNotFound {
            ticker: normalize_ticker(ticker),
        })?;

    let investor = directory
        .get_mut(investor_id)
        .ok_or_else(|| FoliotrackError::InvestorNotFound {
            identifier: investor_id.to_string(),
        })?;

    match kind {
        TradeKind::Buy => {
            let execution_price = price.unwrap_or_else(|| asset.current_price());
            investor.buy(asset, quantity, execution_price)?;
        }
        TradeKind::Sell => investor.sell(&asset.key(), quantity)?,
    }

    Ok(format!(
        "{} now holds {} of {} (cost basis {})",
        investor.name(),
        investor.portfolio().quantity_of(&asset.key()),
        asset.ticker(),
        investor.portfolio().cost_basis_of(&asset.key())
    ))
}

fn run_trade(
    config_path: &Path,
    investor_id: &str,
    ticker: &str,
    kind: TradeKind,
    quantity: Decimal,
    price: Option<Decimal>,
) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let result = (|| {
        let adapter = data_adapter(&config)?;
        let (catalog, mut directory) = load_state(&adapter)?;
        let line = execute_trade(
            &catalog,
            &mut directory,
            investor_id,
            ticker,
            kind,
            quantity,
            price,
        )?;
        println!("{line}");
        Ok(())
    })();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fail(&err),
    }
}

fn run_report(config_path: &Path, investor_id: &str, output: Option<&Path>) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let result = (|| {
        let adapter = data_adapter(&config)?;
        let (catalog, directory) = load_state(&adapter)?;

        let investor =
            directory
                .get(investor_id)
                .ok_or_else(|| FoliotrackError::InvestorNotFound {
                    identifier: investor_id.to_string(),
                })?;

        let default_output = config
            .get_string("report", "output")
            .unwrap_or_else(|| "report.json".to_string());
        let path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(default_output));

        let report = build_report(investor, &catalog);
        JsonReportAdapter.write(&report, &path)?;
        println!("report for {} written to {}", investor.name(), path.display());
        Ok(())
    })();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fail(&err),
    }
}

fn run_allocation(config_path: &Path, investor_id: &str) -> ExitCode {
    let config = match load_config(config_path) {
        Ok(config) => config,
        Err(code) => return code,
    };

    let result = (|| {
        let adapter = data_adapter(&config)?;
        let (catalog, directory) = load_state(&adapter)?;

        let investor =
            directory
                .get(investor_id)
                .ok_or_else(|| FoliotrackError::InvestorNotFound {
                    identifier: investor_id.to_string(),
                })?;

        let report = build_report(investor, &catalog);
        let kind = match investor.kind() {
            InvestorKind::Individual { risk_profile } => {
                format!("individual ({})", risk_profile.label())
            }
            InvestorKind::Institutional { legal_name } => {
                format!("institutional ({legal_name})")
            }
        };

        println!("{} - {}", investor.name(), kind);
        println!("total value:       {}", report.total_value);
        println!("total cost basis:  {}", report.total_cost_basis);
        println!("fixed income:      {}%", report.allocation.fixed_income_pct);
        println!("variable income:   {}%", report.allocation.variable_income_pct);
        println!("domestic:          {}%", report.allocation.domestic_pct);
        println!("foreign:           {}%", report.allocation.foreign_pct);
        Ok(())
    })();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => fail(&err),
    }
}

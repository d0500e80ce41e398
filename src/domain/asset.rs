//! Tradable instruments and their reporting-currency conversion.
//!
//! Assets are closed variants rather than an open hierarchy; eligibility and
//! conversion behavior dispatch on [`AssetKind`]. Identity is the pair
//! (kind, normalized ticker), never pointer identity.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::AssetError;

/// Concrete asset variant tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    Equity,
    FixedIncome,
    RealEstateFund,
    ForeignEquity,
    Crypto,
}

impl AssetKind {
    pub fn label(&self) -> &'static str {
        match self {
            AssetKind::Equity => "equity",
            AssetKind::FixedIncome => "fixed-income",
            AssetKind::RealEstateFund => "real-estate fund",
            AssetKind::ForeignEquity => "foreign equity",
            AssetKind::Crypto => "crypto",
        }
    }
}

/// Whether returns are contractually fixed or market-driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncomeClass {
    Fixed,
    Variable,
}

/// Domestic instruments are already in the reporting currency; foreign ones
/// carry a conversion rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Domestic,
    Foreign,
}

/// Equity share class, encoded in the ticker's national-market suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShareClass {
    Ordinary,
    Preferred,
    Unit,
}

/// Yield convention of a fixed-income instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YieldKind {
    FloatingRate,
    Prefixed,
    InflationLinked,
}

/// Trim + uppercase, the normalization under which tickers are compared.
pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}

/// Map key identifying an asset: same variant, same normalized ticker.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AssetKey {
    pub kind: AssetKind,
    pub ticker: String,
}

impl AssetKey {
    pub fn new(kind: AssetKind, ticker: &str) -> Self {
        Self {
            kind,
            ticker: normalize_ticker(ticker),
        }
    }
}

/// Variant-specific attributes.
#[derive(Debug, Clone, PartialEq)]
pub enum AssetDetail {
    Equity {
        share_class: ShareClass,
    },
    FixedIncome {
        yield_kind: YieldKind,
        maturity: NaiveDate,
    },
    RealEstateFund {
        segment: String,
        last_dividend: Decimal,
        admin_fee_pct: Decimal,
    },
    ForeignEquity {
        exchange: String,
        sector: String,
        conversion_rate: Decimal,
    },
    Crypto {
        consensus_algorithm: String,
        max_supply: Option<Decimal>,
        conversion_rate: Decimal,
    },
}

/// A tradable instrument. The price is the only mutable field; updating it
/// never touches any portfolio's cost basis.
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    name: String,
    ticker: String,
    current_price: Decimal,
    qualified_only: bool,
    detail: AssetDetail,
}

fn require_text(value: &str, what: &str) -> Result<String, AssetError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AssetError::new(format!("{what} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn require_positive(value: Decimal, what: &str) -> Result<Decimal, AssetError> {
    if value <= Decimal::ZERO {
        return Err(AssetError::new(format!(
            "{what} must be greater than zero, got {value}"
        )));
    }
    Ok(value)
}

fn require_non_negative(value: Decimal, what: &str) -> Result<Decimal, AssetError> {
    if value < Decimal::ZERO {
        return Err(AssetError::new(format!(
            "{what} must not be negative, got {value}"
        )));
    }
    Ok(value)
}

/// Derive the share class from the ticker's suffix. Tickers that match none
/// of the recognized suffix conventions are malformed.
fn share_class_from_ticker(ticker: &str) -> Result<ShareClass, AssetError> {
    let normalized = normalize_ticker(ticker);

    if normalized.ends_with("11") {
        return Ok(ShareClass::Unit);
    }

    match normalized.chars().last() {
        Some('3') => Ok(ShareClass::Ordinary),
        Some('4') | Some('5') | Some('6') => Ok(ShareClass::Preferred),
        _ => Err(AssetError::new(format!(
            "unrecognized equity ticker suffix: {ticker}"
        ))),
    }
}

impl Asset {
    fn build(
        name: &str,
        ticker: &str,
        current_price: Decimal,
        qualified_only: bool,
        detail: AssetDetail,
    ) -> Result<Self, AssetError> {
        Ok(Self {
            name: require_text(name, "asset name")?,
            ticker: require_text(ticker, "asset ticker")?,
            current_price: require_positive(current_price, "asset price")?,
            qualified_only,
            detail,
        })
    }

    /// Domestic exchange-listed share. The share class comes from the ticker
    /// suffix and malformed tickers are rejected.
    pub fn equity(
        name: &str,
        ticker: &str,
        current_price: Decimal,
        qualified_only: bool,
    ) -> Result<Self, AssetError> {
        let share_class = share_class_from_ticker(ticker)?;
        Self::build(
            name,
            ticker,
            current_price,
            qualified_only,
            AssetDetail::Equity { share_class },
        )
    }

    /// Treasury-style instrument.
    pub fn fixed_income(
        name: &str,
        ticker: &str,
        current_price: Decimal,
        qualified_only: bool,
        yield_kind: YieldKind,
        maturity: NaiveDate,
    ) -> Result<Self, AssetError> {
        Self::build(
            name,
            ticker,
            current_price,
            qualified_only,
            AssetDetail::FixedIncome {
                yield_kind,
                maturity,
            },
        )
    }

    /// Domestic listed real-estate fund.
    pub fn real_estate_fund(
        name: &str,
        ticker: &str,
        current_price: Decimal,
        qualified_only: bool,
        segment: &str,
        last_dividend: Decimal,
        admin_fee_pct: Decimal,
    ) -> Result<Self, AssetError> {
        Self::build(
            name,
            ticker,
            current_price,
            qualified_only,
            AssetDetail::RealEstateFund {
                segment: require_text(segment, "fund segment")?,
                last_dividend: require_non_negative(last_dividend, "fund dividend")?,
                admin_fee_pct: require_non_negative(admin_fee_pct, "fund admin fee")?,
            },
        )
    }

    /// Foreign-listed share; carries a fixed conversion rate into the
    /// reporting currency.
    pub fn foreign_equity(
        name: &str,
        ticker: &str,
        current_price: Decimal,
        qualified_only: bool,
        exchange: &str,
        sector: &str,
        conversion_rate: Decimal,
    ) -> Result<Self, AssetError> {
        Self::build(
            name,
            ticker,
            current_price,
            qualified_only,
            AssetDetail::ForeignEquity {
                exchange: require_text(exchange, "exchange")?,
                sector: require_text(sector, "sector")?,
                conversion_rate: require_positive(conversion_rate, "conversion rate")?,
            },
        )
    }

    /// Cryptocurrency; priced in a foreign currency, so it also carries a
    /// conversion rate.
    pub fn crypto(
        name: &str,
        ticker: &str,
        current_price: Decimal,
        qualified_only: bool,
        consensus_algorithm: &str,
        max_supply: Option<Decimal>,
        conversion_rate: Decimal,
    ) -> Result<Self, AssetError> {
        let max_supply = match max_supply {
            Some(supply) => Some(require_non_negative(supply, "max supply")?),
            None => None,
        };
        Self::build(
            name,
            ticker,
            current_price,
            qualified_only,
            AssetDetail::Crypto {
                consensus_algorithm: require_text(consensus_algorithm, "consensus algorithm")?,
                max_supply,
                conversion_rate: require_positive(conversion_rate, "conversion rate")?,
            },
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn current_price(&self) -> Decimal {
        self.current_price
    }

    pub fn qualified_only(&self) -> bool {
        self.qualified_only
    }

    pub fn detail(&self) -> &AssetDetail {
        &self.detail
    }

    pub fn kind(&self) -> AssetKind {
        match self.detail {
            AssetDetail::Equity { .. } => AssetKind::Equity,
            AssetDetail::FixedIncome { .. } => AssetKind::FixedIncome,
            AssetDetail::RealEstateFund { .. } => AssetKind::RealEstateFund,
            AssetDetail::ForeignEquity { .. } => AssetKind::ForeignEquity,
            AssetDetail::Crypto { .. } => AssetKind::Crypto,
        }
    }

    pub fn key(&self) -> AssetKey {
        AssetKey::new(self.kind(), &self.ticker)
    }

    pub fn income_class(&self) -> IncomeClass {
        match self.kind() {
            AssetKind::FixedIncome => IncomeClass::Fixed,
            _ => IncomeClass::Variable,
        }
    }

    pub fn origin(&self) -> Origin {
        match self.kind() {
            AssetKind::ForeignEquity | AssetKind::Crypto => Origin::Foreign,
            _ => Origin::Domestic,
        }
    }

    /// Replace the current price. Cost bases already recorded in portfolios
    /// are unaffected.
    pub fn update_price(&mut self, new_price: Decimal) -> Result<(), AssetError> {
        self.current_price = require_positive(new_price, "asset price")?;
        Ok(())
    }

    /// Convert an amount in the asset's native currency into the reporting
    /// currency. Identity for domestic assets, fixed-rate multiplication for
    /// foreign ones.
    pub fn to_reporting_currency(&self, amount: Decimal) -> Decimal {
        match &self.detail {
            AssetDetail::ForeignEquity {
                conversion_rate, ..
            }
            | AssetDetail::Crypto {
                conversion_rate, ..
            } => amount * conversion_rate,
            _ => amount,
        }
    }

    /// Current price expressed in the reporting currency.
    pub fn current_value_reporting(&self) -> Decimal {
        self.to_reporting_currency(self.current_price)
    }
}

//! Investors and the buy/sell entry points.
//!
//! Each investor owns exactly one [`Portfolio`] for its lifetime; edits to
//! the investor's mutable fields happen in place so cost bases survive them.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::asset::{Asset, AssetKey};
use super::eligibility;
use super::error::{InvestorError, TradeError};
use super::portfolio::Portfolio;

/// Risk appetite declared by an individual investor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskProfile {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskProfile {
    pub fn label(&self) -> &'static str {
        match self {
            RiskProfile::Conservative => "conservative",
            RiskProfile::Moderate => "moderate",
            RiskProfile::Aggressive => "aggressive",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address {
    pub street: String,
    pub number: String,
    pub district: String,
    pub postal_code: String,
    pub city: String,
    pub state: String,
}

/// Variant-specific investor data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvestorKind {
    Individual { risk_profile: RiskProfile },
    Institutional { legal_name: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Investor {
    name: String,
    identifier: String,
    birth_date: NaiveDate,
    phone: String,
    address: Address,
    net_worth: Decimal,
    kind: InvestorKind,
    portfolio: Portfolio,
}

fn require_text(value: &str, what: &str) -> Result<String, InvestorError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(InvestorError::new(format!("{what} must not be empty")));
    }
    Ok(trimmed.to_string())
}

impl Investor {
    fn build(
        name: &str,
        identifier: &str,
        birth_date: NaiveDate,
        phone: &str,
        address: Address,
        net_worth: Decimal,
        kind: InvestorKind,
    ) -> Result<Self, InvestorError> {
        if net_worth < Decimal::ZERO {
            return Err(InvestorError::new("net worth must not be negative"));
        }
        Ok(Self {
            name: require_text(name, "investor name")?,
            identifier: require_text(identifier, "investor identifier")?,
            birth_date,
            phone: phone.trim().to_string(),
            address,
            net_worth,
            kind,
            portfolio: Portfolio::new(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn individual(
        name: &str,
        identifier: &str,
        birth_date: NaiveDate,
        phone: &str,
        address: Address,
        net_worth: Decimal,
        risk_profile: RiskProfile,
    ) -> Result<Self, InvestorError> {
        Self::build(
            name,
            identifier,
            birth_date,
            phone,
            address,
            net_worth,
            InvestorKind::Individual { risk_profile },
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn institutional(
        name: &str,
        identifier: &str,
        birth_date: NaiveDate,
        phone: &str,
        address: Address,
        net_worth: Decimal,
        legal_name: &str,
    ) -> Result<Self, InvestorError> {
        let legal_name = require_text(legal_name, "legal name")?;
        Self::build(
            name,
            identifier,
            birth_date,
            phone,
            address,
            net_worth,
            InvestorKind::Institutional { legal_name },
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn net_worth(&self) -> Decimal {
        self.net_worth
    }

    pub fn kind(&self) -> &InvestorKind {
        &self.kind
    }

    pub fn risk_profile(&self) -> Option<RiskProfile> {
        match &self.kind {
            InvestorKind::Individual { risk_profile } => Some(*risk_profile),
            InvestorKind::Institutional { .. } => None,
        }
    }

    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    /// In-place rename; positions and cost bases are untouched.
    pub fn rename(&mut self, name: &str) -> Result<(), InvestorError> {
        self.name = require_text(name, "investor name")?;
        Ok(())
    }

    pub fn update_net_worth(&mut self, net_worth: Decimal) -> Result<(), InvestorError> {
        if net_worth < Decimal::ZERO {
            return Err(InvestorError::new("net worth must not be negative"));
        }
        self.net_worth = net_worth;
        Ok(())
    }

    /// Buy at an explicit execution price, in the asset's native currency.
    /// Eligibility is checked before the ledger ever mutates.
    pub fn buy(
        &mut self,
        asset: &Asset,
        quantity: Decimal,
        execution_price: Decimal,
    ) -> Result<(), TradeError> {
        if quantity <= Decimal::ZERO {
            return Err(TradeError::InvalidQuantity);
        }
        if execution_price <= Decimal::ZERO {
            return Err(TradeError::InvalidPrice);
        }
        eligibility::authorize_buy(self, asset)?;
        self.portfolio.buy(asset, quantity, execution_price)
    }

    /// Buy at the asset's current price.
    pub fn buy_at_market(&mut self, asset: &Asset, quantity: Decimal) -> Result<(), TradeError> {
        self.buy(asset, quantity, asset.current_price())
    }

    /// Sells are never profile-gated; sufficiency of the held quantity is
    /// the only check.
    pub fn sell(&mut self, key: &AssetKey, quantity: Decimal) -> Result<(), TradeError> {
        self.portfolio.sell(key, quantity)
    }

    /// Drop an entire position, if any. Used when an asset is withdrawn from
    /// the catalog.
    pub fn liquidate(&mut self, key: &AssetKey) -> Result<(), TradeError> {
        let held = self.portfolio.quantity_of(key);
        if held.is_zero() {
            return Ok(());
        }
        self.portfolio.sell(key, held)
    }
}

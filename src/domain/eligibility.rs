//! Buy authorization rules, dispatched on investor and asset variants.
//!
//! Individuals are gated by risk profile and by the qualified-asset net-worth
//! threshold. Institutional investors pass straight through, including for
//! qualified-only assets. Sells are never gated here.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::asset::{Asset, AssetKind};
use super::error::TradeError;
use super::investor::{Investor, InvestorKind, RiskProfile};

/// Minimum net worth, in reporting currency, to trade qualified-only assets
/// as an individual. Meeting the threshold exactly qualifies.
pub const QUALIFIED_NET_WORTH_MIN: Decimal = dec!(1_000_000);

/// Decide whether this investor may buy this asset. Returns the blocking
/// rule as an [`TradeError::IneligibleInvestor`] on rejection.
pub fn authorize_buy(investor: &Investor, asset: &Asset) -> Result<(), TradeError> {
    let risk_profile = match investor.kind() {
        InvestorKind::Institutional { .. } => return Ok(()),
        InvestorKind::Individual { risk_profile } => *risk_profile,
    };

    if asset.kind() == AssetKind::Crypto && risk_profile != RiskProfile::Aggressive {
        return Err(TradeError::IneligibleInvestor {
            reason: format!(
                "only aggressive-profile investors may buy crypto assets (profile is {})",
                risk_profile.label()
            ),
        });
    }

    if asset.kind() == AssetKind::ForeignEquity && risk_profile == RiskProfile::Conservative {
        return Err(TradeError::IneligibleInvestor {
            reason: "conservative-profile investors may not buy foreign equities".to_string(),
        });
    }

    if asset.qualified_only() && investor.net_worth() < QUALIFIED_NET_WORTH_MIN {
        return Err(TradeError::IneligibleInvestor {
            reason: format!(
                "asset {} is restricted to qualified investors (net worth >= {QUALIFIED_NET_WORTH_MIN})",
                asset.ticker()
            ),
        });
    }

    Ok(())
}

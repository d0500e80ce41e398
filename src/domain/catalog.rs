//! In-memory registries: the asset catalog and the investor directory.
//!
//! Uniqueness by identity key is the only invariant either one enforces.

use rust_decimal::Decimal;
use std::collections::HashMap;

use super::asset::{normalize_ticker, Asset, AssetKey, AssetKind};
use super::error::FoliotrackError;
use super::investor::Investor;

/// Variant order used to resolve a bare ticker when the same ticker exists
/// in more than one variant. Tickers are unique per variant, not globally,
/// so resolution must not depend on map iteration order. Matches the order
/// the asset feeds are loaded.
const TICKER_RESOLUTION_ORDER: [AssetKind; 5] = [
    AssetKind::Equity,
    AssetKind::FixedIncome,
    AssetKind::RealEstateFund,
    AssetKind::ForeignEquity,
    AssetKind::Crypto,
];

/// All known assets, keyed by (kind, normalized ticker).
#[derive(Debug, Clone, Default)]
pub struct AssetCatalog {
    assets: HashMap<AssetKey, Asset>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn insert(&mut self, asset: Asset) -> Result<(), FoliotrackError> {
        let key = asset.key();
        if self.assets.contains_key(&key) {
            return Err(FoliotrackError::DuplicateAsset {
                ticker: key.ticker,
            });
        }
        self.assets.insert(key, asset);
        Ok(())
    }

    pub fn get(&self, key: &AssetKey) -> Option<&Asset> {
        self.assets.get(key)
    }

    /// Resolve a bare ticker against [`TICKER_RESOLUTION_ORDER`]: the
    /// highest-priority variant holding it wins.
    fn resolve_ticker(&self, ticker: &str) -> Option<AssetKey> {
        let normalized = normalize_ticker(ticker);
        TICKER_RESOLUTION_ORDER
            .iter()
            .map(|kind| AssetKey {
                kind: *kind,
                ticker: normalized.clone(),
            })
            .find(|key| self.assets.contains_key(key))
    }

    /// Normalized ticker match across every variant, deterministic when the
    /// ticker exists in more than one. The batch feed (which carries no
    /// variant column) relies on this.
    pub fn find_by_ticker(&self, ticker: &str) -> Option<&Asset> {
        self.resolve_ticker(ticker)
            .and_then(|key| self.assets.get(&key))
    }

    /// Replace the price of the asset with this ticker, under the same
    /// resolution order as [`AssetCatalog::find_by_ticker`].
    pub fn update_price(&mut self, ticker: &str, new_price: Decimal) -> Result<(), FoliotrackError> {
        let not_found = || FoliotrackError::AssetNotFound {
            ticker: normalize_ticker(ticker),
        };
        let key = self.resolve_ticker(ticker).ok_or_else(not_found)?;
        let asset = self.assets.get_mut(&key).ok_or_else(not_found)?;
        asset.update_price(new_price)?;
        Ok(())
    }

    pub fn remove(&mut self, key: &AssetKey) -> Option<Asset> {
        self.assets.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    pub fn of_kind(&self, kind: AssetKind) -> impl Iterator<Item = &Asset> {
        self.assets.values().filter(move |asset| asset.kind() == kind)
    }
}

/// All known investors, keyed by identifier (case-insensitive).
#[derive(Debug, Clone, Default)]
pub struct InvestorDirectory {
    investors: HashMap<String, Investor>,
}

fn directory_key(identifier: &str) -> String {
    identifier.trim().to_lowercase()
}

impl InvestorDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.investors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.investors.len()
    }

    pub fn insert(&mut self, investor: Investor) -> Result<(), FoliotrackError> {
        let key = directory_key(investor.identifier());
        if self.investors.contains_key(&key) {
            return Err(FoliotrackError::DuplicateInvestor {
                identifier: investor.identifier().to_string(),
            });
        }
        self.investors.insert(key, investor);
        Ok(())
    }

    pub fn get(&self, identifier: &str) -> Option<&Investor> {
        self.investors.get(&directory_key(identifier))
    }

    pub fn get_mut(&mut self, identifier: &str) -> Option<&mut Investor> {
        self.investors.get_mut(&directory_key(identifier))
    }

    pub fn remove(&mut self, identifier: &str) -> Option<Investor> {
        self.investors.remove(&directory_key(identifier))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Investor> {
        self.investors.values()
    }

    /// Drop every investor's position in a withdrawn asset. Goes through the
    /// sell path so the ledger invariants apply.
    pub fn remove_asset_from_all(&mut self, key: &AssetKey) {
        for investor in self.investors.values_mut() {
            let result = investor.liquidate(key);
            debug_assert!(
                result.is_ok(),
                "liquidating a full position must not fail: {result:?}"
            );
        }
    }
}

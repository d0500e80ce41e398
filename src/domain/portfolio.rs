//! Position ledger: per-asset quantity and weighted-average cost basis.
//!
//! The ledger stores running totals (quantity, total cost paid) rather than
//! the average itself, so repeated buys don't compound rounding error. Cost
//! basis is always in the reporting currency; execution prices are converted
//! at buy time using the asset's own rate.

use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

use super::asset::{Asset, AssetKey, IncomeClass, Origin};
use super::catalog::AssetCatalog;
use super::error::TradeError;

/// Fractional digits kept when deriving the average cost on a sell.
const AVERAGE_COST_SCALE: u32 = 10;

/// Fractional digits of allocation percentages.
const PERCENT_SCALE: u32 = 2;

/// Held quantity and the total paid for it, in reporting currency.
///
/// Invariant: both fields are non-negative, and a position with zero
/// quantity is never stored in the ledger at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub quantity: Decimal,
    pub cost_basis: Decimal,
}

impl Position {
    /// Weighted-average cost per unit, 10 fractional digits, half-up.
    pub fn average_cost(&self) -> Decimal {
        if self.quantity.is_zero() {
            return Decimal::ZERO;
        }
        (self.cost_basis / self.quantity)
            .round_dp_with_strategy(AVERAGE_COST_SCALE, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// One investor's holdings, keyed by asset identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Portfolio {
    positions: HashMap<AssetKey, Position>,
}

impl Portfolio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn position(&self, key: &AssetKey) -> Option<&Position> {
        self.positions.get(key)
    }

    pub fn has_position(&self, key: &AssetKey) -> bool {
        self.positions.contains_key(key)
    }

    /// Iteration order carries no meaning.
    pub fn positions(&self) -> impl Iterator<Item = (&AssetKey, &Position)> {
        self.positions.iter()
    }

    pub fn quantity_of(&self, key: &AssetKey) -> Decimal {
        self.positions
            .get(key)
            .map(|p| p.quantity)
            .unwrap_or(Decimal::ZERO)
    }

    pub fn cost_basis_of(&self, key: &AssetKey) -> Decimal {
        self.positions
            .get(key)
            .map(|p| p.cost_basis)
            .unwrap_or(Decimal::ZERO)
    }

    /// Record a buy. The execution price is in the asset's native currency
    /// and is converted before being added to the cost basis. Validation
    /// happens before any mutation.
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

        let cost = asset.to_reporting_currency(execution_price) * quantity;
        let entry = self.positions.entry(asset.key()).or_insert(Position {
            quantity: Decimal::ZERO,
            cost_basis: Decimal::ZERO,
        });
        entry.quantity += quantity;
        entry.cost_basis += cost;
        Ok(())
    }

    /// Record a sell. Removes cost proportional to the weighted-average cost
    /// of the current position; a full sell drops the entry entirely so no
    /// zero-quantity positions accumulate. On any error the ledger is left
    /// untouched.
    pub fn sell(&mut self, key: &AssetKey, quantity: Decimal) -> Result<(), TradeError> {
        if quantity <= Decimal::ZERO {
            return Err(TradeError::InvalidQuantity);
        }

        let held = self.quantity_of(key);
        if held < quantity {
            return Err(TradeError::InsufficientQuantity {
                requested: quantity,
                held,
            });
        }

        // held >= quantity > 0, so the entry exists.
        let position = self.positions.get_mut(key).ok_or(
            TradeError::InsufficientQuantity {
                requested: quantity,
                held,
            },
        )?;

        let average_cost = (position.cost_basis / held)
            .round_dp_with_strategy(AVERAGE_COST_SCALE, RoundingStrategy::MidpointAwayFromZero);
        let cost_removed = average_cost * quantity;
        // Clamp absorbs rounding drift from the fixed-scale average.
        let new_cost = (position.cost_basis - cost_removed).max(Decimal::ZERO);
        let new_quantity = held - quantity;

        if new_quantity.is_zero() {
            self.positions.remove(key);
        } else {
            position.quantity = new_quantity;
            position.cost_basis = new_cost;
        }
        Ok(())
    }

    /// Sum of converted current prices times held quantities. Positions whose
    /// asset is no longer in the catalog contribute nothing.
    pub fn total_value(&self, catalog: &AssetCatalog) -> Decimal {
        self.value_where(catalog, |_| true)
    }

    /// Total amount paid for everything currently held.
    pub fn total_cost_basis(&self) -> Decimal {
        self.positions.values().map(|p| p.cost_basis).sum()
    }

    /// Percentage of current value held in the given income class, 2 digits
    /// half-up. Zero for an empty (or zero-valued) portfolio by convention.
    pub fn allocation_by_income(&self, catalog: &AssetCatalog, class: IncomeClass) -> Decimal {
        self.allocation(catalog, |asset| asset.income_class() == class)
    }

    /// Percentage of current value held in the given origin, 2 digits half-up.
    pub fn allocation_by_origin(&self, catalog: &AssetCatalog, origin: Origin) -> Decimal {
        self.allocation(catalog, |asset| asset.origin() == origin)
    }

    fn allocation(&self, catalog: &AssetCatalog, filter: impl Fn(&Asset) -> bool) -> Decimal {
        let total = self.total_value(catalog);
        if total.is_zero() {
            return Decimal::ZERO;
        }
        let part = self.value_where(catalog, filter);
        (part * Decimal::ONE_HUNDRED / total)
            .round_dp_with_strategy(PERCENT_SCALE, RoundingStrategy::MidpointAwayFromZero)
    }

    fn value_where(&self, catalog: &AssetCatalog, filter: impl Fn(&Asset) -> bool) -> Decimal {
        self.positions
            .iter()
            .filter_map(|(key, position)| {
                catalog
                    .get(key)
                    .filter(|asset| filter(asset))
                    .map(|asset| asset.current_value_reporting() * position.quantity)
            })
            .sum()
    }
}

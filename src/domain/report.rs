//! Read-only report model built from an investor's ledger.
//!
//! Pure accessors only; how the model gets rendered (JSON, console) is the
//! adapter's business.

use rust_decimal::Decimal;

use super::asset::{AssetKind, IncomeClass, Origin};
use super::catalog::AssetCatalog;
use super::investor::Investor;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct PositionReport {
    pub ticker: String,
    pub name: String,
    pub kind: AssetKind,
    pub quantity: Decimal,
    pub cost_basis: Decimal,
    pub current_value: Decimal,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct AllocationBreakdown {
    pub fixed_income_pct: Decimal,
    pub variable_income_pct: Decimal,
    pub domestic_pct: Decimal,
    pub foreign_pct: Decimal,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct InvestorReport {
    pub identifier: String,
    pub name: String,
    pub net_worth: Decimal,
    pub positions: Vec<PositionReport>,
    pub total_cost_basis: Decimal,
    pub total_value: Decimal,
    pub allocation: AllocationBreakdown,
}

/// Snapshot an investor's holdings. Positions are sorted by ticker so the
/// rendered report is stable; assets withdrawn from the catalog keep their
/// cost basis but value at zero.
pub fn build_report(investor: &Investor, catalog: &AssetCatalog) -> InvestorReport {
    let portfolio = investor.portfolio();

    let mut positions: Vec<PositionReport> = portfolio
        .positions()
        .map(|(key, position)| {
            let (name, current_value) = match catalog.get(key) {
                Some(asset) => (
                    asset.name().to_string(),
                    asset.current_value_reporting() * position.quantity,
                ),
                None => (key.ticker.clone(), Decimal::ZERO),
            };
            PositionReport {
                ticker: key.ticker.clone(),
                name,
                kind: key.kind,
                quantity: position.quantity,
                cost_basis: position.cost_basis,
                current_value,
            }
        })
        .collect();
    positions.sort_by(|a, b| a.ticker.cmp(&b.ticker));

    InvestorReport {
        identifier: investor.identifier().to_string(),
        name: investor.name().to_string(),
        net_worth: investor.net_worth(),
        positions,
        total_cost_basis: portfolio.total_cost_basis(),
        total_value: portfolio.total_value(catalog),
        allocation: AllocationBreakdown {
            fixed_income_pct: portfolio.allocation_by_income(catalog, IncomeClass::Fixed),
            variable_income_pct: portfolio.allocation_by_income(catalog, IncomeClass::Variable),
            domestic_pct: portfolio.allocation_by_origin(catalog, Origin::Domestic),
            foreign_pct: portfolio.allocation_by_origin(catalog, Origin::Foreign),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::Asset;
    use crate::domain::investor::{Address, RiskProfile};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn investor() -> Investor {
        Investor::individual(
            "Ana",
            "123456789",
            NaiveDate::from_ymd_opt(1991, 7, 8).unwrap(),
            "",
            Address {
                street: "Rua E".into(),
                number: "3".into(),
                district: "Leste".into(),
                postal_code: "33333-333".into(),
                city: "Salvador".into(),
                state: "BA".into(),
            },
            dec!(2_000_000),
            RiskProfile::Aggressive,
        )
        .unwrap()
    }

    #[test]
    fn report_totals_and_sorted_positions() {
        let mut catalog = AssetCatalog::new();
        let share = Asset::equity("Vale", "VALE3", dec!(60), false).unwrap();
        let coin = Asset::crypto("Bitcoin", "BTC", dec!(100), false, "PoW", None, dec!(5)).unwrap();
        let mut holder = investor();

        holder.buy(&share, dec!(10), dec!(50)).unwrap(); // basis 500, value 600
        holder.buy(&coin, dec!(1), dec!(90)).unwrap(); // basis 450, value 500
        catalog.insert(share).unwrap();
        catalog.insert(coin).unwrap();

        let report = build_report(&holder, &catalog);

        assert_eq!(report.identifier, "123456789");
        assert_eq!(report.positions.len(), 2);
        assert_eq!(report.positions[0].ticker, "BTC");
        assert_eq!(report.positions[1].ticker, "VALE3");
        assert_eq!(report.total_cost_basis, dec!(950));
        assert_eq!(report.total_value, dec!(1100));
        assert_eq!(report.allocation.fixed_income_pct, dec!(0));
        assert_eq!(report.allocation.variable_income_pct, dec!(100));
        assert_eq!(
            report.allocation.domestic_pct + report.allocation.foreign_pct,
            dec!(100)
        );
    }

    #[test]
    fn withdrawn_asset_keeps_basis_but_values_zero() {
        let catalog = AssetCatalog::new();
        let share = Asset::equity("Vale", "VALE3", dec!(60), false).unwrap();
        let mut holder = investor();
        holder.buy(&share, dec!(2), dec!(50)).unwrap();

        let report = build_report(&holder, &catalog);

        assert_eq!(report.positions.len(), 1);
        assert_eq!(report.positions[0].name, "VALE3");
        assert_eq!(report.positions[0].cost_basis, dec!(100));
        assert_eq!(report.positions[0].current_value, dec!(0));
        assert_eq!(report.total_value, dec!(0));
    }

    #[test]
    fn empty_portfolio_reports_zeroes() {
        let catalog = AssetCatalog::new();
        let report = build_report(&investor(), &catalog);

        assert!(report.positions.is_empty());
        assert_eq!(report.total_value, dec!(0));
        assert_eq!(report.total_cost_basis, dec!(0));
        assert_eq!(report.allocation.variable_income_pct, dec!(0));
    }
}

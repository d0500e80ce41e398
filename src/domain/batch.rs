//! Ordered transaction feeds applied row by row.
//!
//! One bad row never aborts a batch: failures are recorded with their row
//! index and reason, and the runner moves on.

use rust_decimal::Decimal;

use super::catalog::AssetCatalog;
use super::investor::Investor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeKind {
    Buy,
    Sell,
}

/// One row of the transaction feed. Buys without an explicit price execute
/// at the asset's current price.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRow {
    pub kind: TradeKind,
    pub ticker: String,
    pub quantity: Decimal,
    pub execution_price: Option<Decimal>,
}

/// A row that was not applied, with the position it held in the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRow {
    pub index: usize,
    pub reason: String,
}

/// Tally of a finished batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchOutcome {
    pub applied: usize,
    pub skipped: Vec<SkippedRow>,
}

impl BatchOutcome {
    pub fn skip(&mut self, index: usize, reason: impl Into<String>) {
        self.skipped.push(SkippedRow {
            index,
            reason: reason.into(),
        });
    }
}

/// Apply a feed, in order, against one investor's portfolio. Rows are
/// resolved against the catalog by ticker; each failure is tallied and the
/// batch continues.
pub fn apply_batch(
    investor: &mut Investor,
    catalog: &AssetCatalog,
    rows: &[TransactionRow],
) -> BatchOutcome {
    let mut outcome = BatchOutcome::default();

    for (index, row) in rows.iter().enumerate() {
        let Some(asset) = catalog.find_by_ticker(&row.ticker) else {
            outcome.skip(index, format!("no asset found for ticker {}", row.ticker));
            continue;
        };

        let result = match row.kind {
            TradeKind::Buy => {
                let price = row.execution_price.unwrap_or_else(|| asset.current_price());
                investor.buy(asset, row.quantity, price)
            }
            TradeKind::Sell => investor.sell(&asset.key(), row.quantity),
        };

        match result {
            Ok(()) => outcome.applied += 1,
            Err(err) => outcome.skip(index, err.to_string()),
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::asset::Asset;
    use crate::domain::investor::{Address, RiskProfile};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn buy(ticker: &str, quantity: Decimal, price: Option<Decimal>) -> TransactionRow {
        TransactionRow {
            kind: TradeKind::Buy,
            ticker: ticker.into(),
            quantity,
            execution_price: price,
        }
    }

    fn sell(ticker: &str, quantity: Decimal) -> TransactionRow {
        TransactionRow {
            kind: TradeKind::Sell,
            ticker: ticker.into(),
            quantity,
            execution_price: None,
        }
    }

    fn setup() -> (Investor, AssetCatalog) {
        let investor = Investor::individual(
            "Ana",
            "123456789",
            NaiveDate::from_ymd_opt(1992, 3, 4).unwrap(),
            "",
            Address {
                street: "Rua D".into(),
                number: "9".into(),
                district: "Sul".into(),
                postal_code: "22222-222".into(),
                city: "Curitiba".into(),
                state: "PR".into(),
            },
            dec!(40_000),
            RiskProfile::Moderate,
        )
        .unwrap();

        let mut catalog = AssetCatalog::new();
        catalog
            .insert(Asset::equity("Vale", "VALE3", dec!(60), false).unwrap())
            .unwrap();
        catalog
            .insert(Asset::crypto("Bitcoin", "BTC", dec!(100), false, "PoW", None, dec!(5)).unwrap())
            .unwrap();

        (investor, catalog)
    }

    #[test]
    fn applies_rows_in_order() {
        let (mut investor, catalog) = setup();
        let rows = vec![
            buy("VALE3", dec!(10), Some(dec!(10))),
            buy("VALE3", dec!(10), Some(dec!(20))),
            sell("VALE3", dec!(5)),
        ];

        let outcome = apply_batch(&mut investor, &catalog, &rows);

        assert_eq!(outcome.applied, 3);
        assert!(outcome.skipped.is_empty());
        let key = catalog.find_by_ticker("VALE3").unwrap().key();
        assert_eq!(investor.portfolio().quantity_of(&key), dec!(15));
        assert_eq!(investor.portfolio().cost_basis_of(&key), dec!(225));
    }

    #[test]
    fn priceless_buy_executes_at_current_price() {
        let (mut investor, catalog) = setup();
        let outcome = apply_batch(&mut investor, &catalog, &[buy("VALE3", dec!(2), None)]);

        assert_eq!(outcome.applied, 1);
        let key = catalog.find_by_ticker("VALE3").unwrap().key();
        assert_eq!(investor.portfolio().cost_basis_of(&key), dec!(120));
    }

    #[test]
    fn bad_rows_are_tallied_and_batch_continues() {
        let (mut investor, catalog) = setup();
        let rows = vec![
            buy("XXXX3", dec!(1), None),          // unknown ticker
            buy("BTC", dec!(1), None),            // moderate profile, crypto blocked
            sell("VALE3", dec!(1)),               // nothing held
            buy("VALE3", dec!(0), None),          // bad quantity
            buy("VALE3", dec!(3), Some(dec!(50))), // fine
        ];

        let outcome = apply_batch(&mut investor, &catalog, &rows);

        assert_eq!(outcome.applied, 1);
        assert_eq!(outcome.skipped.len(), 4);
        let indices: Vec<usize> = outcome.skipped.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3]);
        assert!(outcome.skipped[0].reason.contains("XXXX3"));

        let key = catalog.find_by_ticker("VALE3").unwrap().key();
        assert_eq!(investor.portfolio().quantity_of(&key), dec!(3));
    }
}

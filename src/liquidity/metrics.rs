//! Liquidity metrics over a [`Table`] or an order book.
//!
//! A missing input column is an error; numerical degeneracy (no usable
//! rows, zero denominators) yields `f64::NAN`.

use thiserror::Error;

use super::table::{percent_change, Table, CLOSE, RETURNS};
use crate::market_data::order_book::{OrderBook, OrderBookSide};

pub const BID: &str = "bid";
pub const ASK: &str = "ask";
pub const VOLUME: &str = "volume";
pub const SIGNED_VOLUME: &str = "signed_volume";

pub const BID_ASK_SPREAD: &str = "Bid-Ask Spread";
pub const AMIHUD_ILLIQUIDITY: &str = "Amihud Illiquidity";
pub const KYLES_LAMBDA: &str = "Kyle's Lambda";
pub const ORDER_BOOK_IMBALANCE: &str = "Order Book Imbalance";
pub const TOP_OF_BOOK_SPREAD: &str = "Top-of-Book Spread";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetricsError {
    #[error("required column `{0}` is missing")]
    MissingColumn(String),
}

fn require<'t>(table: &'t Table, name: &str) -> Result<&'t [Option<f64>], MetricsError> {
    table
        .column(name)
        .ok_or_else(|| MetricsError::MissingColumn(name.to_string()))
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        f64::NAN
    } else {
        sum / n as f64
    }
}

/// Mean of `ask - bid` over rows quoting both sides.
pub fn bid_ask_spread(table: &Table) -> Result<f64, MetricsError> {
    let bid = require(table, BID)?;
    let ask = require(table, ASK)?;
    Ok(mean(bid.iter().zip(ask).filter_map(|pair| match pair {
        (Some(b), Some(a)) => Some(a - b),
        _ => None,
    })))
}

/// Mean of `|return| / volume` over rows with a defined return and
/// positive volume. Returns come from the `returns` column, or are derived
/// from `close` when that column is absent.
pub fn amihud_illiquidity(table: &Table) -> Result<f64, MetricsError> {
    let derived;
    let returns = match table.column(RETURNS) {
        Some(r) => r,
        None => {
            derived = percent_change(require(table, CLOSE)?);
            derived.as_slice()
        }
    };
    let volume = require(table, VOLUME)?;

    Ok(mean(returns.iter().zip(volume).filter_map(|pair| match pair {
        (Some(r), Some(v)) if *v > 0.0 => Some(r.abs() / v),
        _ => None,
    })))
}

/// `(Σbid - Σask) / (Σbid + Σask)` over quantities; NaN on an empty book.
pub fn order_book_imbalance(bids: &OrderBookSide, asks: &OrderBookSide) -> f64 {
    let bid_qty = bids.total_quantity();
    let ask_qty = asks.total_quantity();
    let total = bid_qty + ask_qty;
    if total == 0.0 {
        return f64::NAN;
    }
    (bid_qty - ask_qty) / total
}

/// Price impact per unit signed flow: population covariance of returns
/// with `signed_volume`, over the population variance of `signed_volume`.
pub fn kyles_lambda(table: &Table) -> Result<f64, MetricsError> {
    let returns = require(table, RETURNS)?;
    let flow = require(table, SIGNED_VOLUME)?;

    let pairs: Vec<(f64, f64)> = returns
        .iter()
        .zip(flow)
        .filter_map(|pair| match pair {
            (Some(r), Some(q)) => Some((*r, *q)),
            _ => None,
        })
        .collect();
    if pairs.len() < 2 {
        return Ok(f64::NAN);
    }

    let n = pairs.len() as f64;
    let mean_r = pairs.iter().map(|(r, _)| r).sum::<f64>() / n;
    let mean_q = pairs.iter().map(|(_, q)| q).sum::<f64>() / n;
    let cov = pairs.iter().map(|(r, q)| (r - mean_r) * (q - mean_q)).sum::<f64>() / n;
    let var = pairs.iter().map(|(_, q)| (q - mean_q).powi(2)).sum::<f64>() / n;

    if var == 0.0 {
        return Ok(f64::NAN);
    }
    Ok(cov / var)
}

/// Named table metrics in display order. Kyle's lambda is included only
/// when the table carries signed volume.
pub fn table_metrics(table: &Table) -> Result<Vec<(String, f64)>, MetricsError> {
    let mut out = vec![
        (BID_ASK_SPREAD.to_string(), bid_ask_spread(table)?),
        (AMIHUD_ILLIQUIDITY.to_string(), amihud_illiquidity(table)?),
    ];
    if table.has_column(SIGNED_VOLUME) {
        out.push((KYLES_LAMBDA.to_string(), kyles_lambda(table)?));
    }
    Ok(out)
}

pub fn book_metrics(book: &OrderBook) -> Vec<(String, f64)> {
    vec![
        (
            ORDER_BOOK_IMBALANCE.to_string(),
            order_book_imbalance(&book.bids, &book.asks),
        ),
        (TOP_OF_BOOK_SPREAD.to_string(), book.spread().unwrap_or(f64::NAN)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn table(columns: Vec<(&str, Vec<Option<f64>>)>) -> Table {
        Table::from_columns(columns).unwrap()
    }

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn spread_is_mean_difference() {
        let t = table(vec![("bid", some(&[100.0, 200.0])), ("ask", some(&[101.0, 203.0]))]);
        assert_eq!(bid_ask_spread(&t).unwrap(), 2.0);
    }

    #[test]
    fn spread_skips_incomplete_rows() {
        let t = table(vec![
            ("bid", vec![Some(100.0), None, Some(10.0)]),
            ("ask", vec![Some(104.0), Some(7.0), None]),
        ]);
        assert_eq!(bid_ask_spread(&t).unwrap(), 4.0);
    }

    #[test]
    fn spread_without_complete_rows_is_nan() {
        let t = table(vec![("bid", vec![None]), ("ask", vec![Some(1.0)])]);
        assert!(bid_ask_spread(&t).unwrap().is_nan());
    }

    #[test_case(vec![("ask", vec![Some(1.0)])], "bid" ; "no bid")]
    #[test_case(vec![("bid", vec![Some(1.0)])], "ask" ; "no ask")]
    fn spread_missing_column(columns: Vec<(&str, Vec<Option<f64>>)>, missing: &str) {
        assert_eq!(
            bid_ask_spread(&table(columns)),
            Err(MetricsError::MissingColumn(missing.to_string()))
        );
    }

    #[test]
    fn amihud_from_returns() {
        let t = table(vec![
            ("returns", vec![Some(0.02), Some(-0.04), None]),
            ("volume", some(&[100.0, 200.0, 50.0])),
        ]);
        let expected = (0.02 / 100.0 + 0.04 / 200.0) / 2.0;
        assert!((amihud_illiquidity(&t).unwrap() - expected).abs() < 1e-15);
    }

    #[test]
    fn amihud_derives_returns_from_close() {
        let t = table(vec![("close", some(&[100.0, 110.0])), ("volume", some(&[10.0, 10.0]))]);
        assert!((amihud_illiquidity(&t).unwrap() - 0.01).abs() < 1e-12);
    }

    #[test_case(vec![("returns", some(&[0.1, 0.2])), ("volume", some(&[0.0, 0.0]))] ; "all zero volume")]
    #[test_case(vec![("returns", vec![None, None]), ("volume", some(&[1.0, 2.0]))] ; "no returns")]
    #[test_case(vec![("close", some(&[0.0, 5.0])), ("volume", some(&[1.0, 1.0]))] ; "zero previous close")]
    fn amihud_degenerate_is_nan(columns: Vec<(&str, Vec<Option<f64>>)>) {
        assert!(amihud_illiquidity(&table(columns)).unwrap().is_nan());
    }

    #[test]
    fn amihud_missing_columns() {
        let t = table(vec![("volume", some(&[1.0]))]);
        assert_eq!(amihud_illiquidity(&t), Err(MetricsError::MissingColumn("close".into())));

        let t = table(vec![("close", some(&[1.0]))]);
        assert_eq!(amihud_illiquidity(&t), Err(MetricsError::MissingColumn("volume".into())));
    }

    #[test]
    fn imbalance_example() {
        let bids = OrderBookSide::from_pairs(&[(100.0, 5.0), (99.0, 3.0)]);
        let asks = OrderBookSide::from_pairs(&[(101.0, 4.0), (102.0, 2.0)]);
        assert!((order_book_imbalance(&bids, &asks) - 1.0 / 7.0).abs() < 1e-15);
    }

    #[test]
    fn imbalance_bounds_and_empty() {
        let full = OrderBookSide::from_pairs(&[(1.0, 3.0)]);
        let empty = OrderBookSide::default();
        assert_eq!(order_book_imbalance(&full, &empty), 1.0);
        assert_eq!(order_book_imbalance(&empty, &full), -1.0);
        assert!(order_book_imbalance(&empty, &empty).is_nan());
    }

    #[test]
    fn kyle_on_linear_flow() {
        // returns = 0.001 * signed_volume exactly
        let flow = [100.0, -50.0, 20.0, -10.0];
        let returns: Vec<f64> = flow.iter().map(|q| q * 0.001).collect();
        let t = table(vec![("returns", some(&returns)), ("signed_volume", some(&flow))]);
        assert!((kyles_lambda(&t).unwrap() - 0.001).abs() < 1e-12);
    }

    #[test]
    fn kyle_degenerate_cases() {
        let one_row = table(vec![("returns", some(&[0.1])), ("signed_volume", some(&[5.0]))]);
        assert!(kyles_lambda(&one_row).unwrap().is_nan());

        let flat = table(vec![("returns", some(&[0.1, 0.2])), ("signed_volume", some(&[5.0, 5.0]))]);
        assert!(kyles_lambda(&flat).unwrap().is_nan());

        let no_flow = table(vec![("returns", some(&[0.1]))]);
        assert_eq!(
            kyles_lambda(&no_flow),
            Err(MetricsError::MissingColumn("signed_volume".into()))
        );
    }

    #[test]
    fn table_metrics_order() {
        let t = table(vec![
            ("bid", some(&[1.0, 2.0])),
            ("ask", some(&[2.0, 3.0])),
            ("returns", some(&[0.1, 0.2])),
            ("volume", some(&[10.0, 10.0])),
        ]);
        let names: Vec<_> = table_metrics(&t).unwrap().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec![BID_ASK_SPREAD, AMIHUD_ILLIQUIDITY]);

        let t = t.with_column("signed_volume", some(&[1.0, 2.0])).unwrap();
        let names: Vec<_> = table_metrics(&t).unwrap().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec![BID_ASK_SPREAD, AMIHUD_ILLIQUIDITY, KYLES_LAMBDA]);
    }

    #[test]
    fn book_metrics_values() {
        let book = OrderBook::new(
            OrderBookSide::from_pairs(&[(100.0, 5.0), (99.0, 3.0)]),
            OrderBookSide::from_pairs(&[(101.0, 4.0), (102.0, 2.0)]),
        );
        let metrics = book_metrics(&book);
        assert_eq!(metrics[0].0, ORDER_BOOK_IMBALANCE);
        assert_eq!(metrics[1], (TOP_OF_BOOK_SPREAD.to_string(), 1.0));
    }
}

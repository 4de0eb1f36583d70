// Source: https://developers.binance.com/docs/binance-spot-api-docs/rest-api
// GET /api/v3/depth and GET /api/v3/ticker/24hr
use serde::Deserialize;
use serde_json::Value;

use crate::market_data::normaliser::{level, lenient_f64};
use crate::market_data::order_book::{OrderBook, OrderBookSide};

/// Error payload: `{"code": -1121, "msg": "Invalid symbol."}`.
#[derive(Debug, Deserialize)]
pub struct ApiErrorPayload {
    pub code: i64,
    pub msg: String,
}

/// 24h rolling ticker. Only the fields used to backfill a snapshot.
#[derive(Debug, Default, Deserialize)]
pub struct Ticker24h {
    #[serde(default, rename = "lastPrice", deserialize_with = "lenient_f64")]
    pub last_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub volume: Option<f64>,
}

/// Outcome of reading a depth payload that decoded as JSON.
#[derive(Debug, PartialEq)]
pub enum DepthPayload {
    Book(OrderBook),
    ApiError { code: i64, msg: String },
    MissingKeys(Vec<String>),
}

/// Read `{"bids": [[p, q], ...], "asks": [...]}`. Rows whose price or
/// quantity does not coerce to a number are dropped.
pub fn parse_depth(data: &Value) -> DepthPayload {
    let Some(obj) = data.as_object() else {
        return DepthPayload::MissingKeys(Vec::new());
    };

    if !obj.contains_key("bids") && obj.contains_key("code") && obj.contains_key("msg") {
        let code = obj.get("code").and_then(Value::as_i64).unwrap_or_default();
        let msg = match obj.get("msg") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        return DepthPayload::ApiError { code, msg };
    }

    let (Some(bids), Some(asks)) = (obj.get("bids"), obj.get("asks")) else {
        return DepthPayload::MissingKeys(obj.keys().cloned().collect());
    };

    DepthPayload::Book(OrderBook::new(side(bids), side(asks)))
}

fn side(rows: &Value) -> OrderBookSide {
    let pairs: Vec<(f64, f64)> = rows
        .as_array()
        .map(|rows| rows.iter().filter_map(level).collect())
        .unwrap_or_default();
    OrderBookSide::from_pairs(&pairs)
}

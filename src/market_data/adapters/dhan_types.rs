// Source: https://dhanhq.co/docs/v2/market-quote/ (POST /v2/marketfeed/quote)
use std::collections::HashMap;

use serde::Deserialize;

use crate::market_data::normaliser::{lenient_f64, positive_price};
use crate::market_data::snapshot::QuoteFields;

/// Request body: exchange segment -> security ids, e.g. `{"NSE_EQ": [11536]}`.
pub type QuoteRequest = HashMap<String, Vec<serde_json::Value>>;

#[derive(Debug, Default, Deserialize)]
pub struct QuoteResponse {
    // segment -> security id -> quote
    #[serde(default)]
    pub data: HashMap<String, HashMap<String, DhanQuote>>,
}

impl QuoteResponse {
    pub fn quote(&self, segment: &str, security_id: &str) -> Option<&DhanQuote> {
        self.data.get(segment)?.get(security_id)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DhanQuote {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub last_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub volume: Option<f64>,
    #[serde(default)]
    pub depth: Option<DhanDepth>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DhanDepth {
    #[serde(default)]
    pub buy: Vec<DhanLevel>,
    #[serde(default)]
    pub sell: Vec<DhanLevel>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DhanLevel {
    #[serde(default)]
    pub price: serde_json::Value,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub quantity: Option<f64>,
}

impl DhanQuote {
    // Empty depth slots come back as price 0, which is not a quote.
    pub fn fields(&self) -> QuoteFields {
        let top_buy = self.depth.as_ref().and_then(|d| d.buy.first());
        let top_sell = self.depth.as_ref().and_then(|d| d.sell.first());
        QuoteFields {
            bid: top_buy.and_then(|l| positive_price(&l.price)),
            ask: top_sell.and_then(|l| positive_price(&l.price)),
            close: self.last_price,
            volume: self.volume,
            bid_size: top_buy.and_then(|l| l.quantity),
            ask_size: top_sell.and_then(|l| l.quantity),
        }
    }
}

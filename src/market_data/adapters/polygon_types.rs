// Source: https://polygon.io/docs/stocks (snapshot, last NBBO, last trade, previous close)
// Every field is optional; both the v3 snake_case and the v2 camelCase /
// single-letter keys are accepted.
use serde::Deserialize;

use crate::market_data::normaliser::lenient_f64;
use crate::market_data::snapshot::QuoteFields;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    // array first: a struct would also accept a sequence
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_first(self) -> Option<T> {
        match self {
            OneOrMany::Many(items) => items.into_iter().next(),
            OneOrMany::One(item) => Some(item),
        }
    }
}

// GET /v3/snapshot?ticker=S
#[derive(Debug, Default, Deserialize)]
pub struct SnapshotResponse {
    #[serde(default)]
    pub results: Option<OneOrMany<TickerSnapshot>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct TickerSnapshot {
    #[serde(default, alias = "lastQuote")]
    pub last_quote: Option<PolygonQuote>,
    #[serde(default, alias = "lastTrade")]
    pub last_trade: Option<PolygonTrade>,
    #[serde(default)]
    pub session: Option<PolygonVolume>,
    #[serde(default)]
    pub day: Option<PolygonVolume>,
}

impl TickerSnapshot {
    pub fn fields(&self) -> QuoteFields {
        let quote = self.last_quote.as_ref();
        let volume = self
            .session
            .as_ref()
            .and_then(|s| s.volume)
            .or_else(|| self.day.as_ref().and_then(|d| d.volume));
        QuoteFields {
            bid: quote.and_then(|q| q.bid),
            ask: quote.and_then(|q| q.ask),
            close: self.last_trade.as_ref().and_then(|t| t.price),
            volume,
            bid_size: quote.and_then(|q| q.bid_size),
            ask_size: quote.and_then(|q| q.ask_size),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PolygonQuote {
    #[serde(default, alias = "p", deserialize_with = "lenient_f64")]
    pub bid: Option<f64>,
    #[serde(default, alias = "P", deserialize_with = "lenient_f64")]
    pub ask: Option<f64>,
    #[serde(default, alias = "bidSize", alias = "s", deserialize_with = "lenient_f64")]
    pub bid_size: Option<f64>,
    #[serde(default, alias = "askSize", alias = "S", deserialize_with = "lenient_f64")]
    pub ask_size: Option<f64>,
}

impl PolygonQuote {
    pub fn fields(&self) -> QuoteFields {
        QuoteFields {
            bid: self.bid,
            ask: self.ask,
            bid_size: self.bid_size,
            ask_size: self.ask_size,
            ..Default::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct PolygonTrade {
    #[serde(default, alias = "p", deserialize_with = "lenient_f64")]
    pub price: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PolygonVolume {
    #[serde(default, alias = "v", deserialize_with = "lenient_f64")]
    pub volume: Option<f64>,
}

// GET /v2/last/nbbo/S
#[derive(Debug, Default, Deserialize)]
pub struct LastQuoteResponse {
    #[serde(default)]
    pub results: Option<PolygonQuote>,
}

// GET /v2/last/trade/S
#[derive(Debug, Default, Deserialize)]
pub struct LastTradeResponse {
    #[serde(default)]
    pub results: Option<PolygonTrade>,
}

// GET /v2/aggs/ticker/S/prev
#[derive(Debug, Default, Deserialize)]
pub struct AggregateResponse {
    #[serde(default)]
    pub results: Option<Vec<AggregateBar>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AggregateBar {
    #[serde(default, rename = "c", deserialize_with = "lenient_f64")]
    pub close: Option<f64>,
    #[serde(default, rename = "v", deserialize_with = "lenient_f64")]
    pub volume: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn v3_snapshot_array_with_snake_case_keys() {
        let body = json!({
            "results": [{
                "ticker": "AAPL",
                "last_quote": {"bid": 189.9, "ask": 190.1, "bid_size": 3, "ask_size": 5},
                "last_trade": {"price": 190.0, "size": 100},
                "session": {"volume": 51234567.0, "close": 190.0}
            }],
            "status": "OK"
        });
        let resp: SnapshotResponse = serde_json::from_value(body).unwrap();
        let fields = resp.results.and_then(OneOrMany::into_first).unwrap().fields();
        assert_eq!(fields.bid, Some(189.9));
        assert_eq!(fields.ask, Some(190.1));
        assert_eq!(fields.close, Some(190.0));
        assert_eq!(fields.volume, Some(51234567.0));
        assert_eq!(fields.bid_size, Some(3.0));
        assert_eq!(fields.ask_size, Some(5.0));
    }

    #[test]
    fn camel_case_object_results() {
        let body = json!({
            "results": {
                "lastQuote": {"bid": 10.0, "ask": 12.0, "bidSize": 1, "askSize": 2},
                "lastTrade": {"price": 11.0},
                "day": {"volume": 1000}
            }
        });
        let resp: SnapshotResponse = serde_json::from_value(body).unwrap();
        let fields = resp.results.and_then(OneOrMany::into_first).unwrap().fields();
        assert_eq!(fields.bid, Some(10.0));
        assert_eq!(fields.volume, Some(1000.0));
        assert_eq!(fields.bid_size, Some(1.0));
    }

    #[test]
    fn v2_single_letter_quote_keys() {
        let body = json!({"results": {"p": 99.5, "P": 100.5, "s": 4, "S": 7, "T": "AAPL"}});
        let resp: LastQuoteResponse = serde_json::from_value(body).unwrap();
        let fields = resp.results.unwrap().fields();
        assert_eq!(fields.bid, Some(99.5));
        assert_eq!(fields.ask, Some(100.5));
        assert_eq!(fields.bid_size, Some(4.0));
        assert_eq!(fields.ask_size, Some(7.0));
    }

    #[test]
    fn missing_results_are_not_errors() {
        let resp: SnapshotResponse = serde_json::from_value(json!({"status": "NOT_FOUND"})).unwrap();
        assert!(resp.results.is_none());
        let resp: AggregateResponse =
            serde_json::from_value(json!({"results": [], "resultsCount": 0})).unwrap();
        assert!(resp.results.unwrap().is_empty());
    }

    #[test]
    fn aggregate_bar_short_keys() {
        let resp: AggregateResponse =
            serde_json::from_value(json!({"results": [{"c": 187.2, "v": 4.2e7, "o": 185.0}]})).unwrap();
        let bar = &resp.results.unwrap()[0];
        assert_eq!(bar.close, Some(187.2));
        assert_eq!(bar.volume, Some(4.2e7));
    }
}

// Binance adapter: generic orderbook client plus the forex quote source
// built on top of it.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, instrument};

use super::binance_types::{parse_depth, ApiErrorPayload, DepthPayload, Ticker24h};
use super::{http_client, send_json, FetchError, QuoteSource, SourceError};
use crate::config::BinanceSettings;
use crate::market_data::order_book::OrderBook;
use crate::market_data::snapshot::{capture_timestamp, InstrumentSnapshot, QuoteFields};

/// Failures of the `/api/v3/depth` endpoint.
///
/// `Api` means the venue understood the request and refused it;
/// `MissingKeys`/`Json` mean it sent something we do not understand.
#[derive(Debug, Error)]
pub enum OrderbookError {
    #[error("network error while fetching orderbook for {symbol}: {message}")]
    Network { symbol: String, message: String },

    #[error("HTTP {status} fetching {symbol} orderbook: {body}")]
    Status { symbol: String, status: u16, body: String },

    #[error("API error for {symbol}: code={code} msg={msg}")]
    Api { symbol: String, code: i64, msg: String },

    #[error("invalid JSON response for {symbol} orderbook: {message}")]
    Json { symbol: String, message: String },

    #[error("orderbook keys missing for {symbol}; response keys: {keys:?}")]
    MissingKeys { symbol: String, keys: Vec<String> },
}

impl OrderbookError {
    /// HTTP 451: the venue refuses to serve this region.
    pub fn is_region_restricted(&self) -> bool {
        match self {
            OrderbookError::Status { status, body, .. } => {
                *status == 451 || body.contains("restricted location")
            }
            OrderbookError::Api { msg, .. } => msg.contains("restricted location"),
            _ => false,
        }
    }
}

impl From<OrderbookError> for FetchError {
    fn from(e: OrderbookError) -> Self {
        match e {
            OrderbookError::Api { code, msg, .. } => FetchError::Api { code, msg },
            OrderbookError::Network { .. } | OrderbookError::Status { .. } => {
                FetchError::Transport(e.to_string())
            }
            OrderbookError::Json { .. } | OrderbookError::MissingKeys { .. } => {
                FetchError::Schema(e.to_string())
            }
        }
    }
}

/// Client for a Binance-style REST API.
#[derive(Debug, Clone)]
pub struct MarketApi {
    client: reqwest::Client,
    base_url: String, // "https://api.binance.com"
}

impl MarketApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `GET {base}/api/v3/depth?symbol=S&limit=N`.
    #[instrument(skip(self))]
    pub async fn get_orderbook(&self, symbol: &str, limit: u32) -> Result<OrderBook, OrderbookError> {
        let url = format!("{}/api/v3/depth", self.base_url);
        let limit = limit.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[("symbol", symbol), ("limit", limit.as_str())])
            .send()
            .await
            .map_err(|e| OrderbookError::Network {
                symbol: symbol.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| OrderbookError::Network {
            symbol: symbol.to_string(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            // surface the venue's own error JSON when it sent one
            return Err(match serde_json::from_str::<ApiErrorPayload>(&body) {
                Ok(err) if status.as_u16() != 451 => OrderbookError::Api {
                    symbol: symbol.to_string(),
                    code: err.code,
                    msg: err.msg,
                },
                _ => OrderbookError::Status {
                    symbol: symbol.to_string(),
                    status: status.as_u16(),
                    body,
                },
            });
        }

        let data: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| OrderbookError::Json {
                symbol: symbol.to_string(),
                message: e.to_string(),
            })?;

        match parse_depth(&data) {
            DepthPayload::Book(book) => {
                debug!(bids = book.bids.len(), asks = book.asks.len(), "orderbook fetched");
                Ok(book)
            }
            DepthPayload::ApiError { code, msg } => Err(OrderbookError::Api {
                symbol: symbol.to_string(),
                code,
                msg,
            }),
            DepthPayload::MissingKeys(keys) => Err(OrderbookError::MissingKeys {
                symbol: symbol.to_string(),
                keys,
            }),
        }
    }

    /// `GET {base}/api/v3/ticker/24hr?symbol=S`.
    pub async fn ticker_24h(&self, symbol: &str) -> Result<Ticker24h, FetchError> {
        let request = self
            .client
            .get(format!("{}/api/v3/ticker/24hr", self.base_url))
            .query(&[("symbol", symbol)]);
        send_json(request).await
    }
}

/// Forex pairs quoted off the Binance book; close and volume come from the
/// 24h ticker when it answers.
pub struct ForexSource {
    api: MarketApi,
    depth_limit: u32,
    latency_ms: u64,
}

impl ForexSource {
    pub fn new(settings: &BinanceSettings) -> Result<Self, SourceError> {
        Ok(Self {
            api: MarketApi::with_client(http_client(settings.timeout_secs)?, &settings.base_url),
            depth_limit: settings.depth_limit,
            latency_ms: settings.latency_ms,
        })
    }
}

#[async_trait::async_trait]
impl QuoteSource for ForexSource {
    fn venue(&self) -> &'static str {
        "binance"
    }

    #[instrument(skip(self))]
    async fn try_fetch(&self, symbol: &str) -> Result<InstrumentSnapshot, FetchError> {
        let book = self.api.get_orderbook(symbol, self.depth_limit).await?;
        let (top_bid, top_ask) = book.bbo();

        let mut fields = QuoteFields {
            bid: top_bid.map(|l| l.price),
            ask: top_ask.map(|l| l.price),
            bid_size: top_bid.map(|l| l.quantity),
            ask_size: top_ask.map(|l| l.quantity),
            ..Default::default()
        };

        match self.api.ticker_24h(symbol).await {
            Ok(ticker) => fields.backfill(QuoteFields {
                close: ticker.last_price,
                volume: ticker.volume,
                ..Default::default()
            }),
            Err(e) => debug!(error = %e, "24h ticker backfill failed"),
        }

        if fields.is_empty() {
            return Err(FetchError::NotFound { symbol: symbol.to_string() });
        }
        Ok(fields.into_snapshot(symbol, self.latency_ms, capture_timestamp()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_errors_stay_distinct_from_schema_errors() {
        let api = OrderbookError::Api { symbol: "X".into(), code: -1121, msg: "Invalid symbol.".into() };
        assert!(matches!(FetchError::from(api), FetchError::Api { code: -1121, .. }));

        let keys = OrderbookError::MissingKeys { symbol: "X".into(), keys: vec!["foo".into()] };
        assert!(matches!(FetchError::from(keys), FetchError::Schema(_)));

        let status = OrderbookError::Status { symbol: "X".into(), status: 502, body: String::new() };
        assert!(matches!(FetchError::from(status), FetchError::Transport(_)));
    }

    #[test]
    fn region_restriction_detection() {
        let e = OrderbookError::Status {
            symbol: "BTCUSDT".into(),
            status: 451,
            body: r#"{"code":0,"msg":"Service unavailable from a restricted location"}"#.into(),
        };
        assert!(e.is_region_restricted());

        let e = OrderbookError::Status { symbol: "BTCUSDT".into(), status: 500, body: "oops".into() };
        assert!(!e.is_region_restricted());
    }

    #[test]
    fn error_messages_embed_upstream_details() {
        let e = OrderbookError::Api { symbol: "FOO".into(), code: -1100, msg: "Illegal characters".into() };
        assert_eq!(e.to_string(), "API error for FOO: code=-1100 msg=Illegal characters");
    }
}

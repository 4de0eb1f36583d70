// Shared trait + errors for market data adapters

use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::config::Settings;
use crate::market_data::snapshot::InstrumentSnapshot;
use crate::market_data::universe::Market;

/// Why an adapter could not produce a usable snapshot.
///
/// The batch fetcher only ever sees `Option`: every variant collapses to
/// `None` at [`QuoteSource::fetch_snapshot`] and is retried the same way.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Well-formed answer(s) without a single core field.
    #[error("no usable fields for {symbol}")]
    NotFound { symbol: String },

    /// Network error or non-2xx status.
    #[error("transport error: {0}")]
    Transport(String),

    /// The venue answered with something we could not decode.
    #[error("unexpected payload: {0}")]
    Schema(String),

    /// The venue rejected the request and said why.
    #[error("upstream error code={code} msg={msg}")]
    Api { code: i64, msg: String },
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            FetchError::Schema(e.to_string())
        } else {
            FetchError::Transport(e.to_string())
        }
    }
}

/// Errors building a source from settings.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// One venue's quote capability.
#[async_trait::async_trait]
pub trait QuoteSource: Send + Sync {
    /// Short venue name for logs and metric labels.
    fn venue(&self) -> &'static str;

    async fn try_fetch(&self, symbol: &str) -> Result<InstrumentSnapshot, FetchError>;

    /// `None` when the venue gave nothing usable, for whatever reason.
    async fn fetch_snapshot(&self, symbol: &str) -> Option<InstrumentSnapshot> {
        match self.try_fetch(symbol).await {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(venue = self.venue(), symbol, error = %e, "snapshot unavailable");
                None
            }
        }
    }
}

/// Build the source for `market` from explicit settings.
pub fn build_source(market: Market, settings: &Settings) -> Result<Box<dyn QuoteSource>, SourceError> {
    let source: Box<dyn QuoteSource> = match market {
        Market::Us => Box::new(polygon::PolygonSource::new(&settings.polygon)?),
        Market::India => Box::new(dhan::DhanSource::new(&settings.dhan)?),
        Market::Forex => Box::new(binance::ForexSource::new(&settings.binance)?),
    };
    Ok(source)
}

pub(crate) fn http_client(timeout_secs: u64) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .build()
}

// Send, require 2xx, decode JSON. Body is read as text first so a decode
// failure reports as Schema rather than Transport.
pub(crate) async fn send_json<T: serde::de::DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, FetchError> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(FetchError::Transport(format!("HTTP {}: {}", status.as_u16(), body)));
    }
    serde_json::from_str(&body).map_err(|e| FetchError::Schema(e.to_string()))
}

pub mod binance;
pub mod binance_types;
pub mod dhan;
pub mod dhan_types;
pub mod polygon;
pub mod polygon_types;

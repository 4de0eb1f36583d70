// Polygon adapter: US equities.
//
// One snapshot call, then backfill calls for whatever is still missing:
// last NBBO for the quote, last trade for the close, previous-day aggregate
// for close/volume. Earlier answers are never overwritten.

use tracing::{debug, instrument};

use super::polygon_types::{
    AggregateResponse, LastQuoteResponse, LastTradeResponse, OneOrMany, SnapshotResponse,
};
use super::{http_client, send_json, FetchError, QuoteSource, SourceError};
use crate::config::PolygonSettings;
use crate::market_data::snapshot::{capture_timestamp, InstrumentSnapshot, QuoteFields};

pub struct PolygonSource {
    client: reqwest::Client,
    base_url: String, // "https://api.polygon.io"
    api_key: String,
    snapshot_latency_ms: u64,
    aggregate_latency_ms: u64,
}

impl PolygonSource {
    pub fn new(settings: &PolygonSettings) -> Result<Self, SourceError> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(SourceError::MissingCredential("polygon.api_key"))?;
        Ok(Self {
            client: http_client(settings.timeout_secs)?,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key,
            snapshot_latency_ms: settings.snapshot_latency_ms,
            aggregate_latency_ms: settings.aggregate_latency_ms,
        })
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        let request = self
            .client
            .get(&url)
            .query(query)
            .query(&[("apiKey", self.api_key.as_str())]);
        send_json(request).await
    }

    // 1) GET /v3/snapshot?ticker=S
    async fn snapshot(&self, symbol: &str) -> Result<QuoteFields, FetchError> {
        let resp: SnapshotResponse = self.get("/v3/snapshot", &[("ticker", symbol)]).await?;
        Ok(resp
            .results
            .and_then(OneOrMany::into_first)
            .map(|r| r.fields())
            .unwrap_or_default())
    }

    // 2) GET /v2/last/nbbo/S
    async fn last_quote(&self, symbol: &str) -> Result<QuoteFields, FetchError> {
        let resp: LastQuoteResponse = self.get(&format!("/v2/last/nbbo/{symbol}"), &[]).await?;
        Ok(resp.results.map(|q| q.fields()).unwrap_or_default())
    }

    // 3) GET /v2/last/trade/S
    async fn last_trade(&self, symbol: &str) -> Result<QuoteFields, FetchError> {
        let resp: LastTradeResponse = self.get(&format!("/v2/last/trade/{symbol}"), &[]).await?;
        Ok(QuoteFields {
            close: resp.results.and_then(|t| t.price),
            ..Default::default()
        })
    }

    // 4) GET /v2/aggs/ticker/S/prev
    async fn previous_aggregate(&self, symbol: &str) -> Result<QuoteFields, FetchError> {
        let resp: AggregateResponse = self
            .get(&format!("/v2/aggs/ticker/{symbol}/prev"), &[])
            .await?;
        let bar = resp.results.and_then(|bars| bars.into_iter().next());
        Ok(QuoteFields {
            close: bar.as_ref().and_then(|b| b.close),
            volume: bar.as_ref().and_then(|b| b.volume),
            ..Default::default()
        })
    }
}

#[async_trait::async_trait]
impl QuoteSource for PolygonSource {
    fn venue(&self) -> &'static str {
        "polygon"
    }

    #[instrument(skip(self))]
    async fn try_fetch(&self, symbol: &str) -> Result<InstrumentSnapshot, FetchError> {
        let mut fields = QuoteFields::default();
        let mut primary_error = None;

        match self.snapshot(symbol).await {
            Ok(f) => fields.backfill(f),
            Err(e) => {
                debug!(error = %e, "snapshot call failed, trying backfill endpoints");
                primary_error = Some(e);
            }
        }

        if !fields.has_quote() {
            match self.last_quote(symbol).await {
                Ok(f) => fields.backfill(f),
                Err(e) => debug!(error = %e, "last quote backfill failed"),
            }
        }

        if fields.close.is_none() {
            match self.last_trade(symbol).await {
                Ok(f) => fields.backfill(f),
                Err(e) => debug!(error = %e, "last trade backfill failed"),
            }
        }

        let mut latency_ms = self.snapshot_latency_ms;
        if fields.close.is_none() || fields.volume.is_none() {
            let had_data = !fields.is_empty();
            match self.previous_aggregate(symbol).await {
                Ok(f) => {
                    if !had_data && !f.is_empty() {
                        latency_ms = self.aggregate_latency_ms;
                    }
                    fields.backfill(f);
                }
                Err(e) => debug!(error = %e, "previous aggregate backfill failed"),
            }
        }

        if fields.is_empty() {
            return Err(primary_error.unwrap_or_else(|| FetchError::NotFound {
                symbol: symbol.to_string(),
            }));
        }

        debug!(?fields, latency_ms, "polygon snapshot assembled");
        Ok(fields.into_snapshot(symbol, latency_ms, capture_timestamp()))
    }
}

// Dhan adapter: Indian equities.
//
// Until the account's market-data add-on is active the venue runs in
// placeholder mode and answers every symbol with a fixed, empty row that
// carries a status marker. That row is a valid result, not a failure.

use tracing::{debug, instrument};

use super::dhan_types::{QuoteRequest, QuoteResponse};
use super::{http_client, send_json, FetchError, QuoteSource, SourceError};
use crate::config::DhanSettings;
use crate::market_data::snapshot::{capture_timestamp, InstrumentSnapshot};

enum Mode {
    Placeholder { marker: String },
    Live(LiveClient),
}

struct LiveClient {
    client: reqwest::Client,
    base_url: String, // "https://api.dhan.co"
    client_id: String,
    access_token: String,
    segment: String,
    latency_ms: u64,
}

pub struct DhanSource {
    mode: Mode,
}

impl DhanSource {
    pub fn new(settings: &DhanSettings) -> Result<Self, SourceError> {
        if !settings.live {
            return Ok(Self::placeholder(&settings.status_marker));
        }

        let client_id = settings
            .client_id
            .clone()
            .filter(|v| !v.is_empty())
            .ok_or(SourceError::MissingCredential("dhan.client_id"))?;
        let access_token = settings
            .access_token
            .clone()
            .filter(|v| !v.is_empty())
            .ok_or(SourceError::MissingCredential("dhan.access_token"))?;

        Ok(Self {
            mode: Mode::Live(LiveClient {
                client: http_client(settings.timeout_secs)?,
                base_url: settings.base_url.trim_end_matches('/').to_string(),
                client_id,
                access_token,
                segment: settings.exchange_segment.clone(),
                latency_ms: settings.latency_ms,
            }),
        })
    }

    pub fn placeholder(marker: &str) -> Self {
        Self {
            mode: Mode::Placeholder { marker: marker.to_string() },
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.mode, Mode::Placeholder { .. })
    }
}

impl LiveClient {
    async fn fetch(&self, security_id: &str) -> Result<InstrumentSnapshot, FetchError> {
        // Dhan keys securities by numeric id; pass anything else through untouched
        let id = security_id
            .parse::<u64>()
            .map(serde_json::Value::from)
            .unwrap_or_else(|_| serde_json::Value::from(security_id));
        let body: QuoteRequest = [(self.segment.clone(), vec![id])].into_iter().collect();

        let request = self
            .client
            .post(format!("{}/v2/marketfeed/quote", self.base_url))
            .header("access-token", &self.access_token)
            .header("client-id", &self.client_id)
            .header("Accept", "application/json")
            .json(&body);
        let resp: QuoteResponse = send_json(request).await?;

        let fields = resp
            .quote(&self.segment, security_id)
            .map(|q| q.fields())
            .unwrap_or_default();
        if fields.is_empty() {
            return Err(FetchError::NotFound { symbol: security_id.to_string() });
        }

        debug!(?fields, "dhan quote assembled");
        Ok(fields.into_snapshot(security_id, self.latency_ms, capture_timestamp()))
    }
}

#[async_trait::async_trait]
impl QuoteSource for DhanSource {
    fn venue(&self) -> &'static str {
        "dhan"
    }

    #[instrument(skip(self))]
    async fn try_fetch(&self, symbol: &str) -> Result<InstrumentSnapshot, FetchError> {
        match &self.mode {
            Mode::Placeholder { marker } => Ok(InstrumentSnapshot::placeholder(symbol, marker)),
            Mode::Live(client) => client.fetch(symbol).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::quality::Quality;

    #[tokio::test]
    async fn placeholder_never_fails() {
        let source = DhanSource::new(&DhanSettings::default()).unwrap();
        assert!(source.is_placeholder());

        let snap = source.fetch_snapshot("RELIANCE").await.unwrap();
        assert_eq!(snap.symbol(), "RELIANCE");
        assert_eq!(snap.quality(), Quality::Missing);
        assert_eq!(snap.status(), Some("KYC Pending"));
        assert_eq!(snap.bid(), None);
        assert_eq!(snap.depth3(), 0.0);
    }

    #[test]
    fn live_mode_needs_credentials() {
        let settings = DhanSettings { live: true, ..Default::default() };
        assert!(matches!(
            DhanSource::new(&settings),
            Err(SourceError::MissingCredential("dhan.client_id"))
        ));

        let settings = DhanSettings {
            live: true,
            client_id: Some("100".into()),
            ..Default::default()
        };
        assert!(matches!(
            DhanSource::new(&settings),
            Err(SourceError::MissingCredential("dhan.access_token"))
        ));
    }
}

//! Batch fetcher: one pass over every instrument, then exactly one retry
//! pass over the failures after a fixed delay.
//!
//! Fetches run one after another; the delay blocks the whole batch. There
//! is no backoff and nothing is cached between calls.

use std::time::Duration;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::market_data::adapters::QuoteSource;
use crate::market_data::snapshot::InstrumentSnapshot;

pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// First-pass successes, then retry successes; `failed` holds
/// `(display name, symbol)` for whatever still failed after the retry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchResult {
    pub success: Vec<InstrumentSnapshot>,
    pub failed: Vec<(String, String)>,
}

#[derive(Debug, Clone)]
pub struct BatchFetcher {
    retry_delay: Duration,
}

impl Default for BatchFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_RETRY_DELAY)
    }
}

impl BatchFetcher {
    pub fn new(retry_delay: Duration) -> Self {
        Self { retry_delay }
    }

    #[instrument(skip_all, fields(venue = source.venue(), instruments = instruments.len()))]
    pub async fn fetch_multiple<S, N, Y>(&self, source: &S, instruments: &[(N, Y)]) -> BatchResult
    where
        S: QuoteSource + ?Sized,
        N: AsRef<str>,
        Y: AsRef<str>,
    {
        let mut result = BatchResult::default();

        for (name, symbol) in instruments {
            let (name, symbol) = (name.as_ref(), symbol.as_ref());
            match Self::attempt(source, name, symbol).await {
                Some(snapshot) => result.success.push(snapshot),
                None => result.failed.push((name.to_string(), symbol.to_string())),
            }
        }

        if !result.failed.is_empty() {
            info!(
                failed = result.failed.len(),
                delay_ms = self.retry_delay.as_millis() as u64,
                "retrying failed instruments once"
            );
            tokio::time::sleep(self.retry_delay).await;

            let first_pass_failures = std::mem::take(&mut result.failed);
            for (name, symbol) in first_pass_failures {
                metrics::counter!("liqx_fetch_retries_total", "venue" => source.venue()).increment(1);
                match Self::attempt(source, &name, &symbol).await {
                    Some(snapshot) => result.success.push(snapshot),
                    None => {
                        warn!(name = %name, symbol = %symbol, "instrument failed after retry");
                        result.failed.push((name, symbol));
                    }
                }
            }
        }

        info!(
            success = result.success.len(),
            failed = result.failed.len(),
            "batch fetch complete"
        );
        result
    }

    async fn attempt<S>(source: &S, name: &str, symbol: &str) -> Option<InstrumentSnapshot>
    where
        S: QuoteSource + ?Sized,
    {
        metrics::counter!("liqx_fetch_attempts_total", "venue" => source.venue()).increment(1);
        let snapshot = source.fetch_snapshot(symbol).await;
        if snapshot.is_none() {
            metrics::counter!("liqx_fetch_failures_total", "venue" => source.venue()).increment(1);
        }
        snapshot.map(|s| s.identify(name, symbol))
    }
}

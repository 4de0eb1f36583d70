//! Layered settings: built-in defaults, then an optional `liqx.toml`, then
//! `LIQX__SECTION__KEY` environment variables.
//!
//! Venue selection is not part of the settings; callers pass a [`Market`]
//! alongside them when building a source.
//!
//! [`Market`]: crate::market_data::Market

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;

pub use config::ConfigError;

const DEFAULT_FILE_STEM: &str = "liqx";
const ENV_PREFIX: &str = "LIQX";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub polygon: PolygonSettings,
    pub dhan: DhanSettings,
    pub binance: BinanceSettings,
    pub batch: BatchSettings,
    pub log: LogSettings,
    pub telemetry: TelemetrySettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolygonSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    /// Synthetic latency tagged on rows built from the snapshot endpoint.
    pub snapshot_latency_ms: u64,
    /// Synthetic latency when only the previous-day aggregate answered.
    pub aggregate_latency_ms: u64,
    pub timeout_secs: u64,
}

impl Default for PolygonSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.polygon.io".into(),
            api_key: None,
            snapshot_latency_ms: 10,
            aggregate_latency_ms: 20,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DhanSettings {
    pub base_url: String,
    pub client_id: Option<String>,
    pub access_token: Option<String>,
    /// `false` keeps the venue on its placeholder rows.
    pub live: bool,
    pub exchange_segment: String,
    pub status_marker: String,
    pub latency_ms: u64,
    pub timeout_secs: u64,
}

impl Default for DhanSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.dhan.co".into(),
            client_id: None,
            access_token: None,
            live: false,
            exchange_segment: "NSE_EQ".into(),
            status_marker: "KYC Pending".into(),
            latency_ms: 20,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BinanceSettings {
    pub base_url: String,
    pub depth_limit: u32,
    pub latency_ms: u64,
    pub timeout_secs: u64,
}

impl Default for BinanceSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.binance.com".into(),
            depth_limit: 50,
            latency_ms: 15,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    pub retry_delay_ms: u64,
}

impl BatchSettings {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self { retry_delay_ms: 2_000 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self { filter: "info".into() }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelemetrySettings {
    /// Port for the Prometheus listener (only with the `metrics-exporter` feature).
    pub metrics_port: u16,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self { metrics_port: 9000 }
    }
}

impl Settings {
    /// Load settings. An explicit `path` must exist; without one,
    /// `./liqx.toml` is read when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_FILE_STEM).required(false),
        };

        Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

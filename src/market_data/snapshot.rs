//! The venue-independent snapshot record.
//!
//! Adapters collect whatever their venue returned into [`QuoteFields`] and
//! turn it into an [`InstrumentSnapshot`] through [`QuoteFields::into_snapshot`],
//! which is the only place the derived prices and `depth3` are computed.

use serde::Serialize;

use crate::market_data::quality::{classify_fields, Quality};

/// Timestamp format used for capture times.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Local wall-clock capture time.
pub fn capture_timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Raw fields an adapter managed to pull from its venue.
///
/// `bid_size`/`ask_size` become `depth1`/`depth2` and default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct QuoteFields {
    pub bid: Option<f64>,
    pub ask: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
    pub bid_size: Option<f64>,
    pub ask_size: Option<f64>,
}

impl QuoteFields {
    /// True when none of bid, ask, close or volume is present.
    pub fn is_empty(&self) -> bool {
        self.bid.is_none() && self.ask.is_none() && self.close.is_none() && self.volume.is_none()
    }

    pub fn has_quote(&self) -> bool {
        self.bid.is_some() && self.ask.is_some()
    }

    /// Fill the fields still absent from a later, less authoritative call.
    /// Fields already present are never overwritten.
    pub fn backfill(&mut self, later: QuoteFields) {
        self.bid = self.bid.or(later.bid);
        self.ask = self.ask.or(later.ask);
        self.close = self.close.or(later.close);
        self.volume = self.volume.or(later.volume);
        self.bid_size = self.bid_size.or(later.bid_size);
        self.ask_size = self.ask_size.or(later.ask_size);
    }

    pub fn into_snapshot(
        self,
        symbol: impl Into<String>,
        execution_time_ms: u64,
        timestamp: String,
    ) -> InstrumentSnapshot {
        let expected_price = match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some((bid + ask) / 2.0),
            _ => self.close,
        };
        let execution_price = self.ask.or(self.close);
        let depth1 = self.bid_size.unwrap_or(0.0);
        let depth2 = self.ask_size.unwrap_or(0.0);

        InstrumentSnapshot {
            bid: self.bid,
            ask: self.ask,
            close: self.close,
            volume: self.volume,
            depth1,
            depth2,
            depth3: depth1 + depth2,
            expected_price,
            execution_price,
            execution_time_ms,
            timestamp,
            company: String::new(),
            symbol: symbol.into(),
            quality: classify_fields(self.bid, self.ask, self.close, self.volume),
            status: None,
        }
    }
}

/// One quote/orderbook reading for one instrument.
///
/// Fields are read through accessors so `depth3`, `expected_price` and
/// `execution_price` always agree with the raw fields they derive from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentSnapshot {
    bid: Option<f64>,
    ask: Option<f64>,
    close: Option<f64>,
    volume: Option<f64>,
    depth1: f64,
    depth2: f64,
    depth3: f64,
    expected_price: Option<f64>,
    execution_price: Option<f64>,
    execution_time_ms: u64,
    timestamp: String,
    company: String,
    symbol: String,
    quality: Quality,
    status: Option<String>,
}

impl InstrumentSnapshot {
    /// Fixed row for a venue whose data feed is not active yet. Every
    /// numeric field is empty and the marker doubles as the timestamp.
    pub fn placeholder(symbol: impl Into<String>, marker: &str) -> Self {
        let mut snapshot = QuoteFields::default().into_snapshot(symbol, 0, marker.to_string());
        snapshot.status = Some(marker.to_string());
        snapshot
    }

    /// Attach the display name and venue identifier, and re-tag quality.
    pub fn identify(mut self, company: impl Into<String>, symbol: impl Into<String>) -> Self {
        self.company = company.into();
        self.symbol = symbol.into();
        self.quality = classify_fields(self.bid, self.ask, self.close, self.volume);
        self
    }

    pub fn bid(&self) -> Option<f64> {
        self.bid
    }

    pub fn ask(&self) -> Option<f64> {
        self.ask
    }

    pub fn close(&self) -> Option<f64> {
        self.close
    }

    pub fn volume(&self) -> Option<f64> {
        self.volume
    }

    /// Top bid size.
    pub fn depth1(&self) -> f64 {
        self.depth1
    }

    /// Top ask size.
    pub fn depth2(&self) -> f64 {
        self.depth2
    }

    pub fn depth3(&self) -> f64 {
        self.depth3
    }

    pub fn expected_price(&self) -> Option<f64> {
        self.expected_price
    }

    pub fn execution_price(&self) -> Option<f64> {
        self.execution_price
    }

    pub fn execution_time_ms(&self) -> u64 {
        self.execution_time_ms
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// `ask - bid` when both sides are quoted.
    pub fn spread(&self) -> Option<f64> {
        match (self.bid, self.ask) {
            (Some(bid), Some(ask)) => Some(ask - bid),
            _ => None,
        }
    }

    /// No core field at all.
    pub fn is_empty(&self) -> bool {
        self.bid.is_none() && self.ask.is_none() && self.close.is_none() && self.volume.is_none()
    }
}

//! Liquidity analysis over heterogeneous market-data venues.
//!
//! `market_data` turns venue quote/orderbook responses into one
//! `InstrumentSnapshot` shape and batches fetches with a single retry pass;
//! `liquidity` computes spread, Amihud, imbalance and Kyle's lambda over
//! tables or order books; `report` writes the results out.

pub mod config;
pub mod liquidity;
pub mod market_data;
pub mod report;
pub mod telemetry;

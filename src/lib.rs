//! Incremental order-book synchronization.
//!
//! [`sync`] holds the protocol: per-symbol update-id tracking, gap detection and the
//! dispatcher that drives a book store. [`market_data`] supplies an in-memory book
//! store, the adapter seam and a router that runs a feed end to end.

pub mod config;
pub mod error;
pub mod market_data;
pub mod sync;
pub mod telemetry;

pub use error::{Error, Result};

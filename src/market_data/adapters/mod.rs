// Shared trait + event for market data adapters

use crate::error::Result;
use crate::sync::{BookSnapshot, DeltaUpdate};

/// Already-decoded book events, keyed by venue symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketEvent {
    // Full baseline; re-seeds the symbol's sequence state
    Snapshot { symbol: String, snapshot: BookSnapshot },
    // Incremental update checked against the sequence state
    Delta { symbol: String, update: DeltaUpdate },
}

impl MarketEvent {
    pub fn symbol(&self) -> &str {
        match self {
            MarketEvent::Snapshot { symbol, .. } | MarketEvent::Delta { symbol, .. } => symbol,
        }
    }
}

#[async_trait::async_trait]
pub trait VenueAdapter {
    // Push events into the router until the source is exhausted or the receiver hangs up.
    async fn spawn(&self, tx: tokio::sync::mpsc::Sender<MarketEvent>) -> Result<()>;
}

pub mod replay;
pub mod replay_types;

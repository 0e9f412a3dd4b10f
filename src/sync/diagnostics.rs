use crate::sync::state::FeedId;

pub const SEQUENCE_GAP: &str = "sequence_gap";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapEvent {
    pub feed: FeedId,
    pub symbol: String,
    pub reason: &'static str,
}

impl GapEvent {
    pub fn sequence_gap(feed: &FeedId, symbol: &str) -> Self {
        Self { feed: feed.clone(), symbol: symbol.to_string(), reason: SEQUENCE_GAP }
    }
}

pub trait Diagnostics {
    fn sequence_gap(&mut self, event: &GapEvent);
}

/// Writes gaps to `tracing` at warn level and counts them.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
    fn sequence_gap(&mut self, event: &GapEvent) {
        tracing::warn!(
            feed = %event.feed,
            symbol = %event.symbol,
            reason = event.reason,
            "missing book update detected, resetting book"
        );
        metrics::counter!("bookseq_sequence_gaps_total", "feed" => event.feed.to_string()).increment(1);
    }
}

// Keeps every event in memory
#[derive(Debug, Default, Clone)]
pub struct RecordingDiagnostics {
    pub events: Vec<GapEvent>,
}

impl Diagnostics for RecordingDiagnostics {
    fn sequence_gap(&mut self, event: &GapEvent) {
        self.events.push(event.clone());
    }
}

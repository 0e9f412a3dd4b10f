use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::Mutex;
use serde::Serialize;

use crate::sync::diagnostics::{Diagnostics, GapEvent, TracingDiagnostics};
use crate::sync::state::{BookDiff, BookSnapshot, DeltaUpdate, FeedId, SymbolSyncState};
use crate::sync::tracker::{SequenceTracker, SyncDecision};

// Book storage the dispatcher drives. Calls never fail.
pub trait BookStore {
    fn apply_snapshot(&mut self, symbol: &str, snapshot: &BookSnapshot);
    fn apply_diff(&mut self, symbol: &str, diff: &BookDiff);
    fn discard_snapshot(&mut self, symbol: &str);
}

impl<S: BookStore> BookStore for Arc<Mutex<S>> {
    fn apply_snapshot(&mut self, symbol: &str, snapshot: &BookSnapshot) {
        self.lock().apply_snapshot(symbol, snapshot);
    }

    fn apply_diff(&mut self, symbol: &str, diff: &BookDiff) {
        self.lock().apply_diff(symbol, diff);
    }

    fn discard_snapshot(&mut self, symbol: &str) {
        self.lock().discard_snapshot(symbol);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Applied { first: bool }, // first = the update that synchronized the symbol
    Rejected,
    ResetTriggered,
}

impl DispatchOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            DispatchOutcome::Applied { .. } => "applied",
            DispatchOutcome::Rejected => "rejected",
            DispatchOutcome::ResetTriggered => "reset",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    pub applied: u64,
    pub rejected: u64,
    pub resets: u64,
    pub snapshots: u64,
}

/// Routes deltas through a [`SequenceTracker`] and into a [`BookStore`].
///
/// All symbols share one `&mut self` path, so per-symbol evaluations never overlap
/// and a reset's side effects land before the next delta for that symbol is looked at.
pub struct UpdateDispatcher<S, D = TracingDiagnostics> {
    tracker: SequenceTracker,
    states: AHashMap<String, SymbolSyncState>,
    store: S,
    diagnostics: D,
    stats: DispatchStats,
}

impl<S: BookStore> UpdateDispatcher<S, TracingDiagnostics> {
    pub fn new(feed: FeedId, store: S) -> Self {
        Self::with_diagnostics(feed, store, TracingDiagnostics)
    }
}

impl<S: BookStore, D: Diagnostics> UpdateDispatcher<S, D> {
    pub fn with_diagnostics(feed: FeedId, store: S, diagnostics: D) -> Self {
        Self {
            tracker: SequenceTracker::new(feed),
            states: AHashMap::new(),
            store,
            diagnostics,
            stats: DispatchStats::default(),
        }
    }

    pub fn feed(&self) -> &FeedId {
        self.tracker.feed()
    }

    pub fn on_delta(&mut self, symbol: &str, update: &DeltaUpdate) -> DispatchOutcome {
        let state = self.states.entry(symbol.to_string()).or_default();

        let outcome = match self.tracker.evaluate(state, update) {
            SyncDecision::Accept { first } => {
                if first {
                    tracing::debug!(feed = %self.tracker.feed(), symbol, last_update_id = update.final_update_id, "book synchronized");
                }
                self.store.apply_diff(symbol, &update.diff);
                self.stats.applied += 1;
                DispatchOutcome::Applied { first }
            }
            SyncDecision::Skip => {
                self.stats.rejected += 1;
                DispatchOutcome::Rejected
            }
            SyncDecision::Gap => {
                self.store.discard_snapshot(symbol);
                self.diagnostics
                    .sequence_gap(&GapEvent::sequence_gap(self.tracker.feed(), symbol));
                self.stats.resets += 1;
                DispatchOutcome::ResetTriggered
            }
        };

        metrics::counter!(
            "bookseq_updates_total",
            "feed" => self.tracker.feed().to_string(),
            "outcome" => outcome.label()
        )
        .increment(1);
        outcome
    }

    // Next delta for `symbol` is judged against snapshot.last_update_id, unsynchronized
    pub fn on_snapshot(&mut self, symbol: &str, snapshot: &BookSnapshot) {
        self.states
            .insert(symbol.to_string(), SymbolSyncState::seeded(snapshot.last_update_id));
        self.store.apply_snapshot(symbol, snapshot);
        self.stats.snapshots += 1;
        tracing::debug!(
            feed = %self.tracker.feed(),
            symbol,
            last_update_id = snapshot.last_update_id,
            bids = snapshot.bids.len(),
            asks = snapshot.asks.len(),
            "snapshot loaded"
        );
    }

    pub fn state(&self, symbol: &str) -> Option<SymbolSyncState> {
        self.states.get(symbol).copied()
    }

    pub fn needs_snapshot(&self, symbol: &str) -> bool {
        !self.states.get(symbol).is_some_and(|s| s.synchronized)
    }

    // Whole-feed reset, e.g. after a reconnect. No gap warnings.
    pub fn reset_all(&mut self) {
        for (symbol, state) in self.states.iter_mut() {
            state.clear();
            self.store.discard_snapshot(symbol);
        }
        tracing::info!(feed = %self.tracker.feed(), symbols = self.states.len(), "all books reset");
    }

    pub fn symbols(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }

    pub fn stats(&self) -> DispatchStats {
        self.stats
    }

    pub fn book_store(&self) -> &S {
        &self.store
    }

    pub fn book_store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn diagnostics(&self) -> &D {
        &self.diagnostics
    }
}

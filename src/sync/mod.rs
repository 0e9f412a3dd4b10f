// Order-book sequence synchronization
pub mod state;       // per-symbol sync state + delta/snapshot messages
pub mod tracker;     // gap-detection decision table
pub mod diagnostics; // warning sink for sequence gaps
pub mod dispatcher;  // symbol -> state routing, book store driving

pub use diagnostics::{Diagnostics, GapEvent, RecordingDiagnostics, TracingDiagnostics};
pub use dispatcher::{BookStore, DispatchOutcome, DispatchStats, UpdateDispatcher};
pub use state::{BookDiff, BookSnapshot, DeltaUpdate, FeedId, Level, SymbolSyncState};
pub use tracker::{SequenceTracker, SyncDecision};

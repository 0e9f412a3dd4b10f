// Per-symbol sequence state and the messages the tracker reads.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeedId(String);

impl FeedId {
    pub const BINANCE_FUTURES: &'static str = "BINANCE_FUTURES";
    pub const BINANCE_DELIVERY: &'static str = "BINANCE_DELIVERY";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn binance_futures() -> Self {
        Self::new(Self::BINANCE_FUTURES)
    }

    pub fn binance_delivery() -> Self {
        Self::new(Self::BINANCE_DELIVERY)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sequence state for one symbol.
///
/// `last_update_id == 0` means no baseline has been seen yet. A fresh state and a
/// state that just went through a gap reset are indistinguishable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SymbolSyncState {
    pub last_update_id: u64,
    pub synchronized: bool,
}

impl SymbolSyncState {
    pub fn seeded(last_update_id: u64) -> Self {
        Self { last_update_id, synchronized: false }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Price level change: (price_ticks, size_lots). A size of 0 removes the level.
pub type Level = (i64, u64);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookDiff {
    pub bids: Vec<Level>,
    pub asks: Vec<Level>,
}

/// An incremental book update covering ids `[first_update_id, final_update_id]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaUpdate {
    pub first_update_id: u64,                // U
    pub final_update_id: u64,                // u
    pub previous_final_update_id: Option<u64>, // pu
    pub diff: BookDiff,
}

impl DeltaUpdate {
    pub fn new(first_update_id: u64, final_update_id: u64, previous_final_update_id: Option<u64>) -> Self {
        Self {
            first_update_id,
            final_update_id,
            previous_final_update_id,
            diff: BookDiff::default(),
        }
    }

    pub fn with_diff(mut self, diff: BookDiff) -> Self {
        self.diff = diff;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookSnapshot {
    pub last_update_id: u64,
    pub bids: Vec<Level>,
    pub asks: Vec<Level>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_unsynchronized() {
        let state = SymbolSyncState::default();
        assert_eq!(state.last_update_id, 0);
        assert!(!state.synchronized);
    }

    #[test]
    fn test_clear_matches_startup() {
        let mut state = SymbolSyncState { last_update_id: 42, synchronized: true };
        state.clear();
        assert_eq!(state, SymbolSyncState::default());
    }

    #[test]
    fn test_feed_id_display() {
        assert_eq!(FeedId::binance_futures().to_string(), "BINANCE_FUTURES");
        assert_eq!(FeedId::new("kraken").as_str(), "kraken");
    }
}

use crate::sync::state::{DeltaUpdate, FeedId, SymbolSyncState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDecision {
    Accept { first: bool },
    Skip, // stale, pre-snapshot
    Gap,  // state already cleared
}

impl SyncDecision {
    pub fn is_accept(&self) -> bool {
        matches!(self, SyncDecision::Accept { .. })
    }
}

/// Gap detection for a delta stream with `[U, u]` ranges and `pu` back-links.
///
/// Before synchronization, the first delta must straddle the snapshot id
/// (`U <= last <= u`). Once synchronized, every delta must name the last accepted
/// `u` as its `pu`. Anything else is a gap and forces a resync; holes are never
/// patched or reordered.
#[derive(Debug, Clone)]
pub struct SequenceTracker {
    feed: FeedId,
}

impl SequenceTracker {
    pub fn new(feed: FeedId) -> Self {
        Self { feed }
    }

    pub fn feed(&self) -> &FeedId {
        &self.feed
    }

    pub fn evaluate(&self, state: &mut SymbolSyncState, update: &DeltaUpdate) -> SyncDecision {
        let last = state.last_update_id;

        if !state.synchronized {
            if update.final_update_id < last {
                return SyncDecision::Skip;
            }
            if update.first_update_id <= last && last <= update.final_update_id {
                state.last_update_id = update.final_update_id;
                state.synchronized = true;
                return SyncDecision::Accept { first: true };
            }
        } else if update.previous_final_update_id == Some(last) {
            state.last_update_id = update.final_update_id;
            return SyncDecision::Accept { first: false };
        }

        tracing::trace!(
            feed = %self.feed,
            last_update_id = last,
            synchronized = state.synchronized,
            first_update_id = update.first_update_id,
            final_update_id = update.final_update_id,
            previous_final_update_id = ?update.previous_final_update_id,
            "sequence break"
        );
        state.clear();
        SyncDecision::Gap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> SequenceTracker {
        SequenceTracker::new(FeedId::binance_futures())
    }

    #[test]
    fn test_straddling_first_update_synchronizes() {
        let mut state = SymbolSyncState::seeded(100);
        let decision = tracker().evaluate(&mut state, &DeltaUpdate::new(95, 105, None));
        assert_eq!(decision, SyncDecision::Accept { first: true });
        assert_eq!(state, SymbolSyncState { last_update_id: 105, synchronized: true });
    }

    #[test]
    fn test_straddle_bounds_are_inclusive() {
        let t = tracker();

        let mut state = SymbolSyncState::seeded(100);
        assert!(t.evaluate(&mut state, &DeltaUpdate::new(100, 120, None)).is_accept());

        let mut state = SymbolSyncState::seeded(100);
        assert!(t.evaluate(&mut state, &DeltaUpdate::new(90, 100, None)).is_accept());
        assert_eq!(state.last_update_id, 100);
    }

    #[test]
    fn test_continuation_chains_on_pu() {
        let mut state = SymbolSyncState { last_update_id: 105, synchronized: true };
        let decision = tracker().evaluate(&mut state, &DeltaUpdate::new(106, 110, Some(105)));
        assert_eq!(decision, SyncDecision::Accept { first: false });
        assert_eq!(state, SymbolSyncState { last_update_id: 110, synchronized: true });
    }

    #[test]
    fn test_pu_mismatch_is_gap_and_clears() {
        let mut state = SymbolSyncState { last_update_id: 110, synchronized: true };
        let decision = tracker().evaluate(&mut state, &DeltaUpdate::new(115, 120, Some(112)));
        assert_eq!(decision, SyncDecision::Gap);
        assert_eq!(state, SymbolSyncState::default());
    }

    #[test]
    fn test_missing_pu_after_sync_is_gap() {
        let mut state = SymbolSyncState { last_update_id: 110, synchronized: true };
        assert_eq!(
            tracker().evaluate(&mut state, &DeltaUpdate::new(111, 120, None)),
            SyncDecision::Gap
        );
    }

    #[test]
    fn test_stale_before_sync_is_skipped() {
        let mut state = SymbolSyncState::seeded(50);
        let decision = tracker().evaluate(&mut state, &DeltaUpdate::new(10, 40, None));
        assert_eq!(decision, SyncDecision::Skip);
        assert_eq!(state, SymbolSyncState::seeded(50));
    }

    #[test]
    fn test_update_past_snapshot_is_gap() {
        // U > last: the deltas covering the snapshot id were missed.
        let mut state = SymbolSyncState::seeded(100);
        let decision = tracker().evaluate(&mut state, &DeltaUpdate::new(101, 130, None));
        assert_eq!(decision, SyncDecision::Gap);
        assert_eq!(state, SymbolSyncState::default());
    }

    #[test]
    fn test_fresh_state_resets_on_nonzero_range() {
        let mut state = SymbolSyncState::default();
        assert_eq!(
            tracker().evaluate(&mut state, &DeltaUpdate::new(5, 9, None)),
            SyncDecision::Gap
        );
    }

    #[test]
    fn test_synchronized_stale_replay_is_gap() {
        // No stale filter once synchronized; the pu chain is the only rule.
        let mut state = SymbolSyncState { last_update_id: 200, synchronized: true };
        assert_eq!(
            tracker().evaluate(&mut state, &DeltaUpdate::new(150, 160, Some(149))),
            SyncDecision::Gap
        );
    }
}

// Router orchestrates adapter + dispatcher + book
use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::mpsc;

use crate::error::Result;
use crate::market_data::adapters::{MarketEvent, VenueAdapter};
use crate::market_data::external_book::ExternalBooks;
use crate::sync::{BookStore, Diagnostics, DispatchOutcome, DispatchStats, FeedId, UpdateDispatcher};

/// Feed one event through the dispatcher. Snapshots have no outcome.
pub fn dispatch_event<S: BookStore, D: Diagnostics>(
    dispatcher: &mut UpdateDispatcher<S, D>,
    event: MarketEvent,
) -> Option<DispatchOutcome> {
    match event {
        MarketEvent::Snapshot { symbol, snapshot } => {
            dispatcher.on_snapshot(&symbol, &snapshot);
            None
        }
        MarketEvent::Delta { symbol, update } => Some(dispatcher.on_delta(&symbol, &update)),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub feed: String,
    pub stats: DispatchStats,
    /// Symbols left waiting for a snapshot when the source ended.
    pub needs_snapshot: Vec<String>,
}

/// Drive `adapter` to completion. Every symbol goes through one channel and one
/// dispatcher task, so per-symbol ordering is the adapter's send order.
pub async fn run_feed<A>(
    adapter: A,
    feed: FeedId,
    books: Arc<Mutex<ExternalBooks>>,
    channel_capacity: usize,
) -> Result<RunSummary>
where
    A: VenueAdapter + Send + Sync + 'static,
{
    let (tx, mut rx) = mpsc::channel::<MarketEvent>(channel_capacity.max(1));

    let adapter_task = tokio::spawn(async move { adapter.spawn(tx).await });

    let mut dispatcher = UpdateDispatcher::new(feed, books);
    let dispatch_task = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            dispatch_event(&mut dispatcher, event);
        }
        dispatcher
    });

    let adapter_result = adapter_task.await?;
    let dispatcher = dispatch_task.await?;
    adapter_result?;

    let mut needs_snapshot: Vec<String> = dispatcher
        .symbols()
        .filter(|s| dispatcher.needs_snapshot(s))
        .map(str::to_string)
        .collect();
    needs_snapshot.sort_unstable();

    let summary = RunSummary {
        feed: dispatcher.feed().to_string(),
        stats: dispatcher.stats(),
        needs_snapshot,
    };
    tracing::info!(
        feed = %summary.feed,
        applied = summary.stats.applied,
        rejected = summary.stats.rejected,
        resets = summary.stats.resets,
        snapshots = summary.stats.snapshots,
        "feed finished"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::sync::{BookSnapshot, DeltaUpdate, RecordingDiagnostics};

    struct VecAdapter(Vec<MarketEvent>);

    #[async_trait::async_trait]
    impl VenueAdapter for VecAdapter {
        async fn spawn(&self, tx: mpsc::Sender<MarketEvent>) -> Result<()> {
            for event in self.0.iter().cloned() {
                tx.send(event).await.map_err(|_| Error::ChannelClosed)?;
            }
            Ok(())
        }
    }

    fn snapshot(symbol: &str, id: u64) -> MarketEvent {
        MarketEvent::Snapshot {
            symbol: symbol.into(),
            snapshot: BookSnapshot { last_update_id: id, bids: vec![(100, 1)], asks: vec![(102, 1)] },
        }
    }

    fn delta(symbol: &str, first: u64, last: u64, prev: Option<u64>) -> MarketEvent {
        MarketEvent::Delta { symbol: symbol.into(), update: DeltaUpdate::new(first, last, prev) }
    }

    #[test]
    fn test_dispatch_event_routes_by_kind() {
        let mut d = UpdateDispatcher::with_diagnostics(
            FeedId::binance_delivery(),
            ExternalBooks::new(),
            RecordingDiagnostics::default(),
        );
        assert_eq!(dispatch_event(&mut d, snapshot("BTCUSD_PERP", 10)), None);
        assert_eq!(
            dispatch_event(&mut d, delta("BTCUSD_PERP", 9, 12, None)),
            Some(DispatchOutcome::Applied { first: true })
        );
    }

    #[tokio::test]
    async fn test_run_feed_reports_stats() {
        let events = vec![
            snapshot("BTCUSDT", 100),
            delta("BTCUSDT", 90, 95, None),
            delta("BTCUSDT", 96, 104, None),
            delta("BTCUSDT", 105, 110, Some(104)),
            snapshot("ETHUSDT", 50),
            delta("ETHUSDT", 49, 55, None),
            delta("ETHUSDT", 60, 70, Some(58)),
        ];
        let books = Arc::new(Mutex::new(ExternalBooks::new()));
        let summary = run_feed(VecAdapter(events), FeedId::binance_futures(), Arc::clone(&books), 4)
            .await
            .unwrap();

        assert_eq!(summary.feed, "BINANCE_FUTURES");
        assert_eq!(summary.stats, DispatchStats { applied: 3, rejected: 1, resets: 1, snapshots: 2 });
        assert_eq!(summary.needs_snapshot, vec!["ETHUSDT".to_string()]);

        let books = books.lock();
        assert!(books.get("ETHUSDT").is_none());
        assert_eq!(books.get("BTCUSDT").map(|b| b.bbo()), Some((Some((100, 1)), Some((102, 1)))));
    }
}

// One line of a recorded capture. Prices/sizes are already integer ticks/lots.
//   {"type":"snapshot","symbol":"BTCUSDT","last_update_id":100,"bids":[[100,5]],"asks":[[101,2]]}
//   {"type":"delta","symbol":"BTCUSDT","U":95,"u":105,"pu":null,"bids":[[100,0]],"asks":[]}

use serde::{Deserialize, Serialize};

use super::MarketEvent;
use crate::sync::{BookDiff, BookSnapshot, DeltaUpdate, Level};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReplayRecord {
    Snapshot {
        symbol: String,
        last_update_id: u64,
        #[serde(default)]
        bids: Vec<Level>,
        #[serde(default)]
        asks: Vec<Level>,
    },
    Delta {
        symbol: String,
        #[serde(rename = "U")]
        first_update_id: u64,
        #[serde(rename = "u")]
        final_update_id: u64,
        #[serde(rename = "pu", default)]
        previous_final_update_id: Option<u64>,
        #[serde(default)]
        bids: Vec<Level>,
        #[serde(default)]
        asks: Vec<Level>,
    },
}

impl From<ReplayRecord> for MarketEvent {
    fn from(record: ReplayRecord) -> Self {
        match record {
            ReplayRecord::Snapshot { symbol, last_update_id, bids, asks } => MarketEvent::Snapshot {
                symbol,
                snapshot: BookSnapshot { last_update_id, bids, asks },
            },
            ReplayRecord::Delta {
                symbol,
                first_update_id,
                final_update_id,
                previous_final_update_id,
                bids,
                asks,
            } => MarketEvent::Delta {
                symbol,
                update: DeltaUpdate::new(first_update_id, final_update_id, previous_final_update_id)
                    .with_diff(BookDiff { bids, asks }),
            },
        }
    }
}

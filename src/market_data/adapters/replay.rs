// Replays a recorded JSON-lines capture into the router

use std::path::{Path, PathBuf};

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::Sender;

use super::replay_types::ReplayRecord;
use super::{MarketEvent, VenueAdapter};
use crate::error::{Error, Result};

pub struct ReplayAdapter {
    pub path: PathBuf,
}

impl ReplayAdapter {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

/// Decode one capture line. Blank lines yield `None`; `line_no` is 1-based and only
/// used for the error.
pub fn parse_line(line: &str, line_no: usize) -> Result<Option<MarketEvent>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let record: ReplayRecord = serde_json::from_str(line)
        .map_err(|source| Error::Record { line: line_no, source })?;
    Ok(Some(record.into()))
}

#[async_trait::async_trait]
impl VenueAdapter for ReplayAdapter {
    async fn spawn(&self, tx: Sender<MarketEvent>) -> Result<()> {
        let file = tokio::fs::File::open(&self.path).await?;
        tracing::info!(path = %self.path.display(), "replaying capture");

        let mut lines = BufReader::new(file).lines();
        let mut line_no = 0usize;
        let mut sent = 0u64;
        while let Some(line) = lines.next_line().await? {
            line_no += 1;
            let Some(event) = parse_line(&line, line_no)? else {
                continue;
            };
            tx.send(event).await.map_err(|_| Error::ChannelClosed)?;
            sent += 1;
        }

        tracing::info!(path = %self.path.display(), events = sent, "capture exhausted");
        Ok(())
    }
}

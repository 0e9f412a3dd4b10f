// Runtime settings: defaults < optional TOML file < BOOKSEQ_* environment
use std::path::Path;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::sync::FeedId;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Feed name stamped on diagnostics and metrics.
    pub feed: String,
    /// Default tracing filter; `RUST_LOG` wins when set.
    pub log_filter: String,
    pub channel_capacity: usize,
    /// Levels per side printed after a replay.
    pub depth: usize,
    /// Levels per side kept in the local book.
    pub max_depth: usize,
    pub metrics_port: u16,
}

impl Settings {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("feed", FeedId::BINANCE_FUTURES)?
            .set_default("log_filter", "info")?
            .set_default("channel_capacity", 1024_i64)?
            .set_default("depth", 5_i64)?
            .set_default("max_depth", 1000_i64)?
            .set_default("metrics_port", 9000_i64)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let settings = builder
            .add_source(Environment::with_prefix("BOOKSEQ").try_parsing(true))
            .build()?
            .try_deserialize()?;
        Ok(settings)
    }

    pub fn feed_id(&self) -> FeedId {
        FeedId::new(self.feed.clone())
    }
}

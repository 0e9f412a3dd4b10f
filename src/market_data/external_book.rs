use std::collections::BTreeMap;

use ahash::AHashMap;

use crate::error::{Error, Result};
use crate::sync::{BookDiff, BookSnapshot, BookStore, Level};

// Depths the venue can serve a snapshot for
pub const VALID_DEPTHS: [usize; 7] = [5, 10, 20, 50, 100, 500, 1000];

// External book holds normalized prices/sizes for one symbol
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExternalBook {
    // price -> size (aggregate)
    pub bids: BTreeMap<i64, u64>, // highest price = best bid
    pub asks: BTreeMap<i64, u64>, // lowest price  = best ask
}

impl ExternalBook {
    pub fn new() -> Self {
        Self::default()
    }

    // Replace the whole book with a fresh snapshot
    pub fn apply_snapshot(&mut self, bids: &[Level], asks: &[Level]) {
        self.bids.clear();
        self.asks.clear();
        apply_levels(&mut self.bids, bids);
        apply_levels(&mut self.asks, asks);
    }

    pub fn apply_diff(&mut self, diff: &BookDiff) {
        apply_levels(&mut self.bids, &diff.bids);
        apply_levels(&mut self.asks, &diff.asks);
    }

    pub fn bbo(&self) -> (Option<Level>, Option<Level>) {
        let best_bid = self.bids.iter().next_back().map(|(p, s)| (*p, *s));
        let best_ask = self.asks.iter().next().map(|(p, s)| (*p, *s));
        (best_bid, best_ask)
    }

    pub fn top_n(&self, n: usize) -> (Vec<Level>, Vec<Level>) {
        let bids = self.bids.iter().rev().take(n).map(|(p, s)| (*p, *s)).collect();
        let asks = self.asks.iter().take(n).map(|(p, s)| (*p, *s)).collect();
        (bids, asks)
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() && self.asks.is_empty()
    }

    // Drop the worst levels beyond `depth` on each side
    pub fn truncate(&mut self, depth: usize) {
        while self.bids.len() > depth {
            self.bids.pop_first();
        }
        while self.asks.len() > depth {
            self.asks.pop_last();
        }
    }
}

// size 0 deletes the level
fn apply_levels(side: &mut BTreeMap<i64, u64>, levels: &[Level]) {
    for &(p, s) in levels {
        if s == 0 {
            side.remove(&p);
        } else {
            side.insert(p, s);
        }
    }
}

/// One [`ExternalBook`] per symbol. Discarding drops the symbol outright so a
/// reader can tell "no book" from "empty book".
#[derive(Debug, Default)]
pub struct ExternalBooks {
    books: AHashMap<String, ExternalBook>,
    max_depth: Option<usize>,
}

impl ExternalBooks {
    /// Unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding at most `max_depth` levels per side; the worst prices are
    /// dropped after every snapshot and diff.
    pub fn with_max_depth(max_depth: usize) -> Result<Self> {
        if !VALID_DEPTHS.contains(&max_depth) {
            return Err(Error::InvalidDepth(max_depth));
        }
        Ok(Self { books: AHashMap::new(), max_depth: Some(max_depth) })
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    pub fn get(&self, symbol: &str) -> Option<&ExternalBook> {
        self.books.get(symbol)
    }

    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.books.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        symbols
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }
}

impl BookStore for ExternalBooks {
    fn apply_snapshot(&mut self, symbol: &str, snapshot: &BookSnapshot) {
        let book = self.books.entry(symbol.to_string()).or_default();
        book.apply_snapshot(&snapshot.bids, &snapshot.asks);
        if let Some(depth) = self.max_depth {
            book.truncate(depth);
        }
    }

    fn apply_diff(&mut self, symbol: &str, diff: &BookDiff) {
        // A symbol without a snapshot gets its book built from diffs alone.
        let book = self.books.entry(symbol.to_string()).or_default();
        book.apply_diff(diff);
        if let Some(depth) = self.max_depth {
            book.truncate(depth);
        }
    }

    fn discard_snapshot(&mut self, symbol: &str) {
        self.books.remove(symbol);
    }
}

use std::path::PathBuf;
use std::sync::Arc;

use bookseq_rs::config::Settings;
use bookseq_rs::market_data::adapters::replay::ReplayAdapter;
use bookseq_rs::market_data::external_book::ExternalBooks;
use bookseq_rs::market_data::router;
use bookseq_rs::telemetry;
use clap::{Parser, Subcommand};
use parking_lot::Mutex;

#[derive(Parser)]
#[command(name = "bookseq", about = "Order-book delta sequencing")]
struct Cli {
    /// TOML settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Replay a JSON-lines capture through the dispatcher
    Replay {
        path: PathBuf,
        /// Feed name used in diagnostics (overrides settings)
        #[arg(long)]
        feed: Option<String>,
        /// Levels per side to print (overrides settings)
        #[arg(long)]
        depth: Option<usize>,
        /// Levels per side kept in each book: 5, 10, 20, 50, 100, 500 or 1000
        #[arg(long)]
        max_depth: Option<usize>,
        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },
}

// Helper function to print top of book for every symbol still holding one
fn print_books(books: &ExternalBooks, depth: usize) {
    for symbol in books.symbols() {
        let Some(book) = books.get(symbol) else { continue };
        let (bids, asks) = book.top_n(depth);
        println!("\n=== {} ===", symbol);
        println!("{:>20} | {:<20}", "BID", "ASK");
        for i in 0..bids.len().max(asks.len()) {
            let bid = bids.get(i).map(|(p, s)| format!("{} @ {}", s, p)).unwrap_or_default();
            let ask = asks.get(i).map(|(p, s)| format!("{} @ {}", s, p)).unwrap_or_default();
            println!("{:>20} | {:<20}", bid, ask);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok(); // load .env

    let cli = Cli::parse();
    let mut settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Command::Replay { path, feed, depth, max_depth, json } => {
            if let Some(feed) = feed {
                settings.feed = feed;
            }
            if let Some(depth) = depth {
                settings.depth = depth;
            }
            if let Some(max_depth) = max_depth {
                settings.max_depth = max_depth;
            }

            telemetry::init_tracing(&settings.log_filter);
            telemetry::init_metrics(settings.metrics_port)?;

            let books = Arc::new(Mutex::new(ExternalBooks::with_max_depth(settings.max_depth)?));
            let summary = router::run_feed(
                ReplayAdapter::new(&path),
                settings.feed_id(),
                Arc::clone(&books),
                settings.channel_capacity,
            )
            .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                print_books(&books.lock(), settings.depth);
                println!(
                    "\n{}: applied {}, rejected {}, resets {}, snapshots {}",
                    summary.feed,
                    summary.stats.applied,
                    summary.stats.rejected,
                    summary.stats.resets,
                    summary.stats.snapshots
                );
                if !summary.needs_snapshot.is_empty() {
                    println!("awaiting snapshot: {}", summary.needs_snapshot.join(", "));
                }
            }
        }
    }

    Ok(())
}

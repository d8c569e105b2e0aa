//! docranger - a ranger-style terminal browser for MongoDB.
//!
//! # Usage
//!
//! ```bash
//! docranger
//! docranger --uri mongodb://db.internal:27017 --limit 50
//! docranger --demo
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;

use docranger::app::App;
use docranger::store::{MemoryStore, MongoStore};

/// A ranger-style terminal browser for MongoDB
#[derive(Parser, Debug)]
#[command(name = "docranger", version, about, long_about = None)]
struct Cli {
    /// MongoDB connection string
    #[arg(long, default_value = "mongodb://localhost:27017")]
    uri: String,

    /// Maximum documents fetched per query
    #[arg(long, default_value_t = docranger::app::DEFAULT_LIMIT)]
    limit: usize,

    /// Browse a small built-in sample data set instead of connecting
    #[arg(long)]
    demo: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.demo {
        let store = MemoryStore::new();
        seed_demo(&store);
        return App::new(store).with_limit(cli.limit).run();
    }

    let store = MongoStore::connect(&cli.uri)
        .with_context(|| format!("failed to connect to {}", cli.uri))?;
    App::new(store).with_limit(cli.limit).run()
}

fn seed_demo(store: &MemoryStore) {
    store.seed(
        "library",
        "books",
        vec![
            json!({"_id": 1, "title": "Dune", "year": 1965, "tags": ["scifi", "classic"]}),
            json!({"_id": 2, "title": "Neuromancer", "year": 1984, "tags": ["scifi"]}),
            json!({"_id": 3, "title": "Piranesi", "year": 2020, "meta": {"awards": ["Women's Prize"]}}),
        ],
    );
    store.seed(
        "library",
        "members",
        vec![
            json!({"_id": 1, "name": "ada", "loans": [{"book": 1, "due": "2026-09-01"}]}),
            json!({"_id": 2, "name": "grace", "loans": []}),
        ],
    );
}

//! `marquee` — batch import tooling for the Marquee show catalog.
//!
//! # Usage
//!
//! ```
//! marquee --db catalog.db import events.json
//! marquee --db catalog.db import events.json --dry-run
//! marquee --db catalog.db status known-events.json
//! marquee --config ~/.config/marquee/config.toml import events.json
//! ```

mod registry_file;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use marquee_core::{
  catalog::SourceKey,
  event::EventFeed,
  reconcile::ImportReconciler,
  registry::VenueRegistry,
  store::CatalogStore as _,
};
use marquee_store_sqlite::SqliteStore;
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "marquee", about = "Batch import for the Marquee show catalog")]
struct Args {
  /// Path to a TOML config file (db, venues).
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// SQLite database path (default: marquee.db).
  #[arg(long, env = "MARQUEE_DB")]
  db: Option<PathBuf>,

  /// Venue registry TOML file; the compiled-in set is used when absent.
  #[arg(long, env = "MARQUEE_VENUES")]
  venues: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Reconcile a crawler event feed against the catalog.
  Import {
    /// JSON feed: an array of events, or an object of event arrays.
    feed: PathBuf,

    /// Classify and report without writing anything.
    #[arg(long)]
    dry_run: bool,
  },
  /// Report which of a list of (external id, venue id) pairs already exist.
  Status {
    /// JSON array of {"external_id": ..., "venue_id": ...} objects.
    pairs: PathBuf,
  },
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default)]
struct ConfigFile {
  #[serde(default)]
  db:     String,
  #[serde(default)]
  venues: String,
}

/// One entry of the status-query input file.
#[derive(Deserialize)]
struct StatusPair {
  external_id: String,
  venue_id:    String,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  // CLI flags override config file, which overrides defaults.
  let db_path = args
    .db
    .or_else(|| (!file_cfg.db.is_empty()).then(|| PathBuf::from(&file_cfg.db)))
    .unwrap_or_else(|| PathBuf::from("marquee.db"));
  let venues_path = args.venues.or_else(|| {
    (!file_cfg.venues.is_empty()).then(|| PathBuf::from(&file_cfg.venues))
  });

  let registry = match &venues_path {
    Some(path) => registry_file::load(path)
      .with_context(|| format!("loading venue registry {}", path.display()))?,
    None => VenueRegistry::builtin(),
  };

  let store = SqliteStore::open(&db_path)
    .await
    .with_context(|| format!("opening catalog at {}", db_path.display()))?;

  match args.command {
    Command::Import { feed, dry_run } => {
      run_import(&store, &registry, &feed, dry_run).await
    }
    Command::Status { pairs } => run_status(&store, &pairs).await,
  }
}

// ─── Subcommands ──────────────────────────────────────────────────────────────

async fn run_import(
  store: &SqliteStore,
  registry: &VenueRegistry,
  feed_path: &Path,
  dry_run: bool,
) -> Result<()> {
  let raw = std::fs::read_to_string(feed_path)
    .with_context(|| format!("reading feed {}", feed_path.display()))?;
  let events = EventFeed::from_json(&raw)
    .context("feed is neither an event array nor a map of event arrays")?
    .into_events();

  tracing::info!(
    events = events.len(),
    dry_run,
    "starting import reconciliation"
  );

  let reconciler = ImportReconciler::new(store, registry, dry_run);
  let summary = reconciler.run(events).await;

  for report in &summary.reports {
    println!("{}", report.line());
  }
  println!(
    "{} events: {} imported, {} duplicates, {} rejected, {} flagged for \
     review, {} skipped, {} errors",
    summary.total,
    summary.imported,
    summary.duplicates,
    summary.rejected,
    summary.pending_review,
    summary.skipped,
    summary.errors,
  );

  if summary.errors > 0 {
    tracing::warn!(errors = summary.errors, "import finished with errors");
  }
  Ok(())
}

async fn run_status(store: &SqliteStore, pairs_path: &Path) -> Result<()> {
  let raw = std::fs::read_to_string(pairs_path)
    .with_context(|| format!("reading pairs file {}", pairs_path.display()))?;
  let pairs: Vec<StatusPair> =
    serde_json::from_str(&raw).context("parsing pairs file")?;

  let keys: Vec<SourceKey> = pairs
    .into_iter()
    .map(|p| SourceKey { venue_id: p.venue_id, event_id: p.external_id })
    .collect();

  let statuses = store
    .source_event_statuses(&keys)
    .await
    .context("querying source event statuses")?;

  for status in statuses {
    let key = &status.key;
    match status.show {
      Some(show) => println!(
        "{}@{}: show {} ({:?})",
        key.event_id,
        key.venue_id,
        show.show_id,
        show.status,
      ),
      None => println!("{}@{}: not found", key.event_id, key.venue_id),
    }
  }
  Ok(())
}

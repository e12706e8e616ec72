use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use waymark_core::config::{PointerConfig, RankingConfig};
use waymark_core::models::{MarkerCatalog, MarkerSearchHit, SearchHistoryEntry};
use waymark_core::{SqliteMarkerStore, WaymarkError};

use crate::cli::{Commands, ImportArgs, SearchArgs};

mod pointer;
mod support;

pub(crate) use self::support::{init_logging, report_failure};

use self::pointer::{compute_pointer, resolve_target};
use self::support::print_json;

pub(crate) fn run_with_db(db: &Path, command: Commands) -> Result<()> {
    match command {
        Commands::Init => {
            open_store(db)?;
            print_json(&serde_json::json!({
                "status": "ok",
                "db": db.display().to_string(),
            }))?;
        }
        Commands::Import(args) => {
            let catalog = load_catalog(&args)?;
            let summary = open_store(db)?.insert_catalog(&catalog)?;
            tracing::info!(
                maps = summary.maps,
                markers = summary.markers,
                texts = summary.texts,
                "imported marker catalog"
            );
            print_json(&serde_json::json!({
                "status": "ok",
                "maps": summary.maps,
                "markers": summary.markers,
                "texts": summary.texts,
            }))?;
        }
        Commands::Search(args) => {
            let config =
                RankingConfig::from_env().context("invalid WAYMARK_* ranking environment")?;
            let hits = search(&open_store(db)?, &args, config)?;
            print_json(&hits)?;
        }
        Commands::Show(args) => {
            let found = open_store(db)?.load_by_id(args.id, args.language)?;
            print_json(&found)?;
        }
        Commands::Floor(args) => {
            let markers = open_store(db)?.load_by_floor(args.map_id, args.floor, args.language)?;
            print_json(&markers)?;
        }
        Commands::Map(args) => {
            let map = open_store(db)?.load_map_info(args.id)?;
            print_json(&map)?;
        }
        Commands::Remember(args) => {
            let entry = SearchHistoryEntry::now(args.marker_id);
            open_store(db)?.insert_history_not_exceeding(&entry, args.max_entries)?;
            print_json(&entry)?;
        }
        Commands::History(args) => {
            let entries = open_store(db)?.load_history_by_map(args.map_id)?;
            print_json(&entries)?;
        }
        Commands::Pointer(args) => {
            let store = if args.needs_store() {
                Some(open_store(db)?)
            } else {
                None
            };
            let target = resolve_target(&args, store.as_ref())?;
            let report = compute_pointer(&args, target, PointerConfig::from_env())?;
            print_json(&report)?;
        }
    }
    Ok(())
}

fn open_store(db: &Path) -> Result<SqliteMarkerStore> {
    SqliteMarkerStore::open(db)
        .with_context(|| format!("failed to open marker database {}", db.display()))
}

fn load_catalog(args: &ImportArgs) -> Result<MarkerCatalog> {
    let path = &args.catalog;
    let raw = fs::read_to_string(path)
        .map_err(WaymarkError::from)
        .with_context(|| format!("failed to read marker catalog {}", path.display()))?;
    let catalog: MarkerCatalog = serde_json::from_str(&raw)
        .map_err(WaymarkError::from)
        .with_context(|| format!("failed to parse marker catalog {}", path.display()))?;
    Ok(catalog)
}

fn search(
    store: &SqliteMarkerStore,
    args: &SearchArgs,
    config: RankingConfig,
) -> Result<Vec<MarkerSearchHit>> {
    let ranker = ranking_config(config, args).build_ranker()?;
    let mut hits = store.search(args.map_id, &args.query, args.language, &*ranker)?;
    hits.truncate(args.limit);
    Ok(hits)
}

/// Applies command-line overrides on top of the environment configuration.
fn ranking_config(mut config: RankingConfig, args: &SearchArgs) -> RankingConfig {
    if let Some(kind) = args.ranker {
        config.kind = kind;
    }
    if let Some(b) = args.bm25_b {
        config.bm25_b = b;
    }
    if let Some(k1) = args.bm25_k1 {
        config.bm25_k1 = k1;
    }
    config
}

#[cfg(test)]
mod tests;

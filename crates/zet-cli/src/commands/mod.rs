//! Command handlers

pub mod config;
pub mod dot;
pub mod new;
pub mod show;
pub mod stats;
pub mod transform;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use zet_core::{ingest, Collection, Config, ZetError};

/// A finalized collection plus the files that could not be read
pub struct Loaded {
    pub collection: Collection,
    pub skipped: Vec<(PathBuf, ZetError)>,
}

/// Read every note below `dir` and finalize the graph
pub fn load_collection(dir: &Path, config: &Config) -> Result<Loaded> {
    let report = ingest::load(dir, config)
        .with_context(|| format!("Failed to load notes from {}", dir.display()))?;

    let mut collection = Collection::from_config(config);
    collection.register(report.notes);
    collection.finalize();
    info!(
        "Loaded {} notes from {:?} ({} skipped)",
        collection.len(),
        dir,
        report.skipped.len()
    );

    Ok(Loaded {
        collection,
        skipped: report.skipped,
    })
}

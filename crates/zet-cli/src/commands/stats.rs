//! Stats command handler

use std::path::Path;

use anyhow::Result;

use zet_core::Config;

use super::load_collection;
use crate::output::Output;

/// Show collection statistics
pub fn show(dir: &Path, config: &Config, output: &Output) -> Result<()> {
    let loaded = load_collection(dir, config)?;
    output.print_stats(&loaded.collection.stats());
    Ok(())
}

//! Show command handler

use std::path::Path;

use anyhow::{bail, Result};

use zet_core::{Collection, Config, Note};

use super::load_collection;
use crate::output::Output;

/// Show one note with its links and backlinks
pub fn show(dir: &Path, config: &Config, id: &str, output: &Output) -> Result<()> {
    let loaded = load_collection(dir, config)?;
    let Some(note) = find(&loaded.collection, id) else {
        bail!("Note not found: {}", id);
    };
    output.print_note(note, &loaded.collection);
    Ok(())
}

/// Look up by id, falling back to the file name
fn find<'a>(collection: &'a Collection, query: &str) -> Option<&'a Note> {
    collection
        .lookup(query)
        .or_else(|| collection.get_by_path(Path::new(query)))
}

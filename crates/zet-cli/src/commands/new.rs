//! New command handler

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;

use zet_core::{Note, TagSet};

use crate::output::{Output, OutputFormat};

/// Create a note named after the current time
pub fn create(dir: &Path, title: &str, tags: Vec<String>, output: &Output) -> Result<()> {
    let tags: TagSet = tags
        .into_iter()
        .map(|tag| tag.trim_start_matches('#').to_string())
        .filter(|tag| !tag.is_empty())
        .collect();

    let note = Note::create(dir, title, &tags, &Local::now())
        .with_context(|| format!("Failed to create note in {}", dir.display()))?;

    match output.format {
        OutputFormat::Json => output.print_json(&note.summary()),
        OutputFormat::Quiet => println!("{}", note.path.display()),
        OutputFormat::Human => output.success(&format!(
            "Created note {} at {}",
            note.id,
            note.path.display()
        )),
    }

    Ok(())
}

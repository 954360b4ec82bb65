//! Transform command handler

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use serde::Serialize;

use zet_core::persistence::read_note;
use zet_core::{Collection, Config, Note, Rewriter, TagEdit, ZetError};

use super::load_collection;
use crate::output::{Output, OutputFormat};

/// What happened to each note of a run
#[derive(Debug, Default, Serialize)]
pub struct TransformReport {
    pub dry_run: bool,
    /// Notes that were (or would be) rewritten
    pub changed: Vec<PathBuf>,
    pub unchanged: usize,
    pub failed: Vec<FailedFile>,
    pub unresolved_links: usize,
}

#[derive(Debug, Serialize)]
pub struct FailedFile {
    pub path: PathBuf,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

impl FailedFile {
    fn new(path: &Path, error: &ZetError) -> Self {
        Self {
            path: path.to_path_buf(),
            error: error.to_string(),
            hint: error.recovery_suggestion(),
        }
    }
}

/// Rewrite every note below `dir`
pub fn run(
    dir: &Path,
    config: &Config,
    dry_run: bool,
    add_tags: Vec<String>,
    remove_tags: Vec<String>,
    output: &Output,
) -> Result<()> {
    let loaded = load_collection(dir, config)?;
    if loaded.collection.is_empty() && loaded.skipped.is_empty() {
        output.message(&format!("No notes found in {}", dir.display()));
        return Ok(());
    }

    let mut report = TransformReport {
        dry_run,
        unresolved_links: loaded.collection.stats().unresolved,
        ..TransformReport::default()
    };
    for (path, error) in &loaded.skipped {
        output.file_error(path, error);
        report.failed.push(FailedFile::new(path, error));
    }

    let edit = TagEdit::new(add_tags, remove_tags);
    transform_all(&loaded.collection, edit, dry_run, &mut report, output);

    print_report(&report, output);

    if !report.failed.is_empty() {
        bail!(
            "{} file(s) could not be transformed",
            report.failed.len()
        );
    }
    Ok(())
}

/// Rewrite each note of the collection; a failing note does not stop the run
pub fn transform_all(
    collection: &Collection,
    edit: TagEdit,
    dry_run: bool,
    report: &mut TransformReport,
    output: &Output,
) {
    let rewriter = if edit.is_noop() {
        Rewriter::new(collection)
    } else {
        Rewriter::new(collection).with_tag_transform(edit)
    };

    for note in collection.notes() {
        match transform_one(&rewriter, note, dry_run) {
            Ok(true) => {
                if output.format == OutputFormat::Human {
                    let verb = if dry_run { "would rewrite" } else { "rewrote" };
                    println!("  {} {}", verb, note.path.display());
                }
                report.changed.push(note.path.clone());
            }
            Ok(false) => report.unchanged += 1,
            Err(error) => {
                output.file_error(&note.path, &error);
                report.failed.push(FailedFile::new(&note.path, &error));
            }
        }
    }
}

fn transform_one(rewriter: &Rewriter, note: &Note, dry_run: bool) -> zet_core::Result<bool> {
    if dry_run {
        let current = read_note(&note.path)?;
        Ok(rewriter.transform_content(note, &current)? != current)
    } else {
        rewriter.transform_write(note, None)
    }
}

fn print_report(report: &TransformReport, output: &Output) {
    match output.format {
        OutputFormat::Json => output.print_json(report),
        OutputFormat::Quiet => {
            for path in &report.changed {
                println!("{}", path.display());
            }
        }
        OutputFormat::Human => {
            println!();
            let verb = if report.dry_run {
                "would be rewritten"
            } else {
                "rewritten"
            };
            println!(
                "{} note(s) {}, {} unchanged, {} failed",
                report.changed.len(),
                verb,
                report.unchanged,
                report.failed.len()
            );
            if report.unresolved_links > 0 {
                println!("{} unresolved link(s)", report.unresolved_links);
            }
        }
    }
}

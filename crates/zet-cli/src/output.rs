//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use serde::Serialize;

use zet_core::{Collection, CollectionStats, Note, ZetError};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Pretty-print any serializable value as JSON
    pub fn print_json<T: Serialize + ?Sized>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("Failed to serialize output: {}", e),
        }
    }

    /// Print a single note with its place in the graph
    pub fn print_note(&self, note: &Note, collection: &Collection) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:        {}", note.id);
                println!("Title:     {}", display_title(&note.title));
                println!("Path:      {}", note.path.display());
                println!(
                    "Depth:     {}",
                    note.depth()
                        .map(|d| d.to_string())
                        .unwrap_or_else(|| "(not reachable from root)".to_string())
                );
                if !note.tags.is_empty() {
                    let tags: Vec<&str> = note.tags.iter().map(String::as_str).collect();
                    println!("Tags:      {}", tags.join(", "));
                }

                let links = note.unique_links();
                println!();
                println!("── Links ({}) ──", links.len());
                for link in links {
                    match collection.lookup(link) {
                        Some(target) => println!("{}  {}", link, display_title(&target.title)),
                        None => println!("{}  (unresolved)", link),
                    }
                }

                let backlinks = note.backlinks();
                println!();
                println!("── Backlinks ({}) ──", backlinks.len());
                for backlink in backlinks {
                    let title = collection
                        .lookup(backlink)
                        .map(|n| display_title(&n.title))
                        .unwrap_or_default();
                    println!("{}  {}", backlink, title);
                }
            }
            OutputFormat::Json => self.print_json(&note.summary()),
            OutputFormat::Quiet => println!("{}", note.path.display()),
        }
    }

    /// Print collection statistics
    pub fn print_stats(&self, stats: &CollectionStats) {
        match self.format {
            OutputFormat::Human => println!("{}", stats),
            OutputFormat::Json => self.print_json(stats),
            OutputFormat::Quiet => println!("{}", stats.notes),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Report a failed file on stderr, with a hint when there is one
    ///
    /// JSON callers collect failures into their own report instead.
    pub fn file_error(&self, path: &std::path::Path, error: &ZetError) {
        if self.is_json() {
            return;
        }
        eprintln!("✗ {}: {}", path.display(), error);
        if !self.is_quiet() {
            if let Some(hint) = error.recovery_suggestion() {
                eprintln!("  hint: {}", hint);
            }
        }
    }
}

fn display_title(title: &str) -> &str {
    if title.is_empty() {
        "(untitled)"
    } else {
        title
    }
}

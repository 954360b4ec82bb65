//! Zet Core Library
//!
//! This crate provides the core functionality for zet, a tool that keeps a
//! zettelkasten of markdown notes linked by 14-digit ids in shape.
//!
//! # Architecture
//!
//! - **Collection**: in-memory link graph of all notes, with backlinks and
//!   depth from the root note computed by `finalize()`
//! - **Rewriter**: line-based pipeline that normalizes one note against the
//!   collection and regenerates its tag line, link titles and backlinks
//!
//! The files on disk are the only state; everything else is re-derived.
//!
//! # Quick Start
//!
//! ```text
//! let config = Config::load()?;
//! let report = ingest::load(&notes_dir, &config)?;
//!
//! let mut collection = Collection::from_config(&config);
//! collection.register(report.notes);
//! collection.finalize();
//!
//! let rewriter = Rewriter::new(&collection);
//! for note in collection.notes() {
//!     rewriter.transform_write(note, None)?;
//! }
//! ```
//!
//! # Modules
//!
//! - `note`: A single note and what is extracted from its content
//! - `collection`: The link graph (main entry point)
//! - `lines`: Annotated line model used by the rewriter
//! - `rewrite`: The rewrite pipeline
//! - `tags`: Tag lines and tag transforms
//! - `ingest`: Directory scanning
//! - `dot`: Graphviz export and color pickers
//! - `persistence`: File reads and atomic writes
//! - `config`: Application configuration

pub mod collection;
pub mod config;
pub mod dot;
pub mod error;
pub mod ingest;
pub mod lines;
pub mod note;
pub mod persistence;
pub mod rewrite;
pub mod tags;

pub use collection::{Collection, CollectionStats, Diagnostic};
pub use config::Config;
pub use dot::{CategoryColors, ColorPicker, ConstantColor, DepthGradient};
pub use error::{Result, ZetError};
pub use ingest::LoadReport;
pub use note::{Note, NoteSummary, ROOT_ID};
pub use rewrite::Rewriter;
pub use tags::{Identity, TagEdit, TagSet, TagTransform};

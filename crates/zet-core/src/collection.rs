//! Note collection and link graph
//!
//! The `Collection` owns every note keyed by id. Registration invalidates
//! derived data; [`Collection::finalize`] recomputes backlinks and depth.
//!
//! ## Lifecycle
//!
//! ```text
//! let mut collection = Collection::new();
//! collection.register(notes);
//! collection.finalize();          // backlinks + depth
//! collection.backlinks_of(id);    // trusted from here on
//! ```
//!
//! Queries made before `finalize()` see empty backlinks and no depth.

use std::collections::{BTreeSet, HashMap, VecDeque};
use std::fmt;
use std::path::Path;

use tracing::{debug, warn};

use crate::config::Config;
use crate::note::{Note, ROOT_ID};
use crate::tags::TagSet;

static NO_BACKLINKS: BTreeSet<String> = BTreeSet::new();

/// A non-fatal problem found while finalizing
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Diagnostic {
    /// `source` links to `target`, which is not in the collection
    UnresolvedLink { source: String, target: String },
    /// The root note is not in the collection, so no depth was assigned
    MissingRoot { root: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnresolvedLink { source, target } => {
                write!(f, "Note {} links to unknown note {}", source, target)
            }
            Diagnostic::MissingRoot { root } => {
                write!(f, "Root note {} not found; depths not computed", root)
            }
        }
    }
}

/// Summary numbers of a collection
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct CollectionStats {
    pub notes: usize,
    pub tags: usize,
    pub categories: usize,
    pub max_depth: usize,
    pub reachable: usize,
    pub unresolved: usize,
}

impl fmt::Display for CollectionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total number of notes: {}", self.notes)?;
        writeln!(f, "Total number of tags: {}", self.tags)?;
        writeln!(f, "Total number of categories: {}", self.categories)?;
        writeln!(f, "Notes reachable from root: {}", self.reachable)?;
        writeln!(f, "Maximum depth: {}", self.max_depth)?;
        write!(f, "Unresolved links: {}", self.unresolved)
    }
}

/// All notes of one zettelkasten, keyed by id
#[derive(Debug, Clone)]
pub struct Collection {
    notes: HashMap<String, Note>,
    root_id: String,
    category_prefix: String,
    diagnostics: Vec<Diagnostic>,
    finalized: bool,
}

impl Default for Collection {
    fn default() -> Self {
        Self::new()
    }
}

impl Collection {
    pub fn new() -> Self {
        Self {
            notes: HashMap::new(),
            root_id: ROOT_ID.to_string(),
            category_prefix: "c_".to_string(),
            diagnostics: Vec::new(),
            finalized: false,
        }
    }

    /// Take root id and category prefix from configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            root_id: config.root_id.clone(),
            category_prefix: config.category_prefix.clone(),
            ..Self::new()
        }
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    pub fn category_prefix(&self) -> &str {
        &self.category_prefix
    }

    /// Add notes, replacing any earlier note with the same id
    ///
    /// Backlinks and depth must be recomputed with `finalize()` afterwards.
    pub fn register<I>(&mut self, notes: I)
    where
        I: IntoIterator<Item = Note>,
    {
        self.finalized = false;
        for note in notes {
            if let Some(previous) = self.notes.get(&note.id) {
                debug!(
                    "Note {} at {:?} replaces {:?}",
                    note.id, note.path, previous.path
                );
            }
            self.notes.insert(note.id.clone(), note);
        }
    }

    /// Recompute backlinks, then depth
    ///
    /// Returns the diagnostics of this pass. Calling it again without
    /// registering anything yields the same result.
    pub fn finalize(&mut self) -> &[Diagnostic] {
        let mut diagnostics = BTreeSet::new();
        self.update_backlinks(&mut diagnostics);
        self.update_depths(&mut diagnostics);

        for diagnostic in &diagnostics {
            warn!("{}", diagnostic);
        }
        debug!(
            "Finalized {} notes, {} diagnostics",
            self.notes.len(),
            diagnostics.len()
        );

        self.diagnostics = diagnostics.into_iter().collect();
        self.finalized = true;
        &self.diagnostics
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Diagnostics of the last `finalize()`
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    fn update_backlinks(&mut self, diagnostics: &mut BTreeSet<Diagnostic>) {
        for note in self.notes.values_mut() {
            note.backlinks_mut().clear();
        }

        let edges: Vec<(String, String)> = self
            .notes
            .values()
            .flat_map(|note| {
                note.links
                    .iter()
                    .map(move |target| (note.id.clone(), target.clone()))
            })
            .collect();

        for (source, target) in edges {
            match self.notes.get_mut(&target) {
                Some(linked) => {
                    linked.backlinks_mut().insert(source);
                }
                None => {
                    diagnostics.insert(Diagnostic::UnresolvedLink { source, target });
                }
            }
        }
    }

    /// Breadth-first from the root: the first assignment is the shortest
    /// hop count and is never overwritten, which also ends cycles.
    fn update_depths(&mut self, diagnostics: &mut BTreeSet<Diagnostic>) {
        for note in self.notes.values_mut() {
            note.set_depth(None);
        }

        let Some(root) = self.notes.get_mut(&self.root_id) else {
            diagnostics.insert(Diagnostic::MissingRoot {
                root: self.root_id.clone(),
            });
            return;
        };
        root.set_depth(Some(0));

        let mut queue = VecDeque::from([(self.root_id.clone(), 0usize)]);
        while let Some((id, depth)) = queue.pop_front() {
            let targets = match self.notes.get(&id) {
                Some(note) => note.links.clone(),
                None => continue,
            };
            for target in targets {
                let Some(linked) = self.notes.get_mut(&target) else {
                    // already reported by the backlink pass
                    continue;
                };
                if linked.depth().is_none() {
                    linked.set_depth(Some(depth + 1));
                    queue.push_back((target, depth + 1));
                }
            }
        }
    }

    pub fn lookup(&self, id: &str) -> Option<&Note> {
        self.notes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.notes.contains_key(id)
    }

    /// Backlinks of `id`; empty when the note is unknown or not finalized
    pub fn backlinks_of(&self, id: &str) -> &BTreeSet<String> {
        self.notes
            .get(id)
            .map(Note::backlinks)
            .unwrap_or(&NO_BACKLINKS)
    }

    pub fn depth_of(&self, id: &str) -> Option<usize> {
        self.notes.get(id).and_then(Note::depth)
    }

    /// Find a note by file name
    pub fn get_by_path(&self, path: &Path) -> Option<&Note> {
        let name = path.file_name()?;
        let mut matches = self
            .notes
            .values()
            .filter(|note| note.path.file_name() == Some(name));
        let found = matches.next()?;
        if matches.next().is_some() {
            warn!("Several notes are named {:?}", name);
            return None;
        }
        Some(found)
    }

    /// All notes in ascending id order
    pub fn notes(&self) -> Vec<&Note> {
        let mut notes: Vec<&Note> = self.notes.values().collect();
        notes.sort_by(|a, b| a.id.cmp(&b.id));
        notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Union of all note tags
    pub fn tags(&self) -> TagSet {
        self.notes
            .values()
            .flat_map(|note| note.tags.iter().cloned())
            .collect()
    }

    /// Tags using the category prefix
    pub fn categories(&self) -> TagSet {
        self.tags()
            .into_iter()
            .filter(|tag| self.is_category(tag))
            .collect()
    }

    pub fn is_category(&self, tag: &str) -> bool {
        tag.starts_with(&self.category_prefix)
    }

    /// Largest computed depth, 0 when none is computed
    pub fn depth(&self) -> usize {
        self.notes
            .values()
            .filter_map(Note::depth)
            .max()
            .unwrap_or(0)
    }

    pub fn stats(&self) -> CollectionStats {
        CollectionStats {
            notes: self.notes.len(),
            tags: self.tags().len(),
            categories: self.categories().len(),
            max_depth: self.depth(),
            reachable: self.notes.values().filter(|n| n.depth().is_some()).count(),
            unresolved: self
                .diagnostics
                .iter()
                .filter(|d| matches!(d, Diagnostic::UnresolvedLink { .. }))
                .count(),
        }
    }
}

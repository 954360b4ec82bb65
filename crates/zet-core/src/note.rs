//! Notes
//!
//! A note is one markdown file. Its id, title, tags and outgoing links are
//! derived from the file name and a single scan of the content; backlinks and
//! depth are filled in by [`crate::Collection::finalize`].

use chrono::{DateTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{IoOp, Result, ZetError};
use crate::persistence::read_note;
use crate::tags::{format_tags, is_tag_line, parse_tags, TagSet};

/// Id of the note that depth is measured from
pub const ROOT_ID: &str = "00000000000000";

pub(crate) static ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{14}").expect("valid id regex"));

/// Derive a note id from its path
///
/// The first run of 14 digits in the file name, or the whole file name when
/// there is none.
pub fn zid_from_path(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    match ID_RE.find(&name) {
        Some(m) => m.as_str().to_string(),
        None => name,
    }
}

/// Format a timestamp as a note id
pub fn new_note_id<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format("%Y%m%d%H%M%S").to_string()
}

/// One note of the collection
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: String,
    pub path: PathBuf,
    /// Text of the first `# ` heading, empty if there is none
    pub title: String,
    /// Tags of the first tag line
    pub tags: TagSet,
    /// Every id-shaped token of the content, in order, duplicates kept
    pub links: Vec<String>,
    backlinks: BTreeSet<String>,
    depth: Option<usize>,
}

impl Note {
    /// Read and analyze the note file at `path`
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let content = read_note(&path)?;
        Ok(Self::from_content(path, &content))
    }

    /// Analyze already-read content
    pub fn from_content(path: impl Into<PathBuf>, content: &str) -> Self {
        let path = path.into();
        let id = zid_from_path(&path);

        let mut title: Option<String> = None;
        let mut tags: Option<TagSet> = None;
        let mut links = Vec::new();

        for line in content.lines() {
            if title.is_none() {
                if let Some(rest) = line.strip_prefix("# ") {
                    title = Some(rest.trim().to_string());
                }
            }
            if tags.is_none() && is_tag_line(line) {
                tags = Some(parse_tags(line));
            }
            links.extend(ID_RE.find_iter(line).map(|m| m.as_str().to_string()));
        }

        Self {
            id,
            path,
            title: title.unwrap_or_default(),
            tags: tags.unwrap_or_default(),
            links,
            backlinks: BTreeSet::new(),
            depth: None,
        }
    }

    /// Write a new note file into `dir` and analyze it
    ///
    /// The file is named `<id>_<slug>.md` where the id is derived from `now`.
    pub fn create<Tz: TimeZone>(
        dir: &Path,
        title: &str,
        tags: &TagSet,
        now: &DateTime<Tz>,
    ) -> Result<Self>
    where
        Tz::Offset: std::fmt::Display,
    {
        let id = new_note_id(now);
        let slug = slugify(title);
        let file_name = if slug.is_empty() {
            format!("{}.md", id)
        } else {
            format!("{}_{}.md", id, slug)
        };
        let path = dir.join(file_name);

        if path.exists() {
            return Err(ZetError::AlreadyExists { path });
        }

        let mut content = format!("# {}\n\n", title.trim());
        if !tags.is_empty() {
            content.push_str(&format_tags(tags));
            content.push_str("\n\n");
        }

        fs::create_dir_all(dir).map_err(|e| ZetError::from_io(e, dir.to_path_buf(), IoOp::Write))?;
        fs::write(&path, &content).map_err(|e| ZetError::from_io(e, path.clone(), IoOp::Write))?;

        Ok(Self::from_content(path, &content))
    }

    /// Ids of notes linking here, empty until the collection is finalized
    pub fn backlinks(&self) -> &BTreeSet<String> {
        &self.backlinks
    }

    /// Hops from the root, `None` when unreachable or not yet computed
    pub fn depth(&self) -> Option<usize> {
        self.depth
    }

    /// Outgoing links without duplicates, in first-seen order
    pub fn unique_links(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.links
            .iter()
            .filter(|link| seen.insert(link.as_str()))
            .map(String::as_str)
            .collect()
    }

    pub fn summary(&self) -> NoteSummary {
        NoteSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            path: self.path.clone(),
            tags: self.tags.iter().cloned().collect(),
            depth: self.depth,
            links: self.unique_links().into_iter().map(String::from).collect(),
            backlinks: self.backlinks.iter().cloned().collect(),
        }
    }

    pub(crate) fn backlinks_mut(&mut self) -> &mut BTreeSet<String> {
        &mut self.backlinks
    }

    pub(crate) fn set_depth(&mut self, depth: Option<usize>) {
        self.depth = depth;
    }
}

/// Serializable view of a note for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct NoteSummary {
    pub id: String,
    pub title: String,
    pub path: PathBuf,
    pub tags: Vec<String>,
    pub depth: Option<usize>,
    pub links: Vec<String>,
    pub backlinks: Vec<String>,
}

fn slugify(title: &str) -> String {
    let mut slug = String::new();
    for ch in title.trim().chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }
    slug.trim_end_matches('_').to_string()
}

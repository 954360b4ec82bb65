//! Tag lines and tag transforms
//!
//! A tag line is any line containing `tags:` (case-insensitive); its tags are
//! the `#`-prefixed tokens on it. The canonical rendering is
//! `Tags: #a #b` with tags sorted.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;

/// An unordered, duplicate-free set of tags
pub type TagSet = BTreeSet<String>;

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\S*").expect("valid tag regex"));

/// Whether `line` holds tags (`tags:` anywhere, any case)
pub fn is_tag_line(line: &str) -> bool {
    line.to_lowercase().contains("tags:")
}

/// Extract the `#`-prefixed tokens of a line, without the hash
pub fn parse_tags(line: &str) -> TagSet {
    TAG_RE
        .find_iter(line)
        .map(|m| m.as_str()[1..].to_string())
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Render a tag set as a canonical tag line (no trailing newline)
pub fn format_tags(tags: &TagSet) -> String {
    let rendered: Vec<String> = tags.iter().map(|tag| format!("#{}", tag)).collect();
    format!("Tags: {}", rendered.join(" "))
}

/// Hook applied to a note's tags while rewriting it
///
/// Closures of type `Fn(&TagSet) -> TagSet` implement this directly.
pub trait TagTransform {
    fn transform(&self, tags: &TagSet) -> TagSet;
}

impl<F> TagTransform for F
where
    F: Fn(&TagSet) -> TagSet,
{
    fn transform(&self, tags: &TagSet) -> TagSet {
        self(tags)
    }
}

/// Leaves tags unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl TagTransform for Identity {
    fn transform(&self, tags: &TagSet) -> TagSet {
        tags.clone()
    }
}

/// Adds and removes fixed tags
#[derive(Debug, Clone, Default)]
pub struct TagEdit {
    pub add: TagSet,
    pub remove: TagSet,
}

impl TagEdit {
    pub fn new<A, R>(add: A, remove: R) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        R: IntoIterator,
        R::Item: Into<String>,
    {
        Self {
            add: add.into_iter().map(Into::into).collect(),
            remove: remove.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

impl TagTransform for TagEdit {
    fn transform(&self, tags: &TagSet) -> TagSet {
        tags.iter()
            .chain(self.add.iter())
            .filter(|tag| !self.remove.contains(*tag))
            .cloned()
            .collect()
    }
}

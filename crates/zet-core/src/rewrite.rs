//! Note rewriting
//!
//! `Rewriter` normalizes one note against the collection: stale tag blocks
//! are dropped, setext headings become `#` headings, the tag line is
//! regenerated, `[[id]]` links get a titled relative link and the
//! `## Backlinks` section is rebuilt at the end of the file.
//!
//! Everything the rewriter generates is removed again before it is
//! regenerated, so rewriting its own output changes nothing as long as the
//! collection is unchanged.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::{Component, Path, PathBuf};

use tracing::info;

use crate::collection::Collection;
use crate::error::{Result, ZetError};
use crate::lines::{parse_heading, Line, LineModel};
use crate::note::{Note, ID_RE};
use crate::persistence::{atomic_write, read_note};
use crate::tags::{format_tags, parse_tags, Identity, TagTransform};

/// Link title attribute marking generated decorations
pub const AUTOGEN_MARKER: &str = "autogen";

const BACKLINKS_TITLE: &str = "Backlinks";

static LINK_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[[0-9]{14}\]\]").expect("valid link token regex"));

/// A link token followed by its generated `[title](path "autogen")`.
///
/// Brackets in the title are escaped (or balanced one level deep in older
/// output). The path runs to the first ` "autogen")` and never holds `[[`,
/// so a match cannot reach into the next link.
static AUTOGEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(\[\[[0-9]{14}\]\]) ",
        r"\[(?:[^\[\]\\\n]|\\.|\[[^\[\]\n]*\])*\]",
        r#"\((?:[^\[\n]|\[[^\[\n])*? "autogen"\)"#,
    ))
    .expect("valid autogen regex")
});

/// Rewrites notes of one collection
pub struct Rewriter<'a> {
    collection: &'a Collection,
    tag_transform: Box<dyn TagTransform + 'a>,
}

impl<'a> Rewriter<'a> {
    pub fn new(collection: &'a Collection) -> Self {
        Self {
            collection,
            tag_transform: Box::new(Identity),
        }
    }

    /// Use `transform` for every tag line written
    pub fn with_tag_transform(mut self, transform: impl TagTransform + 'a) -> Self {
        self.tag_transform = Box::new(transform);
        self
    }

    /// Rewrite the note's current file content
    pub fn transform(&self, note: &Note) -> Result<String> {
        let content = read_note(&note.path)?;
        self.transform_content(note, &content)
    }

    /// Rewrite the note and write the result to `target` (default: the note's own file)
    ///
    /// Returns `false` without touching the file when the note is already in
    /// normal form.
    pub fn transform_write(&self, note: &Note, target: Option<&Path>) -> Result<bool> {
        let target = target.unwrap_or(&note.path);
        let current = read_note(&note.path)?;
        let transformed = self.transform_content(note, &current)?;

        if target == note.path && transformed == current {
            return Ok(false);
        }

        atomic_write(target, transformed.as_bytes())?;
        info!("Rewrote note {} to {:?}", note.id, target);
        Ok(true)
    }

    /// Rewrite `content` as the text of `note`
    pub fn transform_content(&self, note: &Note, content: &str) -> Result<String> {
        let model = LineModel::parse(content);
        let lines = model.lines();

        let insert_tags = note.tags.is_empty() && !lines.iter().any(is_rewritable_tag_line);
        let mut tags_inserted = false;

        let mut out: Vec<String> = Vec::with_capacity(lines.len());
        let mut prev_emitted = false;
        let mut prev_was_title = false;

        for (i, line) in lines.iter().enumerate() {
            let after_title = std::mem::take(&mut prev_was_title);
            let may_insert_tags = after_title && insert_tags && !tags_inserted && !line.in_code;

            let emitted =
                self.rewrite_line(note, lines, i, &mut out, prev_emitted, may_insert_tags)?;
            if may_insert_tags {
                tags_inserted = true;
            }

            prev_emitted = emitted.is_some();
            if let Some(text) = emitted {
                prev_was_title = !line.in_code && text.starts_with("# ");
                out.push(text);
            }

            if line.is_last {
                self.append_backlinks(note, &mut out);
            }
        }

        Ok(out.concat())
    }

    /// Apply the per-line rules; `None` drops the line
    fn rewrite_line(
        &self,
        note: &Note,
        lines: &[Line],
        i: usize,
        out: &mut Vec<String>,
        prev_emitted: bool,
        may_insert_tags: bool,
    ) -> Result<Option<String>> {
        let line = &lines[i];
        let mut text = line.text.clone();

        // Tag lines inside code blocks are left over from an older format
        if line.in_code && has_tag_marker(&text) {
            if out.last().is_some_and(|last| last.trim().is_empty()) {
                out.pop();
            }
            return Ok(None);
        }

        // Setext headings
        if i > 0 && !line.in_code && prev_emitted {
            let prev = &lines[i - 1];
            if !prev.in_code && !prev.is_blank() && parse_heading(&prev.text).is_none() {
                let prefix = if is_underline(&text, '=') {
                    Some("#")
                } else if is_underline(&text, '-') {
                    Some("##")
                } else {
                    None
                };
                if let Some(prefix) = prefix {
                    out.pop();
                    text = format!("{} {}\n", prefix, prev.content().trim());
                }
            }
        }

        // Tag line for notes that have none, right below the title
        if may_insert_tags {
            let tags = self.tag_transform.transform(&note.tags);
            if !tags.is_empty() {
                out.push("\n".to_string());
                out.push(format!("{}\n", format_tags(&tags)));
            }
        }

        if !line.in_code && has_tag_marker(&text) {
            let tags = self.tag_transform.transform(&parse_tags(&text));
            if tags.is_empty() {
                return Ok(None);
            }
            text = format!("{}\n", format_tags(&tags));
        }

        text = self.redecorate_links(note, &text, i + 1)?;

        // Old backlinks section, regenerated at the end of the file
        if line.section.len() == 2 && line.section[1].eq_ignore_ascii_case(BACKLINKS_TITLE) {
            return Ok(None);
        }

        Ok(Some(text))
    }

    /// Strip generated decorations, then decorate every `[[id]]` again
    fn redecorate_links(&self, note: &Note, text: &str, line_no: usize) -> Result<String> {
        let stripped = AUTOGEN_RE.replace_all(text, "$1");

        let mut malformed: Option<String> = None;
        let decorated = LINK_TOKEN_RE.replace_all(&stripped, |caps: &Captures| {
            let token = &caps[0];
            let ids: Vec<&str> = ID_RE.find_iter(token).map(|m| m.as_str()).collect();
            match ids.as_slice() {
                [zid] => self.format_link(note, zid),
                _ => {
                    malformed.get_or_insert_with(|| token.to_string());
                    token.to_string()
                }
            }
        });

        if let Some(token) = malformed {
            return Err(ZetError::MalformedLink {
                path: note.path.clone(),
                line: line_no,
                token,
            });
        }
        Ok(decorated.into_owned())
    }

    /// `[[id]]` plus a titled relative link when `zid` is in the collection
    pub fn format_link(&self, note: &Note, zid: &str) -> String {
        match self.collection.lookup(zid) {
            Some(target) => {
                let base = note.path.parent().unwrap_or_else(|| Path::new(""));
                let rel = relative_path(&target.path, base);
                format!(
                    "[[{}]] [{}]({} \"{}\")",
                    zid,
                    escape_title(&target.title),
                    rel.to_string_lossy().replace('\\', "/"),
                    AUTOGEN_MARKER
                )
            }
            None => format!("[[{}]]", zid),
        }
    }

    fn append_backlinks(&self, note: &Note, out: &mut Vec<String>) {
        let backlinks = self.collection.backlinks_of(&note.id);
        if backlinks.is_empty() {
            return;
        }

        // Exactly one blank line before the section
        if let Some(last) = out.last_mut() {
            if !last.ends_with('\n') {
                last.push('\n');
            }
        }
        while out.len() >= 2
            && out[out.len() - 1].trim().is_empty()
            && out[out.len() - 2].trim().is_empty()
        {
            out.pop();
        }
        if out.last().is_some_and(|last| !last.trim().is_empty()) {
            out.push("\n".to_string());
        }

        out.push(format!("## {}\n", BACKLINKS_TITLE));
        out.push("\n".to_string());
        for backlink in backlinks {
            out.push(format!("* {}\n", self.format_link(note, backlink)));
        }
    }
}

/// Backslash-escape what would end the link text early
fn escape_title(title: &str) -> String {
    let mut escaped = String::with_capacity(title.len());
    for ch in title.chars() {
        if matches!(ch, '\\' | '[' | ']') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn has_tag_marker(text: &str) -> bool {
    text.to_lowercase().contains("tags: ")
}

fn is_rewritable_tag_line(line: &Line) -> bool {
    !line.in_code && has_tag_marker(&line.text)
}

/// At least three `ch` and nothing else
fn is_underline(text: &str, ch: char) -> bool {
    let trimmed = text.trim_end();
    trimmed.len() >= 3 && trimmed.chars().all(|c| c == ch)
}

/// Path of `target` relative to the directory `base`
fn relative_path(target: &Path, base: &Path) -> PathBuf {
    fn significant(path: &Path) -> Vec<Component<'_>> {
        path.components()
            .filter(|c| !matches!(c, Component::CurDir))
            .collect()
    }
    let target = significant(target);
    let base = significant(base);

    let common = target
        .iter()
        .zip(base.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut rel = PathBuf::new();
    for _ in &base[common..] {
        rel.push("..");
    }
    for component in &target[common..] {
        rel.push(component.as_os_str());
    }
    rel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::{TagEdit, TagSet};
    use std::fs;
    use tempfile::TempDir;

    const ROOT: &str = "00000000000000";
    const A: &str = "20230101000001";
    const B: &str = "20230101000002";
    const MISSING: &str = "20239999999999";

    /// Notes live in `/notes/<file name>`
    fn collection(files: &[(&str, &str)]) -> Collection {
        let mut zk = Collection::new();
        zk.register(
            files
                .iter()
                .map(|(name, content)| Note::from_content(format!("/notes/{}", name), content)),
        );
        zk.finalize();
        zk
    }

    fn rewrite(zk: &Collection, id: &str, content: &str) -> String {
        let note = zk.lookup(id).unwrap();
        Rewriter::new(zk).transform_content(note, content).unwrap()
    }

    /// Rewrite the output again as a re-read note would be
    fn assert_stable(rewriter: &Rewriter, note: &Note, content: &str) -> String {
        let once = rewriter.transform_content(note, content).unwrap();
        let reread = Note::from_content(note.path.clone(), &once);
        let twice = rewriter.transform_content(&reread, &once).unwrap();
        assert_eq!(once, twice);
        once
    }

    #[test]
    fn test_backlinks_section_appended() {
        let root = "# Root\n\nSee [[20230101000001]].\n";
        let a = "# A\n\nBody\n";
        let zk = collection(&[("00000000000000_root.md", root), ("20230101000001_a.md", a)]);

        let out = rewrite(&zk, A, a);
        assert_eq!(
            out,
            "# A\n\nBody\n\n## Backlinks\n\n* [[00000000000000]] [Root](00000000000000_root.md \"autogen\")\n"
        );
        assert!(out.ends_with(
            "\n## Backlinks\n\n* [[00000000000000]] [Root](00000000000000_root.md \"autogen\")\n"
        ));
    }

    #[test]
    fn test_links_decorated() {
        let root = "# Root\n\nSee [[20230101000001]].\n";
        let zk = collection(&[
            ("00000000000000_root.md", root),
            ("20230101000001_a.md", "# A\n"),
        ]);

        assert_eq!(
            rewrite(&zk, ROOT, root),
            "# Root\n\nSee [[20230101000001]] [A](20230101000001_a.md \"autogen\").\n"
        );
    }

    #[test]
    fn test_stale_decorations_replaced() {
        let content = "\
Old [[20230101000001]] [Previous title](old/place.md \"autogen\") here.
Gone [[20239999999999]] [Deleted](deleted.md \"autogen\").
Mine [[20230101000001]] [custom](https://example.com) stays.
";
        let zk = collection(&[
            ("20230101000002_b.md", content),
            ("20230101000001_a.md", "# A title\n"),
        ]);

        assert_eq!(
            rewrite(&zk, B, content),
            "\
Old [[20230101000001]] [A title](20230101000001_a.md \"autogen\") here.
Gone [[20239999999999]].
Mine [[20230101000001]] [A title](20230101000001_a.md \"autogen\") [custom](https://example.com) stays.
"
        );
    }

    #[test]
    fn test_decoration_stable_for_unusual_names() {
        let cases = [
            ("20230101000001_notes (draft).md", "# A\n"),
            ("20230101000001_say \"hi\".md", "# A\n"),
            ("20230101000001_meeting.md", "# Meeting [2023]\n"),
            ("20230101000001_odd.md", "# Half ] open [ c:\\dir\n"),
        ];
        let content = "See [[20230101000001]].\n";

        for (name, a) in cases {
            let zk = collection(&[("20230101000002_b.md", content), (name, a)]);
            let note = zk.lookup(B).unwrap();
            let out = assert_stable(&Rewriter::new(&zk), note, content);
            assert_eq!(out.matches("\"autogen\"").count(), 1, "{}", out);
        }
    }

    #[test]
    fn test_title_brackets_escaped() {
        let content = "See [[20230101000001]].\n";
        let zk = collection(&[
            ("20230101000002_b.md", content),
            ("20230101000001_meeting.md", "# Meeting [2023]\n"),
        ]);
        assert_eq!(
            rewrite(&zk, B, content),
            "See [[20230101000001]] [Meeting \\[2023\\]](20230101000001_meeting.md \"autogen\").\n"
        );
    }

    #[test]
    fn test_user_link_between_decorations_kept() {
        let content = "[[20230101000001]] [mine](x.md) then [[20230101000001]] [A](a.md \"autogen\")\n";
        let zk = collection(&[
            ("20230101000002_b.md", content),
            ("20230101000001_a.md", "# A\n"),
        ]);
        let link = "[[20230101000001]] [A](20230101000001_a.md \"autogen\")";
        assert_eq!(
            rewrite(&zk, B, content),
            format!("{} [mine](x.md) then {}\n", link, link)
        );
    }

    #[test]
    fn test_unresolved_link_left_bare() {
        let content = format!("Missing [[{}]] stays.\n", MISSING);
        let zk = collection(&[("20230101000002_b.md", content.as_str())]);
        assert_eq!(rewrite(&zk, B, &content), content);
    }

    #[test]
    fn test_repeated_link_on_one_line() {
        let content = "[[20230101000001]] and [[20230101000001]]\n";
        let zk = collection(&[
            ("20230101000002_b.md", content),
            ("20230101000001_a.md", "# A\n"),
        ]);
        let link = "[[20230101000001]] [A](20230101000001_a.md \"autogen\")";
        assert_eq!(
            rewrite(&zk, B, content),
            format!("{} and {}\n", link, link)
        );
    }

    #[test]
    fn test_relative_path_across_directories() {
        let mut zk = Collection::new();
        zk.register(vec![
            Note::from_content("/notes/sub/20230101000002_b.md", "[[20230101000001]]\n"),
            Note::from_content("/notes/20230101000001_a.md", "# A\n"),
        ]);
        zk.finalize();

        let out = rewrite(&zk, B, "[[20230101000001]]\n");
        assert_eq!(
            out,
            "[[20230101000001]] [A](../20230101000001_a.md \"autogen\")\n"
        );
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path(Path::new("/n/a/x.md"), Path::new("/n/b")),
            PathBuf::from("../a/x.md")
        );
        assert_eq!(
            relative_path(Path::new("notes/x.md"), Path::new("./notes")),
            PathBuf::from("x.md")
        );
        assert_eq!(relative_path(Path::new("x.md"), Path::new("")), PathBuf::from("x.md"));
    }

    #[test]
    fn test_tag_line_sorted() {
        let content = "# T\n\nTags: #b #a\n\nBody\n";
        let zk = collection(&[("20230101000002_b.md", content)]);
        assert_eq!(rewrite(&zk, B, content), "# T\n\nTags: #a #b\n\nBody\n");
    }

    #[test]
    fn test_code_tags_before_real_tag_line() {
        let content = "# T\n\n```\ntags: #legacy\n```\n\nTags: #real #idea\n";
        let zk = collection(&[("20230101000002_b.md", content)]);
        let note = zk.lookup(B).unwrap();

        let out = assert_stable(&Rewriter::new(&zk), note, content);
        assert_eq!(out, "# T\n\n```\n```\n\nTags: #idea #real\n");
    }

    #[test]
    fn test_tag_line_dropped_when_empty() {
        let content = "# T\n\ntags: #draft\nBody\n";
        let zk = collection(&[("20230101000002_b.md", content)]);
        let note = zk.lookup(B).unwrap();

        let rewriter = Rewriter::new(&zk).with_tag_transform(TagEdit::new(Vec::<String>::new(), ["draft"]));
        assert_eq!(
            rewriter.transform_content(note, content).unwrap(),
            "# T\n\nBody\n"
        );
    }

    #[test]
    fn test_tag_line_inserted_below_title() {
        let content = "# T\n\nBody\n# Second\nmore\n";
        let zk = collection(&[("20230101000002_b.md", content)]);
        let note = zk.lookup(B).unwrap();

        let rewriter = Rewriter::new(&zk).with_tag_transform(TagEdit::new(["inbox"], Vec::<String>::new()));
        let out = assert_stable(&rewriter, note, content);
        assert_eq!(out, "# T\n\nTags: #inbox\n\nBody\n# Second\nmore\n");
    }

    #[test]
    fn test_no_tag_line_for_empty_transform() {
        let content = "# T\n\nBody\n";
        let zk = collection(&[("20230101000002_b.md", content)]);
        assert_eq!(rewrite(&zk, B, content), content);
    }

    #[test]
    fn test_closure_tag_transform() {
        let content = "# T\nTags: #Mixed #CASE\n";
        let zk = collection(&[("20230101000002_b.md", content)]);
        let note = zk.lookup(B).unwrap();

        let lower = |tags: &TagSet| tags.iter().map(|t| t.to_lowercase()).collect::<TagSet>();
        let rewriter = Rewriter::new(&zk).with_tag_transform(lower);
        assert_eq!(
            rewriter.transform_content(note, content).unwrap(),
            "# T\nTags: #case #mixed\n"
        );
    }

    #[test]
    fn test_stale_code_tags_removed() {
        let content = "# T\n\n```\ncode\n\nTags: #old\n```\nafter\n";
        let zk = collection(&[("20230101000002_b.md", content)]);
        assert_eq!(rewrite(&zk, B, content), "# T\n\n```\ncode\n```\nafter\n");
    }

    #[test]
    fn test_setext_headings() {
        let content = "Title\n=====\n\nIntro\n\nPart\n----\ntext\n";
        let zk = collection(&[("20230101000002_b.md", content)]);
        assert_eq!(
            rewrite(&zk, B, content),
            "# Title\n\nIntro\n\n## Part\ntext\n"
        );
    }

    #[test]
    fn test_rules_are_not_setext_headings() {
        let content = "# Heading\n---\nafter\n\n---\n```\ncode\n===\n```\n";
        let zk = collection(&[("20230101000002_b.md", content)]);
        assert_eq!(rewrite(&zk, B, content), content);
    }

    #[test]
    fn test_code_blocks_untouched_by_tag_rules() {
        let content = "# T\n\n```\n# not a title\n===\n```\n";
        let zk = collection(&[("20230101000002_b.md", content)]);
        let note = zk.lookup(B).unwrap();

        let rewriter = Rewriter::new(&zk).with_tag_transform(TagEdit::new(["x"], Vec::<String>::new()));
        assert_eq!(
            rewriter.transform_content(note, content).unwrap(),
            "# T\n\nTags: #x\n\n```\n# not a title\n===\n```\n"
        );
    }

    #[test]
    fn test_old_backlinks_section_replaced() {
        let b = "\
# B

Intro

## Backlinks

* [[20230101000009]] stale entry

## After

text
";
        let zk = collection(&[
            ("20230101000002_b.md", b),
            ("20230101000001_a.md", "# A\n\nsee [[20230101000002]]\n"),
        ]);

        let out = rewrite(&zk, B, b);
        assert_eq!(
            out,
            "\
# B

Intro

## After

text

## Backlinks

* [[20230101000001]] [A](20230101000001_a.md \"autogen\")
"
        );
    }

    #[test]
    fn test_backlinks_removed_when_none_left() {
        let content = "# T\n\ntext\n\n## Backlinks\n\n* [[20230101000001]]\n";
        let zk = collection(&[("20230101000002_b.md", content)]);
        let note = zk.lookup(B).unwrap();

        let out = assert_stable(&Rewriter::new(&zk), note, content);
        assert_eq!(out, "# T\n\ntext\n\n");
    }

    #[test]
    fn test_backlinks_spacing_normalized() {
        let zk = collection(&[
            ("20230101000002_b.md", ""),
            ("20230101000001_a.md", "# A\n[[20230101000002]]\n"),
        ]);
        let section = "\n## Backlinks\n\n* [[20230101000001]] [A](20230101000001_a.md \"autogen\")\n";

        // No final newline
        assert_eq!(rewrite(&zk, B, "Body"), format!("Body\n{}", section));
        // Several trailing blank lines collapse to one
        assert_eq!(rewrite(&zk, B, "Body\n\n\n\n"), format!("Body\n{}", section));
        // Already one blank line
        assert_eq!(rewrite(&zk, B, "Body\n\n"), format!("Body\n{}", section));
        // Empty note gets no section
        assert_eq!(rewrite(&zk, B, ""), "");
    }

    #[test]
    fn test_backlinks_without_title() {
        let zk = collection(&[
            ("20230101000002_b.md", ""),
            ("20230101000001_a.md", "# A\n[[20230101000002]]\n"),
        ]);
        let note = zk.lookup(B).unwrap();
        let out = assert_stable(&Rewriter::new(&zk), note, "just text\n");
        assert!(out.starts_with("just text\n\n## Backlinks\n"));
    }

    #[test]
    fn test_backlinks_sorted() {
        let zk = collection(&[
            ("00000000000000_root.md", "# Root\n[[20230101000002]]\n"),
            ("20230101000001_a.md", "# A\n[[20230101000002]]\n"),
            ("20230101000002_b.md", "# B\n"),
        ]);
        let out = rewrite(&zk, B, "# B\n");
        let bullets: Vec<&str> = out.lines().filter(|l| l.starts_with("* ")).collect();
        assert_eq!(
            bullets,
            vec![
                "* [[00000000000000]] [Root](00000000000000_root.md \"autogen\")",
                "* [[20230101000001]] [A](20230101000001_a.md \"autogen\")",
            ]
        );
    }

    #[test]
    fn test_full_note_is_stable() {
        let content = "\
Zettel title
============

Tags: #zeta #alpha

Links to [[20230101000001]] [Old](x.md \"autogen\") and [[20239999999999]].

Section
-------

```
tags: #legacy
[[20230101000001]]
```

## Backlinks

* [[20230101000005]] gone
";
        let zk = collection(&[
            ("00000000000000_root.md", "# Root\n[[20230101000002]]\n"),
            ("20230101000001_a.md", "# A\n"),
            ("20230101000002_b.md", content),
        ]);
        let note = zk.lookup(B).unwrap();
        let out = assert_stable(&Rewriter::new(&zk), note, content);

        assert!(out.starts_with("# Zettel title\n\nTags: #alpha #zeta\n"));
        assert!(out.contains("## Section\n"));
        assert!(!out.contains("legacy"));
        assert!(!out.contains("20230101000005"));
        assert!(out.ends_with(
            "## Backlinks\n\n* [[00000000000000]] [Root](00000000000000_root.md \"autogen\")\n"
        ));
    }

    #[test]
    fn test_transform_write() {
        let temp_dir = TempDir::new().unwrap();
        let a_path = temp_dir.path().join("20230101000001_a.md");
        let b_path = temp_dir.path().join("20230101000002_b.md");
        fs::write(&a_path, "# A\n\nTags: #y #x\n").unwrap();
        fs::write(&b_path, "# B\n\n[[20230101000001]]\n").unwrap();

        let mut zk = Collection::new();
        zk.register(vec![
            Note::from_path(&a_path).unwrap(),
            Note::from_path(&b_path).unwrap(),
        ]);
        zk.finalize();
        let rewriter = Rewriter::new(&zk);

        let a = zk.lookup(A).unwrap();
        assert!(rewriter.transform_write(a, None).unwrap());
        assert_eq!(
            fs::read_to_string(&a_path).unwrap(),
            "# A\n\nTags: #x #y\n\n## Backlinks\n\n* [[20230101000002]] [B](20230101000002_b.md \"autogen\")\n"
        );

        // Second run finds nothing to do
        let a = Note::from_path(&a_path).unwrap();
        assert!(!rewriter.transform_write(&a, None).unwrap());

        // Writing elsewhere leaves the source alone; links stay relative to the source
        let b = zk.lookup(B).unwrap();
        let copy = temp_dir.path().join("out").join("b.md");
        assert!(rewriter.transform_write(b, Some(&copy)).unwrap());
        assert_eq!(fs::read_to_string(&b_path).unwrap(), "# B\n\n[[20230101000001]]\n");
        assert_eq!(
            fs::read_to_string(&copy).unwrap(),
            "# B\n\n[[20230101000001]] [A](20230101000001_a.md \"autogen\")\n"
        );
    }

    #[test]
    fn test_transform_missing_file() {
        let zk = collection(&[("20230101000002_b.md", "")]);
        let note = zk.lookup(B).unwrap();
        let err = Rewriter::new(&zk).transform(note).unwrap_err();
        assert!(matches!(err, ZetError::NotFound { .. }));
    }
}

//! Annotated line model
//!
//! Splits note content into lines that keep their terminators and annotates
//! each with the code-fence state, the enclosing heading path and whether it
//! is the physical last line. Built once per rewrite.

/// One line of a note with its markdown context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// Raw text including the trailing newline, if any
    pub text: String,
    /// Inside a fenced code block, both fence lines included
    pub in_code: bool,
    /// Titles of the enclosing headings; index `n` holds the level `n + 1`
    /// heading. Skipped levels are padded with empty titles.
    pub section: Vec<String>,
    pub is_last: bool,
}

impl Line {
    /// The text without its line terminator
    pub fn content(&self) -> &str {
        self.text.trim_end_matches(['\n', '\r'])
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// The annotated lines of one note
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineModel {
    lines: Vec<Line>,
}

impl LineModel {
    pub fn parse(content: &str) -> Self {
        let mut lines = Vec::new();
        let mut in_code = false;
        let mut section: Vec<String> = Vec::new();

        for text in content.split_inclusive('\n') {
            let fence = is_fence(text);
            let line_in_code = in_code || fence;
            if fence {
                in_code = !in_code;
            }

            // Headings move the section path even inside code blocks
            if let Some((level, title)) = parse_heading(text) {
                section.truncate(level - 1);
                section.resize(level - 1, String::new());
                section.push(title);
            }

            lines.push(Line {
                text: text.to_string(),
                in_code: line_in_code,
                section: section.clone(),
                is_last: false,
            });
        }

        if let Some(last) = lines.last_mut() {
            last.is_last = true;
        }

        Self { lines }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

fn is_fence(text: &str) -> bool {
    text.trim_start().starts_with("```")
}

/// Level and title of an ATX heading (`#` to `######`, then a space or nothing)
pub(crate) fn parse_heading(text: &str) -> Option<(usize, String)> {
    let trimmed = text.trim_end();
    let level = trimmed.chars().take_while(|&c| c == '#').count();
    if level == 0 || level > 6 {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.is_empty() && !rest.starts_with(' ') {
        return None;
    }
    Some((level, rest.trim().to_string()))
}

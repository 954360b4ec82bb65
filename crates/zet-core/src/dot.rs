//! Graphviz export
//!
//! Renders the link graph as a `digraph` with one box per note. Node colors
//! come from a [`ColorPicker`]; three pickers are provided.

use std::collections::{BTreeSet, HashMap};
use std::fmt::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::collection::Collection;
use crate::note::Note;

const DEFAULT_COLOR: &str = "#8dd3c7";
const GRADIENT_START: &str = "#f67280";
const GRADIENT_END: &str = "#fff7f8";
const MULTI_CATEGORY_COLOR: &str = "white";

const CATEGORY_PALETTE: [&str; 12] = [
    "#8dd3c7", "#ffffb3", "#bebada", "#fb8072", "#80b1d3", "#fdb462", "#b3de69", "#fccde5",
    "#d9d9d9", "#bc80bd", "#ccebc5", "#ffed6f",
];

/// Chooses the node color of a note
pub trait ColorPicker {
    fn pick(&self, note: &Note) -> String;
}

impl<F> ColorPicker for F
where
    F: Fn(&Note) -> String,
{
    fn pick(&self, note: &Note) -> String {
        self(note)
    }
}

/// The same color for every note
#[derive(Debug, Clone)]
pub struct ConstantColor(pub String);

impl Default for ConstantColor {
    fn default() -> Self {
        Self(DEFAULT_COLOR.to_string())
    }
}

impl ColorPicker for ConstantColor {
    fn pick(&self, _note: &Note) -> String {
        self.0.clone()
    }
}

/// One palette color per category
///
/// A note with exactly one category gets that category's color; notes with
/// none or several are white.
#[derive(Debug, Clone)]
pub struct CategoryColors {
    prefix: String,
    colors: HashMap<String, String>,
}

impl CategoryColors {
    pub fn new(collection: &Collection) -> Self {
        Self::with_palette(collection, &CATEGORY_PALETTE)
    }

    /// Assign `palette` round-robin to the sorted categories
    pub fn with_palette(collection: &Collection, palette: &[&str]) -> Self {
        let colors = if palette.is_empty() {
            HashMap::new()
        } else {
            collection
                .categories()
                .into_iter()
                .zip(palette.iter().cycle())
                .map(|(category, color)| (category, color.to_string()))
                .collect()
        };
        Self {
            prefix: collection.category_prefix().to_string(),
            colors,
        }
    }
}

impl ColorPicker for CategoryColors {
    fn pick(&self, note: &Note) -> String {
        let mut categories = note.tags.iter().filter(|tag| tag.starts_with(&self.prefix));
        match (categories.next(), categories.next()) {
            (Some(category), None) => self
                .colors
                .get(category)
                .cloned()
                .unwrap_or_else(|| MULTI_CATEGORY_COLOR.to_string()),
            _ => MULTI_CATEGORY_COLOR.to_string(),
        }
    }
}

/// Color fades with distance from the root
///
/// The gradient has one step per depth level of the collection. A note at
/// depth `d >= 1` gets step `d - 1`; the root and unreachable notes get the
/// first step.
#[derive(Debug, Clone)]
pub struct DepthGradient {
    colors: Vec<String>,
}

impl DepthGradient {
    pub fn new(collection: &Collection) -> Self {
        Self::between(GRADIENT_START, GRADIENT_END, collection.depth())
    }

    /// Gradient of `steps` colors from `start` to `end` (hex `#rrggbb`)
    ///
    /// Colors that do not parse are treated as black.
    pub fn between(start: &str, end: &str, steps: usize) -> Self {
        let steps = steps.max(1);
        let from = parse_hex(start).unwrap_or_default();
        let to = parse_hex(end).unwrap_or_default();

        let colors = (0..steps)
            .map(|i| {
                let t = if steps == 1 {
                    0.0
                } else {
                    i as f64 / (steps - 1) as f64
                };
                let channel = |a: u8, b: u8| {
                    (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8
                };
                format!(
                    "#{:02x}{:02x}{:02x}",
                    channel(from[0], to[0]),
                    channel(from[1], to[1]),
                    channel(from[2], to[2])
                )
            })
            .collect();

        Self { colors }
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }
}

impl ColorPicker for DepthGradient {
    fn pick(&self, note: &Note) -> String {
        let step = match note.depth() {
            Some(depth) if depth >= 1 => depth - 1,
            _ => 0,
        };
        self.colors
            .get(step)
            .or_else(|| self.colors.last())
            .cloned()
            .unwrap_or_else(|| DEFAULT_COLOR.to_string())
    }
}

fn parse_hex(color: &str) -> Option<[u8; 3]> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

/// Render the collection as a Graphviz digraph
///
/// Nodes are listed in id order, each followed by its outgoing edges. A
/// link that is answered by a link back is drawn once with `dir=both`.
/// Links to unknown notes are left out.
pub fn render(collection: &Collection, picker: &dyn ColorPicker) -> String {
    let mut out = String::new();
    out.push_str("digraph zettelkasten {\n");
    out.push_str("\tnode [shape=box];\n");

    let mut drawn: BTreeSet<(&str, &str)> = BTreeSet::new();
    let mut edges = 0usize;

    for note in collection.notes() {
        let depth = note
            .depth()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "\t{} [label=\"{} ({})\" labelURL=\"file://{}\" color={}];",
            quote_id(&note.id),
            escape(&note.title),
            depth,
            absolute(&note.path).display(),
            quote_attr(&picker.pick(note))
        );

        for link in note.unique_links() {
            let Some(target) = collection.lookup(link) else {
                continue;
            };
            if drawn.contains(&(note.id.as_str(), link)) {
                continue;
            }
            if target.links.iter().any(|l| *l == note.id) {
                let _ = writeln!(
                    out,
                    "\t{} -> {} [color=black dir=both];",
                    quote_id(&note.id),
                    quote_id(link)
                );
                drawn.insert((note.id.as_str(), link));
                drawn.insert((target.id.as_str(), note.id.as_str()));
            } else {
                let _ = writeln!(
                    out,
                    "\t{} -> {} [color=black];",
                    quote_id(&note.id),
                    quote_id(link)
                );
                drawn.insert((note.id.as_str(), link));
            }
            edges += 1;
        }
    }

    out.push('}');
    out.push('\n');
    debug!("Rendered {} nodes and {} edges", collection.len(), edges);
    out
}

/// Bare 14-digit ids are valid dot ids; anything else is quoted
fn quote_id(id: &str) -> String {
    if !id.is_empty() && id.chars().all(|c| c.is_ascii_digit()) {
        id.to_string()
    } else {
        format!("\"{}\"", escape(id))
    }
}

fn quote_attr(value: &str) -> String {
    if value.starts_with('#') {
        format!("\"{}\"", value)
    } else {
        value.to_string()
    }
}

fn escape(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

fn absolute(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    })
}

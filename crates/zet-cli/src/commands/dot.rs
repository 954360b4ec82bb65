//! Dot command handler

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;

use zet_core::dot::render;
use zet_core::persistence::atomic_write;
use zet_core::{CategoryColors, ColorPicker, Config, ConstantColor, DepthGradient};

use super::load_collection;
use crate::output::Output;

/// How nodes are colored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorMode {
    /// Fade with distance from the root note
    #[default]
    Depth,
    /// One color per category tag
    Category,
    /// Same color everywhere
    Constant,
}

/// Print or write the Graphviz graph of the collection
pub fn run(
    dir: &Path,
    config: &Config,
    color: ColorMode,
    out: Option<PathBuf>,
    output: &Output,
) -> Result<()> {
    let loaded = load_collection(dir, config)?;
    let collection = &loaded.collection;

    let picker: Box<dyn ColorPicker> = match color {
        ColorMode::Depth => Box::new(DepthGradient::new(collection)),
        ColorMode::Category => Box::new(CategoryColors::new(collection)),
        ColorMode::Constant => Box::new(ConstantColor::default()),
    };
    let graph = render(collection, picker.as_ref());

    match out {
        Some(path) => {
            atomic_write(&path, graph.as_bytes())
                .with_context(|| format!("Failed to write graph to {}", path.display()))?;
            output.success(&format!(
                "Wrote graph of {} notes to {}",
                collection.len(),
                path.display()
            ));
        }
        None => print!("{}", graph),
    }

    Ok(())
}

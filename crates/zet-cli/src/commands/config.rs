//! Config command handlers

use std::path::{Path, PathBuf};

use anyhow::Result;

use zet_core::Config;

use crate::output::{Output, OutputFormat};

/// Show the effective configuration
pub fn show(
    config: &Config,
    config_path: Option<&PathBuf>,
    notes_dir: &Path,
    output: &Output,
) -> Result<()> {
    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "notes_dir": notes_dir,
                    "root_id": config.root_id,
                    "category_prefix": config.category_prefix,
                    "extension": config.extension,
                    "excluded_dirs": config.excluded_dirs,
                    "log_file": config.log_file
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", notes_dir.display());
        }
        OutputFormat::Human => {
            let effective_path = config_path
                .cloned()
                .unwrap_or_else(Config::config_file_path);
            println!("Configuration:");
            println!("  notes_dir:       {}", notes_dir.display());
            println!("  root_id:         {}", config.root_id);
            println!("  category_prefix: {}", config.category_prefix);
            println!("  extension:       {}", config.extension);
            println!("  excluded_dirs:   {}", config.excluded_dirs.join(", "));
            println!(
                "  log_file:        {}",
                config
                    .log_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(not set)".to_string())
            );
            println!();
            println!("Config file: {}", effective_path.display());
        }
    }

    Ok(())
}

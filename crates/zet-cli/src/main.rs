//! Zet CLI
//!
//! Command-line interface for zet - keeps a zettelkasten's links, tags and
//! backlinks in shape.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use zet_core::Config;

mod commands;
mod output;

use commands::dot::ColorMode;
use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "zet")]
#[command(about = "zet - Zettelkasten link graph and note rewriter")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to config file (overrides ZET_CONFIG and default location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Notes directory (overrides the configured notes_dir)
    #[arg(short, long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rewrite every note: tag lines, link titles and backlinks
    Transform {
        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
        /// Tag to add to every note
        #[arg(long = "add-tag")]
        add_tag: Vec<String>,
        /// Tag to remove from every note
        #[arg(long = "remove-tag")]
        remove_tag: Vec<String>,
    },
    /// Export the link graph in Graphviz dot format
    Dot {
        /// Node coloring
        #[arg(long, value_enum, default_value_t = ColorMode::Depth)]
        color: ColorMode,
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show collection statistics
    Stats,
    /// Show a note with its links and backlinks
    Show {
        /// Note ID (or file name)
        id: String,
    },
    /// Create a new note
    #[command(alias = "add")]
    New {
        /// Note title
        title: String,
        /// Tags to add
        #[arg(short, long)]
        tag: Vec<String>,
    },
    /// Show configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    let config = load_config(cli.config.as_deref())?;
    init_logging(&config);

    let notes_dir = match &cli.dir {
        Some(dir) => dir.clone(),
        None => config.notes_dir_or(Path::new(".")),
    };
    info!("Using notes directory {:?}", notes_dir);

    match cli.command {
        Commands::Transform {
            dry_run,
            add_tag,
            remove_tag,
        } => commands::transform::run(&notes_dir, &config, dry_run, add_tag, remove_tag, &output),
        Commands::Dot { color, output: out } => {
            commands::dot::run(&notes_dir, &config, color, out, &output)
        }
        Commands::Stats => commands::stats::show(&notes_dir, &config, &output),
        Commands::Show { id } => commands::show::show(&notes_dir, &config, &id, &output),
        Commands::New { title, tag } => commands::new::create(&notes_dir, &title, tag, &output),
        Commands::Config { command } => match command {
            Some(ConfigCommands::Show) | None => {
                commands::config::show(&config, cli.config.as_ref(), &notes_dir, &output)
            }
        },
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    config.context("Failed to load configuration")
}

/// Initialize logging
///
/// Level comes from ZET_LOG (default: warn). Logs go to stderr, or to
/// config.log_file when one is set.
fn init_logging(config: &Config) {
    let log_level = std::env::var("ZET_LOG").unwrap_or_else(|_| "warn".to_string());
    let env_filter = || EnvFilter::new(format!("zet_core={},zet_cli={}", log_level, log_level));

    if let Some(log_path) = &config.log_file {
        match File::create(log_path) {
            Ok(log_file) => {
                // Ignore error if already initialized
                let _ = tracing_subscriber::fmt()
                    .with_env_filter(env_filter())
                    .with_target(false)
                    .with_ansi(false)
                    .with_writer(log_file)
                    .try_init();
                return;
            }
            Err(e) => {
                eprintln!("Warning: Could not create log file {:?}: {}", log_path, e);
            }
        }
    }

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

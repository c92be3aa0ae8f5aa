//! gocal CLI tool.
//!
//! Usage:
//! ```bash
//! gocal [OPTIONS] [CONFIG]
//! gocal init
//! ```

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Manifest declaring the module path, relative to the module root.
pub const MANIFEST_FILE: &str = "go.mod";

/// Exit code for a completed run that found violations.
pub const VIOLATIONS_EXIT_CODE: i32 = 2;

/// Layered architecture checker for Go modules
#[derive(Parser)]
#[command(name = "gocal")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    check: CheckArgs,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter layer configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Options for a check run.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Layer configuration file (default: .gocal in the module root)
    pub config: Option<PathBuf>,

    /// Module root directory containing go.mod
    #[arg(short = 'C', long = "dir", default_value = ".")]
    pub dir: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Import matching strategy (overrides the config file)
    #[arg(long)]
    pub strategy: Option<StrategyArg>,

    /// Exclude patterns (can be specified multiple times)
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// Number of layers checked in parallel
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,

    /// Exit with 0 even when violations are found
    #[arg(long)]
    pub exit_zero: bool,
}

/// Output format for check results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One line per violating file.
    Compact,
}

/// Import matching strategy selection.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum StrategyArg {
    /// Raw string prefix (`m/infra2` matches `m/infra`).
    Prefix,
    /// Whole path segments only.
    Segment,
}

impl From<StrategyArg> for gocal_core::MatchStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Prefix => Self::Prefix,
            StrategyArg::Segment => Self::Segment,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Init { force }) => commands::init::run(force),
        None => commands::check::run(&cli.check),
    }
}

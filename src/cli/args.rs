//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::HashSetting;

/// Content-hash fingerprinting for static web assets
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: cachebust.toml, if present)
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub const fn verbose(&self) -> bool {
        match &self.command {
            Commands::Build { args } => args.verbose,
            Commands::Check { args } => args.verbose,
        }
    }
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Fingerprint assets from INPUT and write them to OUTPUT
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        args: BuildArgs,
    },

    /// Discover the asset graph and report problems without writing
    #[command(visible_alias = "c")]
    Check {
        #[command(flatten)]
        args: CheckArgs,
    },
}

/// `build` command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct BuildArgs {
    /// Input directory (the asset tree to fingerprint)
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub input: PathBuf,

    /// Output directory
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub output: PathBuf,

    /// Development build: fingerprinting is off unless enabled explicitly
    #[arg(short, long)]
    pub dev: bool,

    /// Force fingerprinting on or off regardless of build mode
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub enabled: Option<bool>,

    /// URL prefix for referenced assets (e.g. https://cdn.example.com/)
    #[arg(short, long, value_hint = clap::ValueHint::Url)]
    pub prepend: Option<String>,

    /// Glob of assets that keep their name (repeatable)
    #[arg(short, long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Hash algorithm: md5, sha1, sha256, blake3 or none
    #[arg(long, value_name = "ALG")]
    pub hash: Option<HashSetting>,

    /// Keep only this many hex characters of each digest
    #[arg(long, value_name = "N")]
    pub hash_length: Option<usize>,

    /// Seed glob for graph discovery (repeatable)
    #[arg(short, long, value_name = "GLOB")]
    pub load: Vec<String>,

    /// Copy files outside the asset graph to the output unchanged
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub copy_unlisted: Option<bool>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

/// `check` command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// Input directory
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub input: PathBuf,

    /// Seed glob for graph discovery (repeatable)
    #[arg(short, long, value_name = "GLOB")]
    pub load: Vec<String>,

    /// Glob of assets that keep their name (repeatable)
    #[arg(short, long, value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Hash algorithm used for the planned names
    #[arg(long, value_name = "ALG")]
    pub hash: Option<HashSetting>,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Exit with an error when dangling references are found
    #[arg(short, long)]
    pub strict: bool,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

//! cachebust - content-hash fingerprinting for static web assets.

use anyhow::Result;
use cachebust::cli::{Cli, Commands, build::build_assets, check::check_assets};
use cachebust::config::Config;
use cachebust::logger;
use clap::{ColorChoice, Parser};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose());

    let config = Config::load(cli.config.as_deref())?;

    match &cli.command {
        Commands::Build { args } => build_assets(config, args).map(|_| ()),
        Commands::Check { args } => check_assets(config, args).map(|_| ()),
    }
}

//! `cachebust build`: fingerprint an input tree into an output directory.
//!
//! Phases:
//! - **Config** - defaults, `cachebust.toml`, CLI overrides, validation
//! - **Pipeline** - discover, plan, rewrite, write
//! - **Report** - warnings and a summary line

use anyhow::{Context, Result, bail};

use crate::config::{BuildMode, Config};
use crate::logger;
use crate::pipeline::run;
use crate::report::BuildReport;
use crate::{debug, log};

use super::BuildArgs;

/// Run a build with the loaded `config` and CLI `args` applied on top.
pub fn build_assets(mut config: Config, args: &BuildArgs) -> Result<BuildReport> {
    logger::set_quiet(args.quiet);
    config.apply_build_args(args);

    if args.input == args.output {
        bail!("input and output must be different directories");
    }

    let mode = if args.dev {
        BuildMode::Development
    } else {
        BuildMode::Production
    };
    let mut opts = config.pipeline_options(mode)?;
    opts.progress = !args.quiet;

    if !opts.policy.enabled {
        log!("build"; "fingerprinting disabled, copying {}", args.input.display());
    }
    debug!("build"; "{:?}", opts.policy);

    let report = run(&args.input, &args.output, &opts)
        .with_context(|| format!("building {}", args.input.display()))?;

    if !args.quiet {
        report.log_summary();
    }
    Ok(report)
}

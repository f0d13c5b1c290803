//! `cachebust check`: report the asset graph without writing anything.

use anyhow::{Result, bail};

use crate::config::{BuildMode, Config};
use crate::{log, logger};
use crate::pipeline::check;
use crate::report::BuildReport;
use crate::utils::plural_count;

use super::CheckArgs;

/// Discover and plan, then print the report (human-readable or JSON).
pub fn check_assets(mut config: Config, args: &CheckArgs) -> Result<BuildReport> {
    // Keep stdout clean for the JSON document
    logger::set_quiet(args.json);
    config.apply_check_args(args);
    let opts = config.pipeline_options(BuildMode::Production)?;
    let report = check(&args.input, &opts)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    let dangling = report.dangling_count();
    if args.strict && dangling > 0 {
        bail!("{} found", plural_count(dangling, "dangling reference"));
    }
    Ok(report)
}

fn print_report(report: &BuildReport) {
    log!("check"; "{} in graph", plural_count(report.assets, "asset"));
    for rename in &report.renames {
        match &rename.url {
            Some(url) => log!("rename"; "{} -> {} ({})", rename.from, rename.to, url),
            None => log!("rename"; "{} -> {}", rename.from, rename.to),
        }
    }
    for warning in &report.warnings {
        log!(warning.module(); "{}", warning);
    }
    if report.warnings.is_empty() {
        log!("done"; "no problems found");
    }
}

//! The fingerprinting pipeline: discover, plan, rewrite, write.
//!
//! Stages run strictly in sequence. Discovery finishes before any rule is
//! planned, and every rule is final before rewriting starts, which is what
//! lets the rewrite and write stages fan out across assets.
//!
//! # Usage
//!
//! ```no_run
//! use std::path::Path;
//! use cachebust::pipeline::{PipelineOptions, run};
//!
//! let report = run(Path::new("dist"), Path::new("public"), &PipelineOptions::default())?;
//! report.log_summary();
//! # Ok::<(), cachebust::error::BuildError>(())
//! ```

use std::path::Path;

use crate::asset::AssetStore;
use crate::debug;
use crate::error::Result;
use crate::extract::Extractors;
use crate::graph::{Discovery, discover};
use crate::logger::ProgressLine;
use crate::pattern::PatternSet;
use crate::plan::{Plan, RewritePolicy, plan};
use crate::report::BuildReport;
use crate::rewrite::rewrite_all;
use crate::write::{copy_files, write_assets};

/// Seeds used when none are configured.
pub const DEFAULT_LOAD_ASSETS: &[&str] = &["**/*.css", "**/*.html", "**/*.js"];

/// Options for one pipeline run.
#[derive(Clone)]
pub struct PipelineOptions {
    /// Naming decisions: hash, prefix, exclusions, order.
    pub policy: RewritePolicy,
    /// Seed globs for graph discovery.
    pub load_assets: PatternSet,
    /// Copy input files outside the graph to the output unchanged.
    pub copy_unlisted: bool,
    pub extractors: Extractors,
    /// Show a progress line while writing.
    pub progress: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            policy: RewritePolicy::default(),
            load_assets: PatternSet::compile("load_assets", DEFAULT_LOAD_ASSETS)
                .unwrap_or_default(),
            copy_unlisted: false,
            extractors: Extractors::default(),
            progress: false,
        }
    }
}

/// Run the whole pipeline from `input` to `output`.
///
/// With the policy disabled the input tree is copied verbatim; the graph is
/// still discovered so dangling references are reported.
pub fn run(input: &Path, output: &Path, opts: &PipelineOptions) -> Result<BuildReport> {
    let Discovery {
        mut store,
        warnings,
        files,
    } = discover(&opts.load_assets, input, &opts.extractors)?;
    debug!("pipeline"; "discovered {} of {} files", store.len(), files.len());

    let passthrough: Vec<&str> = if !opts.policy.enabled {
        files.iter().map(String::as_str).collect()
    } else if opts.copy_unlisted {
        unlisted(&store, &files)
    } else {
        Vec::new()
    };

    let reserved: &[&str] = if opts.policy.enabled { &passthrough } else { &[] };
    let plan = plan(&mut store, &opts.policy, reserved)?;

    let (written, copied) = if opts.policy.enabled {
        let contents = rewrite_all(&store, &plan);
        debug!("pipeline"; "rewrote {} assets", contents.len());

        let progress = opts
            .progress
            .then(|| ProgressLine::new(&[("write", store.len()), ("copy", passthrough.len())]));
        let written = write_assets(&store, &plan, &contents, output, progress.as_ref())?;
        let copied = copy_files(input, &passthrough, output, progress.as_ref())?;
        if let Some(p) = progress {
            p.finish();
        }
        (written, copied)
    } else {
        let progress = opts.progress.then(|| ProgressLine::new(&[("copy", passthrough.len())]));
        let copied = copy_files(input, &passthrough, output, progress.as_ref())?;
        if let Some(p) = progress {
            p.finish();
        }
        (0, copied)
    };

    Ok(report(&store, plan, warnings, written, copied))
}

/// Discover and plan without writing anything.
pub fn check(input: &Path, opts: &PipelineOptions) -> Result<BuildReport> {
    let Discovery {
        mut store,
        warnings,
        files,
    } = discover(&opts.load_assets, input, &opts.extractors)?;

    let reserved = if opts.policy.enabled && opts.copy_unlisted {
        unlisted(&store, &files)
    } else {
        Vec::new()
    };
    let plan = plan(&mut store, &opts.policy, &reserved)?;

    Ok(report(&store, plan, warnings, 0, 0))
}

/// Input files that are not part of the graph.
fn unlisted<'a>(store: &AssetStore, files: &'a [String]) -> Vec<&'a str> {
    files
        .iter()
        .map(String::as_str)
        .filter(|id| !store.contains(id))
        .collect()
}

fn report(
    store: &AssetStore,
    plan: Plan,
    mut warnings: Vec<crate::report::Warning>,
    written: usize,
    copied: usize,
) -> BuildReport {
    let renames = plan.renames(store);
    warnings.extend(plan.warnings);
    BuildReport {
        assets: store.len(),
        written,
        copied,
        renames,
        warnings,
    }
}

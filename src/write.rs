//! Writer: persist final bytes under the output root.
//!
//! Files are written at their local output path; prefixes only change how
//! other assets link to them. The first failure aborts the remaining writes.
//! Whatever was already written stays on disk.

use std::borrow::Cow;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::asset::AssetStore;
use crate::error::{BuildError, Result};
use crate::log;
use crate::logger::ProgressLine;
use crate::plan::Plan;

/// Write every graph asset. `contents[i]` holds the bytes of asset `i`.
pub fn write_assets(
    store: &AssetStore,
    plan: &Plan,
    contents: &[Cow<'_, [u8]>],
    output_root: &Path,
    progress: Option<&ProgressLine>,
) -> Result<usize> {
    // Set on the first failure so the remaining workers skip their writes
    let has_error = AtomicBool::new(false);

    store.ids().collect::<Vec<_>>().par_iter().try_for_each(|&id| {
        if has_error.load(Ordering::Relaxed) {
            return Ok(());
        }
        let dest = output_root.join(&plan.rule(id).output);
        if let Err(err) = write_file(&dest, &contents[id.index()]) {
            if !has_error.swap(true, Ordering::Relaxed) {
                log!("error"; "{}: {}", store.get(id).path, err);
            }
            return Err(err);
        }
        if let Some(p) = progress {
            p.inc("write");
        }
        Ok(())
    })?;

    Ok(store.len())
}

/// Copy input files through unchanged (`files` are ids relative to `input_root`).
pub fn copy_files(
    input_root: &Path,
    files: &[&str],
    output_root: &Path,
    progress: Option<&ProgressLine>,
) -> Result<usize> {
    let has_error = AtomicBool::new(false);

    files.par_iter().try_for_each(|id| {
        if has_error.load(Ordering::Relaxed) {
            return Ok(());
        }
        let src = input_root.join(id);
        let dest = output_root.join(id);
        if let Err(err) = copy_file(&src, &dest) {
            if !has_error.swap(true, Ordering::Relaxed) {
                log!("error"; "{}: {}", id, err);
            }
            return Err(err);
        }
        if let Some(p) = progress {
            p.inc("copy");
        }
        Ok(())
    })?;

    Ok(files.len())
}

fn write_file(dest: &Path, bytes: &[u8]) -> Result<()> {
    create_parent(dest)?;
    fs::write(dest, bytes).map_err(|err| BuildError::io("writing", dest, err))
}

fn copy_file(src: &Path, dest: &Path) -> Result<()> {
    create_parent(dest)?;
    fs::copy(src, dest)
        .map(drop)
        .map_err(|err| BuildError::io("copying", src, err))
}

fn create_parent(dest: &Path) -> Result<()> {
    match dest.parent() {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(|err| BuildError::io("creating", parent, err))
        }
        None => Ok(()),
    }
}

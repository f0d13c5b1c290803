//! Dependency graph discovery.
//!
//! Seeds are the input files matching `load_assets`. Every asset in the store
//! is extracted exactly once; references to files not yet in the store pull
//! them in, until a pass adds nothing new.
//!
//! Extraction runs in waves: all assets not yet extracted are scanned in
//! parallel, then their references are resolved one by one in discovery
//! order so asset ids stay deterministic.

mod resolve;
mod walk;

pub use resolve::{LinkKind, Target, classify};
pub use walk::{Listing, list_files};

use std::fs;
use std::path::Path;

use rayon::prelude::*;
use rustc_hash::FxHashSet;

use crate::asset::{AssetId, AssetStore, RawReference, ReferenceSite, UrlStyle};
use crate::debug;
use crate::error::{BuildError, Result};
use crate::extract::Extractors;
use crate::pattern::PatternSet;
use crate::report::{DanglingReason, Warning};
use crate::utils::url::parent_dir;

/// Result of graph discovery.
#[derive(Debug)]
pub struct Discovery {
    pub store: AssetStore,
    /// Dangling references, in discovery order.
    pub warnings: Vec<Warning>,
    /// Every file in the input tree (sorted ids), graph members or not.
    pub files: Vec<String>,
}

/// Discover the asset graph reachable from the files matching `seeds`.
pub fn discover(seeds: &PatternSet, input_root: &Path, extractors: &Extractors) -> Result<Discovery> {
    let Listing { files, unreadable } = list_files(input_root)?;
    let mut store = AssetStore::new(input_root);

    // Seeds: read in parallel, inserted in sorted order. Any read failure is fatal,
    // including seeds the walk could not stat.
    let mut seed_ids: Vec<&String> = files
        .iter()
        .chain(&unreadable)
        .filter(|id| seeds.matches(id))
        .collect();
    seed_ids.sort();
    let seed_bytes = seed_ids
        .par_iter()
        .map(|&id| {
            let path = input_root.join(id);
            fs::read(&path)
                .map(|bytes| (id.clone(), bytes))
                .map_err(|err| BuildError::io("reading", path, err))
        })
        .collect::<Result<Vec<_>>>()?;
    for (id, bytes) in seed_bytes {
        store.insert(id, bytes);
    }
    debug!("graph"; "{} seed assets", store.len());

    let file_set: FxHashSet<&str> = files.iter().map(String::as_str).collect();
    let mut warnings = Vec::new();
    let mut cursor = 0;

    while let Some(first) = store.next_unextracted(cursor) {
        let wave: Vec<AssetId> = store.ids().skip(first.index()).collect();
        cursor = store.len();

        let extracted: Vec<(AssetId, Vec<RawReference>)> = wave
            .par_iter()
            .map(|&id| {
                let asset = store.get(id);
                (id, extractors.extract(asset.kind, &asset.bytes))
            })
            .collect();

        for (id, raw) in extracted {
            let sites = resolve_sites(&mut store, &file_set, id, raw, &mut warnings);
            store.set_sites(id, sites);
        }
        debug!("graph"; "wave done, {} assets known", store.len());
    }

    Ok(Discovery {
        store,
        warnings,
        files,
    })
}

/// Turn raw references into resolved sites, loading newly seen targets.
fn resolve_sites(
    store: &mut AssetStore,
    files: &FxHashSet<&str>,
    source: AssetId,
    raw: Vec<RawReference>,
    warnings: &mut Vec<Warning>,
) -> Vec<ReferenceSite> {
    let source_path = store.get(source).path.clone();
    let base_dir = parent_dir(&source_path);
    let mut sites = Vec::with_capacity(raw.len());

    for RawReference { range, url } in raw {
        let target = match classify(base_dir, &url) {
            Target::Ignore => continue,
            Target::OutsideRoot => Err(DanglingReason::OutsideRoot),
            Target::Path(id) => load_target(store, files, id),
        };

        let target = match target {
            Ok(id) => Some(id),
            Err(reason) => {
                warnings.push(Warning::DanglingReference {
                    source: source_path.clone(),
                    url: url.clone(),
                    reason,
                });
                None
            }
        };

        let style = UrlStyle::of(&url);
        sites.push(ReferenceSite {
            range,
            url,
            target,
            style,
        });
    }
    sites
}

/// Find or load the asset at `id`. Failures are dangling, never fatal.
fn load_target(
    store: &mut AssetStore,
    files: &FxHashSet<&str>,
    id: String,
) -> Result<AssetId, DanglingReason> {
    if let Some(existing) = store.lookup(&id) {
        return Ok(existing);
    }

    let path = store.root().join(&id);
    if !files.contains(id.as_str()) {
        return Err(match fs::metadata(&path) {
            Ok(_) => DanglingReason::NotAFile,
            // Present but unresolvable (broken symlink)
            Err(err) if path.is_symlink() => DanglingReason::Unreadable(err.to_string()),
            Err(_) => DanglingReason::Missing,
        });
    }

    match fs::read(&path) {
        Ok(bytes) => Ok(store.insert(id, bytes)),
        Err(err) => Err(DanglingReason::Unreadable(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset::AssetKind;
    use tempfile::TempDir;

    fn tree(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (path, content) in files {
            let path = dir.path().join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        dir
    }

    fn seeds(patterns: &[&str]) -> PatternSet {
        PatternSet::compile("load_assets", patterns).unwrap()
    }

    #[test]
    fn test_discovers_transitive_references() {
        let dir = tree(&[
            ("index.html", r#"<link href="css/site.css" rel="stylesheet">"#),
            ("css/site.css", "body { background: url(../img/bg.png) }"),
            ("img/bg.png", "png data"),
            ("unused.png", "other"),
        ]);

        let found = discover(&seeds(&["**/*.html"]), dir.path(), &Extractors::default()).unwrap();
        let store = &found.store;
        assert_eq!(store.len(), 3);
        assert!(store.contains("css/site.css"));
        assert!(store.contains("img/bg.png"));
        assert!(!store.contains("unused.png"));
        assert!(found.warnings.is_empty());
        assert_eq!(found.files.len(), 4);

        let css = store.lookup("css/site.css").unwrap();
        let png = store.lookup("img/bg.png").unwrap();
        assert_eq!(store.get(css).sites()[0].target, Some(png));
        assert_eq!(store.get(png).kind, AssetKind::Png);
    }

    #[test]
    fn test_cycles_terminate() {
        let dir = tree(&[
            ("a.css", "@import 'b.css';"),
            ("b.css", "@import 'a.css';"),
        ]);

        let found = discover(&seeds(&["a.css"]), dir.path(), &Extractors::default()).unwrap();
        assert_eq!(found.store.len(), 2);
        assert!(found.store.iter().all(|(_, a)| a.is_extracted()));
    }

    #[test]
    fn test_dangling_references_are_warnings() {
        let dir = tree(&[
            ("page.html", r#"<script src="missing.js"></script><img src="img">"#),
            ("img/a.png", "x"),
        ]);

        let found = discover(&seeds(&["*.html"]), dir.path(), &Extractors::default()).unwrap();
        assert_eq!(found.store.len(), 1);
        assert_eq!(found.warnings.len(), 2);
        assert!(matches!(
            &found.warnings[0],
            Warning::DanglingReference { url, reason: DanglingReason::Missing, .. } if url == "missing.js"
        ));
        assert!(matches!(
            &found.warnings[1],
            Warning::DanglingReference { reason: DanglingReason::NotAFile, .. }
        ));

        let page = found.store.lookup("page.html").unwrap();
        assert!(found.store.get(page).sites().iter().all(|s| s.is_dangling()));
    }

    #[test]
    fn test_outside_root_and_external_urls() {
        let dir = tree(&[(
            "style.css",
            "a { background: url(../../etc/x.png) } b { background: url(https://cdn.example.com/y.png) }",
        )]);

        let found = discover(&seeds(&["*.css"]), dir.path(), &Extractors::default()).unwrap();
        assert_eq!(found.warnings.len(), 1);
        assert!(matches!(
            &found.warnings[0],
            Warning::DanglingReference { reason: DanglingReason::OutsideRoot, .. }
        ));
        let css = found.store.lookup("style.css").unwrap();
        assert_eq!(found.store.get(css).sites().len(), 1);
    }

    #[test]
    fn test_root_relative_and_suffix() {
        let dir = tree(&[
            ("deep/page.html", r#"<script src="/assets/app.js?v=1"></script>"#),
            ("assets/app.js", "console.log(1)"),
        ]);

        let found = discover(&seeds(&["**/*.html"]), dir.path(), &Extractors::default()).unwrap();
        let page = found.store.lookup("deep/page.html").unwrap();
        let site = &found.store.get(page).sites()[0];
        assert_eq!(site.style, UrlStyle::RootRelative);
        assert_eq!(site.suffix(), "?v=1");
        assert_eq!(site.target, found.store.lookup("assets/app.js"));
    }

    #[test]
    fn test_discovery_is_deterministic() {
        let dir = tree(&[
            ("b.css", "x { background: url(z.png) } y { background: url(a.png) }"),
            ("a.css", "x { background: url(m.png) }"),
            ("a.png", "1"),
            ("m.png", "2"),
            ("z.png", "3"),
        ]);

        let paths = |found: &Discovery| -> Vec<String> {
            found.store.iter().map(|(_, a)| a.path.clone()).collect()
        };
        let first = discover(&seeds(&["*.css"]), dir.path(), &Extractors::default()).unwrap();
        let second = discover(&seeds(&["*.css"]), dir.path(), &Extractors::default()).unwrap();
        assert_eq!(paths(&first), ["a.css", "b.css", "m.png", "z.png", "a.png"]);
        assert_eq!(paths(&first), paths(&second));
    }

    #[test]
    fn test_no_extractors_means_no_edges() {
        let dir = tree(&[("a.css", "x { background: url(a.png) }"), ("a.png", "1")]);
        let found = discover(&seeds(&["*.css"]), dir.path(), &Extractors::empty()).unwrap();
        assert_eq!(found.store.len(), 1);
    }

    #[cfg(unix)]
    fn broken_link(dir: &TempDir, name: &str) {
        std::os::unix::fs::symlink(dir.path().join("does-not-exist"), dir.path().join(name))
            .unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_seed_is_fatal() {
        let dir = tree(&[("a.css", "x {}")]);
        broken_link(&dir, "b.css");

        let err = discover(&seeds(&["*.css"]), dir.path(), &Extractors::default()).unwrap_err();
        assert!(matches!(err, BuildError::Io { action: "reading", ref path, .. } if path.ends_with("b.css")));
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_reference_is_dangling() {
        let dir = tree(&[("style.css", "a { background: url(gone.png) }")]);
        broken_link(&dir, "gone.png");
        broken_link(&dir, "junk.bin");

        let found = discover(&seeds(&["*.css"]), dir.path(), &Extractors::default()).unwrap();
        assert_eq!(found.store.len(), 1);
        assert_eq!(found.files, ["style.css"]);
        assert_eq!(found.warnings.len(), 1);
        assert!(matches!(
            &found.warnings[0],
            Warning::DanglingReference {
                url,
                reason: DanglingReason::Unreadable(_) | DanglingReason::Missing,
                ..
            } if url == "gone.png"
        ));
    }
}

//! Rewrite planning: the output path and URL of every asset.
//!
//! Assets are finalized kind by kind in `asset_order`; kinds missing from the
//! order come last, in discovery order. An asset's fingerprint is the hash of
//! its original bytes, so referenced assets must precede the assets that
//! reference them for the rewritten names to be meaningful. The order never
//! changes the hashes themselves.

mod claim;

pub use claim::ClaimMap;

use std::fmt;
use std::sync::Arc;

use crate::asset::{AssetId, AssetKind, AssetStore};
use crate::config::ConfigError;
use crate::debug;
use crate::error::{BuildError, Result};
use crate::hash::ContentHasher;
use crate::pattern::PatternSet;
use crate::report::{Rename, Warning};
use crate::utils::url::encode;

// ============================================================================
// Policy
// ============================================================================

/// Everything the planner needs to decide names.
#[derive(Clone)]
pub struct RewritePolicy {
    /// Master switch. When off, every asset keeps its path and gets no prefix.
    pub enabled: bool,
    /// `None` disables fingerprinting; filenames pass through.
    pub hasher: Option<Arc<dyn ContentHasher>>,
    /// Assets whose path matches are never renamed.
    pub exclude: PatternSet,
    /// URL prefix for referenced assets (CDN hosting).
    pub prepend: Option<String>,
    pub asset_order: Vec<AssetKind>,
    /// Kinds that are never referenced through the prefix.
    pub prepend_exclude: Vec<AssetKind>,
}

impl Default for RewritePolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            hasher: Some(Arc::new(crate::hash::HashAlgorithm::default())),
            exclude: PatternSet::default(),
            prepend: None,
            asset_order: AssetKind::default_order(),
            prepend_exclude: vec![AssetKind::Html],
        }
    }
}

impl fmt::Debug for RewritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RewritePolicy")
            .field("enabled", &self.enabled)
            .field("hasher", &self.hasher.as_ref().map(|_| ".."))
            .field("exclude", &self.exclude)
            .field("prepend", &self.prepend)
            .field("asset_order", &self.asset_order)
            .field("prepend_exclude", &self.prepend_exclude)
            .finish()
    }
}

// ============================================================================
// Rules
// ============================================================================

/// Final decision for one asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRule {
    /// Output path relative to the output root.
    pub output: String,
    /// Absolute URL other assets use, when a prefix applies.
    pub prefixed: Option<String>,
    /// Matched an exclude pattern.
    pub excluded: bool,
    /// Fingerprint embedded in `output`, when renamed.
    pub hash: Option<String>,
}

/// Rules for every asset in the store, plus the order they were finalized in.
#[derive(Debug, Default)]
pub struct Plan {
    rules: Vec<RewriteRule>,
    order: Vec<AssetId>,
    pub warnings: Vec<Warning>,
}

impl Plan {
    #[inline]
    pub fn rule(&self, id: AssetId) -> &RewriteRule {
        &self.rules[id.index()]
    }

    /// Assets in finalization order.
    pub fn order(&self) -> &[AssetId] {
        &self.order
    }

    /// Renamed or prefixed assets, in finalization order.
    pub fn renames(&self, store: &AssetStore) -> Vec<Rename> {
        self.order
            .iter()
            .filter_map(|&id| {
                let rule = self.rule(id);
                let from = &store.get(id).path;
                (rule.output != *from || rule.prefixed.is_some()).then(|| Rename {
                    from: from.clone(),
                    to: rule.output.clone(),
                    url: rule.prefixed.clone(),
                })
            })
            .collect()
    }
}

// ============================================================================
// Planner
// ============================================================================

/// Assign an output path (and optional prefixed URL) to every asset.
///
/// `reserved` lists output paths already taken by files copied through
/// unchanged. The assigned output is also recorded on each asset in `store`.
pub fn plan<S: AsRef<str>>(store: &mut AssetStore, policy: &RewritePolicy, reserved: &[S]) -> Result<Plan> {
    let order = finalization_order(store, &policy.asset_order);
    let mut claims = ClaimMap::with_reserved(reserved);
    let mut rules: Vec<Option<RewriteRule>> = vec![None; store.len()];
    let mut warnings = Vec::new();

    for &id in &order {
        let rule = plan_asset(store, id, policy, &mut claims, &mut warnings)?;
        store.set_output(id, rule.output.clone());
        rules[id.index()] = Some(rule);
    }

    if policy.enabled
        && let Some(prefix) = policy.prepend.as_deref()
    {
        for (id, asset) in store.iter() {
            if policy.prepend_exclude.contains(&asset.kind) {
                continue;
            }
            if let Some(rule) = rules[id.index()].as_mut() {
                rule.prefixed = Some(prefixed_url(prefix, &rule.output));
            }
        }
    }

    let rules: Vec<RewriteRule> = rules.into_iter().flatten().collect();
    debug_assert_eq!(rules.len(), store.len());
    debug!("plan"; "{} rules, {} conflicts", rules.len(), warnings.len());

    Ok(Plan {
        rules,
        order,
        warnings,
    })
}

/// Listed kinds first (in policy order), then everything else in discovery order.
fn finalization_order(store: &AssetStore, asset_order: &[AssetKind]) -> Vec<AssetId> {
    let mut order = Vec::with_capacity(store.len());
    let mut seen_kinds = Vec::with_capacity(asset_order.len());

    for &kind in asset_order {
        if seen_kinds.contains(&kind) {
            continue;
        }
        seen_kinds.push(kind);
        order.extend(store.iter().filter(|(_, a)| a.kind == kind).map(|(id, _)| id));
    }
    order.extend(
        store
            .iter()
            .filter(|(_, a)| !seen_kinds.contains(&a.kind))
            .map(|(id, _)| id),
    );
    order
}

/// Decide one asset's rule. Pure with respect to everything but `claims`.
fn plan_asset(
    store: &mut AssetStore,
    id: AssetId,
    policy: &RewritePolicy,
    claims: &mut ClaimMap,
    warnings: &mut Vec<Warning>,
) -> Result<RewriteRule> {
    let path = store.get(id).path.clone();
    let excluded = policy.exclude.matches(&path);

    let hasher = match policy.hasher.as_deref() {
        Some(hasher) if policy.enabled && !excluded => hasher,
        _ => {
            keep_original(claims, &path)?;
            return Ok(RewriteRule {
                output: path,
                prefixed: None,
                excluded,
                hash: None,
            });
        }
    };

    let hash = store
        .get_mut(id)
        .content_hash(hasher)
        .map_err(|source| {
            BuildError::Config(ConfigError::Hash {
                asset: path.clone(),
                source,
            })
        })?
        .to_string();
    let wanted = fingerprinted_path(&path, &hash);

    // A fingerprinted name must not steal another asset's input path either
    let holder = claims.holder(&wanted).map(str::to_string).or_else(|| {
        store
            .lookup(&wanted)
            .filter(|&other| other != id)
            .map(|other| store.get(other).path.clone())
    });

    match holder {
        None => {
            claims
                .claim(&wanted, &path)
                .map_err(|first| conflict(&wanted, first, &path))?;
            Ok(RewriteRule {
                output: wanted,
                prefixed: None,
                excluded,
                hash: Some(hash),
            })
        }
        Some(claimed_by) => {
            warnings.push(Warning::NameConflict {
                asset: path.clone(),
                wanted,
                claimed_by,
            });
            keep_original(claims, &path)?;
            Ok(RewriteRule {
                output: path,
                prefixed: None,
                excluded,
                hash: None,
            })
        }
    }
}

fn keep_original(claims: &mut ClaimMap, path: &str) -> Result<()> {
    claims
        .claim(path, path)
        .map_err(|first| conflict(path, first, path))
}

fn conflict(output: &str, first: String, second: &str) -> BuildError {
    BuildError::Conflict {
        output: output.to_string(),
        first,
        second: second.to_string(),
    }
}

/// `dir/stem.ext` -> `dir/stem-{hash}.ext`, splitting at the last dot.
///
/// Dotfiles without a further dot keep their whole name as the stem.
///
/// # Examples
/// ```
/// use cachebust::plan::fingerprinted_path;
/// assert_eq!(fingerprinted_path("img/a.min.png", "abc"), "img/a.min-abc.png");
/// assert_eq!(fingerprinted_path(".htaccess", "abc"), ".htaccess-abc");
/// ```
pub fn fingerprinted_path(path: &str, hash: &str) -> String {
    let (dir, file) = match path.rsplit_once('/') {
        Some((dir, file)) => (&path[..=dir.len()], file),
        None => ("", path),
    };
    let (stem, ext) = match file.rfind('.') {
        Some(pos) if pos > 0 => file.split_at(pos),
        _ => (file, ""),
    };
    format!("{dir}{stem}-{hash}{ext}")
}

/// Prefix an output path. Plain concatenation; the path is percent-encoded.
pub fn prefixed_url(prefix: &str, output: &str) -> String {
    format!("{prefix}{}", encode(output))
}

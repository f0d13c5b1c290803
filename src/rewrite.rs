//! Reference rewriting: substitute planned URLs at reference sites.
//!
//! Substitution is scoped to the byte ranges reported by the extractors.
//! Everything between sites is copied verbatim, so identical text elsewhere
//! in the file is never touched.

use std::borrow::Cow;

use rayon::prelude::*;

use crate::asset::{AssetId, AssetStore, ReferenceSite, UrlStyle};
use crate::plan::Plan;
use crate::utils::url::{encode, parent_dir, relative_url};

/// Final bytes of one asset. Borrowed when no site changes.
pub fn rewrite<'a>(store: &'a AssetStore, id: AssetId, plan: &Plan) -> Cow<'a, [u8]> {
    let asset = store.get(id);
    let replacements: Vec<(&ReferenceSite, String)> = asset
        .sites()
        .iter()
        .filter_map(|site| new_url(store, id, site, plan).map(|url| (site, url)))
        .collect();

    if replacements.is_empty() {
        return Cow::Borrowed(&asset.bytes);
    }

    let bytes = &asset.bytes;
    let mut out = Vec::with_capacity(bytes.len() + replacements.len() * 40);
    let mut pos = 0;
    for (site, url) in replacements {
        out.extend_from_slice(&bytes[pos..site.range.start]);
        out.extend_from_slice(url.as_bytes());
        pos = site.range.end;
    }
    out.extend_from_slice(&bytes[pos..]);
    Cow::Owned(out)
}

/// Rewrite every asset in parallel. Index `i` holds the bytes of asset `i`.
pub fn rewrite_all<'a>(store: &'a AssetStore, plan: &Plan) -> Vec<Cow<'a, [u8]>> {
    let ids: Vec<AssetId> = store.ids().collect();
    ids.par_iter().map(|&id| rewrite(store, id, plan)).collect()
}

/// URL that should replace `site`, or `None` to leave it untouched.
fn new_url(store: &AssetStore, source: AssetId, site: &ReferenceSite, plan: &Plan) -> Option<String> {
    let target = site.target?;
    let target_rule = plan.rule(target);
    let source_rule = plan.rule(source);

    // Pages served from the origin reach prefixed assets through the prefix.
    // Two prefixed assets share the prefix, so relative links keep working.
    if let Some(prefixed) = &target_rule.prefixed
        && source_rule.prefixed.is_none()
    {
        return Some(format!("{prefixed}{}", site.suffix()));
    }

    // Directories never change, so an unrenamed target keeps a valid URL
    if target_rule.output == store.get(target).path {
        return None;
    }

    let path = match site.style {
        UrlStyle::RootRelative => format!("/{}", encode(&target_rule.output)),
        UrlStyle::DocumentRelative { dot } => {
            let rel = relative_url(parent_dir(&source_rule.output), &target_rule.output);
            let rel = encode(&rel);
            if dot && !rel.starts_with("../") {
                format!("./{rel}")
            } else {
                rel.into_owned()
            }
        }
    };
    Some(format!("{path}{}", site.suffix()))
}

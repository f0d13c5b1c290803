//! Reference extraction: find the URLs an asset points at.
//!
//! Extraction is pluggable per [`AssetKind`]. The built-in extractors are
//! scanners, not parsers: they report attribute values, `url()` and
//! `@import` targets, and static ES module specifiers.
//!
//! | Kind         | Extractor          | Sites                                   |
//! |--------------|--------------------|-----------------------------------------|
//! | `Html`/`Svg` | [`HtmlExtractor`]  | `src`, `href`, `srcset`, inline `url()` |
//! | `Css`        | [`CssExtractor`]   | `url()`, `@import "..."`                |
//! | `JavaScript` | [`JsExtractor`]    | `import`/`export from`, `import()`      |

mod css;
mod html;
mod js;

use std::sync::Arc;

use regex::bytes::Captures;
use rustc_hash::FxHashMap;

use crate::asset::{AssetKind, RawReference};

pub use css::CssExtractor;
pub use html::HtmlExtractor;
pub use js::JsExtractor;

/// Finds reference sites inside one asset's bytes.
///
/// Implementations must report byte ranges covering exactly the URL text
/// (without quotes) so the rewriter can substitute in place.
pub trait ReferenceExtractor: Send + Sync {
    fn extract(&self, bytes: &[u8]) -> Vec<RawReference>;
}

/// Extractor registry keyed by asset kind.
#[derive(Clone)]
pub struct Extractors {
    by_kind: FxHashMap<AssetKind, Arc<dyn ReferenceExtractor>>,
}

impl Default for Extractors {
    fn default() -> Self {
        let html: Arc<dyn ReferenceExtractor> = Arc::new(HtmlExtractor);
        let mut extractors = Self::empty();
        extractors
            .register(AssetKind::Html, html.clone())
            .register(AssetKind::Svg, html)
            .register(AssetKind::Css, Arc::new(CssExtractor))
            .register(AssetKind::JavaScript, Arc::new(JsExtractor));
        extractors
    }
}

impl Extractors {
    /// Registry without any extractor; every asset is a leaf.
    pub fn empty() -> Self {
        Self {
            by_kind: FxHashMap::default(),
        }
    }

    /// Install (or replace) the extractor for a kind.
    pub fn register(&mut self, kind: AssetKind, extractor: Arc<dyn ReferenceExtractor>) -> &mut Self {
        self.by_kind.insert(kind, extractor);
        self
    }

    /// Extract sites, sorted by position with overlapping ranges dropped.
    pub fn extract(&self, kind: AssetKind, bytes: &[u8]) -> Vec<RawReference> {
        match self.by_kind.get(&kind) {
            Some(extractor) => normalize(extractor.extract(bytes)),
            None => Vec::new(),
        }
    }
}

/// Sort by start offset and drop sites overlapping an earlier one.
///
/// Rewriting substitutes ranges back-to-front, so they must be disjoint.
pub(crate) fn normalize(mut refs: Vec<RawReference>) -> Vec<RawReference> {
    refs.sort_by_key(|r| (r.range.start, r.range.end));
    let mut last_end = 0;
    refs.retain(|r| {
        if r.range.start < last_end {
            return false;
        }
        last_end = r.range.end;
        true
    });
    refs
}

/// First matching capture group among `groups`, as a reference.
///
/// Captures that are empty or not valid UTF-8 are skipped.
pub(crate) fn first_group(caps: &Captures<'_>, groups: &[usize]) -> Option<RawReference> {
    let m = groups.iter().find_map(|&i| caps.get(i))?;
    let text = std::str::from_utf8(m.as_bytes()).ok()?.trim_ascii();
    if text.is_empty() {
        return None;
    }
    // Ranges exclude surrounding whitespace kept inside quotes
    let lead = m.as_bytes().len() - m.as_bytes().trim_ascii_start().len();
    let start = m.start() + lead;
    Some(RawReference::new(start..start + text.len(), text))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<RawReference>);

    impl ReferenceExtractor for Fixed {
        fn extract(&self, _bytes: &[u8]) -> Vec<RawReference> {
            self.0.clone()
        }
    }

    #[test]
    fn test_normalize_drops_overlaps() {
        let refs = normalize(vec![
            RawReference::new(10..20, "b"),
            RawReference::new(0..5, "a"),
            RawReference::new(15..18, "overlap"),
            RawReference::new(20..25, "c"),
        ]);
        let urls: Vec<_> = refs.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, ["a", "b", "c"]);
    }

    #[test]
    fn test_register_replaces_builtin() {
        let mut extractors = Extractors::default();
        extractors.register(
            AssetKind::Json,
            Arc::new(Fixed(vec![RawReference::new(1..6, "x.png")])),
        );
        let refs = extractors.extract(AssetKind::Json, br#"{"x.png"}"#);
        assert_eq!(refs.len(), 1);

        // Kinds without an extractor are leaves
        assert!(extractors.extract(AssetKind::Png, b"url(a.png)").is_empty());
    }
}

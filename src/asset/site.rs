//! Reference sites: where one asset names another.

use std::ops::Range;

use super::AssetId;
use crate::utils::url::split_suffix;

/// How a reference was written in the source document.
///
/// Rewritten URLs keep the style of the original so root-relative hrefs in
/// pages stay root-relative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlStyle {
    /// `/assets/app.js`
    RootRelative,
    /// `../img/a.png`, `main.js`; `dot` is true for a leading `./`.
    DocumentRelative { dot: bool },
}

impl UrlStyle {
    pub fn of(path: &str) -> Self {
        if path.starts_with('/') {
            Self::RootRelative
        } else {
            Self::DocumentRelative {
                dot: path.starts_with("./"),
            }
        }
    }
}

/// A URL occurrence inside an asset's bytes, as reported by an extractor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReference {
    /// Byte range of the URL text (quotes excluded).
    pub range: Range<usize>,
    /// The URL text exactly as written.
    pub url: String,
}

impl RawReference {
    pub fn new(range: Range<usize>, url: impl Into<String>) -> Self {
        Self {
            range,
            url: url.into(),
        }
    }
}

/// A resolved reference site. Immutable once the graph is built.
#[derive(Debug, Clone)]
pub struct ReferenceSite {
    /// Byte range of the URL text inside the referencing asset.
    pub range: Range<usize>,
    /// Original URL text.
    pub url: String,
    /// Target asset, `None` when the reference is dangling.
    pub target: Option<AssetId>,
    pub style: UrlStyle,
}

impl ReferenceSite {
    /// The `?query` / `#fragment` tail of the original URL.
    pub fn suffix(&self) -> &str {
        split_suffix(&self.url).1
    }

    #[inline]
    pub fn is_dangling(&self) -> bool {
        self.target.is_none()
    }
}

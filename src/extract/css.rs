//! CSS reference scanning: `url(...)` and `@import "..."`.

use std::sync::LazyLock;

use regex::bytes::Regex;

use super::{ReferenceExtractor, first_group};
use crate::asset::RawReference;

/// `url(a.png)`, `url("a.png")`, `url('a.png')`
static URL_FN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\burl\(\s*(?:"([^"]*)"|'([^']*)'|([^"'()\s]+))\s*\)"#).unwrap()
});

/// `@import "a.css"` (the `@import url(...)` form is covered by [`URL_FN`])
static IMPORT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)@import\s+(?:"([^"]*)"|'([^']*)')"#).unwrap());

/// Scans stylesheets. Also used for inline `<style>` blocks and `style` attributes.
#[derive(Debug, Clone, Copy, Default)]
pub struct CssExtractor;

impl CssExtractor {
    /// Collect `url()` sites only.
    pub(crate) fn urls(bytes: &[u8], out: &mut Vec<RawReference>) {
        out.extend(
            URL_FN
                .captures_iter(bytes)
                .filter_map(|caps| first_group(&caps, &[1, 2, 3])),
        );
    }
}

impl ReferenceExtractor for CssExtractor {
    fn extract(&self, bytes: &[u8]) -> Vec<RawReference> {
        let mut refs = Vec::new();
        Self::urls(bytes, &mut refs);
        refs.extend(
            IMPORT
                .captures_iter(bytes)
                .filter_map(|caps| first_group(&caps, &[1, 2])),
        );
        refs
    }
}

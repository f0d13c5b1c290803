//! HTML/SVG reference scanning.
//!
//! Reports URL attributes (`href`, `src`, `poster`, `data`, `xlink:href`),
//! every candidate of a `srcset`, and `url()` inside inline styles.

use std::sync::LazyLock;

use regex::bytes::Regex;

use super::css::CssExtractor;
use super::{ReferenceExtractor, first_group};
use crate::asset::RawReference;

static URL_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\b(?:href|src|poster|data)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#,
    )
    .unwrap()
});

static SRCSET_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\bsrcset\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap()
});

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExtractor;

impl ReferenceExtractor for HtmlExtractor {
    fn extract(&self, bytes: &[u8]) -> Vec<RawReference> {
        let mut refs: Vec<RawReference> = URL_ATTR
            .captures_iter(bytes)
            .filter_map(|caps| first_group(&caps, &[1, 2, 3]))
            .collect();

        for caps in SRCSET_ATTR.captures_iter(bytes) {
            if let Some(value) = caps.get(1).or_else(|| caps.get(2)) {
                srcset_candidates(value.as_bytes(), value.start(), &mut refs);
            }
        }

        CssExtractor::urls(bytes, &mut refs);
        refs
    }
}

/// Split `a.png 1x, b.png 2x` into one reference per image URL.
fn srcset_candidates(value: &[u8], offset: usize, out: &mut Vec<RawReference>) {
    let mut pos = 0;
    for candidate in value.split(|&b| b == b',') {
        let lead = candidate.len() - candidate.trim_ascii_start().len();
        let url_len = candidate[lead..]
            .iter()
            .position(u8::is_ascii_whitespace)
            .unwrap_or(candidate.len() - lead);
        let start = offset + pos + lead;
        if url_len > 0
            && let Ok(url) = std::str::from_utf8(&candidate[lead..lead + url_len])
        {
            out.push(RawReference::new(start..start + url_len, url));
        }
        pos += candidate.len() + 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::normalize;

    fn urls(html: &str) -> Vec<String> {
        normalize(HtmlExtractor.extract(html.as_bytes()))
            .into_iter()
            .map(|r| r.url)
            .collect()
    }

    #[test]
    fn test_attributes() {
        let html = r#"<script src="main.js"></script><link rel="stylesheet" href='/assets/vendor.css'><img src=../images/some.png>"#;
        assert_eq!(urls(html), ["main.js", "/assets/vendor.css", "../images/some.png"]);
    }

    #[test]
    fn test_inline_style() {
        let html = r#"<style type="text/css">body {background-image: url(../images/header.jpg);}</style>"#;
        assert_eq!(urls(html), ["../images/header.jpg"]);
    }

    #[test]
    fn test_srcset() {
        let html = r#"<img srcset="small.png 1x, large.png 2x" src="small.png">"#;
        let refs = normalize(HtmlExtractor.extract(html.as_bytes()));
        let found: Vec<_> = refs.iter().map(|r| &html[r.range.clone()]).collect();
        assert_eq!(found, ["small.png", "large.png", "small.png"]);
    }

    #[test]
    fn test_svg_xlink_href() {
        let svg = r#"<svg><image xlink:href="photo.png"/></svg>"#;
        assert_eq!(urls(svg), ["photo.png"]);
    }

    #[test]
    fn test_ranges_match_source_text() {
        let html = r#"<a href="  page.html#top  ">x</a>"#;
        let refs = HtmlExtractor.extract(html.as_bytes());
        assert_eq!(refs.len(), 1);
        assert_eq!(&html[refs[0].range.clone()], "page.html#top");
    }
}

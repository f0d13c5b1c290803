//! JavaScript reference scanning.
//!
//! Only static, path-like module specifiers are reported:
//! `import x from "./a.js"`, `export * from "../b.js"`, `import("./c.js")`,
//! `new URL("./d.png", import.meta.url)`. Bare specifiers (`"react"`) name
//! packages, not files, and are skipped.

use std::sync::LazyLock;

use regex::bytes::Regex;

use super::{ReferenceExtractor, first_group};
use crate::asset::RawReference;

static SPECIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?:\bimport\s*(?:[\w*{}\s,$]+?\s*\bfrom\s*)?|\bexport\s*[\w*{}\s,$]+?\s*\bfrom\s*|\bimport\s*\(\s*|\bnew\s+URL\s*\(\s*)(?:"([^"\n]*)"|'([^'\n]*)')"#,
    )
    .unwrap()
});

#[derive(Debug, Clone, Copy, Default)]
pub struct JsExtractor;

impl ReferenceExtractor for JsExtractor {
    fn extract(&self, bytes: &[u8]) -> Vec<RawReference> {
        SPECIFIER
            .captures_iter(bytes)
            .filter_map(|caps| first_group(&caps, &[1, 2]))
            .filter(|r| is_path_specifier(&r.url))
            .collect()
    }
}

fn is_path_specifier(spec: &str) -> bool {
    spec.starts_with("./") || spec.starts_with("../") || spec.starts_with('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(js: &str) -> Vec<String> {
        JsExtractor
            .extract(js.as_bytes())
            .into_iter()
            .map(|r| r.url)
            .collect()
    }

    #[test]
    fn test_static_imports() {
        let js = r#"import a from "./a.js"; import { b, c } from '../lib/b.js'; import "./side.js";"#;
        assert_eq!(urls(js), ["./a.js", "../lib/b.js", "./side.js"]);
    }

    #[test]
    fn test_reexport_and_dynamic() {
        let js = r#"export * from "./x.js"; const m = await import("./lazy.js");"#;
        assert_eq!(urls(js), ["./x.js", "./lazy.js"]);
    }

    #[test]
    fn test_new_url() {
        let js = r#"const img = new URL("./logo.png", import.meta.url);"#;
        assert_eq!(urls(js), ["./logo.png"]);
    }

    #[test]
    fn test_bare_specifiers_and_strings_skipped() {
        let js = r#"import React from "react"; const t = { en: "translations/en.json" };"#;
        assert!(urls(js).is_empty());
    }
}

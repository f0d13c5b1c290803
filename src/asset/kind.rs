//! Asset kind definitions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of static asset, derived from the file extension.
///
/// Kind names are used verbatim in `asset_order` and `prepend_exclude_assets`
/// (`"Html"`, `"Css"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetKind {
    Html,
    Svg,
    JavaScript,
    Json,
    Css,
    Font,
    Png,
    Jpeg,
    Gif,
    Webp,
    Avif,
    Ico,
    Text,
    /// Anything else (wasm, pdf, media...). Never scanned for references.
    Other,
}

impl AssetKind {
    pub const ALL: [Self; 14] = [
        Self::Html,
        Self::Svg,
        Self::JavaScript,
        Self::Json,
        Self::Css,
        Self::Font,
        Self::Png,
        Self::Jpeg,
        Self::Gif,
        Self::Webp,
        Self::Avif,
        Self::Ico,
        Self::Text,
        Self::Other,
    ];

    /// Guess kind from a file name or asset id.
    pub fn from_path(path: &str) -> Self {
        let name = path.rsplit('/').next().unwrap_or(path);
        let ext = match name.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => ext.to_ascii_lowercase(),
            _ => return Self::Other,
        };

        match ext.as_str() {
            "html" | "htm" | "xhtml" => Self::Html,
            "svg" => Self::Svg,
            "js" | "mjs" | "cjs" => Self::JavaScript,
            "json" | "map" | "webmanifest" => Self::Json,
            "css" => Self::Css,
            "woff" | "woff2" | "ttf" | "otf" | "eot" => Self::Font,
            "png" => Self::Png,
            "jpg" | "jpeg" => Self::Jpeg,
            "gif" => Self::Gif,
            "webp" => Self::Webp,
            "avif" => Self::Avif,
            "ico" => Self::Ico,
            "txt" | "xml" | "csv" | "md" => Self::Text,
            _ => Self::Other,
        }
    }

    /// Finalization order used when `asset_order` is not configured.
    ///
    /// Leaf kinds come first so that anything referencing them is
    /// processed after their names are fixed.
    pub fn default_order() -> Vec<Self> {
        vec![
            Self::Png,
            Self::Jpeg,
            Self::Gif,
            Self::Webp,
            Self::Avif,
            Self::Ico,
            Self::Font,
            Self::Text,
            Self::Other,
            Self::Json,
            Self::Svg,
            Self::Css,
            Self::JavaScript,
            Self::Html,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Html => "Html",
            Self::Svg => "Svg",
            Self::JavaScript => "JavaScript",
            Self::Json => "Json",
            Self::Css => "Css",
            Self::Font => "Font",
            Self::Png => "Png",
            Self::Jpeg => "Jpeg",
            Self::Gif => "Gif",
            Self::Webp => "Webp",
            Self::Avif => "Avif",
            Self::Ico => "Ico",
            Self::Text => "Text",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path() {
        assert_eq!(AssetKind::from_path("index.html"), AssetKind::Html);
        assert_eq!(AssetKind::from_path("assets/vendor.CSS"), AssetKind::Css);
        assert_eq!(AssetKind::from_path("lib/jquery.min.js"), AssetKind::JavaScript);
        assert_eq!(AssetKind::from_path("fonts/a.woff2"), AssetKind::Font);
        assert_eq!(AssetKind::from_path("img/photo.JPG"), AssetKind::Jpeg);
        assert_eq!(AssetKind::from_path("robots.txt"), AssetKind::Text);
        assert_eq!(AssetKind::from_path("app.wasm"), AssetKind::Other);
        // Dotfiles have no extension
        assert_eq!(AssetKind::from_path("dir/.htaccess"), AssetKind::Other);
        assert_eq!(AssetKind::from_path("Makefile"), AssetKind::Other);
    }

    #[test]
    fn test_default_order_is_complete() {
        let order = AssetKind::default_order();
        for kind in AssetKind::ALL {
            assert!(order.contains(&kind), "{kind} missing from default order");
        }
        let html = order.iter().position(|k| *k == AssetKind::Html).unwrap();
        let css = order.iter().position(|k| *k == AssetKind::Css).unwrap();
        let png = order.iter().position(|k| *k == AssetKind::Png).unwrap();
        assert!(png < css && css < html);
    }

    #[test]
    fn test_serde_names() {
        let kinds: Vec<AssetKind> = serde_json::from_str(r#"["Html", "JavaScript"]"#).unwrap();
        assert_eq!(kinds, vec![AssetKind::Html, AssetKind::JavaScript]);
        assert_eq!(AssetKind::JavaScript.to_string(), "JavaScript");
    }
}

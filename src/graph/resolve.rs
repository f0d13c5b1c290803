//! Link classification and resolution to asset ids.

use crate::utils::url::{decode, is_external_link, resolve, split_suffix};

/// Syntactic classification of links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind<'a> {
    /// External link with URL scheme (https://, mailto:, data:, //host)
    External(&'a str),
    /// Pure fragment/anchor link (#section), or a bare `?query`.
    Fragment(&'a str),
    /// Site-root-relative path (/assets/app.css).
    SiteRoot(&'a str),
    /// File-relative path (./image.png, ../other.css, img.png).
    FileRelative(&'a str),
}

impl<'a> LinkKind<'a> {
    /// Parse a link string into its syntactic kind.
    #[inline]
    pub fn parse(link: &'a str) -> Self {
        if is_external_link(link) {
            Self::External(link)
        } else if link.starts_with(['#', '?']) {
            Self::Fragment(link)
        } else if link.starts_with('/') {
            Self::SiteRoot(link)
        } else {
            Self::FileRelative(link)
        }
    }
}

/// Where a reference points, relative to the input tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Not a file reference (external, fragment, directory URL, template junk).
    Ignore,
    /// Climbs above the input root.
    OutsideRoot,
    /// Candidate asset id.
    Path(String),
}

/// Resolve a reference found in a document located in `base_dir`.
pub fn classify(base_dir: &str, url: &str) -> Target {
    let (path, base) = match LinkKind::parse(url) {
        LinkKind::External(_) | LinkKind::Fragment(_) => return Target::Ignore,
        LinkKind::SiteRoot(path) => (path, ""),
        LinkKind::FileRelative(path) => (path, base_dir),
    };

    let (path, _suffix) = split_suffix(path);
    // Directory URLs address pages, not files
    if path.is_empty() || path.ends_with('/') {
        return Target::Ignore;
    }
    // Unexpanded template expressions ({{ asset }}, ${x})
    if path.contains(['{', '}', '$', '<', '>']) {
        return Target::Ignore;
    }

    let path = decode(path);
    match resolve(base, &path) {
        Some(id) => Target::Path(id),
        None => Target::OutsideRoot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kinds() {
        assert!(matches!(LinkKind::parse("https://x.com/a.js"), LinkKind::External(_)));
        assert!(matches!(LinkKind::parse("data:image/png;base64,AA"), LinkKind::External(_)));
        assert!(matches!(LinkKind::parse("#top"), LinkKind::Fragment(_)));
        assert!(matches!(LinkKind::parse("/assets/a.css"), LinkKind::SiteRoot(_)));
        assert!(matches!(LinkKind::parse("../img/a.png"), LinkKind::FileRelative(_)));
    }

    #[test]
    fn test_classify_relative() {
        assert_eq!(
            classify("assets", "../images/some.png"),
            Target::Path("images/some.png".into())
        );
        assert_eq!(
            classify("assets", "main.js?v=2#x"),
            Target::Path("assets/main.js".into())
        );
    }

    #[test]
    fn test_classify_root_relative_ignores_base() {
        assert_eq!(
            classify("deep/dir", "/assets/vendor.css"),
            Target::Path("assets/vendor.css".into())
        );
    }

    #[test]
    fn test_classify_decodes_percent() {
        assert_eq!(
            classify("", "my%20image.png"),
            Target::Path("my image.png".into())
        );
    }

    #[test]
    fn test_classify_ignored() {
        assert_eq!(classify("", "https://cdn.example.com/x.js"), Target::Ignore);
        assert_eq!(classify("", "#section"), Target::Ignore);
        assert_eq!(classify("", "/"), Target::Ignore);
        assert_eq!(classify("", "about/"), Target::Ignore);
        assert_eq!(classify("", "{{ rootURL }}logo.svg"), Target::Ignore);
    }

    #[test]
    fn test_classify_outside_root() {
        assert_eq!(classify("", "../secret.txt"), Target::OutsideRoot);
    }
}

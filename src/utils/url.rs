//! URL processing utilities.
//!
//! Asset ids are decoded, `/`-separated paths relative to the input root
//! without a leading slash (`assets/main.js`). These helpers convert between
//! ids and the URL text found inside assets:
//! - Link type detection (external vs internal)
//! - Query/fragment suffix splitting
//! - `.`/`..` resolution against a base directory
//! - Relative URL computation between two output paths

use std::borrow::Cow;
use std::path::{Component, Path};

use percent_encoding::{AsciiSet, CONTROLS, percent_decode_str, utf8_percent_encode};

/// Characters escaped when an output path is written back into a URL.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'\'')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Check if a link is external (has a URL scheme like http:, mailto:, data:, etc.)
///
/// A valid scheme must:
/// - Have at least 1 character before the colon
/// - Only contain ASCII alphanumeric or `+`, `-`, `.`
///
/// Protocol-relative links (`//cdn.example.com/x.js`) are external too.
#[inline]
pub fn is_external_link(link: &str) -> bool {
    if link.starts_with("//") {
        return true;
    }
    link.find(':').is_some_and(|pos| {
        pos > 0
            && link[..pos]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Split a URL into its path and the `?query`/`#fragment` suffix.
///
/// The suffix keeps its leading `?` or `#` so it can be appended back verbatim.
#[inline]
pub fn split_suffix(url: &str) -> (&str, &str) {
    match url.find(['?', '#']) {
        Some(pos) => url.split_at(pos),
        None => (url, ""),
    }
}

/// Decode percent-encoding, falling back to the raw text on invalid UTF-8.
#[inline]
pub fn decode(path: &str) -> Cow<'_, str> {
    percent_decode_str(path)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(path))
}

/// Percent-encode a decoded path for use inside a URL.
#[inline]
pub fn encode(path: &str) -> Cow<'_, str> {
    utf8_percent_encode(path, PATH_SEGMENT).into()
}

/// Directory part of an id (`""` for files at the root).
#[inline]
pub fn parent_dir(id: &str) -> &str {
    id.rsplit_once('/').map_or("", |(dir, _)| dir)
}

/// Resolve `path` against `base_dir`, collapsing `.` and `..` segments.
///
/// Returns `None` when the result would escape the root or is empty.
///
/// # Examples
/// ```
/// use cachebust::utils::url::resolve;
/// assert_eq!(resolve("assets", "../images/a.png").as_deref(), Some("images/a.png"));
/// assert_eq!(resolve("", "../a.png"), None);
/// ```
pub fn resolve(base_dir: &str, path: &str) -> Option<String> {
    let mut segments: Vec<&str> = base_dir.split('/').filter(|s| !s.is_empty()).collect();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            other => segments.push(other),
        }
    }

    if segments.is_empty() {
        return None;
    }
    Some(segments.join("/"))
}

/// Compute the URL of `target` as seen from a document living in `from_dir`.
///
/// # Examples
/// ```
/// use cachebust::utils::url::relative_url;
/// assert_eq!(relative_url("assets", "images/a.png"), "../images/a.png");
/// assert_eq!(relative_url("assets", "assets/main.js"), "main.js");
/// ```
pub fn relative_url(from_dir: &str, target: &str) -> String {
    let from: Vec<&str> = from_dir.split('/').filter(|s| !s.is_empty()).collect();
    let to: Vec<&str> = target.split('/').filter(|s| !s.is_empty()).collect();
    let (to_dir, file) = to.split_at(to.len().saturating_sub(1));

    let common = from
        .iter()
        .zip(to_dir)
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<&str> = Vec::with_capacity(from.len() - common + to.len() - common);
    parts.extend(std::iter::repeat_n("..", from.len() - common));
    parts.extend(&to_dir[common..]);
    parts.extend(file);
    parts.join("/")
}

/// Convert a filesystem path relative to the input root into an asset id.
///
/// Returns `None` for paths with parent or absolute components, or non-UTF-8 names.
pub fn id_from_rel_path(rel: &Path) -> Option<String> {
    let mut parts = Vec::new();
    for comp in rel.components() {
        match comp {
            Component::Normal(name) => parts.push(name.to_str()?),
            Component::CurDir => {}
            _ => return None,
        }
    }
    (!parts.is_empty()).then(|| parts.join("/"))
}

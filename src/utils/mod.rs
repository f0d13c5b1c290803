//! Shared helpers.
//!
//! - [`url`]: asset id / URL conversion (`resolve`, `relative_url`, `split_suffix`)

pub mod url;

/// Return "s" suffix for plural counts
#[inline]
pub fn plural_s(n: usize) -> &'static str {
    if n == 1 { "" } else { "s" }
}

/// Format count with noun, handling pluralization
///
/// - `plural_count(1, "asset")` -> `"1 asset"`
/// - `plural_count(5, "asset")` -> `"5 assets"`
#[inline]
pub fn plural_count(count: usize, noun: &str) -> String {
    format!("{} {}{}", count, noun, plural_s(count))
}

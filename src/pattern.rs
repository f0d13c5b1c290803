//! Glob pattern sets for seed discovery and exclusions.
//!
//! Patterns match asset ids (`assets/main.js`): `*` stays inside one path
//! segment, `**/` spans directories, and dotfiles need an explicit dot.

use glob::{MatchOptions, Pattern};

use crate::config::ConfigError;

const OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// A compiled list of glob patterns; matches when any pattern matches.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    patterns: Vec<Pattern>,
}

impl PatternSet {
    /// Compile patterns, reporting the first invalid one against `field`.
    pub fn compile<S: AsRef<str>>(field: &'static str, patterns: &[S]) -> Result<Self, ConfigError> {
        let patterns = patterns
            .iter()
            .map(|p| {
                let p = p.as_ref();
                Pattern::new(p.trim_start_matches("./")).map_err(|source| ConfigError::Glob {
                    field,
                    pattern: p.to_string(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn matches(&self, id: &str) -> bool {
        self.patterns.iter().any(|p| p.matches_with(id, OPTIONS))
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recursive_patterns() {
        let set = PatternSet::compile("test", &["**/*.css", "fonts/*"]).unwrap();
        assert!(set.matches("style.css"));
        assert!(set.matches("assets/deep/vendor.css"));
        assert!(set.matches("fonts/a.ttf"));
        assert!(!set.matches("fonts/sub/a.ttf"));
        assert!(!set.matches("main.js"));
    }

    #[test]
    fn test_star_does_not_cross_directories() {
        let set = PatternSet::compile("test", &["*.gif"]).unwrap();
        assert!(set.matches("a.gif"));
        assert!(!set.matches("images/a.gif"));
    }

    #[test]
    fn test_overlapping_patterns_match_once() {
        let set = PatternSet::compile("test", &["**/*.gif", "images/*"]).unwrap();
        assert!(set.matches("images/a.gif"));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let err = PatternSet::compile("fingerprint.exclude", &["images/[a"]).unwrap_err();
        assert!(matches!(err, ConfigError::Glob { field: "fingerprint.exclude", .. }));
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let set = PatternSet::default();
        assert!(set.is_empty());
        assert!(!set.matches("anything"));
    }
}

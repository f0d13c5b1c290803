//! `[fingerprint]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [fingerprint]
//! enabled = true                        # omitted: production builds only
//! prepend = "https://cdn.example.com/"  # URL prefix for referenced assets
//! exclude = ["**/*.gif"]                # never renamed
//! hash = "md5"                          # md5 | sha1 | sha256 | blake3 | none
//! hash_length = 0                       # 0 keeps the full digest
//! load_assets = ["**/*.css", "**/*.html", "**/*.js"]
//! asset_order = ["Png", "Css", "JavaScript", "Html"]
//! prepend_exclude_assets = ["Html"]
//! copy_unlisted = false
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{BuildMode, ConfigDiagnostics, ConfigError};
use crate::asset::AssetKind;
use crate::hash::{ContentHasher, HashAlgorithm};
use crate::pattern::PatternSet;
use crate::pipeline::{DEFAULT_LOAD_ASSETS, PipelineOptions};
use crate::plan::RewritePolicy;

// ============================================================================
// Field paths
// ============================================================================

pub(super) mod fields {
    pub const PREPEND: &str = "fingerprint.prepend";
    pub const EXCLUDE: &str = "fingerprint.exclude";
    pub const HASH_LENGTH: &str = "fingerprint.hash_length";
    pub const LOAD_ASSETS: &str = "fingerprint.load_assets";
    pub const ASSET_ORDER: &str = "fingerprint.asset_order";
    pub const PREPEND_EXCLUDE_ASSETS: &str = "fingerprint.prepend_exclude_assets";
}

// ============================================================================
// HashSetting
// ============================================================================

/// `hash = "..."`: a built-in algorithm, or `none` to disable renaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HashSetting {
    None,
    Algorithm(HashAlgorithm),
}

impl Default for HashSetting {
    fn default() -> Self {
        Self::Algorithm(HashAlgorithm::default())
    }
}

impl FromStr for HashSetting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("none") {
            Ok(Self::None)
        } else {
            s.parse().map(Self::Algorithm)
        }
    }
}

impl TryFrom<String> for HashSetting {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HashSetting> for String {
    fn from(value: HashSetting) -> Self {
        value.to_string()
    }
}

impl fmt::Display for HashSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::Algorithm(alg) => write!(f, "{alg}"),
        }
    }
}

// ============================================================================
// FingerprintConfig
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintConfig {
    /// Master switch. `None` resolves from the build mode.
    pub enabled: Option<bool>,

    /// URL prefix for referenced assets, e.g. a CDN origin.
    pub prepend: Option<String>,

    /// Glob patterns for assets that keep their name.
    pub exclude: Vec<String>,

    pub hash: HashSetting,

    /// Truncate digests to this many hex characters (0 = full digest).
    pub hash_length: usize,

    /// Seed patterns for graph discovery.
    pub load_assets: Vec<String>,

    /// Kinds finalized first come first.
    pub asset_order: Vec<AssetKind>,

    /// Kinds that are never referenced through `prepend`.
    pub prepend_exclude_assets: Vec<AssetKind>,

    /// Copy files outside the graph to the output unchanged.
    pub copy_unlisted: bool,
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            enabled: None,
            prepend: None,
            exclude: Vec::new(),
            hash: HashSetting::default(),
            hash_length: 0,
            load_assets: DEFAULT_LOAD_ASSETS.iter().map(|s| s.to_string()).collect(),
            asset_order: AssetKind::default_order(),
            prepend_exclude_assets: vec![AssetKind::Html],
            copy_unlisted: false,
        }
    }
}

impl FingerprintConfig {
    /// Effective master switch for a build mode.
    pub fn is_enabled(&self, mode: BuildMode) -> bool {
        self.enabled.unwrap_or(mode == BuildMode::Production)
    }

    /// Collect every problem in this section.
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        validate_globs(fields::EXCLUDE, &self.exclude, diag);
        validate_globs(fields::LOAD_ASSETS, &self.load_assets, diag);

        if self.load_assets.is_empty() {
            diag.error_with_hint(
                fields::LOAD_ASSETS,
                "no seed patterns, nothing would be fingerprinted",
                "e.g.: load_assets = [\"**/*.css\", \"**/*.html\", \"**/*.js\"]",
            );
        }

        if let Some(prefix) = &self.prepend {
            validate_prefix(prefix, diag);
        }

        if let HashSetting::Algorithm(alg) = self.hash
            && self.hash_length > alg.hex_len()
        {
            diag.error_with_hint(
                fields::HASH_LENGTH,
                format!(
                    "{} digests have {} hex characters, cannot keep {}",
                    alg,
                    alg.hex_len(),
                    self.hash_length
                ),
                format!("use a value between 0 and {}", alg.hex_len()),
            );
        }

        validate_unique(fields::ASSET_ORDER, &self.asset_order, diag);
        validate_unique(
            fields::PREPEND_EXCLUDE_ASSETS,
            &self.prepend_exclude_assets,
            diag,
        );
    }

    /// The configured hash function, if any.
    pub fn hasher(&self) -> Option<Arc<dyn ContentHasher>> {
        let HashSetting::Algorithm(alg) = self.hash else {
            return None;
        };
        let hasher: Arc<dyn ContentHasher> = if self.hash_length == 0 {
            Arc::new(alg)
        } else {
            Arc::new(alg.truncated(self.hash_length))
        };
        Some(hasher)
    }

    /// Compile into pipeline options.
    pub fn to_options(&self, mode: BuildMode) -> Result<PipelineOptions, ConfigError> {
        let policy = RewritePolicy {
            enabled: self.is_enabled(mode),
            hasher: self.hasher(),
            exclude: PatternSet::compile(fields::EXCLUDE, &self.exclude)?,
            prepend: self.prepend.clone().filter(|p| !p.is_empty()),
            asset_order: self.asset_order.clone(),
            prepend_exclude: self.prepend_exclude_assets.clone(),
        };
        Ok(PipelineOptions {
            policy,
            load_assets: PatternSet::compile(fields::LOAD_ASSETS, &self.load_assets)?,
            copy_unlisted: self.copy_unlisted,
            ..Default::default()
        })
    }
}

fn validate_globs(field: &'static str, patterns: &[String], diag: &mut ConfigDiagnostics) {
    for pattern in patterns {
        if let Err(err) = glob::Pattern::new(pattern) {
            diag.error(field, format!("invalid glob `{pattern}`: {err}"));
        }
    }
}

/// Absolute URLs must parse; anything else must be a root-relative path.
fn validate_prefix(prefix: &str, diag: &mut ConfigDiagnostics) {
    if prefix.contains("://") {
        match url::Url::parse(prefix) {
            Ok(parsed) if parsed.host_str().is_none() => diag.error_with_hint(
                fields::PREPEND,
                "URL must have a valid host",
                "use format like https://cdn.example.com/",
            ),
            Ok(_) => {}
            Err(e) => diag.error_with_hint(
                fields::PREPEND,
                format!("invalid URL: {e}"),
                "use format like https://cdn.example.com/",
            ),
        }
    } else if !prefix.starts_with('/') {
        diag.error_with_hint(
            fields::PREPEND,
            format!("`{prefix}` is neither an absolute URL nor a root-relative path"),
            "use https://cdn.example.com/ or /static/",
        );
    }
}

fn validate_unique(field: &'static str, kinds: &[AssetKind], diag: &mut ConfigDiagnostics) {
    for (i, kind) in kinds.iter().enumerate() {
        if kinds[..i].contains(kind) {
            diag.error(field, format!("`{kind}` is listed more than once"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validated(config: &FingerprintConfig) -> ConfigDiagnostics {
        let mut diag = ConfigDiagnostics::new();
        config.validate(&mut diag);
        diag
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = FingerprintConfig::default();
        assert!(validated(&config).is_empty());
        assert!(config.is_enabled(BuildMode::Production));
        assert!(!config.is_enabled(BuildMode::Development));
        assert_eq!(config.prepend_exclude_assets, [AssetKind::Html]);
    }

    #[test]
    fn test_explicit_enabled_wins_over_mode() {
        let config = FingerprintConfig {
            enabled: Some(true),
            ..Default::default()
        };
        assert!(config.is_enabled(BuildMode::Development));
    }

    #[test]
    fn test_hash_setting_parse() {
        assert_eq!("none".parse::<HashSetting>(), Ok(HashSetting::None));
        assert_eq!(
            "sha1".parse::<HashSetting>(),
            Ok(HashSetting::Algorithm(HashAlgorithm::Sha1))
        );
        assert!("crc".parse::<HashSetting>().is_err());
        assert_eq!(HashSetting::None.to_string(), "none");
    }

    #[test]
    fn test_invalid_fields_collected() {
        let config = FingerprintConfig {
            exclude: vec!["[".into()],
            prepend: Some("cdn.example.com".into()),
            hash: HashSetting::Algorithm(HashAlgorithm::Md5),
            hash_length: 64,
            asset_order: vec![AssetKind::Css, AssetKind::Css],
            load_assets: Vec::new(),
            ..Default::default()
        };
        let diag = validated(&config);
        let reported: Vec<_> = diag.errors().iter().map(|e| e.field).collect();
        assert_eq!(
            reported,
            [
                fields::EXCLUDE,
                fields::LOAD_ASSETS,
                fields::PREPEND,
                fields::HASH_LENGTH,
                fields::ASSET_ORDER
            ]
        );
    }

    #[test]
    fn test_prefix_forms() {
        for ok in ["https://cdn.example.com/", "/static/"] {
            let config = FingerprintConfig {
                prepend: Some(ok.into()),
                ..Default::default()
            };
            assert!(validated(&config).is_empty(), "{ok}");
        }
    }

    #[test]
    fn test_hasher_truncation() {
        let config = FingerprintConfig {
            hash_length: 8,
            ..Default::default()
        };
        let hasher = config.hasher().unwrap();
        assert_eq!(hasher.hash(b"png data").unwrap(), "e8e7c184");

        let none = FingerprintConfig {
            hash: HashSetting::None,
            ..Default::default()
        };
        assert!(none.hasher().is_none());
    }

    #[test]
    fn test_to_options() {
        let config = FingerprintConfig {
            prepend: Some("https://cdn.example.com/".into()),
            exclude: vec!["**/*.gif".into()],
            ..Default::default()
        };
        let opts = config.to_options(BuildMode::Development).unwrap();
        assert!(!opts.policy.enabled);
        assert!(opts.policy.exclude.matches("img/a.gif"));
        assert!(opts.load_assets.matches("css/site.css"));
        assert_eq!(opts.policy.prepend.as_deref(), Some("https://cdn.example.com/"));
    }
}

//! Configuration management for `cachebust.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error.rs        # ConfigError, ConfigDiagnostics
//! ├── fingerprint.rs  # [fingerprint] section
//! └── mod.rs          # Config (this file)
//! ```
//!
//! Values come from three layers, later ones winning: built-in defaults, the
//! config file, and command-line flags.

pub mod error;
mod fingerprint;

pub use error::{ConfigDiagnostic, ConfigDiagnostics, ConfigError};
pub use fingerprint::{FingerprintConfig, HashSetting};

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::{BuildArgs, CheckArgs};
use crate::log;
use crate::pipeline::PipelineOptions;

/// Config file looked up in the working directory when `-C` is not given.
pub const DEFAULT_CONFIG: &str = "cachebust.toml";

/// Production builds fingerprint by default, development builds do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildMode {
    #[default]
    Production,
    Development,
}

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing cachebust.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// File the configuration was read from (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Fingerprinting settings
    #[serde(default)]
    pub fingerprint: FingerprintConfig,
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, `cachebust.toml` in the
    /// working directory is used when present and defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG), false),
        };

        if !required && !path.exists() {
            return Ok(Self::default());
        }

        let mut config = Self::from_path(&path)?;
        config.config_path = Some(path);
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply `build` arguments from CLI.
    pub fn apply_build_args(&mut self, args: &BuildArgs) {
        let fp = &mut self.fingerprint;
        Self::update_option(&mut fp.enabled, args.enabled.map(Some).as_ref());
        Self::update_option(&mut fp.prepend, args.prepend.clone().map(Some).as_ref());
        Self::update_option(&mut fp.hash, args.hash.as_ref());
        Self::update_option(&mut fp.hash_length, args.hash_length.as_ref());
        Self::update_option(&mut fp.copy_unlisted, args.copy_unlisted.as_ref());
        Self::update_list(&mut fp.exclude, &args.exclude);
        Self::update_list(&mut fp.load_assets, &args.load);
    }

    /// Apply `check` arguments from CLI.
    pub fn apply_check_args(&mut self, args: &CheckArgs) {
        let fp = &mut self.fingerprint;
        Self::update_option(&mut fp.hash, args.hash.as_ref());
        Self::update_list(&mut fp.exclude, &args.exclude);
        Self::update_list(&mut fp.load_assets, &args.load);
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Replace a config list when the CLI flag was given at least once.
    fn update_list(config_list: &mut Vec<String>, cli_list: &[String]) {
        if !cli_list.is_empty() {
            *config_list = cli_list.to_vec();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration, collecting all errors at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.fingerprint.validate(&mut diag);
        diag.into_result()
    }

    /// Validate, then compile into pipeline options for `mode`.
    pub fn pipeline_options(&self, mode: BuildMode) -> Result<PipelineOptions, ConfigError> {
        self.validate()?;
        self.fingerprint.to_options(mode)
    }
}

// ============================================================================
// tests
// ============================================================================

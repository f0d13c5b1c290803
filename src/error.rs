//! Build error types.
//!
//! Only I/O failures, configuration problems and unresolvable output
//! conflicts stop a build. Everything else is a [`Warning`](crate::report::Warning).

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;

/// Fatal build errors
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("IO error when {action} `{}`", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("output path `{output}` is claimed by both `{first}` and `{second}`")]
    Conflict {
        output: String,
        first: String,
        second: String,
    },
}

impl BuildError {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    /// True for configuration errors (raised before any output is written).
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

pub type Result<T, E = BuildError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;

    #[test]
    fn test_io_error_display() {
        let err = BuildError::io(
            "reading",
            "assets/app.js",
            io::Error::new(ErrorKind::PermissionDenied, "denied"),
        );
        let display = err.to_string();
        assert!(display.contains("reading"));
        assert!(display.contains("assets/app.js"));
        assert!(!err.is_config());
    }

    #[test]
    fn test_conflict_display() {
        let err = BuildError::Conflict {
            output: "a-1.css".into(),
            first: "a.css".into(),
            second: "a-1.css".into(),
        };
        assert!(err.to_string().contains("claimed by both"));
    }
}

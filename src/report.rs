//! Build report: counts, planned renames and non-fatal warnings.

use std::fmt;

use serde::Serialize;

use crate::log;
use crate::utils::{plural_count, plural_s};

/// Why a reference could not be resolved to an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DanglingReason {
    /// No file at the resolved path.
    Missing,
    /// The path exists but is a directory (or another non-file).
    NotAFile,
    /// `..` segments climb above the input root.
    OutsideRoot,
    /// The file exists but could not be read.
    Unreadable(String),
}

impl fmt::Display for DanglingReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("file not found"),
            Self::NotAFile => f.write_str("not a file"),
            Self::OutsideRoot => f.write_str("points outside the input root"),
            Self::Unreadable(err) => write!(f, "unreadable: {err}"),
        }
    }
}

/// Non-fatal problems. They never stop a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// A reference whose target is not part of the input tree.
    /// The reference text is left unchanged.
    DanglingReference {
        source: String,
        url: String,
        reason: DanglingReason,
    },
    /// A fingerprinted name was already taken; the asset kept its original name.
    NameConflict {
        asset: String,
        wanted: String,
        claimed_by: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DanglingReference {
                source,
                url,
                reason,
            } => write!(f, "{source}: `{url}` {reason}"),
            Self::NameConflict {
                asset,
                wanted,
                claimed_by,
            } => write!(
                f,
                "{asset}: `{wanted}` already claimed by `{claimed_by}`, keeping original name"
            ),
        }
    }
}

impl Warning {
    /// Log prefix used when printing this warning.
    pub const fn module(&self) -> &'static str {
        match self {
            Self::DanglingReference { .. } => "dangling",
            Self::NameConflict { .. } => "conflict",
        }
    }
}

/// One planned rename (`from` → `to`), with the prefixed URL when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rename {
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Summary of one pipeline run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct BuildReport {
    /// Assets in the dependency graph.
    pub assets: usize,
    /// Graph assets written with rewritten names or content.
    pub written: usize,
    /// Files copied through unchanged (disabled mode or `copy_unlisted`).
    pub copied: usize,
    pub renames: Vec<Rename>,
    pub warnings: Vec<Warning>,
}

impl BuildReport {
    pub fn dangling_count(&self) -> usize {
        self.warnings
            .iter()
            .filter(|w| matches!(w, Warning::DanglingReference { .. }))
            .count()
    }

    /// Print warnings and a one-line summary through the logger.
    pub fn log_summary(&self) {
        for warning in &self.warnings {
            log!(warning.module(); "{}", warning);
        }

        let renamed = self.renames.iter().filter(|r| r.from != r.to).count();
        log!(
            "done";
            "{} in graph, {} fingerprinted, {} written, {} copied",
            plural_count(self.assets, "asset"),
            renamed,
            self.written,
            self.copied
        );

        if !self.warnings.is_empty() {
            log!(
                "warning";
                "{} warning{}",
                self.warnings.len(),
                plural_s(self.warnings.len())
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display() {
        let w = Warning::DanglingReference {
            source: "page.html".into(),
            url: "missing.js".into(),
            reason: DanglingReason::Missing,
        };
        assert_eq!(w.to_string(), "page.html: `missing.js` file not found");
        assert_eq!(w.module(), "dangling");
    }

    #[test]
    fn test_dangling_count() {
        let report = BuildReport {
            warnings: vec![
                Warning::DanglingReference {
                    source: "a.css".into(),
                    url: "../x.png".into(),
                    reason: DanglingReason::OutsideRoot,
                },
                Warning::NameConflict {
                    asset: "b.css".into(),
                    wanted: "b-1.css".into(),
                    claimed_by: "b-1.css".into(),
                },
            ],
            ..Default::default()
        };
        assert_eq!(report.dangling_count(), 1);
    }

    #[test]
    fn test_warning_serializes_with_kind_tag() {
        let w = Warning::DanglingReference {
            source: "a.html".into(),
            url: "b.js".into(),
            reason: DanglingReason::Missing,
        };
        let json = serde_json::to_value(&w).unwrap();
        assert_eq!(json["kind"], "dangling_reference");
        assert_eq!(json["reason"], "missing");
    }
}

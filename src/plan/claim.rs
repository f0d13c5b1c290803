//! Output path claims.
//!
//! Every path written under the output root is claimed by exactly one source.
//! Graph assets claim their planned output, copied-through files claim their
//! own path.

use rustc_hash::FxHashMap;

/// Output path -> source path that claimed it.
#[derive(Debug, Default)]
pub struct ClaimMap {
    claims: FxHashMap<String, String>,
}

impl ClaimMap {
    /// Start with paths that are already taken (files copied through unchanged).
    pub fn with_reserved<S: AsRef<str>>(reserved: &[S]) -> Self {
        let claims = reserved
            .iter()
            .map(|p| (p.as_ref().to_string(), p.as_ref().to_string()))
            .collect();
        Self { claims }
    }

    /// Who holds `output`, if anyone.
    pub fn holder(&self, output: &str) -> Option<&str> {
        self.claims.get(output).map(String::as_str)
    }

    /// Claim `output` for `source`. Returns the current holder on conflict.
    pub fn claim(&mut self, output: &str, source: &str) -> Result<(), String> {
        match self.claims.get(output) {
            Some(holder) if holder != source => Err(holder.clone()),
            Some(_) => Ok(()),
            None => {
                self.claims.insert(output.to_string(), source.to_string());
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

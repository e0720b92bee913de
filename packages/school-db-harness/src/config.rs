//! Harness configuration.

use serde::{Deserialize, Serialize};

use crate::error::HarnessError;

/// Shortest token accepted; keeps collisions negligible.
pub const MIN_TOKEN_LEN: usize = 8;
/// Hex digits in a UUID.
pub const MAX_TOKEN_LEN: usize = 32;

/// Harness configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Prefix marking rows created by the harness
    pub name_prefix: String,
    /// Number of random hex digits after the prefix
    pub token_len: usize,
    /// Cross-check new teachers through `ps.vTeacher`
    pub verify_view: bool,
    /// Leave other scenarios' fixtures out of the baseline comparison.
    /// Only for runs that share a store with concurrent scenarios.
    pub ignore_foreign_fixtures: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            name_prefix: "Test-".to_string(),
            token_len: MIN_TOKEN_LEN,
            verify_view: true,
            ignore_foreign_fixtures: false,
        }
    }
}

impl HarnessConfig {
    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.name_prefix.is_empty() {
            return Err(HarnessError::Config("name_prefix must not be empty".into()));
        }
        if !(MIN_TOKEN_LEN..=MAX_TOKEN_LEN).contains(&self.token_len) {
            return Err(HarnessError::Config(format!(
                "token_len must be between {MIN_TOKEN_LEN} and {MAX_TOKEN_LEN}, got {}",
                self.token_len
            )));
        }
        Ok(())
    }
}

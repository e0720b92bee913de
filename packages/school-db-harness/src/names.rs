//! Collision-resistant names for fixture rows.

use uuid::Uuid;

use crate::config::HarnessConfig;

/// Produces `{prefix}{token}` names, the token being leading hex digits of a
/// fresh random UUID.
#[derive(Debug, Clone)]
pub struct NameGenerator {
    prefix: String,
    token_len: usize,
}

impl Default for NameGenerator {
    fn default() -> Self {
        Self::from_config(&HarnessConfig::default())
    }
}

impl NameGenerator {
    /// Builds a generator from a validated config.
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self {
            prefix: config.name_prefix.clone(),
            token_len: config.token_len,
        }
    }

    pub fn next_name(&self) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let len = self.token_len.min(token.len());
        format!("{}{}", self.prefix, &token[..len])
    }

    /// Whether `name` looks like one this generator could have produced.
    pub fn is_generated(&self, name: &str) -> bool {
        name.strip_prefix(&self.prefix)
            .is_some_and(|token| {
                token.len() == self.token_len && token.chars().all(|c| c.is_ascii_hexdigit())
            })
    }
}

/// A fresh `Test-xxxxxxxx` name.
pub fn generate_unique_name() -> String {
    NameGenerator::default().next_name()
}

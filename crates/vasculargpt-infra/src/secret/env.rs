//! Environment variable secret provider.
//!
//! The highest-priority provider in the resolution chain. Values loaded from
//! a `.env` file at startup land here too, since they are exported into the
//! process environment.

use vasculargpt_core::secret::SecretProvider;

/// Reads secrets from the process environment.
pub struct EnvSecretProvider;

impl EnvSecretProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for EnvSecretProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SecretProvider for EnvSecretProvider {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &str) -> Option<String> {
        match std::env::var(key) {
            Ok(val) => Some(val),
            Err(std::env::VarError::NotPresent) => None,
            // Present but not valid Unicode: unusable as a secret.
            Err(std::env::VarError::NotUnicode(_)) => None,
        }
    }
}

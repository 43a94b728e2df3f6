//! Secret resolution through a chain of read-only providers.
//!
//! Providers are consulted in priority order and the first match wins.
//! The production chain is `[EnvSecretProvider, FileSecretProvider]`, built
//! in vasculargpt-infra.

use std::sync::Arc;

use tracing::debug;

use vasculargpt_types::config::DEFAULT_INDEX_NAME;

/// Secret key naming the vector index.
pub const PINECONE_INDEX: &str = "PINECONE_INDEX";
/// Secret key for the vector index service.
pub const PINECONE_API_KEY: &str = "PINECONE_API_KEY";
/// Secret key for the embedding and chat-completion services.
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// A read-only source of secret values.
pub trait SecretProvider: Send + Sync {
    /// Short label for logs (e.g., "env", "file").
    fn name(&self) -> &str;

    /// Look up `key`. `None` means this provider does not have it.
    fn get(&self, key: &str) -> Option<String>;
}

/// Shared, type-erased secret provider.
pub type DynSecretProvider = Arc<dyn SecretProvider>;

/// Resolves secrets across a provider chain.
pub struct SecretService {
    providers: Vec<DynSecretProvider>,
}

impl SecretService {
    /// Providers should be ordered by precedence (highest priority first).
    pub fn new(providers: Vec<DynSecretProvider>) -> Self {
        Self { providers }
    }

    /// First value found for `key`, walking providers in order.
    pub fn get_secret(&self, key: &str) -> Option<String> {
        self.providers.iter().find_map(|provider| {
            let value = provider.get(key)?;
            debug!(key, provider = provider.name(), "Resolved secret");
            Some(value)
        })
    }

    /// Vector index name, falling back to the built-in default.
    pub fn index_name(&self) -> String {
        self.get_secret(PINECONE_INDEX)
            .unwrap_or_else(|| DEFAULT_INDEX_NAME.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct MapProvider {
        label: &'static str,
        values: HashMap<String, String>,
    }

    impl MapProvider {
        fn new(label: &'static str, pairs: &[(&str, &str)]) -> DynSecretProvider {
            Arc::new(Self {
                label,
                values: pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            })
        }
    }

    impl SecretProvider for MapProvider {
        fn name(&self) -> &str {
            self.label
        }

        fn get(&self, key: &str) -> Option<String> {
            self.values.get(key).cloned()
        }
    }

    #[test]
    fn test_first_provider_wins() {
        let service = SecretService::new(vec![
            MapProvider::new("env", &[(OPENAI_API_KEY, "sk-env")]),
            MapProvider::new("file", &[(OPENAI_API_KEY, "sk-file"), (PINECONE_API_KEY, "pc-file")]),
        ]);

        assert_eq!(service.get_secret(OPENAI_API_KEY).as_deref(), Some("sk-env"));
        assert_eq!(service.get_secret(PINECONE_API_KEY).as_deref(), Some("pc-file"));
        assert!(service.get_secret("MISSING").is_none());
    }

    #[test]
    fn test_index_name_default() {
        let service = SecretService::new(vec![MapProvider::new("env", &[])]);
        assert_eq!(service.index_name(), "vasculargpt");
    }

    #[test]
    fn test_index_name_from_secrets() {
        let service = SecretService::new(vec![MapProvider::new(
            "file",
            &[(PINECONE_INDEX, "carotid-notes")],
        )]);
        assert_eq!(service.index_name(), "carotid-notes");
    }
}

//! Secrets file provider.
//!
//! Reads a flat TOML table of string values, e.g.
//!
//! ```toml
//! PINECONE_INDEX = "vasculargpt"
//! PINECONE_API_KEY = "..."
//! ```
//!
//! Non-string values are ignored. The file is read once at construction.

use std::collections::HashMap;
use std::path::Path;

use vasculargpt_core::secret::SecretProvider;
use vasculargpt_types::error::ConfigError;

/// Secrets loaded from a TOML file.
pub struct FileSecretProvider {
    values: HashMap<String, String>,
}

impl FileSecretProvider {
    /// Load secrets from `path`. A missing file yields an empty provider.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No secrets file at {}", path.display());
                return Ok(Self::empty());
            }
            Err(err) => {
                return Err(ConfigError::Read {
                    path: path.display().to_string(),
                    message: err.to_string(),
                });
            }
        };
        Self::parse(&content, path)
    }

    /// Parse secrets from TOML text. `path` is only used in error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let table: toml::Table = toml::from_str(content).map_err(|err| ConfigError::Parse {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;

        let values = table
            .into_iter()
            .filter_map(|(key, value)| match value {
                toml::Value::String(s) => Some((key, s)),
                _ => None,
            })
            .collect();

        Ok(Self { values })
    }

    pub fn empty() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SecretProvider for FileSecretProvider {
    fn name(&self) -> &str {
        "file"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_empty() {
        let tmp = TempDir::new().unwrap();
        let provider = FileSecretProvider::load(&tmp.path().join("secrets.toml")).unwrap();
        assert!(provider.is_empty());
    }

    #[test]
    fn test_load_string_values_only() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("secrets.toml");
        std::fs::write(
            &path,
            "PINECONE_INDEX = \"vascular-notes\"\nRETRIES = 3\n[nested]\nkey = \"v\"\n",
        )
        .unwrap();

        let provider = FileSecretProvider::load(&path).unwrap();
        assert_eq!(provider.len(), 1);
        assert_eq!(provider.get("PINECONE_INDEX").as_deref(), Some("vascular-notes"));
        assert!(provider.get("RETRIES").is_none());
    }

    #[test]
    fn test_parse_error_names_file() {
        let err = FileSecretProvider::parse("= broken", Path::new("secrets.toml"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("secrets.toml"));
    }
}

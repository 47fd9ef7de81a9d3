//! File-backed configuration source.
//!
//! Loads a JSON document holding the two configuration tables:
//!
//! ```json
//! {
//!     "app_settings": { "CacheSize": "128" },
//!     "connection_strings": [
//!         { "name": "main", "value": "host=localhost", "provider": "postgres" }
//!     ]
//! }
//! ```

use super::{ConfigSource, ConnectionString};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration file {path:?}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Default, Deserialize)]
struct ConfigDocument {
    #[serde(default)]
    app_settings: HashMap<String, String>,
    #[serde(default)]
    connection_strings: Vec<ConnectionString>,
}

/// Configuration source backed by a JSON file on disk.
///
/// The document is read once at construction time. Both sections are
/// optional; an absent section is an empty table.
#[derive(Debug)]
pub struct JsonConfig {
    document: ConfigDocument,
}

impl JsonConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let document = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self { document })
    }
}

impl ConfigSource for JsonConfig {
    fn app_setting(&self, key: &str) -> Option<String> {
        self.document.app_settings.get(key).cloned()
    }

    fn connection_string(&self, name: &str) -> Option<ConnectionString> {
        self.document
            .connection_strings
            .iter()
            .find(|c| c.name == name)
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_loads_both_sections() {
        let file = write_config(
            r#"{
                "app_settings": { "CacheSize": "128", "Greeting": "hello" },
                "connection_strings": [
                    { "name": "main", "value": "host=localhost", "provider": "postgres" }
                ]
            }"#,
        );

        let config = JsonConfig::from_path(file.path()).unwrap();
        assert_eq!(config.app_setting("CacheSize").as_deref(), Some("128"));
        assert_eq!(config.app_setting("Missing"), None);

        let connection = config.connection_string("main").unwrap();
        assert_eq!(connection.value, "host=localhost");
        assert_eq!(connection.provider.as_deref(), Some("postgres"));
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let file = write_config("{}");
        let config = JsonConfig::from_path(file.path()).unwrap();
        assert_eq!(config.app_setting("anything"), None);
        assert_eq!(config.connection_string("anything"), None);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = JsonConfig::from_path("/nonexistent/ignition.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_malformed_document_is_a_parse_error() {
        let file = write_config("{ not json");
        let err = JsonConfig::from_path(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}

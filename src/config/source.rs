use dashmap::DashMap;
use serde::Deserialize;
use std::env;
use std::sync::Arc;

/// A named connection string entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectionString {
    pub name: String,
    pub value: String,
    /// Driver or provider hint, e.g. `"postgres"`. Purely informational.
    #[serde(default)]
    pub provider: Option<String>,
}

impl ConnectionString {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            provider: None,
        }
    }
}

/// Read access to the two configuration tables the bootstrapper injects from:
/// string-keyed app settings and named connection strings.
pub trait ConfigSource: Send + Sync {
    fn app_setting(&self, key: &str) -> Option<String>;

    fn connection_string(&self, name: &str) -> Option<ConnectionString>;
}

/// In-memory configuration source.
///
/// The default source for a [`Bootstrapper`](crate::boot::Bootstrapper), and
/// the natural test double when exercising extensions that inject settings.
#[derive(Clone, Default)]
pub struct MemoryConfig {
    app_settings: Arc<DashMap<String, String>>,
    connection_strings: Arc<DashMap<String, ConnectionString>>,
}

impl MemoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source seeded with the process environment as app settings.
    pub fn from_env() -> Self {
        let config = Self::default();
        for (key, value) in env::vars() {
            config.set(&key, &value);
        }
        config
    }

    pub fn set(&self, key: &str, value: &str) -> &Self {
        self.app_settings.insert(key.to_string(), value.to_string());
        self
    }

    pub fn set_connection_string(&self, connection: ConnectionString) -> &Self {
        self.connection_strings
            .insert(connection.name.clone(), connection);
        self
    }
}

impl ConfigSource for MemoryConfig {
    fn app_setting(&self, key: &str) -> Option<String> {
        self.app_settings.get(key).map(|v| v.clone())
    }

    fn connection_string(&self, name: &str) -> Option<ConnectionString> {
        self.connection_strings.get(name).map(|v| v.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_config_round_trip() {
        let config = MemoryConfig::new();
        config.set("CacheSize", "128");
        config.set_connection_string(ConnectionString::new("main", "host=localhost"));

        assert_eq!(config.app_setting("CacheSize").as_deref(), Some("128"));
        assert_eq!(config.app_setting("Missing"), None);

        let connection = config.connection_string("main").unwrap();
        assert_eq!(connection.value, "host=localhost");
        assert_eq!(connection.provider, None);
        assert_eq!(config.connection_string("other"), None);
    }

    #[test]
    fn test_from_env_picks_up_process_environment() {
        // SAFETY: test-only mutation of this process's environment.
        unsafe { env::set_var("IGNITION_TEST_SETTING", "present") };
        let config = MemoryConfig::from_env();
        assert_eq!(
            config.app_setting("IGNITION_TEST_SETTING").as_deref(),
            Some("present")
        );
    }
}

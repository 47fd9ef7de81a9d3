//! Best-effort injection of configuration values into extension fields.

use super::ConfigSource;
use std::fmt::Display;
use std::str::FromStr;

/// Binds configuration values to extension fields.
///
/// A `ConfigBinder` is handed to each extension once, at registration time,
/// through [`Extension::configure`](crate::extension::Extension::configure).
/// The extension names the settings it depends on and the fields they land
/// in; the binder looks each key up, converts the string value to the field
/// type, and assigns it.
///
/// Injection is best-effort: a missing key or a value that fails to convert
/// is logged at warn level and leaves the field at its prior value. Binding
/// never fails registration.
///
/// # Example
///
/// ```rust,ignore
/// fn configure(&mut self, binder: &mut ConfigBinder<'_>) {
///     binder
///         .app_setting("CacheSize", &mut self.cache_size)
///         .connection_string("main", &mut self.database_url);
/// }
/// ```
pub struct ConfigBinder<'a> {
    source: &'a dyn ConfigSource,
    target: &'a str,
    applied: usize,
}

impl<'a> ConfigBinder<'a> {
    pub fn new(source: &'a dyn ConfigSource, target: &'a str) -> Self {
        Self {
            source,
            target,
            applied: 0,
        }
    }

    /// Look up an app setting and assign it to `field`, converting the raw
    /// string through `FromStr`.
    pub fn app_setting<T>(&mut self, key: &str, field: &mut T) -> &mut Self
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.source.app_setting(key) {
            Some(raw) => match raw.parse::<T>() {
                Ok(value) => {
                    tracing::debug!("Injecting app setting '{}' into {}", key, self.target);
                    *field = value;
                    self.applied += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        "App setting '{}' for {} has unusable value '{}': {}",
                        key,
                        self.target,
                        raw,
                        e
                    );
                }
            },
            None => {
                tracing::warn!("App setting '{}' not found for {}", key, self.target);
            }
        }
        self
    }

    /// Look up a connection string by name and assign its value to `field`.
    pub fn connection_string(&mut self, name: &str, field: &mut String) -> &mut Self {
        match self.source.connection_string(name) {
            Some(connection) => {
                tracing::debug!(
                    "Injecting connection string '{}' into {}",
                    name,
                    self.target
                );
                *field = connection.value;
                self.applied += 1;
            }
            None => {
                tracing::warn!("Connection string '{}' not found for {}", name, self.target);
            }
        }
        self
    }

    /// Number of fields actually assigned so far.
    pub fn applied(&self) -> usize {
        self.applied
    }
}

//! Configuration sources and value injection.
//!
//! Configuration lives in two string-keyed tables: app settings and named
//! connection strings. A [`ConfigSource`] exposes them, and a [`ConfigBinder`]
//! carries values into extension fields at registration time.

mod binder;
mod file;
mod source;

pub use binder::ConfigBinder;
pub use file::{ConfigError, JsonConfig};
pub use source::{ConfigSource, ConnectionString, MemoryConfig};

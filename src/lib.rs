//! # Ignition
//!
//! An application bootstrap framework with pluggable extensions and built-in
//! dependency injection for Rust.
//!
//! Ignition breaks an application into extensions, each owning the startup
//! and shutdown of one module, and drives them through an ordered lifecycle
//! against a shared typed container.
//!
//! ## Features
//!
//! - **Extension Lifecycle**: three ordered startup phases
//!   (before/on/after) and reverse-order shutdown
//! - **Dependency Injection**: thread-safe typed container with trait-object
//!   and named registrations
//! - **Configuration Injection**: app settings and connection strings bound
//!   into extension fields at registration time, best-effort
//! - **Graceful Shutdown**: SIGTERM/SIGINT-driven teardown
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ignition::{async_trait, Bootstrapper, ConfigBinder, Container, Extension, ExtensionError};
//!
//! #[derive(Default)]
//! struct CacheExtension {
//!     capacity: usize,
//! }
//!
//! #[async_trait]
//! impl Extension for CacheExtension {
//!     fn configure(&mut self, binder: &mut ConfigBinder<'_>) {
//!         binder.app_setting("CacheCapacity", &mut self.capacity);
//!     }
//!
//!     async fn on_startup(&mut self, context: &Container) -> Result<(), ExtensionError> {
//!         context.register(vec![0u8; self.capacity]);
//!         Ok(())
//!     }
//!
//!     async fn on_shutdown(&mut self, _context: &Container) -> Result<(), ExtensionError> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut bootstrapper = Bootstrapper::new();
//!     bootstrapper.add_extension::<CacheExtension>()?;
//!
//!     bootstrapper.startup().await?;
//!     // ... application runs ...
//!     bootstrapper.shutdown().await?;
//!     Ok(())
//! }
//! ```

pub mod boot;
pub mod config;
pub mod di;
pub mod error;
pub mod extension;

// Re-export core types
pub use boot::{BootError, Bootstrapper, Phase, ShutdownHandler, shutdown_signal};
pub use config::{ConfigBinder, ConfigError, ConfigSource, ConnectionString, JsonConfig, MemoryConfig};
pub use di::{Container, ContainerBuilder};
pub use error::{IgnitionError, Result};
pub use extension::{CallbackExtension, Extension, ExtensionError};

// Re-export commonly used types from dependencies
pub use async_trait::async_trait;

/// Prelude module for convenient imports
///
/// ```
/// use ignition::prelude::*;
/// ```
pub mod prelude {
    pub use crate::boot::{BootError, Bootstrapper, Phase, ShutdownHandler, shutdown_signal};
    pub use crate::config::{
        ConfigBinder, ConfigError, ConfigSource, ConnectionString, JsonConfig, MemoryConfig,
    };
    pub use crate::di::{Container, ContainerBuilder};
    pub use crate::error::{IgnitionError, Result};
    pub use crate::extension::{CallbackExtension, Extension, ExtensionError};
    pub use async_trait::async_trait;
    pub use std::sync::Arc;
}

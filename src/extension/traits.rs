//! The extension contract.

use super::ExtensionError;
use crate::config::ConfigBinder;
use crate::di::Container;
use async_trait::async_trait;

/// A pluggable application module driven by the bootstrapper.
///
/// Every hook has a default no-op body, so an extension implements only the
/// phases it cares about. The `context` passed to each hook is the shared
/// dependency injection container; register the services your module provides
/// in [`on_startup`](Extension::on_startup) and resolve services other
/// modules provide in [`after_startup`](Extension::after_startup).
///
/// # Example
///
/// ```rust,ignore
/// use ignition::{async_trait, Container, Extension, ExtensionError};
///
/// #[derive(Default)]
/// struct DatabaseExtension {
///     url: String,
/// }
///
/// #[async_trait]
/// impl Extension for DatabaseExtension {
///     fn configure(&mut self, binder: &mut ConfigBinder<'_>) {
///         binder.connection_string("main", &mut self.url);
///     }
///
///     async fn on_startup(&mut self, context: &Container) -> Result<(), ExtensionError> {
///         let pool = Pool::connect(&self.url)
///             .await
///             .map_err(|e| ExtensionError::message(e.to_string()))?;
///         context.register(pool);
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Extension: Send + Sync {
    /// Declare configuration bindings for this extension.
    ///
    /// Called once when the extension is added to a bootstrapper, before any
    /// startup hook runs. Values are injected best-effort; see
    /// [`ConfigBinder`].
    fn configure(&mut self, _binder: &mut ConfigBinder<'_>) {}

    /// Called before the startup of any extension's main phase.
    ///
    /// Use this hook to validate preconditions or prepare state the main
    /// phase depends on. Every extension's `before_startup` completes before
    /// the first `on_startup` runs.
    async fn before_startup(&mut self, _context: &Container) -> Result<(), ExtensionError> {
        Ok(())
    }

    /// Called on startup.
    ///
    /// Initialize the services of the current module and register them with
    /// the container.
    async fn on_startup(&mut self, _context: &Container) -> Result<(), ExtensionError> {
        Ok(())
    }

    /// Called after every extension's main startup phase.
    ///
    /// Services registered by other extensions during `on_startup` are
    /// resolvable here.
    async fn after_startup(&mut self, _context: &Container) -> Result<(), ExtensionError> {
        Ok(())
    }

    /// Called on shutdown, in reverse registration order.
    ///
    /// Release connections, flush buffers, stop background work.
    async fn on_shutdown(&mut self, _context: &Container) -> Result<(), ExtensionError> {
        Ok(())
    }
}

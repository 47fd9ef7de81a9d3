use super::{Extension, ExtensionError};
use crate::di::Container;
use async_trait::async_trait;

type Hook = Box<dyn Fn(&Container) -> anyhow::Result<()> + Send + Sync>;

/// An extension assembled from plain closures, one per lifecycle phase.
///
/// Useful for host applications that need a small piece of startup or
/// shutdown work without defining an extension type. Phases without a
/// callback are no-ops.
///
/// # Example
///
/// ```rust,ignore
/// let extension = CallbackExtension::new()
///     .with_on_startup(|context| {
///         context.register(Metrics::new());
///         Ok(())
///     })
///     .with_on_shutdown(|_| {
///         tracing::info!("flushing metrics");
///         Ok(())
///     });
///
/// bootstrapper.add_extension_instance(extension)?;
/// ```
#[derive(Default)]
pub struct CallbackExtension {
    before_startup: Option<Hook>,
    on_startup: Option<Hook>,
    after_startup: Option<Hook>,
    on_shutdown: Option<Hook>,
}

impl CallbackExtension {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_before_startup<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Container) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.before_startup = Some(Box::new(callback));
        self
    }

    pub fn with_on_startup<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Container) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.on_startup = Some(Box::new(callback));
        self
    }

    pub fn with_after_startup<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Container) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.after_startup = Some(Box::new(callback));
        self
    }

    pub fn with_on_shutdown<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Container) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.on_shutdown = Some(Box::new(callback));
        self
    }
}

#[async_trait]
impl Extension for CallbackExtension {
    async fn before_startup(&mut self, context: &Container) -> Result<(), ExtensionError> {
        if let Some(callback) = &self.before_startup {
            callback(context)?;
        }
        Ok(())
    }

    async fn on_startup(&mut self, context: &Container) -> Result<(), ExtensionError> {
        if let Some(callback) = &self.on_startup {
            callback(context)?;
        }
        Ok(())
    }

    async fn after_startup(&mut self, context: &Container) -> Result<(), ExtensionError> {
        if let Some(callback) = &self.after_startup {
            callback(context)?;
        }
        Ok(())
    }

    async fn on_shutdown(&mut self, context: &Container) -> Result<(), ExtensionError> {
        if let Some(callback) = &self.on_shutdown {
            callback(context)?;
        }
        Ok(())
    }
}

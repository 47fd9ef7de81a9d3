//! The extension lifecycle orchestrator.

use super::error::{BootError, Phase, Result};
use crate::config::{ConfigBinder, ConfigSource, MemoryConfig};
use crate::di::{self, Container};
use crate::extension::Extension;
use std::any::TypeId;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

struct RegisteredExtension {
    name: String,
    extension: RwLock<Box<dyn Extension>>,
}

/// Orchestrates application startup and shutdown across registered
/// extensions.
///
/// Extensions are added up front, then driven through three ordered startup
/// phases and one shutdown phase:
///
/// - [`startup`](Bootstrapper::startup) runs every extension's
///   `before_startup`, then every `on_startup`, then every `after_startup`,
///   each pass in registration order. Phases are barriers: no extension
///   enters a phase until all extensions have completed the previous one.
/// - [`shutdown`](Bootstrapper::shutdown) runs `on_shutdown` in reverse
///   registration order.
///
/// When an extension is added, its configuration bindings are applied
/// best-effort from the bootstrapper's [`ConfigSource`].
///
/// # Example
///
/// ```rust,ignore
/// let mut bootstrapper = Bootstrapper::new();
/// bootstrapper.add_extension::<DatabaseExtension>()?;
/// bootstrapper.add_extension::<HttpExtension>()?;
///
/// bootstrapper.startup().await?;
/// // ... application runs ...
/// bootstrapper.shutdown().await?;
/// ```
pub struct Bootstrapper {
    context: Arc<Container>,
    config: Arc<dyn ConfigSource>,
    extensions: Vec<RegisteredExtension>,
    types: HashSet<TypeId>,
    startup_timeout: Option<Duration>,
    shutdown_timeout: Option<Duration>,
}

impl Bootstrapper {
    /// Create a bootstrapper with a fresh container and the process
    /// environment as its configuration source.
    pub fn new() -> Self {
        Self::assemble(Arc::new(Container::new()), Arc::new(MemoryConfig::from_env()))
    }

    /// Create a bootstrapper with a fresh container and a custom
    /// configuration source.
    pub fn with_config(config: impl ConfigSource + 'static) -> Self {
        Self::assemble(Arc::new(Container::new()), Arc::new(config))
    }

    /// Create a bootstrapper over an existing container.
    pub fn with_context(context: Arc<Container>) -> Self {
        Self::assemble(context, Arc::new(MemoryConfig::from_env()))
    }

    /// Create a bootstrapper bound to the process-wide container from
    /// [`di::global`].
    pub fn shared() -> Self {
        Self::assemble(di::global(), Arc::new(MemoryConfig::from_env()))
    }

    fn assemble(context: Arc<Container>, config: Arc<dyn ConfigSource>) -> Self {
        tracing::debug!("Extension cache built up");
        Self {
            context,
            config,
            extensions: Vec::new(),
            types: HashSet::new(),
            startup_timeout: None,
            shutdown_timeout: None,
        }
    }

    /// Replace the configuration source used for extensions added after this
    /// call.
    pub fn config_source(mut self, config: impl ConfigSource + 'static) -> Self {
        self.config = Arc::new(config);
        self
    }

    /// Set a deadline for the whole startup sequence.
    pub fn startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = Some(timeout);
        self
    }

    /// Set a deadline for the whole shutdown sequence.
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.shutdown_timeout = Some(timeout);
        self
    }

    /// The shared container extensions register into.
    pub fn context(&self) -> &Arc<Container> {
        &self.context
    }

    /// Number of registered extensions.
    pub fn extension_count(&self) -> usize {
        self.extensions.len()
    }

    /// Construct an extension via `Default` and add it.
    pub fn add_extension<E>(&mut self) -> Result<()>
    where
        E: Extension + Default + 'static,
    {
        self.add_extension_instance(E::default())
    }

    /// Add an extension instance.
    ///
    /// Applies the extension's configuration bindings, then appends it to the
    /// cache. Registration order determines startup order.
    ///
    /// # Errors
    ///
    /// Returns [`BootError::AlreadyRegistered`] if an extension of the same
    /// concrete type was added before.
    pub fn add_extension_instance<E>(&mut self, mut extension: E) -> Result<()>
    where
        E: Extension + 'static,
    {
        let name = short_type_name::<E>();
        if !self.types.insert(TypeId::of::<E>()) {
            tracing::error!("Extension {} is already registered", name);
            return Err(BootError::AlreadyRegistered(name));
        }

        tracing::debug!("Injecting configuration values into {}", name);
        let mut binder = ConfigBinder::new(self.config.as_ref(), &name);
        extension.configure(&mut binder);

        tracing::debug!("Adding extension {} to the cache", name);
        self.extensions.push(RegisteredExtension {
            name,
            extension: RwLock::new(Box::new(extension)),
        });
        Ok(())
    }

    /// Start up all registered extensions.
    ///
    /// The first failing hook aborts the sequence; hooks of later extensions
    /// in the current phase and all later phases do not run. Extensions that
    /// already started are left as they are, and the caller decides whether
    /// to invoke [`shutdown`](Bootstrapper::shutdown).
    pub async fn startup(&self) -> Result<()> {
        tracing::info!(
            "Startup sequence started ({} extensions)",
            self.extensions.len()
        );

        match self.startup_timeout {
            Some(limit) => match tokio::time::timeout(limit, self.run_startup()).await {
                Ok(outcome) => outcome?,
                Err(_) => {
                    tracing::error!("Startup sequence timed out after {:?}", limit);
                    return Err(BootError::Timeout {
                        sequence: "startup",
                        timeout: limit,
                    });
                }
            },
            None => self.run_startup().await?,
        }

        tracing::info!("Startup sequence finished successfully");
        Ok(())
    }

    /// Shut down all registered extensions in reverse registration order.
    ///
    /// The first failing hook aborts the sequence and is propagated;
    /// extensions earlier in registration order keep their resources.
    pub async fn shutdown(&self) -> Result<()> {
        tracing::info!(
            "Shutdown sequence started ({} extensions)",
            self.extensions.len()
        );

        match self.shutdown_timeout {
            Some(limit) => match tokio::time::timeout(limit, self.run_shutdown()).await {
                Ok(outcome) => outcome?,
                Err(_) => {
                    tracing::error!("Shutdown sequence timed out after {:?}", limit);
                    return Err(BootError::Timeout {
                        sequence: "shutdown",
                        timeout: limit,
                    });
                }
            },
            None => self.run_shutdown().await?,
        }

        tracing::info!("Shutdown sequence finished successfully");
        Ok(())
    }

    async fn run_startup(&self) -> Result<()> {
        for phase in [Phase::BeforeStartup, Phase::OnStartup, Phase::AfterStartup] {
            for entry in &self.extensions {
                self.invoke(entry, phase).await?;
            }
        }
        Ok(())
    }

    async fn run_shutdown(&self) -> Result<()> {
        for entry in self.extensions.iter().rev() {
            self.invoke(entry, Phase::OnShutdown).await?;
        }
        Ok(())
    }

    async fn invoke(&self, entry: &RegisteredExtension, phase: Phase) -> Result<()> {
        tracing::debug!("Calling {} on {}", phase, entry.name);

        let mut extension = entry.extension.write().await;
        let outcome = match phase {
            Phase::BeforeStartup => extension.before_startup(&self.context).await,
            Phase::OnStartup => extension.on_startup(&self.context).await,
            Phase::AfterStartup => extension.after_startup(&self.context).await,
            Phase::OnShutdown => extension.on_shutdown(&self.context).await,
        };

        outcome.map_err(|e| {
            tracing::error!("{} failed during {}: {}", entry.name, phase, e);
            BootError::Extension {
                extension: entry.name.clone(),
                phase,
                source: e,
            }
        })
    }
}

impl Default for Bootstrapper {
    fn default() -> Self {
        Self::new()
    }
}

/// Last path segment of a type name, e.g. `DatabaseExtension` for
/// `my_app::db::DatabaseExtension`.
fn short_type_name<T>() -> String {
    let full = std::any::type_name::<T>();
    full.rsplit("::").next().unwrap_or(full).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBinder;
    use crate::extension::{CallbackExtension, ExtensionError};
    use async_trait::async_trait;
    // Shadow the bootstrap Result alias; hook impls below return ExtensionError.
    use std::result::Result;
    use std::sync::Mutex;

    type EventLog = Arc<Mutex<Vec<String>>>;

    struct RecordingExtension {
        tag: &'static str,
        events: EventLog,
    }

    impl RecordingExtension {
        fn record(&self, phase: &str) {
            self.events.lock().unwrap().push(format!("{}:{}", self.tag, phase));
        }
    }

    #[async_trait]
    impl Extension for RecordingExtension {
        async fn before_startup(&mut self, _: &Container) -> Result<(), ExtensionError> {
            self.record("before");
            Ok(())
        }

        async fn on_startup(&mut self, _: &Container) -> Result<(), ExtensionError> {
            self.record("on");
            Ok(())
        }

        async fn after_startup(&mut self, _: &Container) -> Result<(), ExtensionError> {
            self.record("after");
            Ok(())
        }

        async fn on_shutdown(&mut self, _: &Container) -> Result<(), ExtensionError> {
            self.record("shutdown");
            Ok(())
        }
    }

    // Same hooks, distinct concrete type, so two recorders can coexist.
    struct SecondRecordingExtension(RecordingExtension);

    #[async_trait]
    impl Extension for SecondRecordingExtension {
        async fn before_startup(&mut self, c: &Container) -> Result<(), ExtensionError> {
            self.0.before_startup(c).await
        }

        async fn on_startup(&mut self, c: &Container) -> Result<(), ExtensionError> {
            self.0.on_startup(c).await
        }

        async fn after_startup(&mut self, c: &Container) -> Result<(), ExtensionError> {
            self.0.after_startup(c).await
        }

        async fn on_shutdown(&mut self, c: &Container) -> Result<(), ExtensionError> {
            self.0.on_shutdown(c).await
        }
    }

    fn recorders(events: &EventLog) -> (RecordingExtension, SecondRecordingExtension) {
        (
            RecordingExtension {
                tag: "a",
                events: Arc::clone(events),
            },
            SecondRecordingExtension(RecordingExtension {
                tag: "b",
                events: Arc::clone(events),
            }),
        )
    }

    #[tokio::test]
    async fn test_startup_phases_are_barriers() {
        let events: EventLog = Arc::new(Mutex::new(Vec::new()));
        let (a, b) = recorders(&events);

        let mut bootstrapper = Bootstrapper::with_config(MemoryConfig::new());
        bootstrapper.add_extension_instance(a).unwrap();
        bootstrapper.add_extension_instance(b).unwrap();
        bootstrapper.startup().await.unwrap();

        assert_eq!(
            *events.lock().unwrap(),
            vec!["a:before", "b:before", "a:on", "b:on", "a:after", "b:after"]
        );
    }

    #[tokio::test]
    async fn test_shutdown_runs_in_reverse_order() {
        let events: EventLog = Arc::new(Mutex::new(Vec::new()));
        let (a, b) = recorders(&events);

        let mut bootstrapper = Bootstrapper::with_config(MemoryConfig::new());
        bootstrapper.add_extension_instance(a).unwrap();
        bootstrapper.add_extension_instance(b).unwrap();
        bootstrapper.startup().await.unwrap();
        events.lock().unwrap().clear();

        bootstrapper.shutdown().await.unwrap();
        assert_eq!(*events.lock().unwrap(), vec!["b:shutdown", "a:shutdown"]);
    }

    #[tokio::test]
    async fn test_duplicate_extension_type_is_rejected() {
        let mut bootstrapper = Bootstrapper::with_config(MemoryConfig::new());
        bootstrapper
            .add_extension_instance(CallbackExtension::new())
            .unwrap();

        let err = bootstrapper
            .add_extension_instance(CallbackExtension::new())
            .unwrap_err();
        assert!(matches!(err, BootError::AlreadyRegistered(_)));
        assert_eq!(bootstrapper.extension_count(), 1);
    }

    #[derive(Default)]
    struct ConfiguredExtension {
        cache_size: u32,
        database_url: String,
    }

    #[async_trait]
    impl Extension for ConfiguredExtension {
        fn configure(&mut self, binder: &mut ConfigBinder<'_>) {
            binder
                .app_setting("CacheSize", &mut self.cache_size)
                .connection_string("main", &mut self.database_url);
        }

        async fn on_startup(&mut self, context: &Container) -> Result<(), ExtensionError> {
            context.register((self.cache_size, self.database_url.clone()));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_configuration_is_injected_at_registration() {
        let config = MemoryConfig::new();
        config.set("CacheSize", "512");
        config.set_connection_string(crate::config::ConnectionString::new(
            "main",
            "host=db.internal",
        ));

        let mut bootstrapper = Bootstrapper::with_config(config);
        bootstrapper.add_extension::<ConfiguredExtension>().unwrap();
        bootstrapper.startup().await.unwrap();

        let injected = bootstrapper.context().resolve::<(u32, String)>().unwrap();
        assert_eq!(injected.0, 512);
        assert_eq!(injected.1, "host=db.internal");
    }

    struct FailingExtension;

    #[async_trait]
    impl Extension for FailingExtension {
        async fn on_startup(&mut self, _: &Container) -> Result<(), ExtensionError> {
            Err(ExtensionError::message("boom"))
        }
    }

    #[tokio::test]
    async fn test_startup_failure_stops_the_sequence() {
        let events: EventLog = Arc::new(Mutex::new(Vec::new()));
        let (a, b) = recorders(&events);

        let mut bootstrapper = Bootstrapper::with_config(MemoryConfig::new());
        bootstrapper.add_extension_instance(a).unwrap();
        bootstrapper.add_extension_instance(FailingExtension).unwrap();
        bootstrapper.add_extension_instance(b).unwrap();

        let err = bootstrapper.startup().await.unwrap_err();
        match err {
            BootError::Extension {
                extension, phase, ..
            } => {
                assert_eq!(extension, "FailingExtension");
                assert_eq!(phase, Phase::OnStartup);
            }
            other => panic!("unexpected error: {other}"),
        }

        // All before_startup hooks ran (the phase completed), a's on_startup
        // ran, then the failure cut the sequence short.
        assert_eq!(
            *events.lock().unwrap(),
            vec!["a:before", "b:before", "a:on"]
        );
    }

    struct FailingShutdownExtension;

    #[async_trait]
    impl Extension for FailingShutdownExtension {
        async fn on_shutdown(&mut self, _: &Container) -> Result<(), ExtensionError> {
            Err(ExtensionError::message("still busy"))
        }
    }

    #[tokio::test]
    async fn test_shutdown_failure_propagates() {
        let events: EventLog = Arc::new(Mutex::new(Vec::new()));
        let (a, _) = recorders(&events);

        let mut bootstrapper = Bootstrapper::with_config(MemoryConfig::new());
        bootstrapper.add_extension_instance(a).unwrap();
        bootstrapper
            .add_extension_instance(FailingShutdownExtension)
            .unwrap();

        let err = bootstrapper.shutdown().await.unwrap_err();
        assert!(matches!(
            err,
            BootError::Extension {
                phase: Phase::OnShutdown,
                ..
            }
        ));

        // Reverse order: the failing extension shuts down first and the
        // earlier extension is never reached.
        assert!(events.lock().unwrap().is_empty());
    }

    struct ProducerExtension;

    #[async_trait]
    impl Extension for ProducerExtension {
        async fn on_startup(&mut self, context: &Container) -> Result<(), ExtensionError> {
            context.register(String::from("produced"));
            Ok(())
        }
    }

    struct ConsumerExtension;

    #[async_trait]
    impl Extension for ConsumerExtension {
        async fn after_startup(&mut self, context: &Container) -> Result<(), ExtensionError> {
            let value = context
                .resolve::<String>()
                .map_err(|e| ExtensionError::message(e.to_string()))?;
            context.register(value.len());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_extensions_share_the_container() {
        let mut bootstrapper = Bootstrapper::with_config(MemoryConfig::new());
        // The consumer registers first and still sees the producer's service:
        // after_startup runs only once every on_startup has completed.
        bootstrapper.add_extension_instance(ConsumerExtension).unwrap();
        bootstrapper.add_extension_instance(ProducerExtension).unwrap();

        bootstrapper.startup().await.unwrap();
        assert_eq!(
            *bootstrapper.context().resolve::<usize>().unwrap(),
            "produced".len()
        );
    }

    struct SlowExtension;

    #[async_trait]
    impl Extension for SlowExtension {
        async fn on_startup(&mut self, _: &Container) -> Result<(), ExtensionError> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_startup_timeout() {
        let mut bootstrapper = Bootstrapper::with_config(MemoryConfig::new())
            .startup_timeout(Duration::from_millis(20));
        bootstrapper.add_extension_instance(SlowExtension).unwrap();

        let err = bootstrapper.startup().await.unwrap_err();
        assert!(matches!(
            err,
            BootError::Timeout {
                sequence: "startup",
                ..
            }
        ));
    }
}

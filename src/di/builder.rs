use crate::di::Container;
use std::sync::Arc;

/// Builder for constructing a dependency injection container
///
/// Use this to configure and register services before handing the container
/// to a bootstrapper.
///
/// # Example
/// ```rust,ignore
/// let container = ContainerBuilder::new()
///     .register(PostgresDatabase::new())
///     .bind::<dyn Database, PostgresDatabase, _>(|db| db as Arc<dyn Database>)
///     .build();
/// ```
pub struct ContainerBuilder {
    container: Container,
}

impl ContainerBuilder {
    /// Create a new container builder
    pub fn new() -> Self {
        Self {
            container: Container::new(),
        }
    }

    /// Register a service instance
    pub fn register<T: 'static + Send + Sync>(self, instance: T) -> Self {
        self.container.register(instance);
        self
    }

    /// Register a named service instance
    pub fn register_named<T: 'static + Send + Sync>(
        self,
        name: impl Into<String>,
        instance: T,
    ) -> Self {
        self.container.register_named(name, instance);
        self
    }

    /// Bind a trait to a concrete implementation
    ///
    /// This enables resolving `Arc<dyn Trait>` to the registered implementation.
    /// The implementation must have been registered first (or will be).
    pub fn bind<Trait, Impl, F>(self, caster: F) -> Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        Impl: 'static + Send + Sync,
        F: Fn(Arc<Impl>) -> Arc<Trait> + 'static + Send + Sync,
    {
        self.container.bind::<Trait, Impl, F>(caster);
        self
    }

    /// Build the container
    pub fn build(self) -> Container {
        self.container
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

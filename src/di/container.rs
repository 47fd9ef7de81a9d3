use crate::error::{IgnitionError, Result};
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::sync::Arc;

/// Type alias for a function that can cast an `Arc<dyn Any>` to another `Arc<dyn Any>`.
/// The inner value is usually an `Arc<dyn Trait>`.
type CasterFn = Arc<dyn Fn(Arc<dyn Any + Send + Sync>) -> Arc<dyn Any + Send + Sync> + Send + Sync>;

/// Thread-safe dependency injection container.
///
/// Registration takes `&self`, so extensions holding a shared reference to the
/// container can register services during the startup sequence.
pub struct Container {
    services: DashMap<TypeId, ServiceEntry>,
    named: DashMap<(TypeId, String), ServiceEntry>,
    trait_mappings: DashMap<TypeId, TypeId>,
    casters: DashMap<TypeId, CasterFn>,
}

impl Clone for Container {
    fn clone(&self) -> Self {
        Self {
            services: self.services.clone(),
            named: self.named.clone(),
            trait_mappings: self.trait_mappings.clone(),
            casters: self.casters.clone(),
        }
    }
}

#[derive(Clone)]
struct ServiceEntry {
    instance: Arc<dyn Any + Send + Sync>,
}

impl Container {
    pub fn new() -> Self {
        Self {
            services: DashMap::new(),
            named: DashMap::new(),
            trait_mappings: DashMap::new(),
            casters: DashMap::new(),
        }
    }

    /// Register the default instance of `T`, replacing any previous one.
    pub fn register<T: 'static + Send + Sync>(&self, instance: T) -> &Self {
        let type_id = TypeId::of::<T>();
        let entry = ServiceEntry {
            instance: Arc::new(instance),
        };
        self.services.insert(type_id, entry);
        self
    }

    /// Register a named instance of `T`, replacing any previous one under the
    /// same name. Named instances are returned by [`Container::resolve_all`].
    pub fn register_named<T: 'static + Send + Sync>(
        &self,
        name: impl Into<String>,
        instance: T,
    ) -> &Self {
        let key = (TypeId::of::<T>(), name.into());
        let entry = ServiceEntry {
            instance: Arc::new(instance),
        };
        self.named.insert(key, entry);
        self
    }

    /// Map `dyn Trait` to a registered implementation type.
    ///
    /// This enables resolving `Arc<dyn Trait>` via [`Container::resolve_trait`].
    pub fn bind<Trait, Impl, F>(&self, caster_fn: F) -> &Self
    where
        Trait: ?Sized + 'static + Send + Sync,
        Impl: 'static + Send + Sync,
        F: Fn(Arc<Impl>) -> Arc<Trait> + 'static + Send + Sync,
    {
        let trait_id = TypeId::of::<Trait>();
        let impl_id = TypeId::of::<Impl>();

        self.trait_mappings.insert(trait_id, impl_id);

        let caster: CasterFn = Arc::new(move |instance: Arc<dyn Any + Send + Sync>| {
            let concrete = instance
                .downcast::<Impl>()
                .expect("Failed to downcast to implementation type. This is a bug in Ignition.");
            let trait_obj: Arc<Trait> = caster_fn(concrete);
            Arc::new(trait_obj) // Wrap the Arc<dyn Trait> in an Arc<dyn Any>
        });

        self.casters.insert(trait_id, caster);
        self
    }

    pub fn resolve<T: 'static + Send + Sync>(&self) -> Result<Arc<T>> {
        let requested_type_id = TypeId::of::<T>();
        let entry = self.services.get(&requested_type_id).ok_or_else(|| {
            IgnitionError::DependencyNotFound {
                type_name: std::any::type_name::<T>().to_string(),
            }
        })?;
        entry
            .instance
            .clone()
            .downcast::<T>()
            .map_err(|_| IgnitionError::DowncastFailed {
                type_name: std::any::type_name::<T>().to_string(),
            })
    }

    pub fn resolve_named<T: 'static + Send + Sync>(&self, name: &str) -> Result<Arc<T>> {
        let key = (TypeId::of::<T>(), name.to_string());
        let entry =
            self.named
                .get(&key)
                .ok_or_else(|| IgnitionError::DependencyNotFound {
                    type_name: format!("{} (named '{}')", std::any::type_name::<T>(), name),
                })?;
        entry
            .instance
            .clone()
            .downcast::<T>()
            .map_err(|_| IgnitionError::DowncastFailed {
                type_name: std::any::type_name::<T>().to_string(),
            })
    }

    pub fn resolve_trait<T: ?Sized + 'static + Send + Sync>(&self) -> Result<Arc<T>> {
        let requested_type_id = TypeId::of::<T>();

        let caster = self.casters.get(&requested_type_id).ok_or_else(|| {
            IgnitionError::DependencyNotFound {
                type_name: std::any::type_name::<T>().to_string(),
            }
        })?;

        let impl_type_id = self.trait_mappings.get(&requested_type_id).ok_or_else(|| {
            IgnitionError::DependencyNotFound {
                type_name: format!(
                    "No implementation mapping found for trait '{}'",
                    std::any::type_name::<T>()
                ),
            }
        })?;

        let entry =
            self.services
                .get(&impl_type_id)
                .ok_or_else(|| IgnitionError::DependencyNotFound {
                    type_name: format!(
                        "Implementation for trait '{}' not registered",
                        std::any::type_name::<T>()
                    ),
                })?;

        let cast_result = (caster.value())(entry.instance.clone());

        // The caster returns an Arc<dyn Any> which holds an Arc<T>.
        // We need to downcast to Arc<T>, which is Sized.
        let wrapper =
            cast_result
                .downcast::<Arc<T>>()
                .map_err(|_| IgnitionError::DowncastFailed {
                    type_name: format!(
                        "Failed to downcast to Arc<Arc<{}>>. This is an internal Ignition bug.",
                        std::any::type_name::<T>()
                    ),
                })?;
        // The result of downcast is Arc<Arc<T>>, so we clone the inner Arc.
        Ok(wrapper.as_ref().clone())
    }

    /// Return the default instance of `T` (if any) followed by every named
    /// instance of `T`. Order among named instances is unspecified.
    pub fn resolve_all<T: 'static + Send + Sync>(&self) -> Vec<Arc<T>> {
        let type_id = TypeId::of::<T>();
        let mut instances: Vec<Arc<T>> = Vec::new();

        if let Ok(default) = self.resolve::<T>() {
            instances.push(default);
        }
        for entry in self.named.iter() {
            if entry.key().0 == type_id {
                if let Ok(instance) = entry.value().instance.clone().downcast::<T>() {
                    instances.push(instance);
                }
            }
        }
        instances
    }

    pub fn contains<T: 'static>(&self) -> bool {
        let type_id = TypeId::of::<T>();
        self.services.contains_key(&type_id) || self.trait_mappings.contains_key(&type_id)
    }

    pub fn len(&self) -> usize {
        self.services.len() + self.named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty() && self.named.is_empty()
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct TestService {
        value: i32,
    }

    trait MyTrait: Send + Sync {
        fn get_value(&self) -> i32;
    }

    struct MyTraitImpl {
        value: i32,
    }

    impl MyTrait for MyTraitImpl {
        fn get_value(&self) -> i32 {
            self.value
        }
    }

    #[test]
    fn test_register_and_resolve() {
        let container = Container::new();
        container.register(TestService { value: 42 });
        let service = container.resolve::<TestService>().unwrap();
        assert_eq!(service.value, 42);
    }

    #[test]
    fn test_resolve_missing_dependency() {
        let container = Container::new();
        let err = container.resolve::<TestService>().unwrap_err();
        assert!(matches!(err, IgnitionError::DependencyNotFound { .. }));
    }

    #[test]
    fn test_register_replaces_previous_instance() {
        let container = Container::new();
        container.register(TestService { value: 1 });
        container.register(TestService { value: 2 });
        assert_eq!(container.resolve::<TestService>().unwrap().value, 2);
    }

    #[test]
    fn test_register_and_resolve_trait() {
        let container = Container::new();
        container.register(MyTraitImpl { value: 99 });
        container.bind::<dyn MyTrait, MyTraitImpl, _>(|i| i as Arc<dyn MyTrait>);
        let trait_instance = container.resolve_trait::<dyn MyTrait>().unwrap();
        assert_eq!(trait_instance.get_value(), 99);
    }

    #[test]
    fn test_named_registrations_and_resolve_all() {
        let container = Container::new();
        container.register(TestService { value: 1 });
        container.register_named("reporting", TestService { value: 2 });
        container.register_named("billing", TestService { value: 3 });

        assert_eq!(
            container
                .resolve_named::<TestService>("reporting")
                .unwrap()
                .value,
            2
        );

        let mut values: Vec<i32> = container
            .resolve_all::<TestService>()
            .into_iter()
            .map(|s| s.value)
            .collect();
        values.sort_unstable();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn test_named_registration_replaced_by_name() {
        let container = Container::new();
        container.register_named("main", TestService { value: 1 });
        container.register_named("main", TestService { value: 7 });
        assert_eq!(
            container.resolve_named::<TestService>("main").unwrap().value,
            7
        );
        assert_eq!(container.resolve_all::<TestService>().len(), 1);
    }
}

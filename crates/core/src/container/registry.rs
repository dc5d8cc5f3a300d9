use std::collections::HashMap;
use std::fmt;

use tracing::trace;

use crate::container::binding::Binding;
use crate::container::facade::Facade;
use crate::container::key::{BindingKey, Tag};
use crate::errors::CoreError;

/// Immutable mapping from lookup keys to bindings.
///
/// Built once by a [`RegistryBuilder`] at composition time and read-only
/// afterwards, so it can be shared across concurrent resolution chains
/// without synchronization. Lookup is an exact hash-map match on
/// (argument type, result type, tag); no supertype or fuzzy matching is
/// performed, keeping resolution deterministic and O(1).
pub struct BindingRegistry {
    bindings: HashMap<BindingKey, Binding>,
}

impl BindingRegistry {
    /// Look up the binding registered under a key, if any
    pub fn lookup(&self, key: &BindingKey) -> Option<&Binding> {
        let binding = self.bindings.get(key);
        trace!(key = %key, hit = binding.is_some(), "registry lookup");
        binding
    }

    /// Check if a key is registered
    pub fn contains(&self, key: &BindingKey) -> bool {
        self.bindings.contains_key(key)
    }

    /// Number of registered bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterate over all registered keys
    pub fn keys(&self) -> impl Iterator<Item = &BindingKey> {
        self.bindings.keys()
    }
}

impl fmt::Debug for BindingRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingRegistry")
            .field("binding_count", &self.bindings.len())
            .finish_non_exhaustive()
    }
}

/// Fluent builder populating a [`BindingRegistry`].
///
/// Binding the same key twice replaces the earlier binding (last wins).
/// Once `build` is called the registry is frozen; there is no way to add
/// or remove bindings afterwards.
pub struct RegistryBuilder {
    bindings: HashMap<BindingKey, Binding>,
}

impl RegistryBuilder {
    /// Create a builder with no bindings
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Bind a factory producing `T` from an argument of type `A`
    pub fn bind_factory<A, T, F>(mut self, tag: impl Into<Option<Tag>>, body: F) -> Self
    where
        A: 'static,
        T: Send + Sync + 'static,
        F: Fn(&Facade, A) -> Result<T, CoreError> + Send + Sync + 'static,
    {
        let key = BindingKey::factory::<A, T>(tag.into());
        self.bindings.insert(key, Binding::factory(body));
        self
    }

    /// Bind an argument-less provider producing `T`
    pub fn bind_provider<T, F>(mut self, tag: impl Into<Option<Tag>>, body: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Facade) -> Result<T, CoreError> + Send + Sync + 'static,
    {
        let key = BindingKey::provider::<T>(tag.into());
        self.bindings.insert(key, Binding::provider(body));
        self
    }

    /// Bind an already-materialized value of type `T`
    pub fn bind_instance<T>(mut self, tag: impl Into<Option<Tag>>, value: T) -> Self
    where
        T: Send + Sync + 'static,
    {
        let key = BindingKey::provider::<T>(tag.into());
        self.bindings.insert(key, Binding::instance(value));
        self
    }

    /// Freeze the bindings into an immutable registry
    pub fn build(self) -> BindingRegistry {
        BindingRegistry {
            bindings: self.bindings,
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

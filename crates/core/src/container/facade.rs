use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::container::binding::BoxedValue;
use crate::container::container::ResolutionContainer;
use crate::container::context::{ContextParam, ReceiverParam, ResolutionContext};
use crate::container::key::{BindingKey, Tag};
use crate::container::token::TypeToken;
use crate::errors::CoreError;

/// Typed retrieval surface over a [`ResolutionContainer`].
///
/// A facade is a lightweight view pairing a container with the ambient
/// [`ResolutionContext`] for one resolution chain. Retrieval comes in three
/// shapes (factory, provider, instance), each with an `_or_none` sibling
/// that turns a missing binding into an absent result instead of an error.
/// All of them funnel into the container's single lookup + invocation path.
///
/// [`on`](Facade::on) derives a new facade with the context and/or receiver
/// overridden; facades share nothing mutable, so deriving one is cheap and
/// never affects the facade it came from.
#[derive(Clone)]
pub struct Facade {
    container: Arc<ResolutionContainer>,
    context: ResolutionContext,
}

impl Facade {
    /// Create a facade with an empty ambient context
    pub fn new(container: Arc<ResolutionContainer>) -> Self {
        Self {
            container,
            context: ResolutionContext::new(),
        }
    }

    /// Create a facade with an explicit ambient context
    pub fn with_context(container: Arc<ResolutionContainer>, context: ResolutionContext) -> Self {
        Self { container, context }
    }

    /// The underlying container
    pub fn container(&self) -> &Arc<ResolutionContainer> {
        &self.container
    }

    /// The ambient context of this facade
    pub fn context(&self) -> &ResolutionContext {
        &self.context
    }

    /// Derive a facade bound to the same container with the context and/or
    /// receiver overridden. `Same` propagates the caller's value unchanged.
    pub fn on(&self, context: ContextParam, receiver: ReceiverParam) -> Facade {
        Facade {
            container: Arc::clone(&self.container),
            context: self.context.rescope(context, receiver),
        }
    }

    /// The ambient context object, downcast to `C`
    pub fn context_as<C: Send + Sync + 'static>(&self) -> Option<Arc<C>> {
        self.context.context_as::<C>()
    }

    /// The ambient receiver object, if any
    pub fn receiver(&self) -> Option<&BoxedValue> {
        self.context.receiver()
    }

    /// The ambient receiver object, downcast to `R`
    pub fn receiver_as<R: Send + Sync + 'static>(&self) -> Option<Arc<R>> {
        self.context.receiver_as::<R>()
    }

    /// The type token of the ambient context object, if any
    pub fn context_token(&self) -> Option<TypeToken> {
        self.context.context_token()
    }

    /// Get a factory of `T` taking an argument of type `A`.
    ///
    /// Fails with [`CoreError::BindingNotFound`] if no binding matches; the
    /// returned callable can still fail later with a dependency loop.
    pub fn factory<A, T>(
        &self,
        tag: impl Into<Option<Tag>>,
    ) -> Result<impl Fn(A) -> Result<Arc<T>, CoreError>, CoreError>
    where
        A: 'static,
        T: Send + Sync + 'static,
    {
        let tag = tag.into();
        self.factory_or_none::<A, T>(tag.clone())
            .ok_or_else(|| CoreError::binding_not_found(BindingKey::factory::<A, T>(tag)))
    }

    /// Get a factory of `T` taking an argument of type `A`, or `None` if no
    /// binding matches
    pub fn factory_or_none<A, T>(
        &self,
        tag: impl Into<Option<Tag>>,
    ) -> Option<impl Fn(A) -> Result<Arc<T>, CoreError>>
    where
        A: 'static,
        T: Send + Sync + 'static,
    {
        let key = BindingKey::factory::<A, T>(tag.into());
        self.container.lookup(&key)?;
        let facade = self.clone();
        Some(move |arg: A| facade.invoke_typed::<T>(&key, Some(Box::new(arg))))
    }

    /// Get a provider of `T`.
    ///
    /// Fails with [`CoreError::BindingNotFound`] if no binding matches; the
    /// returned callable can still fail later with a dependency loop.
    pub fn provider<T>(
        &self,
        tag: impl Into<Option<Tag>>,
    ) -> Result<impl Fn() -> Result<Arc<T>, CoreError>, CoreError>
    where
        T: Send + Sync + 'static,
    {
        let tag = tag.into();
        self.provider_or_none::<T>(tag.clone())
            .ok_or_else(|| CoreError::binding_not_found(BindingKey::provider::<T>(tag)))
    }

    /// Get a provider of `T`, or `None` if no binding matches
    pub fn provider_or_none<T>(
        &self,
        tag: impl Into<Option<Tag>>,
    ) -> Option<impl Fn() -> Result<Arc<T>, CoreError>>
    where
        T: Send + Sync + 'static,
    {
        let key = BindingKey::provider::<T>(tag.into());
        self.container.lookup(&key)?;
        let facade = self.clone();
        Some(move || facade.invoke_typed::<T>(&key, None))
    }

    /// Get a provider of `T` backed by the factory binding for `(A, T, tag)`,
    /// with the argument drawn from `supplier` at each call
    pub fn provider_with<A, T, F>(
        &self,
        tag: impl Into<Option<Tag>>,
        supplier: F,
    ) -> Result<impl Fn() -> Result<Arc<T>, CoreError>, CoreError>
    where
        A: 'static,
        T: Send + Sync + 'static,
        F: Fn() -> A + Send + Sync + 'static,
    {
        let tag = tag.into();
        self.provider_with_or_none::<A, T, F>(tag.clone(), supplier)
            .ok_or_else(|| CoreError::binding_not_found(BindingKey::factory::<A, T>(tag)))
    }

    /// Argument-bound sibling of [`provider_or_none`](Facade::provider_or_none)
    pub fn provider_with_or_none<A, T, F>(
        &self,
        tag: impl Into<Option<Tag>>,
        supplier: F,
    ) -> Option<impl Fn() -> Result<Arc<T>, CoreError>>
    where
        A: 'static,
        T: Send + Sync + 'static,
        F: Fn() -> A + Send + Sync + 'static,
    {
        let key = BindingKey::factory::<A, T>(tag.into());
        self.container.lookup(&key)?;
        let facade = self.clone();
        Some(move || facade.invoke_typed::<T>(&key, Some(Box::new(supplier()))))
    }

    /// Get an instance of `T`, invoking the bound recipe now.
    ///
    /// Fails with [`CoreError::BindingNotFound`] if no binding matches.
    pub fn instance<T>(&self, tag: impl Into<Option<Tag>>) -> Result<Arc<T>, CoreError>
    where
        T: Send + Sync + 'static,
    {
        let tag = tag.into();
        match self.instance_or_none::<T>(tag.clone())? {
            Some(value) => Ok(value),
            None => Err(CoreError::binding_not_found(BindingKey::provider::<T>(tag))),
        }
    }

    /// Get an instance of `T`, or `None` if no binding matches.
    ///
    /// A dependency loop during construction still surfaces as an error.
    pub fn instance_or_none<T>(
        &self,
        tag: impl Into<Option<Tag>>,
    ) -> Result<Option<Arc<T>>, CoreError>
    where
        T: Send + Sync + 'static,
    {
        let key = BindingKey::provider::<T>(tag.into());
        if self.container.lookup(&key).is_none() {
            return Ok(None);
        }
        self.invoke_typed::<T>(&key, None).map(Some)
    }

    /// Get an instance of `T` from the factory binding for `(A, T, tag)`,
    /// invoked now with an eager argument value
    pub fn instance_with<A, T>(
        &self,
        tag: impl Into<Option<Tag>>,
        arg: A,
    ) -> Result<Arc<T>, CoreError>
    where
        A: 'static,
        T: Send + Sync + 'static,
    {
        let tag = tag.into();
        match self.instance_with_or_none::<A, T>(tag.clone(), arg)? {
            Some(value) => Ok(value),
            None => Err(CoreError::binding_not_found(BindingKey::factory::<A, T>(tag))),
        }
    }

    /// Argument-bound sibling of [`instance_or_none`](Facade::instance_or_none)
    pub fn instance_with_or_none<A, T>(
        &self,
        tag: impl Into<Option<Tag>>,
        arg: A,
    ) -> Result<Option<Arc<T>>, CoreError>
    where
        A: 'static,
        T: Send + Sync + 'static,
    {
        let key = BindingKey::factory::<A, T>(tag.into());
        if self.container.lookup(&key).is_none() {
            return Ok(None);
        }
        self.invoke_typed::<T>(&key, Some(Box::new(arg))).map(Some)
    }

    /// Invoke a binding through the container and downcast the result.
    ///
    /// Typed registry constructors guarantee the erased value matches the
    /// key's result token, so a downcast failure indicates a hand-assembled
    /// registry entry and is reported as an invalid binding.
    fn invoke_typed<T: Send + Sync + 'static>(
        &self,
        key: &BindingKey,
        arg: Option<Box<dyn Any>>,
    ) -> Result<Arc<T>, CoreError> {
        let value = self.container.invoke(key, self, arg)?;
        value.downcast::<T>().map_err(|_| {
            CoreError::invalid_binding(format!(
                "binding for {} produced a value of an unexpected type",
                key
            ))
        })
    }
}

impl fmt::Debug for Facade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Facade")
            .field("container", &self.container)
            .field("context", &self.context)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::registry::RegistryBuilder;

    fn facade_for(registry: crate::container::registry::BindingRegistry) -> Facade {
        Facade::new(Arc::new(ResolutionContainer::new(registry)))
    }

    #[test]
    fn test_instance_round_trip() {
        let facade = facade_for(
            RegistryBuilder::new()
                .bind_instance(None, "configured".to_string())
                .build(),
        );

        assert_eq!(*facade.instance::<String>(None).unwrap(), "configured");
        assert_eq!(
            *facade.instance_or_none::<String>(None).unwrap().unwrap(),
            "configured"
        );
    }

    #[test]
    fn test_miss_semantics() {
        let facade = facade_for(RegistryBuilder::new().build());

        assert!(facade.instance::<String>(None).unwrap_err().is_not_found());
        assert!(facade.provider::<String>(None).err().unwrap().is_not_found());
        assert!(facade
            .factory::<u32, String>(None)
            .err()
            .unwrap()
            .is_not_found());
        assert!(facade
            .instance_with::<u32, String>(None, 1)
            .unwrap_err()
            .is_not_found());

        assert!(facade.instance_or_none::<String>(None).unwrap().is_none());
        assert!(facade.provider_or_none::<String>(None).is_none());
        assert!(facade.factory_or_none::<u32, String>(None).is_none());
        assert!(facade
            .provider_with_or_none::<u32, String, _>(None, || 1)
            .is_none());
        assert!(facade
            .instance_with_or_none::<u32, String>(None, 1)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_not_found_error_names_the_key() {
        let facade = facade_for(RegistryBuilder::new().build());
        let err = facade
            .instance::<String>(Tag::str("primary"))
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("String"));
        assert!(message.contains("primary"));
    }

    #[test]
    fn test_tag_disambiguation() {
        let facade = facade_for(
            RegistryBuilder::new()
                .bind_instance(Tag::str("primary"), "postgres://main".to_string())
                .bind_instance(Tag::str("replica"), "postgres://replica".to_string())
                .build(),
        );

        assert_eq!(
            *facade.instance::<String>(Tag::str("primary")).unwrap(),
            "postgres://main"
        );
        assert_eq!(
            *facade.instance::<String>(Tag::str("replica")).unwrap(),
            "postgres://replica"
        );
        // Untagged request never falls back to a tagged binding.
        assert!(facade.instance::<String>(None).unwrap_err().is_not_found());
    }

    #[test]
    fn test_factory_invocation() {
        let facade = facade_for(
            RegistryBuilder::new()
                .bind_factory(None, |_: &Facade, n: u32| Ok(format!("user-{}", n)))
                .build(),
        );

        let make_user = facade.factory::<u32, String>(None).unwrap();
        assert_eq!(*make_user(1).unwrap(), "user-1");
        assert_eq!(*make_user(42).unwrap(), "user-42");

        assert_eq!(
            *facade.instance_with::<u32, String>(None, 7).unwrap(),
            "user-7"
        );
    }

    #[test]
    fn test_provider_with_supplier() {
        let facade = facade_for(
            RegistryBuilder::new()
                .bind_factory(None, |_: &Facade, n: u32| Ok(n * 2))
                .build(),
        );

        let doubled = facade.provider_with::<u32, u32, _>(None, || 21).unwrap();
        assert_eq!(*doubled().unwrap(), 42);
    }

    #[test]
    fn test_provider_result_is_not_cached() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let facade = facade_for(
            RegistryBuilder::new()
                .bind_provider(None, |_: &Facade| Ok(CALLS.fetch_add(1, Ordering::SeqCst)))
                .build(),
        );

        let counter = facade.provider::<usize>(None).unwrap();
        let first = *counter().unwrap();
        let second = *counter().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_on_rescopes_without_touching_original() {
        #[derive(Debug)]
        struct Screen {
            name: &'static str,
        }

        let facade = facade_for(RegistryBuilder::new().build());
        let scoped = facade.on(
            ContextParam::of(Screen { name: "settings" }),
            ReceiverParam::Same,
        );

        assert_eq!(scoped.context_as::<Screen>().unwrap().name, "settings");
        assert!(facade.context_as::<Screen>().is_none());
    }

    #[test]
    fn test_receiver_accessors() {
        let facade = facade_for(RegistryBuilder::new().build());
        assert!(facade.receiver().is_none());

        let scoped = facade.on(ContextParam::Same, ReceiverParam::of(42u32));
        assert!(scoped.receiver().is_some());
        assert_eq!(*scoped.receiver_as::<u32>().unwrap(), 42);
        assert!(facade.receiver().is_none());
    }
}

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::container::facade::Facade;
use crate::errors::CoreError;

/// Type-erased value produced by a binding
pub type BoxedValue = Arc<dyn Any + Send + Sync>;

/// Erased factory body: takes the resolving facade and a boxed argument
pub type FactoryFn =
    Box<dyn Fn(&Facade, Box<dyn Any>) -> Result<BoxedValue, CoreError> + Send + Sync>;

/// Erased provider body: takes only the resolving facade
pub type ProviderFn = Box<dyn Fn(&Facade) -> Result<BoxedValue, CoreError> + Send + Sync>;

/// A registered construction recipe.
///
/// The resolution algorithm handles exactly these three shapes, so this is a
/// closed sum type rather than a trait hierarchy. Bodies receive the facade
/// that carries the caller's ambient context and receiver, letting them
/// resolve nested dependencies against the same chain.
///
/// The container never caches what a `Factory` or `Provider` body returns;
/// each invocation calls the body exactly once, and any reuse of previous
/// results is the body's own concern (a scope collaborator's job).
pub enum Binding {
    /// Requires an argument, invoked fresh each call
    Factory(FactoryFn),
    /// Argument-less construction
    Provider(ProviderFn),
    /// Precomputed value, argument ignored
    Instance(BoxedValue),
}

impl Binding {
    /// Create a factory binding for bodies of `(facade, A) -> T`.
    ///
    /// The erased wrapper downcasts the boxed argument back to `A`; a
    /// mismatch can only arise from registry misuse and is reported as an
    /// invalid binding.
    pub fn factory<A, T, F>(body: F) -> Self
    where
        A: 'static,
        T: Send + Sync + 'static,
        F: Fn(&Facade, A) -> Result<T, CoreError> + Send + Sync + 'static,
    {
        Binding::Factory(Box::new(move |facade, arg| {
            let arg = arg.downcast::<A>().map_err(|_| {
                CoreError::invalid_binding(format!(
                    "factory expected an argument of type {}",
                    std::any::type_name::<A>()
                ))
            })?;
            let value = body(facade, *arg)?;
            Ok(Arc::new(value) as BoxedValue)
        }))
    }

    /// Create a provider binding for bodies of `(facade) -> T`
    pub fn provider<T, F>(body: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&Facade) -> Result<T, CoreError> + Send + Sync + 'static,
    {
        Binding::Provider(Box::new(move |facade| {
            let value = body(facade)?;
            Ok(Arc::new(value) as BoxedValue)
        }))
    }

    /// Create an instance binding holding an already-materialized value
    pub fn instance<T: Send + Sync + 'static>(value: T) -> Self {
        Binding::Instance(Arc::new(value))
    }

    /// The binding shape as a string, for logging and Debug output
    pub fn kind(&self) -> &'static str {
        match self {
            Binding::Factory(_) => "factory",
            Binding::Provider(_) => "provider",
            Binding::Instance(_) => "instance",
        }
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Factory(_) => f.debug_tuple("Factory").field(&"<factory_fn>").finish(),
            Binding::Provider(_) => f.debug_tuple("Provider").field(&"<provider_fn>").finish(),
            Binding::Instance(_) => f.debug_tuple("Instance").field(&"<value>").finish(),
        }
    }
}

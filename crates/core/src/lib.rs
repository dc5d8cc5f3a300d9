//! Typed dependency-injection resolution engine.
//!
//! `trellis-core` maps requests for "a value of type `T`, optionally built
//! from an argument of type `A`, optionally disambiguated by a tag" to bound
//! factories, providers, or precomputed instances, resolving them on demand
//! and rejecting circular construction.
//!
//! Bindings are registered once through a [`RegistryBuilder`]; the frozen
//! [`BindingRegistry`] feeds a [`ResolutionContainer`], and the typed
//! [`Facade`] is the surface callers retrieve through:
//!
//! ```rust
//! use std::sync::Arc;
//! use trellis_core::container::{Facade, RegistryBuilder, ResolutionContainer};
//!
//! let registry = RegistryBuilder::new()
//!     .bind_instance(None, "postgres://localhost".to_string())
//!     .bind_factory(None, |_: &Facade, n: u32| Ok(format!("user-{}", n)))
//!     .build();
//!
//! let facade = Facade::new(Arc::new(ResolutionContainer::new(registry)));
//!
//! let url = facade.instance::<String>(None).unwrap();
//! assert_eq!(*url, "postgres://localhost");
//!
//! let make_user = facade.factory::<u32, String>(None).unwrap();
//! assert_eq!(*make_user(7).unwrap(), "user-7");
//! ```

pub mod container;
pub mod errors;

// Re-export key types for convenience
pub use container::{
    Binding, BindingKey, BindingRegistry, BoxedValue, ContextParam, Facade, ReceiverParam,
    RegistryBuilder, ResolutionContainer, ResolutionContext, Tag, TypeToken,
};
pub use errors::CoreError;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine information
pub const ENGINE_NAME: &str = "trellis";

/// Get engine version
pub fn version() -> &'static str {
    VERSION
}

/// Get engine name
pub fn name() -> &'static str {
    ENGINE_NAME
}

#[allow(clippy::module_inception)]
pub mod container;
pub mod binding;
pub mod context;
pub mod facade;
pub mod key;
pub mod registry;
pub mod token;

pub use binding::{Binding, BoxedValue, FactoryFn, ProviderFn};
pub use container::ResolutionContainer;
pub use context::{ContextParam, ReceiverParam, ResolutionContext};
pub use facade::Facade;
pub use key::{BindingKey, Tag};
pub use registry::{BindingRegistry, RegistryBuilder};
pub use token::TypeToken;

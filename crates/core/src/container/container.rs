use std::any::Any;
use std::cell::RefCell;
use std::fmt;

use tracing::{debug, trace};

use crate::container::binding::{Binding, BoxedValue};
use crate::container::facade::Facade;
use crate::container::key::BindingKey;
use crate::container::registry::BindingRegistry;
use crate::errors::CoreError;

thread_local! {
    // Keys currently under construction on this thread, outermost first.
    // Resolution is synchronous, so one chain never migrates threads and
    // concurrent chains on other threads each see their own stack.
    static RESOLUTION_STACK: RefCell<Vec<BindingKey>> = const { RefCell::new(Vec::new()) };
}

/// Pops the frame it guards when dropped, on success, error, and unwind alike.
struct StackFrame;

impl StackFrame {
    /// Push `key` onto the calling thread's resolution stack, failing with
    /// the full ordered chain if the key is already under construction.
    fn push(key: &BindingKey) -> Result<Self, CoreError> {
        RESOLUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            if stack.contains(key) {
                let mut chain: Vec<String> = stack.iter().map(ToString::to_string).collect();
                chain.push(key.to_string());
                debug!(key = %key, chain = chain.join(" -> "), "dependency loop detected");
                return Err(CoreError::dependency_loop(chain));
            }
            stack.push(key.clone());
            Ok(StackFrame)
        })
    }
}

impl Drop for StackFrame {
    fn drop(&mut self) {
        RESOLUTION_STACK.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// The resolution engine: owns the frozen registry and drives binding
/// invocation with per-chain cycle detection.
///
/// The container is a passive synchronous library. It never caches binding
/// results, performs no scheduling, and holds no mutable state, so a single
/// container can serve arbitrarily many caller threads at once.
pub struct ResolutionContainer {
    registry: BindingRegistry,
}

impl ResolutionContainer {
    /// Create a container over a frozen registry
    pub fn new(registry: BindingRegistry) -> Self {
        Self { registry }
    }

    /// The underlying registry
    pub fn registry(&self) -> &BindingRegistry {
        &self.registry
    }

    /// Look up the binding for a key without invoking it
    pub fn lookup(&self, key: &BindingKey) -> Option<&Binding> {
        self.registry.lookup(key)
    }

    /// Invoke the binding registered under `key`, producing a value.
    ///
    /// This is the single invocation path behind every retrieval entry
    /// point. Factory and provider bindings push the key onto the calling
    /// thread's resolution stack for the duration of their body; re-entering
    /// a key already on the stack fails with a dependency loop carrying the
    /// chain from the outermost request to the repeated key. Instance
    /// bindings return their value directly: nothing is constructed, so no
    /// frame is pushed and the argument is ignored.
    pub(crate) fn invoke(
        &self,
        key: &BindingKey,
        facade: &Facade,
        arg: Option<Box<dyn Any>>,
    ) -> Result<BoxedValue, CoreError> {
        let binding = self
            .lookup(key)
            .ok_or_else(|| CoreError::binding_not_found(key))?;
        trace!(key = %key, kind = binding.kind(), "invoking binding");

        match binding {
            Binding::Instance(value) => Ok(value.clone()),
            Binding::Provider(body) => {
                let _frame = StackFrame::push(key)?;
                body(facade)
            }
            Binding::Factory(body) => {
                let _frame = StackFrame::push(key)?;
                let arg = arg.unwrap_or_else(|| Box::new(()));
                body(facade, arg)
            }
        }
    }
}

impl fmt::Debug for ResolutionContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionContainer")
            .field("registry", &self.registry)
            .finish()
    }
}

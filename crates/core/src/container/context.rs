use std::fmt;
use std::sync::Arc;

use crate::container::binding::BoxedValue;
use crate::container::token::TypeToken;

/// Ambient state carried down one resolution chain.
///
/// The *context* describes on behalf of what a resolution occurs (a session,
/// a screen, a module instance); the *receiver* describes who is asking.
/// Both are propagated unchanged into nested resolutions unless a facade is
/// re-scoped via `on`. The context value travels with its type token so
/// bindings can ask for it in a typed manner.
#[derive(Clone, Default)]
pub struct ResolutionContext {
    context: Option<(TypeToken, BoxedValue)>,
    receiver: Option<BoxedValue>,
}

impl ResolutionContext {
    /// The empty context: no context object, no receiver
    pub fn new() -> Self {
        Self::default()
    }

    /// The type token of the current context object, if any
    pub fn context_token(&self) -> Option<TypeToken> {
        self.context.as_ref().map(|(token, _)| *token)
    }

    /// The current context object, downcast to `C`.
    ///
    /// Returns `None` when no context is set or when `C` does not match the
    /// token it was set with.
    pub fn context_as<C: Send + Sync + 'static>(&self) -> Option<Arc<C>> {
        let (_, value) = self.context.as_ref()?;
        value.clone().downcast::<C>().ok()
    }

    /// The current receiver object, if any
    pub fn receiver(&self) -> Option<&BoxedValue> {
        self.receiver.as_ref()
    }

    /// The current receiver object, downcast to `R`
    pub fn receiver_as<R: Send + Sync + 'static>(&self) -> Option<Arc<R>> {
        self.receiver.as_ref()?.clone().downcast::<R>().ok()
    }

    /// Derive a context with the given overrides applied; `Same` propagates
    /// the corresponding part unchanged.
    pub(crate) fn rescope(&self, context: ContextParam, receiver: ReceiverParam) -> Self {
        Self {
            context: match context {
                ContextParam::Same => self.context.clone(),
                ContextParam::Of(token, value) => Some((token, value)),
            },
            receiver: match receiver {
                ReceiverParam::Same => self.receiver.clone(),
                ReceiverParam::Of(value) => Some(value),
                ReceiverParam::Clear => None,
            },
        }
    }
}

impl fmt::Debug for ResolutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolutionContext")
            .field(
                "context",
                &self.context.as_ref().map(|(token, _)| token.type_name()),
            )
            .field("receiver", &self.receiver.as_ref().map(|_| "<receiver>"))
            .finish()
    }
}

/// Context override for `on`: propagate the caller's context or replace it
pub enum ContextParam {
    Same,
    Of(TypeToken, BoxedValue),
}

impl ContextParam {
    /// Replace the ambient context with a typed value
    pub fn of<C: Send + Sync + 'static>(value: C) -> Self {
        ContextParam::Of(TypeToken::of::<C>(), Arc::new(value))
    }
}

/// Receiver override for `on`: propagate, replace, or clear the receiver
pub enum ReceiverParam {
    Same,
    Of(BoxedValue),
    Clear,
}

impl ReceiverParam {
    /// Replace the ambient receiver with a typed value
    pub fn of<R: Send + Sync + 'static>(value: R) -> Self {
        ReceiverParam::Of(Arc::new(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct Session {
        id: u32,
    }

    #[test]
    fn test_empty_context() {
        let ctx = ResolutionContext::new();
        assert!(ctx.context_token().is_none());
        assert!(ctx.context_as::<Session>().is_none());
        assert!(ctx.receiver().is_none());
    }

    #[test]
    fn test_rescope_overrides_context_only() {
        let base = ResolutionContext::new()
            .rescope(ContextParam::of(Session { id: 1 }), ReceiverParam::of("r1"));

        let derived = base.rescope(ContextParam::of(Session { id: 2 }), ReceiverParam::Same);
        assert_eq!(derived.context_as::<Session>().unwrap().id, 2);
        assert_eq!(*derived.receiver_as::<&str>().unwrap(), "r1");

        // The base context is untouched.
        assert_eq!(base.context_as::<Session>().unwrap().id, 1);
    }

    #[test]
    fn test_rescope_overrides_receiver_only() {
        let base = ResolutionContext::new()
            .rescope(ContextParam::of(Session { id: 1 }), ReceiverParam::Same);

        let derived = base.rescope(ContextParam::Same, ReceiverParam::of("r2"));
        assert_eq!(derived.context_as::<Session>().unwrap().id, 1);
        assert_eq!(*derived.receiver_as::<&str>().unwrap(), "r2");

        let cleared = derived.rescope(ContextParam::Same, ReceiverParam::Clear);
        assert!(cleared.receiver().is_none());
        assert_eq!(cleared.context_as::<Session>().unwrap().id, 1);
    }

    #[test]
    fn test_context_downcast_requires_matching_type() {
        let ctx = ResolutionContext::new()
            .rescope(ContextParam::of(Session { id: 7 }), ReceiverParam::Same);
        assert!(ctx.context_as::<String>().is_none());
        assert_eq!(
            ctx.context_token().unwrap(),
            TypeToken::of::<Session>()
        );
    }
}

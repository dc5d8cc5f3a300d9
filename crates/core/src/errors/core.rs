use thiserror::Error;

/// Core error type for the trellis resolution engine.
///
/// Resolution itself surfaces exactly two failure kinds: [`BindingNotFound`]
/// from the non-`or_none` retrieval entry points, and [`DependencyLoop`] when
/// invoking a binding would re-enter a key already under construction in the
/// same resolution chain. Construction code supplied by callers is infallible
/// at the signature level; a panicking binding body unwinds through the
/// engine unchanged.
///
/// [`BindingNotFound`]: CoreError::BindingNotFound
/// [`DependencyLoop`]: CoreError::DependencyLoop
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("no binding found for {key}")]
    BindingNotFound { key: String },

    #[error("dependency loop detected: {}", .chain.join(" -> "))]
    DependencyLoop { chain: Vec<String> },

    #[error("invalid binding: {message}")]
    InvalidBinding { message: String },
}

impl CoreError {
    /// Create a new binding-not-found error for a lookup key
    pub fn binding_not_found(key: impl ToString) -> Self {
        Self::BindingNotFound {
            key: key.to_string(),
        }
    }

    /// Create a new dependency-loop error from the in-flight key chain
    pub fn dependency_loop(chain: Vec<String>) -> Self {
        Self::DependencyLoop { chain }
    }

    /// Create a new invalid-binding error
    pub fn invalid_binding(message: impl Into<String>) -> Self {
        Self::InvalidBinding {
            message: message.into(),
        }
    }

    /// Check if the error is a binding-not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::BindingNotFound { .. })
    }

    /// Check if the error is a dependency-loop error
    pub fn is_dependency_loop(&self) -> bool {
        matches!(self, Self::DependencyLoop { .. })
    }

    /// The ordered key chain of a dependency loop, outermost request first,
    /// repeated key last. `None` for other error kinds.
    pub fn loop_chain(&self) -> Option<&[String]> {
        match self {
            Self::DependencyLoop { chain } => Some(chain),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = CoreError::binding_not_found("alloc::string::String (tag = \"db\")");
        assert_eq!(
            err.to_string(),
            "no binding found for alloc::string::String (tag = \"db\")"
        );
        assert!(err.is_not_found());
        assert!(!err.is_dependency_loop());
    }

    #[test]
    fn test_loop_display_joins_chain() {
        let err = CoreError::dependency_loop(vec![
            "A".to_string(),
            "B".to_string(),
            "A".to_string(),
        ]);
        assert_eq!(err.to_string(), "dependency loop detected: A -> B -> A");
        assert_eq!(err.loop_chain().unwrap().len(), 3);
    }
}

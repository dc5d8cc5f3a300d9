use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// First-class, comparable type descriptor used as part of lookup keys.
///
/// A token is built once per distinct type shape via [`TypeToken::of`] and
/// carries purely structural identity: two tokens built independently for the
/// same type compare equal, and distinct generic instantiations yield
/// distinct tokens (`Vec<i32>` is not `Vec<String>`).
#[derive(Clone, Copy)]
pub struct TypeToken {
    type_id: TypeId,
    type_name: &'static str,
}

impl TypeToken {
    /// Create a token for type `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
        }
    }

    /// The designated sentinel for argument-less bindings
    pub fn unit() -> Self {
        Self::of::<()>()
    }

    /// Check whether this is the argument-less sentinel
    pub fn is_unit(&self) -> bool {
        self.type_id == TypeId::of::<()>()
    }

    /// The underlying type identity
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Human-readable type name, used in error messages
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

// Equality and hashing are structural on the type identity alone; the name is
// diagnostic and follows from the identity.
impl PartialEq for TypeToken {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for TypeToken {}

impl Hash for TypeToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeToken({})", self.type_name)
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Repository {}

    #[test]
    fn test_structural_equality() {
        assert_eq!(TypeToken::of::<String>(), TypeToken::of::<String>());
        assert_ne!(TypeToken::of::<String>(), TypeToken::of::<i32>());
    }

    #[test]
    fn test_generic_instantiations_are_distinct() {
        assert_ne!(TypeToken::of::<Vec<i32>>(), TypeToken::of::<Vec<String>>());
        assert_eq!(TypeToken::of::<Vec<i32>>(), TypeToken::of::<Vec<i32>>());
    }

    #[test]
    fn test_unit_sentinel() {
        assert!(TypeToken::unit().is_unit());
        assert!(!TypeToken::of::<String>().is_unit());
        assert_eq!(TypeToken::unit(), TypeToken::of::<()>());
    }

    #[test]
    fn test_unsized_types_have_tokens() {
        let token = TypeToken::of::<dyn Repository>();
        assert!(token.type_name().contains("Repository"));
    }

    #[test]
    fn test_token_in_hashmap() {
        use std::collections::HashMap;
        let mut map = HashMap::new();
        map.insert(TypeToken::of::<String>(), "string");
        map.insert(TypeToken::of::<i32>(), "i32");
        assert_eq!(map.get(&TypeToken::of::<String>()), Some(&"string"));
        assert_eq!(map.get(&TypeToken::of::<bool>()), None);
    }
}

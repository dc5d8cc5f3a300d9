use std::borrow::Cow;
use std::fmt;

use crate::container::token::TypeToken;

/// Optional disambiguator for bindings that share the same type signature.
///
/// A tag carries no semantics beyond equality; two bindings for the same
/// (argument, result) pair under distinct tags are fully independent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    Str(Cow<'static, str>),
    Int(i64),
}

impl Tag {
    /// Create a string tag
    pub fn str(value: impl Into<Cow<'static, str>>) -> Self {
        Tag::Str(value.into())
    }

    /// Create an integer tag
    pub fn int(value: i64) -> Self {
        Tag::Int(value)
    }
}

impl From<&'static str> for Tag {
    fn from(value: &'static str) -> Self {
        Tag::Str(Cow::Borrowed(value))
    }
}

impl From<String> for Tag {
    fn from(value: String) -> Self {
        Tag::Str(Cow::Owned(value))
    }
}

impl From<i64> for Tag {
    fn from(value: i64) -> Self {
        Tag::Int(value)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Str(s) => write!(f, "\"{}\"", s),
            Tag::Int(i) => write!(f, "{}", i),
        }
    }
}

/// Composite lookup key identifying a binding in the registry.
///
/// Two keys are equal iff argument token, result token, and tag are all
/// equal. The argument token is the unit sentinel for argument-less
/// bindings. Keys are immutable and used only as map keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BindingKey {
    arg: TypeToken,
    result: TypeToken,
    tag: Option<Tag>,
}

impl BindingKey {
    /// Create a key from explicit tokens
    pub fn new(arg: TypeToken, result: TypeToken, tag: Option<Tag>) -> Self {
        Self { arg, result, tag }
    }

    /// Key for a factory binding taking `A` and producing `T`
    pub fn factory<A: ?Sized + 'static, T: ?Sized + 'static>(tag: Option<Tag>) -> Self {
        Self::new(TypeToken::of::<A>(), TypeToken::of::<T>(), tag)
    }

    /// Key for an argument-less binding producing `T`
    pub fn provider<T: ?Sized + 'static>(tag: Option<Tag>) -> Self {
        Self::new(TypeToken::unit(), TypeToken::of::<T>(), tag)
    }

    /// The argument type token
    pub fn arg(&self) -> TypeToken {
        self.arg
    }

    /// The result type token
    pub fn result(&self) -> TypeToken {
        self.result
    }

    /// The optional tag
    pub fn tag(&self) -> Option<&Tag> {
        self.tag.as_ref()
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.result)?;
        if !self.arg.is_unit() {
            write!(f, " <- {}", self.arg)?;
        }
        if let Some(tag) = &self.tag {
            write!(f, " (tag = {})", tag)?;
        }
        Ok(())
    }
}

//! Error types reported by the erased containers.
//!
//! There are exactly two runtime failure kinds: asking an any-box for a
//! type it does not hold, and invoking an empty delegate. Neither one
//! changes the state of the container that reported it.

use std::error::Error;
use std::fmt;

use crate::token::TypeToken;

/// A typed accessor asked for a type other than the one held.
///
/// `held` is [`TypeToken::none()`] when the container was empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeMismatch {
    /// The type the caller asked for.
    pub requested: TypeToken,
    /// The type actually held.
    pub held: TypeToken,
}

impl TypeMismatch {
    /// Mismatch between `requested` and `held`.
    pub fn new(requested: TypeToken, held: TypeToken) -> Self {
        Self { requested, held }
    }
}

impl fmt::Display for TypeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.held.is_none() {
            write!(f, "type mismatch: requested {}, nothing held", self.requested)
        } else {
            write!(
                f,
                "type mismatch: requested {}, held {}",
                self.requested, self.held
            )
        }
    }
}

impl Error for TypeMismatch {}

/// A delegate was invoked while holding no callable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EmptyInvocation;

impl fmt::Display for EmptyInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invoked an empty delegate")
    }
}

impl Error for EmptyInvocation {}

/// Either container error, for callers that propagate both with `?`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StashError {
    /// See [`TypeMismatch`].
    TypeMismatch(TypeMismatch),
    /// See [`EmptyInvocation`].
    EmptyInvocation(EmptyInvocation),
}

impl fmt::Display for StashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TypeMismatch(e) => write!(f, "{e}"),
            Self::EmptyInvocation(e) => write!(f, "{e}"),
        }
    }
}

impl Error for StashError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::TypeMismatch(e) => Some(e),
            Self::EmptyInvocation(e) => Some(e),
        }
    }
}

impl From<TypeMismatch> for StashError {
    fn from(e: TypeMismatch) -> Self {
        Self::TypeMismatch(e)
    }
}

impl From<EmptyInvocation> for StashError {
    fn from(e: EmptyInvocation) -> Self {
        Self::EmptyInvocation(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_message_names_both_types() {
        let err = TypeMismatch::new(TypeToken::of::<i32>(), TypeToken::of::<String>());
        let msg = err.to_string();
        assert!(msg.contains("i32"));
        assert!(msg.contains("String"));
    }

    #[test]
    fn mismatch_against_empty_says_nothing_held() {
        let err = TypeMismatch::new(TypeToken::of::<i32>(), TypeToken::none());
        assert_eq!(err.to_string(), "type mismatch: requested i32, nothing held");
    }

    #[test]
    fn umbrella_keeps_source() {
        let err: StashError = EmptyInvocation.into();
        assert_eq!(err, StashError::EmptyInvocation(EmptyInvocation));
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "invoked an empty delegate");
    }

    fn fails() -> Result<(), StashError> {
        Err(TypeMismatch::new(TypeToken::of::<u8>(), TypeToken::none()))?;
        Ok(())
    }

    #[test]
    fn question_mark_converts() {
        assert!(matches!(fails(), Err(StashError::TypeMismatch(_))));
    }
}

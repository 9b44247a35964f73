//! Opaque runtime type identity.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of the concrete type held by an erased container.
///
/// Equality and hashing use the [`TypeId`] only; the name is carried for
/// diagnostics and is not guaranteed to be unique or stable across
/// compiler versions. The distinguished [`TypeToken::none()`] value
/// identifies "nothing held".
#[derive(Clone, Copy)]
pub struct TypeToken {
    id: Option<TypeId>,
    name: &'static str,
}

impl TypeToken {
    /// Token for the concrete type `T`.
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: Some(TypeId::of::<T>()),
            name: std::any::type_name::<T>(),
        }
    }

    /// Token reported by an empty container.
    pub const fn none() -> Self {
        Self {
            id: None,
            name: "<none>",
        }
    }

    /// The underlying `TypeId`, or `None` for the empty token.
    pub fn id(&self) -> Option<TypeId> {
        self.id
    }

    /// Human-readable type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Whether this is the empty token.
    pub fn is_none(&self) -> bool {
        self.id.is_none()
    }

    /// Whether this token identifies `T`.
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == Some(TypeId::of::<T>())
    }
}

impl Default for TypeToken {
    fn default() -> Self {
        Self::none()
    }
}

impl PartialEq for TypeToken {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeToken {}

impl Hash for TypeToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeToken({})", self.name)
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn same_type_same_token() {
        assert_eq!(TypeToken::of::<u32>(), TypeToken::of::<u32>());
        assert_ne!(TypeToken::of::<u32>(), TypeToken::of::<i32>());
    }

    #[test]
    fn none_is_distinct_from_every_type() {
        let none = TypeToken::none();
        assert!(none.is_none());
        assert_ne!(none, TypeToken::of::<()>());
        assert_eq!(none, TypeToken::default());
        assert_eq!(none.id(), None);
    }

    #[test]
    fn is_matches_only_its_type() {
        let token = TypeToken::of::<String>();
        assert!(token.is::<String>());
        assert!(!token.is::<&'static str>());
        assert!(!TypeToken::none().is::<String>());
    }

    #[test]
    fn hash_follows_identity() {
        let mut set = HashSet::new();
        set.insert(TypeToken::of::<u8>());
        set.insert(TypeToken::of::<u8>());
        set.insert(TypeToken::of::<u16>());
        set.insert(TypeToken::none());
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn display_uses_type_name() {
        assert_eq!(TypeToken::of::<u64>().to_string(), "u64");
        assert_eq!(TypeToken::none().to_string(), "<none>");
    }
}

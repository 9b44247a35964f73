//! [`TypeIndexedMap`]: one erased value per type.

use std::any::TypeId;
use std::fmt;

use indexmap::IndexMap;
use stash_core::{TypeMismatch, TypeToken};
use stash_engine::AnyBox;

/// A map from type to a single value of that type.
///
/// Iteration follows insertion order. An entry whose replacement value
/// panicked during construction is left empty and reads as absent. Like [`AnyBox`], the map may hold
/// thread-local values and is therefore neither `Send` nor `Sync`.
///
/// ```
/// use stash_registry::TypeIndexedMap;
///
/// let mut registry = TypeIndexedMap::new();
/// registry.insert(8080_u16);
/// registry.insert(String::from("localhost"));
///
/// assert_eq!(registry.get::<u16>(), Some(&8080));
/// assert!(registry.at::<f32>().is_err());
/// ```
#[derive(Default)]
pub struct TypeIndexedMap {
    entries: IndexMap<TypeId, AnyBox>,
}

impl TypeIndexedMap {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` as the entry for `T`, replacing any previous one.
    pub fn insert<T: 'static>(&mut self, value: T) -> &mut T {
        self.emplace_with(|| value)
    }

    /// Store the value built by `init` as the entry for `T`.
    ///
    /// An existing entry is destroyed and rebuilt in place inside its box.
    pub fn emplace_with<T: 'static>(&mut self, init: impl FnOnce() -> T) -> &mut T {
        let slot = self.entries.entry(TypeId::of::<T>()).or_default();
        if slot.has_value() {
            tracing::debug!(ty = std::any::type_name::<T>(), "replacing registry entry");
        }
        slot.emplace_with(init)
    }

    /// Shared access to the entry for `T`.
    pub fn get<T: 'static>(&self) -> Option<&T> {
        self.entries.get(&TypeId::of::<T>())?.try_get()
    }

    /// Exclusive access to the entry for `T`.
    pub fn get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.entries.get_mut(&TypeId::of::<T>())?.try_get_mut()
    }

    /// The entry for `T`, or a mismatch error reporting that nothing is
    /// held for `T`.
    pub fn at<T: 'static>(&self) -> Result<&T, TypeMismatch> {
        match self.entries.get(&TypeId::of::<T>()) {
            Some(slot) => slot.get(),
            None => Err(TypeMismatch::new(TypeToken::of::<T>(), TypeToken::none())),
        }
    }

    /// Whether an entry for `T` exists.
    pub fn contains<T: 'static>(&self) -> bool {
        self.entries
            .get(&TypeId::of::<T>())
            .is_some_and(AnyBox::has_value)
    }

    /// Number of entries for `T`: zero or one.
    pub fn count<T: 'static>(&self) -> usize {
        usize::from(self.contains::<T>())
    }

    /// Remove the entry for `T` and return its value.
    pub fn remove<T: 'static>(&mut self) -> Option<T> {
        let mut slot = self.entries.shift_remove(&TypeId::of::<T>())?;
        slot.take_value().ok()
    }

    /// Remove and destroy the entry for `T`. Returns whether one existed.
    pub fn erase<T: 'static>(&mut self) -> bool {
        match self.entries.shift_remove(&TypeId::of::<T>()) {
            Some(mut slot) => {
                let existed = slot.has_value();
                slot.reset();
                existed
            }
            None => false,
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.live().count()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.live().next().is_none()
    }

    /// Types held, in insertion order.
    pub fn types(&self) -> impl Iterator<Item = TypeToken> + '_ {
        self.live().map(AnyBox::type_token)
    }

    fn live(&self) -> impl Iterator<Item = &AnyBox> + '_ {
        self.entries.values().filter(|slot| slot.has_value())
    }

    /// Destroy every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl fmt::Debug for TypeIndexedMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.types()).finish()
    }
}

//! The dynamic value container.

#![allow(unsafe_code)]

use std::any::TypeId;
use std::convert::Infallible;
use std::fmt;
use std::marker::PhantomData;

use stash_core::{TypeMismatch, TypeToken};

use crate::cell::{Cell, Slot};
use crate::layout::Placement;
use crate::table::{Table, TableFor};

/// A move-only box holding zero or one value of any `'static` type.
///
/// Values that fit the inline capacity are stored without allocating.
/// Typed access is checked against the held type:
///
/// ```
/// use stash_engine::AnyBox;
///
/// let mut slot = AnyBox::new(String::from("hi"));
/// assert!(slot.is::<String>());
/// assert_eq!(slot.try_get::<u32>(), None);
///
/// let s: String = slot.take_value().unwrap();
/// assert_eq!(s, "hi");
/// assert!(!slot.has_value());
/// ```
///
/// An `AnyBox` may hold values that are neither `Send` nor `Sync`, so it
/// is itself neither.
pub struct AnyBox {
    table: Option<&'static Table>,
    cell: Cell,
    _local: PhantomData<*mut ()>,
}

impl AnyBox {
    /// An empty box.
    pub const fn empty() -> Self {
        Self {
            table: None,
            cell: Cell::new(),
            _local: PhantomData,
        }
    }

    /// A box holding `value`.
    ///
    /// # Panics
    ///
    /// If `T` is `AnyBox`.
    pub fn new<T: 'static>(value: T) -> Self {
        Self::new_with(|| value)
    }

    /// A box holding the value produced by `init`, built in place.
    ///
    /// # Panics
    ///
    /// If `T` is `AnyBox`.
    pub fn new_with<T: 'static>(init: impl FnOnce() -> T) -> Self {
        let mut boxed = Self::empty();
        boxed.emplace_with(init);
        boxed
    }

    /// A box holding the value produced by `init`, or `init`'s error.
    ///
    /// No memory is leaked when `init` fails.
    ///
    /// # Panics
    ///
    /// If `T` is `AnyBox`.
    pub fn try_new_with<T: 'static, E>(init: impl FnOnce() -> Result<T, E>) -> Result<Self, E> {
        let mut boxed = Self::empty();
        boxed.try_emplace_with(init)?;
        Ok(boxed)
    }

    /// Replace the held value with `value`.
    ///
    /// # Panics
    ///
    /// If `T` is `AnyBox`.
    pub fn emplace<T: 'static>(&mut self, value: T) -> &mut T {
        self.emplace_with(|| value)
    }

    /// Destroy the held value, then build a new one in place from `init`.
    ///
    /// If `init` panics the box is left empty.
    ///
    /// # Panics
    ///
    /// If `T` is `AnyBox`.
    pub fn emplace_with<T: 'static>(&mut self, init: impl FnOnce() -> T) -> &mut T {
        match self.try_emplace_with(|| Ok::<T, Infallible>(init())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Destroy the held value, then build a new one in place from `init`.
    ///
    /// If `init` fails or panics the box is left empty and any heap block
    /// reserved for the new value is released.
    ///
    /// # Panics
    ///
    /// If `T` is `AnyBox`. The box is unchanged in that case.
    pub fn try_emplace_with<T: 'static, E>(
        &mut self,
        init: impl FnOnce() -> Result<T, E>,
    ) -> Result<&mut T, E> {
        assert!(
            TypeId::of::<T>() != TypeId::of::<AnyBox>(),
            "an AnyBox cannot hold another AnyBox"
        );
        self.reset();
        // SAFETY: reset left the cell without a live value.
        let ptr = unsafe { Slot::<T>::construct_with(&mut self.cell, init)? };
        self.table = Some(TableFor::<T>::get());
        // SAFETY: ptr is the value just built, owned by self and borrowed
        // for as long as self is.
        Ok(unsafe { &mut *ptr.as_ptr() })
    }

    /// Destroy the held value, if any.
    pub fn reset(&mut self) {
        if let Some(table) = self.table.take() {
            // SAFETY: the table described the live value, and has been
            // cleared so the value is destroyed at most once.
            unsafe { table.destruct(&mut self.cell) };
        }
    }

    /// Whether a value is held.
    pub fn has_value(&self) -> bool {
        self.table.is_some()
    }

    /// Identity of the held type, or [`TypeToken::none()`] when empty.
    pub fn type_token(&self) -> TypeToken {
        self.table.map_or(TypeToken::none(), Table::token)
    }

    /// Where the held value lives, or `None` when empty.
    pub fn placement(&self) -> Option<Placement> {
        self.table.map(Table::placement)
    }

    /// Whether the held value is a `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.table.is_some_and(|table| table.describes::<T>())
    }

    /// Shared access to the held `T`, or `None` if it is not a `T`.
    pub fn try_get<T: 'static>(&self) -> Option<&T> {
        if !self.is::<T>() {
            return None;
        }
        // SAFETY: the table describes T, so the cell holds a live T.
        Some(unsafe { &*Slot::<T>::pointer(&self.cell) })
    }

    /// Exclusive access to the held `T`, or `None` if it is not a `T`.
    pub fn try_get_mut<T: 'static>(&mut self) -> Option<&mut T> {
        if !self.is::<T>() {
            return None;
        }
        // SAFETY: the table describes T, so the cell holds a live T.
        Some(unsafe { &mut *Slot::<T>::pointer_mut(&mut self.cell) })
    }

    /// Shared access to the held `T`.
    pub fn get<T: 'static>(&self) -> Result<&T, TypeMismatch> {
        let held = self.type_token();
        self.try_get()
            .ok_or_else(|| TypeMismatch::new(TypeToken::of::<T>(), held))
    }

    /// Exclusive access to the held `T`.
    pub fn get_mut<T: 'static>(&mut self) -> Result<&mut T, TypeMismatch> {
        let held = self.type_token();
        self.try_get_mut()
            .ok_or_else(|| TypeMismatch::new(TypeToken::of::<T>(), held))
    }

    /// Move the held `T` out, leaving the box empty.
    ///
    /// On mismatch the box is unchanged.
    pub fn take_value<T: 'static>(&mut self) -> Result<T, TypeMismatch> {
        if !self.is::<T>() {
            return Err(TypeMismatch::new(TypeToken::of::<T>(), self.type_token()));
        }
        self.table = None;
        // SAFETY: the table described T and is now cleared, so the value
        // is moved out exactly once.
        Ok(unsafe { Slot::<T>::read(&mut self.cell) })
    }

    /// Unwrap into the held `T`, or get the box back if it is not a `T`.
    pub fn into_value<T: 'static>(mut self) -> Result<T, Self> {
        self.take_value().map_err(|_| self)
    }

    /// Move the held value into a new box, leaving this one empty.
    ///
    /// `slot = slot.take()` leaves `slot` holding its original value.
    pub fn take(&mut self) -> Self {
        let mut out = Self::empty();
        out.assign_from(self);
        out
    }

    /// Destroy the held value, then adopt `source`'s value, leaving
    /// `source` empty.
    pub fn assign_from(&mut self, source: &mut Self) {
        self.reset();
        if let Some(table) = source.table.take() {
            // SAFETY: source held a live value of the table's type; self was
            // just reset, so its cell holds nothing.
            unsafe { table.move_construct(&mut self.cell, &mut source.cell) };
            self.table = Some(table);
        }
    }
}

impl Default for AnyBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl Drop for AnyBox {
    fn drop(&mut self) {
        self.reset();
    }
}

impl fmt::Debug for AnyBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnyBox")
            .field("type", &self.type_token().name())
            .field("placement", &self.placement())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stash_test_utils::{DropTally, InitFailed, Large, OverAligned};

    #[test]
    fn fresh_box_is_empty() {
        let boxed = AnyBox::default();
        assert!(!boxed.has_value());
        assert!(boxed.type_token().is_none());
        assert_eq!(boxed.placement(), None);
        assert!(!boxed.is::<()>());
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn footprint_is_one_cache_line() {
        assert_eq!(std::mem::size_of::<AnyBox>(), 64);
    }

    #[test]
    fn placement_follows_type() {
        assert_eq!(AnyBox::new(1_u8).placement(), Some(Placement::Inline));
        assert_eq!(AnyBox::new(Large::filled(1)).placement(), Some(Placement::Heap));
        assert_eq!(AnyBox::new(OverAligned(1)).placement(), Some(Placement::Heap));
    }

    #[test]
    fn get_mut_writes_through() {
        let mut boxed = AnyBox::new(vec![1, 2]);
        boxed.get_mut::<Vec<i32>>().unwrap().push(3);
        assert_eq!(boxed.get::<Vec<i32>>().unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn mismatch_reports_both_types() {
        let boxed = AnyBox::new(1_i32);
        let err = boxed.get::<f64>().unwrap_err();
        assert_eq!(err.requested, TypeToken::of::<f64>());
        assert_eq!(err.held, TypeToken::of::<i32>());
    }

    #[test]
    fn mismatch_on_empty_reports_none() {
        let boxed = AnyBox::empty();
        let err = boxed.get::<f64>().unwrap_err();
        assert!(err.held.is_none());
    }

    #[test]
    fn emplace_drops_previous_value() {
        let tally = DropTally::new();
        let mut boxed = AnyBox::new(tally.track(1));
        boxed.emplace(tally.track(2));
        assert_eq!(tally.drops(), 1);
        boxed.emplace(5_u8);
        assert_eq!(tally.drops(), 2);
        assert_eq!(boxed.get::<u8>(), Ok(&5));
    }

    #[test]
    fn failed_emplace_leaves_box_empty() {
        let tally = DropTally::new();
        let mut boxed = AnyBox::new(tally.track(Large::filled(1)));
        let result = boxed.try_emplace_with::<Large, _>(|| Err(InitFailed));
        assert_eq!(result.err(), Some(InitFailed));
        assert!(!boxed.has_value());
        assert_eq!(tally.drops(), 1);
    }

    #[test]
    fn panicking_emplace_leaves_box_empty() {
        let mut boxed = AnyBox::new(3_i32);
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            boxed.emplace_with::<Large>(|| panic!("boom"));
        }));
        assert!(outcome.is_err());
        assert!(!boxed.has_value());
    }

    #[test]
    fn reset_is_idempotent() {
        let tally = DropTally::new();
        let mut boxed = AnyBox::new(tally.track(0));
        boxed.reset();
        boxed.reset();
        assert_eq!(tally.drops(), 1);
        assert!(!boxed.has_value());
    }

    #[test]
    fn take_value_mismatch_keeps_value() {
        let mut boxed = AnyBox::new(String::from("kept"));
        assert!(boxed.take_value::<i32>().is_err());
        assert_eq!(boxed.get::<String>().unwrap(), "kept");
    }

    #[test]
    fn into_value_returns_box_on_mismatch() {
        let boxed = AnyBox::new(Large::filled(2));
        let boxed = boxed.into_value::<u8>().unwrap_err();
        assert_eq!(boxed.into_value::<Large>().unwrap(), Large::filled(2));
    }

    #[test]
    fn take_moves_heap_value_without_dropping() {
        let tally = DropTally::new();
        let mut a = AnyBox::new(tally.track(Large::filled(4)));
        let b = a.take();
        assert!(!a.has_value());
        assert_eq!(tally.drops(), 0);
        assert_eq!(b.try_get::<stash_test_utils::Tracked<Large>>().unwrap().value.sum(), 4 * 32);
        drop(b);
        assert_eq!(tally.drops(), 1);
    }

    #[test]
    fn self_take_preserves_value() {
        let mut a = AnyBox::new(17_u64);
        a = a.take();
        assert_eq!(a.get::<u64>(), Ok(&17));
    }

    #[test]
    fn assign_from_destroys_target_first() {
        let tally = DropTally::new();
        let mut target = AnyBox::new(tally.track("old"));
        let mut source = AnyBox::new(tally.track("new"));
        target.assign_from(&mut source);
        assert_eq!(tally.drops(), 1);
        assert!(!source.has_value());
        assert_eq!(
            target.try_get::<stash_test_utils::Tracked<&str>>().unwrap().value,
            "new"
        );
    }

    #[test]
    fn swap_exchanges_values() {
        let mut a = AnyBox::new(1_i32);
        let mut b = AnyBox::new(Large::filled(1));
        std::mem::swap(&mut a, &mut b);
        assert!(a.is::<Large>());
        assert_eq!(b.get::<i32>(), Ok(&1));
    }

    #[test]
    #[should_panic(expected = "an AnyBox cannot hold another AnyBox")]
    fn nesting_is_rejected() {
        let _ = AnyBox::new(AnyBox::new(1_u8));
    }

    #[test]
    fn debug_names_held_type() {
        let text = format!("{:?}", AnyBox::new(2_u16));
        assert!(text.contains("u16"));
    }
}

//! Per-type dispatch tables.
//!
//! One immutable table exists per concrete stored type. It is an
//! associated constant promoted to `'static`, so obtaining it costs
//! nothing at runtime and it is never allocated or freed. Containers
//! keep a `&'static` reference to it as their only runtime type record.

#![allow(unsafe_code)]

use std::fmt;
use std::marker::PhantomData;
use std::ptr;

use stash_core::TypeToken;

use crate::cell::{Cell, Slot};
use crate::layout::Placement;
use crate::signature::{Invocable, Signature};

/// Type identity plus the move and destroy entry points for one type.
pub struct Table {
    // `TypeId::of` is not usable in constants on stable, so the token is
    // produced on demand.
    token: fn() -> TypeToken,
    placement: Placement,
    move_construct: unsafe fn(&mut Cell, &mut Cell),
    destruct: unsafe fn(&mut Cell),
}

impl Table {
    /// Identity of the described type.
    pub fn token(&self) -> TypeToken {
        (self.token)()
    }

    /// Where the described type lives in a cell.
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Whether this table describes `T`.
    ///
    /// Pointer identity is checked first; the token comparison decides
    /// when the constant has been duplicated across codegen units.
    pub fn describes<T: 'static>(&self) -> bool {
        ptr::eq(self, TableFor::<T>::get()) || self.token().is::<T>()
    }

    /// # Safety
    ///
    /// `src` must hold a live value of the described type; `dst` must
    /// hold none.
    pub(crate) unsafe fn move_construct(&self, dst: &mut Cell, src: &mut Cell) {
        // SAFETY: forwarded from the caller.
        unsafe { (self.move_construct)(dst, src) }
    }

    /// # Safety
    ///
    /// `cell` must hold a live value of the described type.
    pub(crate) unsafe fn destruct(&self, cell: &mut Cell) {
        // SAFETY: forwarded from the caller.
        unsafe { (self.destruct)(cell) }
    }
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("type", &self.token().name())
            .field("placement", &self.placement)
            .finish()
    }
}

/// Provider of the [`Table`] for `T`.
pub struct TableFor<T>(PhantomData<fn() -> T>);

impl<T: 'static> TableFor<T> {
    const TABLE: Table = Table {
        token: TypeToken::of::<T>,
        placement: Slot::<T>::PLACEMENT,
        move_construct: Slot::<T>::move_construct,
        destruct: Slot::<T>::destruct,
    };

    /// The static table for `T`.
    pub fn get() -> &'static Table {
        &Self::TABLE
    }
}

/// A [`Table`] extended with the invoke entry point for signature `S`.
pub struct CallTable<S: ?Sized + Signature> {
    base: Table,
    invoke: unsafe fn(&mut Cell, S::Args) -> S::Output,
}

impl<S: ?Sized + Signature> CallTable<S> {
    /// The type-level part of the table.
    pub fn base(&self) -> &Table {
        &self.base
    }

    /// # Safety
    ///
    /// `cell` must hold a live value of the described type.
    pub(crate) unsafe fn invoke(&self, cell: &mut Cell, args: S::Args) -> S::Output {
        // SAFETY: forwarded from the caller.
        unsafe { (self.invoke)(cell, args) }
    }
}

impl<S: ?Sized + Signature> fmt::Debug for CallTable<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallTable")
            .field("type", &self.base.token().name())
            .field("placement", &self.base.placement)
            .finish()
    }
}

/// Provider of the [`CallTable`] for callable `T` under signature `S`.
pub struct CallTableFor<T, S: ?Sized>(PhantomData<fn() -> T>, PhantomData<*const S>);

impl<T, S> CallTableFor<T, S>
where
    T: Invocable<S> + 'static,
    S: ?Sized + Signature,
{
    const TABLE: CallTable<S> = CallTable {
        base: TableFor::<T>::TABLE,
        invoke: invoke::<T, S>,
    };

    /// The static call table for `T`.
    pub fn get() -> &'static CallTable<S> {
        &Self::TABLE
    }
}

/// # Safety
///
/// `cell` must hold a live `T`.
unsafe fn invoke<T, S>(cell: &mut Cell, args: S::Args) -> S::Output
where
    T: Invocable<S>,
    S: ?Sized + Signature,
{
    // SAFETY: the caller guarantees a live T, and `cell` is exclusively
    // borrowed for the duration of the call.
    unsafe { (*Slot::<T>::pointer_mut(cell)).invoke(args) }
}

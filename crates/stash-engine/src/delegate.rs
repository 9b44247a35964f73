//! The callable container.
//!
//! Signature-specific constructors (`new`, `emplace`, ...), `call` and the
//! member-binding helpers (`bind`, `bind_mut`, `bind_raw`) are generated
//! per arity on the concrete `Delegate<dyn FnMut(..) -> R>` types.

#![allow(unsafe_code)]

use std::fmt;
use std::marker::PhantomData;

use stash_core::{EmptyInvocation, TypeToken};

use crate::cell::{Cell, Slot};
use crate::layout::Placement;
use crate::signature::{Invocable, Signature};
use crate::table::{CallTable, CallTableFor};

/// A move-only container for zero or one callable with signature `S`.
///
/// `S` is a trait-object type naming the signature, for example
/// `dyn FnMut(&'static str, u32) -> bool` or `dyn FnMut() + Send`. Any
/// closure, function pointer or function object matching `S` can be
/// stored, including ones that capture move-only values. Callables that
/// fit the inline capacity are stored without allocating.
///
/// ```
/// use stash_engine::{Delegate, EmptyInvocation};
///
/// let mut total = 0;
/// let mut add = Delegate::<dyn FnMut(i32) -> i32>::new(move |x| {
///     total += x;
///     total
/// });
/// assert_eq!(add.call(2), Ok(2));
/// assert_eq!(add.call(3), Ok(5));
///
/// add.reset();
/// assert_eq!(add.call(1), Err(EmptyInvocation));
/// ```
///
/// With a `+ Send` signature the delegate is `Send` and only accepts
/// `Send` callables.
pub struct Delegate<S: ?Sized + Signature> {
    table: Option<&'static CallTable<S>>,
    cell: Cell,
    _signature: PhantomData<S>,
}

impl<S: ?Sized + Signature> Delegate<S> {
    /// An empty delegate.
    pub const fn empty() -> Self {
        Self {
            table: None,
            cell: Cell::new(),
            _signature: PhantomData,
        }
    }

    /// Destroy the held callable, then build a new one from `init`.
    ///
    /// The delegate is empty if `init` fails or unwinds.
    pub(crate) fn store_with<F, E>(&mut self, init: impl FnOnce() -> Result<F, E>) -> Result<(), E>
    where
        F: Invocable<S> + 'static,
    {
        self.reset();
        // SAFETY: reset left the cell without a live value.
        unsafe { Slot::<F>::construct_with(&mut self.cell, init)? };
        self.table = Some(CallTableFor::<F, S>::get());
        Ok(())
    }

    /// Destroy the held callable, if any.
    pub fn reset(&mut self) {
        if let Some(table) = self.table.take() {
            // SAFETY: the table described the live callable and has been
            // cleared, so it is destroyed at most once.
            unsafe { table.base().destruct(&mut self.cell) };
        }
    }

    /// Whether a callable is held.
    pub fn has_value(&self) -> bool {
        self.table.is_some()
    }

    /// Identity of the held callable's type, or [`TypeToken::none()`].
    pub fn type_token(&self) -> TypeToken {
        self.table
            .map_or(TypeToken::none(), |table| table.base().token())
    }

    /// Where the held callable lives, or `None` when empty.
    pub fn placement(&self) -> Option<Placement> {
        self.table.map(|table| table.base().placement())
    }

    /// Whether the held callable is an `F`.
    pub fn holds<F: 'static>(&self) -> bool {
        self.table
            .is_some_and(|table| table.base().describes::<F>())
    }

    /// Invoke the held callable with packed arguments.
    ///
    /// Fails with [`EmptyInvocation`] and changes nothing when empty. If
    /// the callable panics, the delegate still holds it afterwards.
    pub fn call_with(&mut self, args: S::Args) -> Result<S::Output, EmptyInvocation> {
        let table = self.table.ok_or(EmptyInvocation)?;
        // SAFETY: the table describes the live callable in the cell.
        Ok(unsafe { table.invoke(&mut self.cell, args) })
    }

    /// Move the held callable into a new delegate, leaving this one empty.
    pub fn take(&mut self) -> Self {
        let mut out = Self::empty();
        out.assign_from(self);
        out
    }

    /// Destroy the held callable, then adopt `source`'s callable,
    /// leaving `source` empty.
    pub fn assign_from(&mut self, source: &mut Self) {
        self.reset();
        if let Some(table) = source.table.take() {
            // SAFETY: source held a live callable of the table's type; self
            // was just reset.
            unsafe {
                table
                    .base()
                    .move_construct(&mut self.cell, &mut source.cell)
            };
            self.table = Some(table);
        }
    }
}

impl<S: ?Sized + Signature> Default for Delegate<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: ?Sized + Signature> Drop for Delegate<S> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<S: ?Sized + Signature> fmt::Debug for Delegate<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Delegate")
            .field("callable", &self.type_token().name())
            .field("placement", &self.placement())
            .finish()
    }
}

//! Per-arity constructors, invocation and member binding for
//! [`Delegate`].
//!
//! Constructors are bounded on `FnMut` directly, not on
//! [`Invocable`](crate::Invocable), so closure argument types are
//! inferred from the delegate's signature.

#![allow(unsafe_code)]

use std::ops::{Deref, DerefMut};

use stash_core::EmptyInvocation;

use crate::delegate::Delegate;

macro_rules! arity {
    ($($arg:ident: $A:ident),*) => {
        arity!(@common [$($arg: $A),*] []);
        arity!(@common [$($arg: $A),*] [+ Send]);
        arity!(@raw [$($arg: $A),*]);
    };

    (@common [$($arg:ident: $A:ident),*] [$($send:tt)*]) => {
        impl<R: 'static, $($A: 'static),*> Delegate<dyn FnMut($($A),*) -> R $($send)*> {
            /// A delegate holding `f`.
            pub fn new<F>(f: F) -> Self
            where
                F: FnMut($($A),*) -> R + 'static $($send)*,
            {
                Self::new_with(|| f)
            }

            /// A delegate holding the callable produced by `init`, built in
            /// place.
            pub fn new_with<F>(init: impl FnOnce() -> F) -> Self
            where
                F: FnMut($($A),*) -> R + 'static $($send)*,
            {
                let mut delegate = Self::empty();
                delegate.emplace_with(init);
                delegate
            }

            /// A delegate holding the callable produced by `init`, or
            /// `init`'s error. No memory is leaked when `init` fails.
            pub fn try_new_with<F, E>(init: impl FnOnce() -> Result<F, E>) -> Result<Self, E>
            where
                F: FnMut($($A),*) -> R + 'static $($send)*,
            {
                let mut delegate = Self::empty();
                delegate.try_emplace_with(init)?;
                Ok(delegate)
            }

            /// Replace the held callable with `f`.
            pub fn emplace<F>(&mut self, f: F)
            where
                F: FnMut($($A),*) -> R + 'static $($send)*,
            {
                self.emplace_with(|| f);
            }

            /// Destroy the held callable, then build a new one in place.
            /// The delegate is empty if `init` panics.
            pub fn emplace_with<F>(&mut self, init: impl FnOnce() -> F)
            where
                F: FnMut($($A),*) -> R + 'static $($send)*,
            {
                match self.store_with(|| Ok::<F, std::convert::Infallible>(init())) {
                    Ok(()) => {}
                    Err(never) => match never {},
                }
            }

            /// Destroy the held callable, then build a new one in place.
            /// The delegate is empty if `init` fails or panics.
            pub fn try_emplace_with<F, E>(
                &mut self,
                init: impl FnOnce() -> Result<F, E>,
            ) -> Result<(), E>
            where
                F: FnMut($($A),*) -> R + 'static $($send)*,
            {
                self.store_with(init)
            }

            /// Invoke the held callable.
            ///
            /// Fails with [`EmptyInvocation`] and changes nothing when empty.
            pub fn call(&mut self, $($arg: $A),*) -> Result<R, EmptyInvocation> {
                self.call_with(($($arg,)*))
            }

            /// Bind `method` to the instance behind a shared handle.
            ///
            /// The handle (a `Box`, `Rc`, `Arc` or `&'static` reference) and
            /// the method are moved into the delegate; the instance lives as
            /// long as the handle keeps it alive.
            pub fn bind<H, C, M>(handle: H, method: M) -> Self
            where
                H: Deref<Target = C> + 'static $($send)*,
                C: ?Sized + 'static,
                M: Fn(&C, $($A),*) -> R + 'static $($send)*,
            {
                Self::new(move |$($arg: $A),*| method(&*handle, $($arg),*))
            }

            /// Bind a `&mut self` method to the instance behind an exclusive
            /// handle such as a `Box`.
            pub fn bind_mut<H, C, M>(mut handle: H, mut method: M) -> Self
            where
                H: DerefMut<Target = C> + 'static $($send)*,
                C: ?Sized + 'static,
                M: FnMut(&mut C, $($A),*) -> R + 'static $($send)*,
            {
                Self::new(move |$($arg: $A),*| method(&mut *handle, $($arg),*))
            }
        }

        impl<R: 'static, $($A: 'static),*> From<fn($($A),*) -> R>
            for Delegate<dyn FnMut($($A),*) -> R $($send)*>
        {
            fn from(f: fn($($A),*) -> R) -> Self {
                Self::new(f)
            }
        }
    };

    (@raw [$($arg:ident: $A:ident),*]) => {
        impl<R: 'static, $($A: 'static),*> Delegate<dyn FnMut($($A),*) -> R> {
            /// Bind `method` to the instance behind a raw pointer.
            ///
            /// # Safety
            ///
            /// `instance` must be non-null, valid for shared access, and
            /// outlive every call made through the returned delegate.
            pub unsafe fn bind_raw<C, M>(instance: *const C, method: M) -> Self
            where
                C: ?Sized + 'static,
                M: Fn(&C, $($A),*) -> R + 'static,
            {
                Self::new(move |$($arg: $A),*| {
                    // SAFETY: validity for the delegate's lifetime is the
                    // caller's obligation.
                    let instance = unsafe { &*instance };
                    method(instance, $($arg),*)
                })
            }
        }
    };
}

arity!();
arity!(a1: A1);
arity!(a1: A1, a2: A2);
arity!(a1: A1, a2: A2, a3: A3);
arity!(a1: A1, a2: A2, a3: A3, a4: A4);
arity!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5);
arity!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6);

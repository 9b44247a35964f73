//! Call signatures for delegates.
//!
//! A signature is named by its trait-object type, `dyn FnMut(A..) -> R`
//! or `dyn FnMut(A..) -> R + Send`, for up to six arguments. The object
//! type is never instantiated; it only fixes the argument tuple and the
//! result type, and (for the `Send` form) makes the delegate `Send`.

mod sealed {
    pub trait Sealed {}
}

/// A delegate call signature.
///
/// Implemented only for `dyn FnMut(A..) -> R` and
/// `dyn FnMut(A..) -> R + Send` with `'static` argument and result types.
pub trait Signature: sealed::Sealed + 'static {
    /// Arguments packed as a tuple.
    type Args: 'static;
    /// Result of a call.
    type Output: 'static;
}

/// A value that can be called with the arguments of signature `S`.
///
/// Blanket-implemented for every matching `FnMut`; the `Send` signatures
/// additionally require the callable to be `Send`.
pub trait Invocable<S: ?Sized + Signature> {
    /// Call with packed arguments.
    fn invoke(&mut self, args: S::Args) -> S::Output;
}

macro_rules! signature {
    ($($arg:ident: $A:ident),*) => {
        signature!(@impl [$($arg: $A),*] []);
        signature!(@impl [$($arg: $A),*] [+ Send]);
    };
    (@impl [$($arg:ident: $A:ident),*] [$($send:tt)*]) => {
        impl<R: 'static, $($A: 'static),*> sealed::Sealed
            for dyn FnMut($($A),*) -> R $($send)*
        {
        }

        impl<R: 'static, $($A: 'static),*> Signature for dyn FnMut($($A),*) -> R $($send)* {
            type Args = ($($A,)*);
            type Output = R;
        }

        impl<F, R: 'static, $($A: 'static),*> Invocable<dyn FnMut($($A),*) -> R $($send)*> for F
        where
            F: FnMut($($A),*) -> R $($send)*,
        {
            #[inline]
            fn invoke(&mut self, ($($arg,)*): ($($A,)*)) -> R {
                self($($arg),*)
            }
        }
    };
}

signature!();
signature!(a1: A1);
signature!(a1: A1, a2: A2);
signature!(a1: A1, a2: A2, a3: A3);
signature!(a1: A1, a2: A2, a3: A3, a4: A4);
signature!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5);
signature!(a1: A1, a2: A2, a3: A3, a4: A4, a5: A5, a6: A6);

#[cfg(test)]
mod tests {
    use super::*;

    fn call_packed<S, F>(mut f: F, args: S::Args) -> S::Output
    where
        S: ?Sized + Signature,
        F: Invocable<S>,
    {
        f.invoke(args)
    }

    #[test]
    fn closures_invoke_with_packed_args() {
        let sum = call_packed::<dyn FnMut(i32, i32, i32) -> i32, _>(
            |a: i32, b: i32, c: i32| a + b + c,
            (1, 2, 3),
        );
        assert_eq!(sum, 6);
        let mut hits = 0;
        call_packed::<dyn FnMut(), _>(|| hits += 1, ());
        assert_eq!(hits, 1);
    }

    #[test]
    fn fn_pointers_are_invocable() {
        fn neg(x: i64) -> i64 {
            -x
        }
        assert_eq!(call_packed::<dyn FnMut(i64) -> i64, _>(neg, (4,)), -4);
    }
}

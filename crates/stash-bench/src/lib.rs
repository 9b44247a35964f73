//! Benchmark fixtures for the stash containers.
//!
//! Builds batches of equivalent callables stored three ways (delegate with
//! an inline capture, delegate with a heap capture, and `Box<dyn FnMut>`)
//! so the benches compare like with like.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use stash_engine::Delegate;
use stash_test_utils::Large;

/// Signature used by every benchmarked callable.
pub type Adder = Delegate<dyn FnMut(u64) -> u64>;

/// A closure small enough to be stored inline.
pub fn small_adder(k: u64) -> impl FnMut(u64) -> u64 + 'static {
    let mut calls = 0_u64;
    move |x| {
        calls += 1;
        x.wrapping_add(k).wrapping_add(calls)
    }
}

/// A closure whose capture forces heap storage.
pub fn large_adder(k: u64) -> impl FnMut(u64) -> u64 + 'static {
    let table = Large::filled(k);
    move |x| x.wrapping_add(table.0[(x as usize) % table.0.len()])
}

/// `n` delegates built from [`small_adder`] or [`large_adder`].
pub fn delegate_batch(n: usize, large: bool) -> Vec<Adder> {
    (0..n as u64)
        .map(|k| {
            if large {
                Adder::new(large_adder(k))
            } else {
                Adder::new(small_adder(k))
            }
        })
        .collect()
}

/// `n` boxed trait objects built from the same closures.
pub fn boxed_batch(n: usize, large: bool) -> Vec<Box<dyn FnMut(u64) -> u64>> {
    (0..n as u64)
        .map(|k| -> Box<dyn FnMut(u64) -> u64> {
            if large {
                Box::new(large_adder(k))
            } else {
                Box::new(small_adder(k))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use stash_engine::Placement;

    #[test]
    fn batches_agree() {
        for large in [false, true] {
            let mut delegates = delegate_batch(8, large);
            let mut boxed = boxed_batch(8, large);
            let expected = if large { Placement::Heap } else { Placement::Inline };
            for (d, b) in delegates.iter_mut().zip(boxed.iter_mut()) {
                assert_eq!(d.placement(), Some(expected));
                assert_eq!(d.call(3), Ok(b(3)));
            }
        }
    }
}

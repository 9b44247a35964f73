//! Inline capacity of the storage cell and the placement decision.

use std::mem::{align_of, size_of};

/// Machine words of inline storage in every cell.
pub const INLINE_WORDS: usize = 6;

/// Bytes of inline storage in every cell.
pub const INLINE_BYTES: usize = INLINE_WORDS * size_of::<usize>();

/// Alignment of the inline storage. Covers every primitive type,
/// including `u128` and SIMD-free `f64` pairs.
pub const INLINE_ALIGN: usize = 16;

/// Where a value of a given type lives inside a container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Placement {
    /// The value occupies the cell's inline bytes.
    Inline,
    /// The cell holds a pointer to an exactly-sized heap block.
    Heap,
}

impl Placement {
    /// Placement chosen for `T`.
    pub const fn of<T>() -> Self {
        if fits_inline::<T>() {
            Self::Inline
        } else {
            Self::Heap
        }
    }

    /// Whether this is [`Placement::Inline`].
    pub const fn is_inline(self) -> bool {
        matches!(self, Self::Inline)
    }
}

/// Whether `T` fits the inline bytes in both size and alignment.
pub const fn fits_inline<T>() -> bool {
    size_of::<T>() <= INLINE_BYTES && align_of::<T>() <= INLINE_ALIGN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(align(32))]
    struct Aligned32;

    #[test]
    fn primitives_and_small_types_are_inline() {
        assert_eq!(Placement::of::<u8>(), Placement::Inline);
        assert_eq!(Placement::of::<u128>(), Placement::Inline);
        assert_eq!(Placement::of::<String>(), Placement::Inline);
        assert_eq!(Placement::of::<Box<dyn std::any::Any>>(), Placement::Inline);
        assert_eq!(Placement::of::<()>(), Placement::Inline);
    }

    #[test]
    fn capacity_boundary() {
        assert!(fits_inline::<[usize; INLINE_WORDS]>());
        assert!(!fits_inline::<[usize; INLINE_WORDS + 1]>());
    }

    #[test]
    fn over_aligned_goes_to_heap_even_when_empty() {
        assert_eq!(Placement::of::<Aligned32>(), Placement::Heap);
        assert!(!Placement::of::<Aligned32>().is_inline());
    }
}

//! Payload types on either side of the inline capacity.

/// Words in a [`Large`] payload; far beyond any inline capacity.
pub const LARGE_WORDS: usize = 32;

/// Word-sized payload that always fits inline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Small(pub u32);

/// 256-byte payload that always takes the heap path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Large(pub [u64; LARGE_WORDS]);

impl Large {
    /// Every word set to `value`.
    pub fn filled(value: u64) -> Self {
        Self([value; LARGE_WORDS])
    }

    pub fn sum(&self) -> u64 {
        self.0.iter().sum()
    }
}

/// Small in size but aligned beyond the inline cell, so it takes the heap path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(align(64))]
pub struct OverAligned(pub u64);

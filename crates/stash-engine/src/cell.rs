//! The memory cell and the typed operations on it.
//!
//! A [`Cell`] is untyped: it is six words of 16-byte-aligned storage
//! with no record of what, if anything, lives inside. [`Slot<T>`]
//! supplies the typed half. For each `T` it knows, at compile time,
//! whether the cell holds the value itself or a pointer to a heap block
//! with `T`'s exact layout, and it implements construction, relocation,
//! destruction and pointer recovery for that representation.
//!
//! All `Slot` operations are `unsafe`: the caller (a container holding
//! the matching dispatch table) is responsible for knowing which `T` is
//! live in a given cell.

#![allow(unsafe_code)]

use std::alloc::{self, Layout};
use std::marker::PhantomData;
use std::mem::{self, align_of, size_of, MaybeUninit};
use std::ptr::{self, NonNull};

use crate::layout::{Placement, INLINE_ALIGN, INLINE_BYTES};

/// Untyped inline storage shared by every container.
#[repr(C, align(16))]
pub struct Cell {
    bytes: MaybeUninit<[u8; INLINE_BYTES]>,
}

const _: () = assert!(align_of::<Cell>() == INLINE_ALIGN);
const _: () = assert!(size_of::<*mut u8>() <= INLINE_BYTES);

impl Cell {
    /// An uninitialised cell.
    pub const fn new() -> Self {
        Self {
            bytes: MaybeUninit::uninit(),
        }
    }

    fn as_ptr(&self) -> *const u8 {
        self.bytes.as_ptr().cast()
    }

    fn as_mut_ptr(&mut self) -> *mut u8 {
        self.bytes.as_mut_ptr().cast()
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}

// ── HeapBlock ──────────────────────────────────────────────────────

/// Owner of a heap block sized for one `T` whose contents are not live.
///
/// Dropping it frees the block without touching the contents. This is
/// what makes a failed or panicking in-place construction leak-free.
struct HeapBlock<T> {
    ptr: NonNull<T>,
}

impl<T> HeapBlock<T> {
    fn allocate() -> Self {
        let layout = Layout::new::<T>();
        if layout.size() == 0 {
            return Self {
                ptr: NonNull::dangling(),
            };
        }
        // SAFETY: layout has non-zero size.
        let raw = unsafe { alloc::alloc(layout) }.cast::<T>();
        match NonNull::new(raw) {
            Some(ptr) => Self { ptr },
            None => alloc::handle_alloc_error(layout),
        }
    }

    /// Move `value` into the block and give up ownership of the block.
    fn fill(self, value: T) -> NonNull<T> {
        let ptr = self.ptr;
        mem::forget(self);
        // SAFETY: ptr is a fresh allocation with T's layout (or dangling
        // and well-aligned for a zero-sized T).
        unsafe { ptr.as_ptr().write(value) };
        ptr
    }
}

impl<T> Drop for HeapBlock<T> {
    fn drop(&mut self) {
        let layout = Layout::new::<T>();
        if layout.size() != 0 {
            // SAFETY: ptr came from `alloc::alloc` with this same layout.
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), layout) };
        }
    }
}

// ── Slot ───────────────────────────────────────────────────────────

/// Typed storage strategy for `T` in a [`Cell`].
pub struct Slot<T>(PhantomData<fn() -> T>);

impl<T> Slot<T> {
    /// Where `T` lives in a cell.
    pub const PLACEMENT: Placement = Placement::of::<T>();

    /// Construct a `T` in `cell` from the result of `init`.
    ///
    /// For heap placement the block is allocated before `init` runs. If
    /// `init` returns `Err` or unwinds, the block is freed and `cell` is
    /// left as it was.
    ///
    /// # Safety
    ///
    /// `cell` must not hold a live value; it is overwritten without
    /// being dropped.
    pub unsafe fn construct_with<E>(
        cell: &mut Cell,
        init: impl FnOnce() -> Result<T, E>,
    ) -> Result<NonNull<T>, E> {
        match Self::PLACEMENT {
            Placement::Inline => {
                let value = init()?;
                let slot = cell.as_mut_ptr().cast::<T>();
                // SAFETY: PLACEMENT is Inline, so T fits the cell's size and
                // alignment.
                unsafe { slot.write(value) };
                // SAFETY: slot is derived from a reference.
                Ok(unsafe { NonNull::new_unchecked(slot) })
            }
            Placement::Heap => {
                let block = HeapBlock::<T>::allocate();
                let value = init()?;
                let ptr = block.fill(value);
                // SAFETY: a pointer fits the inline bytes and the cell is
                // 16-byte aligned.
                unsafe { cell.as_mut_ptr().cast::<*mut T>().write(ptr.as_ptr()) };
                Ok(ptr)
            }
        }
    }

    /// Relocate the `T` held by `src` into `dst`.
    ///
    /// Afterwards `src` holds no live value. For heap placement its stored
    /// pointer is nulled.
    ///
    /// # Safety
    ///
    /// `src` must hold a live `T`; `dst` must not hold a live value.
    pub unsafe fn move_construct(dst: &mut Cell, src: &mut Cell) {
        match Self::PLACEMENT {
            Placement::Inline => {
                // SAFETY: src holds a live T; the cells are distinct and
                // both sized and aligned for T.
                unsafe {
                    ptr::copy_nonoverlapping(
                        src.as_ptr().cast::<T>(),
                        dst.as_mut_ptr().cast::<T>(),
                        1,
                    )
                };
            }
            Placement::Heap => {
                // SAFETY: both cells are aligned for a pointer; src holds one.
                unsafe {
                    let block = src.as_mut_ptr().cast::<*mut T>().replace(ptr::null_mut());
                    dst.as_mut_ptr().cast::<*mut T>().write(block);
                }
            }
        }
    }

    /// Drop the `T` held by `cell` and release its heap block, if any.
    ///
    /// The stored pointer is nulled before the value's destructor runs,
    /// and the block is freed even if that destructor unwinds.
    ///
    /// # Safety
    ///
    /// `cell` must hold a live `T`. It holds none afterwards.
    pub unsafe fn destruct(cell: &mut Cell) {
        match Self::PLACEMENT {
            Placement::Inline => {
                // SAFETY: cell holds a live T in its inline bytes.
                unsafe { ptr::drop_in_place(cell.as_mut_ptr().cast::<T>()) };
            }
            Placement::Heap => {
                // SAFETY: cell holds a pointer to T's block.
                let raw = unsafe { cell.as_mut_ptr().cast::<*mut T>().replace(ptr::null_mut()) };
                if let Some(ptr) = NonNull::new(raw) {
                    let block = HeapBlock { ptr };
                    // SAFETY: the block holds a live T owned by this cell.
                    unsafe { ptr::drop_in_place(block.ptr.as_ptr()) };
                    drop(block);
                }
            }
        }
    }

    /// Move the `T` out of `cell`, releasing its heap block, if any.
    ///
    /// # Safety
    ///
    /// `cell` must hold a live `T`. It holds none afterwards.
    pub unsafe fn read(cell: &mut Cell) -> T {
        match Self::PLACEMENT {
            // SAFETY: cell holds a live T in its inline bytes.
            Placement::Inline => unsafe { cell.as_ptr().cast::<T>().read() },
            Placement::Heap => {
                // SAFETY: cell holds a non-null pointer to T's block.
                let block = unsafe {
                    let raw = cell.as_mut_ptr().cast::<*mut T>().replace(ptr::null_mut());
                    HeapBlock {
                        ptr: NonNull::new_unchecked(raw),
                    }
                };
                // SAFETY: the block holds a live T; reading it transfers
                // ownership, and the block is then freed without a drop.
                unsafe { block.ptr.as_ptr().read() }
            }
        }
    }

    /// Pointer to the `T` held by `cell`.
    ///
    /// # Safety
    ///
    /// `cell` must hold a live `T`.
    pub unsafe fn pointer(cell: &Cell) -> *const T {
        match Self::PLACEMENT {
            Placement::Inline => cell.as_ptr().cast::<T>(),
            // SAFETY: cell holds a pointer to T's block.
            Placement::Heap => unsafe { cell.as_ptr().cast::<*const T>().read() },
        }
    }

    /// Mutable pointer to the `T` held by `cell`.
    ///
    /// # Safety
    ///
    /// `cell` must hold a live `T`.
    pub unsafe fn pointer_mut(cell: &mut Cell) -> *mut T {
        match Self::PLACEMENT {
            Placement::Inline => cell.as_mut_ptr().cast::<T>(),
            // SAFETY: cell holds a pointer to T's block.
            Placement::Heap => unsafe { cell.as_ptr().cast::<*mut T>().read() },
        }
    }
}

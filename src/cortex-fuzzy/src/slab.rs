//! Reusable scratch memory for the dynamic-programming matcher.
//!
//! A [`Slab`] owns one `i16` and one `i32` buffer. A matcher call opens a
//! [`SlabArena`] over it and reserves zeroed sub-slices in order; requests
//! that do not fit strictly inside the remaining capacity get a fresh heap
//! buffer instead. Either way the caller sees a bounds-checked `[T]`.

use std::cell::RefCell;
use std::ops::{Deref, DerefMut};

/// Default capacity of the 16-bit buffer (score and run-length matrices).
pub const SLAB_16_SIZE: usize = 100 * 1024;

/// Default capacity of the 32-bit buffer (per-pattern offsets).
pub const SLAB_32_SIZE: usize = 2048;

/// Pre-sized scratch buffers.
///
/// A slab must not be shared between threads while a match is in flight;
/// the finders use [`with_thread_slab`] which keeps one per thread.
#[derive(Debug, Clone)]
pub struct Slab {
    i16: Vec<i16>,
    i32: Vec<i32>,
}

impl Slab {
    /// Creates a slab with the given element capacities.
    pub fn new(size16: usize, size32: usize) -> Self {
        Self {
            i16: vec![0; size16],
            i32: vec![0; size32],
        }
    }

    /// Capacity of the 16-bit buffer in elements.
    pub fn i16_capacity(&self) -> usize {
        self.i16.len()
    }

    /// Capacity of the 32-bit buffer in elements.
    pub fn i32_capacity(&self) -> usize {
        self.i32.len()
    }

    pub(crate) fn arena(&mut self) -> SlabArena<'_> {
        SlabArena {
            i16: &mut self.i16,
            i32: &mut self.i32,
        }
    }
}

impl Default for Slab {
    fn default() -> Self {
        Self::new(SLAB_16_SIZE, SLAB_32_SIZE)
    }
}

/// A zeroed view handed out by a [`SlabArena`].
#[derive(Debug)]
pub(crate) enum Buffer<'a, T> {
    Borrowed(&'a mut [T]),
    Owned(Vec<T>),
}

impl<T> Deref for Buffer<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        match self {
            Buffer::Borrowed(slice) => slice,
            Buffer::Owned(vec) => vec,
        }
    }
}

impl<T> DerefMut for Buffer<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        match self {
            Buffer::Borrowed(slice) => slice,
            Buffer::Owned(vec) => vec,
        }
    }
}

/// Sequential reservations over the unused tail of a [`Slab`].
#[derive(Debug, Default)]
pub(crate) struct SlabArena<'a> {
    i16: &'a mut [i16],
    i32: &'a mut [i32],
}

impl<'a> SlabArena<'a> {
    /// An arena with no backing memory; every reservation allocates.
    pub(crate) fn unbacked() -> Self {
        Self::default()
    }

    pub(crate) fn alloc16(&mut self, size: usize) -> Buffer<'a, i16> {
        reserve(&mut self.i16, size)
    }

    pub(crate) fn alloc32(&mut self, size: usize) -> Buffer<'a, i32> {
        reserve(&mut self.i32, size)
    }
}

fn reserve<'a, T: Copy + Default>(rest: &mut &'a mut [T], size: usize) -> Buffer<'a, T> {
    if rest.len() > size {
        let (head, tail) = std::mem::take(rest).split_at_mut(size);
        *rest = tail;
        head.fill(T::default());
        Buffer::Borrowed(head)
    } else {
        Buffer::Owned(vec![T::default(); size])
    }
}

thread_local! {
    static THREAD_SLAB: RefCell<Slab> = RefCell::new(Slab::default());
}

/// Runs `f` with this thread's shared slab.
///
/// A nested call on the same thread (a selector or tie-breaker that runs a
/// search of its own) gets `None` and the matchers allocate instead.
pub fn with_thread_slab<R>(f: impl FnOnce(Option<&mut Slab>) -> R) -> R {
    THREAD_SLAB.with(|cell| match cell.try_borrow_mut() {
        Ok(mut slab) => f(Some(&mut *slab)),
        Err(_) => f(None),
    })
}

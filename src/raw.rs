#![allow(unsafe_code)]

use alloc::alloc::{alloc, dealloc, handle_alloc_error, Layout};
use core::marker::PhantomData;
use core::mem;
use core::ptr::{self, NonNull};

use crate::error::DynArrayError;

/// Uninitialized storage for `cap` values of `T`.
///
/// A `RawBuf` owns the allocation only. Dropping it releases the memory
/// without running any element destructor: whoever wrote values into the
/// slots is responsible for them.
pub(crate) struct RawBuf<T> {
    ptr: NonNull<T>,
    cap: usize,
    _owns: PhantomData<T>,
}

// Safe: RawBuf is a unique owner of its slots, like Box<[MaybeUninit<T>]>
unsafe impl<T: Send> Send for RawBuf<T> {}
unsafe impl<T: Sync> Sync for RawBuf<T> {}

impl<T> RawBuf<T> {
    fn layout(cap: usize) -> Result<Layout, DynArrayError> {
        Layout::array::<T>(cap).map_err(|_| DynArrayError::CapacityOverflow { requested: cap })
    }

    fn allocate_layout(cap: usize, layout: Layout) -> Option<Self> {
        if layout.size() == 0 {
            // Zero-sized elements need no memory, but the buffer is still "held"
            return Some(Self {
                ptr: NonNull::dangling(),
                cap,
                _owns: PhantomData,
            });
        }

        // SAFETY: layout has a non-zero size
        let raw = unsafe { alloc(layout) }.cast::<T>();
        NonNull::new(raw).map(|ptr| Self {
            ptr,
            cap,
            _owns: PhantomData,
        })
    }

    /// Allocates room for exactly `cap` values.
    ///
    /// # Panics
    ///
    /// Panics with "capacity overflow" if `cap` values do not fit in a
    /// layout. Allocator failure goes through `handle_alloc_error`.
    pub(crate) fn allocate(cap: usize) -> Self {
        debug_assert!(cap > 0, "RawBuf is never created empty");
        let Ok(layout) = Self::layout(cap) else {
            capacity_overflow()
        };
        match Self::allocate_layout(cap, layout) {
            Some(buf) => buf,
            None => handle_alloc_error(layout),
        }
    }

    /// Allocates room for exactly `cap` values, reporting failure instead of
    /// panicking or aborting.
    pub(crate) fn try_allocate(cap: usize) -> Result<Self, DynArrayError> {
        debug_assert!(cap > 0, "RawBuf is never created empty");
        let layout = Self::layout(cap)?;
        Self::allocate_layout(cap, layout).ok_or(DynArrayError::AllocFailed {
            bytes: layout.size(),
            align: layout.align(),
        })
    }

    pub(crate) fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    pub(crate) fn capacity(&self) -> usize {
        self.cap
    }

    /// Bitwise-moves the first `len` values of `src` into this buffer.
    ///
    /// The values are not removed from `src`: until one of the two buffers is
    /// released without dropping its slots, both hold the same bits. Callers
    /// commit by installing `self` and releasing `src`, or abandon by
    /// releasing `self`; either way every value has exactly one owner again.
    ///
    /// # Safety
    ///
    /// `src` must hold at least `len` initialized values and `len` must not
    /// exceed `self.capacity()`.
    pub(crate) unsafe fn copy_prefix_from(&mut self, src: &RawBuf<T>, len: usize) {
        debug_assert!(len <= self.cap && len <= src.cap);
        ptr::copy_nonoverlapping(src.as_ptr(), self.as_ptr(), len);
    }
}

impl<T> Drop for RawBuf<T> {
    fn drop(&mut self) {
        if let Ok(layout) = Self::layout(self.cap) {
            if layout.size() != 0 {
                // SAFETY: ptr was returned by `alloc` with this same layout
                unsafe { dealloc(self.ptr.as_ptr().cast(), layout) };
            }
        }
    }
}

/// Values written into a contiguous run of slots.
///
/// The run starts at slot `start` and grows by one with every `push`. If the
/// `Fill` is dropped before `commit`, the written values are dropped in
/// reverse order, which is the rollback path for a constructor that panics or
/// returns an error partway through.
pub(crate) struct Fill<T> {
    slots: *mut T,
    start: usize,
    end: usize,
}

impl<T> Fill<T> {
    /// # Safety
    ///
    /// `slots` must point to a buffer whose slots from `start` onward are
    /// uninitialized and valid for as many writes as will be pushed.
    pub(crate) unsafe fn new(slots: *mut T, start: usize) -> Self {
        Self {
            slots,
            start,
            end: start,
        }
    }

    /// # Safety
    ///
    /// The buffer must have a free slot at index `self.end()`.
    pub(crate) unsafe fn push(&mut self, value: T) {
        self.slots.add(self.end).write(value);
        self.end += 1;
    }

    pub(crate) fn end(&self) -> usize {
        self.end
    }

    /// Keeps the written values and returns the index one past the last one.
    pub(crate) fn commit(self) -> usize {
        let end = self.end;
        mem::forget(self);
        end
    }
}

impl<T> Drop for Fill<T> {
    fn drop(&mut self) {
        for index in (self.start..self.end).rev() {
            // SAFETY: slots in start..end were written by `push` and never handed out
            unsafe { ptr::drop_in_place(self.slots.add(index)) };
        }
    }
}

#[cold]
#[inline(never)]
pub(crate) fn capacity_overflow() -> ! {
    panic!("capacity overflow");
}

#![allow(unsafe_code)]

use core::convert::Infallible;
use core::mem;
use core::ptr;
use core::slice;

use crate::cursor::Cursor;
use crate::cursor_mut::CursorMut;
use crate::error::DynArrayError;
use crate::raw::{capacity_overflow, Fill, RawBuf};
use crate::reverse::Reverse;

/// Capacity of the first buffer allocated by a growing push
const MIN_GROWN_CAPACITY: usize = 1;

/// A growable, contiguous array.
///
/// Slots `[0, len)` hold live values; slots `[len, capacity)` are
/// uninitialized and never read or dropped. No buffer is held while the
/// capacity is zero.
pub struct DynArray<T> {
    buf: Option<RawBuf<T>>,
    len: usize,
}

pub(crate) fn unwrap_infallible<R>(result: Result<R, Infallible>) -> R {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}

#[cold]
#[inline(never)]
fn empty_access(operation: &str) -> ! {
    panic!("{operation} called on an empty array");
}

impl<T> DynArray<T> {
    /// Creates an empty array. Does not allocate.
    #[must_use]
    pub const fn new() -> Self {
        Self { buf: None, len: 0 }
    }

    /// Creates an empty array with exactly `capacity` reserved slots.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` slots do not fit in memory.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: (capacity > 0).then(|| RawBuf::allocate(capacity)),
            len: 0,
        }
    }

    /// Creates an array of `len` values produced by `f(index)`.
    ///
    /// Allocates exactly `len` slots. If `f` returns an error (or panics),
    /// the values built so far are dropped in reverse order, the buffer is
    /// released, and the error is returned.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn try_from_fn<E, F>(len: usize, mut f: F) -> Result<Self, E>
    where
        F: FnMut(usize) -> Result<T, E>,
    {
        let mut array = Self::with_capacity(len);
        array.try_construct_tail(len, &mut f)?;
        Ok(array)
    }

    /// Creates an array of `len` values produced by `f(index)`.
    pub fn from_fn<F>(len: usize, mut f: F) -> Self
    where
        F: FnMut(usize) -> T,
    {
        unwrap_infallible(Self::try_from_fn(len, |index| Ok(f(index))))
    }

    /// Creates an array of `len` default values.
    #[must_use]
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        Self::from_fn(len, |_| T::default())
    }

    /// Creates an array holding `len` clones of `value`.
    #[must_use]
    pub fn from_elem(value: T, len: usize) -> Self
    where
        T: Clone,
    {
        Self::from_fn(len, |_| value.clone())
    }

    /// Creates an array holding clones of the values in `values`.
    #[must_use]
    pub fn from_slice(values: &[T]) -> Self
    where
        T: Clone,
    {
        Self::from_fn(values.len(), |index| values[index].clone())
    }

    /// Creates an array from a source whose length is known up front.
    ///
    /// Allocates exactly `iter.len()` slots. A source that under-delivers
    /// leaves the array shorter than its capacity; items beyond the reported
    /// length are never pulled.
    pub fn from_exact_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let mut iter = iter.into_iter();
        let len = iter.len();
        let mut array = Self::with_capacity(len);
        let Some(buf) = &array.buf else {
            return array;
        };

        // SAFETY: the buffer was just allocated with `len` free slots
        let mut fill = unsafe { Fill::new(buf.as_ptr(), 0) };
        for _ in 0..len {
            match iter.next() {
                Some(value) => unsafe { fill.push(value) },
                None => break,
            }
        }
        array.len = fill.commit();
        array
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.as_ref().map_or(0, RawBuf::capacity)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the backing pointer, or null if no buffer is held.
    ///
    /// The pointer is invalidated by the next call that mutates the array.
    #[must_use]
    pub fn as_ptr(&self) -> *const T {
        self.buf
            .as_ref()
            .map_or(ptr::null(), |buf| buf.as_ptr().cast_const())
    }

    /// Returns the backing pointer, or null if no buffer is held.
    #[must_use]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_ref().map_or(ptr::null_mut(), RawBuf::as_ptr)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        match &self.buf {
            // SAFETY: slots [0, len) hold live values
            Some(buf) => unsafe { slice::from_raw_parts(buf.as_ptr(), self.len) },
            None => &[],
        }
    }

    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        match &mut self.buf {
            // SAFETY: slots [0, len) hold live values, and `&mut self` is unique
            Some(buf) => unsafe { slice::from_raw_parts_mut(buf.as_ptr(), self.len) },
            None => &mut [],
        }
    }

    fn checked_index(&self, index: isize) -> Result<usize, DynArrayError> {
        usize::try_from(index)
            .ok()
            .filter(|&i| i < self.len)
            .ok_or(DynArrayError::IndexOutOfRange {
                index,
                len: self.len,
            })
    }

    /// Gets the value at `index`, checking bounds.
    ///
    /// # Errors
    ///
    /// Returns `DynArrayError::IndexOutOfRange` if `index` is negative or
    /// not less than `len()`.
    pub fn at(&self, index: isize) -> Result<&T, DynArrayError> {
        let index = self.checked_index(index)?;
        Ok(&self.as_slice()[index])
    }

    /// Mutable variant of [`DynArray::at`].
    ///
    /// # Errors
    ///
    /// Returns `DynArrayError::IndexOutOfRange` if `index` is negative or
    /// not less than `len()`.
    pub fn at_mut(&mut self, index: isize) -> Result<&mut T, DynArrayError> {
        let index = self.checked_index(index)?;
        Ok(&mut self.as_mut_slice()[index])
    }

    /// # Panics
    ///
    /// Panics if the array is empty.
    #[must_use]
    pub fn front(&self) -> &T {
        match self.as_slice().first() {
            Some(value) => value,
            None => empty_access("front"),
        }
    }

    /// # Panics
    ///
    /// Panics if the array is empty.
    pub fn front_mut(&mut self) -> &mut T {
        match self.as_mut_slice().first_mut() {
            Some(value) => value,
            None => empty_access("front_mut"),
        }
    }

    /// # Panics
    ///
    /// Panics if the array is empty.
    #[must_use]
    pub fn back(&self) -> &T {
        match self.as_slice().last() {
            Some(value) => value,
            None => empty_access("back"),
        }
    }

    /// # Panics
    ///
    /// Panics if the array is empty.
    pub fn back_mut(&mut self) -> &mut T {
        match self.as_mut_slice().last_mut() {
            Some(value) => value,
            None => empty_access("back_mut"),
        }
    }

    /// Exchanges buffers, lengths and capacities with `other`.
    pub fn swap_with(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    /// Moves the contents out, leaving `self` empty with no buffer.
    #[must_use]
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Returns an iterator over the values.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Returns an iterator that allows modifying each value.
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    pub(crate) fn grown_capacity(&self) -> usize {
        match self.capacity() {
            0 => MIN_GROWN_CAPACITY,
            cap => match cap.checked_mul(2) {
                Some(doubled) => doubled,
                None => capacity_overflow(),
            },
        }
    }

    /// Allocates `cap` slots and bitwise-moves the live prefix into them.
    ///
    /// The current buffer is left untouched; see `RawBuf::copy_prefix_from`
    /// for how the two copies are reconciled.
    fn relocate(&self, mut fresh: RawBuf<T>) -> RawBuf<T> {
        if let Some(buf) = &self.buf {
            // SAFETY: `buf` holds `len` live values and `fresh` has room for them
            unsafe { fresh.copy_prefix_from(buf, self.len) };
        }
        fresh
    }

    /// Installs a buffer produced by `relocate`, releasing the old one
    /// without dropping its values (they now live in `fresh`).
    fn install(&mut self, fresh: RawBuf<T>) {
        self.buf = Some(fresh);
    }

    /// Constructs values for slots `[len, new_len)` in the current buffer.
    ///
    /// `len` only changes once every new value was constructed; on failure
    /// the new values are dropped and the array is as before.
    fn try_construct_tail<E, F>(&mut self, new_len: usize, mut f: F) -> Result<(), E>
    where
        F: FnMut(usize) -> Result<T, E>,
    {
        debug_assert!(new_len <= self.capacity());
        let Some(buf) = &self.buf else {
            return Ok(());
        };

        // SAFETY: slots [len, capacity) are uninitialized and new_len <= capacity
        let mut fill = unsafe { Fill::new(buf.as_ptr(), self.len) };
        while fill.end() < new_len {
            let value = f(fill.end())?;
            unsafe { fill.push(value) };
        }
        self.len = fill.commit();
        Ok(())
    }

    /// Appends `count` values built by `f(index)` into already reserved slots.
    pub(crate) fn extend_from_fn<F>(&mut self, count: usize, mut f: F)
    where
        F: FnMut(usize) -> T,
    {
        let new_len = self.len + count;
        unwrap_infallible(self.try_construct_tail(new_len, |index| Ok(f(index))));
    }

    /// Reserves capacity for exactly `new_cap` values.
    ///
    /// Does nothing if `new_cap` does not exceed the current capacity;
    /// otherwise reallocates and moves the live values over.
    ///
    /// # Panics
    ///
    /// Panics if `new_cap` slots do not fit in memory.
    pub fn reserve(&mut self, new_cap: usize) {
        if new_cap <= self.capacity() {
            return;
        }
        let fresh = self.relocate(RawBuf::allocate(new_cap));
        self.install(fresh);
    }

    /// Fallible variant of [`DynArray::reserve`].
    ///
    /// # Errors
    ///
    /// Returns `DynArrayError::CapacityOverflow` or
    /// `DynArrayError::AllocFailed`; the array is unchanged in both cases.
    pub fn try_reserve(&mut self, new_cap: usize) -> Result<(), DynArrayError> {
        if new_cap <= self.capacity() {
            return Ok(());
        }
        let fresh = self.relocate(RawBuf::try_allocate(new_cap)?);
        self.install(fresh);
        Ok(())
    }

    /// Reallocates so that the capacity equals the length.
    ///
    /// An empty array releases its buffer entirely.
    pub fn shrink_to_fit(&mut self) {
        if self.len >= self.capacity() {
            return;
        }
        if self.len == 0 {
            self.buf = None;
            return;
        }
        let fresh = self.relocate(RawBuf::allocate(self.len));
        self.install(fresh);
    }

    /// Drops the values at `[new_len, len)`. Capacity is unchanged.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let tail: *mut [T] = &mut self.as_mut_slice()[new_len..];
        // Shorten first: a panicking destructor must not cause a double drop
        self.len = new_len;
        // SAFETY: the tail is no longer reachable through `self`
        unsafe { ptr::drop_in_place(tail) };
    }

    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Resizes to `new_len`, constructing new values with `f`.
    ///
    /// Shrinking drops the tail. Growing within the capacity constructs
    /// only the new values; growing beyond it allocates exactly `new_len`
    /// slots, moves the live values over, then constructs the new ones.
    /// Growth is all-or-nothing: if `f` fails, every value constructed by
    /// this call is dropped and the length, capacity, buffer and values are
    /// as before.
    ///
    /// # Errors
    ///
    /// Returns the first error produced by `f`.
    pub fn try_resize_with<E, F>(&mut self, new_len: usize, mut f: F) -> Result<(), E>
    where
        F: FnMut() -> Result<T, E>,
    {
        if new_len <= self.len {
            self.truncate(new_len);
            return Ok(());
        }
        if new_len <= self.capacity() {
            return self.try_construct_tail(new_len, |_| f());
        }

        let fresh = self.relocate(RawBuf::allocate(new_len));
        // SAFETY: `fresh` has new_len slots and only [0, len) are occupied
        let mut fill = unsafe { Fill::new(fresh.as_ptr(), self.len) };
        while fill.end() < new_len {
            let value = f()?;
            unsafe { fill.push(value) };
        }
        self.len = fill.commit();
        self.install(fresh);
        Ok(())
    }

    /// Resizes to `new_len`, filling new slots with values from `f`.
    pub fn resize_with<F>(&mut self, new_len: usize, mut f: F)
    where
        F: FnMut() -> T,
    {
        unwrap_infallible(self.try_resize_with(new_len, || Ok(f())));
    }

    /// Resizes to `new_len`, filling new slots with clones of `value`.
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        self.resize_with(new_len, || value.clone());
    }

    /// Resizes to `new_len`, filling new slots with default values.
    pub fn resize_default(&mut self, new_len: usize)
    where
        T: Default,
    {
        self.resize_with(new_len, T::default);
    }

    /// Appends the value produced by `f`.
    ///
    /// When the array is full, a buffer of twice the capacity (or one slot
    /// from empty) is allocated and the live values moved into it before
    /// `f` runs. If `f` fails, that buffer is released and the array is
    /// observably unchanged.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `f`.
    pub fn try_push_with<E, F>(&mut self, f: F) -> Result<(), E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if self.len == self.capacity() {
            let fresh = self.relocate(RawBuf::allocate(self.grown_capacity()));
            let value = f()?;
            // SAFETY: the grown buffer has at least len + 1 slots
            unsafe { fresh.as_ptr().add(self.len).write(value) };
            self.install(fresh);
        } else {
            let value = f()?;
            // SAFETY: len < capacity, so a buffer is held and slot len is free
            unsafe { self.as_mut_ptr().add(self.len).write(value) };
        }
        self.len += 1;
        Ok(())
    }

    /// Appends the value produced by `f`.
    pub fn push_with<F>(&mut self, f: F)
    where
        F: FnOnce() -> T,
    {
        unwrap_infallible(self.try_push_with(|| Ok(f())));
    }

    /// Appends `value`.
    pub fn push(&mut self, value: T) {
        self.push_with(|| value);
    }

    /// Appends a clone of `value`. The clone is taken after any growth.
    pub fn push_cloned(&mut self, value: &T)
    where
        T: Clone,
    {
        self.push_with(|| value.clone());
    }

    /// Removes and returns the last value.
    ///
    /// Returns `None` if the array is empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: slot len held a live value and is now outside the live range
        Some(unsafe { self.as_mut_ptr().add(self.len).read() })
    }

    /// Drops the last value.
    ///
    /// # Panics
    ///
    /// Panics if the array is empty.
    pub fn pop_back(&mut self) {
        assert!(self.len > 0, "Cannot pop from empty array");
        self.truncate(self.len - 1);
    }

    /// Read-only cursor at the first value.
    #[must_use]
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::new(self.as_slice(), 0)
    }

    /// Read-only cursor one past the last value.
    #[must_use]
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::end_of(self.as_slice())
    }

    /// Mutable cursor at the first value.
    ///
    /// A mutable cursor borrows the array uniquely, so `begin_mut` and
    /// `end_mut` cannot be held together. Compare against
    /// [`CursorMut::end_position`] instead of an end cursor, and use
    /// [`CursorMut::reborrow`] for a second cursor into the same values:
    ///
    /// ```
    /// # use dynarray::dynarr;
    /// let mut array = dynarr![1, 2, 3];
    /// let mut cursor = array.begin_mut();
    /// while cursor.position() != cursor.end_position() {
    ///     *cursor *= 2;
    ///     cursor.inc();
    /// }
    /// assert_eq!(array, [2, 4, 6]);
    /// ```
    pub fn begin_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut::new(self.as_mut_slice(), 0)
    }

    /// Mutable cursor one past the last value.
    pub fn end_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut::end_of(self.as_mut_slice())
    }

    /// Reverse cursor at the last value.
    #[must_use]
    pub fn rbegin(&self) -> Reverse<Cursor<'_, T>> {
        Reverse::new(self.end())
    }

    /// Reverse cursor one before the first value.
    #[must_use]
    pub fn rend(&self) -> Reverse<Cursor<'_, T>> {
        Reverse::new(self.begin())
    }

    /// Mutable reverse cursor at the last value.
    pub fn rbegin_mut(&mut self) -> Reverse<CursorMut<'_, T>> {
        Reverse::new(self.end_mut())
    }

    /// Mutable reverse cursor one before the first value.
    pub fn rend_mut(&mut self) -> Reverse<CursorMut<'_, T>> {
        Reverse::new(self.begin_mut())
    }

    /// Splits into the buffer and the number of live values in it.
    pub(crate) fn into_raw_parts(mut self) -> (Option<RawBuf<T>>, usize) {
        let len = mem::replace(&mut self.len, 0);
        (self.buf.take(), len)
    }
}

impl<T> Drop for DynArray<T> {
    fn drop(&mut self) {
        // SAFETY: the live values are dropped in index order; the buffer is
        // released afterwards by RawBuf's own Drop
        unsafe { ptr::drop_in_place(self.as_mut_slice()) };
    }
}

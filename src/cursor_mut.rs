use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, AddAssign, Deref, DerefMut, Index, IndexMut, Sub, SubAssign};

use crate::cursor::{end_position, out_of_range, resolve, Cursor};
use crate::reverse::Step;

/// Mutable position within the live values of a `DynArray`.
///
/// Same positional contract as [`Cursor`], but dereferencing yields `&mut T`.
/// Because it grants unique access, a `CursorMut` cannot be copied; use
/// [`CursorMut::reborrow`] for a temporary second cursor and
/// [`CursorMut::as_cursor`] for a read-only snapshot.
pub struct CursorMut<'a, T> {
    values: &'a mut [T],
    pos: isize,
}

impl<'a, T> CursorMut<'a, T> {
    pub(crate) fn new(values: &'a mut [T], pos: isize) -> Self {
        Self { values, pos }
    }

    pub(crate) fn end_of(values: &'a mut [T]) -> Self {
        let pos = end_position(values);
        Self::new(values, pos)
    }

    #[must_use]
    pub fn position(&self) -> isize {
        self.pos
    }

    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.get_at(0)
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.get_at_mut(0)
    }

    #[must_use]
    pub fn get_at(&self, offset: isize) -> Option<&T> {
        resolve(self.pos, offset, self.values.len()).map(|index| &self.values[index])
    }

    pub fn get_at_mut(&mut self, offset: isize) -> Option<&mut T> {
        resolve(self.pos, offset, self.values.len()).map(|index| &mut self.values[index])
    }

    /// # Panics
    ///
    /// Panics if the target position is outside the live range.
    #[must_use]
    pub fn at(&self, offset: isize) -> &T {
        match self.get_at(offset) {
            Some(value) => value,
            None => out_of_range(self.pos.saturating_add(offset), self.values.len()),
        }
    }

    /// # Panics
    ///
    /// Panics if the target position is outside the live range.
    pub fn at_mut(&mut self, offset: isize) -> &mut T {
        let (pos, len) = (self.pos, self.values.len());
        match resolve(pos, offset, len) {
            Some(index) => &mut self.values[index],
            None => out_of_range(pos.saturating_add(offset), len),
        }
    }

    /// Consumes the cursor, returning the value it refers to for the whole
    /// borrow, or `None` outside the live range.
    pub fn into_mut(self) -> Option<&'a mut T> {
        let index = resolve(self.pos, 0, self.values.len())?;
        let values = self.values;
        values.get_mut(index)
    }

    pub fn inc(&mut self) -> &mut Self {
        self.pos += 1;
        self
    }

    pub fn dec(&mut self) -> &mut Self {
        self.pos -= 1;
        self
    }

    /// Moves one position forward, returning the previous position.
    ///
    /// Unlike [`Cursor::post_inc`] this cannot return the old cursor, since
    /// two mutable cursors would alias. `self.reborrow() - 1` is a
    /// temporary cursor at the previous position (see [`CursorMut::reborrow`]).
    pub fn post_inc(&mut self) -> isize {
        let old = self.pos;
        self.pos += 1;
        old
    }

    /// Moves one position back, returning the previous position.
    ///
    /// See [`CursorMut::post_inc`] for getting a cursor at the old position.
    pub fn post_dec(&mut self) -> isize {
        let old = self.pos;
        self.pos -= 1;
        old
    }

    /// Position one past the last value, where `end_mut` would start.
    #[must_use]
    pub fn end_position(&self) -> isize {
        end_position(&*self.values)
    }

    #[must_use]
    pub fn offset_from(&self, origin: &Self) -> isize {
        self.pos - origin.pos
    }

    /// A shorter-lived cursor at the same position.
    pub fn reborrow(&mut self) -> CursorMut<'_, T> {
        CursorMut::new(&mut *self.values, self.pos)
    }

    /// A read-only cursor at the same position, valid while `self` is
    /// borrowed.
    #[must_use]
    pub fn as_cursor(&self) -> Cursor<'_, T> {
        Cursor::new(&*self.values, self.pos)
    }

    /// Gives up write access, keeping the full borrow.
    #[must_use]
    pub fn into_cursor(self) -> Cursor<'a, T> {
        Cursor::new(self.values, self.pos)
    }

    fn key(&self) -> (*const T, isize) {
        (self.values.as_ptr(), self.pos)
    }
}

impl<T> Step for CursorMut<'_, T> {
    fn position(&self) -> isize {
        self.pos
    }

    fn step(&mut self, delta: isize) {
        self.pos += delta;
    }
}

impl<T> Deref for CursorMut<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.at(0)
    }
}

impl<T> DerefMut for CursorMut<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        self.at_mut(0)
    }
}

impl<T> Index<isize> for CursorMut<'_, T> {
    type Output = T;

    fn index(&self, offset: isize) -> &T {
        self.at(offset)
    }
}

impl<T> IndexMut<isize> for CursorMut<'_, T> {
    fn index_mut(&mut self, offset: isize) -> &mut T {
        self.at_mut(offset)
    }
}

impl<T> Add<isize> for CursorMut<'_, T> {
    type Output = Self;

    fn add(mut self, delta: isize) -> Self {
        self.pos += delta;
        self
    }
}

impl<T> Sub<isize> for CursorMut<'_, T> {
    type Output = Self;

    fn sub(mut self, delta: isize) -> Self {
        self.pos -= delta;
        self
    }
}

impl<T> AddAssign<isize> for CursorMut<'_, T> {
    fn add_assign(&mut self, delta: isize) {
        self.pos += delta;
    }
}

impl<T> SubAssign<isize> for CursorMut<'_, T> {
    fn sub_assign(&mut self, delta: isize) {
        self.pos -= delta;
    }
}

impl<'a, T> Sub<&CursorMut<'a, T>> for &CursorMut<'a, T> {
    type Output = isize;

    fn sub(self, origin: &CursorMut<'a, T>) -> isize {
        self.offset_from(origin)
    }
}

impl<T> PartialEq for CursorMut<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<T> Eq for CursorMut<'_, T> {}

impl<T> PartialOrd for CursorMut<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for CursorMut<'_, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl<T> fmt::Debug for CursorMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorMut")
            .field("position", &self.pos)
            .field("len", &self.values.len())
            .finish()
    }
}

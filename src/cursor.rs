use core::cmp::Ordering;
use core::fmt;
use core::ops::{Add, AddAssign, Deref, Index, Sub, SubAssign};

use crate::reverse::Step;

/// Read-only position within the live values of a `DynArray`.
///
/// A cursor is a borrowed view plus a signed position. It may be moved
/// anywhere, including before the first value or past the end; only
/// dereferencing requires the position to be within `[0, len)`, and panics
/// otherwise. Comparing cursors taken from different arrays gives an
/// unspecified (but safe) answer.
pub struct Cursor<'a, T> {
    values: &'a [T],
    pos: isize,
}

#[cold]
#[inline(never)]
pub(crate) fn out_of_range(pos: isize, len: usize) -> ! {
    panic!("cursor position {pos} is outside the live range of length {len}");
}

#[allow(clippy::cast_possible_wrap)] // slice lengths never exceed isize::MAX
pub(crate) fn end_position<T>(values: &[T]) -> isize {
    values.len() as isize
}

pub(crate) fn resolve(pos: isize, offset: isize, len: usize) -> Option<usize> {
    let index = usize::try_from(pos.checked_add(offset)?).ok()?;
    (index < len).then_some(index)
}

impl<'a, T> Cursor<'a, T> {
    pub(crate) fn new(values: &'a [T], pos: isize) -> Self {
        Self { values, pos }
    }

    pub(crate) fn end_of(values: &'a [T]) -> Self {
        Self::new(values, end_position(values))
    }

    /// Index of the value this cursor refers to.
    #[must_use]
    pub fn position(&self) -> isize {
        self.pos
    }

    /// The value at the cursor, or `None` outside the live range.
    #[must_use]
    pub fn get(&self) -> Option<&'a T> {
        self.get_at(0)
    }

    /// The value `offset` positions away, or `None` outside the live range.
    #[must_use]
    pub fn get_at(&self, offset: isize) -> Option<&'a T> {
        let values = self.values;
        resolve(self.pos, offset, values.len()).map(|index| &values[index])
    }

    /// The value `offset` positions away.
    ///
    /// # Panics
    ///
    /// Panics if the target position is outside the live range.
    #[must_use]
    pub fn at(&self, offset: isize) -> &'a T {
        match self.get_at(offset) {
            Some(value) => value,
            None => out_of_range(self.pos.saturating_add(offset), self.values.len()),
        }
    }

    /// Moves one position forward.
    pub fn inc(&mut self) -> &mut Self {
        self.pos += 1;
        self
    }

    /// Moves one position back.
    pub fn dec(&mut self) -> &mut Self {
        self.pos -= 1;
        self
    }

    /// Moves one position forward, returning the cursor as it was.
    pub fn post_inc(&mut self) -> Self {
        let old = *self;
        self.pos += 1;
        old
    }

    /// Moves one position back, returning the cursor as it was.
    pub fn post_dec(&mut self) -> Self {
        let old = *self;
        self.pos -= 1;
        old
    }

    /// Signed number of positions from `origin` to `self`.
    #[must_use]
    pub fn offset_from(&self, origin: &Self) -> isize {
        self.pos - origin.pos
    }

    fn key(&self) -> (*const T, isize) {
        (self.values.as_ptr(), self.pos)
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> Step for Cursor<'_, T> {
    fn position(&self) -> isize {
        self.pos
    }

    fn step(&mut self, delta: isize) {
        self.pos += delta;
    }
}

impl<T> Deref for Cursor<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        self.at(0)
    }
}

impl<T> Index<isize> for Cursor<'_, T> {
    type Output = T;

    fn index(&self, offset: isize) -> &T {
        self.at(offset)
    }
}

impl<T> Add<isize> for Cursor<'_, T> {
    type Output = Self;

    fn add(mut self, delta: isize) -> Self {
        self.pos += delta;
        self
    }
}

impl<T> Sub<isize> for Cursor<'_, T> {
    type Output = Self;

    fn sub(mut self, delta: isize) -> Self {
        self.pos -= delta;
        self
    }
}

impl<T> AddAssign<isize> for Cursor<'_, T> {
    fn add_assign(&mut self, delta: isize) {
        self.pos += delta;
    }
}

impl<T> SubAssign<isize> for Cursor<'_, T> {
    fn sub_assign(&mut self, delta: isize) {
        self.pos -= delta;
    }
}

impl<'a, T> Sub for Cursor<'a, T> {
    type Output = isize;

    fn sub(self, origin: Cursor<'a, T>) -> isize {
        self.offset_from(&origin)
    }
}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T> PartialOrd for Cursor<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Cursor<'_, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl<T> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.pos)
            .field("len", &self.values.len())
            .finish()
    }
}

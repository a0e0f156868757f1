use core::cmp::Ordering;
use core::ops::{Add, AddAssign, Deref, DerefMut, Index, IndexMut, Sub, SubAssign};

use crate::cursor::Cursor;
use crate::cursor_mut::CursorMut;

/// Positional arithmetic shared by [`Cursor`] and [`CursorMut`].
pub trait Step {
    /// Signed position of the cursor.
    fn position(&self) -> isize;

    /// Moves the cursor by `delta` positions (negative moves back).
    fn step(&mut self, delta: isize);
}

/// Cursor that walks a `DynArray` from the back.
///
/// Wraps a base cursor and refers to the value just *before* the base
/// position, so `Reverse::new(array.end())` refers to the last value and
/// `Reverse::new(array.begin())` is the reverse end. Moving forward moves the
/// base back.
#[derive(Debug, Clone, Copy)]
pub struct Reverse<C> {
    base: C,
}

impl<C: Step> Reverse<C> {
    pub fn new(base: C) -> Self {
        Self { base }
    }

    /// The wrapped cursor, one position after the value this one refers to.
    pub fn base(&self) -> &C {
        &self.base
    }

    pub fn into_base(self) -> C {
        self.base
    }

    /// Index of the value this cursor refers to.
    pub fn position(&self) -> isize {
        self.base.position() - 1
    }

    pub fn inc(&mut self) -> &mut Self {
        self.base.step(-1);
        self
    }

    pub fn dec(&mut self) -> &mut Self {
        self.base.step(1);
        self
    }

    /// Signed number of reverse steps from `origin` to `self`.
    pub fn offset_from(&self, origin: &Self) -> isize {
        origin.base.position() - self.base.position()
    }
}

impl<C: Step + Copy> Reverse<C> {
    pub fn post_inc(&mut self) -> Self {
        let old = *self;
        self.base.step(-1);
        old
    }

    pub fn post_dec(&mut self) -> Self {
        let old = *self;
        self.base.step(1);
        old
    }
}

impl<'a, T> Reverse<Cursor<'a, T>> {
    #[must_use]
    pub fn get(&self) -> Option<&'a T> {
        self.base.get_at(-1)
    }

    /// The value `offset` reverse steps away.
    ///
    /// # Panics
    ///
    /// Panics if the target position is outside the live range.
    #[must_use]
    pub fn at(&self, offset: isize) -> &'a T {
        self.base.at(-1 - offset)
    }
}

impl<T> Reverse<CursorMut<'_, T>> {
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        self.base.get_at(-1)
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.base.get_at_mut(-1)
    }
}

impl<T> Deref for Reverse<Cursor<'_, T>> {
    type Target = T;

    fn deref(&self) -> &T {
        self.base.at(-1)
    }
}

impl<T> Index<isize> for Reverse<Cursor<'_, T>> {
    type Output = T;

    fn index(&self, offset: isize) -> &T {
        self.base.at(-1 - offset)
    }
}

impl<T> Deref for Reverse<CursorMut<'_, T>> {
    type Target = T;

    fn deref(&self) -> &T {
        self.base.at(-1)
    }
}

impl<T> DerefMut for Reverse<CursorMut<'_, T>> {
    fn deref_mut(&mut self) -> &mut T {
        self.base.at_mut(-1)
    }
}

impl<T> Index<isize> for Reverse<CursorMut<'_, T>> {
    type Output = T;

    fn index(&self, offset: isize) -> &T {
        self.base.at(-1 - offset)
    }
}

impl<T> IndexMut<isize> for Reverse<CursorMut<'_, T>> {
    fn index_mut(&mut self, offset: isize) -> &mut T {
        self.base.at_mut(-1 - offset)
    }
}

impl<C: Step> Add<isize> for Reverse<C> {
    type Output = Self;

    fn add(mut self, delta: isize) -> Self {
        self.base.step(-delta);
        self
    }
}

impl<C: Step> Sub<isize> for Reverse<C> {
    type Output = Self;

    fn sub(mut self, delta: isize) -> Self {
        self.base.step(delta);
        self
    }
}

impl<C: Step> AddAssign<isize> for Reverse<C> {
    fn add_assign(&mut self, delta: isize) {
        self.base.step(-delta);
    }
}

impl<C: Step> SubAssign<isize> for Reverse<C> {
    fn sub_assign(&mut self, delta: isize) {
        self.base.step(delta);
    }
}

impl<C: Step> Sub for Reverse<C> {
    type Output = isize;

    fn sub(self, origin: Self) -> isize {
        self.offset_from(&origin)
    }
}

impl<C: PartialEq> PartialEq for Reverse<C> {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
    }
}

impl<C: Eq> Eq for Reverse<C> {}

impl<C: PartialOrd> PartialOrd for Reverse<C> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        other.base.partial_cmp(&self.base)
    }
}

impl<C: Ord> Ord for Reverse<C> {
    fn cmp(&self, other: &Self) -> Ordering {
        other.base.cmp(&self.base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_refers_before_base() {
        let values = [1, 2, 3];
        let rbegin = Reverse::new(Cursor::end_of(&values));
        let rend = Reverse::new(Cursor::new(&values, 0));
        assert_eq!(*rbegin, 3);
        assert_eq!(rbegin.position(), 2);
        assert_eq!(rend.position(), -1);
        assert_eq!(rend - rbegin, 3);
        assert!(rbegin < rend);
    }

    #[test]
    fn test_reverse_indexing() {
        let values = [1, 2, 3, 4];
        let rbegin = Reverse::new(Cursor::end_of(&values));
        assert_eq!(rbegin[0], 4);
        assert_eq!(rbegin[3], 1);
        assert_eq!(rbegin.at(1), &3);
        assert_eq!((rbegin + 4).get(), None);
    }
}

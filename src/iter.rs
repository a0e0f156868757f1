#![allow(unsafe_code)]

use core::fmt;
use core::iter::FusedIterator;
use core::ptr;
use core::slice;

use crate::core::DynArray;
use crate::raw::RawBuf;

/// Owning iterator over the values of a `DynArray`
///
/// Values not consumed are dropped together with the iterator.
pub struct IntoIter<T> {
    buf: Option<RawBuf<T>>,
    front: usize,
    back: usize,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(array: DynArray<T>) -> Self {
        let (buf, len) = array.into_raw_parts();
        Self {
            buf,
            front: 0,
            back: len,
        }
    }

    /// The values not yet yielded.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        match &self.buf {
            // SAFETY: slots [front, back) still hold live values
            Some(buf) => unsafe {
                slice::from_raw_parts(buf.as_ptr().add(self.front), self.back - self.front)
            },
            None => &[],
        }
    }

    fn read(&self, index: usize) -> Option<T> {
        let buf = self.buf.as_ref()?;
        // SAFETY: callers pass an index that just left [front, back)
        Some(unsafe { buf.as_ptr().add(index).read() })
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.front += 1;
        self.read(self.front - 1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        self.read(self.back)
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        if let Some(buf) = &self.buf {
            // SAFETY: the values in [front, back) are owned by the iterator and never yielded
            unsafe {
                let remaining =
                    ptr::slice_from_raw_parts_mut(buf.as_ptr().add(self.front), self.back - self.front);
                ptr::drop_in_place(remaining);
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T> IntoIterator for DynArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}

impl<'a, T> IntoIterator for &'a DynArray<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynArray<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#![no_std]
#![deny(unsafe_code)]

//! `DynArray`: a growable, contiguous array with explicit rollback.
//!
//! `DynArray<T>` keeps raw storage separate from element construction. Every
//! operation that constructs several values tracks how many it has built, so
//! a constructor that panics or returns an error partway through only ever
//! drops the values it created, in reverse order, before the failure
//! propagates.
//!
//! This crate is `no_std` compatible and only needs `alloc`.
//!
//! # Failure Guarantees
//!
//! - Growth (`push*`, `resize*` beyond the capacity, `reserve`) is
//!   all-or-nothing: on failure the length, capacity, buffer and values are
//!   exactly as before the call.
//! - Growth within the capacity (`resize*`) drops only the values it added.
//! - Sized construction (`from_fn`, `with_len`, `from_elem`, `clone`) either
//!   produces the whole array or nothing.
//! - `clone_from` drops the target first, so a failing clone leaves it empty.
//!
//! Fallible constructors are expressed with `try_*` methods that hand back
//! the caller's own error:
//!
//! ```
//! # use dynarray::DynArray;
//! let mut array = DynArray::from([1, 2, 3]);
//! let capacity = array.capacity();
//!
//! let result = array.try_push_with(|| "42".parse::<i32>());
//! assert!(result.is_ok());
//!
//! let result = array.try_push_with(|| "forty-two".parse::<i32>());
//! assert!(result.is_err());
//! assert_eq!(array, [1, 2, 3, 42]);
//! assert_eq!(array.capacity(), capacity * 2);
//! ```
//!
//! # Capacity
//!
//! A push into a full array doubles the capacity (an empty array grows to
//! one slot), so `n` pushes reallocate `O(log n)` times. `resize` beyond the
//! capacity and `reserve` allocate exactly what was asked for.
//!
//! ```
//! # use dynarray::dynarr;
//! let mut array = dynarr![1, 2, 3];
//! array.resize(5, 0);
//! assert_eq!(array, [1, 2, 3, 0, 0]);
//! assert_eq!(array.capacity(), 5);
//!
//! array.resize_default(2);
//! assert_eq!(array, [1, 2]);
//! assert_eq!(array.capacity(), 5);
//!
//! array.shrink_to_fit();
//! assert_eq!(array.capacity(), 2);
//! ```
//!
//! # Access
//!
//! Indexing with `[]` goes through the slice view. `at` is the checked form
//! and reports a distinct error for any index outside `[0, len)`:
//!
//! ```
//! # use dynarray::{dynarr, DynArrayError};
//! let array = dynarr![10, 20];
//! assert_eq!(array[1], 20);
//! assert_eq!(array.at(1), Ok(&20));
//! assert_eq!(
//!     array.at(-1),
//!     Err(DynArrayError::IndexOutOfRange { index: -1, len: 2 })
//! );
//! ```
//!
//! # Cursors
//!
//! Besides the usual iterators, `DynArray` hands out random-access cursors.
//! A cursor is a position that can be moved and compared freely; it only
//! needs to be inside the live range when dereferenced.
//!
//! ```
//! # use dynarray::dynarr;
//! let mut array = dynarr![1, 2, 3, 4];
//!
//! let begin = array.begin();
//! let end = array.end();
//! assert_eq!(end - begin, 4);
//! assert_eq!(*(begin + 2), 3);
//! assert_eq!(begin[3], 4);
//!
//! let mut cursor = array.begin_mut();
//! cursor += 1;
//! *cursor = 20;
//! cursor[1] = 30;
//! assert_eq!(array, [1, 20, 30, 4]);
//!
//! let mut reverse = array.rbegin();
//! assert_eq!(*reverse, 4);
//! reverse.inc();
//! assert_eq!(*reverse, 30);
//! ```

mod core;
mod cursor;
mod cursor_mut;
mod error;
mod iter;
mod raw;
mod reverse;
mod traits;

extern crate alloc;

#[cfg(test)]
extern crate std;

// Re-export public types and traits
pub use crate::core::DynArray;
pub use cursor::Cursor;
pub use cursor_mut::CursorMut;
pub use error::DynArrayError;
pub use iter::IntoIter;
pub use reverse::{Reverse, Step};

#[cfg(any(target_pointer_width = "32", target_pointer_width = "64"))]
static_assertions::assert_eq_size!(DynArray<u64>, [usize; 3]);
static_assertions::assert_impl_all!(DynArray<u32>: Send, Sync, Clone, Default);
static_assertions::assert_not_impl_any!(DynArray<::core::cell::Cell<u8>>: Sync);
static_assertions::assert_impl_all!(Cursor<'static, u8>: Copy);
static_assertions::assert_not_impl_any!(CursorMut<'static, u8>: Clone);

/// Creates a [`DynArray`] from a list of values or a repeated value.
///
/// ```
/// # use dynarray::dynarr;
/// let empty: dynarray::DynArray<u8> = dynarr![];
/// assert!(empty.is_empty());
///
/// let zeros = dynarr![0; 3];
/// assert_eq!(zeros, [0, 0, 0]);
///
/// let listed = dynarr!["a", "b"];
/// assert_eq!(listed.capacity(), 2);
/// ```
#[macro_export]
macro_rules! dynarr {
    () => {
        $crate::DynArray::new()
    };
    ($value:expr; $len:expr) => {
        $crate::DynArray::from_elem($value, $len)
    };
    ($($value:expr),+ $(,)?) => {
        $crate::DynArray::from([$($value),+])
    };
}

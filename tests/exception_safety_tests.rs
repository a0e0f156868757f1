use std::cell::{Cell, RefCell};
use std::panic::{catch_unwind, AssertUnwindSafe};

use dynarray::DynArray;

thread_local! {
    /// Constructions left before the next one panics.
    static BUDGET: Cell<usize> = const { Cell::new(usize::MAX) };
    /// Number of `Flaky` values currently alive on this thread.
    static LIVE: Cell<isize> = const { Cell::new(0) };
    /// Ids of dropped `Flaky` values, in drop order.
    static DROPS: RefCell<Vec<u32>> = const { RefCell::new(Vec::new()) };
}

/// Value whose construction (default or clone) panics once the budget is
/// spent.
#[derive(Debug, PartialEq)]
struct Flaky(u32);

impl Flaky {
    fn new(id: u32) -> Self {
        BUDGET.with(|budget| {
            let left = budget.get();
            if left == 0 {
                panic!("construction budget exhausted");
            }
            budget.set(left - 1);
        });
        LIVE.with(|live| live.set(live.get() + 1));
        Flaky(id)
    }
}

impl Clone for Flaky {
    fn clone(&self) -> Self {
        Flaky::new(self.0)
    }
}

impl Default for Flaky {
    fn default() -> Self {
        Flaky::new(0)
    }
}

impl Drop for Flaky {
    fn drop(&mut self) {
        LIVE.with(|live| live.set(live.get() - 1));
        DROPS.with(|drops| drops.borrow_mut().push(self.0));
    }
}

/// Let the next `successes` constructions pass; the one after panics.
fn fail_after(successes: usize) {
    BUDGET.with(|budget| budget.set(successes));
}

fn never_fail() {
    BUDGET.with(|budget| budget.set(usize::MAX));
}

fn live() -> isize {
    LIVE.with(Cell::get)
}

fn take_drops() -> Vec<u32> {
    DROPS.with(|drops| std::mem::take(&mut *drops.borrow_mut()))
}

fn ids(array: &DynArray<Flaky>) -> Vec<u32> {
    array.iter().map(|value| value.0).collect()
}

fn full_array(len: u32) -> DynArray<Flaky> {
    never_fail();
    let mut array = DynArray::with_capacity(len as usize);
    for id in 1..=len {
        array.push(Flaky::new(id));
    }
    array
}

#[test]
fn test_push_failure_during_growth_restores_array() {
    let mut array = full_array(4);
    let extra = Flaky::new(99);
    let (ptr, cap) = (array.as_ptr(), array.capacity());
    assert_eq!(cap, 4);

    fail_after(0);
    let result = catch_unwind(AssertUnwindSafe(|| array.push_cloned(&extra)));
    never_fail();

    assert!(result.is_err());
    assert_eq!(array.len(), 4);
    assert_eq!(array.capacity(), cap);
    assert_eq!(array.as_ptr(), ptr);
    assert_eq!(ids(&array), [1, 2, 3, 4]);
    assert_eq!(live(), 5);

    // The array is still fully usable
    array.push_cloned(&extra);
    assert_eq!(ids(&array), [1, 2, 3, 4, 99]);
    assert_eq!(array.capacity(), 8);
}

#[test]
fn test_push_failure_from_empty() {
    never_fail();
    let mut array: DynArray<Flaky> = DynArray::new();

    fail_after(0);
    let result = catch_unwind(AssertUnwindSafe(|| array.push_with(Flaky::default)));
    never_fail();

    assert!(result.is_err());
    assert!(array.is_empty());
    assert_eq!(array.capacity(), 0);
    assert!(array.as_ptr().is_null());
}

#[test]
fn test_try_push_error_during_growth_restores_array() {
    let mut array = full_array(2);
    let ptr = array.as_ptr();

    let result: Result<(), &str> = array.try_push_with(|| Err("refused"));

    assert_eq!(result, Err("refused"));
    assert_eq!(ids(&array), [1, 2]);
    assert_eq!(array.capacity(), 2);
    assert_eq!(array.as_ptr(), ptr);
}

#[test]
fn test_try_push_error_within_capacity() {
    never_fail();
    let mut array = DynArray::with_capacity(4);
    array.push(Flaky::new(1));

    let result: Result<(), ()> = array.try_push_with(|| Err(()));

    assert!(result.is_err());
    assert_eq!(ids(&array), [1]);
    assert_eq!(array.capacity(), 4);
}

#[test]
fn test_resize_failure_beyond_capacity_is_strong() {
    let mut array = full_array(3);
    let (ptr, before) = (array.as_ptr(), live());
    take_drops();

    // Third of the new values fails
    fail_after(2);
    let result = catch_unwind(AssertUnwindSafe(|| array.resize_default(6)));
    never_fail();

    assert!(result.is_err());
    assert_eq!(array.len(), 3);
    assert_eq!(array.capacity(), 3);
    assert_eq!(array.as_ptr(), ptr);
    assert_eq!(ids(&array), [1, 2, 3]);
    assert_eq!(live(), before);
    // Only the two new values were dropped, newest first
    assert_eq!(take_drops(), [0, 0]);
}

#[test]
fn test_resize_with_value_failure_is_strong() {
    let mut array = full_array(2);
    array.reserve(10);
    let fill = Flaky::new(7);
    let before = live();

    fail_after(3);
    let result = catch_unwind(AssertUnwindSafe(|| array.resize(8, fill.clone())));
    never_fail();

    assert!(result.is_err());
    assert_eq!(array.len(), 2);
    assert_eq!(array.capacity(), 10);
    assert_eq!(ids(&array), [1, 2]);
    assert_eq!(live(), before);
}

#[test]
fn test_try_resize_with_error_within_capacity() {
    let mut array = full_array(1);
    array.reserve(5);
    let mut produced = 0;

    let result = array.try_resize_with(5, || {
        produced += 1;
        if produced == 3 {
            Err("third value refused")
        } else {
            Ok(Flaky::new(100 + produced))
        }
    });

    assert_eq!(result, Err("third value refused"));
    assert_eq!(ids(&array), [1]);
    assert_eq!(array.capacity(), 5);
    assert_eq!(live(), 1);
}

#[test]
fn test_sized_construction_failure_builds_nothing() {
    never_fail();
    let start = live();
    take_drops();

    fail_after(3);
    let result = catch_unwind(|| DynArray::<Flaky>::with_len(5));
    never_fail();

    assert!(result.is_err());
    assert_eq!(live(), start);
    assert_eq!(take_drops().len(), 3);
}

#[test]
fn test_try_from_fn_rolls_back_in_reverse_order() {
    never_fail();
    take_drops();

    let result = DynArray::try_from_fn(6, |i| {
        if i == 4 {
            Err(i)
        } else {
            Ok(Flaky::new(i as u32))
        }
    });

    assert_eq!(result.err(), Some(4));
    assert_eq!(take_drops(), [3, 2, 1, 0]);
    assert_eq!(live(), 0);
}

#[test]
fn test_from_exact_iter_failure_builds_nothing() {
    never_fail();
    take_drops();

    let result = catch_unwind(|| {
        DynArray::from_exact_iter((0..5).map(|i| {
            assert!(i != 3, "source failed");
            Flaky::new(i)
        }))
    });

    assert!(result.is_err());
    assert_eq!(take_drops(), [2, 1, 0]);
    assert_eq!(live(), 0);
}

#[test]
fn test_clone_failure_leaves_source_intact() {
    let source = full_array(4);

    fail_after(2);
    let result = catch_unwind(AssertUnwindSafe(|| source.clone()));
    never_fail();

    assert!(result.is_err());
    assert_eq!(ids(&source), [1, 2, 3, 4]);
    assert_eq!(live(), 4);
}

#[test]
fn test_clone_from_failure_leaves_target_empty() {
    let source = full_array(4);
    never_fail();
    let mut target = DynArray::new();
    target.push(Flaky::new(50));
    target.push(Flaky::new(51));

    fail_after(1);
    let result = catch_unwind(AssertUnwindSafe(|| target.clone_from(&source)));
    never_fail();

    assert!(result.is_err());
    assert!(target.is_empty());
    assert_eq!(target.capacity(), 0);
    assert!(target.as_ptr().is_null());
    assert_eq!(live(), 4);

    target.clone_from(&source);
    assert_eq!(ids(&target), [1, 2, 3, 4]);
}

#[test]
fn test_destruction_runs_in_index_order() {
    let array = full_array(4);
    take_drops();
    drop(array);
    assert_eq!(take_drops(), [1, 2, 3, 4]);
    assert_eq!(live(), 0);
}

#[test]
fn test_truncate_drops_only_tail() {
    let mut array = full_array(5);
    take_drops();

    array.truncate(2);

    assert_eq!(take_drops(), [3, 4, 5]);
    assert_eq!(ids(&array), [1, 2]);
    assert_eq!(array.capacity(), 5);
}

#[test]
fn test_pop_back_and_clear_drop_values() {
    let mut array = full_array(3);
    take_drops();

    array.pop_back();
    assert_eq!(take_drops(), [3]);

    array.clear();
    assert_eq!(take_drops(), [1, 2]);
    assert_eq!(live(), 0);
    assert_eq!(array.capacity(), 3);
}

#[test]
fn test_reserve_and_shrink_move_without_dropping() {
    let mut array = full_array(3);
    take_drops();

    array.reserve(64);
    array.truncate(1);
    assert_eq!(take_drops(), [2, 3]);

    array.shrink_to_fit();
    assert!(take_drops().is_empty());
    assert_eq!(ids(&array), [1]);
    assert_eq!(live(), 1);
}

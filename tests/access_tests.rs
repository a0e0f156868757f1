use dynarray::{dynarr, DynArray, DynArrayError};

#[test]
fn test_checked_and_unchecked_access_agree() {
    let array = dynarr![5, 6, 7, 8];

    for i in 0..array.len() {
        let checked = array.at(i as isize).unwrap();
        assert!(std::ptr::eq(checked, &array[i]));
    }
}

#[test]
fn test_checked_access_out_of_range() {
    for len in 0..4 {
        let array = DynArray::from_fn(len, |i| i);
        for index in [-1, -100, len as isize, len as isize + 1, isize::MAX] {
            assert_eq!(
                array.at(index),
                Err(DynArrayError::IndexOutOfRange { index, len })
            );
        }
    }
}

#[test]
fn test_checked_access_error_message() {
    let array = dynarr![1];
    let err = array.at(3).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Index out of range: index 3 is outside array of length 1"
    );
}

#[test]
fn test_at_mut_writes_in_place() {
    let mut array = dynarr![1, 2, 3];
    *array.at_mut(1).unwrap() = 20;
    assert_eq!(array, [1, 20, 3]);
    assert!(array.at_mut(3).is_err());
}

#[test]
fn test_front_and_back() {
    let mut array = dynarr!["first", "middle", "last"];
    assert_eq!(*array.front(), "first");
    assert_eq!(*array.back(), "last");

    *array.front_mut() = "FIRST";
    *array.back_mut() = "LAST";
    assert_eq!(array, ["FIRST", "middle", "LAST"]);
}

#[test]
fn test_single_value_front_is_back() {
    let array = dynarr![42];
    assert!(std::ptr::eq(array.front(), array.back()));
}

#[test]
#[should_panic(expected = "back called on an empty array")]
fn test_back_on_empty_array() {
    let array: DynArray<i32> = DynArray::new();
    let _ = array.back();
}

#[test]
#[should_panic]
fn test_index_out_of_bounds_panics() {
    let array = dynarr![1, 2];
    let _ = array[2];
}

#[test]
fn test_raw_pointer_view() {
    let array = dynarr![1u16, 2, 3];
    let ptr = array.as_ptr();
    let view = unsafe { std::slice::from_raw_parts(ptr, array.len()) };
    assert_eq!(view, [1, 2, 3]);
}

#[test]
fn test_raw_pointer_after_clear_keeps_buffer() {
    let mut array = dynarr![1, 2];
    let ptr = array.as_ptr();
    array.clear();
    assert!(array.is_empty());
    assert_eq!(array.as_ptr(), ptr);
    assert!(!array.as_mut_ptr().is_null());
}

#[test]
fn test_slice_view() {
    let mut array = dynarr![3, 1, 2];
    assert_eq!(array.as_slice(), &[3, 1, 2]);
    array.as_mut_slice()[0] = 0;
    assert_eq!(array.first(), Some(&0));
    assert_eq!(array.get(5), None);
}

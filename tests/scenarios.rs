//! End-to-end scenarios on small vectors with hand-checked results.

use std::cmp::Ordering;
use zsparse::prelude::*;

fn vector(length: usize, entries: &[(usize, i64)]) -> SparseVector<i64> {
    SparseVector::from_entries(length, entries.iter().copied()).unwrap()
}

#[test]
fn test_linear_combination_cancels_shared_indices() {
    let v1 = vector(10, &[(2, 3), (5, -1), (7, 2)]);
    let v2 = vector(10, &[(2, -3), (4, 6), (7, -2)]);

    let sum = SparseVector::linear(1, &v1, 1, &v2).unwrap();

    // indices 2 and 7 cancel; 4 comes from v2 alone, 5 from v1 alone
    assert_eq!(sum.get(2), 0);
    assert_eq!(sum.get(7), 0);
    assert_eq!(sum.get(4), 6);
    assert_eq!(sum.get(5), -1);
    assert_eq!(sum.occupation(), 2);
    assert_eq!(sum.to_string(), "occupation: 2 -> 4:6 5:-1");
    // inputs are untouched
    assert_eq!(v1.occupation(), 3);
    assert_eq!(v2.occupation(), 3);
}

#[test]
fn test_accumulate_then_cancel_leaves_empty_vector() {
    let mut v = SparseVector::<i64>::zero(10);
    v.accumulate(3, 5).unwrap();
    assert_eq!(v.get(3), 5);
    v.accumulate(3, -5).unwrap();
    assert_eq!(v.occupation(), 0);
    assert_eq!(v.to_string(), "occupation: 0 ->");
}

#[test]
fn test_row_reduction_step() {
    // Eliminate the leading entry of `row` using `pivot`, as a boundary
    // matrix reduction over the integers would.
    let pivot = vector(6, &[(1, 1), (3, -1)]);
    let mut row = vector(6, &[(1, 4), (2, 1), (3, 2)]);

    let lambda = -row.first_value() / pivot.first_value();
    row.add_scaled(&pivot, lambda).unwrap();

    assert_eq!(row.first_index(), Some(2));
    assert_eq!(row.to_dense(), vec![0, 0, 1, 6, 0, 0]);
    assert_eq!(pivot.compare_to(&row).unwrap(), Ordering::Less);
}

#[test]
fn test_overflow_escalates_to_wider_type() {
    let u = SparseVector::<i32>::from_entries(4, [(0, i32::MAX)]).unwrap();
    let v = SparseVector::<i32>::from_entries(4, [(0, i32::MAX)]).unwrap();

    let mut narrow = u.clone();
    let err = narrow.add_scaled(&v, 1).unwrap_err();
    assert!(err.is_overflow());
    assert_eq!(narrow, u);

    let mut wide: SparseVector<i64> = u.convert().unwrap();
    wide.add_scaled(&v.convert().unwrap(), 1).unwrap();
    assert_eq!(wide.get(0), 2 * i32::MAX as i64);
}

#[test]
fn test_canonical_row_order() {
    let mut rows = vec![
        SparseVector::<i64>::zero(5),
        vector(5, &[(3, 1)]),
        vector(5, &[(0, 2), (4, 1)]),
        vector(5, &[(0, 2), (1, 1)]),
        vector(5, &[(0, -1)]),
    ];
    rows.sort();

    let leading: Vec<Option<usize>> = rows.iter().map(|r| r.first_index()).collect();
    assert_eq!(leading, vec![Some(0), Some(0), Some(0), Some(3), None]);
    assert_eq!(rows[0], vector(5, &[(0, -1)]));
    assert_eq!(rows[1], vector(5, &[(0, 2), (4, 1)]));
    assert_eq!(rows[2], vector(5, &[(0, 2), (1, 1)]));
}

#[test]
fn test_errors_are_distinguishable() {
    let mut v = SparseVector::<i64>::zero(3);
    assert!(matches!(
        v.accumulate(3, 1),
        Err(SparseError::IndexOutOfRange { index: 3, length: 3 })
    ));
    assert!(matches!(
        SparseVector::<i64>::with_capacity(3, 4),
        Err(SparseError::InvalidCapacity { capacity: 4, length: 3 })
    ));
    let w = SparseVector::<i64>::zero(4);
    assert!(matches!(
        SparseVector::linear(1, &v, 1, &w),
        Err(SparseError::DimensionMismatch { expected: 3, actual: 4 })
    ));
}

//! Rejection paths: bad bounds, empty inputs, bad identities

use rangekit::algebra::{Add, FnMonoid, Min, Sum};
use rangekit::{
    ConstructionError, EngineError, FenwickTree, LazySegmentTree, RangeAddFenwick, RangeQuery,
    SegmentTree,
};
use test_case::test_case;

mod common;
use common::SCENARIO;

#[test_case(5, 2 ; "reversed")]
#[test_case(0, 8 ; "right past end")]
#[test_case(8, 8 ; "left past end")]
#[test_case(usize::MAX, usize::MAX ; "huge")]
fn segment_tree_rejects_range(left: usize, right: usize) {
    let tree = SegmentTree::build(&SCENARIO, Sum::new()).unwrap();
    let expected = EngineError::InvalidRange {
        left,
        right,
        lower: 0,
        upper: 7,
    };
    assert_eq!(tree.range_query(left, right), Err(expected.clone()));

    let mut lazy = LazySegmentTree::<Sum<i64>, Add>::build(&SCENARIO, Sum::new()).unwrap();
    assert_eq!(lazy.range_update(left, right, 1), Err(expected.clone()));
    assert_eq!(lazy.range_query(left, right), Err(expected));

    // Rejected updates leave the contents untouched
    assert_eq!(lazy.to_vec(), SCENARIO.to_vec());
    assert_eq!(lazy.dirty_nodes(), 0);
}

#[test_case(8 ; "one past end")]
#[test_case(100 ; "far past end")]
fn segment_tree_rejects_index(index: usize) {
    let mut tree = SegmentTree::build(&SCENARIO, Min::new()).unwrap();
    let expected = EngineError::InvalidIndex {
        index,
        lower: 0,
        upper: 7,
    };
    assert_eq!(tree.point_update(index, 0), Err(expected.clone()));
    assert_eq!(tree.get(index), Err(expected));
    assert_eq!(tree.to_vec(), SCENARIO.to_vec());
}

#[test_case(0 ; "zero is not an index")]
#[test_case(6 ; "past end")]
fn fenwick_rejects_index(index: usize) {
    let mut fw: FenwickTree<i64> = FenwickTree::new(5).unwrap();
    let expected = EngineError::InvalidIndex {
        index,
        lower: 1,
        upper: 5,
    };
    assert_eq!(fw.add(index, 1), Err(expected));
    assert_eq!(fw.prefix_sum(5).unwrap(), 0);
}

#[test_case(0, 3 ; "zero left")]
#[test_case(4, 2 ; "reversed")]
#[test_case(1, 6 ; "past end")]
fn fenwick_rejects_range(l: usize, r: usize) {
    let fw = FenwickTree::from_slice(&[1i64, 2, 3, 4, 5]).unwrap();
    assert_eq!(
        fw.range_sum(l, r),
        Err(EngineError::InvalidRange {
            left: l,
            right: r,
            lower: 1,
            upper: 5
        })
    );

    let mut range_fw = RangeAddFenwick::from_slice(&[1i64, 2, 3, 4, 5]).unwrap();
    assert!(range_fw.range_add(l, r, 1).is_err());
    assert_eq!(range_fw.range_sum(1, 5).unwrap(), 15);
}

#[test]
fn fenwick_prefix_past_end_rejected() {
    let fw: FenwickTree<i64> = FenwickTree::new(5).unwrap();
    assert_eq!(fw.prefix_sum(0).unwrap(), 0);
    assert!(matches!(fw.prefix_sum(6), Err(EngineError::InvalidIndex { index: 6, .. })));
}

#[test]
fn empty_sequences_rejected() {
    let empty = EngineError::Construction(ConstructionError::EmptySequence);

    assert_eq!(SegmentTree::build(&[], Sum::<i64>::new()).unwrap_err(), empty);
    assert_eq!(
        LazySegmentTree::<Min<i64>, Add>::build(&[], Min::new()).unwrap_err(),
        empty
    );
    assert_eq!(FenwickTree::<i64>::new(0).unwrap_err(), empty);
    assert_eq!(FenwickTree::<i64>::from_slice(&[]).unwrap_err(), empty);
    assert_eq!(RangeAddFenwick::<i64>::from_slice(&[]).unwrap_err(), empty);
}

#[test]
fn bad_identity_rejected_by_checked_build() {
    // 0 is not neutral for min over positive values
    let monoid = FnMonoid::new(|a: &i64, b: &i64| *a.min(b), 0i64);
    let err = SegmentTree::build_checked(&SCENARIO, monoid).unwrap_err();
    assert_eq!(
        err,
        EngineError::Construction(ConstructionError::IdentityViolation { position: 0 })
    );

    let monoid = FnMonoid::new(|a: &i64, b: &i64| *a.min(b), i64::MAX);
    assert!(SegmentTree::build_checked(&SCENARIO, monoid).is_ok());
}

#[test]
fn closure_build_checks_identity() {
    let min = |a: &i64, b: &i64| *a.min(b);
    let err = SegmentTree::from_fn(&[2, 4, 5, 7], min, 0).unwrap_err();
    assert_eq!(
        err,
        EngineError::Construction(ConstructionError::IdentityViolation { position: 0 })
    );

    let tree = SegmentTree::from_fn(&[2, 4, 5, 7], min, i64::MAX).unwrap();
    assert_eq!(tree.range_query(1, 2).unwrap(), 4);
    assert_eq!(tree.range_query(1, 3).unwrap(), 4);
}

#[test]
fn errors_render_bounds() {
    let mut fw = FenwickTree::from_slice(&SCENARIO).unwrap();
    let err = RangeQuery::query(&mut fw, 3, 9).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid range [3, 9]: expected 0 <= left <= right <= 7"
    );
    assert_eq!(
        EngineError::from(ConstructionError::EmptySequence).to_string(),
        "construction failed: cannot build over an empty sequence"
    );
}

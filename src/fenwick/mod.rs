//! Fenwick trees (binary indexed trees)
//!
//! Point add and prefix/range sum in O(log n), no lazy layer.
//!
//! **1-based indexing**: slot `i` owns the `lowbit(i)` elements ending at `i`,
//! which only works when indices start at 1. Segment trees in this crate are
//! 0-based; the [`RangeQuery`](crate::RangeQuery) impls normalise the two.

mod range_add;

pub use range_add::RangeAddFenwick;

use std::fmt;
use std::ops::{Add, Sub};

use crate::{check_index, check_range, ConstructionError, Result};

/// Fenwick tree over an invertible, additive element type.
///
/// Updates are additive only. To set position `i` to `v`, the caller supplies
/// `delta = v - current`; [`value_at`](Self::value_at) recovers `current` in
/// O(log n).
#[derive(Debug, Clone)]
pub struct FenwickTree<T> {
    tree: Vec<T>, // 1-indexed, slot 0 unused
    len: usize,
}

impl<T> FenwickTree<T>
where
    T: Copy + Default + fmt::Debug + Add<Output = T> + Sub<Output = T>,
{
    /// Create a tree of `n` zero elements
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(ConstructionError::EmptySequence.into());
        }
        tracing::debug!(len = n, "built fenwick tree");
        Ok(Self {
            tree: vec![T::default(); n + 1],
            len: n,
        })
    }

    /// Build from `values` (`values[0]` lands at index 1) in O(n)
    pub fn from_slice(values: &[T]) -> Result<Self> {
        let n = values.len();
        if n == 0 {
            return Err(ConstructionError::EmptySequence.into());
        }

        let mut tree = vec![T::default(); n + 1];
        tree[1..].copy_from_slice(values);

        // Push each slot's partial sum into the slot that owns it next
        for i in 1..=n {
            let parent = i + lowbit(i);
            if parent <= n {
                let child = tree[i];
                tree[parent] = tree[parent] + child;
            }
        }

        tracing::debug!(len = n, "built fenwick tree from slice");
        Ok(Self { tree, len: n })
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: empty trees are rejected at construction
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Add `delta` at index `i` (1-based)
    pub fn add(&mut self, i: usize, delta: T) -> Result<()> {
        check_index(i, 1, self.len)?;
        let mut idx = i;
        while idx <= self.len {
            self.tree[idx] = self.tree[idx] + delta;
            idx += lowbit(idx);
        }
        Ok(())
    }

    /// Sum of elements `[1, i]`; `prefix_sum(0)` is zero
    pub fn prefix_sum(&self, i: usize) -> Result<T> {
        check_index(i, 0, self.len)?;
        Ok(self.prefix_unchecked(i))
    }

    fn prefix_unchecked(&self, i: usize) -> T {
        let mut idx = i;
        let mut sum = T::default();
        while idx > 0 {
            sum = sum + self.tree[idx];
            idx -= lowbit(idx);
        }
        sum
    }

    /// Sum of elements `[l, r]` (1-based, inclusive)
    pub fn range_sum(&self, l: usize, r: usize) -> Result<T> {
        check_range(l, r, 1, self.len)?;
        Ok(self.prefix_unchecked(r) - self.prefix_unchecked(l - 1))
    }

    /// Current value at index `i` (1-based)
    pub fn value_at(&self, i: usize) -> Result<T> {
        check_index(i, 1, self.len)?;
        self.range_sum(i, i)
    }

    /// Smallest `i` in `[1, n]` with `prefix_sum(i) >= target`, by binary lifting.
    ///
    /// Requires every element to be non-negative so prefix sums are monotone.
    /// Returns `None` when even the full sum is below `target`.
    pub fn lower_bound(&self, target: T) -> Option<usize>
    where
        T: PartialOrd,
    {
        let mut pos = 0;
        let mut remaining = target;
        let mut step = highest_power_of_two_leq(self.len);

        while step > 0 {
            let next = pos + step;
            if next <= self.len && self.tree[next] < remaining {
                pos = next;
                remaining = remaining - self.tree[next];
            }
            step >>= 1;
        }

        (pos < self.len).then_some(pos + 1)
    }
}

/// Lowest set bit of `i` (i.e., `i & -i`)
#[inline]
pub(crate) fn lowbit(i: usize) -> usize {
    i & i.wrapping_neg()
}

#[inline]
fn highest_power_of_two_leq(n: usize) -> usize {
    if n == 0 {
        0
    } else {
        1 << (usize::BITS - 1 - n.leading_zeros())
    }
}

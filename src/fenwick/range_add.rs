//! Range add + range sum with two Fenwick trees
//!
//! prefix(i) = B1(i) * i - B2(i)
//! range_add(l, r, x): B1 += x at l, -x at r+1; B2 += x*(l-1) at l, -x*r at r+1

use std::ops::Neg;

use super::FenwickTree;
use crate::{algebra::Element, check_range, ConstructionError, Result};

/// Sum-only alternative to a lazy segment tree, 1-based like [`FenwickTree`]
#[derive(Debug, Clone)]
pub struct RangeAddFenwick<T> {
    slope: FenwickTree<T>,
    offset: FenwickTree<T>,
}

impl<T> RangeAddFenwick<T>
where
    T: Element + Neg<Output = T>,
{
    /// Create a tree of `n` zero elements
    pub fn new(n: usize) -> Result<Self> {
        Ok(Self {
            slope: FenwickTree::new(n)?,
            offset: FenwickTree::new(n)?,
        })
    }

    /// Build from `values` (`values[0]` lands at index 1) in O(n)
    pub fn from_slice(values: &[T]) -> Result<Self> {
        if values.is_empty() {
            return Err(ConstructionError::EmptySequence.into());
        }
        // prefix(i) = 0 * i - (-sum) = sum
        let negated: Vec<T> = values.iter().map(|v| -*v).collect();
        Ok(Self {
            slope: FenwickTree::new(values.len())?,
            offset: FenwickTree::from_slice(&negated)?,
        })
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.slope.len()
    }

    /// Always false: empty trees are rejected at construction
    pub fn is_empty(&self) -> bool {
        self.slope.is_empty()
    }

    /// Add `delta` to every element of `[l, r]` (1-based, inclusive)
    pub fn range_add(&mut self, l: usize, r: usize, delta: T) -> Result<()> {
        check_range(l, r, 1, self.len())?;

        self.slope.add(l, delta)?;
        self.offset.add(l, delta * T::from_len(l - 1))?;
        if r < self.len() {
            self.slope.add(r + 1, -delta)?;
            self.offset.add(r + 1, -(delta * T::from_len(r)))?;
        }
        Ok(())
    }

    /// Sum of elements `[1, i]`; `prefix_sum(0)` is zero
    pub fn prefix_sum(&self, i: usize) -> Result<T> {
        Ok(self.slope.prefix_sum(i)? * T::from_len(i) - self.offset.prefix_sum(i)?)
    }

    /// Sum of elements `[l, r]` (1-based, inclusive)
    pub fn range_sum(&self, l: usize, r: usize) -> Result<T> {
        check_range(l, r, 1, self.len())?;
        Ok(self.prefix_sum(r)? - self.prefix_sum(l - 1)?)
    }

    /// Current value at index `i` (1-based)
    pub fn value_at(&self, i: usize) -> Result<T> {
        self.range_sum(i, i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_add_matches_naive() {
        let mut values = vec![2i64, 4, 5, 7, 2, 3, 1, 6];
        let mut fw = RangeAddFenwick::from_slice(&values).unwrap();

        for &(l, r, delta) in &[(3usize, 6usize, 3i64), (1, 8, -2), (8, 8, 10), (1, 1, 5)] {
            fw.range_add(l, r, delta).unwrap();
            for v in &mut values[l - 1..r] {
                *v += delta;
            }
            for a in 1..=values.len() {
                for b in a..=values.len() {
                    let naive: i64 = values[a - 1..b].iter().sum();
                    assert_eq!(fw.range_sum(a, b).unwrap(), naive, "[{}, {}]", a, b);
                }
            }
        }
        assert_eq!(fw.value_at(8).unwrap(), values[7]);
    }

    #[test]
    fn test_zero_initialised() {
        let mut fw = RangeAddFenwick::<i32>::new(4).unwrap();
        assert_eq!(fw.prefix_sum(4).unwrap(), 0);
        fw.range_add(2, 3, 7).unwrap();
        assert_eq!(fw.prefix_sum(1).unwrap(), 0);
        assert_eq!(fw.prefix_sum(4).unwrap(), 14);
        assert!(fw.range_add(0, 2, 1).is_err());
        assert!(fw.range_add(3, 2, 1).is_err());
    }
}

//! Brute-force oracle shared by the integration tests

#![allow(dead_code)]

use proptest::prelude::*;

/// Sequence used by the worked scenarios
pub const SCENARIO: [i64; 8] = [2, 4, 5, 7, 2, 3, 1, 6];

/// Plain vector mirroring every mutation applied to a structure
#[derive(Debug, Clone)]
pub struct Oracle {
    pub values: Vec<i64>,
}

impl Oracle {
    pub fn new(values: &[i64]) -> Self {
        Self {
            values: values.to_vec(),
        }
    }

    pub fn sum(&self, l: usize, r: usize) -> i64 {
        self.values[l..=r].iter().sum()
    }

    pub fn min(&self, l: usize, r: usize) -> i64 {
        *self.values[l..=r].iter().min().expect("non-empty range")
    }

    pub fn max(&self, l: usize, r: usize) -> i64 {
        *self.values[l..=r].iter().max().expect("non-empty range")
    }

    /// Gcd of the absolute values, matching `Gcd<u64>` over `unsigned_abs`
    pub fn gcd(&self, l: usize, r: usize) -> u64 {
        self.values[l..=r].iter().fold(0, |acc, v| {
            let (mut a, mut b) = (acc, v.unsigned_abs());
            while b != 0 {
                (a, b) = (b, a % b);
            }
            a
        })
    }

    pub fn set(&mut self, i: usize, v: i64) {
        self.values[i] = v;
    }

    pub fn add_range(&mut self, l: usize, r: usize, delta: i64) {
        for v in &mut self.values[l..=r] {
            *v += delta;
        }
    }

    pub fn assign_range(&mut self, l: usize, r: usize, value: i64) {
        for v in &mut self.values[l..=r] {
            *v = value;
        }
    }
}

/// Operation applied to both a structure and the oracle
#[derive(Debug, Clone)]
pub enum Op {
    Set(usize, i64),
    Update(usize, usize, i64),
    Query(usize, usize),
}

/// Non-empty values with magnitudes small enough that sums never overflow
pub fn arb_values(max_len: usize) -> impl Strategy<Value = Vec<i64>> {
    proptest::collection::vec(-1_000i64..1_000, 1..max_len)
}

/// Values plus a sequence of in-bounds operations
pub fn arb_values_and_ops(
    max_len: usize,
    max_ops: usize,
) -> impl Strategy<Value = (Vec<i64>, Vec<Op>)> {
    arb_values(max_len).prop_flat_map(move |values| {
        let n = values.len();
        let op = prop_oneof![
            (0..n, -1_000i64..1_000).prop_map(|(i, v)| Op::Set(i, v)),
            (0..n, 0..n, -100i64..100).prop_map(|(a, b, d)| Op::Update(a.min(b), a.max(b), d)),
            (0..n, 0..n).prop_map(|(a, b)| Op::Query(a.min(b), a.max(b))),
        ];
        (Just(values), proptest::collection::vec(op, 0..max_ops))
    })
}

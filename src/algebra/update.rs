//! Range-update policies for the lazy layer
//!
//! A policy fixes the update semantics of one tree for its whole lifetime, so
//! additive and assignment tags can never be mixed on the same tree.
//!
//! Laws a policy must satisfy for a node covering `len` leaves:
//! - `apply(combine(a, b), t, len) == combine(apply(a, t, la), apply(b, t, lb))`
//! - `apply(apply(a, s, len), t, len) == apply(a, compose(s, t), len)`

use std::fmt;

use super::{Element, Gcd, GcdElement, Max, Min, Monoid, Sum};

/// How a pending range update acts on cached aggregates and on other tags
pub trait UpdatePolicy<M: Monoid> {
    /// Payload of an update, stored in pending tags
    type Tag: Clone + Default + fmt::Debug;

    /// Aggregate of a node covering `len` leaves after applying `tag`
    fn apply(monoid: &M, aggregate: &M::Value, tag: &Self::Tag, len: usize) -> M::Value;

    /// Single tag equivalent to `older` followed by `newer`
    fn compose(older: &Self::Tag, newer: &Self::Tag) -> Self::Tag;
}

/// Additive updates: every element in the range grows by `delta`
#[derive(Debug, Clone, Copy, Default)]
pub struct Add;

/// Assignment updates: every element in the range becomes `value`
#[derive(Debug, Clone, Copy, Default)]
pub struct Assign;

impl<T: Element> UpdatePolicy<Sum<T>> for Add {
    type Tag = T;

    #[inline]
    fn apply(_: &Sum<T>, aggregate: &T, delta: &T, len: usize) -> T {
        *aggregate + *delta * T::from_len(len)
    }

    #[inline]
    fn compose(older: &T, newer: &T) -> T {
        *older + *newer
    }
}

impl<T: Element> UpdatePolicy<Min<T>> for Add {
    type Tag = T;

    #[inline]
    fn apply(_: &Min<T>, aggregate: &T, delta: &T, _len: usize) -> T {
        *aggregate + *delta
    }

    #[inline]
    fn compose(older: &T, newer: &T) -> T {
        *older + *newer
    }
}

impl<T: Element> UpdatePolicy<Max<T>> for Add {
    type Tag = T;

    #[inline]
    fn apply(_: &Max<T>, aggregate: &T, delta: &T, _len: usize) -> T {
        *aggregate + *delta
    }

    #[inline]
    fn compose(older: &T, newer: &T) -> T {
        *older + *newer
    }
}

// Gcd has no `Add` policy: gcd(a + d, b + d) is not a function of gcd(a, b).

impl<T: Element> UpdatePolicy<Sum<T>> for Assign {
    type Tag = T;

    #[inline]
    fn apply(_: &Sum<T>, _aggregate: &T, value: &T, len: usize) -> T {
        *value * T::from_len(len)
    }

    #[inline]
    fn compose(_older: &T, newer: &T) -> T {
        *newer
    }
}

impl<T: Element> UpdatePolicy<Min<T>> for Assign {
    type Tag = T;

    #[inline]
    fn apply(_: &Min<T>, _aggregate: &T, value: &T, _len: usize) -> T {
        *value
    }

    #[inline]
    fn compose(_older: &T, newer: &T) -> T {
        *newer
    }
}

impl<T: Element> UpdatePolicy<Max<T>> for Assign {
    type Tag = T;

    #[inline]
    fn apply(_: &Max<T>, _aggregate: &T, value: &T, _len: usize) -> T {
        *value
    }

    #[inline]
    fn compose(_older: &T, newer: &T) -> T {
        *newer
    }
}

impl<T: GcdElement> UpdatePolicy<Gcd<T>> for Assign {
    type Tag = T;

    #[inline]
    fn apply(_: &Gcd<T>, _aggregate: &T, value: &T, _len: usize) -> T {
        *value
    }

    #[inline]
    fn compose(_older: &T, newer: &T) -> T {
        *newer
    }
}

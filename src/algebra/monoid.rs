//! Built-in aggregates: sum, min, max, gcd, and closure-backed monoids

use std::fmt;
use std::marker::PhantomData;

use super::{Element, GcdElement, Monoid};

/// Sum aggregate, identity `0`. The only invertible built-in aggregate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sum<T>(PhantomData<T>);

/// Minimum aggregate, identity `T::MAX`
#[derive(Debug, Clone, Copy, Default)]
pub struct Min<T>(PhantomData<T>);

/// Maximum aggregate, identity `T::MIN`
#[derive(Debug, Clone, Copy, Default)]
pub struct Max<T>(PhantomData<T>);

/// Greatest common divisor aggregate over unsigned integers, identity `0`
#[derive(Debug, Clone, Copy, Default)]
pub struct Gcd<T>(PhantomData<T>);

macro_rules! marker_new {
    ($($name:ident),*) => {
        $(
            impl<T> $name<T> {
                /// Create the aggregate
                pub fn new() -> Self {
                    Self(PhantomData)
                }
            }
        )*
    };
}

marker_new!(Sum, Min, Max, Gcd);

impl<T: Element> Monoid for Sum<T> {
    type Value = T;

    fn identity(&self) -> T {
        T::default()
    }

    #[inline]
    fn combine(&self, left: &T, right: &T) -> T {
        *left + *right
    }
}

impl<T: Element> Monoid for Min<T> {
    type Value = T;

    fn identity(&self) -> T {
        T::HIGHEST
    }

    #[inline]
    fn combine(&self, left: &T, right: &T) -> T {
        (*left).min(*right)
    }
}

impl<T: Element> Monoid for Max<T> {
    type Value = T;

    fn identity(&self) -> T {
        T::LOWEST
    }

    #[inline]
    fn combine(&self, left: &T, right: &T) -> T {
        (*left).max(*right)
    }
}

impl<T: GcdElement> Monoid for Gcd<T> {
    type Value = T;

    fn identity(&self) -> T {
        T::default()
    }

    #[inline]
    fn combine(&self, left: &T, right: &T) -> T {
        left.gcd(*right)
    }
}

/// Monoid assembled from a `combine` closure and an identity value.
///
/// Neither property is checked here; use
/// [`SegmentTree::build_checked`](crate::SegmentTree::build_checked) to verify
/// the identity against the input.
#[derive(Clone)]
pub struct FnMonoid<T, F> {
    combine: F,
    identity: T,
}

impl<T, F> FnMonoid<T, F>
where
    F: Fn(&T, &T) -> T,
{
    /// Wrap `combine` and `identity`
    pub fn new(combine: F, identity: T) -> Self {
        Self { combine, identity }
    }
}

impl<T, F> Monoid for FnMonoid<T, F>
where
    T: Clone + PartialEq + fmt::Debug,
    F: Fn(&T, &T) -> T,
{
    type Value = T;

    fn identity(&self) -> T {
        self.identity.clone()
    }

    #[inline]
    fn combine(&self, left: &T, right: &T) -> T {
        (self.combine)(left, right)
    }
}

impl<T: fmt::Debug, F> fmt::Debug for FnMonoid<T, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnMonoid")
            .field("identity", &self.identity)
            .finish_non_exhaustive()
    }
}

//! Aggregate algebra
//!
//! Every structure is parameterised by a [`Monoid`]:
//! - `combine` must be associative
//! - `identity` must be neutral on both sides
//!
//! The lazy layer additionally needs an [`UpdatePolicy`] describing how a
//! pending update acts on an aggregate covering `len` leaves.

mod monoid;
mod update;

pub use monoid::{FnMonoid, Gcd, Max, Min, Sum};
pub use update::{Add, Assign, UpdatePolicy};

use std::fmt;
use std::ops;

use crate::ConstructionError;

/// Associative `combine` with a two-sided identity
pub trait Monoid {
    /// Element and aggregate type
    type Value: Clone + PartialEq + fmt::Debug;

    /// Neutral element `e`: `combine(a, e) == a == combine(e, a)`
    fn identity(&self) -> Self::Value;

    /// Associative binary operator
    fn combine(&self, left: &Self::Value, right: &Self::Value) -> Self::Value;

    /// Fold `combine` over `values`, starting from the identity
    fn fold<'a, I>(&self, values: I) -> Self::Value
    where
        I: IntoIterator<Item = &'a Self::Value>,
        Self::Value: 'a,
    {
        values
            .into_iter()
            .fold(self.identity(), |acc, value| self.combine(&acc, value))
    }
}

/// Integer element usable with the built-in monoids and update policies
pub trait Element:
    Copy
    + Ord
    + Default
    + fmt::Debug
    + ops::Add<Output = Self>
    + ops::Sub<Output = Self>
    + ops::Mul<Output = Self>
{
    /// Smallest representable value (identity of [`Max`])
    const LOWEST: Self;

    /// Largest representable value (identity of [`Min`])
    const HIGHEST: Self;

    /// Convert a segment length into the element type.
    ///
    /// Lengths that do not fit wrap modulo the type's width (debug builds
    /// assert instead). The wrapped value is congruent to `len`, so sums
    /// only go wrong when they would overflow anyway.
    fn from_len(len: usize) -> Self;
}

/// Unsigned element with a gcd, identity `0`
pub trait GcdElement: Element + ops::Rem<Output = Self> {
    /// Greatest common divisor by Euclid's algorithm
    fn gcd(self, other: Self) -> Self {
        let zero = Self::default();
        let (mut a, mut b) = (self, other);
        while b != zero {
            let r = a % b;
            a = b;
            b = r;
        }
        a
    }
}

macro_rules! impl_element {
    ($($t:ty),*) => {
        $(
            impl Element for $t {
                const LOWEST: Self = <$t>::MIN;
                const HIGHEST: Self = <$t>::MAX;

                #[inline]
                fn from_len(len: usize) -> Self {
                    debug_assert!(
                        <$t>::try_from(len).is_ok(),
                        "length {} does not fit in {}",
                        len,
                        stringify!($t)
                    );
                    len as $t
                }
            }
        )*
    };
}

impl_element!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl GcdElement for u8 {}
impl GcdElement for u16 {}
impl GcdElement for u32 {}
impl GcdElement for u64 {}
impl GcdElement for u128 {}
impl GcdElement for usize {}

/// Verify that `monoid.identity()` is neutral for every value in `values`.
pub fn check_identity<M: Monoid>(
    monoid: &M,
    values: &[M::Value],
) -> Result<(), ConstructionError> {
    let identity = monoid.identity();
    for (position, value) in values.iter().enumerate() {
        if monoid.combine(value, &identity) != *value || monoid.combine(&identity, value) != *value
        {
            tracing::debug!(position, ?value, ?identity, "identity law violated");
            return Err(ConstructionError::IdentityViolation { position });
        }
    }
    Ok(())
}

//! Backend selection and the shared query capability
//!
//! Fenwick trees win for invertible, point-update workloads (smaller
//! constants, n + 1 slots); segment trees cover non-invertible aggregates;
//! the lazy layer is needed once range updates appear. The choice happens
//! once, at construction: each backend is its own concrete type, and
//! [`RangeQuery`] is implemented statically by each of them.

use std::fmt;
use std::ops::{Add, Neg, Sub};

use crate::{
    algebra::{Element, Monoid, UpdatePolicy},
    check_range, ConstructionError, FenwickTree, LazySegmentTree, RangeAddFenwick, Result,
    SegmentTree,
};

/// Range-aggregate capability shared by every backend.
///
/// Bounds are 0-based and inclusive regardless of the backend's native
/// convention. `query` takes `&mut self` because lazy trees push tags down
/// while answering.
pub trait RangeQuery {
    /// Aggregate type returned by queries
    type Output;

    /// Number of elements
    fn len(&self) -> usize;

    /// Whether the sequence is empty (never true for built structures)
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Aggregate over `[left, right]`, 0-based inclusive
    fn query(&mut self, left: usize, right: usize) -> Result<Self::Output>;
}

impl<M: Monoid> RangeQuery for SegmentTree<M> {
    type Output = M::Value;

    fn len(&self) -> usize {
        SegmentTree::len(self)
    }

    fn query(&mut self, left: usize, right: usize) -> Result<M::Value> {
        self.range_query(left, right)
    }
}

impl<M, U> RangeQuery for LazySegmentTree<M, U>
where
    M: Monoid,
    U: UpdatePolicy<M>,
{
    type Output = M::Value;

    fn len(&self) -> usize {
        LazySegmentTree::len(self)
    }

    fn query(&mut self, left: usize, right: usize) -> Result<M::Value> {
        self.range_query(left, right)
    }
}

impl<T> RangeQuery for FenwickTree<T>
where
    T: Copy + Default + fmt::Debug + Add<Output = T> + Sub<Output = T>,
{
    type Output = T;

    fn len(&self) -> usize {
        FenwickTree::len(self)
    }

    fn query(&mut self, left: usize, right: usize) -> Result<T> {
        // Validate in the caller's 0-based terms before shifting to 1-based
        check_range(left, right, 0, FenwickTree::len(self) - 1)?;
        self.range_sum(left + 1, right + 1)
    }
}

impl<T> RangeQuery for RangeAddFenwick<T>
where
    T: Element + Neg<Output = T>,
{
    type Output = T;

    fn len(&self) -> usize {
        RangeAddFenwick::len(self)
    }

    fn query(&mut self, left: usize, right: usize) -> Result<T> {
        check_range(left, right, 0, RangeAddFenwick::len(self) - 1)?;
        self.range_sum(left + 1, right + 1)
    }
}

/// Aggregate a workload computes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum AggregateKind {
    /// Sum (invertible)
    Sum,
    /// Minimum
    Min,
    /// Maximum
    Max,
    /// Greatest common divisor
    Gcd,
    /// User-supplied monoid
    Custom {
        /// Whether `combine` has an inverse (prefix differences are valid)
        invertible: bool,
    },
}

impl AggregateKind {
    /// Range answers can be derived as `prefix(r) - prefix(l - 1)`
    pub fn is_invertible(&self) -> bool {
        match self {
            AggregateKind::Sum => true,
            AggregateKind::Min | AggregateKind::Max | AggregateKind::Gcd => false,
            AggregateKind::Custom { invertible } => *invertible,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            AggregateKind::Sum => "sum",
            AggregateKind::Min => "min",
            AggregateKind::Max => "max",
            AggregateKind::Gcd => "gcd",
            AggregateKind::Custom { .. } => "custom",
        }
    }
}

/// Updates a workload performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum UpdateMode {
    /// Point updates only
    #[default]
    Point,
    /// Additive range updates
    RangeAdd,
    /// Assignment range updates
    RangeAssign,
}

impl UpdateMode {
    /// Whether any range update is required
    pub fn has_range_updates(&self) -> bool {
        !matches!(self, UpdateMode::Point)
    }

    fn name(&self) -> &'static str {
        match self {
            UpdateMode::Point => "point",
            UpdateMode::RangeAdd => "additive range",
            UpdateMode::RangeAssign => "assignment range",
        }
    }
}

/// Concrete structure to build for a workload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum Backend {
    /// [`FenwickTree`]
    Fenwick,
    /// [`SegmentTree`]
    SegmentTree,
    /// [`LazySegmentTree`] with [`Add`](crate::algebra::Add) or
    /// [`Assign`](crate::algebra::Assign)
    LazySegmentTree,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Backend::Fenwick => "fenwick",
            Backend::SegmentTree => "segment_tree",
            Backend::LazySegmentTree => "lazy_segment_tree",
        };
        f.write_str(name)
    }
}

/// Design-time description of how a sequence will be used
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct Workload {
    /// Aggregate answered by queries
    pub aggregate: AggregateKind,
    /// Update pattern
    pub updates: UpdateMode,
}

impl Workload {
    /// Workload with point updates only
    pub fn new(aggregate: AggregateKind) -> Self {
        Self {
            aggregate,
            updates: UpdateMode::Point,
        }
    }

    /// Set the update pattern
    pub fn with_updates(mut self, updates: UpdateMode) -> Self {
        self.updates = updates;
        self
    }

    /// Pick the backend for this workload.
    ///
    /// Fails for additive range updates on gcd, and for range updates on
    /// custom aggregates, which have no update policy.
    pub fn backend(&self) -> Result<Backend> {
        let unsupported = match self.aggregate {
            AggregateKind::Gcd => self.updates == UpdateMode::RangeAdd,
            AggregateKind::Custom { .. } => self.updates.has_range_updates(),
            _ => false,
        };
        if unsupported {
            return Err(ConstructionError::UnsupportedUpdate {
                aggregate: self.aggregate.name(),
                update: self.updates.name(),
            }
            .into());
        }

        let backend = if self.updates.has_range_updates() {
            Backend::LazySegmentTree
        } else if self.aggregate.is_invertible() {
            Backend::Fenwick
        } else {
            Backend::SegmentTree
        };

        tracing::debug!(
            aggregate = self.aggregate.name(),
            updates = self.updates.name(),
            %backend,
            "selected backend"
        );
        Ok(backend)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algebra::{Add, Max, Sum};
    use crate::EngineError;

    #[test]
    fn test_backend_selection() {
        let sum = Workload::new(AggregateKind::Sum);
        assert_eq!(sum.backend().unwrap(), Backend::Fenwick);
        assert_eq!(
            sum.with_updates(UpdateMode::RangeAdd).backend().unwrap(),
            Backend::LazySegmentTree
        );
        assert_eq!(
            Workload::new(AggregateKind::Max).backend().unwrap(),
            Backend::SegmentTree
        );
        assert_eq!(
            Workload::new(AggregateKind::Custom { invertible: true }).backend().unwrap(),
            Backend::Fenwick
        );
        assert_eq!(
            Workload::new(AggregateKind::Gcd)
                .with_updates(UpdateMode::RangeAssign)
                .backend()
                .unwrap(),
            Backend::LazySegmentTree
        );
    }

    #[test]
    fn test_gcd_range_add_unsupported() {
        let err = Workload::new(AggregateKind::Gcd)
            .with_updates(UpdateMode::RangeAdd)
            .backend()
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Construction(ConstructionError::UnsupportedUpdate { aggregate: "gcd", .. })
        ));
    }

    #[test]
    fn test_custom_range_updates_unsupported() {
        let custom = Workload::new(AggregateKind::Custom { invertible: false });
        assert_eq!(custom.backend().unwrap(), Backend::SegmentTree);
        for updates in [UpdateMode::RangeAdd, UpdateMode::RangeAssign] {
            let err = custom.with_updates(updates).backend().unwrap_err();
            assert!(matches!(
                err,
                EngineError::Construction(ConstructionError::UnsupportedUpdate {
                    aggregate: "custom",
                    ..
                })
            ));
        }
    }

    fn total<Q: RangeQuery>(engine: &mut Q) -> Result<Q::Output> {
        let last = engine.len() - 1;
        engine.query(0, last)
    }

    #[test]
    fn test_fenwick_normalised_to_zero_based() {
        let values = [2i64, 4, 5, 7, 2, 3, 1, 6];
        let mut fw = FenwickTree::from_slice(&values).unwrap();
        let mut seg = SegmentTree::build(&values, Sum::new()).unwrap();

        assert_eq!(RangeQuery::query(&mut fw, 2, 5).unwrap(), 17);
        assert_eq!(RangeQuery::query(&mut seg, 2, 5).unwrap(), 17);
        assert_eq!(total(&mut fw).unwrap(), total(&mut seg).unwrap());

        // 0-based bounds are reported in 0-based terms
        assert_eq!(
            RangeQuery::query(&mut fw, 0, 8),
            Err(EngineError::InvalidRange {
                left: 0,
                right: 8,
                lower: 0,
                upper: 7
            })
        );
    }

    #[test]
    fn test_lazy_through_trait() {
        let mut tree = LazySegmentTree::<Max<i64>, Add>::build(&[1, 9, 3], Max::new()).unwrap();
        tree.range_update(2, 2, 10).unwrap();
        assert_eq!(total(&mut tree).unwrap(), 13);

        let mut fw = RangeAddFenwick::from_slice(&[1i64, 9, 3]).unwrap();
        fw.range_add(3, 3, 10).unwrap();
        assert_eq!(total(&mut fw).unwrap(), 23);
        assert!(!fw.is_empty());
    }
}

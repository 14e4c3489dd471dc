//! Segment tree core
//!
//! Binary tree over array ranges caching one aggregate per node.
//!
//! Arena representation: no pointers between nodes!
//! Slot `i` has children `2i` and `2i + 1`; intervals are recomputed on the
//! way down from the root (see [`NodeSpan`]).

mod node;

pub use node::NodeSpan;

use crate::{
    algebra::{check_identity, FnMonoid, Monoid},
    arena_slots, check_index, check_range,
    stats::{OperationKind, OperationProfile, OperationStats, OperationTracker},
    EngineConfig, Result,
};

/// Segment tree with point updates and associative range queries.
///
/// Indices are 0-based and ranges are inclusive: `range_query(l, r)` folds
/// `values[l..=r]`.
#[derive(Debug, Clone)]
pub struct SegmentTree<M: Monoid> {
    /// Number of leaves `n`
    len: usize,

    /// Cached aggregates, slot 0 unused
    nodes: Vec<M::Value>,

    monoid: M,
    config: EngineConfig,

    /// Stats of the most recent mutating operation
    last: Option<OperationStats>,
    profile: Option<OperationProfile>,
}

impl<M: Monoid> SegmentTree<M> {
    /// Build over `values` in O(n)
    pub fn build(values: &[M::Value], monoid: M) -> Result<Self> {
        Self::with_config(values, monoid, EngineConfig::default())
    }

    /// Build after verifying that the identity is neutral for every input value
    pub fn build_checked(values: &[M::Value], monoid: M) -> Result<Self> {
        check_identity(&monoid, values)?;
        Self::build(values, monoid)
    }

    /// Build with explicit configuration
    pub fn with_config(values: &[M::Value], monoid: M, config: EngineConfig) -> Result<Self> {
        let slots = arena_slots(values.len())?;

        let mut tree = Self {
            len: values.len(),
            nodes: vec![monoid.identity(); slots],
            monoid,
            config,
            last: None,
            profile: config.profile_operations.then(OperationProfile::default),
        };

        let mut tracker = OperationTracker::new(OperationKind::Build);
        tree.build_recursive(NodeSpan::root(tree.len), values, &mut tracker);
        tree.record(tracker.finish());

        tracing::debug!(len = tree.len, slots, "built segment tree");
        Ok(tree)
    }

    fn build_recursive(
        &mut self,
        node: NodeSpan,
        values: &[M::Value],
        tracker: &mut OperationTracker,
    ) {
        tracker.enter_node();

        if node.is_leaf() {
            self.nodes[node.index] = values[node.start].clone();
        } else {
            let (left_child, right_child) = node.children();
            self.build_recursive(left_child, values, tracker);
            self.build_recursive(right_child, values, tracker);
            self.pull(node.index);
        }

        tracker.leave_node();
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always false: empty sequences are rejected at construction
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Aggregate supplied at construction
    pub fn monoid(&self) -> &M {
        &self.monoid
    }

    /// Aggregate over the whole sequence (root slot)
    pub fn total(&self) -> M::Value {
        self.nodes[1].clone()
    }

    /// Set `values[index] = value` and recompute ancestors bottom-up
    pub fn point_update(&mut self, index: usize, value: M::Value) -> Result<()> {
        check_index(index, 0, self.len - 1)?;

        let mut tracker = OperationTracker::new(OperationKind::PointUpdate);
        self.update_recursive(NodeSpan::root(self.len), index, value, &mut tracker);
        self.record(tracker.finish());

        if self.config.verify_invariants {
            self.verify();
        }
        Ok(())
    }

    fn update_recursive(
        &mut self,
        node: NodeSpan,
        index: usize,
        value: M::Value,
        tracker: &mut OperationTracker,
    ) {
        tracker.enter_node();

        if node.is_leaf() {
            self.nodes[node.index] = value;
        } else {
            let (left_child, right_child) = node.children();
            if left_child.contains(index) {
                self.update_recursive(left_child, index, value, tracker);
            } else {
                self.update_recursive(right_child, index, value, tracker);
            }
            self.pull(node.index);
        }

        tracker.leave_node();
    }

    /// Fold `combine` over `values[left..=right]` in O(log n)
    pub fn range_query(&self, left: usize, right: usize) -> Result<M::Value> {
        self.range_query_traced(left, right).map(|(value, _)| value)
    }

    /// Like [`range_query`](Self::range_query), also returning traversal counters.
    ///
    /// Queries borrow the tree immutably, so they are not folded into the profile.
    pub fn range_query_traced(
        &self,
        left: usize,
        right: usize,
    ) -> Result<(M::Value, OperationStats)> {
        check_range(left, right, 0, self.len - 1)?;

        let mut tracker = OperationTracker::new(OperationKind::RangeQuery);
        let value = self.query_recursive(NodeSpan::root(self.len), left, right + 1, &mut tracker);
        Ok((value, tracker.finish()))
    }

    fn query_recursive(
        &self,
        node: NodeSpan,
        left: usize,
        right: usize,
        tracker: &mut OperationTracker,
    ) -> M::Value {
        tracker.enter_node();

        let result = if node.disjoint(left, right) {
            self.monoid.identity()
        } else if node.within(left, right) {
            self.nodes[node.index].clone()
        } else {
            let (left_child, right_child) = node.children();
            let left_value = self.query_recursive(left_child, left, right, tracker);
            let right_value = self.query_recursive(right_child, left, right, tracker);
            self.monoid.combine(&left_value, &right_value)
        };

        tracker.leave_node();
        result
    }

    /// Element at `index`
    pub fn get(&self, index: usize) -> Result<M::Value> {
        check_index(index, 0, self.len - 1)?;
        self.range_query(index, index)
    }

    /// Materialise the backing sequence from the leaves
    pub fn to_vec(&self) -> Vec<M::Value> {
        let mut out = Vec::with_capacity(self.len);
        self.collect_leaves(NodeSpan::root(self.len), &mut out);
        out
    }

    fn collect_leaves(&self, node: NodeSpan, out: &mut Vec<M::Value>) {
        if node.is_leaf() {
            out.push(self.nodes[node.index].clone());
            return;
        }
        let (left_child, right_child) = node.children();
        self.collect_leaves(left_child, out);
        self.collect_leaves(right_child, out);
    }

    /// First internal node whose cached aggregate differs from
    /// `combine(left, right)` of its children, in pre-order
    pub fn first_inconsistent_node(&self) -> Option<NodeSpan> {
        self.check_recursive(NodeSpan::root(self.len))
    }

    fn check_recursive(&self, node: NodeSpan) -> Option<NodeSpan> {
        if node.is_leaf() {
            return None;
        }
        let (left_child, right_child) = node.children();
        let expected = self
            .monoid
            .combine(&self.nodes[left_child.index], &self.nodes[right_child.index]);
        if self.nodes[node.index] != expected {
            return Some(node);
        }
        self.check_recursive(left_child)
            .or_else(|| self.check_recursive(right_child))
    }

    /// Stats of the most recent build or update
    pub fn last_operation(&self) -> Option<&OperationStats> {
        self.last.as_ref()
    }

    /// Accumulated profile (if enabled)
    pub fn profile(&self) -> Option<&OperationProfile> {
        self.profile.as_ref()
    }

    /// Take the accumulated profile, leaving a fresh one behind
    pub fn take_profile(&mut self) -> Option<OperationProfile> {
        let taken = self.profile.take();
        if self.config.profile_operations {
            self.profile = Some(OperationProfile::default());
        }
        taken
    }

    /// Recompute slot `index` from its two children
    #[inline]
    fn pull(&mut self, index: usize) {
        self.nodes[index] = self
            .monoid
            .combine(&self.nodes[2 * index], &self.nodes[2 * index + 1]);
    }

    fn record(&mut self, stats: OperationStats) {
        if let Some(profile) = self.profile.as_mut() {
            profile.record(&stats);
        }
        self.last = Some(stats);
    }

    fn verify(&self) {
        let inconsistent = self.first_inconsistent_node();
        if let Some(node) = inconsistent {
            tracing::warn!(%node, "segment tree aggregate out of sync with children");
        }
        debug_assert!(
            inconsistent.is_none(),
            "segment tree invariant violated at {:?}",
            inconsistent
        );
    }
}

impl<T, F> SegmentTree<FnMonoid<T, F>>
where
    FnMonoid<T, F>: Monoid<Value = T>,
    F: Fn(&T, &T) -> T,
{
    /// Build from a `combine` closure and its identity.
    ///
    /// The identity is checked against every input value first; a value it is
    /// not neutral for fails with
    /// [`IdentityViolation`](crate::ConstructionError::IdentityViolation).
    pub fn from_fn(values: &[T], combine: F, identity: T) -> Result<Self> {
        Self::build_checked(values, FnMonoid::new(combine, identity))
    }
}

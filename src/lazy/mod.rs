//! Lazy propagation layer
//!
//! Extends the segment tree with deferred range updates:
//! - Fully covered node: apply the update to its aggregate, stash it as a tag, stop
//! - Partially covered node: push its tag down first, then recurse
//!
//! Per-node state machine:
//!   Clean (no tag, children current) ⇄ Dirty (tag, own aggregate correct, children stale)
//! Dirty → Clean happens only in `push_down`, which leaves both children Dirty.
//! Leaves never hold a tag.

mod tags;

pub use tags::TagLedger;

use std::marker::PhantomData;

use crate::{
    algebra::{Monoid, UpdatePolicy},
    arena_slots, check_index, check_range,
    stats::{OperationKind, OperationProfile, OperationStats, OperationTracker},
    tree::NodeSpan,
    EngineConfig, Result,
};

/// Segment tree with O(log n) range updates under update policy `U`.
///
/// 0-based inclusive ranges, like [`SegmentTree`](crate::SegmentTree).
/// Queries take `&mut self`: they push pending tags down the access path.
#[derive(Debug, Clone)]
pub struct LazySegmentTree<M, U>
where
    M: Monoid,
    U: UpdatePolicy<M>,
{
    len: usize,
    nodes: Vec<M::Value>,
    tags: TagLedger<U::Tag>,
    monoid: M,
    config: EngineConfig,
    last: Option<OperationStats>,
    profile: Option<OperationProfile>,
    _policy: PhantomData<U>,
}

impl<M, U> LazySegmentTree<M, U>
where
    M: Monoid,
    U: UpdatePolicy<M>,
{
    /// Build over `values` in O(n)
    pub fn build(values: &[M::Value], monoid: M) -> Result<Self> {
        Self::with_config(values, monoid, EngineConfig::default())
    }

    /// Build with explicit configuration
    pub fn with_config(values: &[M::Value], monoid: M, config: EngineConfig) -> Result<Self> {
        let slots = arena_slots(values.len())?;

        let mut tree = Self {
            len: values.len(),
            nodes: vec![monoid.identity(); slots],
            tags: TagLedger::new(slots),
            monoid,
            config,
            last: None,
            profile: config.profile_operations.then(OperationProfile::default),
            _policy: PhantomData,
        };

        let mut tracker = OperationTracker::new(OperationKind::Build);
        tree.build_recursive(NodeSpan::root(tree.len), values, &mut tracker);
        tree.record(tracker.finish());

        tracing::debug!(len = tree.len, slots, "built lazy segment tree");
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

    /// Aggregate over the whole sequence. The root is never stale.
    pub fn total(&self) -> M::Value {
        self.nodes[1].clone()
    }

    /// Apply `tag` to every element of `values[left..=right]` in O(log n)
    pub fn range_update(&mut self, left: usize, right: usize, tag: U::Tag) -> Result<()> {
        check_range(left, right, 0, self.len - 1)?;

        let mut tracker = OperationTracker::new(OperationKind::RangeUpdate);
        self.update_recursive(NodeSpan::root(self.len), left, right + 1, &tag, &mut tracker);
        let stats = tracker.finish();
        tracing::trace!(left, right, ?tag, nodes = stats.nodes_visited, "range update");
        self.record(stats);

        if self.config.verify_invariants {
            self.verify();
        }
        Ok(())
    }

    fn update_recursive(
        &mut self,
        node: NodeSpan,
        left: usize,
        right: usize,
        tag: &U::Tag,
        tracker: &mut OperationTracker,
    ) {
        tracker.enter_node();

        if node.within(left, right) {
            self.apply(node, tag);
        } else if !node.disjoint(left, right) {
            self.push_down(node, tracker);
            let (left_child, right_child) = node.children();
            self.update_recursive(left_child, left, right, tag, tracker);
            self.update_recursive(right_child, left, right, tag, tracker);
            self.pull(node.index);
        }

        tracker.leave_node();
    }

    /// Set `values[index] = value`, pushing pending tags off the path first
    pub fn point_update(&mut self, index: usize, value: M::Value) -> Result<()> {
        check_index(index, 0, self.len - 1)?;

        let mut tracker = OperationTracker::new(OperationKind::PointUpdate);
        self.assign_recursive(NodeSpan::root(self.len), index, value, &mut tracker);
        self.record(tracker.finish());

        if self.config.verify_invariants {
            self.verify();
        }
        Ok(())
    }

    fn assign_recursive(
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
            self.push_down(node, tracker);
            let (left_child, right_child) = node.children();
            if left_child.contains(index) {
                self.assign_recursive(left_child, index, value, tracker);
            } else {
                self.assign_recursive(right_child, index, value, tracker);
            }
            self.pull(node.index);
        }

        tracker.leave_node();
    }

    /// Fold `combine` over `values[left..=right]` in O(log n)
    pub fn range_query(&mut self, left: usize, right: usize) -> Result<M::Value> {
        self.range_query_traced(left, right).map(|(value, _)| value)
    }

    /// Like [`range_query`](Self::range_query), also returning traversal counters
    pub fn range_query_traced(
        &mut self,
        left: usize,
        right: usize,
    ) -> Result<(M::Value, OperationStats)> {
        check_range(left, right, 0, self.len - 1)?;

        let mut tracker = OperationTracker::new(OperationKind::RangeQuery);
        let value = self.query_recursive(NodeSpan::root(self.len), left, right + 1, &mut tracker);
        let stats = tracker.finish();
        self.record(stats);
        Ok((value, stats))
    }

    fn query_recursive(
        &mut self,
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
            self.push_down(node, tracker);
            let (left_child, right_child) = node.children();
            let left_value = self.query_recursive(left_child, left, right, tracker);
            let right_value = self.query_recursive(right_child, left, right, tracker);
            self.monoid.combine(&left_value, &right_value)
        };

        tracker.leave_node();
        result
    }

    /// Element at `index`
    pub fn get(&mut self, index: usize) -> Result<M::Value> {
        check_index(index, 0, self.len - 1)?;
        self.range_query(index, index)
    }

    /// Push every pending tag to the leaves and return them in order
    pub fn to_vec(&mut self) -> Vec<M::Value> {
        let mut out = Vec::with_capacity(self.len);
        let mut tracker = OperationTracker::new(OperationKind::RangeQuery);
        self.flush_recursive(NodeSpan::root(self.len), &mut out, &mut tracker);
        out
    }

    fn flush_recursive(
        &mut self,
        node: NodeSpan,
        out: &mut Vec<M::Value>,
        tracker: &mut OperationTracker,
    ) {
        if node.is_leaf() {
            out.push(self.nodes[node.index].clone());
            return;
        }
        self.push_down(node, tracker);
        let (left_child, right_child) = node.children();
        self.flush_recursive(left_child, out, tracker);
        self.flush_recursive(right_child, out, tracker);
    }

    /// Number of nodes currently Dirty
    pub fn dirty_nodes(&self) -> usize {
        self.tags.dirty_count()
    }

    /// Pending tag of a node, if Dirty
    pub fn pending_tag(&self, node: NodeSpan) -> Option<&U::Tag> {
        self.tags.pending(node.index)
    }

    /// First node violating the Clean/Dirty invariant, in pre-order.
    ///
    /// A Clean internal node must equal `combine(left, right)`; a Dirty one
    /// must equal that combination with its tag applied; leaves must be Clean.
    pub fn first_inconsistent_node(&self) -> Option<NodeSpan> {
        self.check_recursive(NodeSpan::root(self.len))
    }

    fn check_recursive(&self, node: NodeSpan) -> Option<NodeSpan> {
        if node.is_leaf() {
            return self.tags.is_dirty(node.index).then_some(node);
        }
        let (left_child, right_child) = node.children();
        let combined = self
            .monoid
            .combine(&self.nodes[left_child.index], &self.nodes[right_child.index]);
        let expected = match self.tags.pending(node.index) {
            Some(tag) => U::apply(&self.monoid, &combined, tag, node.length()),
            None => combined,
        };
        if self.nodes[node.index] != expected {
            return Some(node);
        }
        self.check_recursive(left_child)
            .or_else(|| self.check_recursive(right_child))
    }

    /// Stats of the most recent operation
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

    /// Apply `tag` to a node's aggregate and, for internal nodes, its tag slot
    fn apply(&mut self, node: NodeSpan, tag: &U::Tag) {
        let updated = U::apply(&self.monoid, &self.nodes[node.index], tag, node.length());
        self.nodes[node.index] = updated;
        if !node.is_leaf() {
            self.tags.attach(node.index, tag, U::compose);
        }
    }

    /// Move a Dirty node's tag onto both children (Dirty → Clean).
    /// No-op for Clean nodes.
    fn push_down(&mut self, node: NodeSpan, tracker: &mut OperationTracker) {
        debug_assert!(!node.is_leaf(), "push_down on leaf {}", node);

        if let Some(tag) = self.tags.take(node.index) {
            let (left_child, right_child) = node.children();
            self.apply(left_child, &tag);
            self.apply(right_child, &tag);
            tracker.record_push_down();
        }
    }

    /// Recompute a Clean node from its children
    #[inline]
    fn pull(&mut self, index: usize) {
        debug_assert!(!self.tags.is_dirty(index), "pull on Dirty slot {}", index);
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
            tracing::warn!(
                %node,
                dirty = self.tags.is_dirty(node.index),
                "lazy segment tree invariant violated"
            );
        }
        debug_assert!(inconsistent.is_none(), "lazy invariant violated at {:?}", inconsistent);
    }
}

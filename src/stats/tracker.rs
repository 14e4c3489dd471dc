//! Per-operation traversal tracking

use std::fmt;

/// Kind of operation being tracked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub enum OperationKind {
    /// Initial O(n) construction
    Build,
    /// Single-leaf update
    PointUpdate,
    /// Deferred update over a range
    RangeUpdate,
    /// Range aggregate query
    RangeQuery,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::Build => "build",
            OperationKind::PointUpdate => "point_update",
            OperationKind::RangeUpdate => "range_update",
            OperationKind::RangeQuery => "range_query",
        };
        f.write_str(name)
    }
}

/// Counters for a single completed operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct OperationStats {
    /// Operation kind
    pub kind: OperationKind,
    /// Arena nodes entered (including disjoint ones that returned immediately)
    pub nodes_visited: usize,
    /// Tags pushed from a node to its children
    pub push_downs: usize,
    /// Deepest recursion level reached (root = 1)
    pub max_depth: usize,
}

/// Tracks traversal counters while one operation runs
#[derive(Debug)]
pub struct OperationTracker {
    kind: OperationKind,
    nodes_visited: usize,
    push_downs: usize,
    depth: usize,
    max_depth: usize,
}

impl OperationTracker {
    /// Start tracking an operation
    pub fn new(kind: OperationKind) -> Self {
        Self {
            kind,
            nodes_visited: 0,
            push_downs: 0,
            depth: 0,
            max_depth: 0,
        }
    }

    /// Enter a node (one recursion level deeper)
    #[inline]
    pub fn enter_node(&mut self) {
        self.nodes_visited += 1;
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
    }

    /// Leave the current node
    #[inline]
    pub fn leave_node(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Count one push-down
    #[inline]
    pub fn record_push_down(&mut self) {
        self.push_downs += 1;
    }

    /// Current recursion depth
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Finish tracking
    pub fn finish(self) -> OperationStats {
        debug_assert_eq!(self.depth, 0, "unbalanced enter/leave in {}", self.kind);
        OperationStats {
            kind: self.kind,
            nodes_visited: self.nodes_visited,
            push_downs: self.push_downs,
            max_depth: self.max_depth,
        }
    }
}

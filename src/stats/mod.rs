//! Operation accounting and profiling
//!
//! Counts nodes visited and push-downs per operation to verify the
//! O(log n) traversal bound

mod tracker;

pub use tracker::{OperationKind, OperationStats, OperationTracker};

/// Accumulated statistics across operations (if profiling is enabled)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct OperationProfile {
    /// Operations recorded, by kind
    pub builds: usize,
    /// Point updates recorded
    pub point_updates: usize,
    /// Range updates recorded
    pub range_updates: usize,
    /// Range queries recorded
    pub range_queries: usize,

    /// Nodes visited over all recorded operations
    pub total_nodes_visited: usize,
    /// Push-downs over all recorded operations
    pub total_push_downs: usize,

    /// Deepest recursion seen
    pub max_depth: usize,
    /// Most nodes visited by a single non-build operation
    pub max_nodes_visited: usize,
}

impl OperationProfile {
    /// Fold one operation into the profile
    pub fn record(&mut self, stats: &OperationStats) {
        match stats.kind {
            OperationKind::Build => self.builds += 1,
            OperationKind::PointUpdate => self.point_updates += 1,
            OperationKind::RangeUpdate => self.range_updates += 1,
            OperationKind::RangeQuery => self.range_queries += 1,
        }
        self.total_nodes_visited += stats.nodes_visited;
        self.total_push_downs += stats.push_downs;
        self.max_depth = self.max_depth.max(stats.max_depth);
        if stats.kind != OperationKind::Build {
            self.max_nodes_visited = self.max_nodes_visited.max(stats.nodes_visited);
        }
    }

    /// Total operations recorded
    pub fn operations(&self) -> usize {
        self.builds + self.point_updates + self.range_updates + self.range_queries
    }

    /// Verify every non-build operation stayed within [`visit_bound`]
    pub fn satisfies_bound(&self, len: usize) -> bool {
        self.max_nodes_visited <= visit_bound(len)
    }

    /// Generate report
    pub fn report(&self) -> String {
        format!(
            "Operations: {}\n  Builds: {}\n  Point updates: {}\n  Range updates: {}\n  \
             Range queries: {}\nNodes visited: {} (max {} per op)\nPush-downs: {}\nMax depth: {}",
            self.operations(),
            self.builds,
            self.point_updates,
            self.range_updates,
            self.range_queries,
            self.total_nodes_visited,
            self.max_nodes_visited,
            self.total_push_downs,
            self.max_depth
        )
    }
}

/// Upper bound on nodes visited by one range operation over `len` leaves.
///
/// At most four nodes are touched per level of a tree of height
/// `⌈log2 len⌉ + 1`.
pub fn visit_bound(len: usize) -> usize {
    4 * (height(len) + 1)
}

/// Height of the midpoint-split tree over `len` leaves: `⌈log2 len⌉`
pub fn height(len: usize) -> usize {
    if len <= 1 {
        0
    } else {
        (usize::BITS - (len - 1).leading_zeros()) as usize
    }
}

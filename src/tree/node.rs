//! Arena node representation
//!
//! Node = arena slot `index` + half-open interval `[start, end)`
//! Children computed via midpoint: m = start + ⌈(end - start) / 2⌉
//!   Left child:  slot 2i,     [start, m)
//!   Right child: slot 2i + 1, [m, end)

use std::fmt;

/// Tree node (implicit - slot index plus the interval it covers)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeSpan {
    /// Arena slot (root = 1)
    pub index: usize,

    /// First covered position (inclusive)
    pub start: usize,

    /// One past the last covered position
    pub end: usize,
}

impl NodeSpan {
    /// Create root spanning `[0, len)`
    pub fn root(len: usize) -> Self {
        Self {
            index: 1,
            start: 0,
            end: len,
        }
    }

    /// Check if leaf (unit interval)
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.end - self.start == 1
    }

    /// Interval length
    #[inline]
    pub fn length(&self) -> usize {
        self.end - self.start
    }

    /// Split point; the left child receives the larger half
    #[inline]
    pub fn midpoint(&self) -> usize {
        self.start + (self.length() + 1) / 2
    }

    /// Get children via midpoint split
    ///
    /// Returns: (`[start, mid)` at `2i`, `[mid, end)` at `2i + 1`)
    pub fn children(&self) -> (NodeSpan, NodeSpan) {
        debug_assert!(!self.is_leaf(), "Leaf has no children");

        let mid = self.midpoint();
        let left_child = NodeSpan {
            index: 2 * self.index,
            start: self.start,
            end: mid,
        };
        let right_child = NodeSpan {
            index: 2 * self.index + 1,
            start: mid,
            end: self.end,
        };

        (left_child, right_child)
    }

    /// Interval lies entirely inside `[left, right)`
    #[inline]
    pub fn within(&self, left: usize, right: usize) -> bool {
        left <= self.start && self.end <= right
    }

    /// Interval shares no position with `[left, right)`
    #[inline]
    pub fn disjoint(&self, left: usize, right: usize) -> bool {
        self.end <= left || right <= self.start
    }

    /// Interval contains `position`
    #[inline]
    pub fn contains(&self, position: usize) -> bool {
        self.start <= position && position < self.end
    }

    /// Compute depth from this node to its deepest leaf
    pub fn depth_to_leaf(&self) -> usize {
        let mut node = *self;
        let mut depth = 0;

        // The left child is never shorter, so following it reaches the deepest leaf
        while !node.is_leaf() {
            let (left_child, _) = node.children();
            node = left_child;
            depth += 1;
        }

        depth
    }
}

impl fmt::Display for NodeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_leaf() {
            write!(f, "#{} [{}]", self.index, self.start)
        } else {
            write!(f, "#{} [{}, {})", self.index, self.start, self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint_split() {
        let node = NodeSpan::root(100);
        let (left, right) = node.children();

        assert_eq!((left.index, left.start, left.end), (2, 0, 50));
        assert_eq!((right.index, right.start, right.end), (3, 50, 100));

        let (l, r) = NodeSpan::root(5).children();
        assert_eq!(l.length(), 3);
        assert_eq!(r.length(), 2);
    }

    #[test]
    fn test_geometric_shrinkage() {
        let root = NodeSpan::root(128);
        let mut node = root;
        let mut lengths = vec![node.length()];

        while !node.is_leaf() {
            let (left, _) = node.children();
            node = left;
            lengths.push(node.length());
        }

        for window in lengths.windows(2) {
            let expected_max = (window[0] + 1) / 2;
            assert!(
                window[1] <= expected_max,
                "Child length {} should be <= ⌈parent {}/2⌉ = {}",
                window[1],
                window[0],
                expected_max
            );
        }

        assert_eq!(root.depth_to_leaf(), 7);
        assert_eq!(NodeSpan::root(1).depth_to_leaf(), 0);
    }

    #[test]
    fn test_arena_fits_four_n() {
        // Every slot reachable from the root stays below 4n
        for n in 1..=257 {
            let mut stack = vec![NodeSpan::root(n)];
            while let Some(node) = stack.pop() {
                assert!(node.index < 4 * n, "slot {} out of arena for n={}", node.index, n);
                if !node.is_leaf() {
                    let (l, r) = node.children();
                    stack.push(l);
                    stack.push(r);
                }
            }
        }
    }

    #[test]
    fn test_overlap_predicates() {
        let node = NodeSpan {
            index: 5,
            start: 2,
            end: 4,
        };
        assert!(node.within(0, 8));
        assert!(node.within(2, 4));
        assert!(!node.within(3, 8));
        assert!(node.disjoint(4, 6));
        assert!(node.disjoint(0, 2));
        assert!(!node.disjoint(3, 5));
        assert!(node.contains(3));
        assert!(!node.contains(4));
        assert_eq!(node.to_string(), "#5 [2, 4)");
    }
}

//! # Range Queries over Fixed-Size Sequences
//!
//! This library implements two complementary structures for range-aggregate
//! queries over a mutable sequence of fixed length `n`:
//!
//! 1. **Segment tree**: arena of `4n` slots caching an aggregate per node,
//!    O(log n) point updates and arbitrary associative range queries
//! 2. **Lazy propagation**: deferred range updates with a per-node
//!    Clean/Dirty tag, O(log n) per update instead of O(n)
//! 3. **Fenwick tree**: compact 1-indexed prefix sums for invertible
//!    aggregates, O(log n) point add and range sum
//! 4. **Dispatcher**: shared [`RangeQuery`] capability and a construction-time
//!    [`Backend`] choice from a [`Workload`] description
//!
//! ## Indexing
//!
//! Segment trees use 0-based inclusive bounds `[l, r]`. Fenwick trees use
//! 1-based indices, following the `i & -i` bit trick. The [`RangeQuery`]
//! implementations normalise both to 0-based inclusive bounds.
//!
//! ## Usage Example
//!
//! ```
//! use rangekit::{algebra::{Add, Sum}, LazySegmentTree};
//!
//! let mut tree = LazySegmentTree::<Sum<i64>, Add>::build(&[2, 4, 5, 7, 2, 3, 1, 6], Sum::new())?;
//! tree.range_update(2, 5, 3)?;
//! assert_eq!(tree.range_query(0, 7)?, 42);
//! # Ok::<(), rangekit::EngineError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

// Core modules
pub mod algebra;  // Monoids and update policies
pub mod tree;     // Segment tree core
pub mod lazy;     // Lazy propagation layer
pub mod fenwick;  // Binary indexed trees
pub mod dispatch; // Shared query capability and backend selection
pub mod stats;    // Per-operation traversal counters

// Re-exports for convenience
pub use algebra::{Monoid, UpdatePolicy};
pub use dispatch::{AggregateKind, Backend, RangeQuery, UpdateMode, Workload};
pub use fenwick::{FenwickTree, RangeAddFenwick};
pub use lazy::LazySegmentTree;
pub use stats::{OperationKind, OperationProfile, OperationStats};
pub use tree::{NodeSpan, SegmentTree};

use thiserror::Error;

/// Behavioural switches shared by every structure in the crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "visualize", derive(serde::Serialize))]
pub struct EngineConfig {
    /// Re-check every cached aggregate after each mutating operation.
    ///
    /// O(n) per update; meant for tests and debugging.
    pub verify_invariants: bool,

    /// Accumulate an [`OperationProfile`] across operations
    pub profile_operations: bool,
}

impl EngineConfig {
    /// Configuration with invariant checks and profiling both enabled
    pub fn debug() -> Self {
        Self {
            verify_invariants: true,
            profile_operations: true,
        }
    }

    /// Enable or disable post-update invariant checks
    pub fn with_verify_invariants(mut self, enabled: bool) -> Self {
        self.verify_invariants = enabled;
        self
    }

    /// Enable or disable operation profiling
    pub fn with_profiling(mut self, enabled: bool) -> Self {
        self.profile_operations = enabled;
        self
    }
}

/// Errors raised while building a structure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// Zero-length input; every structure requires `n >= 1`
    #[error("cannot build over an empty sequence")]
    EmptySequence,

    /// Supplied identity does not satisfy `combine(v, e) == v == combine(e, v)`
    #[error("identity element is not neutral for the value at position {position}")]
    IdentityViolation {
        /// Position of the first input value that exposed the violation
        position: usize,
    },

    /// The node arena for `len` elements does not fit in memory addressing
    #[error("sequence of length {len} is too large for the node arena")]
    TooLarge {
        /// Requested sequence length
        len: usize,
    },

    /// Aggregate and update semantics that cannot be combined
    #[error("{aggregate} aggregates do not support {update} updates")]
    UnsupportedUpdate {
        /// Aggregate name
        aggregate: &'static str,
        /// Update mode name
        update: &'static str,
    },
}

/// Errors returned by engine operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// `left > right`, or the range leaves the valid window `[lower, upper]`
    #[error("invalid range [{left}, {right}]: expected {lower} <= left <= right <= {upper}")]
    InvalidRange {
        /// Requested left bound
        left: usize,
        /// Requested right bound
        right: usize,
        /// Smallest valid index
        lower: usize,
        /// Largest valid index
        upper: usize,
    },

    /// Point access outside `[lower, upper]`
    #[error("index {index} out of bounds [{lower}, {upper}]")]
    InvalidIndex {
        /// Requested index
        index: usize,
        /// Smallest valid index
        lower: usize,
        /// Largest valid index
        upper: usize,
    },

    /// Structure could not be built
    #[error("construction failed: {0}")]
    Construction(#[from] ConstructionError),
}

/// Convenience alias used throughout the crate
pub type Result<T> = std::result::Result<T, EngineError>;

/// Reject `left > right` and anything outside `[lower, upper]`. Never clamps.
pub(crate) fn check_range(left: usize, right: usize, lower: usize, upper: usize) -> Result<()> {
    if left > right || left < lower || right > upper {
        tracing::debug!(left, right, lower, upper, "rejected range");
        return Err(EngineError::InvalidRange {
            left,
            right,
            lower,
            upper,
        });
    }
    Ok(())
}

/// Reject indices outside `[lower, upper]`
pub(crate) fn check_index(index: usize, lower: usize, upper: usize) -> Result<()> {
    if index < lower || index > upper {
        tracing::debug!(index, lower, upper, "rejected index");
        return Err(EngineError::InvalidIndex {
            index,
            lower,
            upper,
        });
    }
    Ok(())
}

/// Arena size for a recursive segment tree over `len` leaves (slot 0 unused)
pub(crate) fn arena_slots(len: usize) -> std::result::Result<usize, ConstructionError> {
    if len == 0 {
        return Err(ConstructionError::EmptySequence);
    }
    len.checked_mul(4).ok_or(ConstructionError::TooLarge { len })
}

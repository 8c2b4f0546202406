//! Failure conditions for edit application, consolidation, and patching.
//!
//! All of these are caller errors. Nothing is retried internally: every
//! computation here is pure and fails synchronously, leaving the inputs
//! it borrowed untouched.

use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ChangesetError {
    /// A position does not address anything in the current container state.
    /// For tree paths this reports the failing component and the child
    /// count at that depth.
    #[error("index {index} out of bounds (len {len})")]
    OutOfBounds { index: usize, len: usize },

    /// An operation log could not have been produced by sequential
    /// application to the stated original: replaying it hit an invalid
    /// position at `op_index`.
    #[error("inconsistent log: operation {op_index} references an invalid position")]
    InconsistentLog { op_index: usize },

    /// The supplied final snapshot disagrees with the element count the
    /// diff implies (original minus deletes plus inserts).
    #[error("snapshot mismatch: diff implies {expected} elements, snapshot has {actual}")]
    SnapshotMismatch { expected: usize, actual: usize },

    /// A tree mutation tried to give children to a node whose value does
    /// not allow them (e.g. an item in a sectioned array).
    #[error("shape violation: node cannot hold children")]
    ShapeViolation,
}

//! The edit primitive and its application to a flat ordered collection.
//!
//! An [`Op`] describes a single edit addressed by a position. Positions
//! are interpreted against the container state at the moment the
//! operation is applied; they are not stable across a sequence. The
//! diff machinery in [`crate::diff`] recovers the stable
//! original-to-final relationship from a log of such edits.
//!
//! `Move` is defined as remove-then-insert, with the destination
//! interpreted in the sequence after the removal, which makes the two
//! directions asymmetric:
//!
//! - `[a,b,c,d,e]` + `Move(1, 3)` → `[a,c,d,b,e]`
//! - `[a,b,c,d,e]` + `Move(3, 1)` → `[a,d,b,c,e]`

use crate::error::ChangesetError;

/// A single edit, generic over the position type.
///
/// The flat layer uses `Op<usize, T>`; the tree layer uses
/// `Op<Path, TreeNode<T>>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Op<P, T> {
    /// Insert `value` so that it ends up at position `at`.
    Insert { at: P, value: T },
    /// Remove the element at `at`.
    Delete { at: P },
    /// Replace the value at `at` without moving it.
    Update { at: P, value: T },
    /// Remove the element at `from` and reinsert it at `to`, where `to`
    /// addresses the sequence as it exists after the removal.
    Move { from: P, to: P },
}

/// Apply one operation to a flat collection in place.
///
/// Bounds: delete/update and a move's source require `pos < len`; insert
/// requires `pos <= len`; a move's destination must be a valid insertion
/// point in the post-removal sequence. A failed move reinserts the
/// removed element at its source before returning the error, so the
/// collection is unchanged on failure.
pub fn apply<T>(collection: &mut Vec<T>, op: Op<usize, T>) -> Result<(), ChangesetError> {
    let len = collection.len();
    match op {
        Op::Insert { at, value } => {
            if at > len {
                return Err(ChangesetError::OutOfBounds { index: at, len });
            }
            collection.insert(at, value);
        }
        Op::Delete { at } => {
            if at >= len {
                return Err(ChangesetError::OutOfBounds { index: at, len });
            }
            collection.remove(at);
        }
        Op::Update { at, value } => {
            if at >= len {
                return Err(ChangesetError::OutOfBounds { index: at, len });
            }
            collection[at] = value;
        }
        Op::Move { from, to } => {
            if from >= len {
                return Err(ChangesetError::OutOfBounds { index: from, len });
            }
            let value = collection.remove(from);
            if to > collection.len() {
                collection.insert(from, value);
                return Err(ChangesetError::OutOfBounds { index: to, len });
            }
            collection.insert(to, value);
        }
    }
    Ok(())
}

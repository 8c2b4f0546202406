//! Editscript - ordered-collection change tracking with replayable patches.
//!
//! A changeset records edits to an ordered collection as an operation
//! log, consolidates that log into a canonical diff, and turns the diff
//! into a patch: a minimal sequence of operations that is safe to replay
//! one at a time against the original contents. Flat vectors and
//! two-level trees (sections holding items) are both supported.
//!
//! # Quick Start
//!
//! ```
//! use editscript::changeset::VecChangeset;
//! use editscript::op::Op;
//!
//! let mut changeset = VecChangeset::new(vec!['a', 'b', 'c']);
//!
//! // Edit the collection; every operation is logged.
//! changeset.apply(Op::Insert { at: 3, value: 'd' }).unwrap();
//! changeset.apply(Op::Move { from: 0, to: 2 }).unwrap();
//! changeset.apply(Op::Delete { at: 0 }).unwrap();
//! assert_eq!(changeset.collection(), &['c', 'a', 'd']);
//!
//! // The patch replays the net effect against the original snapshot.
//! let mut replayed = changeset.original().to_vec();
//! for op in changeset.patch().unwrap() {
//!     editscript::op::apply(&mut replayed, op).unwrap();
//! }
//! assert_eq!(replayed, changeset.collection());
//! ```

pub mod array2d;
pub mod changeset;
pub mod diff;
pub mod error;
pub mod op;
mod patch;
pub mod path;
pub mod tree;

pub use array2d::{Array2dElement, SectionedArray};
pub use changeset::VecChangeset;
pub use diff::{Diff, Survivor};
pub use error::ChangesetError;
pub use op::Op;
pub use path::Path;
pub use tree::changeset::TreeChangeset;
pub use tree::diff::{TreeDiff, TreeSurvivor};
pub use tree::{TreeArray, TreeNode, TreeValue};

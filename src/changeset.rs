//! Pairing a live collection with the log of edits applied to it.
//!
//! A [`VecChangeset`] owns the collection, a snapshot of it from the
//! moment the changeset was created, and the operation log accumulated
//! since. The diff and patch are derived on demand; the patch replays
//! against the snapshot and reproduces the live collection.

use crate::diff::Diff;
use crate::error::ChangesetError;
use crate::op::{Op, apply};

/// A flat collection under observation.
#[derive(Clone, Debug)]
pub struct VecChangeset<T> {
    original: Vec<T>,
    collection: Vec<T>,
    log: Vec<Op<usize, T>>,
}

impl<T: Clone> VecChangeset<T> {
    /// Start observing `initial`. The snapshot the eventual patch
    /// replays against is taken here.
    pub fn new(initial: Vec<T>) -> VecChangeset<T> {
        VecChangeset {
            original: initial.clone(),
            collection: initial,
            log: Vec::new(),
        }
    }

    /// Apply one edit to the live collection and record it. On failure
    /// neither the collection nor the log changes.
    pub fn apply(&mut self, op: Op<usize, T>) -> Result<(), ChangesetError> {
        apply(&mut self.collection, op.clone())?;
        self.log.push(op);
        Ok(())
    }

    /// The live collection.
    pub fn collection(&self) -> &[T] {
        &self.collection
    }

    /// The snapshot taken when this changeset was created.
    pub fn original(&self) -> &[T] {
        &self.original
    }

    /// The raw operation log accumulated so far.
    pub fn log(&self) -> &[Op<usize, T>] {
        &self.log
    }

    /// Consolidate the log into a canonical diff.
    pub fn diff(&self) -> Result<Diff, ChangesetError> {
        Diff::from_ops(&self.log, self.original.len())
    }

    /// Consolidate and generate the replay-safe patch against the live
    /// collection's current contents.
    pub fn patch(&self) -> Result<Vec<Op<usize, T>>, ChangesetError> {
        self.diff()?.generate_patch(&self.collection)
    }
}

//! Pairing a live tree with the log of path-addressed edits applied to it.

use crate::error::ChangesetError;
use crate::op::Op;
use crate::path::Path;
use crate::tree::diff::TreeDiff;
use crate::tree::{TreeArray, TreeNode, TreeValue};

/// A tree under observation; the tree-layer counterpart of
/// [`crate::changeset::VecChangeset`].
#[derive(Clone, Debug)]
pub struct TreeChangeset<T> {
    original: TreeArray<T>,
    tree: TreeArray<T>,
    log: Vec<Op<Path, TreeNode<T>>>,
}

impl<T: TreeValue + Clone> TreeChangeset<T> {
    /// Start observing an empty tree.
    pub fn new() -> TreeChangeset<T> {
        TreeChangeset::from_tree(TreeArray::new())
    }

    /// Start observing `initial`. The snapshot the eventual patch
    /// replays against is taken here.
    pub fn from_tree(initial: TreeArray<T>) -> TreeChangeset<T> {
        TreeChangeset {
            original: initial.clone(),
            tree: initial,
            log: Vec::new(),
        }
    }

    /// Apply one edit to the live tree and record it. On failure neither
    /// the tree nor the log changes.
    pub fn apply(&mut self, op: Op<Path, TreeNode<T>>) -> Result<(), ChangesetError> {
        self.tree.apply(op.clone())?;
        self.log.push(op);
        Ok(())
    }

    /// The live tree.
    pub fn tree(&self) -> &TreeArray<T> {
        &self.tree
    }

    /// The snapshot taken when this changeset was created.
    pub fn original(&self) -> &TreeArray<T> {
        &self.original
    }

    /// The raw operation log accumulated so far.
    pub fn log(&self) -> &[Op<Path, TreeNode<T>>] {
        &self.log
    }

    /// Consolidate the log into a canonical diff.
    pub fn diff(&self) -> Result<TreeDiff, ChangesetError> {
        TreeDiff::from_ops(&self.log, &self.original)
    }

    /// Consolidate and generate the replay-safe patch against the live
    /// tree's current contents.
    pub fn patch(&self) -> Result<Vec<Op<Path, TreeNode<T>>>, ChangesetError> {
        self.diff()?.generate_patch(&self.tree)
    }
}

impl<T: TreeValue + Clone> Default for TreeChangeset<T> {
    fn default() -> Self {
        TreeChangeset::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_edits_and_round_trips() {
        let mut changeset: TreeChangeset<i32> = TreeChangeset::new();
        changeset
            .apply(Op::Insert { at: Path::from(0), value: TreeNode::new(10) })
            .unwrap();
        changeset
            .apply(Op::Insert { at: Path::from((0, 0)), value: TreeNode::new(11) })
            .unwrap();
        changeset
            .apply(Op::Move { from: Path::from((0, 0)), to: Path::from((0, 0)) })
            .unwrap();
        assert_eq!(changeset.log().len(), 3);

        let patch = changeset.patch().unwrap();
        let mut replayed = changeset.original().clone();
        for op in patch {
            replayed.apply(op).unwrap();
        }
        assert_eq!(&replayed, changeset.tree());
    }

    #[test]
    fn failed_apply_leaves_log_untouched() {
        let mut changeset: TreeChangeset<i32> = TreeChangeset::new();
        let err = changeset.apply(Op::Delete { at: Path::from(0) }).unwrap_err();
        assert!(matches!(err, ChangesetError::OutOfBounds { .. }));
        assert!(changeset.log().is_empty());
    }
}

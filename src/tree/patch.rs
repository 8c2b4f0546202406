//! Generating a safely ordered patch from a tree diff.
//!
//! The phase order matches the flat layer: deletes (descending), moves,
//! inserts (ascending), updates. Path order is lexicographic, so
//! descending deletes remove later siblings before earlier ones and
//! children before their parents, and no sibling renumbering is assumed
//! before the cross-subtree deletes have all been applied.
//!
//! Two cases have no flat counterpart. A survivor may have escaped a
//! subtree that was later deleted: the delete of its original ancestor
//! destroys its original node, so the patch *materializes* the survivor,
//! re-inserting its value (read from the final snapshot) during the
//! insert phase. Symmetrically, a survivor moved into a freshly inserted
//! subtree has no destination parent during the move phase and is
//! materialized too; that direction needs an explicit delete of its
//! original node, which in turn materializes any survivors remaining
//! underneath it. The classification below runs to a fixpoint.
//!
//! Survivors that are neither deleted nor materialized (the movers)
//! then form well-shaped forests on both the origin and the destination
//! side. The move phase walks the destination forest in pre-order and,
//! wherever the wrong node sits, pulls the right one from its current
//! position - every emitted path is valid in the tree as it exists
//! immediately before that move, and already-fixed positions are never
//! disturbed.

use rustc_hash::FxHashSet;

use crate::error::ChangesetError;
use crate::op::Op;
use crate::path::Path;
use crate::tree::diff::TreeDiff;
use crate::tree::{TreeArray, TreeNode, TreeValue};

/// Index of a survivor, used as the payload of the bookkeeping forests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Slot(usize);

impl TreeValue for Slot {}

impl TreeDiff {
    /// Produce the operation sequence that reproduces `final_snapshot`
    /// when applied, in order, to the original tree this diff was
    /// consolidated from.
    ///
    /// Fails with [`ChangesetError::SnapshotMismatch`] if the snapshot's
    /// node count disagrees with the diff, and with
    /// [`ChangesetError::OutOfBounds`] if its shape does not cover the
    /// diff's final paths.
    pub fn generate_patch<T: Clone>(
        &self,
        final_snapshot: &TreeArray<T>,
    ) -> Result<Vec<Op<Path, TreeNode<T>>>, ChangesetError> {
        if final_snapshot.node_count() != self.final_count() {
            return Err(ChangesetError::SnapshotMismatch {
                expected: self.final_count(),
                actual: final_snapshot.node_count(),
            });
        }

        // Classify survivors. `synthesized` holds every final path that
        // the insert phase will create rather than the move phase.
        let count = self.survivors.len();
        let mut materialized = vec![false; count];
        let mut synthesized: FxHashSet<Path> = self.inserts.iter().cloned().collect();
        let mut extra_deletes: Vec<Path> = Vec::new();
        loop {
            let mut changed = false;
            for (index, survivor) in self.survivors.iter().enumerate() {
                if materialized[index] {
                    continue;
                }
                let origin_destroyed = self
                    .deletes
                    .iter()
                    .chain(extra_deletes.iter())
                    .any(|deleted| deleted.is_proper_prefix_of(&survivor.origin));
                if origin_destroyed {
                    materialized[index] = true;
                    synthesized.insert(survivor.destination.clone());
                    changed = true;
                    continue;
                }
                let parent = survivor.destination.parent();
                if !parent.is_empty() && synthesized.contains(&parent) {
                    materialized[index] = true;
                    synthesized.insert(survivor.destination.clone());
                    extra_deletes.push(survivor.origin.clone());
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        let mut patch: Vec<Op<Path, TreeNode<T>>> = Vec::new();

        // Delete phase. A delete whose ancestor is also deleted is
        // covered by the ancestor's removal and is pruned.
        let mut deletes: Vec<Path> = self.deletes.iter().cloned().chain(extra_deletes).collect();
        deletes.sort();
        deletes.dedup();
        let roots: Vec<&Path> = deletes
            .iter()
            .filter(|path| !deletes.iter().any(|other| other.is_proper_prefix_of(path)))
            .collect();
        for path in roots.iter().rev() {
            patch.push(Op::Delete { at: (*path).clone() });
        }

        // Move phase over the movers only. Survivors are stored in
        // destination order, so filtering keeps that order for the
        // target forest; the work forest mirrors the post-delete tree,
        // which lists the same nodes in origin order.
        let movers: Vec<usize> = (0..count).filter(|&index| !materialized[index]).collect();
        let mut by_origin = movers.clone();
        by_origin.sort_by(|&a, &b| self.survivors[a].origin.cmp(&self.survivors[b].origin));
        let mut work = build_forest(by_origin.iter().map(|&i| (i, &self.survivors[i].origin)))?;
        let target = build_forest(movers.iter().map(|&i| (i, &self.survivors[i].destination)))?;

        for expected in target.paths() {
            let Some(slot) = target.node(&expected).map(|node| node.value) else {
                continue;
            };
            if work.node(&expected).map(|node| node.value) == Some(slot) {
                continue;
            }
            let Some(current) = locate(&work, slot) else {
                continue;
            };
            patch.push(Op::Move { from: current.clone(), to: expected.clone() });
            work.move_node(&current, &expected)?;
        }

        // Insert phase: new nodes and materialized survivors, ascending,
        // each as a childless node carrying the final snapshot's value.
        // Descendants of an inserted node are always inserted themselves,
        // so leaf inserts suffice.
        let mut creations: Vec<Path> = self.inserts.clone();
        for (index, survivor) in self.survivors.iter().enumerate() {
            if materialized[index] {
                creations.push(survivor.destination.clone());
            }
        }
        creations.sort();
        for at in creations {
            let value = value_at(final_snapshot, &at)?.clone();
            patch.push(Op::Insert { at, value: TreeNode::new(value) });
        }

        // Update phase. Materialized survivors already carry their final
        // value from the insert phase.
        for (index, survivor) in self.survivors.iter().enumerate() {
            if survivor.updated && !materialized[index] {
                let value = value_at(final_snapshot, &survivor.destination)?.clone();
                patch.push(Op::Update {
                    at: survivor.destination.clone(),
                    value: TreeNode::new(value),
                });
            }
        }

        Ok(patch)
    }
}

fn value_at<'a, T>(snapshot: &'a TreeArray<T>, path: &Path) -> Result<&'a T, ChangesetError> {
    snapshot
        .node(path)
        .map(|node| &node.value)
        .ok_or(ChangesetError::OutOfBounds { index: path.last().unwrap_or(0), len: 0 })
}

/// Build a forest of survivor slots from (slot, source path) pairs
/// sorted ascending by path. Sibling indices compress: each node goes
/// under its nearest placed ancestor, appended after its siblings.
fn build_forest<'a>(
    entries: impl Iterator<Item = (usize, &'a Path)>,
) -> Result<TreeArray<Slot>, ChangesetError> {
    let mut forest = TreeArray::new();
    let mut placed: Vec<(&'a Path, Path)> = Vec::new();
    for (slot, source) in entries {
        let parent = placed
            .iter()
            .rev()
            .find(|(source_path, _)| source_path.is_proper_prefix_of(source))
            .map(|(_, forest_path)| forest_path.clone())
            .unwrap_or_else(Path::root);
        let index = forest.child_count(&parent).unwrap_or(0);
        let at = parent.child(index);
        forest.insert(&at, TreeNode::new(Slot(slot)))?;
        placed.push((source, at));
    }
    Ok(forest)
}

/// Current path of a slot in the work forest.
fn locate(forest: &TreeArray<Slot>, slot: Slot) -> Option<Path> {
    forest
        .paths()
        .into_iter()
        .find(|path| forest.node(path).map(|node| node.value) == Some(slot))
}

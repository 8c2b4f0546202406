//! Consolidating a path-addressed operation log into a canonical diff.
//!
//! Same identity-tracking simulation as the flat layer, run over a
//! shadow tree instead of a working sequence. Every node of the original
//! tree gets an identity tagged with its original path; the shadow tree
//! then mirrors each logged operation. Deleting a subtree retires every
//! original identity inside it (freshly inserted nodes vanish without a
//! trace); moves relocate whole subtrees; updates flag the addressed
//! node only. The shadow tree's final shape yields the destination path
//! of every survivor and insert.
//!
//! The simulation sees shapes, never values, so it checks bounds but not
//! section/item shape - shape is enforced when the log is produced.

use crate::error::ChangesetError;
use crate::op::Op;
use crate::path::Path;
use crate::tree::{TreeArray, TreeNode, TreeValue};

/// A node present in both the original and final trees, possibly
/// relocated (its whole subtree with it) and/or value-updated.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TreeSurvivor {
    pub origin: Path,
    pub destination: Path,
    pub updated: bool,
}

/// Canonical, value-free summary of a path-addressed operation log.
///
/// Positions are per-node: deleting a subtree contributes one delete
/// entry for every original node inside it, and inserting a subtree
/// contributes one insert entry per node. Every original path appears in
/// exactly one of `deletes` and `survivors`; every final path is covered
/// by exactly one of `survivors` and `inserts`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TreeDiff {
    /// Original paths of deleted nodes, ascending (pre-order).
    pub deletes: Vec<Path>,
    /// Final paths of inserted nodes, ascending (pre-order).
    pub inserts: Vec<Path>,
    /// Surviving nodes, ordered by destination (pre-order).
    pub survivors: Vec<TreeSurvivor>,
}

/// Identity of one shadow node during simulation. Internal bookkeeping
/// only; discarded once consolidation completes.
#[derive(Clone, Debug)]
enum SlotId {
    Original(Path),
    Fresh,
}

#[derive(Clone, Debug)]
struct SimSlot {
    id: SlotId,
    updated: bool,
}

// The shadow tree has no section/item distinction; shape was already
// enforced when the ops were applied to the real tree.
impl TreeValue for SimSlot {}

impl TreeDiff {
    /// Consolidate a log of operations known to have been applied in
    /// sequence to `original` (whose shape, not values, seeds the
    /// identities).
    ///
    /// Fails with [`ChangesetError::InconsistentLog`] if any operation's
    /// path is invalid for the then-current simulated tree.
    pub fn from_ops<T>(
        ops: &[Op<Path, TreeNode<T>>],
        original: &TreeArray<T>,
    ) -> Result<TreeDiff, ChangesetError> {
        let mut shadow = TreeArray::new();
        for path in original.paths() {
            let slot = SimSlot { id: SlotId::Original(path.clone()), updated: false };
            // Paths come out pre-order, so every parent is placed before
            // its children and the insert cannot fail.
            shadow.insert(&path, TreeNode::new(slot))?;
        }

        let mut deletes = Vec::new();
        for (op_index, op) in ops.iter().enumerate() {
            let bad_log = ChangesetError::InconsistentLog { op_index };
            match op {
                Op::Insert { at, value } => {
                    let fresh = shadow_of(value);
                    shadow.insert(at, fresh).map_err(|_| bad_log)?;
                }
                Op::Delete { at } => {
                    let removed = shadow.remove(at).map_err(|_| bad_log)?;
                    retire(&removed, &mut deletes);
                }
                Op::Update { at, .. } => match shadow.node_mut(at) {
                    Some(node) => node.value.updated = true,
                    None => return Err(bad_log),
                },
                Op::Move { from, to } => {
                    shadow.move_node(from, to).map_err(|_| bad_log)?;
                }
            }
        }

        deletes.sort();
        let mut inserts = Vec::new();
        let mut survivors = Vec::new();
        for destination in shadow.paths() {
            let Some(node) = shadow.node(&destination) else {
                continue;
            };
            match &node.value.id {
                SlotId::Fresh => inserts.push(destination),
                SlotId::Original(origin) => survivors.push(TreeSurvivor {
                    origin: origin.clone(),
                    destination,
                    updated: node.value.updated,
                }),
            }
        }

        Ok(TreeDiff { deletes, inserts, survivors })
    }

    /// Node count of the original tree this diff was built over.
    pub fn original_count(&self) -> usize {
        self.deletes.len() + self.survivors.len()
    }

    /// Node count any structurally consistent final tree must have.
    pub fn final_count(&self) -> usize {
        self.survivors.len() + self.inserts.len()
    }

    /// True when the log had no net effect on positions or values.
    pub fn is_noop(&self) -> bool {
        self.deletes.is_empty()
            && self.inserts.is_empty()
            && self
                .survivors
                .iter()
                .all(|s| s.origin == s.destination && !s.updated)
    }
}

/// Mirror an inserted subtree's shape with fresh identities.
fn shadow_of<T>(node: &TreeNode<T>) -> TreeNode<SimSlot> {
    let children = node.children().iter().map(shadow_of).collect();
    TreeNode {
        value: SimSlot { id: SlotId::Fresh, updated: false },
        children,
    }
}

/// Record the original identities of a removed subtree as deleted.
fn retire(node: &TreeNode<SimSlot>, deletes: &mut Vec<Path>) {
    if let SlotId::Original(origin) = &node.value.id {
        deletes.push(origin.clone());
    }
    for child in node.children() {
        retire(child, deletes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TreeArray<i32> {
        // [10 [11, 12], 20 [21]]
        let mut tree = TreeArray::new();
        tree.insert(&Path::from(0), TreeNode::new(10)).unwrap();
        tree.insert(&Path::from((0, 0)), TreeNode::new(11)).unwrap();
        tree.insert(&Path::from((0, 1)), TreeNode::new(12)).unwrap();
        tree.insert(&Path::from(1), TreeNode::new(20)).unwrap();
        tree.insert(&Path::from((1, 0)), TreeNode::new(21)).unwrap();
        tree
    }

    #[test]
    fn empty_log_is_noop() {
        let diff = TreeDiff::from_ops::<i32>(&[], &sample()).unwrap();
        assert!(diff.is_noop());
        assert_eq!(diff.original_count(), 5);
        assert_eq!(diff.final_count(), 5);
    }

    #[test]
    fn subtree_delete_retires_every_node() {
        let log = vec![Op::Delete { at: Path::from(0) }];
        let diff = TreeDiff::from_ops::<i32>(&log, &sample()).unwrap();
        assert_eq!(
            diff.deletes,
            vec![Path::from(0), Path::from((0, 0)), Path::from((0, 1))]
        );
        assert_eq!(diff.survivors.len(), 2);
        assert_eq!(diff.survivors[0].origin, Path::from(1));
        assert_eq!(diff.survivors[0].destination, Path::from(0));
    }

    #[test]
    fn subtree_insert_records_every_node() {
        let node = TreeNode::with_children(30, vec![TreeNode::new(31)]).unwrap();
        let log = vec![Op::Insert { at: Path::from(1), value: node }];
        let diff = TreeDiff::from_ops(&log, &sample()).unwrap();
        assert_eq!(diff.inserts, vec![Path::from(1), Path::from((1, 0))]);
        // The old section 1 shifted to 2, its item with it.
        assert!(diff.survivors.iter().any(|s| {
            s.origin == Path::from((1, 0)) && s.destination == Path::from((2, 0))
        }));
    }

    #[test]
    fn cross_section_move_tracks_item() {
        let log = vec![Op::Move { from: Path::from((0, 0)), to: Path::from((1, 1)) }];
        let diff = TreeDiff::from_ops::<i32>(&log, &sample()).unwrap();
        assert!(diff.deletes.is_empty());
        assert!(diff.inserts.is_empty());
        assert!(diff.survivors.iter().any(|s| {
            s.origin == Path::from((0, 0)) && s.destination == Path::from((1, 1))
        }));
    }

    #[test]
    fn move_then_delete_collapses() {
        let log = vec![
            Op::Move { from: Path::from((0, 0)), to: Path::from((1, 1)) },
            Op::Delete { at: Path::from((1, 1)) },
        ];
        let collapsed = vec![Op::Delete { at: Path::from((0, 0)) }];
        assert_eq!(
            TreeDiff::from_ops::<i32>(&log, &sample()).unwrap(),
            TreeDiff::from_ops::<i32>(&collapsed, &sample()).unwrap()
        );
    }

    #[test]
    fn insert_then_delete_vanishes() {
        let log = vec![
            Op::Insert { at: Path::from((0, 2)), value: TreeNode::new(99) },
            Op::Delete { at: Path::from((0, 2)) },
        ];
        let diff = TreeDiff::from_ops(&log, &sample()).unwrap();
        assert!(diff.is_noop());
    }

    #[test]
    fn invalid_path_is_inconsistent() {
        let log = vec![Op::Delete { at: Path::from((3, 0)) }];
        let err = TreeDiff::from_ops::<i32>(&log, &sample()).unwrap_err();
        assert_eq!(err, ChangesetError::InconsistentLog { op_index: 0 });
    }
}

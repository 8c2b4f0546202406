//! Consolidating an operation log into a canonical diff.
//!
//! The log describes edits with positions that were only valid at the
//! moment each edit was applied. Consolidation recovers the net effect:
//! which original positions were deleted, which survived (and where they
//! ended up), and which final positions hold newly inserted elements.
//!
//! The algorithm is an identity-tracking simulation. Every element of the
//! original snapshot gets a synthetic identity tagged with its original
//! position; a working sequence of identities then mirrors each logged
//! operation in order. Inserts add fresh identities, deletes retire them,
//! moves relocate them, updates flag them. The working sequence's final
//! order *is* the destination ordering, so transient intermediate
//! positions never leak into the result. A move followed by a delete
//! collapses to one delete; an insert followed by a delete of the same
//! element vanishes entirely.

use crate::error::ChangesetError;
use crate::op::Op;

/// An element present in both the original and final snapshots, possibly
/// relocated and/or value-updated along the way.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Survivor {
    /// Position in the original snapshot.
    pub origin: usize,
    /// Position in the final snapshot.
    pub destination: usize,
    /// Whether any update touched this element. Idempotent: two updates
    /// collapse to one flag.
    pub updated: bool,
}

/// Canonical, value-free summary of an operation log's net effect.
///
/// Invariants: every original position appears in exactly one of
/// `deletes` and `survivors` (by origin); every final position is
/// occupied by exactly one of `survivors` (by destination) and `inserts`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Diff {
    /// Original positions of deleted elements, ascending.
    pub deletes: Vec<usize>,
    /// Final positions of inserted elements, ascending.
    pub inserts: Vec<usize>,
    /// Surviving elements, ordered by destination.
    pub survivors: Vec<Survivor>,
}

/// Identity of one slot in the working sequence during simulation.
/// Internal bookkeeping only; discarded once consolidation completes.
#[derive(Clone, Copy)]
enum Slot {
    Original(usize),
    Fresh,
}

#[derive(Clone, Copy)]
struct Tracked {
    slot: Slot,
    updated: bool,
}

impl Diff {
    /// Consolidate a log of operations known to have been applied in
    /// sequence to an original snapshot of `original_len` elements.
    ///
    /// Fails with [`ChangesetError::InconsistentLog`] if any operation's
    /// position is invalid for the then-current simulated sequence, which
    /// means the log could not have been produced by sequential
    /// application.
    pub fn from_ops<T>(ops: &[Op<usize, T>], original_len: usize) -> Result<Diff, ChangesetError> {
        let mut working: Vec<Tracked> = (0..original_len)
            .map(|origin| Tracked { slot: Slot::Original(origin), updated: false })
            .collect();
        let mut deletes = Vec::new();

        for (op_index, op) in ops.iter().enumerate() {
            let len = working.len();
            let bad_log = ChangesetError::InconsistentLog { op_index };
            match op {
                Op::Insert { at, .. } => {
                    if *at > len {
                        return Err(bad_log);
                    }
                    working.insert(*at, Tracked { slot: Slot::Fresh, updated: false });
                }
                Op::Delete { at } => {
                    if *at >= len {
                        return Err(bad_log);
                    }
                    let retired = working.remove(*at);
                    if let Slot::Original(origin) = retired.slot {
                        deletes.push(origin);
                    }
                }
                Op::Update { at, .. } => {
                    if *at >= len {
                        return Err(bad_log);
                    }
                    working[*at].updated = true;
                }
                Op::Move { from, to } => {
                    if *from >= len {
                        return Err(bad_log);
                    }
                    let moved = working.remove(*from);
                    if *to > working.len() {
                        return Err(bad_log);
                    }
                    working.insert(*to, moved);
                }
            }
        }

        deletes.sort_unstable();
        let mut inserts = Vec::new();
        let mut survivors = Vec::new();
        for (destination, tracked) in working.iter().enumerate() {
            match tracked.slot {
                Slot::Fresh => inserts.push(destination),
                Slot::Original(origin) => survivors.push(Survivor {
                    origin,
                    destination,
                    updated: tracked.updated,
                }),
            }
        }

        Ok(Diff { deletes, inserts, survivors })
    }

    /// Element count of the original snapshot this diff was built over.
    pub fn original_len(&self) -> usize {
        self.deletes.len() + self.survivors.len()
    }

    /// Element count any structurally consistent final snapshot must have.
    pub fn final_len(&self) -> usize {
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

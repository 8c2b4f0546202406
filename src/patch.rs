//! Generating a concrete, safely ordered patch from a diff.
//!
//! A diff is value-free; to replay it we also need the final snapshot's
//! contents, from which inserted and updated values are read. The patch
//! is ordered so that earlier operations' index shifts never invalidate
//! later operations' positions:
//!
//! 1. deletes, by original position, descending
//! 2. moves, with live indices in the post-delete sequence
//! 3. inserts, by final position, ascending
//! 4. updates, by final position
//!
//! Deleting back-to-front keeps earlier original positions stable. After
//! the deletes, the surviving elements sit in original relative order;
//! the move phase permutes them into final relative order. Survivors
//! forming the longest subsequence already in final relative order stay
//! put; each remaining survivor is moved exactly once, in ascending
//! destination order, to the slot just after the last already-ordered
//! survivor with a smaller destination. Every emitted index is valid in
//! the sequence as it exists immediately before that move. Inserting
//! front-to-back then fills the new elements' final slots (a prefix of
//! the final snapshot is complete before each insert), and updates
//! address final positions directly.

use rustc_hash::FxHashSet;

use crate::diff::Diff;
use crate::error::ChangesetError;
use crate::op::Op;

impl Diff {
    /// Produce the operation sequence that reproduces `final_snapshot`
    /// when applied, in order, to the original snapshot this diff was
    /// consolidated from.
    ///
    /// Fails with [`ChangesetError::SnapshotMismatch`] if the snapshot's
    /// length disagrees with the diff.
    pub fn generate_patch<T: Clone>(
        &self,
        final_snapshot: &[T],
    ) -> Result<Vec<Op<usize, T>>, ChangesetError> {
        if final_snapshot.len() != self.final_len() {
            return Err(ChangesetError::SnapshotMismatch {
                expected: self.final_len(),
                actual: final_snapshot.len(),
            });
        }

        let mut patch = Vec::new();

        for &origin in self.deletes.iter().rev() {
            patch.push(Op::Delete { at: origin });
        }

        // Survivors are stored in destination order, so survivor index
        // doubles as the target position among survivors. `live` holds
        // survivor indices in origin order: the post-delete sequence.
        let mut live: Vec<usize> = (0..self.survivors.len()).collect();
        live.sort_unstable_by_key(|&s| self.survivors[s].origin);

        let stay: FxHashSet<usize> = longest_increasing_run(&live).into_iter().collect();
        for target in 0..self.survivors.len() {
            if stay.contains(&target) {
                continue;
            }
            let Some(from) = live.iter().position(|&s| s == target) else {
                continue;
            };
            live.remove(from);
            // Everything with a smaller destination is already in final
            // relative order (it is either part of the stable run or was
            // placed by an earlier iteration), so the slot right after
            // the last such survivor is this one's place.
            let to = live
                .iter()
                .rposition(|&s| s < target)
                .map_or(0, |last| last + 1);
            live.insert(to, target);
            patch.push(Op::Move { from, to });
        }

        for &destination in &self.inserts {
            patch.push(Op::Insert {
                at: destination,
                value: final_snapshot[destination].clone(),
            });
        }

        for survivor in self.survivors.iter().filter(|s| s.updated) {
            patch.push(Op::Update {
                at: survivor.destination,
                value: final_snapshot[survivor.destination].clone(),
            });
        }

        Ok(patch)
    }
}

/// Values of a longest strictly increasing subsequence of `values`.
/// Quadratic, which is fine at the collection sizes this crate targets.
fn longest_increasing_run(values: &[usize]) -> Vec<usize> {
    let n = values.len();
    if n == 0 {
        return Vec::new();
    }
    let mut length = vec![1usize; n];
    let mut prev = vec![usize::MAX; n];
    for i in 0..n {
        for j in 0..i {
            if values[j] < values[i] && length[j] + 1 > length[i] {
                length[i] = length[j] + 1;
                prev[i] = j;
            }
        }
    }
    let mut at = (0..n).max_by_key(|&i| length[i]).unwrap_or(0);
    let mut run = Vec::with_capacity(length[at]);
    loop {
        run.push(values[at]);
        if prev[at] == usize::MAX {
            break;
        }
        at = prev[at];
    }
    run.reverse();
    run
}

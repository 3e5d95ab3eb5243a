//! Snapshot diffing.
//!
//! [`diff`] turns two snapshots into an [`EditScript`]: deletes, inserts, moves
//! and in-place updates. Rows whose relative order is unchanged form the
//! longest increasing subsequence of old positions and are never moved, so a
//! pure reordering of `n` rows produces at most `n - 1` moves.
//!
//! Index convention: `Delete::from` and `Move::from` are positions in the old
//! snapshot, `Insert::to`, `Move::to` and `Update::at` are positions in the new
//! one.

use std::collections::{HashMap, HashSet};

use crate::row::{Row, RowId, Snapshot};

/// One step of an edit script.
#[derive(Debug, Clone, PartialEq)]
pub enum Change<T> {
    /// Row removed.
    Delete { id: RowId, from: usize },
    /// Row added.
    Insert { row: Row<T>, to: usize },
    /// Row present in both snapshots at a different relative position.
    Move { id: RowId, from: usize, to: usize },
    /// Row present in both snapshots whose payload changed.
    Update { row: Row<T>, at: usize },
}

impl<T> Change<T> {
    /// The id of the row this change concerns.
    pub fn id(&self) -> &RowId {
        match self {
            Change::Delete { id, .. } | Change::Move { id, .. } => id,
            Change::Insert { row, .. } | Change::Update { row, .. } => row.id(),
        }
    }
}

/// Minimal set of changes transforming one snapshot into another.
#[derive(Debug, Clone, PartialEq)]
pub struct EditScript<T> {
    changes: Vec<Change<T>>,
}

impl<T> Default for EditScript<T> {
    fn default() -> Self {
        Self {
            changes: Vec::new(),
        }
    }
}

impl<T> EditScript<T> {
    /// All changes: deletes, then moves, then inserts, then updates.
    pub fn changes(&self) -> &[Change<T>] {
        &self.changes
    }

    /// Whether applying this script would change nothing.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Total number of changes.
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn deletes(&self) -> usize {
        self.count(|c| matches!(c, Change::Delete { .. }))
    }

    pub fn inserts(&self) -> usize {
        self.count(|c| matches!(c, Change::Insert { .. }))
    }

    pub fn moves(&self) -> usize {
        self.count(|c| matches!(c, Change::Move { .. }))
    }

    pub fn updates(&self) -> usize {
        self.count(|c| matches!(c, Change::Update { .. }))
    }

    /// Whether the script reorders surviving rows.
    pub fn has_moves(&self) -> bool {
        self.moves() > 0
    }

    fn count(&self, f: impl Fn(&Change<T>) -> bool) -> usize {
        self.changes.iter().filter(|c| f(c)).count()
    }
}

impl<T: Clone> EditScript<T> {
    /// Apply the script to rows holding the old snapshot's state.
    ///
    /// Changes referring to rows the target does not hold are skipped.
    pub fn apply_to(&self, rows: &mut Vec<Row<T>>) {
        let mut deleted: HashSet<&RowId> = HashSet::new();
        let mut moving: HashSet<&RowId> = HashSet::new();
        for change in &self.changes {
            match change {
                Change::Delete { id, .. } => {
                    deleted.insert(id);
                }
                Change::Move { id, .. } => {
                    moving.insert(id);
                }
                _ => {}
            }
        }

        let mut lifted: HashMap<RowId, Row<T>> = HashMap::new();
        let mut kept = Vec::with_capacity(rows.len());
        for row in rows.drain(..) {
            if deleted.contains(row.id()) {
                continue;
            }
            if moving.contains(row.id()) {
                lifted.insert(row.id().clone(), row);
            } else {
                kept.push(row);
            }
        }

        // Remaining rows are already in their final relative order; placing the
        // rest in ascending target order lands each one at its exact index.
        let mut placements: Vec<(usize, Row<T>)> = Vec::new();
        for change in &self.changes {
            match change {
                Change::Move { id, to, .. } => {
                    if let Some(row) = lifted.remove(id) {
                        placements.push((*to, row));
                    }
                }
                Change::Insert { row, to } => placements.push((*to, row.clone())),
                _ => {}
            }
        }
        placements.sort_by_key(|(to, _)| *to);
        for (to, row) in placements {
            let at = to.min(kept.len());
            kept.insert(at, row);
        }

        for change in &self.changes {
            if let Change::Update { row, .. } = change
                && let Some(target) = kept.iter_mut().find(|r| r.id() == row.id())
            {
                target.set_payload(row.payload().clone());
            }
        }

        *rows = kept;
    }
}

/// Compute the edit script transforming `old` into `new`.
pub fn diff<T: Clone + PartialEq>(old: &Snapshot<T>, new: &Snapshot<T>) -> EditScript<T> {
    let mut changes = Vec::new();

    for (from, row) in old.rows().iter().enumerate() {
        if !new.contains(row.id()) {
            changes.push(Change::Delete {
                id: row.id().clone(),
                from,
            });
        }
    }

    // (new index, old index) for ids present in both, in new order.
    let common: Vec<(usize, usize)> = new
        .rows()
        .iter()
        .enumerate()
        .filter_map(|(to, row)| old.position(row.id()).map(|from| (to, from)))
        .collect();
    let old_positions: Vec<usize> = common.iter().map(|&(_, from)| from).collect();
    let stable = increasing_subsequence_mask(&old_positions);

    for (k, &(to, from)) in common.iter().enumerate() {
        if !stable[k] {
            changes.push(Change::Move {
                id: new.rows()[to].id().clone(),
                from,
                to,
            });
        }
    }

    for (to, row) in new.rows().iter().enumerate() {
        if !old.contains(row.id()) {
            changes.push(Change::Insert {
                row: row.clone(),
                to,
            });
        }
    }

    for &(to, from) in &common {
        let (before, after) = (&old.rows()[from], &new.rows()[to]);
        if before.payload() != after.payload() {
            changes.push(Change::Update {
                row: after.clone(),
                at: to,
            });
        }
    }

    EditScript { changes }
}

/// Mark the members of one longest strictly increasing subsequence.
fn increasing_subsequence_mask(values: &[usize]) -> Vec<bool> {
    let mut mask = vec![false; values.len()];
    if values.is_empty() {
        return mask;
    }

    // tails[k] = index into `values` of the smallest tail of a run of length k + 1
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; values.len()];

    for (i, &v) in values.iter().enumerate() {
        let slot = tails.partition_point(|&t| values[t] < v);
        if slot > 0 {
            prev[i] = Some(tails[slot - 1]);
        }
        if slot == tails.len() {
            tails.push(i);
        } else {
            tails[slot] = i;
        }
    }

    let mut cursor = tails.last().copied();
    while let Some(i) = cursor {
        mask[i] = true;
        cursor = prev[i];
    }
    mask
}

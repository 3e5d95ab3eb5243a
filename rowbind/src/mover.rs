//! Drag-to-reorder coordination.
//!
//! A move gesture is one `(from, to)` request. The coordinator reorders the
//! adapter's rows, describes the change to the host as a single placement
//! relative to the row that occupied the destination, and stays in
//! [`MoveState::Dragging`] until the host reports the update settled. Taps
//! arriving in between (typically the release of the same drag) are ignored.

use log::{debug, warn};

use crate::host::{CompletionId, Placement};
use crate::row::{RowId, Snapshot};

/// Whether a move gesture is in flight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MoveState {
    #[default]
    Idle,
    Dragging {
        /// Row being moved.
        row: RowId,
        /// Completion the move is waiting on, once the host has it.
        pending: Option<CompletionId>,
    },
}

/// Outcome of accepting a move request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePlan {
    /// The moved row.
    pub id: RowId,
    /// Index the gesture started at.
    pub from: usize,
    /// Final index of the row after the move.
    pub to: usize,
    /// Host-side placement; `None` when the row lands where it started.
    pub placement: Option<Placement>,
}

/// Serializes move gestures.
#[derive(Debug, Default)]
pub struct MoveCoordinator {
    state: MoveState,
}

impl MoveCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Any row may be dragged.
    pub fn can_move(&self, _index: usize) -> bool {
        true
    }

    pub fn state(&self) -> &MoveState {
        &self.state
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.state, MoveState::Dragging { .. })
    }

    /// Accept a move request and reorder `rows` in place.
    ///
    /// Returns `None` when the request is dropped: another move is still
    /// settling, or `from` names no row. `to` is clamped to `0..=len`, where
    /// `len` means after the last row.
    pub fn begin<T>(&mut self, rows: &mut Snapshot<T>, from: usize, to: usize) -> Option<MovePlan> {
        if let MoveState::Dragging { row, .. } = &self.state {
            debug!("Ignoring move {} -> {} while '{}' is still moving", from, to, row);
            return None;
        }

        let len = rows.len();
        if from >= len {
            warn!("Move source {} out of bounds for {} rows", from, len);
            return None;
        }
        let to = if to > len {
            warn!("Move target {} out of bounds for {} rows, clamping", to, len);
            len
        } else {
            to
        };

        let source = rows.get(from)?.id().clone();
        let anchor = rows.get(to).map(|r| r.id().clone());
        let final_index = to.min(len - 1);

        self.state = MoveState::Dragging {
            row: source.clone(),
            pending: None,
        };

        if let Some(row) = rows.remove(from) {
            rows.insert(final_index, row);
        }

        let placement = match anchor {
            None => Some(Placement::End),
            Some(anchor) if anchor == source => None,
            Some(anchor) if from > to => Some(Placement::Before(anchor)),
            Some(anchor) => Some(Placement::After(anchor)),
        };

        Some(MovePlan {
            id: source,
            from,
            to: final_index,
            placement,
        })
    }

    /// Record the completion the in-flight move waits on.
    pub fn awaiting(&mut self, completion: CompletionId) {
        if let MoveState::Dragging { pending, .. } = &mut self.state {
            *pending = Some(completion);
        }
    }

    /// A completion fired. Returns whether it ended the move.
    pub fn finish(&mut self, completion: CompletionId) -> bool {
        match &self.state {
            MoveState::Dragging {
                pending: Some(pending),
                ..
            } if *pending == completion => {
                self.state = MoveState::Idle;
                true
            }
            _ => false,
        }
    }

    /// End the move without waiting on the host.
    pub fn settle(&mut self) {
        self.state = MoveState::Idle;
    }
}

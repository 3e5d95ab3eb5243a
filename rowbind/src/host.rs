//! Presentation host contract.
//!
//! The host is the concrete list surface: it renders rows, animates changes,
//! and reports gestures back through a [`GestureSender`]. The adapter treats it
//! as a black box and only talks to it through [`PresentationHost`].
//!
//! [`GestureSender`]: crate::binding::GestureSender

use tokio::sync::mpsc;

use crate::chrome::TitleBar;
use crate::diff::EditScript;
use crate::row::{Row, RowId};

/// How an update should be animated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Animation {
    /// Apply immediately.
    #[default]
    None,
    /// Animate inserted, removed and moved rows.
    Animated,
    /// Redraw everything behind a cross-fade.
    CrossFade,
}

/// Where a moved row lands, relative to another row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Directly before the anchor row.
    Before(RowId),
    /// Directly after the anchor row.
    After(RowId),
    /// After the last row.
    End,
}

/// One change handed to the host per render pass.
#[derive(Debug, Clone, PartialEq)]
pub enum HostUpdate<T> {
    /// Incremental diff from a stream emission.
    Script(EditScript<T>),
    /// Single reorder from a drag gesture.
    Move { id: RowId, placement: Placement },
    /// Single removal from a swipe-to-delete.
    Delete { id: RowId },
    /// Full visual reload of the current rows; no structural change.
    Reload,
}

impl<T: Clone> HostUpdate<T> {
    /// Mirror this update onto rows holding the previous state.
    pub fn apply_to(&self, rows: &mut Vec<Row<T>>) {
        match self {
            HostUpdate::Script(script) => script.apply_to(rows),
            HostUpdate::Move { id, placement } => {
                let Some(from) = rows.iter().position(|r| r.id() == id) else {
                    return;
                };
                let row = rows.remove(from);
                let at = match placement {
                    Placement::Before(anchor) => rows.iter().position(|r| r.id() == anchor),
                    Placement::After(anchor) => {
                        rows.iter().position(|r| r.id() == anchor).map(|i| i + 1)
                    }
                    Placement::End => None,
                };
                match at {
                    Some(at) => rows.insert(at, row),
                    None => rows.push(row),
                }
            }
            HostUpdate::Delete { id } => rows.retain(|r| r.id() != id),
            HostUpdate::Reload => {}
        }
    }
}

/// Identifies one pending completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompletionId {
    pub(crate) generation: u64,
    pub(crate) seq: u64,
}

/// What became of a [`Completion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionEvent {
    /// The host reported the update settled.
    Completed(CompletionId),
    /// The host dropped the token without completing it.
    Dropped(CompletionId),
}

impl CompletionEvent {
    pub fn id(&self) -> CompletionId {
        match self {
            CompletionEvent::Completed(id) | CompletionEvent::Dropped(id) => *id,
        }
    }
}

/// Completion hook handed to the host with every update.
///
/// Call [`Completion::complete`] once the update has settled on screen.
/// Dropping it instead reports [`CompletionEvent::Dropped`], which releases
/// whatever the adapter was waiting on without running completion handlers.
#[derive(Debug)]
pub struct Completion {
    id: CompletionId,
    tx: mpsc::UnboundedSender<CompletionEvent>,
    fired: bool,
}

impl Completion {
    pub(crate) fn new(id: CompletionId, tx: mpsc::UnboundedSender<CompletionEvent>) -> Self {
        Self {
            id,
            tx,
            fired: false,
        }
    }

    /// The id this completion reports.
    pub fn id(&self) -> CompletionId {
        self.id
    }

    /// Report the update as settled.
    ///
    /// Non-blocking. Errors are ignored (adapter dropped = nothing to notify).
    pub fn complete(mut self) {
        self.fired = true;
        let _ = self.tx.send(CompletionEvent::Completed(self.id));
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if !self.fired {
            let _ = self.tx.send(CompletionEvent::Dropped(self.id));
        }
    }
}

/// A swipe button offered on a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwipeAction {
    pub title: String,
    pub destructive: bool,
}

/// Leading and trailing swipe buttons for a row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwipeActions {
    pub leading: Vec<SwipeAction>,
    pub trailing: Vec<SwipeAction>,
}

impl SwipeActions {
    /// Whether no swipe buttons are offered.
    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_empty()
    }
}

/// Which interactions a row offers, derived from the registered handlers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowAffordances {
    pub tap: bool,
    pub edit: bool,
    pub delete: bool,
    pub swipe_delete: bool,
    pub movable: bool,
}

/// Vertical insets applied to each rendered row for a given row spacing.
///
/// Half the spacing goes above the row content and half below.
pub fn row_insets(spacing: f32) -> (f32, f32) {
    let half = spacing.max(0.0) / 2.0;
    (half, half)
}

/// The rendering surface driven by a [`ListAdapter`].
///
/// [`ListAdapter`]: crate::adapter::ListAdapter
pub trait PresentationHost<T>: Send {
    /// Apply one update and call `done` once it has settled.
    fn apply(&mut self, update: HostUpdate<T>, animation: Animation, done: Completion);

    /// Redraw the currently visible rows without structural change.
    fn refresh_visible(&mut self) {}

    /// Uniform vertical gap between rows.
    fn set_row_spacing(&mut self, _spacing: f32) {}

    /// Toggle drag handles.
    fn set_reorder_enabled(&mut self, _enabled: bool) {}

    /// Title text, colours and visibility changed.
    fn set_title_bar(&mut self, _bar: &TitleBar) {}
}

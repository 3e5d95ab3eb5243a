//! Reactive list binding.
//!
//! Binds a stream of identified view-models to an imperative list surface:
//! rows keep their identity across emissions, changes reach the surface as
//! minimal edit scripts, and taps, edits, deletes, reorders and context
//! menus are dispatched back to owner callbacks by row id.
//!
//! # Example
//!
//! ```ignore
//! use rowbind::prelude::*;
//! use tokio::sync::watch;
//!
//! let (items_tx, items_rx) = watch::channel(Vec::<Todo>::new());
//! let binding = TableBinding::new(items_rx, MyHost::default())
//!     .row_spacing(8.0)
//!     .on_tap(|id| println!("tapped {id}"))
//!     .on_move(|from, to| println!("moved {from} -> {to}"));
//! let gestures = binding.gestures();
//! tokio::spawn(binding.run());
//! ```

pub mod actions;
pub mod adapter;
pub mod binding;
pub mod chrome;
pub mod config;
pub mod diff;
pub mod error;
pub mod host;
pub mod mover;
pub mod row;

pub mod prelude {
    pub use crate::actions::{ActionRegistry, ContextMenu, ContextMenuItem, MenuEntry, MenuItemId};
    pub use crate::adapter::{AdapterId, ListAdapter};
    pub use crate::binding::{Gesture, GestureSender, TableBinding};
    pub use crate::chrome::{BarSide, Color, TitleBar};
    pub use crate::config::AdapterConfig;
    pub use crate::diff::{Change, EditScript, diff};
    pub use crate::error::BindError;
    pub use crate::host::{
        Animation, Completion, CompletionEvent, HostUpdate, Placement, PresentationHost,
        RowAffordances, SwipeActions,
    };
    pub use crate::mover::MoveState;
    pub use crate::row::{DuplicatePolicy, Row, RowId, RowModel, Snapshot};
}

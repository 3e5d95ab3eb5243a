//! Owner-supplied callbacks.

use std::fmt;
use std::sync::Arc;

use crate::chrome::BarSide;
use crate::row::RowId;

use super::menu::ContextMenuItem;

/// Callback receiving a row id.
pub type RowCallback = Arc<dyn Fn(&RowId) + Send + Sync>;

/// Callback receiving `(from, to)` row indices.
pub type MoveCallback = Arc<dyn Fn(usize, usize) + Send + Sync>;

/// Callback with no arguments.
pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// A title-bar button.
#[derive(Clone)]
pub struct BarItem {
    pub icon: String,
    pub action: Callback,
}

impl BarItem {
    pub fn new<F>(icon: impl Into<String>, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            icon: icon.into(),
            action: Arc::new(action),
        }
    }
}

impl fmt::Debug for BarItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BarItem").field("icon", &self.icon).finish()
    }
}

/// The set of optional handlers an owner registers with a list.
///
/// A missing handler is never an error: dispatching to it does nothing, and
/// the matching affordance (menu entry, swipe button) is not offered.
/// The registry is replaced wholesale on reconfiguration, never merged.
#[derive(Clone, Default)]
pub struct ActionRegistry {
    on_tap: Option<RowCallback>,
    on_edit: Option<RowCallback>,
    on_delete: Option<RowCallback>,
    on_move: Option<MoveCallback>,
    additional_context_menu_items: Vec<ContextMenuItem>,
    left_bar_item: Option<BarItem>,
    right_bar_item: Option<BarItem>,
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("on_tap", &self.on_tap.is_some())
            .field("on_edit", &self.on_edit.is_some())
            .field("on_delete", &self.on_delete.is_some())
            .field("on_move", &self.on_move.is_some())
            .field(
                "additional_context_menu_items",
                &self.additional_context_menu_items,
            )
            .field("left_bar_item", &self.left_bar_item)
            .field("right_bar_item", &self.right_bar_item)
            .finish()
    }
}

impl ActionRegistry {
    /// An empty registry: no handlers, no extra menu items.
    pub fn new() -> Self {
        Self::default()
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    pub fn on_tap<F>(mut self, f: F) -> Self
    where
        F: Fn(&RowId) + Send + Sync + 'static,
    {
        self.on_tap = Some(Arc::new(f));
        self
    }

    pub fn on_edit<F>(mut self, f: F) -> Self
    where
        F: Fn(&RowId) + Send + Sync + 'static,
    {
        self.on_edit = Some(Arc::new(f));
        self
    }

    pub fn on_delete<F>(mut self, f: F) -> Self
    where
        F: Fn(&RowId) + Send + Sync + 'static,
    {
        self.on_delete = Some(Arc::new(f));
        self
    }

    pub fn on_move<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.on_move = Some(Arc::new(f));
        self
    }

    /// Items appended after the built-in Edit and Delete entries.
    pub fn additional_context_menu_items(mut self, items: Vec<ContextMenuItem>) -> Self {
        self.additional_context_menu_items = items;
        self
    }

    pub fn bar_item(mut self, side: BarSide, item: BarItem) -> Self {
        match side {
            BarSide::Left => self.left_bar_item = Some(item),
            BarSide::Right => self.right_bar_item = Some(item),
        }
        self
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn has_tap(&self) -> bool {
        self.on_tap.is_some()
    }

    pub fn has_edit(&self) -> bool {
        self.on_edit.is_some()
    }

    pub fn has_delete(&self) -> bool {
        self.on_delete.is_some()
    }

    pub fn has_move(&self) -> bool {
        self.on_move.is_some()
    }

    pub fn context_menu_items(&self) -> &[ContextMenuItem] {
        &self.additional_context_menu_items
    }

    pub fn bar_item_for(&self, side: BarSide) -> Option<&BarItem> {
        match side {
            BarSide::Left => self.left_bar_item.as_ref(),
            BarSide::Right => self.right_bar_item.as_ref(),
        }
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    /// Returns whether a handler ran.
    pub fn tap(&self, id: &RowId) -> bool {
        Self::call(&self.on_tap, id)
    }

    pub fn edit(&self, id: &RowId) -> bool {
        Self::call(&self.on_edit, id)
    }

    pub fn delete(&self, id: &RowId) -> bool {
        Self::call(&self.on_delete, id)
    }

    pub fn moved(&self, from: usize, to: usize) -> bool {
        match &self.on_move {
            Some(f) => {
                f(from, to);
                true
            }
            None => false,
        }
    }

    pub fn bar_tapped(&self, side: BarSide) -> bool {
        match self.bar_item_for(side) {
            Some(item) => {
                (item.action)();
                true
            }
            None => false,
        }
    }

    fn call(handler: &Option<RowCallback>, id: &RowId) -> bool {
        match handler {
            Some(f) => {
                f(id);
                true
            }
            None => false,
        }
    }
}

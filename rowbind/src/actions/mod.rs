//! Action registry and context menus.

mod menu;
mod registry;

pub use menu::{
    ContextMenu, ContextMenuItem, DELETE_ICON, EDIT_ICON, MenuAction, MenuEntry, MenuItemId,
    MenuItemKind, SUBMENU_ICON, ShouldAppear, SubItems,
};
pub use registry::{ActionRegistry, BarItem, Callback, MoveCallback, RowCallback};

//! Context menus.
//!
//! A [`ContextMenuItem`] is either a leaf action or a submenu. Menus are
//! resolved fresh for every presentation: `should_appear` and submenu
//! builders are called each time a row's menu opens, always with the id of
//! the originating row, however deep the item is nested.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::row::RowId;

use super::registry::{ActionRegistry, RowCallback};

/// Icon used for a submenu that has none of its own.
pub const SUBMENU_ICON: &str = "chevron.right";
/// Icon of the built-in "Edit" entry.
pub const EDIT_ICON: &str = "pencil";
/// Icon of the built-in "Delete" entry.
pub const DELETE_ICON: &str = "trash";

/// Visibility predicate, evaluated against the originating row.
pub type ShouldAppear = Arc<dyn Fn(&RowId) -> bool + Send + Sync>;

/// Builds the children of a submenu for the originating row.
pub type SubItems = Arc<dyn Fn(&RowId) -> Vec<ContextMenuItem> + Send + Sync>;

/// Unique identifier of a menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MenuItemId(Uuid);

impl MenuItemId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MenuItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a menu item does.
#[derive(Clone)]
pub enum MenuItemKind {
    /// Leaf button.
    Action(RowCallback),
    /// Nested menu.
    Submenu(SubItems),
}

/// An owner-supplied context menu entry.
#[derive(Clone)]
pub struct ContextMenuItem {
    id: MenuItemId,
    title: String,
    icon: Option<String>,
    should_appear: ShouldAppear,
    kind: MenuItemKind,
}

impl fmt::Debug for ContextMenuItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContextMenuItem")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("icon", &self.icon)
            .field("submenu", &self.is_submenu())
            .finish()
    }
}

impl ContextMenuItem {
    /// A leaf button running `action` with the row id.
    pub fn action<F>(title: impl Into<String>, action: F) -> Self
    where
        F: Fn(&RowId) + Send + Sync + 'static,
    {
        Self::with_kind(title, MenuItemKind::Action(Arc::new(action)))
    }

    /// A submenu whose children are built from the row id on every open.
    pub fn submenu<F>(title: impl Into<String>, sub_items: F) -> Self
    where
        F: Fn(&RowId) -> Vec<ContextMenuItem> + Send + Sync + 'static,
    {
        Self::with_kind(title, MenuItemKind::Submenu(Arc::new(sub_items)))
    }

    fn with_kind(title: impl Into<String>, kind: MenuItemKind) -> Self {
        Self {
            id: MenuItemId::new(),
            title: title.into(),
            icon: None,
            should_appear: Arc::new(|_: &RowId| true),
            kind,
        }
    }

    /// Set the icon name.
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Only show this item for rows matching `predicate`.
    pub fn should_appear<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&RowId) -> bool + Send + Sync + 'static,
    {
        self.should_appear = Arc::new(predicate);
        self
    }

    pub fn id(&self) -> MenuItemId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn kind(&self) -> &MenuItemKind {
        &self.kind
    }

    pub fn is_action(&self) -> bool {
        matches!(self.kind, MenuItemKind::Action(_))
    }

    pub fn is_submenu(&self) -> bool {
        matches!(self.kind, MenuItemKind::Submenu(_))
    }

    /// Evaluate visibility for a row.
    pub fn appears_for(&self, row: &RowId) -> bool {
        (self.should_appear)(row)
    }
}

/// A resolved, presentable menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Action {
        id: MenuItemId,
        title: String,
        icon: Option<String>,
    },
    Submenu {
        id: MenuItemId,
        title: String,
        icon: String,
        entries: Vec<MenuEntry>,
    },
}

impl MenuEntry {
    pub fn id(&self) -> MenuItemId {
        match self {
            MenuEntry::Action { id, .. } | MenuEntry::Submenu { id, .. } => *id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            MenuEntry::Action { title, .. } | MenuEntry::Submenu { title, .. } => title,
        }
    }
}

/// What selecting a resolved entry does.
#[derive(Clone)]
pub enum MenuAction {
    /// Built-in edit entry.
    Edit,
    /// Built-in delete entry.
    Delete,
    /// Owner-supplied leaf.
    Custom(RowCallback),
}

impl fmt::Debug for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuAction::Edit => write!(f, "Edit"),
            MenuAction::Delete => write!(f, "Delete"),
            MenuAction::Custom(_) => write!(f, "Custom"),
        }
    }
}

/// A context menu resolved for one row.
///
/// Holds the actions that were live when it opened, so reconfiguring the
/// registry afterwards does not rebind an open menu.
#[derive(Debug, Clone)]
pub struct ContextMenu {
    row: RowId,
    entries: Vec<MenuEntry>,
    actions: HashMap<MenuItemId, MenuAction>,
}

impl ContextMenu {
    /// Resolve the menu for `row`: built-in Edit and Delete first (when their
    /// handlers exist), then the registry's additional items.
    pub fn build(registry: &ActionRegistry, row: &RowId) -> Self {
        let mut menu = Self {
            row: row.clone(),
            entries: Vec::new(),
            actions: HashMap::new(),
        };

        if registry.has_edit() {
            menu.push_builtin("Edit", EDIT_ICON, MenuAction::Edit);
        }
        if registry.has_delete() {
            menu.push_builtin("Delete", DELETE_ICON, MenuAction::Delete);
        }

        for item in registry.context_menu_items() {
            if let Some(entry) = menu.resolve(item) {
                menu.entries.push(entry);
            }
        }

        menu
    }

    fn push_builtin(&mut self, title: &str, icon: &str, action: MenuAction) {
        let id = MenuItemId::new();
        self.actions.insert(id, action);
        self.entries.push(MenuEntry::Action {
            id,
            title: title.to_string(),
            icon: Some(icon.to_string()),
        });
    }

    fn resolve(&mut self, item: &ContextMenuItem) -> Option<MenuEntry> {
        if !item.appears_for(&self.row) {
            return None;
        }
        match &item.kind {
            MenuItemKind::Action(action) => {
                self.actions
                    .insert(item.id, MenuAction::Custom(Arc::clone(action)));
                Some(MenuEntry::Action {
                    id: item.id,
                    title: item.title.clone(),
                    icon: item.icon.clone(),
                })
            }
            MenuItemKind::Submenu(sub_items) => {
                let children = sub_items(&self.row);
                let entries = children
                    .iter()
                    .filter_map(|child| self.resolve(child))
                    .collect();
                Some(MenuEntry::Submenu {
                    id: item.id,
                    title: item.title.clone(),
                    icon: item.icon.clone().unwrap_or_else(|| SUBMENU_ICON.to_string()),
                    entries,
                })
            }
        }
    }

    /// The row this menu was opened for.
    pub fn row(&self) -> &RowId {
        &self.row
    }

    /// Top-level entries in display order.
    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Action bound to a leaf entry; `None` for submenus and unknown ids.
    pub fn action(&self, id: MenuItemId) -> Option<&MenuAction> {
        self.actions.get(&id)
    }

    /// Find an entry anywhere in the tree by title.
    pub fn find(&self, title: &str) -> Option<&MenuEntry> {
        fn walk<'a>(entries: &'a [MenuEntry], title: &str) -> Option<&'a MenuEntry> {
            for entry in entries {
                if entry.title() == title {
                    return Some(entry);
                }
                if let MenuEntry::Submenu { entries, .. } = entry
                    && let Some(found) = walk(entries, title)
                {
                    return Some(found);
                }
            }
            None
        }
        walk(&self.entries, title)
    }
}

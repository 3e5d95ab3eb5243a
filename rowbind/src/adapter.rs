//! List binding adapter.
//!
//! `ListAdapter` owns the rendered [`Snapshot`], the [`ActionRegistry`] and the
//! [`MoveCoordinator`], and drives a [`PresentationHost`]. It is a plain
//! synchronous state machine: every method runs on the caller's thread and
//! must only be called from one queue (see [`TableBinding`] for the async
//! driver that guarantees this).
//!
//! [`TableBinding`]: crate::binding::TableBinding

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, error, trace, warn};
use tokio::sync::mpsc;

use crate::actions::{ActionRegistry, Callback, ContextMenu, MenuAction, MenuItemId};
use crate::chrome::{BarSide, Color, TitleBar};
use crate::config::AdapterConfig;
use crate::diff::diff;
use crate::error::BindError;
use crate::host::{
    Animation, Completion, CompletionEvent, CompletionId, HostUpdate, PresentationHost, RowAffordances,
    SwipeAction, SwipeActions,
};
use crate::mover::{MoveCoordinator, MoveState};
use crate::row::{Row, RowId, RowModel, Snapshot};

/// Unique identifier for an adapter instance.
///
/// Hosts receive it on attach and use it to refer back to the adapter
/// without holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdapterId(usize);

impl AdapterId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl fmt::Display for AdapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "__rows_{}", self.0)
    }
}

/// What a pending completion finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Render,
    Move,
    Reload,
}

/// Binds a stream of view-models to a presentation host.
pub struct ListAdapter<T: RowModel, H: PresentationHost<T>> {
    id: AdapterId,
    config: AdapterConfig,
    registry: ActionRegistry,
    snapshot: Snapshot<T>,
    mover: MoveCoordinator,
    host: Option<H>,
    title_bar: TitleBar,
    reorder_enabled: bool,
    reload_done: Option<Callback>,
    open_menu: Option<ContextMenu>,
    /// Bumped on host detach; completions from older generations are ignored.
    generation: u64,
    next_seq: u64,
    pending: HashMap<CompletionId, Pending>,
    completion_tx: mpsc::UnboundedSender<CompletionEvent>,
    completion_rx: mpsc::UnboundedReceiver<CompletionEvent>,
}

impl<T: RowModel, H: PresentationHost<T>> fmt::Debug for ListAdapter<T, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListAdapter")
            .field("id", &self.id)
            .field("rows", &self.snapshot.len())
            .field("move_state", self.mover.state())
            .field("host_attached", &self.host.is_some())
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl<T: RowModel, H: PresentationHost<T>> ListAdapter<T, H> {
    /// Create an adapter with no host and no rows.
    pub fn new(config: AdapterConfig) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            id: AdapterId::new(),
            config,
            registry: ActionRegistry::new(),
            snapshot: Snapshot::default(),
            mover: MoveCoordinator::new(),
            host: None,
            title_bar: TitleBar::default(),
            reorder_enabled: false,
            reload_done: None,
            open_menu: None,
            generation: 0,
            next_seq: 0,
            pending: HashMap::new(),
            completion_tx,
            completion_rx,
        }
    }

    /// Create an adapter already attached to a host.
    pub fn with_host(config: AdapterConfig, host: H) -> Self {
        let mut adapter = Self::new(config);
        adapter.attach_host(host);
        adapter
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn id(&self) -> AdapterId {
        self.id
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn actions(&self) -> &ActionRegistry {
        &self.registry
    }

    /// The rendered rows. Read-only; only the adapter mutates them.
    pub fn snapshot(&self) -> &Snapshot<T> {
        &self.snapshot
    }

    pub fn rows(&self) -> &[Row<T>] {
        self.snapshot.rows()
    }

    pub fn title_bar(&self) -> &TitleBar {
        &self.title_bar
    }

    pub fn is_moving(&self) -> bool {
        self.mover.is_moving()
    }

    pub fn move_state(&self) -> &MoveState {
        self.mover.state()
    }

    pub fn reorder_enabled(&self) -> bool {
        self.reorder_enabled
    }

    pub fn host(&self) -> Option<&H> {
        self.host.as_ref()
    }

    pub fn host_mut(&mut self) -> Option<&mut H> {
        self.host.as_mut()
    }

    /// Number of host completions still outstanding.
    pub fn pending_completions(&self) -> usize {
        self.pending.len()
    }

    // -------------------------------------------------------------------------
    // Host lifecycle
    // -------------------------------------------------------------------------

    /// Attach a host, replacing any previous one, and bring it up to date.
    pub fn attach_host(&mut self, host: H) -> Option<H> {
        let previous = self.detach_host();
        self.host = Some(host);
        debug!("Host attached to {}", self.id);

        let spacing = self.config.row_spacing;
        let reorder = self.reorder_enabled;
        if let Some(host) = self.host.as_mut() {
            host.set_row_spacing(spacing);
            host.set_reorder_enabled(reorder);
            host.set_title_bar(&self.title_bar);
        }

        if !self.snapshot.is_empty() {
            let script = diff(&Snapshot::default(), &self.snapshot);
            self.render(HostUpdate::Script(script), Animation::None, Pending::Render);
        }
        previous
    }

    /// Detach the host. Outstanding completions are dropped and an in-flight
    /// move returns to idle.
    pub fn detach_host(&mut self) -> Option<H> {
        let host = self.host.take()?;
        self.generation += 1;
        if !self.pending.is_empty() {
            debug!(
                "Dropping {} pending completions on detach from {}",
                self.pending.len(),
                self.id
            );
        }
        self.pending.clear();
        self.mover.settle();
        self.open_menu = None;
        Some(host)
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Replace the action registry wholesale.
    pub fn set_actions(&mut self, registry: ActionRegistry) {
        self.registry = registry;
        for side in [BarSide::Left, BarSide::Right] {
            let icon = self.registry.bar_item_for(side).map(|item| item.icon.clone());
            self.title_bar.set_icon(side, icon);
        }
        self.push_title_bar();
    }

    /// Callback run after each reload pulse settles.
    pub fn set_reload_done(&mut self, done: Option<Callback>) {
        self.reload_done = done;
    }

    pub fn set_row_spacing(&mut self, spacing: f32) {
        self.config.row_spacing = spacing.max(0.0);
        let spacing = self.config.row_spacing;
        if let Some(host) = self.host.as_mut() {
            host.set_row_spacing(spacing);
        }
    }

    pub fn set_reorder_enabled(&mut self, enabled: bool) {
        self.reorder_enabled = enabled;
        if let Some(host) = self.host.as_mut() {
            host.set_reorder_enabled(enabled);
        }
    }

    /// Give the list a title area.
    pub fn show_title_area(&mut self) {
        self.title_bar.has_title_area = true;
        self.push_title_bar();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title_bar.title = title.into();
        self.push_title_bar();
    }

    pub fn set_title_color(&mut self, color: Color) {
        self.title_bar.title_color = Some(color);
        self.push_title_bar();
    }

    pub fn set_title_bar_color(&mut self, color: Color) {
        self.title_bar.bar_color = Some(color);
        self.push_title_bar();
    }

    fn push_title_bar(&mut self) {
        if let Some(host) = self.host.as_mut() {
            host.set_title_bar(&self.title_bar);
        }
    }

    // -------------------------------------------------------------------------
    // Stream input
    // -------------------------------------------------------------------------

    /// Handle one emission of the data stream.
    ///
    /// The emission replaces the authoritative row order. Reorders apply
    /// without animation, other changes animated; an unchanged emission does
    /// not touch the host.
    pub fn receive(&mut self, models: Vec<T>) {
        let next = match Snapshot::from_models(models, self.config.duplicate_policy) {
            Ok(next) => next,
            Err(err) => {
                error!("Rejected emission for {}: {}", self.id, err);
                return;
            }
        };

        let script = diff(&self.snapshot, &next);
        self.snapshot = next;

        if !self.title_bar.revealed {
            self.title_bar.revealed = true;
            self.push_title_bar();
        }

        if script.is_empty() {
            trace!("Emission for {} unchanged", self.id);
            return;
        }
        trace!(
            "Emission for {}: {} inserts, {} deletes, {} moves, {} updates",
            self.id,
            script.inserts(),
            script.deletes(),
            script.moves(),
            script.updates()
        );

        let animation = if script.has_moves() {
            Animation::None
        } else {
            Animation::Animated
        };
        self.render(HostUpdate::Script(script), animation, Pending::Render);
    }

    /// Handle one value of the reload stream. Only `true` pulses reload.
    pub fn reload(&mut self, pulse: bool) {
        if !pulse {
            return;
        }
        if self
            .render(HostUpdate::Reload, Animation::CrossFade, Pending::Reload)
            .is_none()
        {
            debug!("Reload for {} skipped: {}", self.id, BindError::HostDetached);
        }
    }

    // -------------------------------------------------------------------------
    // Gestures
    // -------------------------------------------------------------------------

    /// Dispatch a tap. Ignored while a move is settling.
    ///
    /// Returns whether `on_tap` ran.
    pub fn tap(&mut self, id: &RowId) -> bool {
        if self.mover.is_moving() {
            debug!("Ignoring tap on '{}' during move", id);
            return false;
        }
        if !self.snapshot.contains(id) {
            debug!("Ignoring tap: {}", BindError::UnknownRow(id.clone()));
            return false;
        }
        let dispatched = self.registry.tap(id);
        if self.config.refresh_on_tap
            && let Some(host) = self.host.as_mut()
        {
            host.refresh_visible();
        }
        dispatched
    }

    /// Dispatch an edit request.
    pub fn edit(&mut self, id: &RowId) -> bool {
        self.registry.edit(id)
    }

    /// Dispatch a delete request from the context menu.
    ///
    /// The row stays until the owner's data stream drops it.
    pub fn delete(&mut self, id: &RowId) -> bool {
        self.registry.delete(id)
    }

    /// Confirmed swipe-to-delete on the row at `index`.
    ///
    /// Removes the row locally, calls `on_delete`, then commits an animated
    /// single-row delete to the host. Does nothing without a delete handler.
    pub fn swipe_delete(&mut self, index: usize) -> bool {
        if !self.registry.has_delete() {
            debug!("Swipe delete on {} without a delete handler", index);
            return false;
        }
        let Some(row) = self.snapshot.remove(index) else {
            let err = BindError::IndexOutOfBounds {
                index,
                len: self.snapshot.len(),
            };
            warn!("Swipe delete ignored: {}", err);
            return false;
        };
        let id = row.id().clone();
        self.registry.delete(&id);
        self.render(HostUpdate::Delete { id }, Animation::Animated, Pending::Render);
        true
    }

    /// Handle a completed drag from `from` to `to`.
    ///
    /// `on_move` runs exactly once per accepted gesture, with the row's final
    /// index, even when nothing moved. Requests arriving while reordering is
    /// off or while a previous move is still settling are dropped.
    pub fn move_row(&mut self, from: usize, to: usize) -> bool {
        if !self.reorder_enabled {
            debug!("Ignoring move {} -> {} on {}, reorder disabled", from, to, self.id);
            return false;
        }
        let Some(plan) = self.mover.begin(&mut self.snapshot, from, to) else {
            return false;
        };

        self.registry.moved(plan.from, plan.to);

        let Some(placement) = plan.placement else {
            self.mover.settle();
            return true;
        };

        let update = HostUpdate::Move {
            id: plan.id,
            placement,
        };
        match self.render(update, Animation::None, Pending::Move) {
            Some(completion) => self.mover.awaiting(completion),
            None => self.mover.settle(),
        }
        true
    }

    /// Whether the row at `index` can be dragged right now.
    pub fn can_move(&self, index: usize) -> bool {
        self.reorder_enabled
            && !self.mover.is_moving()
            && index < self.snapshot.len()
            && self.mover.can_move(index)
    }

    /// Which swipe buttons the row at `index` offers.
    pub fn swipe_actions(&self, index: usize) -> SwipeActions {
        if !self.registry.has_delete() || index >= self.snapshot.len() {
            return SwipeActions::default();
        }
        SwipeActions {
            leading: Vec::new(),
            trailing: vec![SwipeAction {
                title: "Delete".to_string(),
                destructive: true,
            }],
        }
    }

    /// Which interactions a row offers.
    pub fn affordances(&self, id: &RowId) -> RowAffordances {
        if !self.snapshot.contains(id) {
            return RowAffordances::default();
        }
        RowAffordances {
            tap: self.registry.has_tap(),
            edit: self.registry.has_edit(),
            delete: self.registry.has_delete(),
            swipe_delete: self.registry.has_delete(),
            movable: self.reorder_enabled,
        }
    }

    /// Resolve the context menu for a row.
    ///
    /// The menu stays open until [`select_menu_item`](Self::select_menu_item)
    /// or [`close_context_menu`](Self::close_context_menu).
    pub fn open_context_menu(&mut self, id: &RowId) -> Option<ContextMenu> {
        if !self.snapshot.contains(id) {
            debug!("No context menu: {}", BindError::UnknownRow(id.clone()));
            return None;
        }
        let menu = ContextMenu::build(&self.registry, id);
        self.open_menu = Some(menu.clone());
        Some(menu)
    }

    pub fn close_context_menu(&mut self) {
        self.open_menu = None;
    }

    /// Run the action behind a leaf of the open menu and close it.
    pub fn select_menu_item(&mut self, item: MenuItemId) -> bool {
        let Some(menu) = self.open_menu.take() else {
            debug!("Menu selection {} with no open menu", item);
            return false;
        };
        let row = menu.row().clone();
        match menu.action(item) {
            Some(MenuAction::Edit) => self.edit(&row),
            Some(MenuAction::Delete) => self.delete(&row),
            Some(MenuAction::Custom(action)) => {
                action(&row);
                true
            }
            None => {
                debug!("Menu item {} has no action", item);
                false
            }
        }
    }

    /// Dispatch a title-bar button.
    pub fn bar_item_tapped(&mut self, side: BarSide) -> bool {
        self.registry.bar_tapped(side)
    }

    // -------------------------------------------------------------------------
    // Completions
    // -------------------------------------------------------------------------

    /// Handle every completion already reported by the host.
    pub fn process_completions(&mut self) {
        while let Ok(event) = self.completion_rx.try_recv() {
            self.complete(event);
        }
    }

    /// Wait for the next completion event.
    ///
    /// Never resolves to `None` while the adapter is alive, since it holds a
    /// sender itself.
    pub async fn next_completion(&mut self) -> Option<CompletionEvent> {
        self.completion_rx.recv().await
    }

    /// Handle one completion event.
    ///
    /// A dropped token releases an in-flight move like a completed one, but
    /// skips the reload callback.
    pub fn complete(&mut self, event: CompletionEvent) {
        let id = event.id();
        if id.generation != self.generation {
            debug!("Ignoring completion from detached host generation {}", id.generation);
            return;
        }
        let Some(kind) = self.pending.remove(&id) else {
            debug!("Unknown completion {:?}", id);
            return;
        };
        match (kind, event) {
            (Pending::Move, CompletionEvent::Completed(_)) => {
                self.mover.finish(id);
            }
            (Pending::Move, CompletionEvent::Dropped(_)) => {
                debug!("Host dropped move completion on {}, settling", self.id);
                self.mover.finish(id);
            }
            (Pending::Reload, CompletionEvent::Completed(_)) => {
                if let Some(done) = &self.reload_done {
                    done();
                }
            }
            (Pending::Reload, CompletionEvent::Dropped(_)) => {
                debug!("Host dropped reload completion on {}", self.id);
            }
            (Pending::Render, _) => {}
        }
    }

    fn render(
        &mut self,
        update: HostUpdate<T>,
        animation: Animation,
        kind: Pending,
    ) -> Option<CompletionId> {
        if self.host.is_none() {
            return None;
        }
        self.next_seq += 1;
        let id = CompletionId {
            generation: self.generation,
            seq: self.next_seq,
        };
        self.pending.insert(id, kind);
        let completion = Completion::new(id, self.completion_tx.clone());
        if let Some(host) = self.host.as_mut() {
            host.apply(update, animation, completion);
        }
        Some(id)
    }
}

//! Stream binding.
//!
//! `TableBinding` is the configuration surface for one bound list and the
//! single queue it runs on. Producers publish through `watch` channels from
//! any thread; hosts report gestures through a [`GestureSender`]. Everything
//! is redelivered onto the one task running [`TableBinding::run`], which is
//! the only place the adapter's rows are touched.

use std::future::pending;
use std::sync::Arc;

use log::{debug, info};
use tokio::sync::{mpsc, oneshot, watch};
use tokio_util::sync::CancellationToken;

use crate::actions::{ActionRegistry, BarItem, Callback, ContextMenu, ContextMenuItem, MenuItemId};
use crate::adapter::ListAdapter;
use crate::chrome::{BarSide, Color};
use crate::config::AdapterConfig;
use crate::host::PresentationHost;
use crate::row::{RowId, RowModel};

/// A gesture reported by the host.
#[derive(Debug)]
pub enum Gesture {
    Tap(RowId),
    Edit(RowId),
    /// Delete chosen from outside a swipe (e.g. a menu the host renders itself).
    Delete(RowId),
    /// Confirmed swipe-to-delete on the row at this index.
    SwipeDelete(usize),
    /// Completed drag-to-reorder.
    Move { from: usize, to: usize },
    /// Long press; the resolved menu is sent back on `reply`.
    OpenMenu {
        row: RowId,
        reply: oneshot::Sender<Option<ContextMenu>>,
    },
    SelectMenuItem(MenuItemId),
    CloseMenu,
    BarItem(BarSide),
    /// The host is going away; drop it and anything it still owes.
    Detach,
}

/// Cloneable handle hosts use to report gestures.
#[derive(Debug, Clone)]
pub struct GestureSender {
    tx: mpsc::UnboundedSender<Gesture>,
}

impl GestureSender {
    /// Send a gesture. Returns false once the binding has stopped.
    pub fn send(&self, gesture: Gesture) -> bool {
        self.tx.send(gesture).is_ok()
    }

    pub fn tap(&self, id: impl Into<RowId>) -> bool {
        self.send(Gesture::Tap(id.into()))
    }

    pub fn move_row(&self, from: usize, to: usize) -> bool {
        self.send(Gesture::Move { from, to })
    }

    pub fn swipe_delete(&self, index: usize) -> bool {
        self.send(Gesture::SwipeDelete(index))
    }

    /// Ask for a row's context menu and wait for it.
    pub async fn open_menu(&self, row: impl Into<RowId>) -> Option<ContextMenu> {
        let (reply, rx) = oneshot::channel();
        if !self.send(Gesture::OpenMenu {
            row: row.into(),
            reply,
        }) {
            return None;
        }
        rx.await.ok().flatten()
    }

    pub fn select_menu_item(&self, item: MenuItemId) -> bool {
        self.send(Gesture::SelectMenuItem(item))
    }
}

/// One bound list: its streams, its handlers and its host.
///
/// Configure with the builder methods, then drive it with [`run`](Self::run).
/// Later calls overwrite earlier ones.
pub struct TableBinding<T: RowModel, H: PresentationHost<T>> {
    adapter: ListAdapter<T, H>,
    actions: ActionRegistry,
    reload_done: Option<Callback>,
    data: watch::Receiver<Vec<T>>,
    title: Option<watch::Receiver<String>>,
    reorder_enabled: Option<watch::Receiver<bool>>,
    reload: Option<watch::Receiver<bool>>,
    title_color: Option<watch::Receiver<Color>>,
    title_bar_color: Option<watch::Receiver<Color>>,
    gestures_tx: mpsc::UnboundedSender<Gesture>,
    gestures_rx: mpsc::UnboundedReceiver<Gesture>,
    shutdown: CancellationToken,
}

impl<T: RowModel, H: PresentationHost<T>> TableBinding<T, H> {
    /// Bind `data` to `host`.
    pub fn new(data: watch::Receiver<Vec<T>>, host: H) -> Self {
        Self::with_config(data, host, AdapterConfig::default())
    }

    pub fn with_config(data: watch::Receiver<Vec<T>>, host: H, config: AdapterConfig) -> Self {
        let (gestures_tx, gestures_rx) = mpsc::unbounded_channel();
        Self {
            adapter: ListAdapter::with_host(config, host),
            actions: ActionRegistry::new(),
            reload_done: None,
            data,
            title: None,
            reorder_enabled: None,
            reload: None,
            title_color: None,
            title_bar_color: None,
            gestures_tx,
            gestures_rx,
            shutdown: CancellationToken::new(),
        }
    }

    // -------------------------------------------------------------------------
    // Configuration
    // -------------------------------------------------------------------------

    /// Title text. Without one the list has no title area.
    pub fn title(mut self, title: watch::Receiver<String>) -> Self {
        self.title = Some(title);
        self
    }

    pub fn row_spacing(mut self, spacing: f32) -> Self {
        self.adapter.set_row_spacing(spacing);
        self
    }

    pub fn reorder_enabled(mut self, enabled: watch::Receiver<bool>) -> Self {
        self.reorder_enabled = Some(enabled);
        self
    }

    /// `true` pulses redraw every row behind a cross-fade.
    pub fn reload(mut self, reload: watch::Receiver<bool>) -> Self {
        self.reload = Some(reload);
        self
    }

    /// Called each time a reload pulse has settled on screen.
    pub fn reload_done<F>(mut self, done: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.reload_done = Some(Arc::new(done));
        self
    }

    pub fn title_color(mut self, color: watch::Receiver<Color>) -> Self {
        self.title_color = Some(color);
        self
    }

    pub fn title_bar_color(mut self, color: watch::Receiver<Color>) -> Self {
        self.title_bar_color = Some(color);
        self
    }

    pub fn on_tap<F>(mut self, f: F) -> Self
    where
        F: Fn(&RowId) + Send + Sync + 'static,
    {
        self.actions = std::mem::take(&mut self.actions).on_tap(f);
        self
    }

    pub fn on_edit<F>(mut self, f: F) -> Self
    where
        F: Fn(&RowId) + Send + Sync + 'static,
    {
        self.actions = std::mem::take(&mut self.actions).on_edit(f);
        self
    }

    pub fn on_delete<F>(mut self, f: F) -> Self
    where
        F: Fn(&RowId) + Send + Sync + 'static,
    {
        self.actions = std::mem::take(&mut self.actions).on_delete(f);
        self
    }

    pub fn on_move<F>(mut self, f: F) -> Self
    where
        F: Fn(usize, usize) + Send + Sync + 'static,
    {
        self.actions = std::mem::take(&mut self.actions).on_move(f);
        self
    }

    pub fn additional_context_menu_items(mut self, items: Vec<ContextMenuItem>) -> Self {
        self.actions = std::mem::take(&mut self.actions).additional_context_menu_items(items);
        self
    }

    pub fn left_bar_item<F>(self, icon: impl Into<String>, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.bar_item(BarSide::Left, BarItem::new(icon, action))
    }

    pub fn right_bar_item<F>(self, icon: impl Into<String>, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.bar_item(BarSide::Right, BarItem::new(icon, action))
    }

    fn bar_item(mut self, side: BarSide, item: BarItem) -> Self {
        self.actions = std::mem::take(&mut self.actions).bar_item(side, item);
        self
    }

    // -------------------------------------------------------------------------
    // Handles
    // -------------------------------------------------------------------------

    /// Handle for the host to report gestures.
    pub fn gestures(&self) -> GestureSender {
        GestureSender {
            tx: self.gestures_tx.clone(),
        }
    }

    /// Cancelling this token tears the binding down.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    // -------------------------------------------------------------------------
    // Driving
    // -------------------------------------------------------------------------

    /// Run until cancelled or until the data stream closes, then hand the
    /// adapter back.
    pub async fn run(mut self) -> ListAdapter<T, H> {
        self.adapter.set_actions(std::mem::take(&mut self.actions));
        self.adapter.set_reload_done(self.reload_done.take());
        if self.title.is_some() {
            self.adapter.show_title_area();
        }
        self.deliver_current();
        info!("Binding {} running", self.adapter.id());

        loop {
            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    debug!("Binding {} cancelled", self.adapter.id());
                    break;
                }
                changed = self.data.changed() => {
                    if changed.is_err() {
                        debug!("Data stream for {} closed", self.adapter.id());
                        break;
                    }
                    let models = self.data.borrow_and_update().clone();
                    self.adapter.receive(models);
                }
                Some(title) = next_value(&mut self.title) => self.adapter.set_title(title),
                Some(enabled) = next_value(&mut self.reorder_enabled) => {
                    self.adapter.set_reorder_enabled(enabled);
                }
                Some(pulse) = next_value(&mut self.reload) => self.adapter.reload(pulse),
                Some(color) = next_value(&mut self.title_color) => self.adapter.set_title_color(color),
                Some(color) = next_value(&mut self.title_bar_color) => {
                    self.adapter.set_title_bar_color(color);
                }
                Some(gesture) = self.gestures_rx.recv() => self.dispatch(gesture),
                Some(event) = self.adapter.next_completion() => self.adapter.complete(event),
            }
        }

        self.adapter
    }

    /// Watch receivers carry a current value; deliver it before waiting for
    /// changes.
    fn deliver_current(&mut self) {
        let models = self.data.borrow_and_update().clone();
        self.adapter.receive(models);
        if let Some(rx) = self.title.as_mut() {
            let title = rx.borrow_and_update().clone();
            self.adapter.set_title(title);
        }
        if let Some(rx) = self.reorder_enabled.as_mut() {
            let enabled = *rx.borrow_and_update();
            self.adapter.set_reorder_enabled(enabled);
        }
        if let Some(rx) = self.reload.as_mut() {
            let pulse = *rx.borrow_and_update();
            self.adapter.reload(pulse);
        }
        if let Some(rx) = self.title_color.as_mut() {
            let color = *rx.borrow_and_update();
            self.adapter.set_title_color(color);
        }
        if let Some(rx) = self.title_bar_color.as_mut() {
            let color = *rx.borrow_and_update();
            self.adapter.set_title_bar_color(color);
        }
    }

    fn dispatch(&mut self, gesture: Gesture) {
        match gesture {
            Gesture::Tap(id) => {
                self.adapter.tap(&id);
            }
            Gesture::Edit(id) => {
                self.adapter.edit(&id);
            }
            Gesture::Delete(id) => {
                self.adapter.delete(&id);
            }
            Gesture::SwipeDelete(index) => {
                self.adapter.swipe_delete(index);
            }
            Gesture::Move { from, to } => {
                self.adapter.move_row(from, to);
            }
            Gesture::OpenMenu { row, reply } => {
                let _ = reply.send(self.adapter.open_context_menu(&row));
            }
            Gesture::SelectMenuItem(item) => {
                self.adapter.select_menu_item(item);
            }
            Gesture::CloseMenu => self.adapter.close_context_menu(),
            Gesture::BarItem(side) => {
                self.adapter.bar_item_tapped(side);
            }
            Gesture::Detach => {
                self.adapter.detach_host();
            }
        }
    }
}

/// Next value of an optional stream. Absent or closed streams never resolve.
async fn next_value<V: Clone>(slot: &mut Option<watch::Receiver<V>>) -> Option<V> {
    let Some(rx) = slot.as_mut() else {
        return pending().await;
    };
    if rx.changed().await.is_err() {
        *slot = None;
        return pending().await;
    }
    Some(rx.borrow_and_update().clone())
}

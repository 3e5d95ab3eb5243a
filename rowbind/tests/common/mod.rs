#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use rowbind::chrome::TitleBar;
use rowbind::host::{Animation, Completion, HostUpdate, PresentationHost};
use rowbind::row::{Row, RowId, RowModel};

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: String,
    pub v: u32,
}

impl RowModel for Item {
    fn id(&self) -> RowId {
        RowId::new(&self.id)
    }
}

pub fn item(id: &str, v: u32) -> Item {
    Item {
        id: id.to_string(),
        v,
    }
}

pub fn items(ids: &[&str]) -> Vec<Item> {
    ids.iter().map(|id| item(id, 0)).collect()
}

/// Everything a [`RecordingHost`] saw.
#[derive(Debug)]
pub struct HostState {
    pub rows: Vec<Row<Item>>,
    pub applied: Vec<(HostUpdate<Item>, Animation)>,
    pub held: Vec<Completion>,
    pub refreshes: usize,
    pub spacing: f32,
    pub reorder_enabled: bool,
    pub title_bar: Option<TitleBar>,
}

/// Host double mirroring every update onto its own rows.
///
/// With `auto_complete` the completion fires during `apply`; otherwise it is
/// held until the test releases it.
#[derive(Debug, Clone)]
pub struct RecordingHost {
    pub state: Arc<Mutex<HostState>>,
    pub events: Arc<Mutex<Vec<String>>>,
    pub auto_complete: bool,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(HostState {
                rows: Vec::new(),
                applied: Vec::new(),
                held: Vec::new(),
                refreshes: 0,
                spacing: 0.0,
                reorder_enabled: false,
                title_bar: None,
            })),
            events: Arc::new(Mutex::new(Vec::new())),
            auto_complete: true,
        }
    }

    pub fn holding() -> Self {
        Self {
            auto_complete: false,
            ..Self::new()
        }
    }

    pub fn ids(&self) -> Vec<String> {
        self.state
            .lock()
            .unwrap()
            .rows
            .iter()
            .map(|r| r.id().to_string())
            .collect()
    }

    pub fn applied_count(&self) -> usize {
        self.state.lock().unwrap().applied.len()
    }

    pub fn last_applied(&self) -> Option<(HostUpdate<Item>, Animation)> {
        self.state.lock().unwrap().applied.last().cloned()
    }

    pub fn refreshes(&self) -> usize {
        self.state.lock().unwrap().refreshes
    }

    /// Fire every held completion.
    pub fn release(&self) {
        let held: Vec<Completion> = self.state.lock().unwrap().held.drain(..).collect();
        for completion in held {
            completion.complete();
        }
    }

    /// Drop every held completion without firing it.
    pub fn forget(&self) {
        self.state.lock().unwrap().held.clear();
    }
}

impl PresentationHost<Item> for RecordingHost {
    fn apply(&mut self, update: HostUpdate<Item>, animation: Animation, done: Completion) {
        let mut state = self.state.lock().unwrap();
        update.apply_to(&mut state.rows);
        let label = match &update {
            HostUpdate::Script(_) => "host:script".to_string(),
            HostUpdate::Move { id, .. } => format!("host:move {id}"),
            HostUpdate::Delete { id } => format!("host:delete {id}"),
            HostUpdate::Reload => "host:reload".to_string(),
        };
        self.events.lock().unwrap().push(label);
        state.applied.push((update, animation));
        if self.auto_complete {
            done.complete();
        } else {
            state.held.push(done);
        }
    }

    fn refresh_visible(&mut self) {
        self.state.lock().unwrap().refreshes += 1;
    }

    fn set_row_spacing(&mut self, spacing: f32) {
        self.state.lock().unwrap().spacing = spacing;
    }

    fn set_reorder_enabled(&mut self, enabled: bool) {
        self.state.lock().unwrap().reorder_enabled = enabled;
    }

    fn set_title_bar(&mut self, bar: &TitleBar) {
        self.state.lock().unwrap().title_bar = Some(bar.clone());
    }
}

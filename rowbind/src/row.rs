//! Row identity model.
//!
//! Every view-model pushed into the adapter carries a stable string id. Rows
//! with equal ids are the same logical item across snapshots, even when their
//! payloads differ; a payload difference is what the diff reports as an
//! in-place update.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::warn;

use crate::error::BindError;

/// Stable identifier of a row.
///
/// Cheap to clone; ids are handed to every callback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(Arc<str>);

impl RowId {
    /// Create a row id.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RowId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for RowId {
    fn from(id: String) -> Self {
        Self(Arc::from(id))
    }
}

impl PartialEq<str> for RowId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for RowId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl AsRef<str> for RowId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Trait for view-models that can be bound to a list.
///
/// `PartialEq` decides whether a row whose id survived an emission needs a
/// visual refresh.
pub trait RowModel: Send + Sync + Clone + PartialEq + 'static {
    /// The natural identity of this view-model.
    fn id(&self) -> RowId;
}

/// One identified, renderable list entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<T> {
    id: RowId,
    payload: T,
}

impl<T: RowModel> Row<T> {
    /// Wrap a view-model, taking its natural id.
    pub fn new(payload: T) -> Self {
        Self {
            id: payload.id(),
            payload,
        }
    }
}

impl<T> Row<T> {
    /// The row's identity.
    pub fn id(&self) -> &RowId {
        &self.id
    }

    /// The wrapped view-model.
    pub fn payload(&self) -> &T {
        &self.payload
    }

    /// Replace the payload, keeping the identity.
    pub(crate) fn set_payload(&mut self, payload: T) {
        self.payload = payload;
    }
}

/// How an emission containing repeated ids is handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Log and keep the last occurrence (its position and payload).
    #[default]
    KeepLast,
    /// Refuse the emission with [`BindError::DuplicateId`].
    Reject,
}

/// Ordered set of rows describing the list at one instant.
///
/// Row ids within a snapshot are unique.
#[derive(Debug, Clone)]
pub struct Snapshot<T> {
    rows: Vec<Row<T>>,
    index: HashMap<RowId, usize>,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T: PartialEq> PartialEq for Snapshot<T> {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
    }
}

impl<T: RowModel> Snapshot<T> {
    /// Build a snapshot from an emitted sequence of view-models.
    pub fn from_models(models: Vec<T>, policy: DuplicatePolicy) -> Result<Self, BindError> {
        let mut rows: Vec<Option<Row<T>>> = Vec::with_capacity(models.len());
        let mut index: HashMap<RowId, usize> = HashMap::with_capacity(models.len());

        for (position, model) in models.into_iter().enumerate() {
            let row = Row::new(model);
            if let Some(first) = index.get(row.id()).copied() {
                match policy {
                    DuplicatePolicy::Reject => {
                        return Err(BindError::DuplicateId {
                            id: row.id.clone(),
                            first,
                            second: position,
                        });
                    }
                    DuplicatePolicy::KeepLast => {
                        warn!(
                            "Duplicate row id '{}' at {} and {}, keeping the last",
                            row.id, first, position
                        );
                        rows[first] = None;
                    }
                }
            }
            index.insert(row.id.clone(), position);
            rows.push(Some(row));
        }

        Ok(Self::from_rows(rows.into_iter().flatten().collect()))
    }
}

impl<T> Snapshot<T> {
    /// Build a snapshot from rows whose ids are already known to be unique.
    pub(crate) fn from_rows(rows: Vec<Row<T>>) -> Self {
        let mut snapshot = Self {
            rows,
            index: HashMap::new(),
        };
        snapshot.reindex();
        snapshot
    }

    fn reindex(&mut self) {
        self.index = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| (row.id.clone(), i))
            .collect();
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the snapshot has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in display order.
    pub fn rows(&self) -> &[Row<T>] {
        &self.rows
    }

    /// Row at a position.
    pub fn get(&self, index: usize) -> Option<&Row<T>> {
        self.rows.get(index)
    }

    /// Position of a row by id.
    pub fn position(&self, id: &RowId) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Row by id.
    pub fn row(&self, id: &RowId) -> Option<&Row<T>> {
        self.position(id).and_then(|i| self.rows.get(i))
    }

    /// Whether the id is part of this snapshot.
    pub fn contains(&self, id: &RowId) -> bool {
        self.index.contains_key(id)
    }

    /// Ids in display order.
    pub fn ids(&self) -> Vec<RowId> {
        self.rows.iter().map(|r| r.id.clone()).collect()
    }

    /// Iterate the view-models in display order.
    pub fn payloads(&self) -> impl Iterator<Item = &T> {
        self.rows.iter().map(|r| &r.payload)
    }

    // -------------------------------------------------------------------------
    // Mutation (adapter-internal)
    // -------------------------------------------------------------------------

    pub(crate) fn remove(&mut self, index: usize) -> Option<Row<T>> {
        if index >= self.rows.len() {
            return None;
        }
        let row = self.rows.remove(index);
        self.reindex();
        Some(row)
    }

    /// Insert at `index`, clamped to the end.
    pub(crate) fn insert(&mut self, index: usize, row: Row<T>) {
        let index = index.min(self.rows.len());
        self.rows.insert(index, row);
        self.reindex();
    }
}

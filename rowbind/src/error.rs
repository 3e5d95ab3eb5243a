//! Error types.

use thiserror::Error;

use crate::row::RowId;

/// Errors surfaced by construction-time validation.
///
/// Runtime dispatch (taps, moves, deletes) never returns these to the owner;
/// the adapter logs them and recovers locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// Two rows in one emission share an id.
    #[error("Duplicate row id '{id}' at positions {first} and {second}")]
    DuplicateId {
        /// The repeated id.
        id: RowId,
        /// Position of the earlier occurrence.
        first: usize,
        /// Position of the later occurrence.
        second: usize,
    },

    /// An index reported by the host is outside the current rows.
    #[error("Index {index} out of bounds for {len} rows")]
    IndexOutOfBounds {
        /// The offending index.
        index: usize,
        /// Number of rows at the time.
        len: usize,
    },

    /// An id that is not part of the current snapshot.
    #[error("Unknown row '{0}'")]
    UnknownRow(RowId),

    /// No presentation host is attached.
    #[error("No presentation host attached")]
    HostDetached,

    /// A colour string that could not be parsed.
    #[error("Invalid color '{0}'")]
    InvalidColor(String),
}

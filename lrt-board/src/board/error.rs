//! Reconciliation error types.

use crate::domain::{InvalidStationId, StationId};

/// The station id passed to reconcile is unusable.
///
/// This is a caller bug, not a data condition: missing or odd rows in the
/// feed never produce an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidStation {
    /// Empty or whitespace-only id
    #[error("station id must not be empty")]
    Empty,

    /// Id contains characters a station id can't have
    #[error(transparent)]
    Malformed(InvalidStationId),

    /// Well-formed id that isn't on the line
    #[error("unknown station: {0}")]
    Unknown(StationId),
}

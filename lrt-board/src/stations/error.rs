//! Station table and lookup error types.

use std::path::PathBuf;

use crate::domain::{InvalidStationId, StationId};
use crate::feed::FeedError;

/// The station table is unusable. Fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// No stations were supplied
    #[error("station table is empty")]
    Empty,

    /// Two stations share an id
    #[error("duplicate station id: {0}")]
    DuplicateId(StationId),

    /// An entry is missing a field or carries an invalid value
    #[error("station entry #{index}: {reason}")]
    InvalidEntry { index: usize, reason: String },

    /// The table file couldn't be read
    #[error("failed to read station table {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The table file isn't a station list
    #[error("invalid station table: {0}")]
    Feed(#[from] FeedError),
}

/// Nearest-station lookup on an index with no stations.
///
/// A successfully loaded index is never empty, so this only surfaces if
/// that guarantee is broken.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no stations to search")]
pub struct NoStations;

/// The caller's station selection couldn't be resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    /// Explicit selection is not a well-formed id
    #[error(transparent)]
    InvalidId(#[from] InvalidStationId),

    /// Explicit selection is not on the line
    #[error("unknown station: {0}")]
    Unknown(StationId),

    /// Neither a selection nor a location was given
    #[error("no station selected and no location given")]
    NoSelection,

    #[error(transparent)]
    NoStations(#[from] NoStations),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        assert_eq!(ConfigError::Empty.to_string(), "station table is empty");

        let err = ConfigError::DuplicateId(StationId::parse("C21").unwrap());
        assert_eq!(err.to_string(), "duplicate station id: C21");

        let err = ConfigError::InvalidEntry {
            index: 3,
            reason: "missing position".into(),
        };
        assert_eq!(err.to_string(), "station entry #3: missing position");

        let err = ConfigError::Io {
            path: PathBuf::from("/nope/stations.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert_eq!(
            err.to_string(),
            "failed to read station table /nope/stations.json: not found"
        );

        assert_eq!(
            SelectionError::NoSelection.to_string(),
            "no station selected and no location given"
        );
    }
}

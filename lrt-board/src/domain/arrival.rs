//! Live observations consumed from the feed.
//!
//! These are ephemeral: one batch per poll cycle, read once and discarded.

use super::{Coordinate, Direction, StationId};

/// One row of a station's live arrival board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrivalRecord {
    pub station_id: StationId,
    pub direction: Direction,
    pub destination_name: String,
    /// Minutes until the vehicle reaches the station.
    /// `None` means there is currently no prediction.
    pub estimate_minutes: Option<u32>,
}

impl ArrivalRecord {
    pub fn new(
        station_id: StationId,
        direction: Direction,
        destination_name: impl Into<String>,
        estimate_minutes: Option<u32>,
    ) -> Self {
        Self {
            station_id,
            direction,
            destination_name: destination_name.into(),
            estimate_minutes,
        }
    }
}

/// A vehicle's reported position.
#[derive(Debug, Clone, PartialEq)]
pub struct VehiclePosition {
    pub train_no: Option<String>,
    pub position: Coordinate,
    pub direction: Direction,
}

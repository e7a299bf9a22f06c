//! Domain types for the light-rail board.
//!
//! All types enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod arrival;
mod direction;
mod station;

pub use arrival::{ArrivalRecord, VehiclePosition};
pub use direction::Direction;
pub use station::{Coordinate, InvalidCoordinate, InvalidStationId, Station, StationId};

//! Station table and nearest-station lookup.
//!
//! The station table is loaded once at startup (from a station-list file)
//! and never changes afterwards.

mod error;
mod geo;
mod index;
mod loader;

pub use error::{ConfigError, NoStations, SelectionError};
pub use geo::{EARTH_RADIUS_M, haversine_distance};
pub use index::StationIndex;
pub use loader::convert_stations;

//! Station identity and location types.

use std::fmt;

use serde::Serialize;

/// Error returned when parsing an invalid station id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid station id {input:?}: {reason}")]
pub struct InvalidStationId {
    input: String,
    reason: &'static str,
}

impl InvalidStationId {
    /// Returns true if the rejected input was empty (or only whitespace).
    pub fn is_empty_input(&self) -> bool {
        self.input.trim().is_empty()
    }
}

/// A station identifier as used by the open-data feed (e.g. `C21`).
///
/// Ids are non-empty and consist of ASCII letters and digits only. This
/// type guarantees that any `StationId` value is valid by construction.
///
/// # Examples
///
/// ```
/// use lrt_board::domain::StationId;
///
/// let c21 = StationId::parse("C21").unwrap();
/// assert_eq!(c21.as_str(), "C21");
///
/// assert!(StationId::parse("").is_err());
/// assert!(StationId::parse("C 21").is_err());
///
/// // User input can be normalized first
/// assert_eq!(StationId::parse_normalized(" c21 ").unwrap(), c21);
/// ```
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    /// Parse a station id, rejecting anything that isn't ASCII alphanumeric.
    pub fn parse(s: &str) -> Result<Self, InvalidStationId> {
        if s.is_empty() {
            return Err(InvalidStationId {
                input: s.to_string(),
                reason: "must not be empty",
            });
        }

        if !s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return Err(InvalidStationId {
                input: s.to_string(),
                reason: "must be ASCII letters and digits",
            });
        }

        Ok(StationId(s.to_string()))
    }

    /// Parse after trimming whitespace and uppercasing.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidStationId> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationId({})", self.0)
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Error returned for an out-of-range or non-finite coordinate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid coordinate ({lat}, {lon}): {reason}")]
pub struct InvalidCoordinate {
    lat: f64,
    lon: f64,
    reason: &'static str,
}

/// A WGS84 latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Create a coordinate, checking that it lies on the globe.
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidCoordinate> {
        let reason = if !lat.is_finite() || !lon.is_finite() {
            Some("must be finite")
        } else if !(-90.0..=90.0).contains(&lat) {
            Some("latitude must be within [-90, 90]")
        } else if !(-180.0..=180.0).contains(&lon) {
            Some("longitude must be within [-180, 180]")
        } else {
            None
        };

        match reason {
            Some(reason) => Err(InvalidCoordinate { lat, lon, reason }),
            None => Ok(Coordinate { lat, lon }),
        }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }
}

/// A light-rail station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Station {
    pub id: StationId,
    pub display_name: String,
    pub position: Coordinate,
}

impl Station {
    pub fn new(id: StationId, display_name: impl Into<String>, position: Coordinate) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            position,
        }
    }
}

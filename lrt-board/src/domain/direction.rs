//! Running direction of a light-rail vehicle.

use serde::Serialize;

/// Which way along the line a vehicle is running.
///
/// The feed tags direction with an integer code (0 or 1), but the tag is
/// frequently missing or carries some other value. Both cases decode to
/// [`Direction::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Direction code 0.
    Forward,
    /// Direction code 1.
    Reverse,
    Unknown,
}

impl Direction {
    /// Decode the feed's direction code.
    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(0) => Direction::Forward,
            Some(1) => Direction::Reverse,
            _ => Direction::Unknown,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_known_codes() {
        assert_eq!(Direction::from_code(Some(0)), Direction::Forward);
        assert_eq!(Direction::from_code(Some(1)), Direction::Reverse);
    }

    #[test]
    fn missing_or_unexpected_codes_are_unknown() {
        assert_eq!(Direction::from_code(None), Direction::Unknown);
        assert_eq!(Direction::from_code(Some(2)), Direction::Unknown);
        assert_eq!(Direction::from_code(Some(-1)), Direction::Unknown);
    }
}

//! Reconciled board types.
//!
//! These are the view-ready results handed back to the rendering layer.
//! They are built fresh on every reconciliation and never mutated.

use serde::Serialize;

use crate::domain::{Direction, StationId};

/// Estimates at or below this many minutes are [`Urgency::Imminent`].
pub const IMMINENT_MAX_MINUTES: u32 = 1;

/// Estimates at or below this many minutes (and above imminent) are
/// [`Urgency::Urgent`].
pub const URGENT_MAX_MINUTES: u32 = 2;

/// How soon an arrival is, for highlighting on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Imminent,
    Urgent,
    Normal,
}

impl Urgency {
    /// Classify an arrival estimate. Thresholds are fixed.
    ///
    /// ```
    /// use lrt_board::board::Urgency;
    ///
    /// assert_eq!(Urgency::classify(1), Urgency::Imminent);
    /// assert_eq!(Urgency::classify(2), Urgency::Urgent);
    /// assert_eq!(Urgency::classify(3), Urgency::Normal);
    /// ```
    pub fn classify(estimate_minutes: u32) -> Self {
        if estimate_minutes <= IMMINENT_MAX_MINUTES {
            Urgency::Imminent
        } else if estimate_minutes <= URGENT_MAX_MINUTES {
            Urgency::Urgent
        } else {
            Urgency::Normal
        }
    }
}

/// Which section of the board an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionLabel {
    Forward,
    Reverse,
    Unspecified,
}

impl DirectionLabel {
    /// Section heading. `fallback` is whether the board fell back to
    /// showing untagged arrivals on their own.
    pub fn heading(&self, fallback: bool) -> &'static str {
        match self {
            DirectionLabel::Forward => "Forward",
            DirectionLabel::Reverse => "Reverse",
            DirectionLabel::Unspecified if fallback => "Upcoming arrivals",
            DirectionLabel::Unspecified => "Direction unknown",
        }
    }
}

impl From<Direction> for DirectionLabel {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Forward => DirectionLabel::Forward,
            Direction::Reverse => DirectionLabel::Reverse,
            Direction::Unknown => DirectionLabel::Unspecified,
        }
    }
}

/// One upcoming arrival.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoardEntry {
    pub destination_name: String,
    pub estimate_minutes: u32,
    pub urgency: Urgency,
}

impl BoardEntry {
    /// Create an entry, classifying its urgency.
    pub fn new(destination_name: impl Into<String>, estimate_minutes: u32) -> Self {
        Self {
            destination_name: destination_name.into(),
            estimate_minutes,
            urgency: Urgency::classify(estimate_minutes),
        }
    }
}

/// A non-empty section of the board, sorted soonest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectionBoard {
    pub label: DirectionLabel,
    pub entries: Vec<BoardEntry>,
}

/// A station's arrivals, split by direction.
///
/// `directions` holds only non-empty sections, ordered forward, reverse,
/// unspecified. An empty `directions` is the normal "no arrivals" state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconciledBoard {
    pub station_id: StationId,
    pub directions: Vec<DirectionBoard>,

    /// True when no arrival had a direction tag and the untagged arrivals
    /// are shown as a single merged section.
    pub fallback: bool,
}

impl ReconciledBoard {
    /// A board with no arrivals.
    pub fn empty(station_id: StationId) -> Self {
        Self {
            station_id,
            directions: Vec::new(),
            fallback: false,
        }
    }

    /// Entries in one section, empty if the section is absent.
    pub fn bucket(&self, label: DirectionLabel) -> &[BoardEntry] {
        self.directions
            .iter()
            .find(|d| d.label == label)
            .map(|d| d.entries.as_slice())
            .unwrap_or(&[])
    }

    /// Check if there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    /// Total number of entries across all sections.
    pub fn entry_count(&self) -> usize {
        self.directions.iter().map(|d| d.entries.len()).sum()
    }

    /// The soonest arrival in any direction.
    pub fn next_arrival(&self) -> Option<&BoardEntry> {
        self.directions
            .iter()
            .filter_map(|d| d.entries.first())
            .min_by_key(|e| e.estimate_minutes)
    }
}

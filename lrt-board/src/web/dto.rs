//! Data transfer objects for web requests and responses.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::board::{BoardEntry, DirectionBoard, DirectionLabel, ReconciledBoard};
use crate::domain::Station;
use crate::snapshots::BoardSnapshot;
use crate::vehicles::LocatedVehicle;

/// A station for selection lists.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationView {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

impl From<&Station> for StationView {
    fn from(station: &Station) -> Self {
        Self {
            id: station.id.to_string(),
            name: station.display_name.clone(),
            lat: station.position.lat(),
            lon: station.position.lon(),
        }
    }
}

/// Response listing every station in line order.
#[derive(Debug, Serialize)]
pub struct StationListResponse {
    pub stations: Vec<StationView>,
}

/// Query for the nearest station.
#[derive(Debug, Deserialize)]
pub struct NearestQuery {
    pub lat: f64,
    pub lon: f64,
}

/// Response for the nearest station.
#[derive(Debug, Serialize)]
pub struct NearestStationResponse {
    pub station: StationView,

    /// Great-circle distance from the query point, in metres.
    pub distance_m: f64,
}

/// Query for a station's board.
///
/// Either `station` or both `lat` and `lon` must be given; `station` wins.
#[derive(Debug, Default, Deserialize)]
pub struct BoardQuery {
    pub station: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// One section of a board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionView {
    pub label: DirectionLabel,

    /// Display heading for the section.
    pub heading: &'static str,

    pub entries: Vec<BoardEntry>,
}

impl SectionView {
    fn new(section: &DirectionBoard, fallback: bool) -> Self {
        Self {
            label: section.label,
            heading: section.label.heading(fallback),
            entries: section.entries.clone(),
        }
    }
}

/// A view-ready board for one station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardResponse {
    pub station: StationView,

    /// Non-empty sections in display order. Empty when there are no arrivals.
    pub sections: Vec<SectionView>,

    /// Soonest arrival in any section.
    pub next: Option<BoardEntry>,

    pub fallback: bool,

    /// Poll that produced this board; absent if no poll has published one.
    pub poll: Option<u64>,

    pub feed_updated_at: Option<DateTime<FixedOffset>>,

    pub received_at: Option<DateTime<Utc>>,
}

impl BoardResponse {
    /// A board reconciled on request, not taken from a poll.
    pub fn from_board(station: &Station, board: &ReconciledBoard) -> Self {
        Self {
            station: station.into(),
            sections: board
                .directions
                .iter()
                .map(|d| SectionView::new(d, board.fallback))
                .collect(),
            next: board.next_arrival().cloned(),
            fallback: board.fallback,
            poll: None,
            feed_updated_at: None,
            received_at: None,
        }
    }

    /// A board from the latest poll snapshot.
    pub fn from_snapshot(station: &Station, snapshot: &BoardSnapshot) -> Self {
        Self {
            poll: Some(snapshot.poll),
            feed_updated_at: snapshot.feed_updated_at,
            received_at: Some(snapshot.received_at),
            ..Self::from_board(station, &snapshot.board)
        }
    }
}

/// One poll's worth of live-board rows.
#[derive(Debug, Deserialize)]
pub struct FeedRequest {
    /// Monotonic poll sequence number.
    pub poll: u64,

    /// Raw live-board rows, as returned upstream.
    pub records: Vec<Value>,
}

/// Result of ingesting one poll.
#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub poll: u64,

    /// Rows that could be attributed to a station.
    pub records: usize,

    /// Boards that became the latest for their station.
    pub stored: usize,

    /// Boards discarded because a newer poll was already published.
    pub stale: usize,
}

/// Vehicles annotated with their nearest station.
#[derive(Debug, Serialize)]
pub struct VehiclesResponse {
    pub vehicles: Vec<LocatedVehicle>,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, StationId};

    fn station() -> Station {
        Station::new(
            StationId::parse("C21").unwrap(),
            "哈瑪星",
            Coordinate::new(22.6217, 120.2740).unwrap(),
        )
    }

    #[test]
    fn fallback_board_gets_merged_heading() {
        let board = ReconciledBoard {
            station_id: StationId::parse("C21").unwrap(),
            directions: vec![DirectionBoard {
                label: DirectionLabel::Unspecified,
                entries: vec![BoardEntry::new("籬仔內", 2)],
            }],
            fallback: true,
        };

        let response = BoardResponse::from_board(&station(), &board);
        assert_eq!(response.station.id, "C21");
        assert_eq!(response.sections.len(), 1);
        assert_eq!(response.sections[0].heading, "Upcoming arrivals");
        assert!(response.fallback);
        assert_eq!(response.next, Some(BoardEntry::new("籬仔內", 2)));
        assert_eq!(response.poll, None);
    }

    #[test]
    fn snapshot_board_carries_poll() {
        let board = ReconciledBoard::empty(StationId::parse("C21").unwrap());
        let snapshot = BoardSnapshot::new(17, board, None);

        let response = BoardResponse::from_snapshot(&station(), &snapshot);
        assert_eq!(response.poll, Some(17));
        assert!(response.sections.is_empty());
        assert_eq!(response.next, None);
        assert_eq!(response.received_at, Some(snapshot.received_at));
    }

    #[test]
    fn board_response_json_shape() {
        let board = ReconciledBoard {
            station_id: StationId::parse("C21").unwrap(),
            directions: vec![DirectionBoard {
                label: DirectionLabel::Forward,
                entries: vec![BoardEntry::new("籬仔內", 1)],
            }],
            fallback: false,
        };

        let json = serde_json::to_value(BoardResponse::from_board(&station(), &board)).unwrap();
        assert_eq!(json["sections"][0]["label"], "forward");
        assert_eq!(json["sections"][0]["heading"], "Forward");
        assert_eq!(json["sections"][0]["entries"][0]["urgency"], "imminent");
        assert_eq!(json["next"]["destination_name"], "籬仔內");
        assert_eq!(json["poll"], Value::Null);
    }
}

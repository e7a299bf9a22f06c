//! Arrival-board reconciliation.
//!
//! Turns the raw live-board rows for a station into a board split by
//! direction. The upstream direction tag is intermittently missing, so the
//! rules are:
//!
//! 1. Rows without an estimate are dropped (no prediction right now).
//! 2. Remaining rows go to `forward`, `reverse` or `unspecified` by tag.
//! 3. If nothing is tagged but there are untagged rows, the untagged rows
//!    are shown as one merged section rather than a blank board.
//! 4. Each section is sorted soonest first, keeping feed order for ties.

use tracing::{debug, trace};

use crate::domain::{ArrivalRecord, Direction, StationId};
use crate::stations::StationIndex;

use super::error::InvalidStation;
use super::types::{BoardEntry, DirectionBoard, DirectionLabel, ReconciledBoard};

/// Builds reconciled boards for the stations of one line.
///
/// Holds nothing but a reference to the station index; every call is a
/// pure function of its arguments.
#[derive(Debug, Clone, Copy)]
pub struct BoardReconciler<'a> {
    stations: &'a StationIndex,
}

impl<'a> BoardReconciler<'a> {
    pub fn new(stations: &'a StationIndex) -> Self {
        Self { stations }
    }

    /// Reconcile the board for one station.
    ///
    /// `records` may contain rows for other stations; they are ignored.
    /// Fails only if `station_id` is empty, malformed or not on the line.
    pub fn reconcile(
        &self,
        station_id: &str,
        records: &[ArrivalRecord],
    ) -> Result<ReconciledBoard, InvalidStation> {
        let station_id = self.resolve(station_id)?;
        let rows = records.iter().filter(|r| r.station_id == station_id);
        Ok(build_board(station_id.clone(), rows))
    }

    /// Reconcile every station on the line in one pass.
    ///
    /// Returns one board per station in line order, including empty boards
    /// for stations with no arrivals. Rows for stations not on the line are
    /// dropped.
    pub fn reconcile_line(&self, records: &[ArrivalRecord]) -> Vec<ReconciledBoard> {
        let mut grouped: Vec<Vec<&ArrivalRecord>> = vec![Vec::new(); self.stations.len()];

        for record in records {
            match self.stations.position_of(&record.station_id) {
                Some(idx) => grouped[idx].push(record),
                None => trace!(station = %record.station_id, "dropping row for station not on the line"),
            }
        }

        self.stations
            .all()
            .iter()
            .zip(grouped)
            .map(|(station, rows)| build_board(station.id.clone(), rows))
            .collect()
    }

    fn resolve(&self, raw: &str) -> Result<StationId, InvalidStation> {
        let id = StationId::parse_normalized(raw).map_err(|e| {
            if e.is_empty_input() {
                InvalidStation::Empty
            } else {
                InvalidStation::Malformed(e)
            }
        })?;

        if !self.stations.contains(&id) {
            return Err(InvalidStation::Unknown(id));
        }
        Ok(id)
    }
}

/// Partition, sort and classify one station's rows.
fn build_board<'r>(
    station_id: StationId,
    rows: impl IntoIterator<Item = &'r ArrivalRecord>,
) -> ReconciledBoard {
    let mut forward = Vec::new();
    let mut reverse = Vec::new();
    let mut unspecified = Vec::new();
    let mut dropped = 0usize;

    for row in rows {
        let Some(estimate) = row.estimate_minutes else {
            dropped += 1;
            continue;
        };

        let entry = BoardEntry::new(row.destination_name.clone(), estimate);
        match row.direction {
            Direction::Forward => forward.push(entry),
            Direction::Reverse => reverse.push(entry),
            Direction::Unknown => unspecified.push(entry),
        }
    }

    let fallback = forward.is_empty() && reverse.is_empty() && !unspecified.is_empty();
    if fallback {
        debug!(
            station = %station_id,
            arrivals = unspecified.len(),
            "no direction tags, showing merged arrivals"
        );
    }
    if dropped > 0 {
        trace!(station = %station_id, dropped, "dropped rows without an estimate");
    }

    let directions = [
        (DirectionLabel::Forward, forward),
        (DirectionLabel::Reverse, reverse),
        (DirectionLabel::Unspecified, unspecified),
    ]
    .into_iter()
    .filter(|(_, entries)| !entries.is_empty())
    .map(|(label, mut entries)| {
        // Stable: equal estimates keep feed order
        entries.sort_by_key(|e| e.estimate_minutes);
        DirectionBoard { label, entries }
    })
    .collect();

    ReconciledBoard {
        station_id,
        directions,
        fallback,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::board::Urgency;
    use crate::domain::{Coordinate, Station};
    use proptest::prelude::*;

    fn index() -> StationIndex {
        StationIndex::load(vec![
            Station::new(StationId::parse("C20").unwrap(), "Love Pier", Coordinate::new(22.6206, 120.2838).unwrap()),
            Station::new(StationId::parse("C21").unwrap(), "Hamasen", Coordinate::new(22.6217, 120.2740).unwrap()),
        ])
        .unwrap()
    }

    fn record_strategy() -> impl Strategy<Value = ArrivalRecord> {
        (
            prop::sample::select(vec!["C20", "C21"]),
            prop::option::of(0i64..=2),
            prop::sample::select(vec!["Lizihnei", "Hamasen", "Unknown"]),
            prop::option::of(0u32..30),
        )
            .prop_map(|(station, direction, dest, est)| {
                ArrivalRecord::new(
                    StationId::parse(station).unwrap(),
                    Direction::from_code(direction),
                    dest,
                    est,
                )
            })
    }

    /// What one section should contain: matching rows, stably sorted.
    fn expected_bucket(records: &[ArrivalRecord], direction: Direction) -> Vec<(String, u32)> {
        let mut rows: Vec<(String, u32)> = records
            .iter()
            .filter(|r| r.station_id.as_str() == "C21" && r.direction == direction)
            .filter_map(|r| r.estimate_minutes.map(|m| (r.destination_name.clone(), m)))
            .collect();
        rows.sort_by_key(|(_, m)| *m);
        rows
    }

    fn actual_bucket(board: &ReconciledBoard, label: DirectionLabel) -> Vec<(String, u32)> {
        board
            .bucket(label)
            .iter()
            .map(|e| (e.destination_name.clone(), e.estimate_minutes))
            .collect()
    }

    proptest! {
        /// Each estimated row lands in exactly one section, sorted and stable
        #[test]
        fn every_estimated_row_in_exactly_one_section(
            records in prop::collection::vec(record_strategy(), 0..40)
        ) {
            let index = index();
            let board = BoardReconciler::new(&index).reconcile("C21", &records).unwrap();

            prop_assert_eq!(actual_bucket(&board, DirectionLabel::Forward), expected_bucket(&records, Direction::Forward));
            prop_assert_eq!(actual_bucket(&board, DirectionLabel::Reverse), expected_bucket(&records, Direction::Reverse));
            prop_assert_eq!(actual_bucket(&board, DirectionLabel::Unspecified), expected_bucket(&records, Direction::Unknown));

            let estimated = records
                .iter()
                .filter(|r| r.station_id.as_str() == "C21" && r.estimate_minutes.is_some())
                .count();
            prop_assert_eq!(board.entry_count(), estimated);
        }

        /// Sections present are never empty, and fallback means only untagged rows
        #[test]
        fn sections_and_fallback_are_consistent(
            records in prop::collection::vec(record_strategy(), 0..40)
        ) {
            let index = index();
            let board = BoardReconciler::new(&index).reconcile("C21", &records).unwrap();

            prop_assert!(board.directions.iter().all(|d| !d.entries.is_empty()));
            let only_unspecified = board.directions.len() == 1
                && board.directions[0].label == DirectionLabel::Unspecified;
            prop_assert_eq!(board.fallback, only_unspecified);
        }

        /// Urgency is always derived from the estimate
        #[test]
        fn urgency_matches_estimate(
            records in prop::collection::vec(record_strategy(), 0..40)
        ) {
            let index = index();
            let board = BoardReconciler::new(&index).reconcile("C21", &records).unwrap();
            for section in &board.directions {
                for entry in &section.entries {
                    prop_assert_eq!(entry.urgency, Urgency::classify(entry.estimate_minutes));
                }
            }
        }

        /// Same input, same board
        #[test]
        fn idempotent(records in prop::collection::vec(record_strategy(), 0..40)) {
            let index = index();
            let reconciler = BoardReconciler::new(&index);
            prop_assert_eq!(
                reconciler.reconcile("C21", &records).unwrap(),
                reconciler.reconcile("C21", &records).unwrap()
            );
        }
    }
}

//! Immutable, ordered station index.

use std::collections::HashMap;

use crate::domain::{Coordinate, Station, StationId};

use super::error::{ConfigError, NoStations, SelectionError};
use super::geo::haversine_distance;

/// Distances closer than this (metres) count as a tie.
const TIE_TOLERANCE_M: f64 = 1e-6;

/// The stations of one line, in physical line order.
///
/// Built once at startup and never mutated, so it can be shared freely
/// between threads (wrap it in an `Arc`).
#[derive(Debug, Clone)]
pub struct StationIndex {
    /// Stations in load order. This order matches the line sequence and
    /// is never re-sorted.
    stations: Vec<Station>,

    /// Map from id to position in `stations`.
    by_id: HashMap<StationId, usize>,
}

impl StationIndex {
    /// Build an index from stations in line order.
    ///
    /// Fails if the list is empty or contains the same id twice.
    pub fn load(stations: Vec<Station>) -> Result<Self, ConfigError> {
        if stations.is_empty() {
            return Err(ConfigError::Empty);
        }

        let mut by_id = HashMap::with_capacity(stations.len());
        for (idx, station) in stations.iter().enumerate() {
            if by_id.insert(station.id.clone(), idx).is_some() {
                return Err(ConfigError::DuplicateId(station.id.clone()));
            }
        }

        Ok(Self { stations, by_id })
    }

    /// The station closest to `point` by great-circle distance.
    ///
    /// When two stations are equally close, the one loaded first wins.
    pub fn nearest(&self, point: Coordinate) -> Result<&Station, NoStations> {
        self.nearest_with_distance(point).map(|(station, _)| station)
    }

    /// Like [`nearest`](Self::nearest), also returning the distance in metres.
    pub fn nearest_with_distance(&self, point: Coordinate) -> Result<(&Station, f64), NoStations> {
        let mut best: Option<(&Station, f64)> = None;

        for station in &self.stations {
            let distance = haversine_distance(point, station.position);
            match best {
                // Strictly closer only: equal distances keep the earlier station
                Some((_, best_distance)) if distance >= best_distance - TIE_TOLERANCE_M => {}
                _ => best = Some((station, distance)),
            }
        }

        best.ok_or(NoStations)
    }

    /// All stations in line order.
    pub fn all(&self) -> &[Station] {
        &self.stations
    }

    /// Look up a station by id.
    pub fn get(&self, id: &StationId) -> Option<&Station> {
        self.by_id.get(id).map(|&idx| &self.stations[idx])
    }

    /// Check if a station is on this line.
    pub fn contains(&self, id: &StationId) -> bool {
        self.by_id.contains_key(id)
    }

    /// Position of a station along the line.
    pub fn position_of(&self, id: &StationId) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Resolve which station to show.
    ///
    /// An explicit selection wins. Without one, the station nearest the
    /// user's location is used. With neither, the caller has to ask the
    /// user to pick.
    pub fn select(
        &self,
        explicit: Option<&str>,
        location: Option<Coordinate>,
    ) -> Result<&Station, SelectionError> {
        if let Some(raw) = explicit {
            let id = StationId::parse_normalized(raw)?;
            return self.get(&id).ok_or(SelectionError::Unknown(id));
        }

        match location {
            Some(point) => Ok(self.nearest(point)?),
            None => Err(SelectionError::NoSelection),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station(id: &str, lat: f64, lon: f64) -> Station {
        Station::new(
            StationId::parse(id).unwrap(),
            format!("Station {id}"),
            Coordinate::new(lat, lon).unwrap(),
        )
    }

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    /// A short stretch of line along the Kaohsiung waterfront.
    fn waterfront() -> StationIndex {
        StationIndex::load(vec![
            station("C10", 22.6135, 120.2977),
            station("C11", 22.6176, 120.2906),
            station("C12", 22.6203, 120.2847),
            station("C13", 22.6218, 120.2787),
            station("C14", 22.6198, 120.2741),
        ])
        .unwrap()
    }

    /// Reference implementation: scan and keep the first minimum.
    fn brute_force_nearest(index: &StationIndex, point: Coordinate) -> (StationId, f64) {
        index
            .all()
            .iter()
            .map(|s| (s.id.clone(), haversine_distance(point, s.position)))
            .fold(None, |best: Option<(StationId, f64)>, (id, d)| match best {
                Some((_, bd)) if bd <= d => best,
                _ => Some((id, d)),
            })
            .unwrap()
    }

    #[test]
    fn load_rejects_empty() {
        assert!(matches!(StationIndex::load(vec![]), Err(ConfigError::Empty)));
    }

    #[test]
    fn load_rejects_duplicate_ids() {
        let result = StationIndex::load(vec![
            station("C1", 22.60, 120.33),
            station("C2", 22.61, 120.32),
            station("C1", 22.62, 120.31),
        ]);
        match result {
            Err(ConfigError::DuplicateId(id)) => assert_eq!(id.as_str(), "C1"),
            other => panic!("expected duplicate id error, got {other:?}"),
        }
    }

    #[test]
    fn all_preserves_load_order() {
        let index = StationIndex::load(vec![
            station("C3", 22.60, 120.33),
            station("C1", 22.61, 120.32),
            station("C2", 22.62, 120.31),
        ])
        .unwrap();

        let ids: Vec<_> = index.all().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["C3", "C1", "C2"]);
        assert_eq!(index.position_of(&StationId::parse("C1").unwrap()), Some(1));
    }

    #[test]
    fn point_at_station_returns_it_with_zero_distance() {
        let index = waterfront();
        let (station, distance) = index.nearest_with_distance(coord(22.6203, 120.2847)).unwrap();
        assert_eq!(station.id.as_str(), "C12");
        assert_eq!(distance, 0.0);
    }

    #[test]
    fn nearest_matches_brute_force() {
        let index = waterfront();
        for point in [
            coord(22.6150, 120.2950),
            coord(22.6225, 120.2800),
            coord(22.6100, 120.2700),
            coord(22.6593, 120.2868),
        ] {
            let (expected, expected_distance) = brute_force_nearest(&index, point);
            let (station, distance) = index.nearest_with_distance(point).unwrap();
            assert_eq!(station.id, expected);
            assert_eq!(distance, expected_distance);
        }
    }

    #[test]
    fn nearest_uses_great_circle_distance_not_degrees() {
        // At 60°N a degree of longitude is about half a degree of latitude.
        // In raw degrees NORTH (0.9°) looks closer than EAST (1.5°), but on
        // the ground EAST is ~83 km away and NORTH ~100 km.
        let index = StationIndex::load(vec![
            station("NORTH", 60.9, 10.0),
            station("EAST", 60.0, 11.5),
        ])
        .unwrap();

        let nearest = index.nearest(coord(60.0, 10.0)).unwrap();
        assert_eq!(nearest.id.as_str(), "EAST");
    }

    #[test]
    fn ties_go_to_first_loaded() {
        // Mirror images across the meridian through the query point
        let index = StationIndex::load(vec![
            station("WEST", 22.62, 120.27),
            station("EAST", 22.62, 120.29),
        ])
        .unwrap();
        assert_eq!(index.nearest(coord(22.62, 120.28)).unwrap().id.as_str(), "WEST");

        let swapped = StationIndex::load(vec![
            station("EAST", 22.62, 120.29),
            station("WEST", 22.62, 120.27),
        ])
        .unwrap();
        assert_eq!(swapped.nearest(coord(22.62, 120.28)).unwrap().id.as_str(), "EAST");
    }

    #[test]
    fn get_and_contains() {
        let index = waterfront();
        let c13 = StationId::parse("C13").unwrap();
        assert!(index.contains(&c13));
        assert_eq!(index.get(&c13).unwrap().display_name, "Station C13");
        assert!(index.get(&StationId::parse("C99").unwrap()).is_none());
        assert_eq!(index.len(), 5);
        assert!(!index.is_empty());
    }

    #[test]
    fn select_prefers_explicit_choice() {
        let index = waterfront();
        let selected = index
            .select(Some("c14"), Some(coord(22.6135, 120.2977)))
            .unwrap();
        assert_eq!(selected.id.as_str(), "C14");
    }

    #[test]
    fn select_falls_back_to_nearest() {
        let index = waterfront();
        let selected = index.select(None, Some(coord(22.6135, 120.2977))).unwrap();
        assert_eq!(selected.id.as_str(), "C10");
    }

    #[test]
    fn select_errors() {
        let index = waterfront();
        assert_eq!(index.select(None, None), Err(SelectionError::NoSelection));
        assert_eq!(
            index.select(Some("C99"), None),
            Err(SelectionError::Unknown(StationId::parse("C99").unwrap()))
        );
        assert!(matches!(
            index.select(Some(""), None),
            Err(SelectionError::InvalidId(_))
        ));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn stations_strategy() -> impl Strategy<Value = Vec<(f64, f64)>> {
        prop::collection::vec((22.55f64..22.70, 120.25f64..120.40), 1..20)
    }

    proptest! {
        /// The returned station is never farther than any other station
        #[test]
        fn nearest_is_minimal(
            positions in stations_strategy(),
            lat in 22.50f64..22.75,
            lon in 120.20f64..120.45,
        ) {
            let stations: Vec<Station> = positions
                .iter()
                .enumerate()
                .map(|(i, &(la, lo))| Station::new(
                    StationId::parse(&format!("C{i}")).unwrap(),
                    format!("C{i}"),
                    Coordinate::new(la, lo).unwrap(),
                ))
                .collect();
            let index = StationIndex::load(stations).unwrap();
            let point = Coordinate::new(lat, lon).unwrap();

            let (_, best) = index.nearest_with_distance(point).unwrap();
            for station in index.all() {
                prop_assert!(best <= haversine_distance(point, station.position) + TIE_TOLERANCE_M);
            }
        }
    }
}

//! Live vehicle positions, annotated for the map.
//!
//! Each vehicle is tagged with the station it is closest to and the
//! section its direction maps to, so the map can colour it the same way
//! the board does.

use serde::Serialize;

use crate::board::DirectionLabel;
use crate::domain::{Coordinate, StationId, VehiclePosition};
use crate::stations::{NoStations, StationIndex};

/// A vehicle with its nearest station.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocatedVehicle {
    pub train_no: Option<String>,
    pub position: Coordinate,
    pub direction: DirectionLabel,
    pub nearest_station: StationId,
    /// Great-circle distance to `nearest_station`, in metres.
    pub distance_m: f64,
}

/// Annotate each vehicle with its nearest station, keeping input order.
pub fn locate_vehicles(
    stations: &StationIndex,
    vehicles: &[VehiclePosition],
) -> Result<Vec<LocatedVehicle>, NoStations> {
    vehicles
        .iter()
        .map(|vehicle| {
            let (station, distance_m) = stations.nearest_with_distance(vehicle.position)?;
            Ok(LocatedVehicle {
                train_no: vehicle.train_no.clone(),
                position: vehicle.position,
                direction: vehicle.direction.into(),
                nearest_station: station.id.clone(),
                distance_m,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Direction, Station};

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn index() -> StationIndex {
        StationIndex::load(vec![
            Station::new(StationId::parse("C20").unwrap(), "Love Pier", coord(22.6206, 120.2838)),
            Station::new(StationId::parse("C21").unwrap(), "Hamasen", coord(22.6217, 120.2740)),
        ])
        .unwrap()
    }

    #[test]
    fn tags_nearest_station_and_direction() {
        let vehicles = vec![
            VehiclePosition {
                train_no: Some("105".into()),
                position: coord(22.6216, 120.2745),
                direction: Direction::Reverse,
            },
            VehiclePosition {
                train_no: None,
                position: coord(22.6206, 120.2838),
                direction: Direction::Unknown,
            },
        ];

        let located = locate_vehicles(&index(), &vehicles).unwrap();

        assert_eq!(located.len(), 2);
        assert_eq!(located[0].nearest_station.as_str(), "C21");
        assert_eq!(located[0].direction, DirectionLabel::Reverse);
        assert!(located[0].distance_m > 0.0 && located[0].distance_m < 100.0);

        assert_eq!(located[1].nearest_station.as_str(), "C20");
        assert_eq!(located[1].direction, DirectionLabel::Unspecified);
        assert_eq!(located[1].distance_m, 0.0);
    }

    #[test]
    fn no_vehicles() {
        assert!(locate_vehicles(&index(), &[]).unwrap().is_empty());
    }
}

//! Loading the station table from a station-list payload.

use std::path::Path;

use tracing::info;

use crate::domain::{Station, StationId};
use crate::feed::{Language, StationDto, convert_position, parse_payload};

use super::error::ConfigError;
use super::index::StationIndex;

impl StationIndex {
    /// Read a station-list JSON file and build the index.
    ///
    /// The file uses the feed's station-list shape. Order in the file is
    /// taken as line order.
    pub fn load_from_path(path: impl AsRef<Path>, language: Language) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let body = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let index = Self::load_from_json(&body, language)?;
        info!(path = %path.display(), stations = index.len(), "loaded station table");
        Ok(index)
    }

    /// Build the index from a station-list JSON body.
    pub fn load_from_json(body: &str, language: Language) -> Result<Self, ConfigError> {
        let dtos: Vec<StationDto> = parse_payload(body)?;
        Self::load(convert_stations(&dtos, language)?)
    }
}

/// Convert station-list entries to stations.
///
/// Unlike live data, a bad entry here is fatal: a hole in the station table
/// would silently hide a station from every lookup.
pub fn convert_stations(dtos: &[StationDto], language: Language) -> Result<Vec<Station>, ConfigError> {
    dtos.iter()
        .enumerate()
        .map(|(index, dto)| convert_station(index, dto, language))
        .collect()
}

fn convert_station(index: usize, dto: &StationDto, language: Language) -> Result<Station, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEntry { index, reason };

    let raw_id = dto
        .station_id
        .as_deref()
        .ok_or_else(|| invalid("missing StationID".to_string()))?;
    let id = StationId::parse_normalized(raw_id).map_err(|e| invalid(e.to_string()))?;

    let position = dto
        .station_position
        .as_ref()
        .ok_or_else(|| invalid(format!("station {id} has no position")))?;
    let position =
        convert_position(position).ok_or_else(|| invalid(format!("station {id} has an invalid position")))?;

    // A station without any name is still usable; show its id
    let display_name = dto
        .station_name
        .as_ref()
        .and_then(|name| language.pick(name))
        .map(str::to_string)
        .unwrap_or_else(|| id.to_string());

    Ok(Station::new(id, display_name, position))
}

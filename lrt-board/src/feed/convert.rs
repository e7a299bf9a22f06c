//! Conversion from feed DTOs to domain types.
//!
//! Each loosely-typed field is classified as present, absent or malformed
//! before it reaches the domain. Absent and malformed values never fail a
//! batch: a record that can't be attributed to a station is skipped, an
//! unreadable direction becomes [`Direction::Unknown`], and an unreadable
//! estimate becomes "no prediction".

use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde_json::{Number, Value};
use tracing::{debug, trace};

use crate::domain::{ArrivalRecord, Coordinate, Direction, StationId, VehiclePosition};

use super::error::FeedError;
use super::types::{LiveBoardDto, NameDto, PositionDto, VehiclePositionDto};

/// Destination name used when the feed gives us nothing to show.
pub const UNKNOWN_DESTINATION: &str = "Unknown";

/// Preferred language for display names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    /// Traditional Chinese (`Zh_tw`).
    #[default]
    Zh,
    En,
}

/// Error returned when parsing an unsupported language tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language {0:?} (expected \"zh\" or \"en\")")]
pub struct UnknownLanguage(String);

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zh" | "zh_tw" | "zh-tw" => Ok(Language::Zh),
            "en" => Ok(Language::En),
            _ => Err(UnknownLanguage(s.to_string())),
        }
    }
}

impl Language {
    /// Pick a name in this language, falling back to the other one.
    pub fn pick<'a>(&self, name: &'a NameDto) -> Option<&'a str> {
        let (preferred, other) = match self {
            Language::Zh => (&name.zh_tw, &name.en),
            Language::En => (&name.en, &name.zh_tw),
        };

        non_blank(preferred).or_else(|| non_blank(other))
    }
}

fn non_blank(s: &Option<String>) -> Option<&str> {
    s.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Classification of a loosely-typed feed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field<T> {
    Present(T),
    Absent,
    Malformed,
}

/// A JSON number with no fractional part. Some producers send whole
/// numbers as floats ("3.0").
fn whole_number(n: &Number) -> Option<i64> {
    if let Some(i) = n.as_i64() {
        return Some(i);
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() <= i64::MAX as f64 => Some(f as i64),
        _ => None,
    }
}

fn direction_field(value: Option<&Value>) -> Field<i64> {
    match value {
        None | Some(Value::Null) => Field::Absent,
        Some(Value::Number(n)) => whole_number(n).map_or(Field::Malformed, Field::Present),
        Some(_) => Field::Malformed,
    }
}

fn estimate_field(value: Option<&Value>) -> Field<u32> {
    match value {
        None | Some(Value::Null) => Field::Absent,
        Some(Value::Number(n)) => whole_number(n)
            .and_then(|mins| u32::try_from(mins).ok())
            .map_or(Field::Malformed, Field::Present),
        Some(_) => Field::Malformed,
    }
}

fn text_field(value: Option<&Value>) -> Field<&str> {
    match value {
        None | Some(Value::Null) => Field::Absent,
        Some(Value::String(s)) => Field::Present(s.as_str()),
        Some(_) => Field::Malformed,
    }
}

/// A bilingual name object. Members that aren't strings count as missing.
fn name_field(value: Option<&Value>) -> Field<NameDto> {
    match value {
        None | Some(Value::Null) => Field::Absent,
        Some(Value::Object(map)) => {
            let member = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);
            Field::Present(NameDto {
                zh_tw: member("Zh_tw"),
                en: member("En"),
            })
        }
        Some(_) => Field::Malformed,
    }
}

fn direction_of(value: Option<&Value>) -> Direction {
    match direction_field(value) {
        Field::Present(code) => Direction::from_code(Some(code)),
        Field::Absent => Direction::Unknown,
        Field::Malformed => {
            trace!(?value, "unreadable direction, treating as unknown");
            Direction::Unknown
        }
    }
}

/// Result of converting one live-board payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveBoardBatch {
    pub records: Vec<ArrivalRecord>,

    /// Latest `UpdateTime` seen across the payload, if any parsed.
    pub updated_at: Option<DateTime<FixedOffset>>,
}

/// Split a raw JSON body into its records.
///
/// The upstream returns either a bare array, or an object wrapping exactly
/// one array (alongside scalar metadata such as `UpdateTime`). Items that
/// don't decode as `T` are skipped.
pub fn parse_payload<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, FeedError> {
    let value: Value = serde_json::from_str(body)?;
    let items = unwrap_items(value)?;
    Ok(decode_items(items))
}

fn unwrap_items(value: Value) -> Result<Vec<Value>, FeedError> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Object(map) => {
            let mut arrays = map.into_iter().filter_map(|(_, v)| match v {
                Value::Array(items) => Some(items),
                _ => None,
            });
            match (arrays.next(), arrays.next()) {
                (Some(items), None) => Ok(items),
                (None, _) => Err(FeedError::UnexpectedShape("object without a record array")),
                (Some(_), Some(_)) => Err(FeedError::UnexpectedShape(
                    "object with more than one record array",
                )),
            }
        }
        _ => Err(FeedError::UnexpectedShape("expected an array or object")),
    }
}

/// Decode each item independently, skipping those of the wrong shape.
pub fn decode_items<T: DeserializeOwned>(items: Vec<Value>) -> Vec<T> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value(item) {
            Ok(decoded) => Some(decoded),
            Err(e) => {
                debug!(index = idx, error = %e, "skipping undecodable feed item");
                None
            }
        })
        .collect()
}

/// Convert a live-board payload to arrival records.
pub fn convert_live_board(dtos: &[LiveBoardDto], language: Language) -> LiveBoardBatch {
    let records = dtos
        .iter()
        .filter_map(|dto| convert_live_board_record(dto, language))
        .collect();

    let updated_at = dtos.iter().filter_map(update_time_of).max();

    LiveBoardBatch {
        records,
        updated_at,
    }
}

/// Convert a single live-board row.
///
/// Returns `None` only when the row can't be attributed to a station.
pub fn convert_live_board_record(dto: &LiveBoardDto, language: Language) -> Option<ArrivalRecord> {
    let station_id = match dto.station_id.as_deref().map(StationId::parse_normalized) {
        Some(Ok(id)) => id,
        Some(Err(e)) => {
            debug!(error = %e, "skipping live-board row with invalid station id");
            return None;
        }
        None => {
            debug!("skipping live-board row without station id");
            return None;
        }
    };

    let estimate_minutes = match estimate_field(dto.estimate_time.as_ref()) {
        Field::Present(mins) => Some(mins),
        Field::Absent => None,
        Field::Malformed => {
            debug!(
                station = %station_id,
                value = ?dto.estimate_time,
                "unreadable estimate, treating as no prediction"
            );
            None
        }
    };

    Some(ArrivalRecord {
        direction: direction_of(dto.direction.as_ref()),
        destination_name: destination_name(dto, language),
        estimate_minutes,
        station_id,
    })
}

fn destination_name(dto: &LiveBoardDto, language: Language) -> String {
    let named = match name_field(dto.destination_station_name.as_ref()) {
        Field::Present(name) => language.pick(&name).map(str::to_string),
        Field::Absent => None,
        Field::Malformed => {
            trace!(value = ?dto.destination_station_name, "unreadable destination name");
            None
        }
    };

    named
        .or_else(|| head_sign(dto))
        .unwrap_or_else(|| UNKNOWN_DESTINATION.to_string())
}

fn head_sign(dto: &LiveBoardDto) -> Option<String> {
    match text_field(dto.trip_head_sign.as_ref()) {
        Field::Present(sign) => Some(sign.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string),
        Field::Absent => None,
        Field::Malformed => {
            trace!(value = ?dto.trip_head_sign, "unreadable head sign");
            None
        }
    }
}

fn update_time_of(dto: &LiveBoardDto) -> Option<DateTime<FixedOffset>> {
    match text_field(dto.update_time.as_ref()) {
        Field::Present(s) => DateTime::parse_from_rfc3339(s).ok(),
        Field::Absent | Field::Malformed => None,
    }
}

/// Convert a position object, if it carries a usable coordinate.
pub fn convert_position(dto: &PositionDto) -> Option<Coordinate> {
    let (lat, lon) = (dto.position_lat?, dto.position_lon?);
    Coordinate::new(lat, lon).ok()
}

/// Convert live vehicle positions, skipping those without a usable coordinate.
pub fn convert_vehicle_positions(dtos: &[VehiclePositionDto]) -> Vec<VehiclePosition> {
    dtos.iter()
        .filter_map(|dto| {
            let position = dto.train_position.as_ref().and_then(convert_position);
            if position.is_none() {
                debug!(train = ?dto.train_no, "skipping vehicle without a usable position");
            }
            Some(VehiclePosition {
                train_no: dto.train_no.clone(),
                position: position?,
                direction: direction_of(dto.direction.as_ref()),
            })
        })
        .collect()
}

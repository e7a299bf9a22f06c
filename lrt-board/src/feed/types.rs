//! Open-data API response DTOs.
//!
//! These types map directly to the light-rail JSON payloads. Every field is
//! an `Option` because the upstream omits fields (or sends null) rather than
//! guaranteeing a shape. Fields whose type is unreliable upstream are kept
//! as raw [`serde_json::Value`] and classified during conversion.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A bilingual name object, e.g. `{"Zh_tw": "哈瑪星", "En": "Hamasen"}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct NameDto {
    #[serde(rename = "Zh_tw")]
    pub zh_tw: Option<String>,

    #[serde(rename = "En")]
    pub en: Option<String>,
}

/// A position object as sent by the feed.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PositionDto {
    pub position_lat: Option<f64>,
    pub position_lon: Option<f64>,
}

/// One entry of the station list.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StationDto {
    #[serde(rename = "StationID")]
    pub station_id: Option<String>,

    pub station_name: Option<NameDto>,

    pub station_position: Option<PositionDto>,
}

/// One row of the live arrival board.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct LiveBoardDto {
    /// Station this prediction is for.
    #[serde(rename = "StationID")]
    pub station_id: Option<String>,

    /// Direction code, normally 0 or 1.
    pub direction: Option<Value>,

    /// Where the arriving vehicle terminates, normally a [`NameDto`] object.
    pub destination_station_name: Option<Value>,

    /// Free-text head sign; used when the destination name is missing.
    pub trip_head_sign: Option<Value>,

    /// Minutes until arrival, normally a non-negative integer.
    pub estimate_time: Option<Value>,

    /// When the upstream last refreshed this row, normally RFC 3339.
    pub update_time: Option<Value>,
}

/// A live vehicle position.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct VehiclePositionDto {
    pub train_no: Option<String>,

    pub direction: Option<Value>,

    pub train_position: Option<PositionDto>,
}

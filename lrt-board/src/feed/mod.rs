//! Light-rail open-data feed payloads.
//!
//! This module owns the wire shapes of the three payloads the collaborator
//! hands us (station list, live arrival board, live vehicle positions) and
//! their conversion into domain types.
//!
//! Key characteristics of the feed:
//! - Field names are PascalCase, names are bilingual (`Zh_tw` / `En`)
//! - Any field may be missing or null
//! - `Direction` and `EstimateTime` are sometimes present but unreadable

mod convert;
mod error;
mod types;

pub use convert::{
    Language, LiveBoardBatch, UNKNOWN_DESTINATION, UnknownLanguage, convert_live_board,
    convert_live_board_record, convert_position, convert_vehicle_positions, decode_items,
    parse_payload,
};
pub use error::FeedError;
pub use types::{LiveBoardDto, NameDto, PositionDto, StationDto, VehiclePositionDto};

//! Application state for the web layer.

use std::sync::Arc;

use crate::feed::Language;
use crate::snapshots::BoardSnapshots;
use crate::stations::StationIndex;

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Station table, immutable after startup
    pub stations: Arc<StationIndex>,

    /// Latest board per station
    pub snapshots: Arc<BoardSnapshots>,

    /// Preferred language for destination names in raw payloads
    pub language: Language,
}

impl AppState {
    /// Create a new app state.
    pub fn new(stations: StationIndex, snapshots: BoardSnapshots, language: Language) -> Self {
        Self {
            stations: Arc::new(stations),
            snapshots: Arc::new(snapshots),
            language,
        }
    }
}

//! Arrival-board reconciliation.
//!
//! Takes the raw arrival rows of a poll cycle and produces, per station, a
//! board split by running direction with each arrival classified by
//! urgency. See [`BoardReconciler`] for the rules.

mod error;
mod reconcile;
mod types;

pub use error::InvalidStation;
pub use reconcile::BoardReconciler;
pub use types::{
    BoardEntry, DirectionBoard, DirectionLabel, IMMINENT_MAX_MINUTES, ReconciledBoard,
    URGENT_MAX_MINUTES, Urgency,
};

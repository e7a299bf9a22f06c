//! Web layer for the light-rail board.
//!
//! A JSON-only surface: the polling collaborator pushes raw payloads in,
//! the rendering layer reads view-ready boards out.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;

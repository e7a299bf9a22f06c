use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use lrt_board::settings::Settings;
use lrt_board::snapshots::BoardSnapshots;
use lrt_board::stations::StationIndex;
use lrt_board::web::{AppState, create_router};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lrt_board=info")),
        )
        .init();

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!("invalid settings: {e}");
            return ExitCode::FAILURE;
        }
    };

    // A bad station table is fatal: every lookup depends on it
    let stations = match StationIndex::load_from_path(&settings.stations_path, settings.language) {
        Ok(stations) => stations,
        Err(e) => {
            error!("failed to load stations: {e}");
            return ExitCode::FAILURE;
        }
    };

    let snapshots = BoardSnapshots::new(&settings.snapshots);
    let state = AppState::new(stations, snapshots, settings.language);
    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(settings.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %settings.bind_addr, "failed to bind: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!("Light-rail board listening on http://{}", settings.bind_addr);
    info!("API Endpoints:");
    info!("  GET  /health              - Health check");
    info!("  GET  /stations            - Stations in line order");
    info!("  GET  /stations/nearest    - Nearest station to lat/lon");
    info!("  POST /stations/:id/board  - Reconcile a raw live board");
    info!("  POST /feed                - Ingest one poll of the line");
    info!("  GET  /board               - Latest board for a station or location");
    info!("  POST /vehicles            - Locate live vehicles");

    if let Err(e) = axum::serve(listener, app).await {
        error!("server error: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

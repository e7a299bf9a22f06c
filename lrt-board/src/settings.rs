//! Server settings, read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::feed::Language;
use crate::snapshots::SnapshotConfig;

pub const BIND_ADDR_VAR: &str = "LRT_BIND_ADDR";
pub const STATIONS_PATH_VAR: &str = "LRT_STATIONS_PATH";
pub const NAME_LANGUAGE_VAR: &str = "LRT_NAME_LANGUAGE";
pub const BOARD_TTL_VAR: &str = "LRT_BOARD_TTL_SECS";
pub const SNAPSHOT_CAPACITY_VAR: &str = "LRT_SNAPSHOT_CAPACITY";

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

/// Errors reading settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// A required variable is unset or empty
    #[error("{0} must be set")]
    Missing(&'static str),

    /// A variable is set but can't be parsed
    #[error("invalid {key}={value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for the board server.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Address to listen on.
    pub bind_addr: SocketAddr,

    /// Station-list JSON file, in line order.
    pub stations_path: PathBuf,

    /// Preferred language for station and destination names.
    pub language: Language,

    /// Snapshot store sizing and expiry.
    pub snapshots: SnapshotConfig,
}

impl Settings {
    /// Create settings with defaults for everything but the station table.
    pub fn new(stations_path: impl Into<PathBuf>) -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            stations_path: stations_path.into(),
            language: Language::default(),
            snapshots: SnapshotConfig::default(),
        }
    }

    /// Read settings from process environment variables.
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let stations_path = get(STATIONS_PATH_VAR).ok_or(SettingsError::Missing(STATIONS_PATH_VAR))?;
        let mut settings = Self::new(stations_path);

        let bind_addr = get(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        settings.bind_addr = parse_var(BIND_ADDR_VAR, &bind_addr)?;

        if let Some(language) = get(NAME_LANGUAGE_VAR) {
            settings.language = parse_var(NAME_LANGUAGE_VAR, &language)?;
        }

        if let Some(ttl) = get(BOARD_TTL_VAR) {
            let secs: u64 = parse_var(BOARD_TTL_VAR, &ttl)?;
            if secs == 0 {
                return Err(SettingsError::Invalid {
                    key: BOARD_TTL_VAR,
                    value: ttl,
                    reason: "must be at least 1 second".to_string(),
                });
            }
            settings.snapshots.ttl = Duration::from_secs(secs);
        }

        if let Some(capacity) = get(SNAPSHOT_CAPACITY_VAR) {
            settings.snapshots.max_capacity = parse_var(SNAPSHOT_CAPACITY_VAR, &capacity)?;
        }

        Ok(settings)
    }
}

fn parse_var<T>(key: &'static str, value: &str) -> Result<T, SettingsError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| SettingsError::Invalid {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

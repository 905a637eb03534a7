//! Error taxonomy for configuration loading and OBS remote calls.

use std::path::PathBuf;
use thiserror::Error;

/// Every failure an invocation can hit.
///
/// None of these are recovered locally: the binary prints the chain and exits
/// non-zero.
#[derive(Debug, Error)]
pub enum ToggleError {
    // ── Configuration ───────────────────────────────────────────────
    /// The config file could not be read.
    #[error("Failed to read config file: {}", path.display())]
    ConfigLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML for the expected shape.
    #[error("Failed to parse YAML config: {}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The config parsed but cannot be acted upon.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Connection ──────────────────────────────────────────────────
    /// WebSocket handshake or authentication with OBS failed.
    #[error("Failed to connect to OBS WebSocket at {host}:{port}")]
    Connection {
        host: String,
        port: u16,
        #[source]
        source: obws::Error,
    },

    /// An operation was attempted before `connect()` succeeded.
    #[error("OBS not connected")]
    NotConnected,

    // ── Remote calls ────────────────────────────────────────────────
    /// A read-only request was rejected or failed in transit.
    #[error("Failed to {what}")]
    Query {
        what: String,
        #[source]
        source: obws::Error,
    },

    /// A state-changing request was rejected or failed in transit.
    #[error("Failed to {what}")]
    Command {
        what: String,
        #[source]
        source: obws::Error,
    },

    /// The named source is not placed in the scene.
    #[error("Scene item '{item}' not found in scene '{scene}' - verify scene and source names in OBS")]
    ItemNotFound { scene: String, item: String },
}

pub type Result<T, E = ToggleError> = std::result::Result<T, E>;

//! Error types for the player control surface

use thiserror::Error;

/// Result type alias for player operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while driving the player
#[derive(Error, Debug)]
pub enum Error {
    /// The media element refused to start playback (autoplay policy)
    #[error("Playback rejected: {0}")]
    PlayRejected(String),

    /// A property was written with a value outside its allowed range
    #[error("Value out of range for {property}: {value}")]
    IndexSize { property: &'static str, value: f64 },

    /// The media element does not support the requested value
    #[error("Unsupported value for {property}: {value}")]
    NotSupported { property: &'static str, value: f64 },

    /// A seek target that is not a finite number
    #[error("Invalid time: {0}")]
    InvalidTime(f64),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Malformed action script passed to the session driver
    #[error("Invalid action script: {0}")]
    ScriptError(String),

    /// Failed to read configuration from disk
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse or emit JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

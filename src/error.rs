use thiserror::Error;

/// Library-level errors using thiserror for structured error handling.
///
/// None of these escape the per-frame entry points: the dispatcher logs them
/// and drops the affected cue. They surface only from configuration loading,
/// recording parsing and backend construction.

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Sound not found: {0}")]
    SoundNotFound(String),

    #[error("Failed to load sound file: {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to decode sound: {name}")]
    DecodeFailed {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to initialize audio output stream")]
    StreamInitFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Audio playback failed")]
    PlaybackFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Unknown audio source: {0}")]
    UnknownSource(u64),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save configuration to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to create config directory: {path}")]
    DirectoryCreationFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ReplayError {
    #[error("Failed to read recording")]
    Io(#[from] std::io::Error),

    #[error("Malformed record on line {line}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode record")]
    Encode(#[source] serde_json::Error),
}

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;

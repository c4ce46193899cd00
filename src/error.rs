//! Crate-level error type.
//!
//! Nothing in the analytics core is fatal: numeric edge cases resolve to
//! sentinels (see [`crate::aggregate`]). The variants here cover the few
//! places where a caller hands us something we cannot act on.

use std::path::PathBuf;

/// Errors surfaced by the library and the `pulseboard` binary.
#[derive(Debug, thiserror::Error)]
pub enum PulseError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for [`crate::config::PulseConfig`].
    #[error("failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// A window length other than 7, 14 or 30 days was requested.
    #[error("unknown time window '{0}' (expected 7, 14 or 30)")]
    UnknownWindow(String),

    /// No conversation carries the requested id.
    #[error("no conversation with id '{0}'")]
    UnknownConversation(String),

    /// A view-local mutation addressed a row that does not exist.
    #[error("{what} index {index} out of range (len {len})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    /// A ticker was started outside of a tokio runtime.
    #[error("live ticker requires a running tokio runtime")]
    NoRuntime,

    #[error("failed to encode page as JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, PulseError>;

//! Error types for ninjadb

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using ninjadb's Error
pub type Result<T> = std::result::Result<T, Error>;

/// ninjadb error types
///
/// Only the variants raised by tool lookup and output writing abort a run.
/// Per-call executor failures are logged by the pipeline and never surface
/// here.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{tool} tool not found, please install the ninja build tool first")]
    ToolNotFound { tool: String },

    #[error("Failed to run `{tool} {args}`: {message}")]
    Subprocess {
        tool: String,
        args: String,
        message: String,
    },

    #[error("Failed to create temporary ninja file {path}: {source}")]
    NinjaFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write compilation database {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("Proxy command failed: {message}")]
    Proxy { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library. Every variant is fatal: the pipeline never
/// retries or resumes, it stops the run and reports.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Login failed with HTTP {status}")]
    Auth { status: StatusCode, body: String },

    #[error("Snapshot discovery failed with HTTP {status}")]
    Discovery { status: StatusCode, body: String },

    #[error("Chunk download failed with HTTP {status}")]
    Download { status: StatusCode, body: String },

    #[error("Malformed article record in {context}: {source}")]
    MalformedRecord {
        context: String,
        source: serde_json::Error,
    },

    #[error("Article record in {context} is missing required field '{field}'")]
    MissingField {
        context: String,
        field: &'static str,
    },
}

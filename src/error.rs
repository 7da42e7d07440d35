//! Crate-wide error type.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("session token malformed")]
    TokenMalformed,

    #[error("session token signature mismatch")]
    TokenSignature,

    #[error("session token expired")]
    TokenExpired,

    #[error("session revoked")]
    TokenRevoked,

    #[error("upload rejected: {0}")]
    Upload(String),

    #[error("no media supplied")]
    NoMedia,

    #[error("{command} not found on PATH")]
    CommandMissing { command: String },

    #[error("{command} exited with {status}: {stderr}")]
    CommandFailed { command: String, status: String, stderr: String },

    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

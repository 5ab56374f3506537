//! # CLI Error Type
//!
//! Everything a `kkb` command can fail with.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Error Flow in kkb                                  │
//! │                                                                         │
//! │  command ──► Result<(), CliError> ──► main                              │
//! │                     │                   │                               │
//! │     io / json / decode / url ───────────┤──► "Error: ..." on stderr     │
//! │     config ─────────────────────────────┘    exit 1 (config: exit 2)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use kkb_core::DecodeError;
use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid bill JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unreadable bill token: {0}")]
    Decode(#[from] DecodeError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Link has no '{param}' parameter")]
    MissingToken { param: &'static str },
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) => 2,
            _ => 1,
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;

//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

use slotbook_engine::{ConfigError, EngineError};
use slotbook_store::StoreError;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that can occur in the CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The engine refused or failed the request.
    #[error("{}", .0.user_message())]
    Engine(#[from] EngineError),

    /// The snapshot holds inconsistent data.
    #[error("invalid snapshot: {0}")]
    Store(#[from] StoreError),

    /// Reading or writing the snapshot file failed.
    #[error("snapshot {}: {source}", .path.display())]
    SnapshotIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The snapshot file is not valid JSON.
    #[error("snapshot {}: {source}", .path.display())]
    SnapshotFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Output could not be rendered.
    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),

    /// A referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

impl CliError {
    /// Process exit code: 2 for booking rejections, 1 for everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Engine(e) if e.is_rejection() => 2,
            _ => 1,
        }
    }
}

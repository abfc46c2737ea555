use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BertError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error at '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    StdIoError(#[from] std::io::Error),

    #[error(transparent)]
    JsonError(#[from] serde_json::Error),

    /// Neither PATH nor any backend package provides the command
    #[error("Command '{0}' not found and no package provides it")]
    CommandNotFound(String),

    /// The external package manager itself is not installed
    #[error("{backend} is not available: {hint}")]
    BackendUnavailable { backend: String, hint: String },

    #[error("Package manager error: {0}")]
    PackageManagerError(String),

    #[error("System command '{command}' failed: {reason}")]
    SystemCommandFailed { command: String, reason: String },

    #[error("Failed to write backup '{path}': {reason}")]
    BackupWriteFailed { path: PathBuf, reason: String },

    #[error("Failed to read backup '{path}': {reason}")]
    RestoreReadFailed { path: PathBuf, reason: String },

    #[error("Restore finished with {failed} of {total} item(s) failed")]
    PartialRestore { failed: usize, total: usize },

    /// Remote resource fetch error (HTTP, network, etc.)
    #[error("Failed to fetch remote resource: {0}")]
    RemoteFetchError(String),

    #[error("Lock acquisition failed: {0}")]
    LockError(String),

    #[error("Operation interrupted by user")]
    Interrupted,

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, BertError>;

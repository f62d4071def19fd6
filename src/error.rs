use std::path::PathBuf;
use std::time::Duration;

/// Errors surfaced by the harness
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid run options, detected before any container interaction
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// The Cypress tests did not finish within the configured maximum duration
    #[error("cypress tests did not finish within {0:?}")]
    Timeout(Duration),

    /// Report directory could not be read or cleaned
    #[error("failed to access report path {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A report file could not be deserialized
    #[error("failed to parse report file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The container runtime failed to start, stream output or stop
    #[error("container runtime error: {0}")]
    Runtime(anyhow::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

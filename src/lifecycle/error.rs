use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

pub type LifecycleResult<T> = Result<T, LifecycleError>;

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to start {path:?}: {source}")]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?} exited during startup with {status}")]
    ExitedImmediately { path: PathBuf, status: ExitStatus },
}

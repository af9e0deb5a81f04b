use std::path::PathBuf;

use thiserror::Error;
use tokio::task::JoinError;

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Failed to create output directory {}: {source}", path.display())]
    CreateOutputDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to open report for user {user_id} at {}: {source}", path.display())]
    OpenReport {
        user_id: u64,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write report for user {user_id} at {}: {source}", path.display())]
    WriteReport {
        user_id: u64,
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Worker pool size must be at least 1")]
    EmptyWorkerPool,
    #[error("Worker task failed: {0}")]
    WorkerPanicked(JoinError),
}

impl PipelineError {
    /// The user whose report could not be persisted, if any.
    pub fn user_id(&self) -> Option<u64> {
        match self {
            PipelineError::OpenReport { user_id, .. }
            | PipelineError::WriteReport { user_id, .. } => Some(*user_id),
            _ => None,
        }
    }
}

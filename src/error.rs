use crate::config::MAX_WORKERS;
use crate::report::WorkerFailure;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum XorsweepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed input: {0}")]
    MalformedInput(#[from] hex::FromHexError),

    #[error("Buffer length mismatch: {left} bytes vs {right} bytes")]
    LengthMismatch { left: usize, right: usize },

    #[error("Failed to split {}: {source}", path.display())]
    SplitIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid worker count: {0}. Must be between 1 and {max}", max = MAX_WORKERS)]
    InvalidWorkerCount(usize),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Cancelled")]
    Cancelled,

    #[error("All {} workers failed: {}", .0.len(), describe_failures(.0))]
    AllWorkersFailed(Vec<WorkerFailure>),
}

impl XorsweepError {
    pub(crate) fn split_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SplitIo {
            path: path.into(),
            source,
        }
    }
}

fn describe_failures(failures: &[WorkerFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("unit {} ({})", f.unit, f.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, XorsweepError>;

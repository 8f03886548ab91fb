//! Error taxonomy for one adapter invocation.

use std::path::PathBuf;

use thiserror::Error;

/// Every way a run can fail. Each variant maps to exit code 1 in the binary.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("cannot load circuit artifact {}: {reason}", .path.display())]
    ArtifactLoad { path: PathBuf, reason: String },

    #[error("{0}")]
    InputMapping(String),

    #[error("circuit initialization failed: {0}")]
    Initialization(String),

    #[error("circuit execution failed: {0}")]
    Execution(String),

    #[error("proof generation failed: {0}")]
    ProofGeneration(String),

    #[error("proof encoding failed: {0}")]
    Encoding(String),
}

impl AdapterError {
    pub(crate) fn artifact(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        Self::ArtifactLoad { path: path.into(), reason: reason.to_string() }
    }
}

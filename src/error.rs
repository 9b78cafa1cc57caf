use thiserror::Error;

/// Errors raised by the network, genome and evolution layers.
///
/// Terminal game outcomes (walls, self collision, win, timeout) are ordinary
/// statuses and never show up here.
#[derive(Error, Debug)]
pub enum SnakeError {
    #[error("Invalid input size: expected {expected}, got {actual}")]
    InvalidInputSize { expected: usize, actual: usize },

    #[error("Shape mismatch between genomes: {left:?} vs {right:?}")]
    ShapeMismatch {
        left: Vec<(usize, usize)>,
        right: Vec<(usize, usize)>,
    },

    #[error("Architecture mismatch: expected {expected}, found {found}")]
    ArchitectureMismatch { expected: String, found: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Worker pool error: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SnakeError>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictionError {
    #[error("Repository error: {0}")]
    Repository(String),

    #[error("Prediction not found: {0}")]
    NotFound(String),

    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

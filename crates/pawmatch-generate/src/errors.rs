use thiserror::Error;

/// Errors emitted by the generation engine.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid plan: {0}")]
    InvalidPlan(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid generator config: {0}")]
    InvalidConfig(String),
    #[error("structural error: {0}")]
    Structural(#[from] pawmatch_core::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

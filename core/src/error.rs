use thiserror::Error;

#[derive(Error, Debug)]
pub enum DunningError {
    #[error("Duplicate amount threshold: {threshold}")]
    DuplicateThreshold { threshold: f64 },

    #[error("Amount threshold must be non-negative, got {threshold}")]
    NegativeThreshold { threshold: f64 },

    #[error("Retry offset for attempt {attempt} must be at least 1 day")]
    InvalidRetryOffset { attempt: u32 },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type DunningResult<T> = Result<T, DunningError>;

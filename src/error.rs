#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Remote API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Record {id} references neither a symptom nor a medication")]
    MalformedRecord { id: i64 },

    #[error("Invalid recurrence interval: {interval}")]
    InvalidRecurrence { interval: i64 },

    #[error("Record not found: {0}")]
    NotFound(i64),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;

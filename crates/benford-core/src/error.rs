use thiserror::Error;

#[derive(Debug, Error)]
pub enum BenfordError {
    #[error("Empty sample: {0}")]
    EmptySample(String),

    #[error("Invalid digit: {digit} is outside the leading-digit range 1-9")]
    InvalidDigit { digit: u32 },

    #[error("Column not found: {0}")]
    ColumnNotFound(String),

    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for BenfordError {
    fn from(e: serde_json::Error) -> Self {
        BenfordError::SerializationError(e.to_string())
    }
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NormalizerError {
    #[error("Chat completion failed: {0}")]
    ChatCompletion(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Storage upsert failed after {attempts} attempts: {details}")]
    StorageRetriesExhausted { attempts: u32, details: String },

    #[error("Invalid batch size {0}: must be at least 1")]
    InvalidBatchSize(usize),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NormalizerError>;

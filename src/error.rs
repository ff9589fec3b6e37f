use thiserror::Error;

/// Main error type for msgflow operations
#[derive(Error, Debug)]
pub enum MsgflowError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Type not found: {0}")]
    TypeNotFound(String),

    #[error("Extraction task failed: {0}")]
    Task(String),
}

pub type Result<T> = std::result::Result<T, MsgflowError>;

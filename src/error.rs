use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProjboardError>;

#[derive(Debug, Error)]
pub enum ProjboardError {
    #[error("Template not found: {0}")]
    MissingTemplate(String),

    #[error("Element not found: {0}")]
    MissingElement(String),

    #[error("Invalid project ID format: {0}")]
    InvalidProjectId(String),

    #[error("Invalid project status: {0}")]
    InvalidStatus(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

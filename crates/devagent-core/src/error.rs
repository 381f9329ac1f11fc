use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DevAgentError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Persistence error: {path}: {message}")]
    Persistence { path: String, message: String },

    #[error("Ingestion error: {path}: {message}")]
    Ingestion { path: String, message: String },

    #[error("Completion error: {0}")]
    Completion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DevAgentError {
    pub fn persistence(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Persistence {
            path: path.as_ref().display().to_string(),
            message: message.into(),
        }
    }

    pub fn ingestion(path: impl AsRef<Path>, message: impl Into<String>) -> Self {
        Self::Ingestion {
            path: path.as_ref().display().to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DevAgentError>;

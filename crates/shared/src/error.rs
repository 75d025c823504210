//! Error types for akbo

use akbo_domain::DomainError;
use thiserror::Error;

/// Error raised when a task alias is not defined
#[derive(Debug, Error)]
#[error("Task '{alias}' not found. Available tasks: {}", available.join(", "))]
pub struct TaskNotFoundError {
    pub alias: String,
    pub available: Vec<String>,
}

/// General akbo error type
#[derive(Debug, Error)]
pub enum AkboError {
    #[error(transparent)]
    TaskNotFound(#[from] TaskNotFoundError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to launch '{program}': {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, AkboError>;

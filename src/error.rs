use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Store request failed: {0}")]
    Store(String),

    #[error("Invalid reporting period: {0}")]
    InvalidPeriod(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[cfg(feature = "remote")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DashboardError>;

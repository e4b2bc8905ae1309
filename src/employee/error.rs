use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmployeeError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    BadStatus { status: u16, url: String },

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Unexpected JSON structure: {0}")]
    UnexpectedShape(String),

    #[error("Data source not configured: {0}")]
    NotConfigured(String),
}

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Could not build message: {0}")]
    MessageError(String),

    #[error("AWS SDK error: {0}")]
    AwsError(String),
}

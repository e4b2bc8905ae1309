use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhotoError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status} from {url}")]
    BadStatus { status: u16, url: String },

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Background removal failed: {0}")]
    BackgroundRemoval(String),

    #[error("Face detection failed: {0}")]
    FaceDetection(String),

    #[error("Invalid target size {width}x{height}")]
    InvalidTargetSize { width: u32, height: u32 },
}

use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a single poster. Photo, font and face-detection
/// problems never show up here; they are absorbed where they happen.
#[derive(Debug, Error)]
pub enum PosterError {
    #[error("Template {path:?} could not be loaded: {source}")]
    TemplateError {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    #[error("Font error: {0}")]
    FontError(String),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),
}

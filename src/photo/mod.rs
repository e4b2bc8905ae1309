// Photo preparation - download, background removal and face-aware cropping
mod background;
mod crop;
mod error;
mod face;
mod fetch;

pub use background::{
    BackgroundRemover, HttpBackgroundRemover, NoBackgroundRemoval, RetryPolicy,
    prepare_birthday_photo,
};
pub use crop::{
    cover_dimensions, crop_origin, fallback_anchor, prepare_anniversary_photo,
};
pub use error::PhotoError;
pub use face::{FaceBox, FaceDetector, NoFaceDetection};
pub use fetch::{DOWNLOAD_TIMEOUT, HttpPhotoFetcher, PhotoFetcher};

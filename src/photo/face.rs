use image::RgbImage;

use super::PhotoError;

/// Bounding box of a detected face, relative to the image (0..1 on each axis).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceBox {
    pub xmin: f32,
    pub ymin: f32,
    pub width: f32,
    pub height: f32,
}

impl FaceBox {
    /// Center of the box in pixel coordinates of an image of the given size.
    pub fn center_in(&self, width: u32, height: u32) -> (i64, i64) {
        let cx = (self.xmin + self.width / 2.0) * width as f32;
        let cy = (self.ymin + self.height / 2.0) * height as f32;
        (cx.floor() as i64, cy.floor() as i64)
    }
}

/// Pluggable face detection backend.
///
/// `None` means no face was found or the capability is not available;
/// `Some(Err(_))` is a detector failure. Callers treat both the same way and
/// fall back to a fixed anchor.
pub trait FaceDetector: Send + Sync {
    fn detect(&self, image: &RgbImage) -> Option<Result<FaceBox, PhotoError>>;

    fn name(&self) -> &str;
}

/// Used when no face detector is installed.
pub struct NoFaceDetection;

impl FaceDetector for NoFaceDetection {
    fn detect(&self, _image: &RgbImage) -> Option<Result<FaceBox, PhotoError>> {
        None
    }

    fn name(&self) -> &str {
        "No face detection"
    }
}

//! Face-aware cover crop for anniversary photos.

use image::{DynamicImage, GenericImageView, RgbaImage, imageops::FilterType};
use tracing::debug;

use super::{FaceDetector, PhotoError};

/// Vertical position of the fallback anchor, as a fraction of the height.
const FALLBACK_ANCHOR_Y: f64 = 0.35;

/// Longest side of the image handed to the face detector.
const DETECTION_MAX_SIDE: u32 = 1024;

/// Dimensions that fully cover `target` while keeping the `source` aspect ratio.
///
/// One side matches the target exactly, the other is at least as large.
pub fn cover_dimensions(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = source;
    let (tgt_w, tgt_h) = target;

    let scale = (tgt_w as f64 / src_w as f64).max(tgt_h as f64 / src_h as f64);
    let width = ((src_w as f64 * scale).round() as u32).max(tgt_w);
    let height = ((src_h as f64 * scale).round() as u32).max(tgt_h);
    (width, height)
}

/// Anchor used when no face is available: horizontal center, 35% from the top.
pub fn fallback_anchor(width: u32, height: u32) -> (i64, i64) {
    (
        (width / 2) as i64,
        (height as f64 * FALLBACK_ANCHOR_Y).floor() as i64,
    )
}

/// Top-left corner of the crop for the given anchor.
///
/// The anchor is centered horizontally and sits a third of the way down the
/// crop vertically; the result is clamped so the crop stays inside `resized`.
pub fn crop_origin(anchor: (i64, i64), resized: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (anchor_x, anchor_y) = anchor;
    let max_left = (resized.0 as i64 - target.0 as i64).max(0);
    let max_top = (resized.1 as i64 - target.1 as i64).max(0);

    let left = (anchor_x - (target.0 / 2) as i64).min(max_left).max(0);
    let top = (anchor_y - (target.1 / 3) as i64).min(max_top).max(0);
    (left as u32, top as u32)
}

/// Cover-crop a photo to exactly `target_w` x `target_h`, biased toward a face.
pub fn prepare_anniversary_photo(
    bytes: &[u8],
    target_w: u32,
    target_h: u32,
    detector: &dyn FaceDetector,
) -> Result<RgbaImage, PhotoError> {
    if target_w == 0 || target_h == 0 {
        return Err(PhotoError::InvalidTargetSize {
            width: target_w,
            height: target_h,
        });
    }

    let source = image::load_from_memory(bytes)?;
    Ok(cover_crop(&source, target_w, target_h, detector))
}

pub(crate) fn cover_crop(
    source: &DynamicImage,
    target_w: u32,
    target_h: u32,
    detector: &dyn FaceDetector,
) -> RgbaImage {
    let (src_w, src_h) = source.dimensions();
    let (resized_w, resized_h) = cover_dimensions((src_w, src_h), (target_w, target_h));

    let anchor = face_anchor(source, (resized_w, resized_h), detector)
        .unwrap_or_else(|| fallback_anchor(resized_w, resized_h));
    let (left, top) = crop_origin(anchor, (resized_w, resized_h), (target_w, target_h));
    debug!(
        "Cover crop {}x{} -> {}x{} at ({}, {})",
        resized_w, resized_h, target_w, target_h, left, top
    );

    // Only the visible region is resampled; the full cover size is never allocated
    let scale_x = resized_w as f64 / src_w as f64;
    let scale_y = resized_h as f64 / src_h as f64;
    let crop_x = ((left as f64 / scale_x).floor() as u32).min(src_w - 1);
    let crop_y = ((top as f64 / scale_y).floor() as u32).min(src_h - 1);
    let crop_w = ((target_w as f64 / scale_x).round() as u32).clamp(1, src_w - crop_x);
    let crop_h = ((target_h as f64 / scale_y).round() as u32).clamp(1, src_h - crop_y);

    source
        .crop_imm(crop_x, crop_y, crop_w, crop_h)
        .resize_exact(target_w, target_h, FilterType::Lanczos3)
        .to_rgba8()
}

/// Face center in cover-size pixels. The detector sees a copy of the source
/// bounded to `DETECTION_MAX_SIDE`; its box is relative, so any scale works.
fn face_anchor(
    source: &DynamicImage,
    resized: (u32, u32),
    detector: &dyn FaceDetector,
) -> Option<(i64, i64)> {
    let (width, height) = source.dimensions();
    let input = if width.max(height) > DETECTION_MAX_SIDE {
        source
            .resize(DETECTION_MAX_SIDE, DETECTION_MAX_SIDE, FilterType::Triangle)
            .to_rgb8()
    } else {
        source.to_rgb8()
    };

    match detector.detect(&input) {
        Some(Ok(face)) => Some(face.center_in(resized.0, resized.1)),
        Some(Err(e)) => {
            debug!("Face detection via {} failed: {}", detector.name(), e);
            None
        }
        None => None,
    }
}

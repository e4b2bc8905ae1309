use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, Rgb, RgbImage, RgbaImage};

use super::PosterError;

/// Encode a poster as an opaque RGB PNG.
///
/// Alpha is dropped and the encoder settings are fixed, so identical pixels
/// always produce identical bytes.
pub fn poster_to_bytes(image: &RgbaImage) -> Result<Vec<u8>, PosterError> {
    let rgb = RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let pixel = image.get_pixel(x, y);
        Rgb([pixel[0], pixel[1], pixel[2]])
    });

    let mut buffer = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut buffer, CompressionType::Default, FilterType::Adaptive);
    DynamicImage::ImageRgb8(rgb).write_with_encoder(encoder)?;
    Ok(buffer)
}

use crate::poster::poster_to_bytes;
use image::{ColorType, GenericImageView, ImageFormat, Rgba, RgbaImage};

fn gradient(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x * 7 % 256) as u8, (y * 5 % 256) as u8, 128, (x + y) as u8])
    })
}

#[test]
fn test_png_is_opaque_rgb() {
    let bytes = poster_to_bytes(&gradient(64, 48)).unwrap();

    assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!(decoded.color(), ColorType::Rgb8);
    assert_eq!(decoded.dimensions(), (64, 48));
}

#[test]
fn test_alpha_dropped_color_kept() {
    let image = RgbaImage::from_pixel(4, 4, Rgba([10, 20, 30, 0]));
    let bytes = poster_to_bytes(&image).unwrap();

    let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
    assert_eq!(decoded.get_pixel(2, 2).0, [10, 20, 30]);
}

#[test]
fn test_encoding_is_deterministic() {
    let image = gradient(120, 90);
    let first = poster_to_bytes(&image).unwrap();
    let second = poster_to_bytes(&image).unwrap();
    assert_eq!(first, second);
}

//! Payload decoding and input normalization

use base64::{engine::general_purpose::STANDARD, Engine};
use image::imageops::FilterType;
use image::RgbImage;
use ndarray::Array4;

use crate::DetectionError;

/// Decode a base64 payload (with optional `data:...;base64,` prefix) into
/// an RGB image.
pub fn decode_payload(payload: &str) -> Result<RgbImage, DetectionError> {
    let encoded = match payload.split_once(',') {
        Some((_, rest)) => rest,
        None => payload,
    };

    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|err| DetectionError::BadEncoding(err.to_string()))?;

    let image = image::load_from_memory(&bytes)
        .map_err(|err| DetectionError::UnsupportedImage(err.to_string()))?;

    Ok(image.to_rgb8())
}

/// Resize to the model input resolution and wrap as a single-image NHWC
/// batch of raw bytes.
pub fn to_input_batch(image: &RgbImage, width: u32, height: u32) -> Array4<u8> {
    let resized = if image.dimensions() == (width, height) {
        image.clone()
    } else {
        image::imageops::resize(image, width, height, FilterType::Triangle)
    };

    let mut batch = Array4::<u8>::zeros((1, height as usize, width as usize, 3));
    for (x, y, pixel) in resized.enumerate_pixels() {
        batch[[0, y as usize, x as usize, 0]] = pixel[0];
        batch[[0, y as usize, x as usize, 1]] = pixel[1];
        batch[[0, y as usize, x as usize, 2]] = pixel[2];
    }
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;
    use std::io::Cursor;

    fn png_base64(width: u32, height: u32) -> String {
        let image = RgbImage::from_pixel(width, height, Rgb([200, 100, 50]));
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        STANDARD.encode(bytes)
    }

    #[test]
    fn rejects_non_base64_payload() {
        let err = decode_payload("definitely not base64!!!").unwrap_err();
        assert!(matches!(err, DetectionError::BadEncoding(_)));
    }

    #[test]
    fn rejects_non_image_bytes() {
        let payload = STANDARD.encode(b"plain text, not an image");
        let err = decode_payload(&payload).unwrap_err();
        assert!(matches!(err, DetectionError::UnsupportedImage(_)));
    }

    #[test]
    fn strips_data_url_prefix() {
        let payload = format!("data:image/png;base64,{}", png_base64(6, 4));
        let image = decode_payload(&payload).unwrap();
        assert_eq!(image.dimensions(), (6, 4));
    }

    #[test]
    fn accepts_bare_base64() {
        let image = decode_payload(&png_base64(6, 4)).unwrap();
        assert_eq!(image.dimensions(), (6, 4));
    }

    #[test]
    fn input_batch_has_model_shape() {
        let image = RgbImage::from_pixel(6, 4, Rgb([9, 8, 7]));
        let batch = to_input_batch(&image, 640, 480);
        assert_eq!(batch.shape(), &[1, 480, 640, 3]);
    }

    #[test]
    fn input_batch_keeps_channel_order() {
        let image = RgbImage::from_pixel(640, 480, Rgb([11, 22, 33]));
        let batch = to_input_batch(&image, 640, 480);
        assert_eq!(batch[[0, 0, 0, 0]], 11);
        assert_eq!(batch[[0, 0, 0, 1]], 22);
        assert_eq!(batch[[0, 0, 0, 2]], 33);
    }
}

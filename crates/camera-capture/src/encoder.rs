//! MJPEG stream encoding
//!
//! Leaf pieces of the video feed: status annotation, JPEG compression,
//! and multipart segment framing. The pacing loop that strings segments
//! together lives at the HTTP boundary.

use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

use crate::CameraError;

/// Multipart boundary token shared with the HTTP content type
pub const STREAM_BOUNDARY: &str = "frame";

/// JPEG quality for streamed frames
const JPEG_QUALITY: u8 = 80;

const BANNER_HEIGHT: u32 = 24;

/// Draw the fixed monitoring-active banner onto a frame copy.
///
/// Frames smaller than the banner are left untouched.
pub fn annotate_status(image: &mut RgbImage) {
    let (width, height) = image.dimensions();
    if width < 2 * BANNER_HEIGHT || height < 2 * BANNER_HEIGHT {
        return;
    }

    draw_filled_rect_mut(
        image,
        Rect::at(0, 0).of_size(width, BANNER_HEIGHT),
        Rgb([24, 24, 24]),
    );
    // Green "detection active" indicator inside the banner.
    draw_filled_rect_mut(image, Rect::at(6, 6).of_size(12, 12), Rgb([0, 255, 0]));
}

/// Compress a frame to JPEG bytes
pub fn encode_jpeg(image: &RgbImage) -> Result<Vec<u8>, CameraError> {
    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
    image
        .write_with_encoder(encoder)
        .map_err(|err| CameraError::Encode(err.to_string()))?;
    Ok(buffer)
}

/// Frame one self-delimited multipart segment around encoded JPEG bytes
pub fn multipart_chunk(jpeg: &[u8]) -> Vec<u8> {
    let header = format!(
        "--{}\r\nContent-Type: image/jpeg\r\n\r\n",
        STREAM_BOUNDARY
    );
    let mut chunk = Vec::with_capacity(header.len() + jpeg.len() + 2);
    chunk.extend_from_slice(header.as_bytes());
    chunk.extend_from_slice(jpeg);
    chunk.extend_from_slice(b"\r\n");
    chunk
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn annotation_preserves_dimensions() {
        let mut image = RgbImage::new(640, 480);
        annotate_status(&mut image);
        assert_eq!(image.dimensions(), (640, 480));
        // Indicator pixel inside the banner is green.
        assert_eq!(image.get_pixel(10, 10), &Rgb([0, 255, 0]));
    }

    #[test]
    fn annotation_skips_tiny_frames() {
        let mut image = RgbImage::new(8, 8);
        let before = image.clone();
        annotate_status(&mut image);
        assert_eq!(image, before);
    }

    #[test]
    fn jpeg_encoding_emits_jpeg_magic() {
        let image = RgbImage::from_pixel(64, 48, Rgb([120, 80, 40]));
        let jpeg = encode_jpeg(&image).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn multipart_segment_is_self_delimited() {
        let body = b"jpegbytes";
        let chunk = multipart_chunk(body);

        let text = String::from_utf8_lossy(&chunk[..chunk.len() - body.len() - 2]);
        assert!(text.starts_with("--frame\r\n"));
        assert!(text.contains("Content-Type: image/jpeg\r\n\r\n"));
        assert!(chunk.ends_with(b"jpegbytes\r\n"));
    }
}

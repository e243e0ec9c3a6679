//! Video frame type

use image::RgbImage;

/// Decoded RGB video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3)
    pub data: Vec<u8>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Capture timestamp (milliseconds since epoch)
    pub timestamp_ms: i64,
    /// Frame sequence number
    pub sequence: u64,
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp_ms: i64, sequence: u64) -> Self {
        debug_assert_eq!(data.len(), (width * height * 3) as usize);
        Self {
            data,
            width,
            height,
            timestamp_ms,
            sequence,
        }
    }

    /// Get pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        Some([self.data[idx], self.data[idx + 1], self.data[idx + 2]])
    }

    /// View the frame as an owned `RgbImage` for annotation and encoding.
    ///
    /// Returns `None` if the buffer length does not match the dimensions.
    pub fn to_image(&self) -> Option<RgbImage> {
        RgbImage::from_raw(self.width, self.height, self.data.clone())
    }

    /// Build a frame from an `RgbImage`
    pub fn from_image(image: RgbImage, timestamp_ms: i64, sequence: u64) -> Self {
        let width = image.width();
        let height = image.height();
        Self {
            data: image.into_raw(),
            width,
            height,
            timestamp_ms,
            sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn solid_frame(w: u32, h: u32, rgb: [u8; 3]) -> VideoFrame {
        let data: Vec<u8> = rgb
            .iter()
            .copied()
            .cycle()
            .take((w * h * 3) as usize)
            .collect();
        VideoFrame::new(data, w, h, 0, 0)
    }

    #[test]
    fn pixel_access_in_bounds() {
        let frame = solid_frame(4, 3, [10, 20, 30]);
        assert_eq!(frame.get_pixel(0, 0), Some([10, 20, 30]));
        assert_eq!(frame.get_pixel(3, 2), Some([10, 20, 30]));
        assert_eq!(frame.get_pixel(4, 0), None);
        assert_eq!(frame.get_pixel(0, 3), None);
    }

    #[test]
    fn image_round_trip_preserves_dimensions() {
        let frame = solid_frame(8, 6, [1, 2, 3]);
        let image = frame.to_image().unwrap();
        let back = VideoFrame::from_image(image, frame.timestamp_ms, frame.sequence);
        assert_eq!(back.width, 8);
        assert_eq!(back.height, 6);
        assert_eq!(back.data, frame.data);
    }

    proptest! {
        #[test]
        fn get_pixel_matches_raw_layout(
            w in 1u32..32,
            h in 1u32..32,
            x in 0u32..32,
            y in 0u32..32,
        ) {
            let data: Vec<u8> = (0..(w * h * 3)).map(|i| (i % 251) as u8).collect();
            let frame = VideoFrame::new(data.clone(), w, h, 0, 0);
            match frame.get_pixel(x, y) {
                Some(px) => {
                    prop_assert!(x < w && y < h);
                    let idx = ((y * w + x) * 3) as usize;
                    prop_assert_eq!(px, [data[idx], data[idx + 1], data[idx + 2]]);
                }
                None => prop_assert!(x >= w || y >= h),
            }
        }
    }
}

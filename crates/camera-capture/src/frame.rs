//! Video frame types and processing

use crate::CameraError;
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
    /// Capture timestamp (nanoseconds)
    pub timestamp_ns: u64,
    /// Frame sequence number
    pub sequence: u64,
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data
    pub fn new(data: Vec<u8>, width: u32, height: u32, timestamp_ns: u64, sequence: u64) -> Self {
        Self {
            data,
            width,
            height,
            timestamp_ns,
            sequence,
        }
    }

    /// Black frame of the given size
    pub fn blank(width: u32, height: u32, timestamp_ns: u64, sequence: u64) -> Self {
        Self::new(
            vec![0; (width * height * 3) as usize],
            width,
            height,
            timestamp_ns,
            sequence,
        )
    }

    /// Get pixel at (x, y)
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y * self.width + x) * 3) as usize;
        self.data
            .get(idx..idx + 3)
            .map(|p| [p[0], p[1], p[2]])
    }

    /// Mirror the frame horizontally (selfie view)
    pub fn flip_horizontal(&self) -> VideoFrame {
        let row_len = (self.width * 3) as usize;
        let mut flipped = Vec::with_capacity(self.data.len());

        for row in self.data.chunks(row_len) {
            for pixel in row.chunks(3).rev() {
                flipped.extend_from_slice(pixel);
            }
        }

        VideoFrame {
            data: flipped,
            width: self.width,
            height: self.height,
            timestamp_ns: self.timestamp_ns,
            sequence: self.sequence,
        }
    }

    /// Copy into an `image` buffer for drawing
    pub fn to_rgb_image(&self) -> Result<RgbImage, CameraError> {
        RgbImage::from_raw(self.width, self.height, self.data.clone()).ok_or_else(|| {
            CameraError::Format(format!(
                "{} bytes do not fit a {}x{} RGB frame",
                self.data.len(),
                self.width,
                self.height
            ))
        })
    }

    /// Rebuild a frame from an `image` buffer, keeping this frame's metadata
    pub fn with_image(&self, image: RgbImage) -> VideoFrame {
        VideoFrame {
            width: image.width(),
            height: image.height(),
            data: image.into_raw(),
            timestamp_ns: self.timestamp_ns,
            sequence: self.sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_one() -> VideoFrame {
        VideoFrame::new(vec![1, 2, 3, 4, 5, 6], 2, 1, 10, 7)
    }

    #[test]
    fn test_get_pixel_bounds() {
        let frame = two_by_one();
        assert_eq!(frame.get_pixel(1, 0), Some([4, 5, 6]));
        assert_eq!(frame.get_pixel(2, 0), None);
        assert_eq!(frame.get_pixel(0, 1), None);
    }

    #[test]
    fn test_flip_horizontal_mirrors_rows() {
        let flipped = two_by_one().flip_horizontal();
        assert_eq!(flipped.data, vec![4, 5, 6, 1, 2, 3]);
        assert_eq!(flipped.sequence, 7);
        assert_eq!(flipped.timestamp_ns, 10);
    }

    #[test]
    fn test_image_interop_keeps_metadata() {
        let frame = two_by_one();
        let image = frame.to_rgb_image().unwrap();
        let back = frame.with_image(image);
        assert_eq!(back.data, frame.data);
        assert_eq!(back.sequence, 7);
    }

    #[test]
    fn test_to_rgb_image_rejects_short_buffer() {
        let frame = VideoFrame::new(vec![0; 5], 2, 1, 0, 0);
        assert!(matches!(frame.to_rgb_image(), Err(CameraError::Format(_))));
    }
}

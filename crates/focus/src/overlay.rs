//! Overlay rendering
//!
//! Draws the landmark mesh points and a colour marker at each label anchor.
//! Label text itself is left to the shell, which receives the same anchors
//! through `FrameAnnotation::texts`.

use camera_capture::VideoFrame;
use image::Rgb;
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut};
use imageproc::rect::Rect;
use crate::analysis::FrameAnnotation;
use crate::FocusError;

const MESH_COLOR: Rgb<u8> = Rgb([200, 200, 200]);
const MARKER_SIZE: u32 = 12;

/// Render `annotation` onto a copy of `frame`
pub fn render(frame: &VideoFrame, annotation: &FrameAnnotation) -> Result<VideoFrame, FocusError> {
    if annotation.tags.is_empty() && annotation.landmarks.is_empty() {
        return Ok(frame.clone());
    }

    let mut image = frame
        .to_rgb_image()
        .map_err(|e| FocusError::ImageProcessing(e.to_string()))?;
    let (width, height) = (frame.width as f32, frame.height as f32);

    for point in &annotation.landmarks {
        let center = ((point.x * width) as i32, (point.y * height) as i32);
        draw_filled_circle_mut(&mut image, center, 1, MESH_COLOR);
    }

    for tag in &annotation.tags {
        let (x, y) = tag.anchor();
        let marker = Rect::at(x, y - MARKER_SIZE as i32).of_size(MARKER_SIZE, MARKER_SIZE);
        draw_filled_rect_mut(&mut image, marker, Rgb(tag.color()));
    }

    Ok(frame.with_image(image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::FocusTag;
    use crate::landmarks::Point;

    #[test]
    fn test_marker_drawn_at_anchor() {
        let frame = VideoFrame::blank(160, 160, 0, 3);
        let annotation = FrameAnnotation {
            tags: vec![FocusTag::Focusing],
            landmarks: Vec::new(),
        };

        let rendered = render(&frame, &annotation).unwrap();
        // Marker spans y in [108, 120) just above the FOCUSING baseline
        assert_eq!(rendered.get_pixel(12, 115), Some([0, 255, 0]));
        assert_eq!(rendered.get_pixel(100, 100), Some([0, 0, 0]));
        assert_eq!(rendered.sequence, 3);
    }

    #[test]
    fn test_landmarks_drawn() {
        let frame = VideoFrame::blank(100, 100, 0, 0);
        let annotation = FrameAnnotation {
            tags: Vec::new(),
            landmarks: vec![Point::new(0.5, 0.5)],
        };

        let rendered = render(&frame, &annotation).unwrap();
        assert_eq!(rendered.get_pixel(50, 50), Some([200, 200, 200]));
    }

    #[test]
    fn test_empty_annotation_is_passthrough() {
        let frame = VideoFrame::blank(4, 4, 0, 0);
        let rendered = render(&frame, &FrameAnnotation::default()).unwrap();
        assert_eq!(rendered.data, frame.data);
    }
}

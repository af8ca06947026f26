//! Geometry metrics computed from face landmarks

use crate::landmarks::{EyeContour, LandmarkSet};

/// Eye aspect ratio: mean vertical opening over horizontal width.
///
/// Low values mean closed or nearly closed eyes. A degenerate contour with
/// zero width yields 0.0.
pub fn eye_aspect_ratio(landmarks: &LandmarkSet, eye: &EyeContour) -> f32 {
    let (left, right) = eye.corners();
    let horizontal = landmarks.point(left).distance(&landmarks.point(right));
    if horizontal <= f32::EPSILON {
        return 0.0;
    }

    let vertical: f32 = eye
        .vertical_pairs()
        .iter()
        .map(|&(upper, lower)| landmarks.point(upper).distance(&landmarks.point(lower)))
        .sum();

    vertical / (2.0 * horizontal)
}

/// Distance between the two lip landmarks, used as a yawn proxy
pub fn mouth_aperture(landmarks: &LandmarkSet, top: usize, bottom: usize) -> f32 {
    landmarks.point(top).distance(&landmarks.point(bottom))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{Point, LEFT_EYE, MOUTH_BOTTOM, MOUTH_TOP, REQUIRED_LANDMARKS};

    fn set_with(points: &[(usize, Point)]) -> LandmarkSet {
        let mut all = vec![Point::new(0.5, 0.5); REQUIRED_LANDMARKS];
        for &(index, point) in points {
            all[index] = point;
        }
        LandmarkSet::new(all).unwrap()
    }

    #[test]
    fn test_ear_fixture() {
        // Corners 0.2 apart, vertical pairs 0.06 and 0.04 apart:
        // (0.06 + 0.04) / (2 * 0.2) = 0.25
        let landmarks = set_with(&[
            (33, Point::new(0.30, 0.40)),
            (133, Point::new(0.50, 0.40)),
            (160, Point::new(0.36, 0.37)),
            (144, Point::new(0.36, 0.43)),
            (158, Point::new(0.44, 0.38)),
            (153, Point::new(0.44, 0.42)),
        ]);

        let ear = eye_aspect_ratio(&landmarks, &LEFT_EYE);
        assert!((ear - 0.25).abs() < 1e-5, "ear = {ear}");
        assert_eq!(ear, eye_aspect_ratio(&landmarks, &LEFT_EYE));
    }

    #[test]
    fn test_ear_degenerate_width() {
        let landmarks = set_with(&[]);
        assert_eq!(eye_aspect_ratio(&landmarks, &LEFT_EYE), 0.0);
    }

    #[test]
    fn test_mouth_aperture_fixture() {
        let landmarks = set_with(&[
            (MOUTH_TOP, Point::new(0.50, 0.70)),
            (MOUTH_BOTTOM, Point::new(0.53, 0.74)),
        ]);
        let aperture = mouth_aperture(&landmarks, MOUTH_TOP, MOUTH_BOTTOM);
        assert!((aperture - 0.05).abs() < 1e-5, "aperture = {aperture}");
    }
}

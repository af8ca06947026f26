//! Synthetic landmark sets with chosen geometry.
//!
//! Used by tests across the workspace and handy for producing demo traces.

use crate::landmarks::{
    EyeContour, LandmarkSet, Point, LEFT_EYE, MOUTH_BOTTOM, MOUTH_TOP, NOSE_TIP, RIGHT_EYE,
};

/// Face mesh size with iris refinement
pub const MESH_SIZE: usize = 478;

const EYE_WIDTH: f32 = 0.1;

/// Geometry a synthetic face is built to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceGeometry {
    /// EAR of both eyes
    pub ear: f32,
    /// Nose tip position
    pub nose: Point,
    /// Distance between the lip landmarks
    pub mouth: f32,
}

impl Default for FaceGeometry {
    /// An attentive face: eyes open, facing the screen, mouth closed
    fn default() -> Self {
        Self {
            ear: 0.35,
            nose: Point::new(0.5, 0.5),
            mouth: 0.01,
        }
    }
}

impl FaceGeometry {
    pub fn with_ear(mut self, ear: f32) -> Self {
        self.ear = ear;
        self
    }

    pub fn with_nose(mut self, x: f32, y: f32) -> Self {
        self.nose = Point::new(x, y);
        self
    }

    pub fn with_mouth(mut self, mouth: f32) -> Self {
        self.mouth = mouth;
        self
    }

    /// Build the landmark set
    pub fn build(&self) -> LandmarkSet {
        let mut points = vec![Point::new(0.5, 0.5); MESH_SIZE];

        place_eye(&mut points, &LEFT_EYE, Point::new(0.4, 0.4), self.ear);
        place_eye(&mut points, &RIGHT_EYE, Point::new(0.6, 0.4), self.ear);

        points[NOSE_TIP] = self.nose;
        points[MOUTH_TOP] = Point::new(0.5, 0.7);
        points[MOUTH_BOTTOM] = Point::new(0.5, 0.7 + self.mouth);

        // MESH_SIZE covers every index the scorer reads
        match LandmarkSet::new(points) {
            Ok(set) => set,
            Err(e) => unreachable!("synthetic mesh too small: {e}"),
        }
    }
}

fn place_eye(points: &mut [Point], eye: &EyeContour, center: Point, ear: f32) {
    let half_width = EYE_WIDTH / 2.0;
    let half_height = ear * EYE_WIDTH / 2.0;

    let (left, right) = eye.corners();
    points[left] = Point::new(center.x - half_width, center.y);
    points[right] = Point::new(center.x + half_width, center.y);

    let offsets = [-EYE_WIDTH / 6.0, EYE_WIDTH / 6.0];
    for (&(upper, lower), dx) in eye.vertical_pairs().iter().zip(offsets) {
        points[upper] = Point::new(center.x + dx, center.y - half_height);
        points[lower] = Point::new(center.x + dx, center.y + half_height);
    }
}

//! Face landmark data model
//!
//! Indices follow the MediaPipe face-mesh numbering (468 points, 478 with
//! iris refinement). Coordinates are normalized to the frame: x and y in
//! [0, 1], origin at the top-left corner.

use serde::{Deserialize, Serialize};
use crate::FocusError;

/// Nose tip, used as a coarse head-pose proxy
pub const NOSE_TIP: usize = 1;

/// Inner upper lip
pub const MOUTH_TOP: usize = 13;

/// Inner lower lip
pub const MOUTH_BOTTOM: usize = 14;

/// Left eye contour
pub const LEFT_EYE: EyeContour = EyeContour::new([33, 160, 158, 133, 153, 144]);

/// Right eye contour
pub const RIGHT_EYE: EyeContour = EyeContour::new([362, 385, 387, 263, 373, 380]);

/// Smallest landmark set that contains every index read by the scorer
pub const REQUIRED_LANDMARKS: usize = 388;

/// Normalized 2D point
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance
    pub fn distance(&self, other: &Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

/// Six landmark indices outlining one eye.
///
/// Order: `[corner, upper_a, upper_b, corner, lower_b, lower_a]`, so that
/// `upper_a`/`lower_a` and `upper_b`/`lower_b` are vertical pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyeContour {
    indices: [usize; 6],
}

impl EyeContour {
    pub const fn new(indices: [usize; 6]) -> Self {
        Self { indices }
    }

    pub fn corners(&self) -> (usize, usize) {
        (self.indices[0], self.indices[3])
    }

    /// Vertical pairs as (upper, lower)
    pub fn vertical_pairs(&self) -> [(usize, usize); 2] {
        [
            (self.indices[1], self.indices[5]),
            (self.indices[2], self.indices[4]),
        ]
    }

    pub fn indices(&self) -> &[usize; 6] {
        &self.indices
    }
}

/// Landmarks of a single face for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkSet {
    points: Vec<Point>,
}

impl LandmarkSet {
    /// Wrap extractor output, rejecting sets too short for the scorer
    pub fn new(points: Vec<Point>) -> Result<Self, FocusError> {
        if points.len() < REQUIRED_LANDMARKS {
            return Err(FocusError::InsufficientLandmarks {
                required: REQUIRED_LANDMARKS,
                found: points.len(),
            });
        }
        Ok(Self { points })
    }

    /// Point at `index`.
    ///
    /// Panics when `index` is out of range: callers only use the documented
    /// indices, which `new` guarantees are present.
    pub fn point(&self, index: usize) -> Point {
        self.points[index]
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn nose_tip(&self) -> Point {
        self.point(NOSE_TIP)
    }
}

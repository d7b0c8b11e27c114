//! Hand landmark types.
//!
//! One detected hand arrives as 21 tracked points in the MediaPipe hand
//! topology, with coordinates normalized to [0,1] relative to the detector's
//! input frame.

use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};

/// Number of landmarks in one hand skeleton.
pub const LANDMARK_COUNT: usize = 21;

/// Landmark indices in the MediaPipe hand topology.
///
/// Only the indices the engine actually reads are named here.
pub mod index {
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_FINGER_PIP: usize = 6;
    pub const INDEX_FINGER_TIP: usize = 8;
    pub const MIDDLE_FINGER_MCP: usize = 9;
    pub const MIDDLE_FINGER_TIP: usize = 12;
    pub const RING_FINGER_PIP: usize = 14;
    pub const RING_FINGER_TIP: usize = 16;
}

/// One tracked anatomical point, normalized to [0,1].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Euclidean distance to another landmark in the normalized plane.
    /// Depth is ignored; the detector's z scale is not comparable to x/y.
    pub fn planar_distance(&self, other: &Landmark) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// The 21-point skeleton of one detected hand for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    points: [Landmark; LANDMARK_COUNT],
}

impl LandmarkFrame {
    /// Create a frame from a full set of 21 landmarks.
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Get a landmark by topology index.
    pub fn point(&self, idx: usize) -> Landmark {
        self.points[idx]
    }

    /// All landmarks in topology order.
    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    /// Map a landmark into surface coordinates for the given viewport.
    pub fn surface_point(&self, idx: usize, viewport: Size) -> Point {
        let lm = self.points[idx];
        Point::new(lm.x * viewport.width, lm.y * viewport.height)
    }
}

//! Per-frame gesture classification.
//!
//! Derives discrete gesture facts from one frame's raw landmarks. Pure: no
//! state is kept between frames; hysteresis and edge detection belong to
//! the engine's state machine, not the classifier.

use crate::landmark::{index, LandmarkFrame};

/// Gesture facts for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSnapshot {
    /// A single raised middle finger: middle tip above its base knuckle
    /// while index and ring tips stay below their mid joints.
    pub middle_finger_up: bool,
    /// Thumb-tip to index-tip distance in normalized coordinate space.
    pub pinch_distance: f64,
    /// Whether the pinch distance is under the pinch threshold.
    pub is_pinching: bool,
}

/// Classify one frame of landmarks.
///
/// Landmark y grows downward, so "above" is a smaller y.
pub fn classify(frame: &LandmarkFrame, pinch_threshold: f64) -> GestureSnapshot {
    let middle_finger_up = frame.point(index::MIDDLE_FINGER_TIP).y
        < frame.point(index::MIDDLE_FINGER_MCP).y
        && frame.point(index::INDEX_FINGER_TIP).y > frame.point(index::INDEX_FINGER_PIP).y
        && frame.point(index::RING_FINGER_TIP).y > frame.point(index::RING_FINGER_PIP).y;

    let pinch_distance = frame
        .point(index::THUMB_TIP)
        .planar_distance(&frame.point(index::INDEX_FINGER_TIP));

    GestureSnapshot {
        middle_finger_up,
        pinch_distance,
        is_pinching: pinch_distance < pinch_threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{Landmark, LANDMARK_COUNT};

    /// A neutral open hand: every queried tip hangs below its reference
    /// joint and thumb/index tips sit far apart.
    fn open_hand() -> [Landmark; LANDMARK_COUNT] {
        let mut points = [Landmark::default(); LANDMARK_COUNT];
        points[index::THUMB_TIP] = Landmark::new(0.2, 0.5, 0.0);
        points[index::INDEX_FINGER_PIP] = Landmark::new(0.4, 0.4, 0.0);
        points[index::INDEX_FINGER_TIP] = Landmark::new(0.4, 0.5, 0.0);
        points[index::MIDDLE_FINGER_MCP] = Landmark::new(0.5, 0.5, 0.0);
        points[index::MIDDLE_FINGER_TIP] = Landmark::new(0.5, 0.6, 0.0);
        points[index::RING_FINGER_PIP] = Landmark::new(0.6, 0.4, 0.0);
        points[index::RING_FINGER_TIP] = Landmark::new(0.6, 0.5, 0.0);
        points
    }

    #[test]
    fn test_middle_finger_up_detected() {
        let mut points = open_hand();
        // Raise the middle tip above its knuckle; index/ring stay curled.
        points[index::MIDDLE_FINGER_TIP] = Landmark::new(0.5, 0.2, 0.0);
        let g = classify(&LandmarkFrame::new(points), 0.07);
        assert!(g.middle_finger_up);
    }

    #[test]
    fn test_middle_finger_needs_others_curled() {
        let mut points = open_hand();
        points[index::MIDDLE_FINGER_TIP] = Landmark::new(0.5, 0.2, 0.0);
        // Index extended above its mid joint breaks the pose.
        points[index::INDEX_FINGER_TIP] = Landmark::new(0.4, 0.1, 0.0);
        let g = classify(&LandmarkFrame::new(points), 0.07);
        assert!(!g.middle_finger_up);
    }

    #[test]
    fn test_open_hand_is_neutral() {
        let g = classify(&LandmarkFrame::new(open_hand()), 0.07);
        assert!(!g.middle_finger_up);
        assert!(!g.is_pinching);
    }

    #[test]
    fn test_pinch_threshold() {
        let mut points = open_hand();
        points[index::THUMB_TIP] = Landmark::new(0.40, 0.5, 0.0);
        points[index::INDEX_FINGER_TIP] = Landmark::new(0.45, 0.5, 0.0);
        let g = classify(&LandmarkFrame::new(points), 0.07);
        assert!((g.pinch_distance - 0.05).abs() < 1e-12);
        assert!(g.is_pinching);

        points[index::INDEX_FINGER_TIP] = Landmark::new(0.47, 0.5, 0.0);
        let g = classify(&LandmarkFrame::new(points), 0.07);
        assert!(!g.is_pinching, "at the threshold distance the pinch is open");
    }
}

//! Exponential smoothing of tracked points.

use kurbo::Point;

/// Smooths one tracked coordinate across frames with an exponential moving
/// average. Tracking loss clears the state so the next sample restarts the
/// filter instead of gliding in from a stale position.
#[derive(Debug, Clone)]
pub struct PointSmoother {
    value: Option<Point>,
    alpha: f64,
}

impl PointSmoother {
    /// Create a smoother with the given blend factor (0 = frozen, 1 = raw).
    pub fn new(alpha: f64) -> Self {
        Self { value: None, alpha }
    }

    /// Feed one frame's raw position, or `None` when tracking is lost.
    pub fn update(&mut self, raw: Option<Point>) -> Option<Point> {
        match raw {
            Some(point) => Some(self.sample(point)),
            None => {
                self.reset();
                None
            }
        }
    }

    /// Feed one raw sample and get the smoothed position.
    pub fn sample(&mut self, raw: Point) -> Point {
        let next = match self.value {
            Some(prev) => Point::new(
                prev.x + (raw.x - prev.x) * self.alpha,
                prev.y + (raw.y - prev.y) * self.alpha,
            ),
            // First sample after (re)start passes through unchanged.
            None => raw,
        };
        self.value = Some(next);
        next
    }

    /// Drop the smoothing state, as after tracking loss.
    pub fn reset(&mut self) {
        self.value = None;
    }

    /// Current smoothed position, if any sample has been seen.
    pub fn value(&self) -> Option<Point> {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_sample_passes_through() {
        let mut s = PointSmoother::new(0.45);
        let p = s.sample(Point::new(100.0, 50.0));
        assert!((p.x - 100.0).abs() < f64::EPSILON);
        assert!((p.y - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_convergence_to_constant_input() {
        let mut s = PointSmoother::new(0.45);
        let target = Point::new(200.0, 300.0);

        s.sample(Point::new(0.0, 0.0));
        let mut dist = s.value().unwrap().distance(target);
        for _ in 0..50 {
            let out = s.sample(target);
            let next_dist = out.distance(target);
            assert!(next_dist < dist, "distance must strictly decrease");
            dist = next_dist;
        }
        assert!(dist < 1e-6, "should converge to the input");
    }

    #[test]
    fn test_reset_on_tracking_loss() {
        let mut s = PointSmoother::new(0.45);
        s.sample(Point::new(10.0, 10.0));
        assert!(s.update(None).is_none());
        assert!(s.value().is_none());

        // Next sample restarts the filter instead of blending with history.
        let p = s.sample(Point::new(500.0, 500.0));
        assert!((p.x - 500.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_blend_step() {
        let mut s = PointSmoother::new(0.45);
        s.sample(Point::new(0.0, 0.0));
        let p = s.sample(Point::new(100.0, 0.0));
        assert!((p.x - 45.0).abs() < 1e-12);
    }
}

//! Per-frame orchestration of an annotation session.
//!
//! `AnnotationEngine` owns every piece of mutable session state (smoothers,
//! selectors, the drawing store, the live shape and open stroke) and
//! advances all of it through one `process_frame` entry point. Nothing here
//! blocks or fails; tracking loss and stale handles are ordinary states.

use crate::config::{ColorOption, OverlayConfig, ShapeOption};
use crate::drawing::{ColoredPoint, Drawing, DrawingId, Rgba, Shape, ShapeKind};
use crate::gesture;
use crate::landmark::{index, LandmarkFrame};
use crate::selector::{DwellSelector, SelectorSnapshot};
use crate::smoothing::PointSmoother;
use crate::store::DrawingStore;
use kurbo::{Point, Size};

/// Everything the engine consumes for one frame, sampled synchronously by
/// the shell.
#[derive(Debug, Clone)]
pub struct FrameInput {
    /// One detected hand, or `None` when tracking is lost.
    pub landmarks: Option<LandmarkFrame>,
    /// Freehand-drawing enable signal.
    pub modifier_held: bool,
    /// One-shot clear-all signal.
    pub reset_requested: bool,
    /// Drawing surface size in pixels.
    pub viewport: Size,
    /// Frame timestamp in milliseconds. Monotonicity is not assumed.
    pub now_ms: f64,
}

/// Smoothed fingertip positions for the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CursorSet {
    pub index_tip: Option<Point>,
    pub middle_tip: Option<Point>,
    pub thumb_tip: Option<Point>,
    pub pinch_midpoint: Option<Point>,
}

/// Interaction mode resolved for the frame, in priority order
/// Erase > Shape > Freehand. `Idle` means no hand was tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Erase,
    Shape,
    Freehand,
}

/// Shape-drawing sub-state.
#[derive(Debug, Clone, Copy, PartialEq)]
enum PinchState {
    Idle,
    Pinching { start: Point },
}

/// Read-only snapshot of everything a renderer must paint for one frame.
#[derive(Debug)]
pub struct RenderModel<'a> {
    /// Persisted drawings in paint order.
    pub drawings: Vec<&'a Drawing>,
    /// In-progress shape preview, not yet persisted.
    pub live_shape: Option<&'a Shape>,
    pub cursors: CursorSet,
    pub color_selector: SelectorSnapshot,
    pub shape_selector: SelectorSnapshot,
    pub mode: Mode,
    pub is_pinching: bool,
    pub modifier_held: bool,
}

/// The stateful gesture-to-drawing engine. One instance per session; all
/// mutation goes through `process_frame`.
#[derive(Debug)]
pub struct AnnotationEngine {
    config: OverlayConfig,
    index_smoother: PointSmoother,
    middle_smoother: PointSmoother,
    thumb_smoother: PointSmoother,
    color_selector: DwellSelector<ColorOption>,
    shape_selector: DwellSelector<ShapeOption>,
    store: DrawingStore,
    /// Handle of the stroke currently receiving points, if any. The stroke
    /// itself lives in the store; this may go stale after an erase or clear.
    open_stroke: Option<DrawingId>,
    live_shape: Option<Shape>,
    pinch: PinchState,
    cursors: CursorSet,
    mode: Mode,
    is_pinching: bool,
}

impl AnnotationEngine {
    /// Build an engine from a validated configuration.
    pub fn new(config: OverlayConfig) -> Self {
        let color_selector = DwellSelector::new(
            config.colors.clone(),
            config.color_layout,
            config.dwell_ms,
        );
        let shape_selector = DwellSelector::new(
            config.shapes.clone(),
            config.shape_layout,
            config.dwell_ms,
        );
        let alpha = config.smoothing_alpha;
        Self {
            color_selector,
            shape_selector,
            index_smoother: PointSmoother::new(alpha),
            middle_smoother: PointSmoother::new(alpha),
            thumb_smoother: PointSmoother::new(alpha),
            store: DrawingStore::new(),
            open_stroke: None,
            live_shape: None,
            pinch: PinchState::Idle,
            cursors: CursorSet::default(),
            mode: Mode::Idle,
            is_pinching: false,
            config,
        }
    }

    /// Advance the session by one frame and snapshot the result.
    pub fn process_frame(&mut self, input: &FrameInput) -> RenderModel<'_> {
        if input.reset_requested {
            log::info!("reset requested, clearing {} drawing(s)", self.store.len());
            self.store.clear();
        }

        match &input.landmarks {
            Some(frame) => self.process_tracked(frame, input),
            None => self.reset_transient(),
        }

        self.render_model(input.modifier_held)
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn store(&self) -> &DrawingStore {
        &self.store
    }

    /// Drop all transient state after tracking loss. Persisted drawings are
    /// untouched.
    fn reset_transient(&mut self) {
        if self.mode != Mode::Idle {
            log::debug!("tracking lost, dropping transient state");
        }
        self.index_smoother.reset();
        self.middle_smoother.reset();
        self.thumb_smoother.reset();
        self.color_selector.reset_hover();
        self.shape_selector.reset_hover();
        self.open_stroke = None;
        self.live_shape = None;
        self.pinch = PinchState::Idle;
        self.cursors = CursorSet::default();
        self.mode = Mode::Idle;
        self.is_pinching = false;
    }

    fn process_tracked(&mut self, frame: &LandmarkFrame, input: &FrameInput) {
        let viewport = input.viewport;

        let index_tip = self
            .index_smoother
            .sample(frame.surface_point(index::INDEX_FINGER_TIP, viewport));
        let middle_tip = self
            .middle_smoother
            .sample(frame.surface_point(index::MIDDLE_FINGER_TIP, viewport));
        let thumb_tip = self
            .thumb_smoother
            .sample(frame.surface_point(index::THUMB_TIP, viewport));
        let pinch_mid = index_tip.midpoint(thumb_tip);

        let gesture = gesture::classify(frame, self.config.pinch_threshold);
        self.is_pinching = gesture.is_pinching;

        self.color_selector.update(index_tip, viewport, input.now_ms);
        self.shape_selector.update(index_tip, viewport, input.now_ms);

        self.cursors = CursorSet {
            index_tip: Some(index_tip),
            middle_tip: Some(middle_tip),
            thumb_tip: Some(thumb_tip),
            pinch_midpoint: Some(pinch_mid),
        };

        let active_kind = self.shape_selector.active_option().kind;

        if gesture.middle_finger_up {
            self.mode = Mode::Erase;
            // Anything in progress is discarded, never persisted.
            self.live_shape = None;
            self.pinch = PinchState::Idle;
            self.open_stroke = None;
            self.store.erase_near(middle_tip, self.config.erase_radius);
        } else if let Some(kind) = active_kind {
            self.mode = Mode::Shape;
            self.open_stroke = None;
            self.step_pinch(kind, gesture.is_pinching, pinch_mid);
        } else {
            self.mode = Mode::Freehand;
            self.live_shape = None;
            self.pinch = PinchState::Idle;
            if input.modifier_held {
                let (stroke_color, glow_color) = self.active_ink();
                let handle = match self.open_stroke {
                    Some(handle) => handle,
                    None => {
                        let handle = self.store.begin_stroke();
                        log::debug!("stroke opened");
                        self.open_stroke = Some(handle);
                        handle
                    }
                };
                self.store
                    .append_point(handle, ColoredPoint::new(index_tip, stroke_color, glow_color));
            } else if self.open_stroke.take().is_some() {
                // The stroke stays in the store; it just stops growing.
                log::debug!("stroke closed");
            }
        }
    }

    /// Explicit two-state machine for pinch-driven shapes.
    fn step_pinch(&mut self, kind: ShapeKind, is_pinching: bool, pinch_mid: Point) {
        match (self.pinch, is_pinching) {
            (PinchState::Idle, true) => {
                self.pinch = PinchState::Pinching { start: pinch_mid };
            }
            (PinchState::Pinching { start }, true) => {
                // Kind and color re-resolve every frame, so a dwell commit
                // mid-pinch retargets the preview.
                let (stroke_color, glow_color) = self.active_ink();
                self.live_shape =
                    Some(Shape::new(kind, start, pinch_mid, stroke_color, glow_color));
            }
            (PinchState::Pinching { .. }, false) => {
                if let Some(shape) = self.live_shape.take() {
                    log::debug!("shape committed: {:?}", shape.kind);
                    self.store.commit_shape(shape);
                }
                self.pinch = PinchState::Idle;
            }
            (PinchState::Idle, false) => {}
        }
    }

    fn active_ink(&self) -> (Rgba, Rgba) {
        let color = self.color_selector.active_option();
        (color.stroke, color.glow)
    }

    fn render_model(&self, modifier_held: bool) -> RenderModel<'_> {
        RenderModel {
            drawings: self.store.drawings_ordered().collect(),
            live_shape: self.live_shape.as_ref(),
            cursors: self.cursors,
            color_selector: self.color_selector.snapshot(),
            shape_selector: self.shape_selector.snapshot(),
            mode: self.mode,
            is_pinching: self.is_pinching,
            modifier_held,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::{Landmark, LANDMARK_COUNT};

    const VIEWPORT: Size = Size::new(1000.0, 1000.0);

    /// Config with smoothing disabled (alpha = 1) so cursor positions are
    /// exact and assertions stay deterministic.
    fn test_config() -> OverlayConfig {
        OverlayConfig {
            smoothing_alpha: 1.0,
            ..OverlayConfig::default()
        }
    }

    fn engine() -> AnnotationEngine {
        AnnotationEngine::new(test_config())
    }

    /// A neutral open hand: no pinch, no raised middle finger.
    fn neutral_hand() -> [Landmark; LANDMARK_COUNT] {
        let mut p = [Landmark::default(); LANDMARK_COUNT];
        p[index::THUMB_TIP] = Landmark::new(0.30, 0.50, 0.0);
        p[index::INDEX_FINGER_PIP] = Landmark::new(0.40, 0.42, 0.0);
        p[index::INDEX_FINGER_TIP] = Landmark::new(0.40, 0.50, 0.0);
        p[index::MIDDLE_FINGER_MCP] = Landmark::new(0.50, 0.45, 0.0);
        p[index::MIDDLE_FINGER_TIP] = Landmark::new(0.50, 0.50, 0.0);
        p[index::RING_FINGER_PIP] = Landmark::new(0.60, 0.42, 0.0);
        p[index::RING_FINGER_TIP] = Landmark::new(0.60, 0.50, 0.0);
        p
    }

    /// Open hand pointing with the index tip at normalized (x, y).
    fn pointing(x: f64, y: f64) -> LandmarkFrame {
        let mut p = neutral_hand();
        p[index::INDEX_FINGER_TIP] = Landmark::new(x, y, 0.0);
        // Keep the tip below its mid joint so the pose stays neutral.
        p[index::INDEX_FINGER_PIP] = Landmark::new(x, y - 0.08, 0.0);
        LandmarkFrame::new(p)
    }

    /// Thumb and index tips together at normalized (x, y): a closed pinch
    /// whose midpoint is exactly (x, y).
    fn pinched(x: f64, y: f64) -> LandmarkFrame {
        let mut p = neutral_hand();
        p[index::THUMB_TIP] = Landmark::new(x, y, 0.0);
        p[index::INDEX_FINGER_TIP] = Landmark::new(x, y, 0.0);
        p[index::INDEX_FINGER_PIP] = Landmark::new(x, y - 0.08, 0.0);
        LandmarkFrame::new(p)
    }

    /// Raised middle finger with its tip at normalized (x, y).
    fn erasing(x: f64, y: f64) -> LandmarkFrame {
        let mut p = neutral_hand();
        p[index::MIDDLE_FINGER_TIP] = Landmark::new(x, y, 0.0);
        p[index::MIDDLE_FINGER_MCP] = Landmark::new(x, y + 0.20, 0.0);
        LandmarkFrame::new(p)
    }

    fn frame(landmarks: Option<LandmarkFrame>, modifier: bool, now_ms: f64) -> FrameInput {
        FrameInput {
            landmarks,
            modifier_held: modifier,
            reset_requested: false,
            viewport: VIEWPORT,
            now_ms,
        }
    }

    /// Drive the index tip onto a selector option until its dwell commits.
    fn dwell_on(engine: &mut AnnotationEngine, layout_center: Point, start_ms: f64) -> f64 {
        let target = pointing(layout_center.x / 1000.0, layout_center.y / 1000.0);
        let mut t = start_ms;
        while t <= start_ms + 816.0 {
            engine.process_frame(&frame(Some(target.clone()), false, t));
            t += 16.0;
        }
        t
    }

    #[test]
    fn test_freehand_stroke_lifecycle() {
        let mut eng = engine();

        // Three frames with the modifier held: one stroke, three points.
        for (i, t) in [(0, 0.0), (1, 16.0), (2, 32.0)] {
            let x = 0.40 + i as f64 * 0.01;
            eng.process_frame(&frame(Some(pointing(x, 0.50)), true, t));
        }
        assert_eq!(eng.store().len(), 1);
        let stroke = eng.store().drawings_ordered().next().unwrap().as_stroke().unwrap();
        assert_eq!(stroke.len(), 3);
        assert!((stroke.points[2].pos.x - 420.0).abs() < 1e-9);

        // Releasing the modifier closes the stroke but keeps it.
        eng.process_frame(&frame(Some(pointing(0.43, 0.50)), false, 48.0));
        assert_eq!(eng.store().len(), 1);

        // Pressing again starts a second stroke.
        eng.process_frame(&frame(Some(pointing(0.44, 0.50)), true, 64.0));
        assert_eq!(eng.store().len(), 2);
    }

    #[test]
    fn test_freehand_requires_modifier() {
        let mut eng = engine();
        for t in [0.0, 16.0, 32.0] {
            let model = eng.process_frame(&frame(Some(pointing(0.40, 0.50)), false, t));
            assert_eq!(model.mode, Mode::Freehand);
        }
        assert!(eng.store().is_empty());
    }

    #[test]
    fn test_shape_commit_determinism() {
        let mut eng = engine();

        // Dwell on shape option 1 (Circle) at its on-screen center.
        let center = eng.config().shape_layout.center(1, VIEWPORT);
        let t = dwell_on(&mut eng, center, 0.0);
        assert_eq!(eng.shape_selector.active_index(), 1);

        // Restart the cursor filters so positions below are exact.
        eng.process_frame(&frame(None, false, t));

        // Pinch starts at (100,100), drags, releases at (180,140).
        eng.process_frame(&frame(Some(pinched(0.10, 0.10)), false, t + 16.0));
        eng.process_frame(&frame(Some(pinched(0.15, 0.12)), false, t + 32.0));
        let model = eng.process_frame(&frame(Some(pinched(0.18, 0.14)), false, t + 48.0));
        assert!(model.live_shape.is_some());
        assert!(eng.store().is_empty(), "live shape is not persisted");

        // Open the pinch: the shape commits once.
        eng.process_frame(&frame(Some(pointing(0.18, 0.14)), false, t + 64.0));
        assert_eq!(eng.store().len(), 1);
        let shape = eng.store().drawings_ordered().next().unwrap().as_shape().unwrap();
        assert_eq!(shape.kind, ShapeKind::Circle);
        assert!((shape.corner1.x - 100.0).abs() < 1e-9);
        assert!((shape.corner1.y - 100.0).abs() < 1e-9);
        assert!((shape.corner2.x - 180.0).abs() < 1e-9);
        assert!((shape.corner2.y - 140.0).abs() < 1e-9);

        // A later frame does not commit it again.
        eng.process_frame(&frame(Some(pointing(0.18, 0.14)), false, t + 80.0));
        assert_eq!(eng.store().len(), 1);
    }

    #[test]
    fn test_tracking_loss_discards_live_shape() {
        let mut eng = engine();
        let center = eng.config().shape_layout.center(1, VIEWPORT);
        let t = dwell_on(&mut eng, center, 0.0);
        eng.process_frame(&frame(None, false, t));

        eng.process_frame(&frame(Some(pinched(0.10, 0.10)), false, t + 16.0));
        let model = eng.process_frame(&frame(Some(pinched(0.14, 0.12)), false, t + 32.0));
        assert!(model.live_shape.is_some());

        // Hand disappears mid-pinch: nothing is persisted.
        let model = eng.process_frame(&frame(None, false, t + 48.0));
        assert!(model.live_shape.is_none());
        assert_eq!(model.mode, Mode::Idle);
        assert!(eng.store().is_empty());
    }

    #[test]
    fn test_erase_removes_ink_under_middle_tip() {
        let mut eng = engine();
        // Draw a short stroke around (400, 500) and keep it open.
        eng.process_frame(&frame(Some(pointing(0.40, 0.50)), true, 0.0));
        eng.process_frame(&frame(Some(pointing(0.41, 0.50)), true, 16.0));
        assert_eq!(eng.store().len(), 1);

        // Middle finger up over the stroke erases it, even mid-draw.
        let model = eng.process_frame(&frame(Some(erasing(0.405, 0.50)), true, 32.0));
        assert_eq!(model.mode, Mode::Erase);
        assert!(eng.store().is_empty());

        // The stale handle stays dead; the next freehand frame opens a new
        // stroke instead of resurrecting the erased one.
        eng.process_frame(&frame(Some(pointing(0.40, 0.50)), true, 48.0));
        assert_eq!(eng.store().len(), 1);
    }

    #[test]
    fn test_mode_priority_erase_wins() {
        let mut eng = engine();

        // Seed one stroke at (400, 500).
        eng.process_frame(&frame(Some(pointing(0.40, 0.50)), true, 0.0));
        eng.process_frame(&frame(Some(pointing(0.40, 0.50)), false, 16.0));
        assert_eq!(eng.store().len(), 1);

        // Activate a shape kind, then present an ambiguous frame: middle
        // finger up AND pinching AND modifier held.
        let center = eng.config().shape_layout.center(1, VIEWPORT);
        let t = dwell_on(&mut eng, center, 32.0);

        let mut p = neutral_hand();
        p[index::MIDDLE_FINGER_TIP] = Landmark::new(0.40, 0.50, 0.0);
        p[index::MIDDLE_FINGER_MCP] = Landmark::new(0.40, 0.70, 0.0);
        p[index::THUMB_TIP] = Landmark::new(0.40, 0.49, 0.0);
        p[index::INDEX_FINGER_TIP] = Landmark::new(0.40, 0.50, 0.0);
        let ambiguous = LandmarkFrame::new(p);

        eng.process_frame(&frame(None, false, t)); // exact cursors
        let model = eng.process_frame(&frame(Some(ambiguous), true, t + 16.0));

        assert_eq!(model.mode, Mode::Erase);
        assert!(model.live_shape.is_none(), "no shape mutation in erase mode");
        assert!(eng.store().is_empty(), "stroke under the middle tip erased");
    }

    #[test]
    fn test_tracking_loss_keeps_persisted_drawings() {
        let mut eng = engine();

        // Open a stroke and leave it open.
        eng.process_frame(&frame(Some(pointing(0.40, 0.50)), true, 0.0));
        eng.process_frame(&frame(Some(pointing(0.41, 0.50)), true, 16.0));
        assert_eq!(eng.store().len(), 1);

        // Hover a color option partway, then lose the hand.
        let center = eng.config().color_layout.center(1, VIEWPORT);
        eng.process_frame(&frame(
            Some(pointing(center.x / 1000.0, center.y / 1000.0)),
            true,
            32.0,
        ));
        let model = eng.process_frame(&frame(None, false, 48.0));

        assert!(model.cursors.index_tip.is_none());
        assert!(model.cursors.pinch_midpoint.is_none());
        assert!(model.color_selector.hover.is_none());
        assert!(model.shape_selector.hover.is_none());
        assert!(model.live_shape.is_none());
        // Persisted drawings survive; only the transient state is gone.
        assert_eq!(eng.store().len(), 1);
        let stroke = eng.store().drawings_ordered().next().unwrap().as_stroke().unwrap();
        assert_eq!(stroke.len(), 3, "the stroke was open right up to the loss");

        // Drawing again after reacquisition opens a fresh stroke.
        eng.process_frame(&frame(Some(pointing(0.40, 0.50)), true, 64.0));
        assert_eq!(eng.store().len(), 2);
    }

    #[test]
    fn test_reset_clears_store() {
        let mut eng = engine();
        eng.process_frame(&frame(Some(pointing(0.40, 0.50)), true, 0.0));
        eng.process_frame(&frame(Some(pointing(0.41, 0.50)), true, 16.0));
        assert!(!eng.store().is_empty());

        let input = FrameInput {
            reset_requested: true,
            ..frame(Some(pointing(0.42, 0.50)), false, 32.0)
        };
        let model = eng.process_frame(&input);
        assert!(model.drawings.is_empty());
        assert!(eng.store().is_empty());
    }

    #[test]
    fn test_dwell_selects_ink_color() {
        let mut eng = engine();
        let center = eng.config().color_layout.center(1, VIEWPORT);
        let t = dwell_on(&mut eng, center, 0.0);
        assert_eq!(eng.color_selector.active_index(), 1);

        // Points drawn now carry the newly selected color.
        eng.process_frame(&frame(Some(pointing(0.40, 0.50)), true, t));
        let stroke = eng.store().drawings_ordered().next().unwrap().as_stroke().unwrap();
        let gold = eng.config().colors[1].stroke;
        assert_eq!(stroke.points[0].stroke, gold);
    }

    #[test]
    fn test_shape_mode_suppresses_freehand() {
        let mut eng = engine();
        let center = eng.config().shape_layout.center(2, VIEWPORT);
        let t = dwell_on(&mut eng, center, 0.0);
        assert_eq!(eng.shape_selector.active_index(), 2);

        // Modifier held with a non-Free shape active draws nothing.
        let model = eng.process_frame(&frame(Some(pointing(0.40, 0.50)), true, t));
        assert_eq!(model.mode, Mode::Shape);
        assert!(eng.store().is_empty());
    }
}

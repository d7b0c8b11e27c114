//! Vello-based renderer implementation.
//!
//! Reproduces the overlay look with layered vector strokes: each drawing is
//! painted twice, a wide translucent glow pass underneath the ink pass.

use crate::renderer::{FrameContext, Renderer};
use airink_core::{
    ColorOption, Drawing, Mode, Rgba, SelectorLayout, SelectorSnapshot, Shape, ShapeKind,
    ShapeOption, Stroke as InkStroke,
};
use kurbo::{Affine, BezPath, Cap, Join, Point, Rect, Size, Stroke};
use peniko::{Color, Fill};
use std::f64::consts::PI;
use vello::Scene;

/// Extra width of the glow pass around a stroke.
const GLOW_SPREAD: f64 = 10.0;
const GLOW_ALPHA: u8 = 90;
/// Dwell progress ring offset outside the option circle.
const PROGRESS_RING_OFFSET: f64 = 6.0;

fn color(rgba: Rgba) -> Color {
    rgba.into()
}

fn faded(rgba: Rgba, alpha: u8) -> Color {
    rgba.with_alpha(alpha).into()
}

/// GPU-friendly scene builder for the AirInk overlay.
pub struct VelloRenderer {
    scene: Scene,
}

impl Default for VelloRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl VelloRenderer {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
        }
    }

    /// Get the built scene for rendering.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Take ownership of the scene (resets internal scene).
    pub fn take_scene(&mut self) -> Scene {
        std::mem::take(&mut self.scene)
    }

    fn render_ink_stroke(&mut self, stroke: &InkStroke, width: f64, transform: Affine) {
        if stroke.points.len() < 2 {
            return;
        }
        let mut path = BezPath::new();
        path.move_to(stroke.points[0].pos);
        for point in stroke.points.iter().skip(1) {
            path.line_to(point.pos);
        }

        // Colors were captured at draw time; the whole stroke wears its
        // first point's ink.
        let first = stroke.points[0];
        let style = Stroke::new(width).with_caps(Cap::Round).with_join(Join::Round);
        let glow_style = Stroke::new(width + GLOW_SPREAD)
            .with_caps(Cap::Round)
            .with_join(Join::Round);

        self.scene
            .stroke(&glow_style, transform, faded(first.glow, GLOW_ALPHA), None, &path);
        self.scene
            .stroke(&style, transform, color(first.stroke), None, &path);
    }

    fn render_shape(&mut self, shape: &Shape, width: f64, transform: Affine) {
        let rect = shape.display_rect();
        let style = Stroke::new(width).with_join(Join::Round);
        let glow_style = Stroke::new(width + GLOW_SPREAD).with_join(Join::Round);
        let glow = faded(shape.glow, GLOW_ALPHA);
        let ink = color(shape.stroke);

        match shape.kind {
            ShapeKind::Circle => {
                let ellipse = kurbo::Ellipse::new(
                    rect.center(),
                    (rect.width() / 2.0, rect.height() / 2.0),
                    0.0,
                );
                self.scene.stroke(&glow_style, transform, glow, None, &ellipse);
                self.scene.stroke(&style, transform, ink, None, &ellipse);
            }
            ShapeKind::Rect | ShapeKind::Square => {
                self.scene.stroke(&glow_style, transform, glow, None, &rect);
                self.scene.stroke(&style, transform, ink, None, &rect);
            }
        }
    }

    /// Arc from 12 o'clock sweeping `progress` of a full turn, as a
    /// short-segment polyline.
    fn render_progress_arc(
        &mut self,
        center: Point,
        radius: f64,
        progress: f64,
        transform: Affine,
    ) {
        if progress <= 0.0 {
            return;
        }
        let sweep = progress.min(1.0) * 2.0 * PI;
        let segments = ((sweep / (2.0 * PI) * 72.0).ceil() as usize).max(2);

        let mut path = BezPath::new();
        let start = -PI / 2.0;
        path.move_to(Point::new(
            center.x + radius * start.cos(),
            center.y + radius * start.sin(),
        ));
        for i in 1..=segments {
            let angle = start + sweep * i as f64 / segments as f64;
            path.line_to(Point::new(
                center.x + radius * angle.cos(),
                center.y + radius * angle.sin(),
            ));
        }
        self.scene
            .stroke(&Stroke::new(3.0), transform, Color::WHITE, None, &path);
    }

    fn render_color_selector(
        &mut self,
        options: &[ColorOption],
        layout: &SelectorLayout,
        snapshot: &SelectorSnapshot,
        viewport: Size,
        transform: Affine,
    ) {
        for (i, option) in options.iter().enumerate() {
            let center = layout.center(i, viewport);
            let is_active = i == snapshot.active;
            let circle = kurbo::Circle::new(center, layout.radius);

            if is_active {
                // Halo stands in for the canvas shadow glow.
                let halo = kurbo::Circle::new(center, layout.radius + 4.0);
                self.scene
                    .fill(Fill::NonZero, transform, faded(option.glow, 70), None, &halo);
            }
            let fill_alpha = if is_active { 255 } else { 140 };
            self.scene.fill(
                Fill::NonZero,
                transform,
                faded(option.stroke, fill_alpha),
                None,
                &circle,
            );

            let (outline_width, outline) = if is_active {
                (3.0, Color::WHITE)
            } else {
                (1.5, Color::from_rgba8(255, 255, 255, 64))
            };
            self.scene
                .stroke(&Stroke::new(outline_width), transform, outline, None, &circle);

            if snapshot.hover == Some(i) {
                self.render_progress_arc(
                    center,
                    layout.radius + PROGRESS_RING_OFFSET,
                    snapshot.hover_progress,
                    transform,
                );
            }
        }
    }

    fn render_shape_selector(
        &mut self,
        options: &[ShapeOption],
        layout: &SelectorLayout,
        snapshot: &SelectorSnapshot,
        active_ink: &ColorOption,
        viewport: Size,
        transform: Affine,
    ) {
        for (i, option) in options.iter().enumerate() {
            let center = layout.center(i, viewport);
            let is_active = i == snapshot.active;
            let circle = kurbo::Circle::new(center, layout.radius);

            let fill_alpha = if is_active { 46 } else { 15 };
            self.scene.fill(
                Fill::NonZero,
                transform,
                Color::from_rgba8(255, 255, 255, fill_alpha),
                None,
                &circle,
            );
            let (outline_width, outline) = if is_active {
                (2.5, color(active_ink.stroke))
            } else {
                (1.5, Color::from_rgba8(255, 255, 255, 64))
            };
            self.scene
                .stroke(&Stroke::new(outline_width), transform, outline, None, &circle);

            self.render_kind_glyph(option.kind, center, is_active, active_ink, transform);

            if snapshot.hover == Some(i) {
                self.render_progress_arc(
                    center,
                    layout.radius + PROGRESS_RING_OFFSET,
                    snapshot.hover_progress,
                    transform,
                );
            }
        }
    }

    /// Geometric stand-in for the option icon (no text pipeline).
    fn render_kind_glyph(
        &mut self,
        kind: Option<ShapeKind>,
        center: Point,
        is_active: bool,
        active_ink: &ColorOption,
        transform: Affine,
    ) {
        let glyph_color = if is_active {
            color(active_ink.stroke)
        } else {
            Color::from_rgba8(255, 255, 255, 150)
        };
        let style = Stroke::new(2.0).with_caps(Cap::Round);

        match kind {
            None => {
                // Pen nib: a short diagonal stroke.
                let mut path = BezPath::new();
                path.move_to(Point::new(center.x - 7.0, center.y + 7.0));
                path.line_to(Point::new(center.x + 7.0, center.y - 7.0));
                self.scene.stroke(&style, transform, glyph_color, None, &path);
            }
            Some(ShapeKind::Circle) => {
                let glyph = kurbo::Circle::new(center, 9.0);
                self.scene.stroke(&style, transform, glyph_color, None, &glyph);
            }
            Some(ShapeKind::Rect) => {
                let glyph = Rect::from_center_size(center, Size::new(22.0, 14.0));
                self.scene.stroke(&style, transform, glyph_color, None, &glyph);
            }
            Some(ShapeKind::Square) => {
                let glyph = Rect::from_center_size(center, Size::new(16.0, 16.0));
                self.scene.stroke(&style, transform, glyph_color, None, &glyph);
            }
        }
    }

    fn render_cursors(&mut self, ctx: &FrameContext, active_ink: &ColorOption, transform: Affine) {
        let model = ctx.model;
        let cursors = model.cursors;

        match model.mode {
            Mode::Erase => {
                let Some(middle) = cursors.middle_tip else { return };
                let ring = kurbo::Circle::new(middle, ctx.config.erase_radius);
                self.scene.fill(
                    Fill::NonZero,
                    transform,
                    Color::from_rgba8(255, 80, 80, 38),
                    None,
                    &ring,
                );
                self.scene.stroke(
                    &Stroke::new(2.0),
                    transform,
                    Color::from_rgba8(255, 80, 80, 204),
                    None,
                    &ring,
                );
            }
            Mode::Shape => {
                let (Some(index), Some(thumb), Some(mid)) =
                    (cursors.index_tip, cursors.thumb_tip, cursors.pinch_midpoint)
                else {
                    return;
                };

                // Guide between the pinching fingers.
                let mut guide = BezPath::new();
                guide.move_to(index);
                guide.line_to(thumb);
                let guide_color = if model.is_pinching {
                    color(active_ink.stroke)
                } else {
                    Color::from_rgba8(255, 255, 255, 51)
                };
                self.scene.stroke(
                    &Stroke::new(1.5).with_dashes(0.0, [4.0, 4.0]),
                    transform,
                    guide_color,
                    None,
                    &guide,
                );

                let dot = kurbo::Circle::new(mid, 8.0);
                let dot_color = if model.is_pinching {
                    color(active_ink.stroke)
                } else {
                    Color::from_rgba8(255, 255, 255, 77)
                };
                self.scene.fill(Fill::NonZero, transform, dot_color, None, &dot);
            }
            Mode::Freehand => {
                let Some(index) = cursors.index_tip else { return };
                let dot = kurbo::Circle::new(index, 6.0);
                let dot_color = if model.modifier_held {
                    color(active_ink.stroke)
                } else {
                    faded(active_ink.stroke, 102)
                };
                self.scene.fill(Fill::NonZero, transform, dot_color, None, &dot);
            }
            Mode::Idle => {}
        }
    }
}

impl Renderer for VelloRenderer {
    fn build_scene(&mut self, ctx: &FrameContext) {
        self.scene.reset();
        let transform = Affine::scale(ctx.scale_factor);
        let config = ctx.config;
        let model = ctx.model;

        // Dimmed backdrop over the (externally composited) camera image.
        let backdrop = Rect::new(0.0, 0.0, ctx.viewport.width, ctx.viewport.height);
        self.scene.fill(
            Fill::NonZero,
            transform,
            Color::from_rgba8(10, 6, 2, 217),
            None,
            &backdrop,
        );

        // Persisted drawings in paint order, then the live preview on top.
        for drawing in &model.drawings {
            match drawing {
                Drawing::Stroke(stroke) => {
                    self.render_ink_stroke(stroke, config.stroke_width, transform)
                }
                Drawing::Shape(shape) => {
                    self.render_shape(shape, config.shape_stroke_width, transform)
                }
            }
        }
        if let Some(live) = model.live_shape {
            self.render_shape(live, config.shape_stroke_width, transform);
        }

        let active_ink = &config.colors[model.color_selector.active];

        // HUDs are only useful while a hand is tracked, but they stay
        // visible regardless so selections can be read at a glance.
        self.render_color_selector(
            &config.colors,
            &config.color_layout,
            &model.color_selector,
            ctx.viewport,
            transform,
        );
        self.render_shape_selector(
            &config.shapes,
            &config.shape_layout,
            &model.shape_selector,
            active_ink,
            ctx.viewport,
            transform,
        );

        self.render_cursors(ctx, active_ink, transform);
    }
}

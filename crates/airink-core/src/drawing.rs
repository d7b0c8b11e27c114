//! Drawing data model: strokes, shapes, and the colors baked into them.

use kurbo::{Point, Rect};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for persisted drawings.
pub type DrawingId = Uuid;

/// RGBA8 color representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    pub fn white() -> Self {
        Self::opaque(255, 255, 255)
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

impl From<Rgba> for Color {
    fn from(color: Rgba) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

impl From<Color> for Rgba {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

/// One point of a stroke, with the colors captured at draw time.
///
/// Colors are baked in rather than looked up later, so a palette change
/// never restyles ink that is already on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColoredPoint {
    pub pos: Point,
    pub stroke: Rgba,
    pub glow: Rgba,
}

impl ColoredPoint {
    pub fn new(pos: Point, stroke: Rgba, glow: Rgba) -> Self {
        Self { pos, stroke, glow }
    }
}

/// A freehand stroke: an ordered sequence of colored points.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Stroke {
    pub points: Vec<ColoredPoint>,
}

impl Stroke {
    /// Create a new empty stroke.
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Append a point; insertion order is draw order.
    pub fn add_point(&mut self, point: ColoredPoint) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether any point lies strictly within `radius` of `center`.
    pub fn any_point_within(&self, center: Point, radius: f64) -> bool {
        self.points.iter().any(|p| p.pos.distance(center) < radius)
    }

    pub fn bounds(&self) -> Rect {
        let mut iter = self.points.iter();
        let Some(first) = iter.next() else {
            return Rect::ZERO;
        };
        iter.fold(Rect::from_points(first.pos, first.pos), |r, p| {
            r.union_pt(p.pos)
        })
    }
}

/// Kinds of pinch-drawn shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Circle,
    Rect,
    Square,
}

/// A pinch-drawn shape spanned by two corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub kind: ShapeKind,
    /// Pinch-start point.
    pub corner1: Point,
    /// Pinch-end (or current pinch) point.
    pub corner2: Point,
    pub stroke: Rgba,
    pub glow: Rgba,
}

impl Shape {
    pub fn new(kind: ShapeKind, corner1: Point, corner2: Point, stroke: Rgba, glow: Rgba) -> Self {
        Self {
            kind,
            corner1,
            corner2,
            stroke,
            glow,
        }
    }

    /// Corner-normalized bounding rectangle of the spanned area.
    pub fn bounds(&self) -> Rect {
        Rect::from_points(self.corner1, self.corner2)
    }

    /// Midpoint of the two corners. This is the erase centroid for every
    /// kind; for squares it may differ from the drawn square's center, since
    /// the erase test ignores the side clamping.
    pub fn center(&self) -> Point {
        self.bounds().center()
    }

    /// The rectangle actually drawn: for squares the side clamps to the
    /// shorter spanned axis, anchored at the min corner.
    pub fn display_rect(&self) -> Rect {
        let b = self.bounds();
        match self.kind {
            ShapeKind::Square => {
                let side = b.width().min(b.height());
                Rect::new(b.x0, b.y0, b.x0 + side, b.y0 + side)
            }
            ShapeKind::Circle | ShapeKind::Rect => b,
        }
    }
}

/// A persisted drawing: either a freehand stroke or a committed shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Drawing {
    Stroke(Stroke),
    Shape(Shape),
}

impl Drawing {
    pub fn bounds(&self) -> Rect {
        match self {
            Drawing::Stroke(s) => s.bounds(),
            Drawing::Shape(s) => s.bounds(),
        }
    }

    pub fn as_stroke(&self) -> Option<&Stroke> {
        match self {
            Drawing::Stroke(s) => Some(s),
            Drawing::Shape(_) => None,
        }
    }

    pub fn as_shape(&self) -> Option<&Shape> {
        match self {
            Drawing::Shape(s) => Some(s),
            Drawing::Stroke(_) => None,
        }
    }
}

//! Overlay configuration: palettes, selector layout, and engine tunables.
//!
//! These are construction inputs shared by the engine and the renderer, not
//! constants baked into either.

use crate::drawing::{Rgba, ShapeKind};
use kurbo::{Point, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("palette must not be empty: {0}")]
    EmptyPalette(&'static str),
    #[error("shape palette must start with a freehand option")]
    MissingFreehandOption,
    #[error("smoothing alpha {0} outside (0, 1]")]
    InvalidAlpha(f64),
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },
}

/// One selectable ink color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorOption {
    pub label: String,
    pub stroke: Rgba,
    pub glow: Rgba,
}

impl ColorOption {
    pub fn new(label: &str, stroke: Rgba, glow: Rgba) -> Self {
        Self {
            label: label.to_string(),
            stroke,
            glow,
        }
    }
}

/// One selectable shape option. `kind: None` means freehand drawing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShapeOption {
    pub label: String,
    pub icon: String,
    pub kind: Option<ShapeKind>,
}

impl ShapeOption {
    pub fn new(label: &str, icon: &str, kind: Option<ShapeKind>) -> Self {
        Self {
            label: label.to_string(),
            icon: icon.to_string(),
            kind,
        }
    }
}

/// Which screen edge a selector column hugs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScreenEdge {
    Left,
    Right,
}

/// Vertical column layout for a dwell selector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectorLayout {
    pub edge: ScreenEdge,
    /// Horizontal distance of option centers from the edge.
    pub margin: f64,
    /// Vertical offset of the column's first option.
    pub top: f64,
    /// Option circle radius.
    pub radius: f64,
    /// Vertical gap between option circles.
    pub gap: f64,
    /// Extra hit tolerance added to the radius.
    pub hit_slop: f64,
}

impl SelectorLayout {
    /// Center of option `index` for the given viewport.
    pub fn center(&self, index: usize, viewport: Size) -> Point {
        let x = match self.edge {
            ScreenEdge::Left => self.margin,
            ScreenEdge::Right => viewport.width - self.margin,
        };
        let y = self.top + index as f64 * (self.radius * 2.0 + self.gap) + self.radius;
        Point::new(x, y)
    }

    /// Hit radius including slop.
    pub fn hit_radius(&self) -> f64 {
        self.radius + self.hit_slop
    }
}

/// Everything the engine and renderer are configured with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayConfig {
    pub colors: Vec<ColorOption>,
    pub shapes: Vec<ShapeOption>,
    pub color_layout: SelectorLayout,
    pub shape_layout: SelectorLayout,
    /// Hover time required to commit a selection, in milliseconds.
    pub dwell_ms: f64,
    /// Erase radius around the middle fingertip, in surface pixels.
    pub erase_radius: f64,
    /// Thumb-index distance (normalized) under which a pinch is closed.
    pub pinch_threshold: f64,
    /// Cursor smoothing blend factor.
    pub smoothing_alpha: f64,
    /// Freehand stroke width, in surface pixels.
    pub stroke_width: f64,
    /// Shape outline width, in surface pixels.
    pub shape_stroke_width: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            colors: vec![
                ColorOption::new("White", Rgba::opaque(255, 255, 255), Rgba::opaque(170, 170, 170)),
                ColorOption::new("Gold", Rgba::opaque(245, 208, 97), Rgba::opaque(245, 166, 35)),
                ColorOption::new("Cyan", Rgba::opaque(0, 229, 255), Rgba::opaque(0, 188, 212)),
                ColorOption::new("Pink", Rgba::opaque(255, 79, 154), Rgba::opaque(233, 30, 140)),
                ColorOption::new("Lime", Rgba::opaque(170, 255, 0), Rgba::opaque(118, 255, 3)),
            ],
            shapes: vec![
                ShapeOption::new("Free", "✏", None),
                ShapeOption::new("Circle", "◯", Some(ShapeKind::Circle)),
                ShapeOption::new("Rect", "▭", Some(ShapeKind::Rect)),
                ShapeOption::new("Square", "□", Some(ShapeKind::Square)),
            ],
            color_layout: SelectorLayout {
                edge: ScreenEdge::Right,
                margin: 54.0,
                top: 54.0,
                radius: 26.0,
                gap: 18.0,
                hit_slop: 10.0,
            },
            shape_layout: SelectorLayout {
                edge: ScreenEdge::Left,
                margin: 54.0,
                top: 54.0,
                radius: 26.0,
                gap: 18.0,
                hit_slop: 10.0,
            },
            dwell_ms: 800.0,
            erase_radius: 30.0,
            pinch_threshold: 0.07,
            smoothing_alpha: 0.45,
            stroke_width: 16.0,
            shape_stroke_width: 4.0,
        }
    }
}

impl OverlayConfig {
    /// Parse and validate a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the invariants the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.colors.is_empty() {
            return Err(ConfigError::EmptyPalette("colors"));
        }
        if self.shapes.is_empty() {
            return Err(ConfigError::EmptyPalette("shapes"));
        }
        if self.shapes[0].kind.is_some() {
            return Err(ConfigError::MissingFreehandOption);
        }
        if !(self.smoothing_alpha > 0.0 && self.smoothing_alpha <= 1.0) {
            return Err(ConfigError::InvalidAlpha(self.smoothing_alpha));
        }
        for (name, value) in [
            ("dwell_ms", self.dwell_ms),
            ("erase_radius", self.erase_radius),
            ("pinch_threshold", self.pinch_threshold),
            ("stroke_width", self.stroke_width),
            ("shape_stroke_width", self.shape_stroke_width),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        Ok(())
    }
}

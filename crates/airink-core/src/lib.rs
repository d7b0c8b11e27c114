//! AirInk Core Library
//!
//! Platform-agnostic gesture interpretation and drawing engine for the
//! AirInk hand-gesture overlay. Each frame, hand landmarks go in and a
//! `RenderModel` comes out; all mutable session state lives inside one
//! `AnnotationEngine`.

pub mod config;
pub mod drawing;
pub mod engine;
pub mod gesture;
pub mod landmark;
pub mod selector;
pub mod smoothing;
pub mod store;

pub use config::{ColorOption, ConfigError, OverlayConfig, ScreenEdge, SelectorLayout, ShapeOption};
pub use drawing::{ColoredPoint, Drawing, DrawingId, Rgba, Shape, ShapeKind, Stroke};
pub use engine::{AnnotationEngine, CursorSet, FrameInput, Mode, RenderModel};
pub use gesture::GestureSnapshot;
pub use landmark::{Landmark, LandmarkFrame};
pub use selector::{DwellSelector, SelectorSnapshot};
pub use smoothing::PointSmoother;
pub use store::DrawingStore;

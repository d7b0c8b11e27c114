//! Renderer trait abstraction.

use airink_core::{OverlayConfig, RenderModel};
use kurbo::Size;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Initialization failed: {0}")]
    InitFailed(String),
    #[error("Render failed: {0}")]
    RenderFailed(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// Context for a single render frame.
pub struct FrameContext<'a> {
    /// The engine's output for this frame.
    pub model: &'a RenderModel<'a>,
    /// Shared overlay configuration (palettes, layouts, widths).
    pub config: &'a OverlayConfig,
    /// Drawing surface size in logical pixels; the same space the engine's
    /// coordinates live in.
    pub viewport: Size,
    /// Device pixel ratio (for HiDPI).
    pub scale_factor: f64,
}

impl<'a> FrameContext<'a> {
    /// Create a new frame context.
    pub fn new(model: &'a RenderModel<'a>, config: &'a OverlayConfig, viewport: Size) -> Self {
        Self {
            model,
            config,
            viewport,
            scale_factor: 1.0,
        }
    }

    /// Set the scale factor for HiDPI.
    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.scale_factor = scale_factor;
        self
    }
}

/// Trait for rendering backends.
///
/// Implementations can use Vello, wgpu directly, or other engines. The
/// method is called once per frame after `process_frame` and must prepare
/// all drawing commands for everything in the model.
pub trait Renderer {
    fn build_scene(&mut self, ctx: &FrameContext);
}

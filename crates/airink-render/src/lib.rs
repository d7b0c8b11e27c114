//! AirInk rendering layer.
//!
//! Turns the engine's per-frame `RenderModel` into draw commands. The
//! `Renderer` trait keeps the engine unaware of the backend; the default
//! implementation builds a `vello::Scene`.

mod renderer;
#[cfg(feature = "vello-renderer")]
mod vello_impl;

pub use renderer::{FrameContext, Renderer, RendererError, RenderResult};
#[cfg(feature = "vello-renderer")]
pub use vello_impl::VelloRenderer;

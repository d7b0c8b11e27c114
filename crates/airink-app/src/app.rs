//! Native application shell: window, surface, and the per-frame loop.

use crate::tracking::{ReplaySource, TrackingSource};
use airink_core::{AnnotationEngine, FrameInput, OverlayConfig};
use airink_render::{FrameContext, Renderer, RendererError, VelloRenderer};
use kurbo::Size;
use peniko::Color;
use std::sync::Arc;
use std::time::Instant;
use vello::util::{RenderContext, RenderSurface};
use vello::{AaConfig, RenderParams};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::Window;

/// Per-window render resources, created once the surface exists.
struct RenderState {
    window: Arc<Window>,
    surface: RenderSurface<'static>,
    vello_renderer: vello::Renderer,
    /// Builds the overlay scene from each frame's render model.
    scene_builder: VelloRenderer,
    /// Rgba8 render texture -> surface format conversion.
    blitter: vello::wgpu::util::TextureBlitter,
}

/// The AirInk application.
pub struct App {
    render_cx: Option<RenderContext>,
    state: Option<RenderState>,
    config: OverlayConfig,
    engine: AnnotationEngine,
    source: Box<dyn TrackingSource>,
    /// Session time origin for the engine's millisecond clock.
    started: Instant,
    modifier_held: bool,
    reset_requested: bool,
}

impl App {
    /// Create an application around a tracking source.
    pub fn new(config: OverlayConfig, source: Box<dyn TrackingSource>) -> Self {
        Self {
            render_cx: None,
            state: None,
            engine: AnnotationEngine::new(config.clone()),
            config,
            source,
            started: Instant::now(),
            modifier_held: false,
            reset_requested: false,
        }
    }

    /// Run with the default configuration and the built-in demo recording.
    pub fn run() {
        let source = Box::new(ReplaySource::demo());
        Self::new(OverlayConfig::default(), source).run_event_loop();
    }

    /// Drive the winit event loop to completion.
    pub fn run_event_loop(mut self) {
        let event_loop = EventLoop::new().expect("Failed to create event loop");
        event_loop
            .run_app(&mut self)
            .expect("Event loop terminated abnormally");
    }

    fn render_frame(&mut self) -> Result<(), RendererError> {
        let Some(state) = self.state.as_mut() else {
            return Ok(());
        };
        let Some(render_cx) = self.render_cx.as_ref() else {
            return Ok(());
        };

        let scale_factor = state.window.scale_factor();
        let width = state.surface.config.width;
        let height = state.surface.config.height;
        let viewport = Size::new(
            width as f64 / scale_factor,
            height as f64 / scale_factor,
        );

        let landmarks = self.source.next_frame().unwrap_or_else(|| {
            log::info!("tracking stream ended");
            None
        });

        let input = FrameInput {
            landmarks,
            modifier_held: self.modifier_held,
            reset_requested: std::mem::take(&mut self.reset_requested),
            viewport,
            now_ms: self.started.elapsed().as_secs_f64() * 1000.0,
        };
        let model = self.engine.process_frame(&input);

        let ctx = FrameContext::new(&model, &self.config, viewport)
            .with_scale_factor(scale_factor);
        state.scene_builder.build_scene(&ctx);

        let device_handle = &render_cx.devices[state.surface.dev_id];
        let device = &device_handle.device;
        let queue = &device_handle.queue;

        let surface_texture = state
            .surface
            .surface
            .get_current_texture()
            .map_err(|e| RendererError::Surface(format!("{e:?}")))?;

        let params = RenderParams {
            base_color: Color::BLACK,
            width,
            height,
            antialiasing_method: AaConfig::Area,
        };

        // Vello's compute pipeline needs an Rgba8 storage texture; the
        // result is blitted onto the surface, whose format may differ.
        let render_texture = device.create_texture(&vello::wgpu::TextureDescriptor {
            label: Some("vello render texture"),
            size: vello::wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: vello::wgpu::TextureDimension::D2,
            format: vello::wgpu::TextureFormat::Rgba8Unorm,
            usage: vello::wgpu::TextureUsages::STORAGE_BINDING
                | vello::wgpu::TextureUsages::COPY_SRC
                | vello::wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let render_view =
            render_texture.create_view(&vello::wgpu::TextureViewDescriptor::default());

        state
            .vello_renderer
            .render_to_texture(device, queue, state.scene_builder.scene(), &render_view, &params)
            .map_err(|e| RendererError::RenderFailed(format!("{e:?}")))?;

        let surface_view = surface_texture
            .texture
            .create_view(&vello::wgpu::TextureViewDescriptor::default());

        let mut encoder =
            device.create_command_encoder(&vello::wgpu::CommandEncoderDescriptor {
                label: Some("blit encoder"),
            });
        state
            .blitter
            .copy(device, &mut encoder, &render_view, &surface_view);
        queue.submit(std::iter::once(encoder.finish()));

        surface_texture.present();
        Ok(())
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: Key, state: ElementState) {
        let pressed = state == ElementState::Pressed;
        match key {
            Key::Named(NamedKey::Shift) => self.modifier_held = pressed,
            Key::Named(NamedKey::Space) if pressed => self.reset_requested = true,
            Key::Named(NamedKey::Escape) if pressed => event_loop.exit(),
            _ => {}
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title("AirInk")
            .with_inner_size(LogicalSize::new(1280.0, 720.0));
        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .expect("Failed to create window"),
        );

        let render_cx = self.render_cx.get_or_insert_with(RenderContext::new);
        let size = window.inner_size();
        let surface = pollster::block_on(render_cx.create_surface(
            window.clone(),
            size.width,
            size.height,
            vello::wgpu::PresentMode::AutoVsync,
        ))
        .expect("Failed to create surface");
        // The surface borrows the window; both live in RenderState, and the
        // Arc keeps the window alive for the surface's whole life.
        let surface: RenderSurface<'static> = unsafe { std::mem::transmute(surface) };

        let device = &render_cx.devices[surface.dev_id].device;
        let vello_renderer = vello::Renderer::new(device, vello::RendererOptions::default())
            .expect("Failed to create Vello renderer");
        let blitter = vello::wgpu::util::TextureBlitter::new(device, surface.config.format);

        log::info!(
            "AirInk initialized - {}x{}",
            surface.config.width,
            surface.config.height
        );

        window.request_redraw();
        self.state = Some(RenderState {
            window,
            surface,
            vello_renderer,
            scene_builder: VelloRenderer::new(),
            blitter,
        });
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let (Some(render_cx), Some(state)) =
                    (self.render_cx.as_mut(), self.state.as_mut())
                {
                    render_cx.resize_surface(&mut state.surface, size.width, size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if !event.repeat {
                    self.handle_key(event_loop, event.logical_key, event.state);
                }
            }
            WindowEvent::RedrawRequested => {
                if let Err(e) = self.render_frame() {
                    log::error!("frame failed: {e}");
                }
                if let Some(state) = &self.state {
                    state.window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

//! Dear ImGui on top of the wgpu surface
//!
//! A frame is built with [`UiManager::update_logic`] before the scene renders,
//! then drawn through the [`Overlay`] impl into the same target.

use std::{sync::Arc, time::Instant};

use imgui::{Context, FontConfig, FontSource, MouseCursor};
use imgui_wgpu::{Renderer, RendererConfig};
use imgui_winit_support::{HiDpiMode, WinitPlatform};
use winit::{
    event::{Event, WindowEvent},
    window::{Window, WindowId},
};

use crate::gfx::rendering::Overlay;

const FONT_SIZE: f32 = 18.0;

pub struct UiManager {
    context: Context,
    platform: WinitPlatform,
    renderer: Renderer,
    window: Arc<Window>,
    last_frame: Instant,
    cursor: Option<MouseCursor>,
    /// A frame was built and still awaits its draw
    pending_draw: bool,
}

impl UiManager {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target_format: wgpu::TextureFormat,
        window: Arc<Window>,
    ) -> Self {
        let mut context = Context::create();
        context.set_ini_filename(None);

        let mut platform = WinitPlatform::new(&mut context);
        // Locked so the panel keeps one size across monitors
        platform.attach_window(context.io_mut(), &window, HiDpiMode::Locked(1.0));
        context.fonts().add_font(&[FontSource::DefaultFontData {
            config: Some(FontConfig {
                size_pixels: FONT_SIZE,
                oversample_h: 1,
                pixel_snap_h: true,
                ..Default::default()
            }),
        }]);

        let renderer = Renderer::new(
            &mut context,
            device,
            queue,
            RendererConfig {
                texture_format: target_format,
                ..Default::default()
            },
        );

        Self {
            context,
            platform,
            renderer,
            window,
            last_frame: Instant::now(),
            cursor: None,
            pending_draw: false,
        }
    }

    /// Feeds a window event to ImGui; true when the UI consumed it
    ///
    /// Resizes and focus changes are tracked but never consumed.
    pub fn handle_input(&mut self, window_id: WindowId, event: &WindowEvent) -> bool {
        let capturable = matches!(
            event,
            WindowEvent::CursorMoved { .. }
                | WindowEvent::MouseInput { .. }
                | WindowEvent::MouseWheel { .. }
                | WindowEvent::KeyboardInput { .. }
        );
        let tracked = matches!(
            event,
            WindowEvent::ModifiersChanged(_) | WindowEvent::Focused(_) | WindowEvent::Resized(_)
        );
        if !capturable && !tracked {
            return false;
        }

        let wrapped: Event<()> = Event::WindowEvent {
            window_id,
            event: event.clone(),
        };
        self.platform
            .handle_event(self.context.io_mut(), &self.window, &wrapped);
        capturable && self.wants_input()
    }

    /// True while the pointer or keyboard focus belongs to the UI
    pub fn wants_input(&self) -> bool {
        let io = self.context.io();
        io.want_capture_mouse || io.want_capture_keyboard
    }

    /// Builds this frame's widgets; returns whether the UI wants input
    pub fn update_logic(&mut self, build: impl FnOnce(&imgui::Ui)) -> bool {
        if std::mem::take(&mut self.pending_draw) {
            // ImGui refuses a new frame until the previous one is ended
            self.context.render();
        }

        let now = Instant::now();
        self.context.io_mut().update_delta_time(now - self.last_frame);
        self.last_frame = now;

        if let Err(e) = self.platform.prepare_frame(self.context.io_mut(), &self.window) {
            log::warn!("Skipping UI frame: {}", e);
            return false;
        }

        let ui = self.context.frame();
        build(ui);
        let cursor = ui.mouse_cursor();
        if cursor != self.cursor {
            self.cursor = cursor;
            self.platform.prepare_render(ui, &self.window);
        }
        self.pending_draw = true;

        self.wants_input()
    }
}

impl Overlay for UiManager {
    fn draw(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
    ) {
        if !std::mem::take(&mut self.pending_draw) {
            return;
        }
        let draw_data = self.context.render();
        if draw_data.display_size.iter().any(|&extent| extent <= 0.0) {
            return;
        }

        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("ui_pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        if let Err(e) = self.renderer.render(draw_data, queue, device, &mut pass) {
            log::error!("Failed to draw UI: {}", e);
        }
    }
}

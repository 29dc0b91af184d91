//! Windowed viewer: winit event handling around the render loop

use std::{sync::Arc, time::Instant};

use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::{
    assets::AssetLoader,
    config::ViewerConfig,
    gfx::{
        camera::{CameraController, PerspectiveCamera},
        context::SceneContext,
        rendering::{FrameScheduler, RenderEngine, RenderLoop, WithOverlay},
        scene::{builder::build_scene, Scene},
    },
    ui::{ParameterPanel, UiManager},
};

/// Schedules frames through winit redraw requests
struct WindowScheduler<'a>(&'a Window);

impl FrameScheduler for WindowScheduler<'_> {
    fn request_frame(&mut self) {
        self.0.request_redraw();
    }
}

/// Window-bound resources, created once the event loop is resumed
struct Gpu {
    window: Arc<Window>,
    engine: RenderEngine,
    ui: UiManager,
}

pub struct ViewerApp {
    config: ViewerConfig,
    ctx: SceneContext,
    loader: AssetLoader,
    panel: ParameterPanel,
    render_loop: RenderLoop,
    controller: CameraController,
    started: Instant,
    gpu: Option<Gpu>,
    error: Option<anyhow::Error>,
}

impl ViewerApp {
    /// Builds the scene and requests its assets; no window exists yet
    pub fn new(config: ViewerConfig) -> Self {
        let window = &config.window;
        let mut camera = PerspectiveCamera::new(
            config.camera.fov,
            window.width as f32 / window.height.max(1) as f32,
            config.camera.near,
            config.camera.far,
        );
        camera.position = config.camera.position();
        let mut ctx = SceneContext::new(Scene::new(), camera, config.camera.target());

        let mut loader = AssetLoader::new();
        let built = build_scene(&config.scene, &mut ctx, &mut loader);

        let mut render_loop = RenderLoop::new();
        for animation in built.animations() {
            render_loop.add_animation(animation);
        }

        Self {
            panel: ParameterPanel::standard(built.directional, built.hemisphere, built.spot),
            config,
            ctx,
            loader,
            render_loop,
            controller: CameraController::default(),
            started: Instant::now(),
            gpu: None,
            error: None,
        }
    }

    /// Opens the window and runs until it is closed
    pub fn run(mut self) -> anyhow::Result<()> {
        let event_loop = EventLoop::new()?;
        // Frames are driven by the render loop's redraw requests
        event_loop.set_control_flow(ControlFlow::Wait);
        event_loop.run_app(&mut self)?;

        match self.error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn context(&self) -> &SceneContext {
        &self.ctx
    }

    fn create_gpu(&self, event_loop: &ActiveEventLoop) -> anyhow::Result<Gpu> {
        let attributes = WindowAttributes::default()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = Arc::new(event_loop.create_window(attributes)?);

        let engine = pollster::block_on(RenderEngine::new(window.clone(), self.config.window.vsync))?;
        let ui = UiManager::new(
            engine.device(),
            engine.queue(),
            engine.surface_format(),
            window.clone(),
        );

        Ok(Gpu { window, engine, ui })
    }

    fn redraw(&mut self) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };
        // Redraws the loop did not ask for (expose events) would build a UI
        // frame that never gets drawn
        if !self.render_loop.is_frame_pending() {
            return;
        }

        self.loader.poll(&mut self.ctx);

        let panel = &self.panel;
        let ctx = &mut self.ctx;
        gpu.ui.update_logic(|ui| panel.render(ui, ctx));

        let elapsed_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        let mut scheduler = WindowScheduler(&gpu.window);
        let mut renderer = WithOverlay {
            engine: &mut gpu.engine,
            overlay: &mut gpu.ui,
        };
        self.render_loop
            .frame(&mut self.ctx, &mut renderer, &mut scheduler, elapsed_ms);
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }

        match self.create_gpu(event_loop) {
            Ok(gpu) => {
                self.render_loop.start(&mut WindowScheduler(&gpu.window));
                self.gpu = Some(gpu);
            }
            Err(e) => {
                log::error!("Failed to initialise graphics: {:#}", e);
                self.error = Some(e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        if gpu.ui.handle_input(window_id, &event) {
            return;
        }

        match event {
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            }
            | WindowEvent::CloseRequested => {
                log::info!("Closing viewer after {} frames", self.render_loop.frame_count());
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.controller
                    .process_keyed_events(&event, &mut self.ctx.camera, &mut self.ctx.controls);
            }
            WindowEvent::RedrawRequested => self.redraw(),
            _ => (),
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _device_id: DeviceId, event: DeviceEvent) {
        let Some(gpu) = self.gpu.as_ref() else {
            return;
        };
        // Don't move the camera while the UI is being used
        if gpu.ui.wants_input() {
            return;
        }

        self.controller
            .process_events(&event, &mut self.ctx.camera, &mut self.ctx.controls);
    }
}

//! Per-frame driver: resize check, animation, render, reschedule
//!
//! The loop never owns a timer. A [`FrameScheduler`] is asked for the next
//! frame and the host calls [`RenderLoop::frame`] when it arrives, passing the
//! elapsed time in milliseconds. Tests drive the same code with synthetic
//! timestamps.

use crate::gfx::{
    camera::PerspectiveCamera,
    context::SceneContext,
    scene::{NodeId, Scene},
};

use super::renderer::{FrameScheduler, Renderer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No frame has been requested yet
    Idle,
    /// A frame is always either pending or being drawn
    Running,
}

/// Transform updates computed from elapsed seconds alone
#[derive(Debug, Clone, PartialEq)]
pub enum Animation {
    /// Node `i` turns about x and y at `1 + i * 0.1` rad/s
    Spin { nodes: Vec<NodeId> },
}

/// Angular speed of the `index`-th spinning node in rad/s
pub fn spin_speed(index: usize) -> f32 {
    1.0 + index as f32 * 0.1
}

impl Animation {
    pub fn apply(&self, scene: &mut Scene, seconds: f32) {
        match self {
            Animation::Spin { nodes } => {
                for (index, id) in nodes.iter().enumerate() {
                    let rotation = seconds * spin_speed(index);
                    if let Some(node) = scene.node_mut(*id) {
                        node.transform.rotation.x = rotation;
                        node.transform.rotation.y = rotation;
                    }
                }
            }
        }
    }
}

/// What happened during one cycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    pub seconds: f32,
    pub resized: bool,
    pub rendered: bool,
}

pub struct RenderLoop {
    state: LoopState,
    frame_pending: bool,
    animations: Vec<Animation>,
    frame_count: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Idle,
            frame_pending: false,
            animations: Vec::new(),
            frame_count: 0,
        }
    }

    pub fn add_animation(&mut self, animation: Animation) {
        self.animations.push(animation);
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_frame_pending(&self) -> bool {
        self.frame_pending
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Requests the first frame; later calls are no-ops
    pub fn start(&mut self, scheduler: &mut dyn FrameScheduler) {
        if self.state == LoopState::Running {
            log::debug!("Render loop already running");
            return;
        }
        log::info!("Starting render loop");
        self.state = LoopState::Running;
        self.frame_pending = true;
        scheduler.request_frame();
    }

    /// Runs one cycle if a frame was requested, then requests the next one
    ///
    /// Returns `None` when no frame was pending, so a stray callback can never
    /// start a second, overlapping cycle.
    pub fn frame(
        &mut self,
        ctx: &mut SceneContext,
        renderer: &mut dyn Renderer,
        scheduler: &mut dyn FrameScheduler,
        elapsed_ms: f64,
    ) -> Option<FrameStats> {
        if self.state != LoopState::Running || !self.frame_pending {
            log::trace!("Ignoring frame callback with no frame pending");
            return None;
        }
        self.frame_pending = false;

        let stats = self.step(ctx, renderer, elapsed_ms);

        self.frame_pending = true;
        scheduler.request_frame();
        Some(stats)
    }

    /// The body of one cycle, without any scheduling
    pub fn step(
        &mut self,
        ctx: &mut SceneContext,
        renderer: &mut dyn Renderer,
        elapsed_ms: f64,
    ) -> FrameStats {
        let resized = resize_renderer_to_display_size(renderer, &mut ctx.camera);

        let seconds = (elapsed_ms * 0.001) as f32;
        for animation in &self.animations {
            animation.apply(&mut ctx.scene, seconds);
        }

        let rendered = match renderer.render(&ctx.scene, &ctx.camera) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Frame {} failed to render: {}", self.frame_count, e);
                false
            }
        };
        self.frame_count += 1;

        FrameStats {
            seconds,
            resized,
            rendered,
        }
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

/// Matches the renderer to its displayed size and fixes the camera aspect
///
/// A zero-sized display (minimized window, hidden panel) is skipped so the
/// aspect ratio never divides by zero. Returns true when a resize happened.
pub fn resize_renderer_to_display_size(
    renderer: &mut dyn Renderer,
    camera: &mut PerspectiveCamera,
) -> bool {
    let (width, height) = renderer.display_size();
    if (width, height) == renderer.size() {
        return false;
    }
    if width == 0 || height == 0 {
        log::debug!("Display size is {}x{}, skipping resize", width, height);
        return false;
    }

    renderer.set_size(width, height, false);
    camera.set_aspect(width, height);
    camera.update_projection_matrix();
    log::debug!("Resized renderer to {}x{}", width, height);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::RenderError,
        gfx::{
            geometry::generate_cube,
            scene::{Mesh, SceneNode},
        },
    };
    use approx::assert_abs_diff_eq;
    use std::sync::Arc;

    #[derive(Default)]
    struct FakeRenderer {
        display: (u32, u32),
        size: (u32, u32),
        set_size_calls: Vec<(u32, u32, bool)>,
        renders: usize,
        fail: bool,
    }

    impl Renderer for FakeRenderer {
        fn display_size(&self) -> (u32, u32) {
            self.display
        }

        fn size(&self) -> (u32, u32) {
            self.size
        }

        fn set_size(&mut self, width: u32, height: u32, update_style: bool) {
            self.size = (width, height);
            self.set_size_calls.push((width, height, update_style));
        }

        fn render(&mut self, _scene: &Scene, _camera: &PerspectiveCamera) -> Result<(), RenderError> {
            self.renders += 1;
            if self.fail {
                return Err(RenderError::Other("lost device".to_string()));
            }
            Ok(())
        }
    }

    #[derive(Default)]
    struct CountingScheduler {
        requests: usize,
    }

    impl FrameScheduler for CountingScheduler {
        fn request_frame(&mut self) {
            self.requests += 1;
        }
    }

    #[test]
    fn test_frames_ignored_until_started() {
        let mut ctx = SceneContext::default();
        let mut renderer = FakeRenderer::default();
        let mut scheduler = CountingScheduler::default();
        let mut render_loop = RenderLoop::new();

        assert!(render_loop.frame(&mut ctx, &mut renderer, &mut scheduler, 0.0).is_none());
        assert_eq!(renderer.renders, 0);

        render_loop.start(&mut scheduler);
        render_loop.start(&mut scheduler);
        assert_eq!(render_loop.state(), LoopState::Running);
        assert_eq!(scheduler.requests, 1);

        assert!(render_loop.frame(&mut ctx, &mut renderer, &mut scheduler, 16.0).is_some());
        assert_eq!(scheduler.requests, 2);
        assert_eq!(renderer.renders, 1);
    }

    #[test]
    fn test_resize_updates_aspect_before_render() {
        let mut camera = PerspectiveCamera::new(75.0, 2.0, 0.1, 5.0);
        let mut renderer = FakeRenderer {
            display: (400, 300),
            size: (800, 600),
            ..Default::default()
        };

        assert!(resize_renderer_to_display_size(&mut renderer, &mut camera));
        assert_eq!(renderer.set_size_calls, vec![(400, 300, false)]);
        assert_abs_diff_eq!(camera.aspect, 400.0 / 300.0);

        assert!(!resize_renderer_to_display_size(&mut renderer, &mut camera));
        assert_eq!(renderer.set_size_calls.len(), 1);
    }

    #[test]
    fn test_zero_height_skips_resize() {
        let mut camera = PerspectiveCamera::new(75.0, 2.0, 0.1, 5.0);
        let mut renderer = FakeRenderer {
            display: (640, 0),
            size: (800, 600),
            ..Default::default()
        };

        assert!(!resize_renderer_to_display_size(&mut renderer, &mut camera));
        assert!(renderer.set_size_calls.is_empty());
        assert_eq!(camera.aspect, 2.0);
    }

    fn rotation(ctx: &SceneContext, id: NodeId) -> cgmath::Vector3<f32> {
        ctx.scene.node(id).unwrap().transform.rotation
    }

    #[test]
    fn test_spin_is_a_function_of_time() {
        let mut ctx = SceneContext::default();
        let geometry = Arc::new(generate_cube());
        let nodes: Vec<NodeId> = (0..3)
            .map(|_| {
                ctx.scene
                    .add(SceneNode::with_mesh("cube", Mesh::new(geometry.clone(), "default")))
            })
            .collect();

        let mut render_loop = RenderLoop::new();
        render_loop.add_animation(Animation::Spin { nodes: nodes.clone() });
        let mut renderer = FakeRenderer::default();

        let stats = render_loop.step(&mut ctx, &mut renderer, 1000.0);
        assert_abs_diff_eq!(stats.seconds, 1.0);

        assert_abs_diff_eq!(rotation(&ctx, nodes[0]).x, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(rotation(&ctx, nodes[1]).x, 1.1, epsilon = 1e-6);
        assert_abs_diff_eq!(rotation(&ctx, nodes[1]).y, 1.1, epsilon = 1e-6);
        assert_abs_diff_eq!(rotation(&ctx, nodes[2]).y, 1.2, epsilon = 1e-6);

        // Same time, same pose
        render_loop.step(&mut ctx, &mut renderer, 1000.0);
        assert_abs_diff_eq!(rotation(&ctx, nodes[1]).x, 1.1, epsilon = 1e-6);
    }

    #[test]
    fn test_render_error_keeps_loop_running() {
        let mut ctx = SceneContext::default();
        let mut renderer = FakeRenderer {
            fail: true,
            ..Default::default()
        };
        let mut scheduler = CountingScheduler::default();
        let mut render_loop = RenderLoop::new();
        render_loop.start(&mut scheduler);

        let stats = render_loop
            .frame(&mut ctx, &mut renderer, &mut scheduler, 16.0)
            .unwrap();
        assert!(!stats.rendered);
        assert!(render_loop.is_frame_pending());
        assert_eq!(scheduler.requests, 2);
    }
}

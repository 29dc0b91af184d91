//! WGPU-based rendering engine for the viewer
//!
//! Owns the surface, device and depth buffer, and draws a [`Scene`] with two
//! pipelines: lit triangles and unlit wireframe lines. Geometry is flattened
//! into world space on the CPU each frame (see [`SceneBatch`]) and streamed
//! into growable vertex and index buffers.

use std::sync::Arc;

use anyhow::{anyhow, Context};
use winit::{dpi::PhysicalSize, window::Window};

use crate::{
    error::RenderError,
    gfx::{
        camera::PerspectiveCamera,
        color::Color,
        resources::{
            global_bindings::{GlobalBindings, GlobalUniform},
            depth_buffer::DepthBuffer,
        },
        scene::{Scene, Vertex3D},
    },
};

use super::{
    batch::{DrawList, SceneBatch},
    renderer::Renderer,
};

/// Draws extra passes (the UI) on top of the finished scene
pub trait Overlay {
    fn draw(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
    );
}

/// Vertex and index buffers that grow to fit the largest list seen so far
struct GpuDrawList {
    label: &'static str,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

impl GpuDrawList {
    const INITIAL_VERTICES: u64 = 1024;

    fn new(device: &wgpu::Device, label: &'static str) -> Self {
        Self {
            label,
            vertex_buffer: Self::vertex_buffer(device, label, Self::INITIAL_VERTICES),
            index_buffer: Self::index_buffer(device, label, Self::INITIAL_VERTICES * 3),
            index_count: 0,
        }
    }

    fn vertex_buffer(device: &wgpu::Device, label: &str, count: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} Vertex Buffer", label)),
            size: count * std::mem::size_of::<Vertex3D>() as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn index_buffer(device: &wgpu::Device, label: &str, count: u64) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} Index Buffer", label)),
            size: count * std::mem::size_of::<u32>() as u64,
            usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, list: &DrawList) {
        self.index_count = list.indices.len() as u32;
        if list.is_empty() {
            return;
        }

        let vertex_bytes: &[u8] = bytemuck::cast_slice(&list.vertices);
        if vertex_bytes.len() as u64 > self.vertex_buffer.size() {
            let count = (list.vertices.len() as u64).next_power_of_two();
            log::debug!("Growing {} vertex buffer to {} vertices", self.label, count);
            self.vertex_buffer = Self::vertex_buffer(device, self.label, count);
        }
        let index_bytes: &[u8] = bytemuck::cast_slice(&list.indices);
        if index_bytes.len() as u64 > self.index_buffer.size() {
            let count = (list.indices.len() as u64).next_power_of_two();
            log::debug!("Growing {} index buffer to {} indices", self.label, count);
            self.index_buffer = Self::index_buffer(device, self.label, count);
        }

        queue.write_buffer(&self.vertex_buffer, 0, vertex_bytes);
        queue.write_buffer(&self.index_buffer, 0, index_bytes);
    }

    fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.index_count == 0 {
            return;
        }
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.draw_indexed(0..self.index_count, 0, 0..1);
    }
}

pub struct RenderEngine {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    format: wgpu::TextureFormat,
    depth_buffer: DepthBuffer,
    global_bindings: GlobalBindings,
    lit_pipeline: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,
    batch: SceneBatch,
    triangles: GpuDrawList,
    lines: GpuDrawList,
}

impl RenderEngine {
    /// Creates a render engine drawing into `window`
    ///
    /// Picks an sRGB surface format so the shaders can output linear color.
    pub async fn new(window: Arc<Window>, vsync: bool) -> anyhow::Result<RenderEngine> {
        let PhysicalSize { width, height } = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("Failed to request adapter")?;
        log::info!("Using adapter {:?}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits::downlevel_defaults(),
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await
            .context("Failed to request a device")?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_capabilities.formats.first().copied())
            .ok_or_else(|| anyhow!("Surface supports no texture formats"))?;

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: if vsync {
                wgpu::PresentMode::AutoVsync
            } else {
                wgpu::PresentMode::AutoNoVsync
            },
            alpha_mode: surface_capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let depth_buffer = DepthBuffer::new(&device, config.width, config.height);
        let global_bindings = GlobalBindings::new(&device);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[global_bindings.layout()],
            push_constant_ranges: &[],
        });
        let lit_pipeline = create_pipeline(
            &device,
            &layout,
            &shader,
            format,
            wgpu::PrimitiveTopology::TriangleList,
            "fs_main",
        );
        let line_pipeline = create_pipeline(
            &device,
            &layout,
            &shader,
            format,
            wgpu::PrimitiveTopology::LineList,
            "fs_unlit",
        );

        let triangles = GpuDrawList::new(&device, "Triangle");
        let lines = GpuDrawList::new(&device, "Line");

        log::info!("Render engine ready: {}x{} {:?}", config.width, config.height, format);

        Ok(RenderEngine {
            window,
            surface,
            device,
            queue,
            config,
            format,
            depth_buffer,
            global_bindings,
            lit_pipeline,
            line_pipeline,
            batch: SceneBatch::new(),
            triangles,
            lines,
        })
    }

    /// Draws one frame, then lets `overlay` draw on top before presenting
    pub fn render_frame(
        &mut self,
        scene: &Scene,
        camera: &PerspectiveCamera,
        overlay: Option<&mut dyn Overlay>,
    ) -> Result<(), RenderError> {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                self.surface.configure(&self.device, &self.config);
                return Err(e.into());
            }
            Err(e) => return Err(e.into()),
        };
        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.global_bindings
            .update(&self.queue, GlobalUniform::from_scene(scene, camera));
        self.batch.collect(scene);
        self.triangles
            .upload(&self.device, &self.queue, &self.batch.triangles);
        self.lines.upload(&self.device, &self.queue, &self.batch.lines);

        let clear = scene
            .background
            .as_ref()
            .map(|background| background.clear_color())
            .unwrap_or(Color::BLACK);

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: clear.r as f64,
                            g: clear.g as f64,
                            b: clear.b as f64,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_buffer.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
            render_pass.set_pipeline(&self.lit_pipeline);
            self.triangles.draw(&mut render_pass);
            render_pass.set_pipeline(&self.line_pipeline);
            self.lines.draw(&mut render_pass);
        }

        if let Some(overlay) = overlay {
            overlay.draw(&self.device, &self.queue, &mut encoder, &surface_texture_view);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        self.window.pre_present_notify();
        surface_texture.present();
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.surface.configure(&self.device, &self.config);
        self.depth_buffer.fit(&self.device, width, height);
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }
}

impl Renderer for RenderEngine {
    fn display_size(&self) -> (u32, u32) {
        self.window.inner_size().into()
    }

    fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    fn set_size(&mut self, width: u32, height: u32, update_style: bool) {
        if update_style {
            // Applied asynchronously; the next display_size() picks it up
            let _ = self.window.request_inner_size(PhysicalSize::new(width, height));
        }
        self.resize(width, height);
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RenderError> {
        self.render_frame(scene, camera, None)
    }
}

/// A renderer that draws an overlay after every frame
pub struct WithOverlay<'a, O: Overlay> {
    pub engine: &'a mut RenderEngine,
    pub overlay: &'a mut O,
}

impl<O: Overlay> Renderer for WithOverlay<'_, O> {
    fn display_size(&self) -> (u32, u32) {
        self.engine.display_size()
    }

    fn size(&self) -> (u32, u32) {
        self.engine.size()
    }

    fn set_size(&mut self, width: u32, height: u32, update_style: bool) {
        self.engine.set_size(width, height, update_style);
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<(), RenderError> {
        self.engine.render_frame(scene, camera, Some(&mut *self.overlay))
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    topology: wgpu::PrimitiveTopology,
    fragment_entry: &str,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(fragment_entry),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            compilation_options: Default::default(),
            buffers: &[Vertex3D::desc()],
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(fragment_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::REPLACE),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            // Imported models do not agree on winding
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: DepthBuffer::FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

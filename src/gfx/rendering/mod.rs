// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! The [`RenderLoop`] drives frames through the [`Renderer`] seam;
//! [`RenderEngine`] is the wgpu implementation of it.

pub mod batch;
pub mod render_engine;
pub mod render_loop;
pub mod renderer;

// Re-export main types
pub use batch::{DrawList, SceneBatch};
pub use render_engine::{Overlay, RenderEngine, WithOverlay};
pub use render_loop::{resize_renderer_to_display_size, Animation, FrameStats, LoopState, RenderLoop};
pub use renderer::{FrameScheduler, Renderer};

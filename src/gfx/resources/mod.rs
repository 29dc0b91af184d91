// src/gfx/resources/mod.rs
//! Scene resources
//!
//! Materials and texture metadata shared by scene nodes, plus the GPU-side
//! depth texture and global uniforms used by the render engine.

pub mod depth_buffer;
pub mod global_bindings;
pub mod material;
pub mod texture;

// Re-export main types
pub use depth_buffer::DepthBuffer;
pub use global_bindings::{GlobalBindings, GlobalUniform};
pub use material::{Material, MaterialId, MaterialManager};
pub use texture::{Background, ColorSpace, Texture, TextureMapping};

//! Thin typed wrappers over raw wgpu objects

pub mod uniform_buffer;

pub use uniform_buffer::UniformBuffer;

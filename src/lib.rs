// src/lib.rs
//! Vantage 3D viewer
//!
//! An interactive scene viewer built on wgpu and winit. Loaded models are
//! framed automatically, and camera and light parameters can be tuned live
//! from an ImGui panel.

pub mod app;
pub mod assets;
pub mod config;
pub mod error;
pub mod gfx;
pub mod prelude;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::ViewerApp;
pub use config::ViewerConfig;

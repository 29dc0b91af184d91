//! # Graphics Module
//!
//! Camera systems, the scene graph, resources and the rendering pipeline.
//!
//! - **Camera System** ([`camera`]) - Perspective camera, orbit controls and framing
//! - **Scene Management** ([`scene`]) - Node arena, lights, bounds and the scene builder
//! - **Resource Management** ([`resources`]) - Materials, textures and GPU uniforms
//! - **Rendering Pipeline** ([`rendering`]) - Render loop and the wgpu engine
//!
//! [`SceneContext`] bundles the scene with its camera and controls; it is
//! what frame callbacks, loaders and UI bindings operate on.

pub mod camera;
pub mod color;
pub mod context;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::{OrbitControls, PerspectiveCamera};
pub use color::Color;
pub use context::SceneContext;
pub use rendering::{RenderEngine, RenderLoop};

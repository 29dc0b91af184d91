//! # Vantage Prelude
//!
//! Commonly used types in one import:
//!
//! ```rust
//! use vantage::prelude::*;
//!
//! let mut ctx = SceneContext::default();
//! let cube = ctx.scene.add(SceneNode::with_mesh(
//!     "cube",
//!     Mesh::new(std::sync::Arc::new(generate_cube()), "default"),
//! ));
//! let bounds = compute_bounds(&ctx.scene, cube).expect("cube has geometry");
//! frame_bounds(&bounds, &mut ctx.camera, &mut ctx.controls);
//! assert_eq!(ctx.controls.target, bounds.center());
//! ```

// Re-export core application types
pub use crate::app::ViewerApp;
pub use crate::config::ViewerConfig;

// Re-export graphics and scene types
pub use crate::gfx::camera::{frame_area, frame_bounds, OrbitControls, PerspectiveCamera};
pub use crate::gfx::color::Color;
pub use crate::gfx::context::SceneContext;
pub use crate::gfx::geometry::{generate_cone, generate_cube, generate_plane, generate_sphere, GeometryData};
pub use crate::gfx::rendering::{FrameScheduler, RenderLoop, Renderer};
pub use crate::gfx::scene::{compute_bounds, BoundingBox, Light, Mesh, NodeId, Scene, SceneNode};

// Re-export asset loading
pub use crate::assets::AssetLoader;

// Re-export UI types
pub use crate::ui::{ParameterPanel, Properties, PropertyBinding, Value};

// Re-export common external dependencies
pub use cgmath::{InnerSpace, Vector3, Zero};

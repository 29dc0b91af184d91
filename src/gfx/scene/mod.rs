//! # Scene Management Module
//!
//! This module provides the scene graph: an arena of transformable nodes,
//! some bearing meshes, plus the lights, materials and background that go
//! with them.
//!
//! ## Key Components
//!
//! - [`Scene`] - Owns the node tree, lights, materials and background
//! - [`SceneNode`] - A node with a local [`Transform`] and optional [`Mesh`]
//! - [`Light`] - Directional, hemisphere or spot light
//! - [`compute_bounds`] - World-space bounds of a subtree
//! - [`builder`] - Assembles the demo scene and wires model loading
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use vantage::gfx::geometry::generate_cube;
//! use vantage::gfx::scene::{compute_bounds, Mesh, Scene, SceneNode};
//!
//! let mut scene = Scene::new();
//! let cube = scene.add(SceneNode::with_mesh("cube", Mesh::new(Arc::new(generate_cube()), "default")));
//! let bounds = compute_bounds(&scene, cube).expect("cube has geometry");
//! assert!((bounds.size() - 3.0_f32.sqrt()).abs() < 1e-5);
//! ```

pub mod bounds;
pub mod builder;
pub mod light;
pub mod node;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use bounds::{compute_bounds, BoundingBox};
pub use light::{Light, LightId, LightKind};
pub use node::{Mesh, NodeId, SceneNode, Transform};
pub use scene::{Scene, SceneStatistics};
pub use vertex::Vertex3D;

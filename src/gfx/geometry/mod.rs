//! Local-space mesh data and the procedural shapes used by the demo scene
//!
//! ```rust
//! use vantage::gfx::geometry::{generate_cube, generate_plane};
//!
//! let cube = generate_cube();
//! assert_eq!(cube.triangle_count(), 12);
//! let ground = generate_plane(10.0, 10.0, 4, 4);
//! assert!(ground.bounding_box().is_some());
//! ```

pub mod primitives;

pub use primitives::*;

use cgmath::Vector3;

use crate::gfx::scene::bounds::BoundingBox;

/// Indexed triangle mesh in object space
///
/// `normals` and `tex_coords` run parallel to `vertices` when present; models
/// loaded without normals leave them empty.
#[derive(Debug, Clone, Default)]
pub struct GeometryData {
    pub vertices: Vec<[f32; 3]>,
    pub tex_coords: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    /// Counter-clockwise triangles
    pub indices: Vec<u32>,
}

impl GeometryData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Local-space bounding box, `None` for empty geometry
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut points = self.vertices.iter().map(|v| Vector3::new(v[0], v[1], v[2]));
        let mut bounds = BoundingBox::from_point(points.next()?);
        for point in points {
            bounds.expand_by_point(point);
        }
        Some(bounds)
    }

    /// Normal for vertex `i`, defaulting to +Y when the source had none
    pub fn normal(&self, i: usize) -> [f32; 3] {
        self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0])
    }
}

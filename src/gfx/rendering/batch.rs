//! CPU-side flattening of the scene into world-space draw lists
//!
//! Every visible mesh is transformed into world space and appended to one
//! of two lists: lit triangles, or unlit lines for wireframe meshes. The
//! render engine uploads each list with a single draw call.

use std::collections::HashSet;

use cgmath::{InnerSpace, Matrix, Matrix3, Matrix4, SquareMatrix, Vector3, Vector4};

use crate::gfx::scene::{Mesh, Scene, Vertex3D};

/// Vertices plus indices for one primitive topology
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawList {
    pub vertices: Vec<Vertex3D>,
    pub indices: Vec<u32>,
}

impl DrawList {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}

#[derive(Debug, Clone, Default)]
pub struct SceneBatch {
    pub triangles: DrawList,
    pub lines: DrawList,
}

impl SceneBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds both lists from the scene, reusing their allocations
    pub fn collect(&mut self, scene: &Scene) {
        self.triangles.clear();
        self.lines.clear();

        scene.walk(scene.root(), true, |_, mesh, world| {
            if mesh.geometry.is_empty() {
                return;
            }
            let color = scene
                .material_manager
                .get_material_for_object(&mesh.material)
                .effective_color()
                .to_array();
            if mesh.wireframe {
                let base = append_vertices(&mut self.lines, mesh, world, color);
                append_edges(&mut self.lines, mesh, base);
            } else {
                let base = append_vertices(&mut self.triangles, mesh, world, color);
                self.triangles
                    .indices
                    .extend(mesh.geometry.indices.iter().map(|index| base + index));
            }
        });
    }
}

fn normal_matrix(world: &Matrix4<f32>) -> Matrix3<f32> {
    let linear = Matrix3::from_cols(world.x.truncate(), world.y.truncate(), world.z.truncate());
    linear
        .invert()
        .map(|inverse| inverse.transpose())
        .unwrap_or(linear)
}

/// Appends the mesh's vertices in world space, returning the index of the first
fn append_vertices(list: &mut DrawList, mesh: &Mesh, world: Matrix4<f32>, color: [f32; 3]) -> u32 {
    let geometry = &mesh.geometry;
    let base = list.vertices.len() as u32;
    let normals = normal_matrix(&world);

    list.vertices.extend(geometry.vertices.iter().enumerate().map(|(i, v)| {
        let position = world * Vector4::new(v[0], v[1], v[2], 1.0);
        let normal = normals * Vector3::from(geometry.normal(i));
        let normal = if normal.magnitude2() > 0.0 {
            normal.normalize()
        } else {
            normal
        };
        Vertex3D {
            position: position.truncate().into(),
            normal: normal.into(),
            color,
        }
    }));
    base
}

/// Line-list indices for each unique triangle edge of `mesh`
fn append_edges(list: &mut DrawList, mesh: &Mesh, base: u32) {
    let mut seen = HashSet::new();
    for triangle in mesh.geometry.indices.chunks_exact(3) {
        for (a, b) in [(0, 1), (1, 2), (2, 0)] {
            let edge = (triangle[a].min(triangle[b]), triangle[a].max(triangle[b]));
            if seen.insert(edge) {
                list.indices.extend([base + edge.0, base + edge.1]);
            }
        }
    }
}

//! Scene graph nodes
//!
//! Nodes are stored in the [`Scene`](super::Scene) arena and addressed by
//! [`NodeId`]. The parent link is a plain index used for world-transform
//! composition only; the scene owns every node.

use std::sync::Arc;

use cgmath::{Matrix4, Rad, Vector3};

use crate::gfx::{geometry::GeometryData, resources::material::MaterialId};

/// Index of a node inside its scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Local transform of a node
///
/// Rotation is an Euler triple in radians applied in XYZ order, so the
/// local matrix is `T * Rx * Ry * Rz * S`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vector3<f32>,
    pub rotation: Vector3<f32>,
    pub scale: Vector3<f32>,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    pub fn from_position(position: Vector3<f32>) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.position)
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
            * Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }
}

/// Renderable payload of a node
#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: Arc<GeometryData>,
    pub material: MaterialId,
    /// Drawn as edges only (debug helpers)
    pub wireframe: bool,
}

impl Mesh {
    pub fn new(geometry: Arc<GeometryData>, material: impl Into<MaterialId>) -> Self {
        Self {
            geometry,
            material: material.into(),
            wireframe: false,
        }
    }

    pub fn wireframe(mut self) -> Self {
        self.wireframe = true;
        self
    }
}

/// A node in the scene graph
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub mesh: Option<Mesh>,
    pub visible: bool,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl SceneNode {
    /// An empty grouping node
    pub fn group(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            mesh: None,
            visible: true,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn with_mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            mesh: Some(mesh),
            ..Self::group(name)
        }
    }

    pub fn at(mut self, position: Vector3<f32>) -> Self {
        self.transform.position = position;
        self
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

//! Axis-aligned bounding volumes over scene subtrees

use cgmath::{InnerSpace, Point3, Transform as _, Vector3};

use super::{node::NodeId, scene::Scene};

/// Axis-aligned bounding box in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl BoundingBox {
    pub fn new(min: Vector3<f32>, max: Vector3<f32>) -> Self {
        Self { min, max }
    }

    /// A zero-volume box around a single point
    pub fn from_point(point: Vector3<f32>) -> Self {
        Self::new(point, point)
    }

    pub fn expand_by_point(&mut self, point: Vector3<f32>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let mut merged = *self;
        merged.expand_by_point(other.min);
        merged.expand_by_point(other.max);
        merged
    }

    /// Edge lengths along each axis
    pub fn extent(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Length of the box diagonal
    pub fn size(&self) -> f32 {
        self.extent().magnitude()
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, point: Vector3<f32>) -> bool {
        point.x >= self.min.x
            && point.y >= self.min.y
            && point.z >= self.min.z
            && point.x <= self.max.x
            && point.y <= self.max.y
            && point.z <= self.max.z
    }
}

/// Computes the world-space bounds of every mesh under `root`
///
/// Each vertex is transformed by its node's full world matrix, including the
/// ancestors above `root`. Returns `None` when the subtree holds no geometry;
/// callers must not try to frame that.
pub fn compute_bounds(scene: &Scene, root: NodeId) -> Option<BoundingBox> {
    let mut bounds: Option<BoundingBox> = None;

    scene.walk(root, false, |_, mesh, world| {
        for v in &mesh.geometry.vertices {
            let p = world.transform_point(Point3::new(v[0], v[1], v[2]));
            let p = Vector3::new(p.x, p.y, p.z);
            match bounds.as_mut() {
                Some(b) => b.expand_by_point(p),
                None => bounds = Some(BoundingBox::from_point(p)),
            }
        }
    });

    bounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{
        geometry::generate_cube,
        scene::node::{Mesh, SceneNode},
    };
    use approx::assert_abs_diff_eq;
    use std::sync::Arc;

    fn cube_node(name: &str) -> SceneNode {
        SceneNode::with_mesh(name, Mesh::new(Arc::new(generate_cube()), "default"))
    }

    #[test]
    fn test_unit_cube_bounds() {
        let mut scene = Scene::new();
        let cube = scene.add(cube_node("cube"));

        let bounds = compute_bounds(&scene, cube).unwrap();
        assert_abs_diff_eq!(bounds.size(), 3.0_f32.sqrt(), epsilon = 1e-6);
        let center = bounds.center();
        assert_abs_diff_eq!(center.x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(center.y, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(center.z, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_empty_subtree_has_no_bounds() {
        let mut scene = Scene::new();
        let group = scene.add(SceneNode::group("empty"));
        scene.add_node(group, SceneNode::group("still empty"));

        assert!(compute_bounds(&scene, group).is_none());
        assert!(compute_bounds(&scene, scene.root()).is_none());
    }

    #[test]
    fn test_ancestor_transforms_are_applied() {
        let mut scene = Scene::new();
        let outer = scene.add(SceneNode::group("outer").at(Vector3::new(10.0, 0.0, 0.0)));
        let inner = scene.add_node(outer, SceneNode::group("inner").at(Vector3::new(0.0, 5.0, 0.0)));
        let cube = scene.add_node(inner, cube_node("cube"));

        // Bounds of the leaf alone still include both ancestor offsets
        let bounds = compute_bounds(&scene, cube).unwrap();
        assert_abs_diff_eq!(bounds.center().x, 10.0, epsilon = 1e-5);
        assert_abs_diff_eq!(bounds.center().y, 5.0, epsilon = 1e-5);
        assert_abs_diff_eq!(bounds.min.x, 9.5, epsilon = 1e-5);
    }

    #[test]
    fn test_union_of_children() {
        let mut scene = Scene::new();
        let group = scene.add(SceneNode::group("pair"));
        scene.add_node(group, cube_node("left").at(Vector3::new(-2.0, 0.0, 0.0)));
        scene.add_node(group, cube_node("right").at(Vector3::new(2.0, 0.0, 0.0)));

        let bounds = compute_bounds(&scene, group).unwrap();
        assert_eq!(bounds.min, Vector3::new(-2.5, -0.5, -0.5));
        assert_eq!(bounds.max, Vector3::new(2.5, 0.5, 0.5));
        assert!(bounds.contains(Vector3::new(0.0, 0.0, 0.0)));
    }

    #[test]
    fn test_box_union() {
        let a = BoundingBox::new(Vector3::new(0.0, 0.0, 0.0), Vector3::new(1.0, 1.0, 1.0));
        let b = BoundingBox::new(Vector3::new(-1.0, 0.5, 0.0), Vector3::new(0.5, 2.0, 0.5));
        let u = a.union(&b);
        assert_eq!(u.min, Vector3::new(-1.0, 0.0, 0.0));
        assert_eq!(u.max, Vector3::new(1.0, 2.0, 1.0));
    }
}

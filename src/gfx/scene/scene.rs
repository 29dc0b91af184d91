use std::sync::Arc;

use cgmath::{Matrix4, SquareMatrix};

use crate::{
    assets::model::ModelData,
    gfx::resources::{
        material::{Material, MaterialManager, DEFAULT_MATERIAL},
        texture::Background,
    },
};

use super::{
    light::{spot_helper_geometry, Light, LightId, LightKind},
    node::{Mesh, NodeId, SceneNode},
};

/// Main scene containing the node tree, lights, materials and background
///
/// The scene owns every node. Nodes reference each other only through
/// [`NodeId`] indices, and none is removed before the scene is dropped.
pub struct Scene {
    nodes: Vec<SceneNode>,
    root: NodeId,
    lights: Vec<Light>,
    pub material_manager: MaterialManager,
    pub background: Option<Background>,
}

impl Scene {
    /// Creates an empty scene holding only the root node
    pub fn new() -> Self {
        Self {
            nodes: vec![SceneNode::group("Scene")],
            root: NodeId(0),
            lights: Vec::new(),
            material_manager: MaterialManager::new(),
            background: None,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Adds a node under the root
    pub fn add(&mut self, node: SceneNode) -> NodeId {
        self.add_node(self.root, node)
    }

    /// Adds a node as the last child of `parent`
    ///
    /// An unknown parent is a caller bug; the node is attached to the root
    /// instead so it still renders.
    pub fn add_node(&mut self, parent: NodeId, mut node: SceneNode) -> NodeId {
        let parent = if parent.0 < self.nodes.len() {
            parent
        } else {
            log::warn!(
                "Parent node {} not found, attaching '{}' to the scene root",
                parent.0,
                node.name
            );
            self.root
        };

        let id = NodeId(self.nodes.len());
        node.parent = Some(parent);
        node.children.clear();
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        id
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id.0)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// First node with the given name, in insertion order
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.nodes
            .iter()
            .position(|node| node.name == name)
            .map(NodeId)
    }

    /// Composition of every local transform from the root down to `id`
    pub fn world_matrix(&self, id: NodeId) -> Matrix4<f32> {
        let mut world = Matrix4::identity();
        let mut current = self.node(id);
        while let Some(node) = current {
            world = node.transform.matrix() * world;
            current = node.parent.and_then(|parent| self.node(parent));
        }
        world
    }

    /// Visits every mesh under `root` (inclusive) with its world matrix
    ///
    /// With `visible_only`, hidden nodes and their subtrees are skipped.
    pub fn walk<F>(&self, root: NodeId, visible_only: bool, mut visit: F)
    where
        F: FnMut(NodeId, &Mesh, Matrix4<f32>),
    {
        let Some(root_node) = self.node(root) else {
            return;
        };
        let parent_world = root_node
            .parent
            .map(|parent| self.world_matrix(parent))
            .unwrap_or_else(Matrix4::identity);

        let mut stack = vec![(root, parent_world)];
        while let Some((id, parent_world)) = stack.pop() {
            let node = &self.nodes[id.0];
            if visible_only && !node.visible {
                continue;
            }
            let world = parent_world * node.transform.matrix();
            if let Some(mesh) = &node.mesh {
                visit(id, mesh, world);
            }
            // Reverse so children are visited in insertion order
            for child in node.children.iter().rev() {
                stack.push((*child, world));
            }
        }
    }

    /// Adds a light; spot lights also get a wireframe helper node
    pub fn add_light(&mut self, light: Light) -> LightId {
        let id = LightId(self.lights.len());
        let is_spot = matches!(light.kind, LightKind::Spot { .. });
        self.lights.push(light);
        if is_spot {
            self.add_spot_helper(id);
        }
        id
    }

    pub fn light(&self, id: LightId) -> Option<&Light> {
        self.lights.get(id.0)
    }

    pub fn light_mut(&mut self, id: LightId) -> Option<&mut Light> {
        self.lights.get_mut(id.0)
    }

    pub fn lights(&self) -> impl Iterator<Item = (LightId, &Light)> {
        self.lights
            .iter()
            .enumerate()
            .map(|(i, light)| (LightId(i), light))
    }

    fn add_spot_helper(&mut self, id: LightId) {
        let Some(light) = self.light(id) else {
            return;
        };
        let material_name = self
            .material_manager
            .unique_name(&format!("{} helper", light.name));
        let color = light.color;
        let name = format!("{} Helper", light.name);

        self.material_manager
            .add_material(Material::new(&material_name, color));
        let mesh = Mesh::new(Arc::new(spot_helper_geometry()), material_name).wireframe();
        let helper = self.add(SceneNode::with_mesh(name, mesh));

        if let Some(light) = self.light_mut(id) {
            light.helper = Some(helper);
        }
        self.update_light_helper(id);
    }

    /// Re-syncs a light's helper node with the light's current parameters
    pub fn update_light_helper(&mut self, id: LightId) {
        let Some(light) = self.light(id) else {
            return;
        };
        let (Some(helper), Some(transform)) = (light.helper, light.helper_transform()) else {
            return;
        };
        let color = light.color;

        let material = self
            .node(helper)
            .and_then(|node| node.mesh.as_ref())
            .map(|mesh| mesh.material.clone());
        if let Some(material) = material.and_then(|m| self.material_manager.get_material_mut(&m)) {
            material.color = color;
        }
        if let Some(node) = self.node_mut(helper) {
            node.transform = transform;
        }
    }

    /// Inserts a loaded model as one subtree under `parent`
    ///
    /// Materials are registered under unique names first, so the subtree is
    /// complete by the time it becomes reachable from the root.
    pub fn attach_model(&mut self, parent: NodeId, model: ModelData) -> NodeId {
        let ModelData {
            name,
            meshes,
            materials,
        } = model;

        let material_ids: Vec<String> = materials
            .into_iter()
            .map(|mut material| {
                let id = self.material_manager.unique_name(&material.name);
                material.name = id.clone();
                self.material_manager.add_material(material);
                id
            })
            .collect();

        let group = self.add_node(parent, SceneNode::group(name));
        for model_mesh in meshes {
            let material = model_mesh
                .material
                .and_then(|index| material_ids.get(index).cloned())
                .unwrap_or_else(|| DEFAULT_MATERIAL.to_string());
            let mesh = Mesh::new(Arc::new(model_mesh.geometry), material);
            self.add_node(group, SceneNode::with_mesh(model_mesh.name, mesh));
        }
        group
    }

    /// Gets statistics about the scene
    pub fn get_statistics(&self) -> SceneStatistics {
        let meshes = self.nodes.iter().filter_map(|node| node.mesh.as_ref());
        let (mesh_count, total_triangles, total_vertices) =
            meshes.fold((0, 0, 0), |(count, triangles, vertices), mesh| {
                (
                    count + 1,
                    triangles + mesh.geometry.triangle_count(),
                    vertices + mesh.geometry.vertex_count(),
                )
            });

        SceneStatistics {
            node_count: self.nodes.len(),
            mesh_count,
            light_count: self.lights.len(),
            material_count: self.material_manager.list_materials().len(),
            total_triangles,
            total_vertices,
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

/// Scene statistics for debugging and UI display
#[derive(Debug)]
pub struct SceneStatistics {
    pub node_count: usize,
    pub mesh_count: usize,
    pub light_count: usize,
    pub material_count: usize,
    pub total_triangles: usize,
    pub total_vertices: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assets::model::ModelMesh,
        gfx::{color::Color, geometry::generate_cube},
    };
    use cgmath::{Point3, Transform as _, Vector3};

    #[test]
    fn test_parent_links() {
        let mut scene = Scene::new();
        let group = scene.add(SceneNode::group("group"));
        let child = scene.add_node(group, SceneNode::group("child"));

        assert_eq!(scene.node(child).unwrap().parent(), Some(group));
        assert_eq!(scene.node(group).unwrap().children(), &[child]);
        assert_eq!(scene.node(scene.root()).unwrap().children(), &[group]);
    }

    #[test]
    fn test_unknown_parent_falls_back_to_root() {
        let mut scene = Scene::new();
        let orphan = scene.add_node(NodeId(42), SceneNode::group("orphan"));
        assert_eq!(scene.node(orphan).unwrap().parent(), Some(scene.root()));
    }

    #[test]
    fn test_world_matrix_composes_ancestors() {
        let mut scene = Scene::new();
        let a = scene.add(SceneNode::group("a").at(Vector3::new(1.0, 0.0, 0.0)));
        let b = scene.add_node(a, SceneNode::group("b").at(Vector3::new(0.0, 2.0, 0.0)));

        let p = scene.world_matrix(b).transform_point(Point3::new(0.0, 0.0, 0.0));
        assert_eq!(p, Point3::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn test_walk_skips_hidden_subtrees() {
        let mut scene = Scene::new();
        let cube = Arc::new(generate_cube());
        let hidden = scene.add(SceneNode::group("hidden"));
        scene.add_node(hidden, SceneNode::with_mesh("inner", Mesh::new(cube.clone(), "default")));
        scene.add(SceneNode::with_mesh("shown", Mesh::new(cube, "default")));
        scene.node_mut(hidden).unwrap().visible = false;

        let mut visible = 0;
        scene.walk(scene.root(), true, |_, _, _| visible += 1);
        let mut all = 0;
        scene.walk(scene.root(), false, |_, _, _| all += 1);

        assert_eq!(visible, 1);
        assert_eq!(all, 2);
    }

    #[test]
    fn test_spot_light_gets_helper() {
        let mut scene = Scene::new();
        let spot = scene.add_light(Light::spot(Color::WHITE, 150.0).at(Vector3::new(0.0, 10.0, 0.0)));
        let helper = scene.light(spot).unwrap().helper().unwrap();

        let node = scene.node(helper).unwrap();
        assert!(node.mesh.as_ref().unwrap().wireframe);
        assert_eq!(node.transform.position, Vector3::new(0.0, 10.0, 0.0));

        scene.light_mut(spot).unwrap().position = Vector3::new(3.0, 8.0, 0.0);
        scene.update_light_helper(spot);
        assert_eq!(scene.node(helper).unwrap().transform.position, Vector3::new(3.0, 8.0, 0.0));
    }

    #[test]
    fn test_attach_model_registers_materials() {
        let mut scene = Scene::new();
        scene.material_manager.add_material(Material::new("paint", Color::WHITE));

        let model = ModelData {
            name: "windmill".to_string(),
            meshes: vec![
                ModelMesh {
                    name: "blades".to_string(),
                    geometry: generate_cube(),
                    material: Some(0),
                },
                ModelMesh {
                    name: "base".to_string(),
                    geometry: generate_cube(),
                    material: None,
                },
            ],
            materials: vec![Material::new("paint", Color::new(1.0, 0.0, 0.0))],
        };

        let group = scene.attach_model(scene.root(), model);
        let children = scene.node(group).unwrap().children().to_vec();
        assert_eq!(children.len(), 2);

        let blades = scene.node(children[0]).unwrap().mesh.as_ref().unwrap();
        assert_eq!(blades.material, "paint (1)");
        let base = scene.node(children[1]).unwrap().mesh.as_ref().unwrap();
        assert_eq!(base.material, DEFAULT_MATERIAL);
        assert_eq!(scene.get_statistics().mesh_count, 2);
    }
}

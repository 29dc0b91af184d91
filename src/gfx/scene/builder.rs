//! Assembles the viewer's scene
//!
//! Primitives and lights are added synchronously. The background image, the
//! cube texture and the external model are requested from the
//! [`AssetLoader`]; their callbacks fill in the scene when they complete.

use std::sync::Arc;

use cgmath::Vector3;

use crate::{
    assets::{AssetLoader, ModelData},
    config::SceneConfig,
    gfx::{
        camera::frame_bounds,
        color::Color,
        context::SceneContext,
        geometry::{generate_cone, generate_cube, generate_plane, generate_sphere},
        rendering::render_loop::Animation,
        resources::{
            material::Material,
            texture::{Background, ColorSpace, TextureMapping},
        },
    },
};

use super::{
    bounds::compute_bounds,
    light::{Light, LightId},
    node::{Mesh, NodeId, SceneNode},
};

/// x offsets of the spinning cubes, in spin order
pub const CUBE_OFFSETS: [f32; 3] = [0.0, -2.0, 2.0];

const CUBE_MATERIAL: &str = "cube";
const GROUND_MATERIAL: &str = "ground";
const PLATE_MATERIALS: [(&str, u32); 3] = [
    ("plate sphere", 0xcc6644),
    ("plate cone", 0x4477cc),
    ("plate box", 0xd9c45a),
];

/// Handles to what [`build_scene`] created
#[derive(Debug, Clone)]
pub struct BuiltScene {
    pub cubes: Vec<NodeId>,
    pub plate: NodeId,
    pub ground: Option<NodeId>,
    pub directional: LightId,
    pub hemisphere: LightId,
    pub spot: LightId,
}

impl BuiltScene {
    /// Per-frame animations for the built content
    pub fn animations(&self) -> Vec<Animation> {
        if self.cubes.is_empty() {
            return Vec::new();
        }
        vec![Animation::Spin {
            nodes: self.cubes.clone(),
        }]
    }
}

/// Polar placement on the plate
///
/// `angle_index` is fed to `cos`/`sin` as-is, i.e. read as radians, so the
/// primitives scatter around the ring rather than stepping evenly.
pub fn plate_position(radius: f32, angle_index: u32, height: f32) -> Vector3<f32> {
    let angle = angle_index as f32;
    Vector3::new(angle.cos() * radius, height, angle.sin() * radius)
}

pub fn build_scene(config: &SceneConfig, ctx: &mut SceneContext, loader: &mut AssetLoader) -> BuiltScene {
    register_materials(ctx);

    let ground = (config.ground_size > 0.0).then(|| {
        let plane = generate_plane(config.ground_size, config.ground_size, 8, 8);
        ctx.scene
            .add(SceneNode::with_mesh("Ground", Mesh::new(Arc::new(plane), GROUND_MATERIAL)))
    });

    let plate = add_plate(ctx, config);
    let cubes = if config.spinning_cubes {
        add_cubes(ctx)
    } else {
        Vec::new()
    };

    let directional = ctx.scene.add_light(
        Light::directional(Color::from_hex(0xffffff), 2.5)
            .at(Vector3::new(0.0, 10.0, 0.0))
            .aimed_at(Vector3::new(-5.0, 0.0, 0.0)),
    );
    let hemisphere = ctx.scene.add_light(Light::hemisphere(
        Color::from_hex(0xb1e1ff),
        Color::from_hex(0xb97a20),
        2.0,
    ));
    let spot = ctx.scene.add_light(
        Light::spot(Color::from_hex(0xffffff), 150.0)
            .at(Vector3::new(0.0, 10.0, 0.0))
            .aimed_at(Vector3::new(-5.0, 0.0, 0.0)),
    );

    if let Some(background) = &config.background {
        loader.load_texture(background.clone(), |ctx, mut texture| {
            texture.color_space = ColorSpace::Srgb;
            texture.mapping = TextureMapping::EquirectangularReflection;
            ctx.scene.background = Some(Background::Texture(Arc::new(texture)));
        });
    }

    if let (Some(texture), false) = (&config.cube_texture, cubes.is_empty()) {
        loader.load_texture(texture.clone(), |ctx, mut texture| {
            texture.color_space = ColorSpace::Srgb;
            if let Some(material) = ctx.scene.material_manager.get_material_mut(CUBE_MATERIAL) {
                material.color = Color::WHITE;
                material.map = Some(Arc::new(texture));
            }
        });
    }

    if let Some(model) = &config.model {
        loader.load_model(model.obj.clone(), model.mtl.clone(), on_model_loaded);
    }

    let stats = ctx.scene.get_statistics();
    log::info!(
        "Built scene: {} nodes, {} meshes, {} lights",
        stats.node_count,
        stats.mesh_count,
        stats.light_count
    );

    BuiltScene {
        cubes,
        plate,
        ground,
        directional,
        hemisphere,
        spot,
    }
}

/// Attaches a loaded model and frames the camera on it
///
/// The subtree becomes visible in one step. A model without geometry is
/// attached but the camera stays where it is.
pub fn on_model_loaded(ctx: &mut SceneContext, model: ModelData) {
    let name = model.name.clone();
    let root = ctx.scene.root();
    let node = ctx.scene.attach_model(root, model);

    match compute_bounds(&ctx.scene, node) {
        Some(bounds) => {
            let distance = frame_bounds(&bounds, &mut ctx.camera, &mut ctx.controls);
            log::info!(
                "Framed model '{}' (size {:.2}) from {:.2} units",
                name,
                bounds.size(),
                distance
            );
        }
        None => log::warn!("Model '{}' has no geometry to frame", name),
    }
}

fn register_materials(ctx: &mut SceneContext) {
    let materials = &mut ctx.scene.material_manager;
    materials.add_material(Material::new(CUBE_MATERIAL, Color::from_hex(0x44aa88)));
    materials.add_material(Material::new(GROUND_MATERIAL, Color::from_hex(0x8a8a80)));
    for (name, hex) in PLATE_MATERIALS {
        materials.add_material(Material::new(name, Color::from_hex(hex)));
    }
}

fn add_plate(ctx: &mut SceneContext, config: &SceneConfig) -> NodeId {
    let plate = ctx.scene.add(SceneNode::group("Plate"));
    let shapes = [
        Arc::new(generate_sphere(0.5, 24, 12)),
        Arc::new(generate_cone(0.5, 1.0, 16)),
        Arc::new(generate_cube()),
    ];
    let settings = &config.plate;
    let step = settings.angle_step.max(1) as usize;

    let mut index = 0;
    for &radius in &settings.radii {
        for angle_index in (0..360).step_by(step) {
            let kind = index % shapes.len();
            let mesh = Mesh::new(shapes[kind].clone(), PLATE_MATERIALS[kind].0);
            let mut node = SceneNode::with_mesh(format!("Plate {}", index), mesh)
                .at(plate_position(radius, angle_index, settings.height));
            node.transform.scale = Vector3::new(settings.scale, settings.scale, settings.scale);
            ctx.scene.add_node(plate, node);
            index += 1;
        }
    }
    plate
}

fn add_cubes(ctx: &mut SceneContext) -> Vec<NodeId> {
    let cube = Arc::new(generate_cube());
    let group = ctx
        .scene
        .add(SceneNode::group("Cubes").at(Vector3::new(0.0, 2.0, 0.0)));
    CUBE_OFFSETS
        .iter()
        .enumerate()
        .map(|(i, &x)| {
            let node = SceneNode::with_mesh(format!("Cube {}", i), Mesh::new(cube.clone(), CUBE_MATERIAL))
                .at(Vector3::new(x, 0.0, 0.0));
            ctx.scene.add_node(group, node)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        assets::ModelMesh,
        config::{PlateConfig, SceneConfig},
        gfx::camera::PerspectiveCamera,
    };
    use approx::assert_abs_diff_eq;

    fn offline_config() -> SceneConfig {
        SceneConfig {
            model: None,
            background: None,
            cube_texture: None,
            ..Default::default()
        }
    }

    fn context() -> SceneContext {
        let mut camera = PerspectiveCamera::new(45.0, 2.0, 0.1, 100.0);
        camera.position = Vector3::new(0.0, 10.0, 20.0);
        SceneContext::new(crate::gfx::scene::Scene::new(), camera, Vector3::new(0.0, 5.0, 0.0))
    }

    #[test]
    fn test_plate_position_uses_index_as_radians() {
        let p = plate_position(0.2, 90, 1.5);
        assert_abs_diff_eq!(p.x, 90.0_f32.cos() * 0.2, epsilon = 1e-6);
        assert_abs_diff_eq!(p.z, 90.0_f32.sin() * 0.2, epsilon = 1e-6);
        assert_abs_diff_eq!(p.x, -0.0896, epsilon = 1e-3);
        assert_abs_diff_eq!(p.z, 0.1788, epsilon = 1e-3);
        assert_eq!(p.y, 1.5);
    }

    #[test]
    fn test_build_scene_content() {
        let mut ctx = context();
        let mut loader = AssetLoader::new();
        let config = SceneConfig {
            plate: PlateConfig {
                radii: vec![1.0, 2.0],
                angle_step: 90,
                ..Default::default()
            },
            ..offline_config()
        };
        let built = build_scene(&config, &mut ctx, &mut loader);

        assert_eq!(loader.pending(), 0);
        assert_eq!(ctx.scene.node(built.plate).unwrap().children().len(), 8);
        assert!(built.ground.is_some());

        assert_eq!(built.cubes.len(), 3);
        for (id, x) in built.cubes.iter().zip(CUBE_OFFSETS) {
            assert_eq!(ctx.scene.node(*id).unwrap().transform.position.x, x);
        }

        let spot = ctx.scene.light(built.spot).unwrap();
        assert!(spot.helper().is_some());
        assert_eq!(spot.intensity, 150.0);
        assert_eq!(ctx.scene.light(built.hemisphere).unwrap().color.to_hex(), 0xb1e1ff);
        assert_eq!(built.animations().len(), 1);
    }

    #[test]
    fn test_requests_assets() {
        let mut ctx = context();
        let mut loader = AssetLoader::new();
        let config = SceneConfig {
            background: Some("/nonexistent/sky.jpg".into()),
            ..offline_config()
        };
        build_scene(&config, &mut ctx, &mut loader);
        assert_eq!(loader.pending(), 1);

        // A failed load leaves the background alone
        loader.wait_all(&mut ctx);
        assert!(ctx.scene.background.is_none());
    }

    #[test]
    fn test_model_load_frames_camera() {
        let mut ctx = context();
        let mut geometry = generate_cube();
        for v in geometry.vertices.iter_mut() {
            *v = [v[0] * 4.0 + 10.0, v[1] * 4.0, v[2] * 4.0];
        }
        let model = ModelData {
            name: "block".to_string(),
            meshes: vec![ModelMesh {
                name: "block".to_string(),
                geometry,
                material: None,
            }],
            materials: Vec::new(),
        };

        on_model_loaded(&mut ctx, model);

        let size = (3.0_f32 * 16.0).sqrt();
        assert_eq!(ctx.controls.target, Vector3::new(10.0, 0.0, 0.0));
        assert_eq!(ctx.camera.target, Vector3::new(10.0, 0.0, 0.0));
        assert_abs_diff_eq!(ctx.controls.bounds.max_distance, size * 10.0, epsilon = 1e-4);
        assert_abs_diff_eq!(ctx.camera.near, size / 100.0, epsilon = 1e-6);
        assert_abs_diff_eq!(ctx.camera.far, size * 100.0, epsilon = 1e-3);
    }

    #[test]
    fn test_empty_model_keeps_camera() {
        let mut ctx = context();
        let before = ctx.camera.position;
        on_model_loaded(&mut ctx, ModelData::default());
        assert_eq!(ctx.camera.position, before);
        assert_eq!(ctx.camera.near, 0.1);
    }
}

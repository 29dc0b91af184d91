use cgmath::Vector3;

use super::{
    camera::{OrbitControls, PerspectiveCamera},
    scene::Scene,
};

/// Everything the frame loop, load callbacks and parameter panel mutate
///
/// All of it is owned by the thread running the frame loop.
pub struct SceneContext {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
}

impl SceneContext {
    /// Wraps a scene with a camera placed at `position` looking at `target`
    pub fn new(scene: Scene, mut camera: PerspectiveCamera, target: Vector3<f32>) -> Self {
        camera.look_at(target);
        camera.update_projection_matrix();
        let mut controls = OrbitControls::new(&camera, target);
        controls.update(&mut camera);
        Self {
            scene,
            camera,
            controls,
        }
    }
}

impl Default for SceneContext {
    fn default() -> Self {
        Self::new(
            Scene::new(),
            PerspectiveCamera::default(),
            Vector3::new(0.0, 0.0, -1.0),
        )
    }
}

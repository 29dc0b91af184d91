use cgmath::*;

use super::perspective::PerspectiveCamera;

/// Orbit-style controls: the camera circles `target` on a sphere
///
/// The controls keep yaw/pitch/distance around the target and write the
/// resulting eye position into a [`PerspectiveCamera`]. Every operation first
/// re-reads the camera, so code that moves the camera directly (such as
/// auto-framing) stays consistent with the controls.
#[derive(Debug, Clone, Copy)]
pub struct OrbitControls {
    pub target: Vector3<f32>,
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub bounds: OrbitControlsBounds,
    pub enabled: bool,
    home: HomeState,
}

#[derive(Debug, Clone, Copy)]
struct HomeState {
    target: Vector3<f32>,
    distance: f32,
    pitch: f32,
    yaw: f32,
}

impl OrbitControls {
    /// Creates controls around `target`, adopting the camera's current offset
    pub fn new(camera: &PerspectiveCamera, target: Vector3<f32>) -> Self {
        let mut controls = Self {
            target,
            distance: 1.0,
            pitch: 0.0,
            yaw: 0.0,
            bounds: OrbitControlsBounds::default(),
            enabled: true,
            home: HomeState {
                target,
                distance: 1.0,
                pitch: 0.0,
                yaw: 0.0,
            },
        };
        controls.sync_from_camera(camera);
        controls.save_state();
        controls
    }

    /// Re-derives yaw/pitch/distance from where the camera currently is
    pub fn sync_from_camera(&mut self, camera: &PerspectiveCamera) {
        let offset = camera.position - self.target;
        let distance = offset.magnitude();
        if distance <= f32::EPSILON {
            // Keep the previous angles; only the distance is meaningful
            self.distance = 0.0;
            return;
        }
        self.distance = distance;
        self.pitch = (offset.y / distance).clamp(-1.0, 1.0).asin();
        self.yaw = offset.x.atan2(offset.z);
    }

    /// Applies bounds and writes the eye position back into the camera
    pub fn update(&mut self, camera: &mut PerspectiveCamera) {
        self.sync_from_camera(camera);
        self.apply(camera);
    }

    fn apply(&mut self, camera: &mut PerspectiveCamera) {
        self.distance = self
            .distance
            .clamp(self.bounds.min_distance.max(f32::EPSILON), self.bounds.max_distance.max(f32::EPSILON));
        self.pitch = self.pitch.clamp(self.bounds.min_pitch, self.bounds.max_pitch);

        camera.position =
            calculate_cartesian_eye_position(self.pitch, self.yaw, self.distance, self.target);
        camera.look_at(self.target);
    }

    pub fn rotate(&mut self, camera: &mut PerspectiveCamera, delta_yaw: f32, delta_pitch: f32) {
        if !self.enabled {
            return;
        }
        self.sync_from_camera(camera);
        self.yaw += delta_yaw;
        self.pitch += delta_pitch;
        self.apply(camera);
    }

    /// Zooms in (negative) or out (positive), scaled by the current distance
    pub fn dolly(&mut self, camera: &mut PerspectiveCamera, delta: f32) {
        if !self.enabled {
            return;
        }
        self.sync_from_camera(camera);
        let corrected_zoom = self.distance.max(1.0 + f32::EPSILON).log10() * delta;
        self.distance += corrected_zoom;
        self.apply(camera);
    }

    /// Pans the camera relative to the current view direction
    /// delta.0 = horizontal pan (left/right relative to camera view)
    /// delta.1 = vertical pan (up/down relative to camera view)
    pub fn pan(&mut self, camera: &mut PerspectiveCamera, delta: (f32, f32)) {
        if !self.enabled {
            return;
        }
        let forward = self.target - camera.position;
        if forward.magnitude2() <= f32::EPSILON {
            return;
        }
        let forward = forward.normalize();
        let right = forward.cross(camera.up);
        if right.magnitude2() <= f32::EPSILON {
            return;
        }
        let right = right.normalize();
        let up = right.cross(forward).normalize();

        // Scale pan movement by distance for consistent feel at all zoom levels
        let pan_scale = self.distance.max(f32::EPSILON) * 0.1;
        let movement = right * delta.0 * pan_scale + up * delta.1 * pan_scale;

        self.target += movement;
        camera.position += movement;
        camera.look_at(self.target);
    }

    /// Remembers the current pose for [`reset`](Self::reset)
    pub fn save_state(&mut self) {
        self.home = HomeState {
            target: self.target,
            distance: self.distance,
            pitch: self.pitch,
            yaw: self.yaw,
        };
    }

    pub fn reset(&mut self, camera: &mut PerspectiveCamera) {
        self.target = self.home.target;
        self.distance = self.home.distance;
        self.pitch = self.home.pitch;
        self.yaw = self.home.yaw;
        self.apply(camera);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct OrbitControlsBounds {
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for OrbitControlsBounds {
    fn default() -> Self {
        Self {
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_pitch: -std::f32::consts::PI / 2.0 + 1e-3,
            max_pitch: std::f32::consts::PI / 2.0 - 1e-3,
        }
    }
}

fn calculate_cartesian_eye_position(
    pitch: f32,
    yaw: f32,
    distance: f32,
    target: Vector3<f32>,
) -> Vector3<f32> {
    Vector3::new(
        distance * yaw.sin() * pitch.cos(),
        distance * pitch.sin(),
        distance * yaw.cos() * pitch.cos(),
    ) + target
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn camera_at(position: Vector3<f32>) -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(45.0, 1.0, 0.1, 100.0);
        camera.position = position;
        camera
    }

    #[test]
    fn test_update_preserves_pose_within_bounds() {
        let mut camera = camera_at(Vector3::new(0.0, 10.0, 20.0));
        let mut controls = OrbitControls::new(&camera, Vector3::new(0.0, 5.0, 0.0));
        controls.update(&mut camera);

        assert_abs_diff_eq!(camera.position.y, 10.0, epsilon = 1e-4);
        assert_abs_diff_eq!(camera.position.z, 20.0, epsilon = 1e-4);
        assert_eq!(camera.target, Vector3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn test_max_distance_is_enforced() {
        let mut camera = camera_at(Vector3::new(0.0, 0.0, 50.0));
        let mut controls = OrbitControls::new(&camera, Vector3::zero());
        controls.bounds.max_distance = 10.0;
        controls.update(&mut camera);

        assert_abs_diff_eq!(camera.distance_to_target(), 10.0, epsilon = 1e-4);
        assert_abs_diff_eq!(camera.position.z, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_rotate_keeps_distance() {
        let mut camera = camera_at(Vector3::new(0.0, 0.0, 5.0));
        let mut controls = OrbitControls::new(&camera, Vector3::zero());
        controls.rotate(&mut camera, 0.5, 0.25);

        assert_abs_diff_eq!(camera.distance_to_target(), 5.0, epsilon = 1e-4);
        assert!(camera.position.x > 0.0);
        assert!(camera.position.y > 0.0);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut camera = camera_at(Vector3::new(0.0, 0.0, 5.0));
        let mut controls = OrbitControls::new(&camera, Vector3::zero());
        controls.rotate(&mut camera, 0.0, 10.0);
        assert!(controls.pitch <= controls.bounds.max_pitch);
        assert!(camera.position.z.abs() > 0.0);
    }

    #[test]
    fn test_pan_moves_target_and_camera_together() {
        let mut camera = camera_at(Vector3::new(0.0, 0.0, 5.0));
        let mut controls = OrbitControls::new(&camera, Vector3::zero());
        let before = camera.position - controls.target;
        controls.pan(&mut camera, (1.0, 0.0));
        let after = camera.position - controls.target;

        assert!(controls.target.x > 0.0);
        assert_abs_diff_eq!((after - before).magnitude(), 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_reset_returns_home() {
        let mut camera = camera_at(Vector3::new(0.0, 2.0, 8.0));
        let mut controls = OrbitControls::new(&camera, Vector3::zero());
        let home = camera.position;

        controls.rotate(&mut camera, 1.0, 0.3);
        controls.dolly(&mut camera, 5.0);
        controls.reset(&mut camera);

        assert_abs_diff_eq!((camera.position - home).magnitude(), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_disabled_controls_ignore_input() {
        let mut camera = camera_at(Vector3::new(0.0, 0.0, 5.0));
        let mut controls = OrbitControls::new(&camera, Vector3::zero());
        controls.enabled = false;
        controls.rotate(&mut camera, 1.0, 1.0);
        assert_eq!(camera.position, Vector3::new(0.0, 0.0, 5.0));
    }
}

use cgmath::*;

use super::camera_utils::{CameraUniform, OPENGL_TO_WGPU_MATRIX};

/// Smallest near plane the projection will ever use
pub const MIN_NEAR: f32 = 1e-4;
/// Field of view is kept strictly inside (0, 180) degrees
pub const MIN_FOV: f32 = 1e-3;
pub const MAX_FOV: f32 = 180.0 - 1e-3;

/// Perspective camera looking from `position` at `target`
///
/// Field of view is vertical and in degrees. The projection matrix is cached
/// and only changes when [`update_projection_matrix`](Self::update_projection_matrix)
/// is called, so edit `fov`, `aspect`, `near` or `far` and then update.
#[derive(Debug, Clone, Copy)]
pub struct PerspectiveCamera {
    pub position: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    projection: Matrix4<f32>,
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Vector3::zero(),
            target: -Vector3::unit_z(),
            up: Vector3::unit_y(),
            fov,
            aspect,
            near,
            far,
            projection: Matrix4::identity(),
        };
        camera.update_projection_matrix();
        camera
    }

    /// Points the camera at `point` without moving it
    pub fn look_at(&mut self, point: Vector3<f32>) {
        self.target = point;
    }

    /// Rebuilds the cached projection from fov, aspect, near and far
    ///
    /// Out-of-range values are clamped for the matrix only; the fields keep
    /// whatever the caller stored.
    pub fn update_projection_matrix(&mut self) {
        let fov = self.fov.clamp(MIN_FOV, MAX_FOV);
        let aspect = if self.aspect.is_finite() && self.aspect > 0.0 {
            self.aspect
        } else {
            1.0
        };
        let near = self.near.max(MIN_NEAR);
        let far = self.far.max(near * 1.0001 + MIN_NEAR);

        self.projection = OPENGL_TO_WGPU_MATRIX * perspective(Deg(fov), aspect, near, far);
    }

    /// Updates the aspect ratio from a surface size
    ///
    /// Returns false and leaves the camera untouched for a zero-sized surface.
    pub fn set_aspect(&mut self, width: u32, height: u32) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.aspect = width as f32 / height as f32;
        true
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        let forward = self.target - self.position;
        let target = if forward.magnitude2() <= f32::EPSILON {
            self.position - Vector3::unit_z()
        } else {
            self.target
        };
        Matrix4::look_at_rh(
            Point3::from_vec(self.position),
            Point3::from_vec(target),
            self.up,
        )
    }

    pub fn view_projection_matrix(&self) -> Matrix4<f32> {
        self.projection * self.view_matrix()
    }

    pub fn distance_to_target(&self) -> f32 {
        (self.position - self.target).magnitude()
    }

    pub fn uniform(&self) -> CameraUniform {
        CameraUniform {
            view_position: self.position.extend(1.0).into(),
            view_proj: self.view_projection_matrix().into(),
        }
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(50.0, 1.0, 0.1, 2000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_zero_height_keeps_aspect() {
        let mut camera = PerspectiveCamera::new(75.0, 2.0, 0.1, 5.0);
        assert!(!camera.set_aspect(800, 0));
        assert_eq!(camera.aspect, 2.0);
        assert!(camera.set_aspect(400, 300));
        assert_abs_diff_eq!(camera.aspect, 400.0 / 300.0);
    }

    #[test]
    fn test_projection_is_finite_for_bad_input() {
        let mut camera = PerspectiveCamera::new(0.0, 0.0, 0.0, 0.0);
        camera.update_projection_matrix();
        let m = camera.projection_matrix();
        for col in 0..4 {
            for row in 0..4 {
                assert!(m[col][row].is_finite());
            }
        }
    }

    #[test]
    fn test_depth_maps_into_wgpu_range() {
        let mut camera = PerspectiveCamera::new(90.0, 1.0, 1.0, 10.0);
        camera.update_projection_matrix();
        let proj = camera.projection_matrix();

        let near = proj * Vector4::new(0.0, 0.0, -1.0, 1.0);
        let far = proj * Vector4::new(0.0, 0.0, -10.0, 1.0);
        assert_abs_diff_eq!(near.z / near.w, 0.0, epsilon = 1e-5);
        assert_abs_diff_eq!(far.z / far.w, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_degenerate_view_is_finite() {
        let mut camera = PerspectiveCamera::default();
        camera.position = Vector3::new(1.0, 1.0, 1.0);
        camera.look_at(Vector3::new(1.0, 1.0, 1.0));
        let m = camera.view_matrix();
        assert!(m.x.x.is_finite() && m.w.z.is_finite());
    }
}

//! Auto-framing: move a camera so a bounded region fills the view
//!
//! Distance comes from the vertical field of view:
//! `distance = (size_to_fit / 2) / tan(fov / 2)`. The camera keeps its
//! horizontal bearing around the region, so reframing after a new model
//! loads only changes how far away it sits.

use cgmath::{InnerSpace, Vector3};

use super::{orbit_controls::OrbitControls, perspective::PerspectiveCamera};
use crate::gfx::scene::BoundingBox;

/// Extra margin applied to a bounding box diagonal before framing it
pub const FRAME_MARGIN: f32 = 1.2;
/// Orbit controls may back off this many box sizes from the framed center
pub const MAX_DISTANCE_FACTOR: f32 = 10.0;

/// Repositions `camera` so a region of diagonal `size_to_fit` is fully visible
///
/// `near` and `far` are rescaled to `box_size / 100` and `box_size * 100`,
/// the camera looks at `box_center` and the projection is rebuilt. Returns the
/// viewing distance. Calling this twice with the same arguments leaves the
/// camera unchanged the second time.
pub fn frame_area(
    size_to_fit: f32,
    box_size: f32,
    box_center: Vector3<f32>,
    camera: &mut PerspectiveCamera,
) -> f32 {
    let half_size_to_fit = size_to_fit * 0.5;
    let half_fov_y = camera.fov.to_radians() * 0.5;
    let distance = half_size_to_fit / half_fov_y.tan();

    // Horizontal bearing from the center to the camera; +Z when the camera
    // sits directly above or below the center
    let offset = camera.position - box_center;
    let horizontal = Vector3::new(offset.x, 0.0, offset.z);
    let direction = if horizontal.magnitude2() > f32::EPSILON {
        horizontal.normalize()
    } else {
        Vector3::unit_z()
    };

    camera.position = direction * distance + box_center;
    camera.near = box_size / 100.0;
    camera.far = box_size * 100.0;
    camera.update_projection_matrix();
    camera.look_at(box_center);

    log::debug!(
        "Framed region of size {:.3} at ({:.3}, {:.3}, {:.3}) from distance {:.3}",
        box_size,
        box_center.x,
        box_center.y,
        box_center.z,
        distance
    );

    distance
}

/// Frames a bounding box and retargets orbit controls onto its center
///
/// The controls' maximum distance grows to a multiple of the box size so the
/// user can still zoom out around large models.
pub fn frame_bounds(
    bounds: &BoundingBox,
    camera: &mut PerspectiveCamera,
    controls: &mut OrbitControls,
) -> f32 {
    let box_size = bounds.size();
    let box_center = bounds.center();

    let distance = frame_area(box_size * FRAME_MARGIN, box_size, box_center, camera);

    controls.bounds.max_distance = box_size * MAX_DISTANCE_FACTOR;
    controls.target = box_center;
    controls.update(camera);
    controls.save_state();

    distance
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn camera() -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(45.0, 2.0, 0.1, 100.0);
        camera.position = Vector3::new(0.0, 10.0, 20.0);
        camera.look_at(Vector3::new(0.0, 5.0, 0.0));
        camera
    }

    #[test]
    fn test_distance_matches_field_of_view() {
        let mut camera = camera();
        let distance = frame_area(2.0, 2.0, Vector3::new(0.0, 0.0, 0.0), &mut camera);

        let expected = 1.0 / (22.5_f32.to_radians()).tan();
        assert_abs_diff_eq!(distance, expected, epsilon = 1e-5);
        assert_abs_diff_eq!(camera.distance_to_target(), expected, epsilon = 1e-4);
    }

    #[test]
    fn test_clip_planes_scale_with_box() {
        for &(fov, size) in &[(1.0_f32, 0.01_f32), (45.0, 3.0), (120.0, 500.0), (179.0, 1.0)] {
            let mut camera = camera();
            camera.fov = fov;
            let distance = frame_area(size * 1.2, size, Vector3::new(1.0, 2.0, 3.0), &mut camera);

            assert!(distance > 0.0);
            assert_eq!(camera.near, size / 100.0);
            assert_eq!(camera.far, size * 100.0);
            assert!(camera.near < camera.far);
        }
    }

    #[test]
    fn test_horizontal_bearing_is_kept() {
        let mut camera = camera();
        camera.position = Vector3::new(3.0, 7.0, 4.0);
        frame_area(1.0, 1.0, Vector3::new(0.0, 0.0, 0.0), &mut camera);

        let bearing = Vector3::new(camera.position.x, 0.0, camera.position.z).normalize();
        assert_abs_diff_eq!(bearing.x, 0.6, epsilon = 1e-5);
        assert_abs_diff_eq!(bearing.z, 0.8, epsilon = 1e-5);
        assert_abs_diff_eq!(camera.position.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_framing_is_idempotent() {
        let mut camera = camera();
        let center = Vector3::new(0.5, 1.0, -2.0);
        frame_area(4.8, 4.0, center, &mut camera);
        let first = camera;
        frame_area(4.8, 4.0, center, &mut camera);

        assert_abs_diff_eq!((camera.position - first.position).magnitude(), 0.0, epsilon = 1e-5);
        assert_eq!(camera.target, first.target);
        assert_eq!(camera.near, first.near);
        assert_eq!(camera.far, first.far);
    }

    #[test]
    fn test_camera_above_center_falls_back_to_z() {
        let mut camera = camera();
        camera.position = Vector3::new(0.0, 50.0, 0.0);
        let distance = frame_area(1.0, 1.0, Vector3::new(0.0, 0.0, 0.0), &mut camera);

        assert_abs_diff_eq!(camera.position.z, distance, epsilon = 1e-5);
        assert!(camera.position.x.is_finite() && camera.position.y.is_finite());
    }

    #[test]
    fn test_frame_bounds_retargets_controls() {
        let mut camera = camera();
        let mut controls = OrbitControls::new(&camera, camera.target);
        let bounds = BoundingBox::new(Vector3::new(-1.0, 0.0, -1.0), Vector3::new(1.0, 2.0, 1.0));

        let distance = frame_bounds(&bounds, &mut camera, &mut controls);

        assert_eq!(controls.target, Vector3::new(0.0, 1.0, 0.0));
        assert_abs_diff_eq!(controls.bounds.max_distance, bounds.size() * 10.0, epsilon = 1e-5);
        assert_abs_diff_eq!(camera.distance_to_target(), distance, epsilon = 1e-4);
        assert_eq!(camera.target, Vector3::new(0.0, 1.0, 0.0));
    }
}

use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
};

use super::{orbit_controls::OrbitControls, perspective::PerspectiveCamera};

/// Translates raw mouse and keyboard input into orbit control moves
///
/// Drag rotates around the target, shift + drag pans, the wheel dollies and
/// shift + C returns to the last saved pose.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    is_shift_held: bool,
    is_mouse_pressed: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            is_shift_held: false,
            is_mouse_pressed: false,
        }
    }

    /// Applies a device event; returns true when the camera moved
    pub fn process_events(
        &mut self,
        event: &DeviceEvent,
        camera: &mut PerspectiveCamera,
        controls: &mut OrbitControls,
    ) -> bool {
        match event {
            DeviceEvent::Button {
                button: 0, // Left Mouse Button
                state,
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
                false
            }
            DeviceEvent::MouseWheel { delta } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32
                    }
                };
                controls.dolly(camera, scroll_amount * self.zoom_speed);
                true
            }
            DeviceEvent::MouseMotion { delta } if self.is_mouse_pressed => {
                if self.is_shift_held {
                    controls.pan(
                        camera,
                        (
                            -delta.0 as f32 * self.pan_speed,
                            delta.1 as f32 * self.pan_speed,
                        ),
                    );
                } else {
                    controls.rotate(
                        camera,
                        -delta.0 as f32 * self.rotate_speed,
                        delta.1 as f32 * self.rotate_speed,
                    );
                }
                true
            }
            _ => false,
        }
    }

    pub fn process_keyed_events(
        &mut self,
        event: &KeyEvent,
        camera: &mut PerspectiveCamera,
        controls: &mut OrbitControls,
    ) {
        match event {
            KeyEvent {
                physical_key: PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight),
                state,
                ..
            } => self.set_shift_held(*state == ElementState::Pressed),
            KeyEvent {
                physical_key: PhysicalKey::Code(KeyCode::KeyC),
                state: ElementState::Pressed,
                ..
            } if self.is_shift_held => {
                log::info!("Resetting camera to its saved position");
                controls.reset(camera);
            }
            _ => (),
        }
    }

    pub fn set_shift_held(&mut self, held: bool) {
        if held != self.is_shift_held {
            log::trace!("Shift state changed: {}", held);
        }
        self.is_shift_held = held;
    }

    /// Returns true if currently panning
    pub fn is_panning(&self) -> bool {
        self.is_mouse_pressed && self.is_shift_held
    }

    /// Returns true if currently rotating
    pub fn is_rotating(&self) -> bool {
        self.is_mouse_pressed && !self.is_shift_held
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(0.005, 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{InnerSpace, Vector3, Zero};

    fn rig() -> (PerspectiveCamera, OrbitControls) {
        let mut camera = PerspectiveCamera::default();
        camera.position = Vector3::new(0.0, 0.0, 10.0);
        let controls = OrbitControls::new(&camera, Vector3::zero());
        (camera, controls)
    }

    #[test]
    fn test_motion_without_button_is_ignored() {
        let (mut camera, mut controls) = rig();
        let mut controller = CameraController::default();
        let moved = controller.process_events(
            &DeviceEvent::MouseMotion { delta: (10.0, 0.0) },
            &mut camera,
            &mut controls,
        );
        assert!(!moved);
        assert_eq!(camera.position, Vector3::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn test_drag_rotates_and_shift_drag_pans() {
        let (mut camera, mut controls) = rig();
        let mut controller = CameraController::default();
        controller.process_events(
            &DeviceEvent::Button { button: 0, state: ElementState::Pressed },
            &mut camera,
            &mut controls,
        );
        assert!(controller.is_rotating());

        controller.process_events(
            &DeviceEvent::MouseMotion { delta: (40.0, 0.0) },
            &mut camera,
            &mut controls,
        );
        assert!(camera.position.x.abs() > 1e-3);
        assert!(controls.target.magnitude() < 1e-6);

        controller.set_shift_held(true);
        assert!(controller.is_panning());
        controller.process_events(
            &DeviceEvent::MouseMotion { delta: (40.0, 0.0) },
            &mut camera,
            &mut controls,
        );
        assert!(controls.target.magnitude() > 1e-3);
    }

    #[test]
    fn test_wheel_dollies() {
        let (mut camera, mut controls) = rig();
        let mut controller = CameraController::default();
        controller.process_events(
            &DeviceEvent::MouseWheel { delta: MouseScrollDelta::LineDelta(0.0, 1.0) },
            &mut camera,
            &mut controls,
        );
        assert!(camera.distance_to_target() < 10.0);
    }
}

pub mod camera_controller;
pub mod camera_utils;
pub mod framing;
pub mod orbit_controls;
pub mod perspective;

// Re-export main types
pub use camera_controller::CameraController;
pub use camera_utils::CameraUniform;
pub use framing::{frame_area, frame_bounds};
pub use orbit_controls::{OrbitControls, OrbitControlsBounds};
pub use perspective::PerspectiveCamera;

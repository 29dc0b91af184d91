//! # User Interface Module
//!
//! Dear ImGui integration plus the parameter panel used to tune the camera
//! and lights while the viewer runs.
//!
//! ## Key Components
//!
//! - [`UiManager`] - ImGui context, winit platform glue and wgpu renderer
//! - [`ParameterPanel`] - Folders of [`PropertyBinding`]s drawn as sliders
//!   and color pickers
//! - [`property`] - Named property access and the adapters bindings use
//!
//! ## Input Handling
//!
//! While the UI holds the pointer or keyboard, camera controls are paused.

pub mod manager;
pub mod panel;
pub mod property;

// Re-export main types
pub use manager::UiManager;
pub use panel::{Folder, ParameterPanel, NEAR_FAR_GAP};
pub use property::{
    BindingTarget, Control, Properties, PropertyAdapter, PropertyBinding, RangeCoupling, Value,
};

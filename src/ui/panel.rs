// src/ui/panel.rs
//! Parameter panel for live camera and light tuning
//!
//! The panel is a list of named folders, each holding [`PropertyBinding`]s.
//! Bindings can be driven headless through [`ParameterPanel::set`] or drawn
//! with Dear ImGui through [`ParameterPanel::render`]; both paths go through
//! the same adapter and on-change callback.

use crate::{
    error::PropertyError,
    gfx::{color::Color, context::SceneContext, scene::LightId},
};

use super::property::{
    BindingTarget, Control, PropertyAdapter, PropertyBinding, RangeCoupling, Value,
};

/// Smallest gap kept between the camera near and far planes
pub const NEAR_FAR_GAP: f32 = 0.1;

/// A titled group of bindings
#[derive(Debug, Clone)]
pub struct Folder {
    pub name: String,
    pub bindings: Vec<PropertyBinding>,
}

impl Folder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            bindings: Vec::new(),
        }
    }

    pub fn add(mut self, binding: PropertyBinding) -> Self {
        self.bindings.push(binding);
        self
    }

    pub fn binding(&self, label: &str) -> Option<&PropertyBinding> {
        self.bindings.iter().find(|b| b.label == label)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParameterPanel {
    pub title: String,
    folders: Vec<Folder>,
}

impl ParameterPanel {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            folders: Vec::new(),
        }
    }

    /// Camera plus one folder per light kind
    pub fn standard(directional: LightId, hemisphere: LightId, spot: LightId) -> Self {
        let mut panel = Self::new("Parameters");
        panel.add_folder(camera_folder());
        panel.add_folder(directional_light_folder(directional));
        panel.add_folder(hemisphere_light_folder(hemisphere));
        panel.add_folder(spot_light_folder(spot));
        panel
    }

    pub fn add_folder(&mut self, folder: Folder) {
        self.folders.push(folder);
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    pub fn binding(&self, folder: &str, label: &str) -> Option<&PropertyBinding> {
        self.folders
            .iter()
            .find(|f| f.name == folder)
            .and_then(|f| f.binding(label))
    }

    fn find(&self, folder: &str, label: &str) -> Result<&PropertyBinding, PropertyError> {
        self.binding(folder, label)
            .ok_or_else(|| PropertyError::Unknown(format!("{}/{}", folder, label)))
    }

    pub fn get(&self, ctx: &SceneContext, folder: &str, label: &str) -> Result<Value, PropertyError> {
        self.find(folder, label)?.get(ctx)
    }

    /// Sets a bound value exactly as the control would
    pub fn set(
        &self,
        ctx: &mut SceneContext,
        folder: &str,
        label: &str,
        value: Value,
    ) -> Result<(), PropertyError> {
        self.find(folder, label)?.set(ctx, value)
    }

    /// Draws the panel and applies any edits made this frame
    pub fn render(&self, ui: &imgui::Ui, ctx: &mut SceneContext) {
        let display_size = ui.io().display_size;
        // Guard against invalid display size that could cause crashes
        if display_size[0] <= 0.0 || display_size[1] <= 0.0 {
            return;
        }

        ui.window(&self.title)
            .size([320.0, 520.0], imgui::Condition::FirstUseEver)
            .position([20.0, 20.0], imgui::Condition::FirstUseEver)
            .resizable(true)
            .collapsible(true)
            .build(|| {
                for folder in &self.folders {
                    if ui.collapsing_header(&folder.name, imgui::TreeNodeFlags::DEFAULT_OPEN) {
                        for binding in &folder.bindings {
                            render_binding(ui, ctx, &folder.name, binding);
                        }
                    }
                }
            });
    }
}

fn render_binding(ui: &imgui::Ui, ctx: &mut SceneContext, folder: &str, binding: &PropertyBinding) {
    // Labels repeat across folders, so the folder name keeps imgui ids unique
    let label = format!("{}##{}", binding.label, folder);

    let result = match (binding.control, binding.get(ctx)) {
        (Control::Slider { min, max, .. }, Ok(Value::Number(mut v))) => {
            if ui.slider(&label, min, max, &mut v) {
                binding.set(ctx, Value::Number(v))
            } else {
                Ok(())
            }
        }
        (Control::ColorPicker, Ok(value)) => {
            let current = match value {
                Value::Color(c) => Some(c),
                Value::Hex(hex) => Color::parse_hex(&hex),
                Value::Number(_) => None,
            };
            let mut rgb = current.unwrap_or(Color::BLACK).to_srgb_array();
            if ui.color_edit3(&label, &mut rgb) {
                binding.set(ctx, Value::Hex(Color::from_srgb_array(rgb).to_hex_string()))
            } else {
                Ok(())
            }
        }
        (_, Ok(_)) => {
            ui.text_disabled(format!("{} (unsupported)", binding.label));
            Ok(())
        }
        (_, Err(e)) => Err(e),
    };

    if let Err(e) = result {
        log::warn!("Parameter {}/{}: {}", folder, binding.label, e);
    }
}

fn update_camera(ctx: &mut SceneContext, _target: BindingTarget) {
    ctx.camera.update_projection_matrix();
}

fn update_light(ctx: &mut SceneContext, target: BindingTarget) {
    if let BindingTarget::Light(id) = target {
        ctx.scene.update_light_helper(id);
    }
}

fn light_binding(label: &str, light: LightId, adapter: PropertyAdapter, control: Control) -> PropertyBinding {
    PropertyBinding::new(label, BindingTarget::Light(light), adapter, control).on_change(update_light)
}

fn position_bindings(folder: Folder, light: LightId, field: &str) -> Folder {
    [("x", -10.0, 10.0), ("y", 0.0, 10.0), ("z", -10.0, 10.0)]
        .into_iter()
        .fold(folder, |folder, (axis, min, max)| {
            let property = format!("{}.{}", field, axis);
            folder.add(light_binding(
                &property,
                light,
                PropertyAdapter::direct(&property),
                Control::slider(min, max),
            ))
        })
}

/// fov, near and far; near/far keep at least [`NEAR_FAR_GAP`] between them
pub fn camera_folder() -> Folder {
    let coupling = RangeCoupling::new("near", "far", NEAR_FAR_GAP);
    let camera = |label: &str, adapter, control| {
        PropertyBinding::new(label, BindingTarget::Camera, adapter, control).on_change(update_camera)
    };
    Folder::new("Camera")
        .add(camera("fov", PropertyAdapter::direct("fov"), Control::slider(1.0, 180.0)))
        .add(camera(
            "near",
            PropertyAdapter::Min(coupling.clone()),
            Control::stepped(0.1, 50.0, 0.1),
        ))
        .add(camera(
            "far",
            PropertyAdapter::Max(coupling),
            Control::stepped(0.1, 50.0, 0.1),
        ))
}

pub fn directional_light_folder(light: LightId) -> Folder {
    let folder = Folder::new("Directional Light")
        .add(light_binding("color", light, PropertyAdapter::color("color"), Control::ColorPicker))
        .add(light_binding(
            "intensity",
            light,
            PropertyAdapter::direct("intensity"),
            Control::stepped(0.0, 5.0, 0.01),
        ));
    position_bindings(folder, light, "target")
}

pub fn hemisphere_light_folder(light: LightId) -> Folder {
    Folder::new("Hemisphere Light")
        .add(light_binding("sky color", light, PropertyAdapter::color("color"), Control::ColorPicker))
        .add(light_binding(
            "ground color",
            light,
            PropertyAdapter::color("ground_color"),
            Control::ColorPicker,
        ))
        .add(light_binding(
            "intensity",
            light,
            PropertyAdapter::direct("intensity"),
            Control::stepped(0.0, 5.0, 0.01),
        ))
}

pub fn spot_light_folder(light: LightId) -> Folder {
    let folder = Folder::new("Spot Light")
        .add(light_binding("color", light, PropertyAdapter::color("color"), Control::ColorPicker))
        .add(light_binding(
            "intensity",
            light,
            PropertyAdapter::direct("intensity"),
            Control::slider(0.0, 250.0),
        ))
        .add(light_binding(
            "distance",
            light,
            PropertyAdapter::direct("distance"),
            Control::slider(0.0, 40.0),
        ))
        .add(light_binding(
            "angle",
            light,
            PropertyAdapter::degrees("angle"),
            Control::slider(0.0, 90.0),
        ))
        .add(light_binding(
            "penumbra",
            light,
            PropertyAdapter::direct("penumbra"),
            Control::stepped(0.0, 1.0, 0.01),
        ));
    let folder = position_bindings(folder, light, "position");
    position_bindings(folder, light, "target")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::{Light, LightKind};
    use approx::assert_abs_diff_eq;
    use cgmath::Vector3;

    fn panel_with_spot() -> (ParameterPanel, SceneContext, LightId) {
        let mut ctx = SceneContext::default();
        let spot = ctx.scene.add_light(
            Light::spot(Color::WHITE, 150.0)
                .at(Vector3::new(0.0, 10.0, 0.0))
                .aimed_at(Vector3::new(-5.0, 0.0, 0.0)),
        );
        let mut panel = ParameterPanel::new("Parameters");
        panel.add_folder(camera_folder());
        panel.add_folder(spot_light_folder(spot));
        (panel, ctx, spot)
    }

    #[test]
    fn test_camera_near_far_gap() {
        let (panel, mut ctx, _) = panel_with_spot();
        ctx.camera.far = 5.0;
        panel.set(&mut ctx, "Camera", "near", Value::Number(10.0)).unwrap();

        assert_abs_diff_eq!(ctx.camera.near, 10.0, epsilon = 1e-5);
        assert!(ctx.camera.far >= ctx.camera.near + NEAR_FAR_GAP - 1e-5);

        panel.set(&mut ctx, "Camera", "far", Value::Number(3.0)).unwrap();
        assert!(ctx.camera.far >= ctx.camera.near + NEAR_FAR_GAP - 1e-5);
    }

    #[test]
    fn test_camera_change_updates_projection() {
        let (panel, mut ctx, _) = panel_with_spot();
        let before = ctx.camera.projection_matrix();
        panel.set(&mut ctx, "Camera", "fov", Value::Number(75.0)).unwrap();
        assert_ne!(ctx.camera.projection_matrix(), before);
    }

    #[test]
    fn test_spot_angle_in_degrees_moves_helper() {
        let (panel, mut ctx, spot) = panel_with_spot();
        let helper = ctx.scene.light(spot).unwrap().helper().unwrap();
        let before = ctx.scene.node(helper).unwrap().transform.scale;

        panel.set(&mut ctx, "Spot Light", "angle", Value::Number(30.0)).unwrap();

        let LightKind::Spot { angle, .. } = ctx.scene.light(spot).unwrap().kind else {
            panic!("expected a spot light");
        };
        assert_abs_diff_eq!(angle, 30.0_f32.to_radians(), epsilon = 1e-6);
        assert_ne!(ctx.scene.node(helper).unwrap().transform.scale, before);
        assert_abs_diff_eq!(
            panel.get(&ctx, "Spot Light", "angle").unwrap().as_number().unwrap(),
            30.0,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_unknown_binding() {
        let (panel, mut ctx, _) = panel_with_spot();
        assert!(matches!(
            panel.set(&mut ctx, "Camera", "zoom", Value::Number(1.0)),
            Err(PropertyError::Unknown(_))
        ));
    }

    #[test]
    fn test_color_picker_round_trip() {
        let (panel, mut ctx, spot) = panel_with_spot();
        panel
            .set(&mut ctx, "Spot Light", "color", Value::Hex("#ff8000".to_string()))
            .unwrap();
        assert_eq!(ctx.scene.light(spot).unwrap().color.to_hex(), 0xff8000);
        assert_eq!(
            panel.get(&ctx, "Spot Light", "color").unwrap(),
            Value::Hex("#ff8000".to_string())
        );
    }
}

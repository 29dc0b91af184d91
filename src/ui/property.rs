//! Named properties and the adapters that expose them to UI controls
//!
//! Cameras, lights and node transforms publish their editable fields through
//! the [`Properties`] trait. A [`PropertyAdapter`] sits between a control and
//! a property when the control needs a different view of the value: degrees
//! instead of radians, a min/max pair that must keep a gap, or a color as an
//! sRGB hex string.

use cgmath::Vector3;

use crate::{
    error::PropertyError,
    gfx::{
        camera::PerspectiveCamera,
        color::Color,
        context::SceneContext,
        scene::{Light, LightId, LightKind, NodeId, Transform},
    },
};

/// A property value as seen by controls
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f32),
    Color(Color),
    /// `#rrggbb`, sRGB encoded
    Hex(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f32> {
        match self {
            Value::Number(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Number(v)
    }
}

impl From<Color> for Value {
    fn from(c: Color) -> Self {
        Value::Color(c)
    }
}

/// Get and set named properties
///
/// Vector fields are addressed per component, e.g. `position.x`.
pub trait Properties {
    fn property(&self, name: &str) -> Option<Value>;
    fn set_property(&mut self, name: &str, value: Value) -> Result<(), PropertyError>;
}

fn number(name: &str, value: &Value) -> Result<f32, PropertyError> {
    let v = value.as_number().ok_or_else(|| PropertyError::TypeMismatch {
        property: name.to_string(),
        expected: "number",
    })?;
    if !v.is_finite() {
        return Err(PropertyError::NonFinite(name.to_string()));
    }
    Ok(v)
}

fn color(name: &str, value: &Value) -> Result<Color, PropertyError> {
    match value {
        Value::Color(c) => Ok(*c),
        Value::Hex(text) => {
            Color::parse_hex(text).ok_or_else(|| PropertyError::InvalidHex(text.clone()))
        }
        Value::Number(_) => Err(PropertyError::TypeMismatch {
            property: name.to_string(),
            expected: "color",
        }),
    }
}

fn component(v: &Vector3<f32>, axis: &str) -> Option<f32> {
    match axis {
        "x" => Some(v.x),
        "y" => Some(v.y),
        "z" => Some(v.z),
        _ => None,
    }
}

fn component_mut<'a>(v: &'a mut Vector3<f32>, axis: &str) -> Option<&'a mut f32> {
    match axis {
        "x" => Some(&mut v.x),
        "y" => Some(&mut v.y),
        "z" => Some(&mut v.z),
        _ => None,
    }
}

fn unknown(name: &str) -> PropertyError {
    PropertyError::Unknown(name.to_string())
}

impl Properties for PerspectiveCamera {
    fn property(&self, name: &str) -> Option<Value> {
        match name {
            "fov" => Some(self.fov.into()),
            "aspect" => Some(self.aspect.into()),
            "near" => Some(self.near.into()),
            "far" => Some(self.far.into()),
            _ => {
                let (field, axis) = name.split_once('.')?;
                match field {
                    "position" => component(&self.position, axis).map(Value::Number),
                    "target" => component(&self.target, axis).map(Value::Number),
                    _ => None,
                }
            }
        }
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        let v = number(name, &value)?;
        let out_of_range = || PropertyError::OutOfRange {
            property: name.to_string(),
            value: v,
        };
        match name {
            "fov" if v <= 0.0 || v >= 180.0 => return Err(out_of_range()),
            "fov" => self.fov = v,
            "aspect" | "near" | "far" if v <= 0.0 => return Err(out_of_range()),
            "aspect" => self.aspect = v,
            "near" => self.near = v,
            "far" => self.far = v,
            _ => {
                let (field, axis) = name.split_once('.').ok_or_else(|| unknown(name))?;
                let slot = match field {
                    "position" => component_mut(&mut self.position, axis),
                    "target" => component_mut(&mut self.target, axis),
                    _ => None,
                };
                *slot.ok_or_else(|| unknown(name))? = v;
            }
        }
        Ok(())
    }
}

impl Properties for Light {
    fn property(&self, name: &str) -> Option<Value> {
        match (name, &self.kind) {
            ("color", _) => Some(self.color.into()),
            ("intensity", _) => Some(self.intensity.into()),
            ("ground_color", LightKind::Hemisphere { ground_color }) => Some((*ground_color).into()),
            ("distance", LightKind::Spot { distance, .. }) => Some((*distance).into()),
            ("angle", LightKind::Spot { angle, .. }) => Some((*angle).into()),
            ("penumbra", LightKind::Spot { penumbra, .. }) => Some((*penumbra).into()),
            ("decay", LightKind::Spot { decay, .. }) => Some((*decay).into()),
            _ => {
                let (field, axis) = name.split_once('.')?;
                match field {
                    "position" => component(&self.position, axis).map(Value::Number),
                    "target" => component(&self.target()?, axis).map(Value::Number),
                    _ => None,
                }
            }
        }
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        match (name, &mut self.kind) {
            ("color", _) => self.color = color(name, &value)?,
            ("ground_color", LightKind::Hemisphere { ground_color }) => {
                *ground_color = color(name, &value)?
            }
            ("intensity", _) => self.intensity = number(name, &value)?,
            ("distance", LightKind::Spot { distance, .. }) => {
                let v = number(name, &value)?;
                if v < 0.0 {
                    return Err(PropertyError::OutOfRange {
                        property: name.to_string(),
                        value: v,
                    });
                }
                *distance = v;
            }
            ("angle", LightKind::Spot { angle, .. }) => *angle = number(name, &value)?,
            ("penumbra", LightKind::Spot { penumbra, .. }) => {
                *penumbra = number(name, &value)?.clamp(0.0, 1.0)
            }
            ("decay", LightKind::Spot { decay, .. }) => *decay = number(name, &value)?,
            _ => {
                let v = number(name, &value)?;
                let (field, axis) = name.split_once('.').ok_or_else(|| unknown(name))?;
                let slot = match field {
                    "position" => component_mut(&mut self.position, axis),
                    "target" => self.target_mut().and_then(|t| component_mut(t, axis)),
                    _ => None,
                };
                *slot.ok_or_else(|| unknown(name))? = v;
            }
        }
        Ok(())
    }
}

impl Properties for Transform {
    fn property(&self, name: &str) -> Option<Value> {
        let (field, axis) = name.split_once('.')?;
        let v = match field {
            "position" => component(&self.position, axis),
            "rotation" => component(&self.rotation, axis),
            "scale" => component(&self.scale, axis),
            _ => None,
        };
        v.map(Value::Number)
    }

    fn set_property(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        let v = number(name, &value)?;
        let (field, axis) = name.split_once('.').ok_or_else(|| unknown(name))?;
        let slot = match field {
            "position" => component_mut(&mut self.position, axis),
            "rotation" => component_mut(&mut self.rotation, axis),
            "scale" => component_mut(&mut self.scale, axis),
            _ => None,
        };
        *slot.ok_or_else(|| unknown(name))? = v;
        Ok(())
    }
}

/// Two properties that must stay at least `min_dif` apart
#[derive(Debug, Clone, PartialEq)]
pub struct RangeCoupling {
    pub min_property: String,
    pub max_property: String,
    pub min_dif: f32,
}

impl RangeCoupling {
    pub fn new(min_property: &str, max_property: &str, min_dif: f32) -> Self {
        Self {
            min_property: min_property.to_string(),
            max_property: max_property.to_string(),
            min_dif,
        }
    }

    fn read(&self, target: &dyn Properties, name: &str) -> Result<f32, PropertyError> {
        let value = target.property(name).ok_or_else(|| unknown(name))?;
        number(name, &value)
    }

    /// Sets the lower bound, pushing the upper bound up when the gap would close
    pub fn set_min(&self, target: &mut dyn Properties, v: f32) -> Result<(), PropertyError> {
        target.set_property(&self.min_property, Value::Number(v))?;
        let max = self.read(target, &self.max_property)?;
        target.set_property(&self.max_property, Value::Number(max.max(v + self.min_dif)))
    }

    /// Sets the upper bound, then re-validates the gap from the current minimum
    pub fn set_max(&self, target: &mut dyn Properties, v: f32) -> Result<(), PropertyError> {
        target.set_property(&self.max_property, Value::Number(v))?;
        let min = self.read(target, &self.min_property)?;
        self.set_min(target, min)
    }
}

/// How a control sees the property it is bound to
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyAdapter {
    Direct { property: String },
    /// Radians stored, degrees shown
    Degrees { property: String },
    /// Lower end of a coupled range
    Min(RangeCoupling),
    /// Upper end of a coupled range
    Max(RangeCoupling),
    /// Color stored, `#rrggbb` shown
    Color { property: String },
}

impl PropertyAdapter {
    pub fn direct(property: &str) -> Self {
        Self::Direct {
            property: property.to_string(),
        }
    }

    pub fn degrees(property: &str) -> Self {
        Self::Degrees {
            property: property.to_string(),
        }
    }

    pub fn color(property: &str) -> Self {
        Self::Color {
            property: property.to_string(),
        }
    }

    pub fn get(&self, target: &dyn Properties) -> Result<Value, PropertyError> {
        let read = |name: &str| target.property(name).ok_or_else(|| unknown(name));
        match self {
            Self::Direct { property } => read(property),
            Self::Degrees { property } => {
                let radians = number(property, &read(property)?)?;
                Ok(Value::Number(radians.to_degrees()))
            }
            Self::Min(coupling) => read(&coupling.min_property),
            Self::Max(coupling) => read(&coupling.max_property),
            Self::Color { property } => {
                let c = color(property, &read(property)?)?;
                Ok(Value::Hex(c.to_hex_string()))
            }
        }
    }

    pub fn set(&self, target: &mut dyn Properties, value: Value) -> Result<(), PropertyError> {
        match self {
            Self::Direct { property } => target.set_property(property, value),
            Self::Degrees { property } => {
                let degrees = number(property, &value)?;
                target.set_property(property, Value::Number(degrees.to_radians()))
            }
            Self::Min(coupling) => {
                let v = number(&coupling.min_property, &value)?;
                coupling.set_min(target, v)
            }
            Self::Max(coupling) => {
                let v = number(&coupling.max_property, &value)?;
                coupling.set_max(target, v)
            }
            Self::Color { property } => {
                let c = color(property, &value)?;
                target.set_property(property, Value::Color(c))
            }
        }
    }
}

/// The object a binding edits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingTarget {
    Camera,
    Light(LightId),
    Node(NodeId),
}

impl BindingTarget {
    fn resolve<'a>(&self, ctx: &'a SceneContext) -> Result<&'a dyn Properties, PropertyError> {
        match *self {
            BindingTarget::Camera => Ok(&ctx.camera),
            BindingTarget::Light(id) => ctx
                .scene
                .light(id)
                .map(|light| light as &dyn Properties)
                .ok_or(PropertyError::MissingTarget),
            BindingTarget::Node(id) => ctx
                .scene
                .node(id)
                .map(|node| &node.transform as &dyn Properties)
                .ok_or(PropertyError::MissingTarget),
        }
    }

    fn resolve_mut<'a>(
        &self,
        ctx: &'a mut SceneContext,
    ) -> Result<&'a mut dyn Properties, PropertyError> {
        match *self {
            BindingTarget::Camera => Ok(&mut ctx.camera),
            BindingTarget::Light(id) => ctx
                .scene
                .light_mut(id)
                .map(|light| light as &mut dyn Properties)
                .ok_or(PropertyError::MissingTarget),
            BindingTarget::Node(id) => ctx
                .scene
                .node_mut(id)
                .map(|node| &mut node.transform as &mut dyn Properties)
                .ok_or(PropertyError::MissingTarget),
        }
    }
}

/// Widget used to edit a binding
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Control {
    Slider {
        min: f32,
        max: f32,
        step: Option<f32>,
    },
    ColorPicker,
}

impl Control {
    pub fn slider(min: f32, max: f32) -> Self {
        Self::Slider {
            min,
            max,
            step: None,
        }
    }

    pub fn stepped(min: f32, max: f32, step: f32) -> Self {
        Self::Slider {
            min,
            max,
            step: Some(step),
        }
    }

    /// Snaps to `step` and clamps into the slider range
    pub fn constrain(&self, value: f32) -> f32 {
        match *self {
            Control::Slider { min, max, step } => {
                let snapped = match step {
                    Some(step) if step > 0.0 => (value / step).round() * step,
                    _ => value,
                };
                snapped.clamp(min, max)
            }
            Control::ColorPicker => value,
        }
    }
}

/// Called after every successful set, to refresh derived state
pub type OnChange = fn(&mut SceneContext, BindingTarget);

/// One labelled control bound to one property of one object
#[derive(Debug, Clone)]
pub struct PropertyBinding {
    pub label: String,
    pub target: BindingTarget,
    pub adapter: PropertyAdapter,
    pub control: Control,
    pub on_change: Option<OnChange>,
}

impl PropertyBinding {
    pub fn new(label: &str, target: BindingTarget, adapter: PropertyAdapter, control: Control) -> Self {
        Self {
            label: label.to_string(),
            target,
            adapter,
            control,
            on_change: None,
        }
    }

    pub fn on_change(mut self, callback: OnChange) -> Self {
        self.on_change = Some(callback);
        self
    }

    pub fn get(&self, ctx: &SceneContext) -> Result<Value, PropertyError> {
        self.adapter.get(self.target.resolve(ctx)?)
    }

    pub fn set(&self, ctx: &mut SceneContext, value: Value) -> Result<(), PropertyError> {
        let value = match value {
            Value::Number(v) => Value::Number(self.control.constrain(v)),
            other => other,
        };
        self.adapter.set(self.target.resolve_mut(ctx)?, value)?;
        if let Some(callback) = self.on_change {
            callback(ctx, self.target);
        }
        Ok(())
    }
}

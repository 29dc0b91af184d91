//! Scene lights
//!
//! Three light kinds are supported, each carrying its own parameter set.
//! Spot lights can be paired with a wireframe cone helper node that
//! visualises their reach; see [`Scene::update_light_helper`](super::Scene::update_light_helper).

use cgmath::{InnerSpace, Vector3};

use super::node::{NodeId, Transform};
use crate::gfx::{color::Color, geometry::{generate_cone, GeometryData}};

/// Length used for the helper cone of a spot light with unlimited distance
pub const SPOT_HELPER_DEFAULT_LENGTH: f32 = 20.0;

/// Index of a light inside its scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LightId(pub(crate) usize);

#[derive(Debug, Clone, PartialEq)]
pub enum LightKind {
    /// Parallel rays travelling from `position` towards `target`
    Directional { target: Vector3<f32> },
    /// Sky color (the light color) blended with a ground color by normal direction
    Hemisphere { ground_color: Color },
    /// Cone of light from `position` towards `target`
    Spot {
        target: Vector3<f32>,
        /// Maximum range; 0 means unlimited
        distance: f32,
        /// Half-angle of the cone in radians
        angle: f32,
        /// Fraction of the cone that fades out, 0..1
        penumbra: f32,
        decay: f32,
    },
}

#[derive(Debug, Clone)]
pub struct Light {
    pub name: String,
    pub color: Color,
    pub intensity: f32,
    pub position: Vector3<f32>,
    pub kind: LightKind,
    pub(crate) helper: Option<NodeId>,
}

impl Light {
    pub fn directional(color: Color, intensity: f32) -> Self {
        Self::new(
            "Directional",
            color,
            intensity,
            LightKind::Directional {
                target: Vector3::new(0.0, 0.0, 0.0),
            },
        )
    }

    pub fn hemisphere(sky_color: Color, ground_color: Color, intensity: f32) -> Self {
        Self::new("Hemisphere", sky_color, intensity, LightKind::Hemisphere { ground_color })
    }

    pub fn spot(color: Color, intensity: f32) -> Self {
        Self::new(
            "Spot",
            color,
            intensity,
            LightKind::Spot {
                target: Vector3::new(0.0, 0.0, 0.0),
                distance: 0.0,
                angle: std::f32::consts::FRAC_PI_3,
                penumbra: 0.0,
                decay: 2.0,
            },
        )
    }

    fn new(name: &str, color: Color, intensity: f32, kind: LightKind) -> Self {
        Self {
            name: name.to_string(),
            color,
            intensity,
            position: Vector3::new(0.0, 1.0, 0.0),
            kind,
            helper: None,
        }
    }

    pub fn at(mut self, position: Vector3<f32>) -> Self {
        self.position = position;
        self
    }

    /// Sets the aim point; ignored for hemisphere lights
    pub fn aimed_at(mut self, point: Vector3<f32>) -> Self {
        if let Some(target) = self.target_mut() {
            *target = point;
        }
        self
    }

    pub fn target(&self) -> Option<Vector3<f32>> {
        match &self.kind {
            LightKind::Directional { target } | LightKind::Spot { target, .. } => Some(*target),
            LightKind::Hemisphere { .. } => None,
        }
    }

    pub fn target_mut(&mut self) -> Option<&mut Vector3<f32>> {
        match &mut self.kind {
            LightKind::Directional { target } | LightKind::Spot { target, .. } => Some(target),
            LightKind::Hemisphere { .. } => None,
        }
    }

    /// Unit vector from position to target, `None` for hemisphere lights or
    /// when the two coincide
    pub fn direction(&self) -> Option<Vector3<f32>> {
        let offset = self.target()? - self.position;
        if offset.magnitude2() <= f32::EPSILON {
            return None;
        }
        Some(offset.normalize())
    }

    pub fn helper(&self) -> Option<NodeId> {
        self.helper
    }

    /// Transform that places the unit helper cone on this spot light
    pub fn helper_transform(&self) -> Option<Transform> {
        let LightKind::Spot { distance, angle, .. } = self.kind else {
            return None;
        };
        let direction = self.direction().unwrap_or(Vector3::new(0.0, -1.0, 0.0));
        let length = if distance > 0.0 {
            distance
        } else {
            SPOT_HELPER_DEFAULT_LENGTH
        };
        let radius = length * angle.tan();

        // Rx(a) * Ry(b) maps +Z onto `direction`
        let yaw = direction.x.clamp(-1.0, 1.0).asin();
        let pitch = (-direction.y).atan2(direction.z);

        Some(Transform {
            position: self.position,
            rotation: Vector3::new(pitch, yaw, 0.0),
            scale: Vector3::new(radius, radius, length),
        })
    }
}

/// Unit cone with its apex at the origin opening along +Z, base radius 1 at z = 1
pub fn spot_helper_geometry() -> GeometryData {
    let mut cone = generate_cone(1.0, 1.0, 16);
    for v in cone.vertices.iter_mut() {
        *v = [v[0], v[2], 0.5 - v[1]];
    }
    for n in cone.normals.iter_mut() {
        *n = [n[0], n[2], -n[1]];
    }
    cone
}

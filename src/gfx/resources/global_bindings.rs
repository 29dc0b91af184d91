//! Global uniform bindings for camera and scene lighting
//!
//! One uniform block, bound at group 0 of every pipeline, carries the camera
//! and the first light of each kind in the scene. The layout MUST match the
//! `Globals` struct in `scene.wgsl`.

use cgmath::InnerSpace;

use crate::{
    gfx::{
        camera::{camera_utils::CameraUniform, PerspectiveCamera},
        scene::{LightKind, Scene},
    },
    wgpu_utils::UniformBuffer,
};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUniform {
    pub camera: CameraUniform,
    /// xyz: unit vector towards the light, w: 1 when present
    pub directional_direction: [f32; 4],
    /// rgb: color scaled by intensity
    pub directional_color: [f32; 4],
    pub sky_color: [f32; 4],
    pub ground_color: [f32; 4],
    /// xyz: position, w: range (0 for unlimited)
    pub spot_position: [f32; 4],
    /// xyz: unit aim direction, w: decay exponent
    pub spot_direction: [f32; 4],
    pub spot_color: [f32; 4],
    /// x: cos(angle), y: cos(angle * (1 - penumbra)), z: 1 when present
    pub spot_cone: [f32; 4],
}
// 80 + 8 * 16 = 208 bytes

impl GlobalUniform {
    /// Packs the camera and the first directional, hemisphere and spot light
    pub fn from_scene(scene: &Scene, camera: &PerspectiveCamera) -> Self {
        let mut uniform = Self {
            camera: camera.uniform(),
            ..bytemuck::Zeroable::zeroed()
        };
        let (mut directional, mut hemisphere, mut spot) = (false, false, false);

        for (_, light) in scene.lights() {
            let radiance = light.color.scaled(light.intensity).to_array();
            match &light.kind {
                LightKind::Directional { .. } if !directional => {
                    directional = true;
                    let towards = light
                        .direction()
                        .map(|d| -d)
                        .unwrap_or(cgmath::Vector3::unit_y());
                    uniform.directional_direction = towards.extend(1.0).into();
                    uniform.directional_color = rgb(radiance);
                }
                LightKind::Hemisphere { ground_color } if !hemisphere => {
                    hemisphere = true;
                    uniform.sky_color = rgb(radiance);
                    uniform.ground_color = rgb(ground_color.scaled(light.intensity).to_array());
                }
                LightKind::Spot {
                    distance,
                    angle,
                    penumbra,
                    decay,
                    ..
                } if !spot => {
                    spot = true;
                    let aim = light
                        .direction()
                        .unwrap_or(-cgmath::Vector3::unit_y())
                        .normalize();
                    uniform.spot_position = light.position.extend(*distance).into();
                    uniform.spot_direction = aim.extend(*decay).into();
                    uniform.spot_color = rgb(radiance);
                    uniform.spot_cone = [angle.cos(), (angle * (1.0 - penumbra)).cos(), 1.0, 0.0];
                }
                _ => {}
            }
        }
        uniform
    }
}

fn rgb(c: [f32; 3]) -> [f32; 4] {
    [c[0], c[1], c[2], 0.0]
}

/// Uniform buffer plus the bind group exposing it at group 0
pub struct GlobalBindings {
    buffer: UniformBuffer<GlobalUniform>,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
}

impl GlobalBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = UniformBuffer::new(device, "globals");
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_layout"),
            entries: &[UniformBuffer::<GlobalUniform>::layout_entry(
                0,
                wgpu::ShaderStages::VERTEX_FRAGMENT,
            )],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals"),
            layout: &layout,
            entries: &[buffer.bind_entry(0)],
        });

        Self {
            buffer,
            layout,
            bind_group,
        }
    }

    pub fn update(&mut self, queue: &wgpu::Queue, content: GlobalUniform) {
        if self.buffer.write(queue, &content) {
            log::trace!("Uploaded globals");
        }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::{color::Color, scene::Light};
    use approx::assert_abs_diff_eq;
    use cgmath::Vector3;

    #[test]
    fn test_uniform_size_matches_shader() {
        assert_eq!(std::mem::size_of::<GlobalUniform>(), 208);
    }

    #[test]
    fn test_empty_scene_has_no_lights() {
        let uniform = GlobalUniform::from_scene(&Scene::new(), &PerspectiveCamera::default());
        assert_eq!(uniform.directional_direction[3], 0.0);
        assert_eq!(uniform.spot_cone[2], 0.0);
        assert_eq!(uniform.sky_color, [0.0; 4]);
    }

    #[test]
    fn test_packs_first_light_of_each_kind() {
        let mut scene = Scene::new();
        scene.add_light(
            Light::directional(Color::WHITE, 2.0)
                .at(Vector3::new(0.0, 10.0, 0.0))
                .aimed_at(Vector3::new(0.0, 0.0, 0.0)),
        );
        scene.add_light(Light::directional(Color::BLACK, 9.0));
        scene.add_light(Light::hemisphere(Color::WHITE, Color::new(0.5, 0.0, 0.0), 2.0));
        scene.add_light(
            Light::spot(Color::WHITE, 150.0)
                .at(Vector3::new(0.0, 10.0, 0.0))
                .aimed_at(Vector3::new(0.0, 0.0, 0.0)),
        );

        let uniform = GlobalUniform::from_scene(&scene, &PerspectiveCamera::default());
        assert_eq!(uniform.directional_direction, [0.0, 1.0, 0.0, 1.0]);
        assert_eq!(uniform.directional_color[0], 2.0);
        assert_eq!(uniform.ground_color[0], 1.0);
        assert_eq!(uniform.spot_direction, [0.0, -1.0, 0.0, 2.0]);
        assert_eq!(uniform.spot_color[1], 150.0);
        assert_abs_diff_eq!(uniform.spot_cone[0], std::f32::consts::FRAC_PI_3.cos(), epsilon = 1e-6);
        // No penumbra: inner and outer cones coincide
        assert_abs_diff_eq!(uniform.spot_cone[1], uniform.spot_cone[0], epsilon = 1e-6);
    }
}

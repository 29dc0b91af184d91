//! Procedural meshes for the demo scene and light helpers
//!
//! Every generator fills positions, normals and texture coordinates in
//! lockstep and winds triangles counter-clockwise seen from outside.

use super::GeometryData;
use std::f32::consts::{PI, TAU};

/// Outward normal, then the face's U and V axes, with `u x v == normal`
const CUBE_FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
    ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
    ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
];

/// Unit cube spanning -0.5..0.5, four vertices per face so normals stay flat
pub fn generate_cube() -> GeometryData {
    let mut data = GeometryData::new();

    for (normal, u_axis, v_axis) in CUBE_FACES {
        let first = data.vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let corner: [f32; 3] =
                std::array::from_fn(|k| 0.5 * (normal[k] + su * u_axis[k] + sv * v_axis[k]));
            data.vertices.push(corner);
            data.normals.push(normal);
            data.tex_coords.push([(su + 1.0) * 0.5, (sv + 1.0) * 0.5]);
        }
        data.indices
            .extend_from_slice(&[first, first + 1, first + 2, first + 2, first + 3, first]);
    }

    data
}

/// UV sphere; segment counts are raised to the smallest closed shape
pub fn generate_sphere(radius: f32, longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let columns = longitude_segments.max(3);
    let rows = latitude_segments.max(2);
    let mut data = GeometryData::new();

    for row in 0..=rows {
        let v = row as f32 / rows as f32;
        let (ring, height) = (v * PI).sin_cos();
        for column in 0..=columns {
            let u = column as f32 / columns as f32;
            let (sin_phi, cos_phi) = (u * TAU).sin_cos();
            let unit = [ring * cos_phi, height, ring * sin_phi];

            data.vertices.push(unit.map(|c| c * radius));
            data.normals.push(unit);
            data.tex_coords.push([u, v]);
        }
    }
    push_grid_indices(&mut data.indices, 0, columns, rows);

    data
}

/// Cone centred on the origin: base ring at `-height/2`, apex at `height/2`
pub fn generate_cone(radius: f32, height: f32, segments: u32) -> GeometryData {
    let segments = segments.max(3);
    let half_height = height * 0.5;
    let mut data = GeometryData::new();

    // Side: a base vertex and its own apex per step so normals follow the slant
    for step in 0..=segments {
        let u = step as f32 / segments as f32;
        let (sin_a, cos_a) = (u * TAU).sin_cos();
        let slant = normalize([cos_a * height, radius, sin_a * height]);

        data.vertices.push([radius * cos_a, -half_height, radius * sin_a]);
        data.vertices.push([0.0, half_height, 0.0]);
        data.normals.extend_from_slice(&[slant, slant]);
        data.tex_coords.extend_from_slice(&[[u, 0.0], [u, 1.0]]);
    }
    for step in 0..segments {
        let base = step * 2;
        data.indices.extend_from_slice(&[base + 1, base + 2, base]);
    }

    // Base cap, fanned around its centre
    let center = data.vertices.len() as u32;
    data.vertices.push([0.0, -half_height, 0.0]);
    data.normals.push([0.0, -1.0, 0.0]);
    data.tex_coords.push([0.5, 0.5]);
    for step in 0..=segments {
        let (sin_a, cos_a) = (step as f32 / segments as f32 * TAU).sin_cos();
        data.vertices.push([radius * cos_a, -half_height, radius * sin_a]);
        data.normals.push([0.0, -1.0, 0.0]);
        data.tex_coords.push([0.5 + cos_a * 0.5, 0.5 + sin_a * 0.5]);
    }
    for step in 0..segments {
        let rim = center + 1 + step;
        data.indices.extend_from_slice(&[center, rim, rim + 1]);
    }

    data
}

/// Flat XZ grid centred on the origin, facing +Y
pub fn generate_plane(width: f32, depth: f32, width_segments: u32, depth_segments: u32) -> GeometryData {
    let columns = width_segments.max(1);
    let rows = depth_segments.max(1);
    let mut data = GeometryData::new();

    for row in 0..=rows {
        let v = row as f32 / rows as f32;
        for column in 0..=columns {
            let u = column as f32 / columns as f32;
            data.vertices.push([(u - 0.5) * width, 0.0, (v - 0.5) * depth]);
            data.normals.push([0.0, 1.0, 0.0]);
            data.tex_coords.push([u, v]);
        }
    }
    push_grid_indices(&mut data.indices, 0, columns, rows);

    data
}

/// Two triangles per cell of a `(columns + 1) x (rows + 1)` vertex grid
fn push_grid_indices(indices: &mut Vec<u32>, first: u32, columns: u32, rows: u32) {
    let stride = columns + 1;
    for row in 0..rows {
        for column in 0..columns {
            let a = first + row * stride + column;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1, b, b + 1, a + 1]);
        }
    }
}

fn normalize(v: [f32; 3]) -> [f32; 3] {
    let len = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
    if len <= f32::EPSILON {
        return [0.0, 1.0, 0.0];
    }
    v.map(|c| c / len)
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_cube_generation() {
        let cube = generate_cube();
        assert_eq!(cube.vertices.len(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.vertex_count(), 24);
        assert_eq!(cube.triangle_count(), 12);
    }
    
    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(0.5, 8, 6);
        assert!(sphere.vertices.len() > 0);
        assert!(sphere.indices.len() > 0);
        assert_eq!(sphere.vertices.len(), sphere.normals.len());
        assert_eq!(sphere.vertices.len(), sphere.tex_coords.len());

        let bounds = sphere.bounding_box().unwrap();
        assert!((bounds.max.y - 0.5).abs() < 1e-6);
    }
    
    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(2.0, 2.0, 2, 2);
        assert_eq!(plane.vertices.len(), 9); // 3x3 grid
        assert_eq!(plane.indices.len(), 24); // 4 quads * 2 triangles * 3 indices
        assert!(plane.vertices.iter().all(|v| v[1] == 0.0));
    }

    #[test]
    fn test_cone_generation() {
        let cone = generate_cone(1.0, 2.0, 8);
        assert_eq!(cone.vertices.len(), cone.normals.len());
        assert_eq!(cone.vertices.len(), cone.tex_coords.len());
        assert_eq!(cone.triangle_count(), 16); // 8 side + 8 cap

        let bounds = cone.bounding_box().unwrap();
        assert_eq!(bounds.min.y, -1.0);
        assert_eq!(bounds.max.y, 1.0);
    }

    #[test]
    fn cube_faces_wind_towards_their_normal() {
        use cgmath::InnerSpace;

        let cube = generate_cube();
        for tri in cube.indices.chunks(3) {
            let [a, b, c] = [tri[0], tri[1], tri[2]]
                .map(|i| cgmath::Vector3::from(cube.vertices[i as usize]));
            let n = cgmath::Vector3::from(cube.normals[tri[0] as usize]);
            assert!((b - a).cross(c - a).dot(n) > 0.0);
        }
    }

    #[test]
    fn test_cube_bounds_are_unit() {
        let bounds = generate_cube().bounding_box().unwrap();
        assert_eq!(bounds.min, cgmath::Vector3::new(-0.5, -0.5, -0.5));
        assert_eq!(bounds.max, cgmath::Vector3::new(0.5, 0.5, 0.5));
    }
}

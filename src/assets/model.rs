//! OBJ/MTL model loading
//!
//! Models are read with `tobj` (triangulated, one index per vertex) into plain
//! [`ModelData`], which [`Scene::attach_model`](crate::gfx::scene::Scene::attach_model)
//! turns into a node subtree.

use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{
    error::LoadError,
    gfx::{
        color::Color,
        geometry::GeometryData,
        resources::{material::Material, texture::ColorSpace},
    },
};

use super::texture::load_texture;

/// One mesh of a loaded model
#[derive(Debug, Clone)]
pub struct ModelMesh {
    pub name: String,
    pub geometry: GeometryData,
    /// Index into [`ModelData::materials`]
    pub material: Option<usize>,
}

/// A loaded model, not yet part of any scene
#[derive(Debug, Clone, Default)]
pub struct ModelData {
    pub name: String,
    pub meshes: Vec<ModelMesh>,
    pub materials: Vec<Material>,
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    }
}

/// Loads an OBJ file and its materials
///
/// With `mtl` given, that file is loaded first and used for every `mtllib`
/// the OBJ references. Otherwise materials are resolved next to the OBJ.
/// Missing materials are not an error; meshes fall back to the default
/// material.
pub fn load_obj(path: &Path, mtl: Option<&Path>) -> Result<ModelData, LoadError> {
    let model_error = |source| LoadError::Model {
        path: path.to_path_buf(),
        source,
    };

    let (models, materials) = match mtl {
        Some(mtl) => {
            let file = File::open(path).map_err(|source| LoadError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            let mut reader = BufReader::new(file);
            tobj::load_obj_buf(&mut reader, &load_options(), |_| tobj::load_mtl(mtl))
                .map_err(model_error)?
        }
        None => tobj::load_obj(path, &load_options()).map_err(model_error)?,
    };

    let materials = materials.unwrap_or_else(|e| {
        log::warn!("No materials for {}: {}, using default materials", path.display(), e);
        Vec::new()
    });

    let texture_dir = mtl
        .and_then(Path::parent)
        .or_else(|| path.parent())
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let materials: Vec<Material> = materials
        .iter()
        .enumerate()
        .map(|(i, mtl)| convert_material(i, mtl, &texture_dir))
        .collect();

    let meshes: Vec<ModelMesh> = models
        .into_iter()
        .map(|model| ModelMesh {
            name: model.name,
            material: model.mesh.material_id,
            geometry: convert_mesh(model.mesh),
        })
        .filter(|mesh| !mesh.geometry.is_empty())
        .collect();

    if meshes.is_empty() {
        return Err(LoadError::EmptyModel(path.to_path_buf()));
    }

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "model".to_string());

    log::info!(
        "Loaded model '{}': {} meshes, {} materials",
        name,
        meshes.len(),
        materials.len()
    );

    Ok(ModelData {
        name,
        meshes,
        materials,
    })
}

fn convert_material(index: usize, mtl: &tobj::Material, texture_dir: &Path) -> Material {
    let name = if mtl.name.is_empty() {
        format!("material_{}", index)
    } else {
        mtl.name.clone()
    };
    let diffuse = mtl.diffuse.unwrap_or([0.8, 0.8, 0.8]);
    let material = Material::new(&name, Color::new(diffuse[0], diffuse[1], diffuse[2]));

    let Some(texture) = mtl.diffuse_texture.as_ref() else {
        return material;
    };
    let texture_path: PathBuf = texture_dir.join(texture);
    match load_texture(&texture_path) {
        Ok(mut map) => {
            map.color_space = ColorSpace::Srgb;
            material.with_map(Arc::new(map))
        }
        Err(e) => {
            log::warn!("Material '{}' keeps its flat color: {}", name, e);
            material
        }
    }
}

fn convert_mesh(mesh: tobj::Mesh) -> GeometryData {
    let vertices: Vec<[f32; 3]> = mesh
        .positions
        .chunks_exact(3)
        .map(|p| [p[0], p[1], p[2]])
        .collect();

    // Use normals from OBJ if available, otherwise calculate them
    let normals = if mesh.normals.len() == mesh.positions.len() {
        mesh.normals
            .chunks_exact(3)
            .map(|n| [n[0], n[1], n[2]])
            .collect()
    } else {
        calculate_vertex_normals(&vertices, &mesh.indices)
    };

    let tex_coords = if mesh.texcoords.len() / 2 == vertices.len() {
        mesh.texcoords.chunks_exact(2).map(|t| [t[0], t[1]]).collect()
    } else {
        Vec::new()
    };

    GeometryData {
        vertices,
        tex_coords,
        normals,
        indices: mesh.indices,
    }
}

/// Area-weighted vertex normals from triangle faces
fn calculate_vertex_normals(vertices: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    use cgmath::{InnerSpace, Vector3};

    let mut normals = vec![Vector3::new(0.0_f32, 0.0, 0.0); vertices.len()];
    for face in indices.chunks_exact(3) {
        let [a, b, c] = [face[0] as usize, face[1] as usize, face[2] as usize];
        if a >= vertices.len() || b >= vertices.len() || c >= vertices.len() {
            continue;
        }
        let p = |i: usize| Vector3::from(vertices[i]);
        let normal = (p(b) - p(a)).cross(p(c) - p(a));
        normals[a] += normal;
        normals[b] += normal;
        normals[c] += normal;
    }

    normals
        .into_iter()
        .map(|n| {
            if n.magnitude2() > f32::EPSILON {
                n.normalize().into()
            } else {
                [0.0, 1.0, 0.0]
            }
        })
        .collect()
}

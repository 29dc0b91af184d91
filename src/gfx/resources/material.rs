//! Material system
//!
//! Materials are stored centrally in [`MaterialManager`] and meshes reference
//! them by ID. A material is a base color plus an optional texture map; the
//! map's representative color modulates the base color when drawn.

use std::{collections::HashMap, sync::Arc};

use super::texture::Texture;
use crate::gfx::color::Color;

/// Material ID for referencing materials
pub type MaterialId = String;

pub const DEFAULT_MATERIAL: &str = "default";

#[derive(Debug, Clone)]
pub struct Material {
    pub name: String,
    pub color: Color,
    pub map: Option<Arc<Texture>>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: DEFAULT_MATERIAL.to_string(),
            color: Color::new(0.8, 0.8, 0.8),
            map: None,
        }
    }
}

impl Material {
    /// Creates a new material with a flat color
    ///
    /// # Arguments
    /// * `name` - Unique name for this material
    /// * `color` - Linear base color
    pub fn new(name: &str, color: Color) -> Self {
        Self {
            name: name.to_string(),
            color,
            map: None,
        }
    }

    pub fn with_map(mut self, map: Arc<Texture>) -> Self {
        self.map = Some(map);
        self
    }

    /// Color used when shading: base color modulated by the map, if any
    pub fn effective_color(&self) -> Color {
        match &self.map {
            Some(map) => self.color.modulate(&map.average_color()),
            None => self.color,
        }
    }
}

/// Centralized material storage with a fallback default
pub struct MaterialManager {
    materials: HashMap<MaterialId, Material>,
    default_material: Material,
}

impl MaterialManager {
    /// Creates a new material manager with a default material
    pub fn new() -> Self {
        Self {
            materials: HashMap::new(),
            default_material: Material::default(),
        }
    }

    /// Adds a material, replacing any existing material with the same name
    pub fn add_material(&mut self, material: Material) {
        self.materials.insert(material.name.clone(), material);
    }

    pub fn get_material(&self, id: &str) -> Option<&Material> {
        if id == DEFAULT_MATERIAL {
            return Some(&self.default_material);
        }
        self.materials.get(id)
    }

    pub fn get_material_mut(&mut self, id: &str) -> Option<&mut Material> {
        if id == DEFAULT_MATERIAL {
            return Some(&mut self.default_material);
        }
        self.materials.get_mut(id)
    }

    pub fn get_default_material(&self) -> &Material {
        &self.default_material
    }

    /// Gets the material for a mesh, falling back to the default material
    /// when the ID is unknown
    pub fn get_material_for_object(&self, material_id: &str) -> &Material {
        self.get_material(material_id)
            .unwrap_or(&self.default_material)
    }

    /// Returns `desired` if unused, otherwise `desired (n)` for the first free `n`
    pub fn unique_name(&self, desired: &str) -> MaterialId {
        let mut counter = 0;
        let mut candidate = desired.to_string();
        while self.get_material(&candidate).is_some() {
            counter += 1;
            candidate = format!("{} ({})", desired, counter);
        }
        candidate
    }

    /// Lists all material IDs
    pub fn list_materials(&self) -> Vec<&MaterialId> {
        self.materials.keys().collect()
    }
}

impl Default for MaterialManager {
    fn default() -> Self {
        Self::new()
    }
}

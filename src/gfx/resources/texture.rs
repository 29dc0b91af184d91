//! Texture metadata and scene backgrounds
//!
//! Pixel decoding belongs to the loader; the scene only keeps what it needs
//! to shade: size, a representative color, and how to interpret the data.

use std::{path::PathBuf, sync::Arc};

use crate::gfx::color::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorSpace {
    /// Gamma-encoded color data (photos, albedo maps)
    Srgb,
    /// Data already in linear space
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureMapping {
    /// Sampled with mesh UV coordinates
    Uv,
    /// Wrapped around the scene as an equirectangular panorama
    EquirectangularReflection,
}

#[derive(Debug, Clone)]
pub struct Texture {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Mean texel value as stored in the file, before any decoding
    pub mean_texel: [f32; 3],
    pub color_space: ColorSpace,
    pub mapping: TextureMapping,
}

impl Texture {
    /// Mean color in linear space, decoded according to `color_space`
    pub fn average_color(&self) -> Color {
        match self.color_space {
            ColorSpace::Srgb => Color::from_srgb_array(self.mean_texel),
            ColorSpace::Linear => {
                Color::new(self.mean_texel[0], self.mean_texel[1], self.mean_texel[2])
            }
        }
    }
}

/// What the renderer clears to before drawing the scene
#[derive(Debug, Clone)]
pub enum Background {
    Color(Color),
    Texture(Arc<Texture>),
}

impl Background {
    /// Linear clear color for this background
    pub fn clear_color(&self) -> Color {
        match self {
            Background::Color(color) => *color,
            Background::Texture(texture) => texture.average_color(),
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Color(Color::BLACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texture(color_space: ColorSpace) -> Texture {
        Texture {
            path: "sky.jpg".into(),
            width: 4,
            height: 2,
            mean_texel: [0.5, 0.5, 0.5],
            color_space,
            mapping: TextureMapping::EquirectangularReflection,
        }
    }

    #[test]
    fn test_color_space_changes_average() {
        let linear = texture(ColorSpace::Linear).average_color();
        let srgb = texture(ColorSpace::Srgb).average_color();
        assert_eq!(linear, Color::new(0.5, 0.5, 0.5));
        assert!(srgb.r < 0.25 && srgb.r > 0.2);
    }

    #[test]
    fn test_default_background_is_black() {
        assert_eq!(Background::default().clear_color(), Color::BLACK);
        let background = Background::Texture(Arc::new(texture(ColorSpace::Linear)));
        assert_eq!(background.clear_color(), Color::new(0.5, 0.5, 0.5));
    }
}

use std::path::Path;

use crate::{
    error::LoadError,
    gfx::resources::texture::{ColorSpace, Texture, TextureMapping},
};

/// Decodes an image and records its size and mean texel value
///
/// The result is tagged [`ColorSpace::Linear`] and [`TextureMapping::Uv`];
/// callers retag it once they know how the image is meant to be used.
pub fn load_texture(path: &Path) -> Result<Texture, LoadError> {
    let image = image::open(path).map_err(|source| LoadError::Image {
        path: path.to_path_buf(),
        source,
    })?;
    let pixels = image.to_rgb32f();
    let (width, height) = pixels.dimensions();

    let mut sum = [0.0_f64; 3];
    for pixel in pixels.pixels() {
        for (total, channel) in sum.iter_mut().zip(pixel.0) {
            *total += channel as f64;
        }
    }
    let count = (width as f64 * height as f64).max(1.0);
    let mean_texel = sum.map(|total| (total / count) as f32);

    log::debug!(
        "Loaded texture {} ({}x{})",
        path.display(),
        width,
        height
    );

    Ok(Texture {
        path: path.to_path_buf(),
        width,
        height,
        mean_texel,
        color_space: ColorSpace::Linear,
        mapping: TextureMapping::Uv,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_texel() {
        let path = std::env::temp_dir().join(format!("vantage-texture-{}.png", std::process::id()));
        let mut image = image::RgbImage::from_pixel(2, 2, image::Rgb([255, 0, 0]));
        image.put_pixel(0, 0, image::Rgb([255, 255, 0]));
        image.save(&path).unwrap();

        let texture = load_texture(&path).unwrap();
        assert_eq!((texture.width, texture.height), (2, 2));
        assert!((texture.mean_texel[0] - 1.0).abs() < 1e-6);
        assert!((texture.mean_texel[1] - 0.25).abs() < 1e-6);
        assert_eq!(texture.mean_texel[2], 0.0);

        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_image() {
        let result = load_texture(Path::new("/definitely/not/here.png"));
        assert!(matches!(result, Err(LoadError::Image { .. })));
    }
}

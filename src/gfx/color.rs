//! Linear RGB colors with sRGB hex conversion.
//!
//! Colors are stored in linear space so lighting math in the shader stays
//! linear. Hex values (as typed by users or found in config files) are sRGB.

/// Linear-space RGB color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Creates a color from a 24-bit sRGB value such as `0x44aa88`
    pub fn from_hex(hex: u32) -> Self {
        let channel = |shift: u32| srgb_to_linear(((hex >> shift) & 0xff) as f32 / 255.0);
        Self::new(channel(16), channel(8), channel(0))
    }

    /// Parses `#rrggbb` (the leading `#` is optional)
    pub fn parse_hex(text: &str) -> Option<Self> {
        let digits = text.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::from_hex)
    }

    /// Returns the 24-bit sRGB value of this color
    pub fn to_hex(&self) -> u32 {
        let channel = |c: f32| (linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    /// Formats this color as `#rrggbb`
    pub fn to_hex_string(&self) -> String {
        format!("#{:06x}", self.to_hex())
    }

    /// sRGB-encoded components, as color pickers expect them
    pub fn to_srgb_array(&self) -> [f32; 3] {
        [
            linear_to_srgb(self.r.clamp(0.0, 1.0)),
            linear_to_srgb(self.g.clamp(0.0, 1.0)),
            linear_to_srgb(self.b.clamp(0.0, 1.0)),
        ]
    }

    pub fn from_srgb_array(rgb: [f32; 3]) -> Self {
        Self::new(
            srgb_to_linear(rgb[0]),
            srgb_to_linear(rgb[1]),
            srgb_to_linear(rgb[2]),
        )
    }

    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.r * factor, self.g * factor, self.b * factor)
    }

    /// Component-wise product
    pub fn modulate(&self, other: &Color) -> Self {
        Self::new(self.r * other.r, self.g * other.g, self.b * other.b)
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

pub fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_round_trip() {
        for hex in [0x000000, 0xffffff, 0x44aa88, 0xb1e1ff, 0xb97a20, 0x123456] {
            assert_eq!(Color::from_hex(hex).to_hex(), hex);
        }
    }

    #[test]
    fn test_parse_hex() {
        let color = Color::parse_hex("#ff8000").unwrap();
        assert_eq!(color.to_hex_string(), "#ff8000");
        assert_eq!(Color::parse_hex("ff8000"), Some(color));
        assert!(Color::parse_hex("#ff80").is_none());
        assert!(Color::parse_hex("#gg8000").is_none());
    }

    #[test]
    fn test_white_is_linear_one() {
        let white = Color::from_hex(0xffffff);
        assert!((white.r - 1.0).abs() < 1e-6);
        assert!((white.g - 1.0).abs() < 1e-6);
        assert!((white.b - 1.0).abs() < 1e-6);
    }
}

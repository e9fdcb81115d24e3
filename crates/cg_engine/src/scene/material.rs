//! Surface appearance carried by models
//!
//! The engine never shades anything itself; these values are handed to the
//! renderer together with each draw.

use crate::foundation::math::Vec3;

/// Linear RGB colour with components in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
}

impl Color {
    /// Black
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    /// White
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Create a colour from float components
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Same value in every channel
    pub const fn gray(value: f32) -> Self {
        Self::new(value, value, value)
    }

    /// Create a colour from 8-bit channels
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0)
    }

    /// Components as a vector
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    /// Components with an opaque alpha, as fixed-function APIs expect
    pub fn to_rgba(self) -> [f32; 4] {
        [self.r, self.g, self.b, 1.0]
    }
}

/// Fixed-function style material
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Diffuse reflectance
    pub diffuse: Color,
    /// Ambient reflectance
    pub ambient: Color,
    /// Specular reflectance
    pub specular: Color,
    /// Emitted light
    pub emissive: Color,
    /// Specular exponent
    pub shininess: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            diffuse: Color::gray(0.8),
            ambient: Color::gray(0.2),
            specular: Color::BLACK,
            emissive: Color::BLACK,
            shininess: 0.0,
        }
    }
}

impl Material {
    /// Default material with the given diffuse colour
    pub fn with_diffuse(diffuse: Color) -> Self {
        Self {
            diffuse,
            ..Self::default()
        }
    }

    /// Set the specular colour and exponent
    #[must_use]
    pub fn shiny(mut self, specular: Color, shininess: f32) -> Self {
        self.specular = specular;
        self.shininess = shininess;
        self
    }

    /// Set the emissive colour
    #[must_use]
    pub fn glowing(mut self, emissive: Color) -> Self {
        self.emissive = emissive;
        self
    }
}

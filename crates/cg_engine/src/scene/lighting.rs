//! Light sources

use super::material::Color;
use crate::foundation::math::{Vec3, Vec4};

/// Where a light is and how it shines
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Omnidirectional light at a position
    Point {
        /// World-space position
        position: Vec3,
    },

    /// Light from infinitely far away
    Directional {
        /// Direction pointing towards the light
        direction: Vec3,
    },

    /// Cone of light from a position
    Spot {
        /// World-space position
        position: Vec3,
        /// Direction the cone points in
        direction: Vec3,
        /// Half-angle of the cone in degrees; 180 lights every direction
        cutoff_degrees: f32,
    },
}

impl LightKind {
    /// Spot light with the default 180° cutoff
    pub fn spot(position: Vec3, direction: Vec3) -> Self {
        Self::Spot {
            position,
            direction,
            cutoff_degrees: 180.0,
        }
    }

    /// Homogeneous light position: `w = 1` for positional lights,
    /// `w = 0` for directional ones
    pub fn homogeneous_position(&self) -> Vec4 {
        match *self {
            Self::Point { position } | Self::Spot { position, .. } => position.push(1.0),
            Self::Directional { direction } => direction.push(0.0),
        }
    }

    /// Spot direction and cutoff, if this is a spot light
    pub fn spot_cone(&self) -> Option<(Vec3, f32)> {
        match *self {
            Self::Spot {
                direction,
                cutoff_degrees,
                ..
            } => Some((direction, cutoff_degrees)),
            _ => None,
        }
    }
}

/// Light colour terms
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightColors {
    /// Ambient contribution
    pub ambient: Color,
    /// Diffuse contribution
    pub diffuse: Color,
    /// Specular contribution
    pub specular: Color,
}

impl Default for LightColors {
    fn default() -> Self {
        Self {
            ambient: Color::gray(0.2),
            diffuse: Color::gray(0.8),
            specular: Color::WHITE,
        }
    }
}

/// A light in the world
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    /// Geometry of the light
    pub kind: LightKind,
    /// Colour terms
    pub colors: LightColors,
}

impl Light {
    /// Light of the given kind with default colours
    pub fn new(kind: LightKind) -> Self {
        Self {
            kind,
            colors: LightColors::default(),
        }
    }

    /// Replace the colour terms
    #[must_use]
    pub fn with_colors(mut self, colors: LightColors) -> Self {
        self.colors = colors;
        self
    }
}

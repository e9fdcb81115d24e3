//! # Orbit Camera
//!
//! A camera that circles a fixed look-at point on a sphere. Its state is the
//! spherical triple `(alpha, beta, radius)`; the Cartesian eye position is
//! derived from it on demand.
//!
//! ## Coordinate System
//! Right-handed, Y-up. `alpha` is the azimuth measured from +Z towards +X,
//! `beta` the elevation above the XZ plane:
//!
//! ```text
//! eye = look_at + (r·cosβ·sinα, r·sinβ, r·cosβ·cosα)
//! ```

use crate::foundation::math::{utils, Mat4, Mat4Ext, Vec3};
use serde::{Deserialize, Serialize};

/// Highest elevation the camera may reach, in radians
pub const MAX_ELEVATION: f32 = 1.5;

/// Closest the camera may get to its look-at point
pub const MIN_RADIUS: f32 = 1.0;

/// Perspective projection parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Projection {
    /// Vertical field of view in degrees
    pub fov: f32,
    /// Near clipping distance
    pub near: f32,
    /// Far clipping distance
    pub far: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov: 60.0,
            near: 1.0,
            far: 1000.0,
        }
    }
}

impl Projection {
    /// Projection matrix for a viewport with the given aspect ratio
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective(self.fov, aspect, self.near, self.far)
    }
}

/// Camera orbiting a look-at point
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitCamera {
    /// Azimuth in radians
    pub alpha: f32,

    /// Elevation in radians, kept within `±MAX_ELEVATION`
    pub beta: f32,

    /// Distance to the look-at point, at least `MIN_RADIUS`
    pub radius: f32,

    /// Point the camera orbits and looks at
    pub look_at: Vec3,

    /// Up direction for the view matrix
    pub up: Vec3,

    /// Projection parameters
    pub projection: Projection,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            alpha: 0.0,
            beta: 0.5,
            radius: 100.0,
            look_at: Vec3::zeros(),
            up: Vec3::y(),
            projection: Projection::default(),
        }
    }
}

impl OrbitCamera {
    /// Create a camera whose eye sits at `position`.
    ///
    /// The spherical coordinates are recovered from the offset to `look_at`
    /// and then clamped, so an eye closer than `MIN_RADIUS` or steeper than
    /// `MAX_ELEVATION` is moved onto the allowed region.
    pub fn from_position(position: Vec3, look_at: Vec3, up: Vec3, projection: Projection) -> Self {
        let offset = position - look_at;
        let distance = offset.norm();

        let (alpha, beta) = if distance > 0.0 {
            let beta = (offset.y / distance).clamp(-1.0, 1.0).asin();
            (offset.x.atan2(offset.z), beta)
        } else {
            (0.0, 0.0)
        };

        let camera = Self {
            alpha,
            beta: utils::clamp(beta, -MAX_ELEVATION, MAX_ELEVATION),
            radius: distance.max(MIN_RADIUS),
            look_at,
            up,
            projection,
        };
        log::debug!(
            "orbit camera: alpha={:.3} beta={:.3} radius={:.3}",
            camera.alpha,
            camera.beta,
            camera.radius
        );
        camera
    }

    /// Eye position in world space
    pub fn position(&self) -> Vec3 {
        let (sin_a, cos_a) = self.alpha.sin_cos();
        let (sin_b, cos_b) = self.beta.sin_cos();
        self.look_at + Vec3::new(self.radius * cos_b * sin_a, self.radius * sin_b, self.radius * cos_b * cos_a)
    }

    /// Rotate around the look-at point
    pub fn orbit(&mut self, delta_alpha: f32, delta_beta: f32) {
        self.alpha += delta_alpha;
        self.beta = utils::clamp(self.beta + delta_beta, -MAX_ELEVATION, MAX_ELEVATION);
    }

    /// Move towards (positive `delta`) or away from the look-at point
    pub fn zoom(&mut self, delta: f32) {
        self.radius = (self.radius - delta).max(MIN_RADIUS);
    }

    /// World-to-view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at(self.position(), self.look_at, self.up)
    }

    /// View-to-clip matrix for the given aspect ratio
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        self.projection.matrix(aspect)
    }
}

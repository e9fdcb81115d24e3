//! Bicubic Bézier patch evaluation and tessellation
//!
//! A patch is a row-major 4x4 control net. Position is
//! `S(u, v) = U · M · P · Mᵀ · Vᵀ` with `M` the cubic Bézier basis matrix,
//! evaluated here as `bu · P · bv` where `bu = Mᵀ·U` and `bv = Mᵀ·V` are the
//! Bernstein weights. At `t = 0` and `t = 1` those weights are exactly one-hot,
//! so the patch corners reproduce their control points bit for bit.

use crate::foundation::math::{constants, Mat4, Vec2, Vec3, Vec4};
use crate::geometry::mesh::Mesh;
use crate::geometry::primitives::GeometryError;

/// Number of control points in one bicubic patch
pub const PATCH_SIZE: usize = 16;

/// Cubic Bézier basis matrix
#[rustfmt::skip]
pub fn bezier_basis() -> Mat4 {
    Mat4::new(
        -1.0, 3.0, -3.0, 1.0,
        3.0, -6.0, 3.0, 0.0,
        -3.0, 3.0, 0.0, 0.0,
        1.0, 0.0, 0.0, 0.0,
    )
}

/// Bernstein weights `Mᵀ · [t³, t², t, 1]`
fn weights(t: f32) -> Vec4 {
    bezier_basis().transpose() * Vec4::new(t * t * t, t * t, t, 1.0)
}

/// Derivative weights `Mᵀ · [3t², 2t, 1, 0]`
fn derivative_weights(t: f32) -> Vec4 {
    bezier_basis().transpose() * Vec4::new(3.0 * t * t, 2.0 * t, 1.0, 0.0)
}

/// One bicubic Bézier patch with its 16 resolved control points
#[derive(Debug, Clone, PartialEq)]
pub struct BezierPatch {
    control_points: [Vec3; PATCH_SIZE],
}

impl BezierPatch {
    /// Create a patch from a row-major control net (row index follows u)
    pub fn new(control_points: [Vec3; PATCH_SIZE]) -> Self {
        Self { control_points }
    }

    /// Resolve 16 indices against a shared control-point pool.
    ///
    /// Returns the first out-of-range index on failure.
    pub fn from_indices(indices: &[u32; PATCH_SIZE], pool: &[Vec3]) -> Result<Self, u32> {
        let mut control_points = [Vec3::zeros(); PATCH_SIZE];
        for (slot, &index) in control_points.iter_mut().zip(indices) {
            *slot = *pool.get(index as usize).ok_or(index)?;
        }
        Ok(Self { control_points })
    }

    /// The row-major control net
    pub fn control_points(&self) -> &[Vec3; PATCH_SIZE] {
        &self.control_points
    }

    /// Control point at `row` (u direction) and `col` (v direction)
    pub fn control_point(&self, row: usize, col: usize) -> Vec3 {
        self.control_points[row * 4 + col]
    }

    fn blend(&self, bu: &Vec4, bv: &Vec4) -> Vec3 {
        let mut sum = Vec3::zeros();
        for row in 0..4 {
            for col in 0..4 {
                sum += self.control_points[row * 4 + col] * (bu[row] * bv[col]);
            }
        }
        sum
    }

    /// Surface position at `(u, v)`
    pub fn surface_point(&self, u: f32, v: f32) -> Vec3 {
        self.blend(&weights(u), &weights(v))
    }

    /// Partial derivatives `(∂S/∂u, ∂S/∂v)` at `(u, v)`
    pub fn partial_derivatives(&self, u: f32, v: f32) -> (Vec3, Vec3) {
        let du = self.blend(&derivative_weights(u), &weights(v));
        let dv = self.blend(&weights(u), &derivative_weights(v));
        (du, dv)
    }

    /// Unit normal `∂S/∂u × ∂S/∂v`, or `None` where the surface is degenerate
    pub fn try_normal(&self, u: f32, v: f32) -> Option<Vec3> {
        let (du, dv) = self.partial_derivatives(u, v);
        let normal = du.cross(&dv);
        if normal.norm_squared() <= constants::LENGTH_EPSILON || !normal.iter().all(|c| c.is_finite()) {
            None
        } else {
            Some(normal.normalize())
        }
    }

    /// Unit normal at `(u, v)`, +Y where the surface is degenerate
    pub fn normal(&self, u: f32, v: f32) -> Vec3 {
        self.try_normal(u, v).unwrap_or_else(Vec3::y)
    }

    /// Sample the patch on a uniform `(level + 1)²` grid and append
    /// `level² * 6` triangle-list vertices to the streams.
    ///
    /// Returns how many samples needed the fallback normal.
    fn tessellate_into(
        &self,
        level: u32,
        positions: &mut Vec<Vec3>,
        normals: &mut Vec<Vec3>,
        tex_coords: &mut Vec<Vec2>,
    ) -> usize {
        let side = level as usize + 1;
        let mut samples = Vec::with_capacity(side * side);
        let mut fallbacks = 0;

        for i in 0..=level {
            let u = i as f32 / level as f32;
            for j in 0..=level {
                let v = j as f32 / level as f32;
                let normal = self.try_normal(u, v).unwrap_or_else(|| {
                    fallbacks += 1;
                    Vec3::y()
                });
                samples.push((self.surface_point(u, v), normal, Vec2::new(u, 1.0 - v)));
            }
        }

        for i in 0..level as usize {
            for j in 0..level as usize {
                let s00 = i * side + j;
                let s10 = (i + 1) * side + j;
                let s11 = (i + 1) * side + j + 1;
                let s01 = i * side + j + 1;

                for index in [s00, s10, s11, s11, s01, s00] {
                    let (position, normal, uv) = samples[index];
                    positions.push(position);
                    normals.push(normal);
                    tex_coords.push(uv);
                }
            }
        }

        fallbacks
    }
}

/// A collection of patches tessellated together into one mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatchSet {
    patches: Vec<BezierPatch>,
}

impl PatchSet {
    /// Create a set from already-resolved patches
    pub fn new(patches: Vec<BezierPatch>) -> Self {
        Self { patches }
    }

    /// The patches in file order
    pub fn patches(&self) -> &[BezierPatch] {
        &self.patches
    }

    /// Number of patches
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    /// Whether the set holds no patches
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Tessellate every patch at `level` subdivisions per parametric axis.
    ///
    /// Produces `patches * level² * 6` vertices with analytic normals and
    /// texture coordinates `(u, 1 - v)`.
    pub fn tessellate(&self, level: u32) -> Result<Mesh, GeometryError> {
        if level == 0 {
            return Err(GeometryError::ZeroSubdivisions {
                parameter: "tessellation",
            });
        }

        let capacity = self.patches.len() * (level as usize).pow(2) * 6;
        let mut positions = Vec::with_capacity(capacity);
        let mut normals = Vec::with_capacity(capacity);
        let mut tex_coords = Vec::with_capacity(capacity);

        let mut fallbacks = 0;
        for patch in &self.patches {
            fallbacks += patch.tessellate_into(level, &mut positions, &mut normals, &mut tex_coords);
        }
        if fallbacks > 0 {
            log::warn!("{fallbacks} degenerate patch samples used the +Y fallback normal");
        }

        log::debug!(
            "tessellated {} patches at level {level} -> {} vertices",
            self.patches.len(),
            positions.len()
        );
        Ok(Mesh::with_attributes(positions, normals, tex_coords))
    }
}

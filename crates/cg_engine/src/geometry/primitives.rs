//! Procedural primitive generation
//!
//! Every generator returns a full triangle-list [`Mesh`] (positions, normals
//! and texture coordinates). Triangles are counter-clockwise when seen from
//! outside the surface. Callers that want the geometry-only record shape can
//! strip the attributes with [`Mesh::into_geometry_only`].

use crate::foundation::math::{constants, utils, Vec2, Vec3};
use crate::geometry::mesh::Mesh;
use thiserror::Error;

/// Invalid shape parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeometryError {
    /// A subdivision count was zero
    #[error("{parameter} must be at least 1")]
    ZeroSubdivisions {
        /// Name of the offending parameter
        parameter: &'static str,
    },

    /// A size was non-positive or not finite
    #[error("{parameter} must be a positive finite number, got {value}")]
    InvalidDimension {
        /// Name of the offending parameter
        parameter: &'static str,
        /// The rejected value
        value: f32,
    },
}

fn check_count(parameter: &'static str, value: u32) -> Result<(), GeometryError> {
    if value == 0 {
        Err(GeometryError::ZeroSubdivisions { parameter })
    } else {
        Ok(())
    }
}

fn check_dimension(parameter: &'static str, value: f32) -> Result<(), GeometryError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidDimension { parameter, value })
    }
}

/// Cells in a `divisions × divisions` grid, counted in `usize`
fn grid_cells(divisions: u32) -> usize {
    divisions as usize * divisions as usize
}

/// Orientation of one square face: its outward normal and in-plane axes.
///
/// `u_axis × v_axis == normal`, so walking the grid in (u, v) order gives
/// counter-clockwise triangles seen from the normal side.
#[derive(Debug, Clone, Copy)]
struct FaceFrame {
    normal: Vec3,
    u_axis: Vec3,
    v_axis: Vec3,
}

impl FaceFrame {
    fn new(normal: [f32; 3], u_axis: [f32; 3], v_axis: [f32; 3]) -> Self {
        Self {
            normal: Vec3::new(normal[0], normal[1], normal[2]),
            u_axis: Vec3::new(u_axis[0], u_axis[1], u_axis[2]),
            v_axis: Vec3::new(v_axis[0], v_axis[1], v_axis[2]),
        }
    }
}

/// Cube faces: top, bottom, front, back, left, right.
///
/// The bottom face runs its v axis along +Z while the top runs it along -Z,
/// so the texture is mirrored consistently across the two caps.
fn box_faces() -> [FaceFrame; 6] {
    [
        FaceFrame::new([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        FaceFrame::new([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
        FaceFrame::new([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        FaceFrame::new([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        FaceFrame::new([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        FaceFrame::new([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
    ]
}

/// Builder collecting the three parallel vertex streams
#[derive(Debug, Default)]
struct MeshBuilder {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    tex_coords: Vec<Vec2>,
}

impl MeshBuilder {
    fn with_capacity(vertices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            tex_coords: Vec::with_capacity(vertices),
        }
    }

    fn push(&mut self, position: Vec3, normal: Vec3, tex_coord: Vec2) {
        self.positions.push(position);
        self.normals.push(normal);
        self.tex_coords.push(tex_coord);
    }

    /// Tessellate one square face of side `length` whose center sits at
    /// `normal * offset`, into `divisions²` cells of two triangles each.
    fn push_face(&mut self, frame: &FaceFrame, offset: f32, length: f32, divisions: u32) {
        let half = length / 2.0;
        let step = length / divisions as f32;
        let center = frame.normal * offset;
        let grid = divisions as f32;

        let corner = |i: u32, j: u32| {
            let s = i as f32 * step - half;
            let t = j as f32 * step - half;
            let position = center + frame.u_axis * s + frame.v_axis * t;
            let uv = Vec2::new(i as f32 / grid, j as f32 / grid);
            (position, uv)
        };

        for i in 0..divisions {
            for j in 0..divisions {
                let (p00, t00) = corner(i, j);
                let (p10, t10) = corner(i + 1, j);
                let (p11, t11) = corner(i + 1, j + 1);
                let (p01, t01) = corner(i, j + 1);

                self.push(p00, frame.normal, t00);
                self.push(p10, frame.normal, t10);
                self.push(p11, frame.normal, t11);

                self.push(p11, frame.normal, t11);
                self.push(p01, frame.normal, t01);
                self.push(p00, frame.normal, t00);
            }
        }
    }

    fn build(self) -> Mesh {
        Mesh::with_attributes(self.positions, self.normals, self.tex_coords)
    }
}

/// Generator for the built-in primitive shapes
pub struct PrimitiveGenerator;

impl PrimitiveGenerator {
    /// Square of side `length` in the XZ plane, centered at the origin, facing +Y.
    ///
    /// Produces `6 * divisions²` vertices.
    pub fn plane(length: f32, divisions: u32) -> Result<Mesh, GeometryError> {
        check_dimension("length", length)?;
        check_count("divisions", divisions)?;

        let cells = grid_cells(divisions);
        let mut builder = MeshBuilder::with_capacity(cells * 6);
        builder.push_face(&box_faces()[0], 0.0, length, divisions);

        log::debug!("plane: length={length} divisions={divisions} -> {} vertices", builder.positions.len());
        Ok(builder.build())
    }

    /// Cube of side `length` centered at the origin, each face split into
    /// `divisions²` cells.
    ///
    /// Produces `36 * divisions²` vertices; normals are the outward face axis.
    pub fn cube(length: f32, divisions: u32) -> Result<Mesh, GeometryError> {
        check_dimension("length", length)?;
        check_count("divisions", divisions)?;

        let cells = grid_cells(divisions);
        let mut builder = MeshBuilder::with_capacity(cells * 36);
        for face in &box_faces() {
            builder.push_face(face, length / 2.0, length, divisions);
        }

        log::debug!("box: length={length} divisions={divisions} -> {} vertices", builder.positions.len());
        Ok(builder.build())
    }

    /// Latitude/longitude sphere centered at the origin.
    ///
    /// The `(stacks + 1) * (slices + 1)` grid is computed once and then
    /// expanded into `stacks * slices * 6` triangle-list vertices.
    pub fn sphere(radius: f32, slices: u32, stacks: u32) -> Result<Mesh, GeometryError> {
        check_dimension("radius", radius)?;
        check_count("slices", slices)?;
        check_count("stacks", stacks)?;

        let ring = (slices + 1) as usize;
        let mut grid = Vec::with_capacity((stacks as usize + 1) * ring);
        for i in 0..=stacks {
            let phi = constants::PI * i as f32 / stacks as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();
            for j in 0..=slices {
                let theta = constants::TAU * j as f32 / slices as f32;
                let (sin_theta, cos_theta) = theta.sin_cos();

                let position = Vec3::new(
                    radius * sin_phi * cos_theta,
                    radius * cos_phi,
                    radius * sin_phi * sin_theta,
                );
                let normal = utils::normalize_or(position, Vec3::y());
                let uv = Vec2::new(j as f32 / slices as f32, i as f32 / stacks as f32);
                grid.push((position, normal, uv));
            }
        }

        let mut builder = MeshBuilder::with_capacity(stacks as usize * slices as usize * 6);
        for i in 0..stacks as usize {
            for j in 0..slices as usize {
                let first = i * ring + j;
                let second = first + ring;

                for index in [first, first + 1, second, second, first + 1, second + 1] {
                    let (position, normal, uv) = grid[index];
                    builder.push(position, normal, uv);
                }
            }
        }

        log::debug!(
            "sphere: radius={radius} slices={slices} stacks={stacks} -> {} vertices",
            builder.positions.len()
        );
        Ok(builder.build())
    }

    /// Cone standing on the XZ plane with its apex at `(0, height, 0)`.
    ///
    /// The base is a fan of `slices` triangles facing -Y. The lateral surface
    /// has `stacks` rings tapering from `radius` to zero, with one flat normal
    /// per quad taken from the edges of its first triangle.
    pub fn cone(radius: f32, height: f32, slices: u32, stacks: u32) -> Result<Mesh, GeometryError> {
        check_dimension("radius", radius)?;
        check_dimension("height", height)?;
        check_count("slices", slices)?;
        check_count("stacks", stacks)?;

        let angle_step = constants::TAU / slices as f32;
        let stack_height = height / stacks as f32;
        let down = Vec3::new(0.0, -1.0, 0.0);

        let mut builder = MeshBuilder::with_capacity(slices as usize * (3 + stacks as usize * 6));

        for i in 0..slices {
            let (sin_a, cos_a) = (i as f32 * angle_step).sin_cos();
            let (sin_b, cos_b) = ((i + 1) as f32 * angle_step).sin_cos();

            builder.push(Vec3::zeros(), down, Vec2::new(0.5, 0.5));
            builder.push(
                Vec3::new(radius * cos_a, 0.0, radius * sin_a),
                down,
                Vec2::new(cos_a * 0.5 + 0.5, sin_a * 0.5 + 0.5),
            );
            builder.push(
                Vec3::new(radius * cos_b, 0.0, radius * sin_b),
                down,
                Vec2::new(cos_b * 0.5 + 0.5, sin_b * 0.5 + 0.5),
            );
        }

        for j in 0..stacks {
            let current_radius = radius * (1.0 - j as f32 / stacks as f32);
            let next_radius = radius * (1.0 - (j + 1) as f32 / stacks as f32);
            let current_height = j as f32 * stack_height;
            let next_height = (j + 1) as f32 * stack_height;
            let v0_tex = j as f32 / stacks as f32;
            let v1_tex = (j + 1) as f32 / stacks as f32;

            for i in 0..slices {
                let (sin_a, cos_a) = (i as f32 * angle_step).sin_cos();
                let (sin_b, cos_b) = ((i + 1) as f32 * angle_step).sin_cos();
                let u0 = i as f32 / slices as f32;
                let u1 = (i + 1) as f32 / slices as f32;

                let v0 = Vec3::new(current_radius * cos_a, current_height, current_radius * sin_a);
                let v1 = Vec3::new(next_radius * cos_a, next_height, next_radius * sin_a);
                let v2 = Vec3::new(current_radius * cos_b, current_height, current_radius * sin_b);
                let v3 = Vec3::new(next_radius * cos_b, next_height, next_radius * sin_b);

                let normal = facet_normal(v0, v1, v2);

                builder.push(v0, normal, Vec2::new(u0, v0_tex));
                builder.push(v1, normal, Vec2::new(u0, v1_tex));
                builder.push(v2, normal, Vec2::new(u1, v0_tex));

                builder.push(v1, normal, Vec2::new(u0, v1_tex));
                builder.push(v3, normal, Vec2::new(u1, v1_tex));
                builder.push(v2, normal, Vec2::new(u1, v0_tex));
            }
        }

        log::debug!(
            "cone: radius={radius} height={height} slices={slices} stacks={stacks} -> {} vertices",
            builder.positions.len()
        );
        Ok(builder.build())
    }
}

/// Flat normal of triangle `(a, b, c)`, +Y if the triangle is degenerate
fn facet_normal(a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let normal = (b - a).cross(&(c - a));
    if normal.norm_squared() <= constants::LENGTH_EPSILON {
        log::warn!("degenerate facet at {a:?}, using +Y normal");
    }
    utils::normalize_or(normal, Vec3::y())
}

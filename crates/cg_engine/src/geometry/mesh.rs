//! Triangle-list mesh representation
//!
//! A [`Mesh`] is a flat triangle list: every consecutive triple of positions
//! is one triangle, wound counter-clockwise when seen from the side its
//! normal points to. Normals and texture coordinates are optional, but when
//! present they run parallel to the positions.
//!
//! Meshes are produced once (by the primitive generator, the patch
//! tessellator, or the mesh file parser) and never mutated afterwards.

use crate::foundation::math::{Vec2, Vec3};
use thiserror::Error;

/// Mesh invariant violations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// Vertex count is not a multiple of three
    #[error("vertex count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),

    /// A parallel attribute stream has the wrong length
    #[error("{attribute} count {found} does not match vertex count {expected}")]
    AttributeLength {
        /// Which attribute stream is wrong
        attribute: &'static str,
        /// Number of vertices
        expected: usize,
        /// Number of attribute entries
        found: usize,
    },
}

/// Interleaved vertex layout handed to a renderer for upload
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in model space
    pub position: [f32; 3],

    /// Unit normal
    pub normal: [f32; 3],

    /// Texture coordinates
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }
}

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, or `None` for an empty iterator
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = *points.next()?;
        Some(points.fold(Self::new(first, first), |acc, p| Self {
            min: acc.min.inf(p),
            max: acc.max.sup(p),
        }))
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }
}

/// Triangle-list mesh with optional parallel normal and UV streams
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex positions, three per triangle
    pub positions: Vec<Vec3>,

    /// Per-vertex normals, if present
    pub normals: Option<Vec<Vec3>>,

    /// Per-vertex texture coordinates, if present
    pub tex_coords: Option<Vec<Vec2>>,
}

impl Mesh {
    /// Create a geometry-only mesh
    pub fn from_positions(positions: Vec<Vec3>) -> Self {
        Self {
            positions,
            normals: None,
            tex_coords: None,
        }
    }

    /// Create a mesh carrying normals and texture coordinates
    pub fn with_attributes(positions: Vec<Vec3>, normals: Vec<Vec3>, tex_coords: Vec<Vec2>) -> Self {
        Self {
            positions,
            normals: Some(normals),
            tex_coords: Some(tex_coords),
        }
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Whether the mesh has no vertices
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Whether both normals and texture coordinates are present
    pub fn has_attributes(&self) -> bool {
        self.normals.is_some() && self.tex_coords.is_some()
    }

    /// Drop normals and texture coordinates, keeping positions only
    #[must_use]
    pub fn into_geometry_only(self) -> Self {
        Self::from_positions(self.positions)
    }

    /// Check the triangle-list and parallel-stream invariants
    pub fn validate(&self) -> Result<(), MeshError> {
        let count = self.positions.len();
        if count % 3 != 0 {
            return Err(MeshError::IncompleteTriangle(count));
        }
        if let Some(normals) = &self.normals {
            if normals.len() != count {
                return Err(MeshError::AttributeLength {
                    attribute: "normal",
                    expected: count,
                    found: normals.len(),
                });
            }
        }
        if let Some(tex_coords) = &self.tex_coords {
            if tex_coords.len() != count {
                return Err(MeshError::AttributeLength {
                    attribute: "tex_coord",
                    expected: count,
                    found: tex_coords.len(),
                });
            }
        }
        Ok(())
    }

    /// Iterate over triangles as position triples
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.positions.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Bounding box of all positions
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(&self.positions)
    }

    /// Interleave the streams into a GPU-ready vertex array.
    ///
    /// Missing normals default to +Y and missing texture coordinates to (0, 0).
    pub fn interleaved(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let n = self
                    .normals
                    .as_ref()
                    .and_then(|normals| normals.get(i))
                    .copied()
                    .unwrap_or_else(Vec3::y);
                let uv = self
                    .tex_coords
                    .as_ref()
                    .and_then(|uvs| uvs.get(i))
                    .copied()
                    .unwrap_or_else(Vec2::zeros);
                Vertex::new([p.x, p.y, p.z], [n.x, n.y, n.z], [uv.x, uv.y])
            })
            .collect()
    }

    /// Interleaved vertices as raw bytes for buffer upload
    pub fn interleaved_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.interleaved()).to_vec()
    }

    /// Line segments visualising the normals, one `(start, end)` pair per vertex
    pub fn normal_segments(&self, length: f32) -> Vec<(Vec3, Vec3)> {
        match &self.normals {
            Some(normals) => self
                .positions
                .iter()
                .zip(normals)
                .map(|(p, n)| (*p, p + n * length))
                .collect(),
            None => Vec::new(),
        }
    }
}

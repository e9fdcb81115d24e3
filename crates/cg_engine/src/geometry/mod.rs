//! Mesh data and procedural geometry

pub mod bezier;
pub mod mesh;
pub mod primitives;

pub use bezier::{bezier_basis, BezierPatch, PatchSet, PATCH_SIZE};
pub use mesh::{Aabb, Mesh, MeshError, Vertex};
pub use primitives::{GeometryError, PrimitiveGenerator};

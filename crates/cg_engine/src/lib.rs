//! # CG Engine
//!
//! Procedural mesh generation and animated scene-graph evaluation.
//!
//! ## Features
//!
//! - **Primitives**: planes, boxes, spheres and cones as triangle lists
//! - **Bézier Patches**: bicubic surfaces with analytic normals
//! - **Mesh Files**: a line-based text format with lenient parsing
//! - **Scene Graph**: arena-backed group hierarchy with spline and spin animation
//! - **Frames**: per-instant draw lists and path overlays for a renderer
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cg_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let sphere = PrimitiveGenerator::sphere(1.0, 16, 8)?;
//!     MeshFile::save(&sphere, "sphere.3d", &WriteOptions::default())?;
//!
//!     let mut meshes = MeshLibrary::new();
//!     let mesh = meshes.insert("sphere.3d", sphere);
//!     let orbit = Translate::along(
//!         vec![Vec3::new(5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 5.0),
//!              Vec3::new(-5.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -5.0)],
//!         10.0,
//!     );
//!     let scene = SceneGraph::from_groups(vec![
//!         GroupDesc::new(Transform::identity().with_translate(orbit))
//!             .model(Model::new(mesh, "sphere.3d")),
//!     ]);
//!
//!     let world = World::new(WindowSize::default(), OrbitCamera::default(), Vec::new(), scene, meshes)?;
//!     let frame = world.frame(2.5);
//!     println!("{} draws", frame.draws.len());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod core;

pub mod assets;
pub mod config;
pub mod foundation;
pub mod geometry;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{MeshFile, MeshLibrary, Parsed, ParseWarning, PatchFile, RecordFormat, WriteOptions},
        core::{Config, GeneratorConfig, ViewerConfig, WindowSize},
        foundation::{
            collections::{GroupId, MeshId},
            math::{Mat4, Vec2, Vec3},
            time::{Clock, ManualClock, Stopwatch},
        },
        geometry::{BezierPatch, Mesh, PatchSet, PrimitiveGenerator},
        scene::{
            Color, Frame, FrameEvaluator, GroupDesc, Light, LightKind, Material, Model, OrbitCamera, PoseEvaluator,
            Projection, Rotate, SceneBuilder, SceneGraph, Transform, Translate, World,
        },
    };
}

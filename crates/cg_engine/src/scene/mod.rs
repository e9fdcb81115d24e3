//! Scene graph, animation and the per-frame evaluation a renderer consumes

pub mod animation;
pub mod camera;
pub mod frame;
pub mod lighting;
pub mod material;
pub mod scene_graph;
pub mod spline;
pub mod transform;
pub mod world;

pub use animation::{Pose, PoseEvaluator};
pub use camera::{OrbitCamera, Projection};
pub use frame::{DrawCommand, Frame, FrameEvaluator, PathOverlay};
pub use lighting::{Light, LightColors, LightKind};
pub use material::{Color, Material};
pub use scene_graph::{Group, GroupDesc, Model, SceneBuilder, SceneError, SceneGraph};
pub use transform::{Rotate, Transform, TransformIssue, Translate};
pub use world::World;

//! The world context handed to a renderer
//!
//! Holds everything a viewer would otherwise keep in globals: window size,
//! camera, lights, the scene graph and the meshes it draws. Nothing in here
//! reads a clock; callers pass the elapsed time to [`World::frame`].

use super::camera::OrbitCamera;
use super::frame::{Frame, FrameEvaluator};
use super::lighting::Light;
use super::scene_graph::{SceneError, SceneGraph};
use crate::assets::MeshLibrary;
use crate::core::config::{ViewerConfig, WindowSize};
use crate::foundation::math::{Mat4, Point3, Vec3};

/// Explicit scene state
#[derive(Debug)]
pub struct World {
    /// Viewport size
    pub window: WindowSize,

    /// Viewing camera
    pub camera: OrbitCamera,

    /// Light sources, in declaration order
    pub lights: Vec<Light>,

    /// Group hierarchy
    pub scene: SceneGraph,

    /// Meshes referenced by the scene's models
    pub meshes: MeshLibrary,

    evaluator: FrameEvaluator,
}

impl World {
    /// Assemble a world, checking that every model's mesh is in the library
    pub fn new(
        window: WindowSize,
        camera: OrbitCamera,
        lights: Vec<Light>,
        scene: SceneGraph,
        meshes: MeshLibrary,
    ) -> Result<Self, SceneError> {
        if let Some((_, model)) = scene.models().find(|(_, model)| !meshes.contains(model.mesh)) {
            return Err(SceneError::UnknownMesh {
                mesh: model.mesh,
                source_name: model.source.clone(),
            });
        }

        log::info!(
            "world: {} groups, {} meshes, {} lights",
            scene.len(),
            meshes.len(),
            lights.len()
        );
        Ok(Self {
            window,
            camera,
            lights,
            scene,
            meshes,
            evaluator: FrameEvaluator::default(),
        })
    }

    /// Apply viewer settings: window size, projection and overlay sampling
    pub fn configure(&mut self, config: &ViewerConfig) {
        self.window = config.window;
        self.camera.projection = config.projection;
        self.evaluator = FrameEvaluator::new(config.curve_samples, config.show_paths);
    }

    /// The evaluator used by [`World::frame`]
    pub fn evaluator(&self) -> &FrameEvaluator {
        &self.evaluator
    }

    /// Width over height of the viewport
    pub fn aspect_ratio(&self) -> f32 {
        self.window.aspect_ratio()
    }

    /// Combined projection and view matrix for the current camera
    pub fn view_projection(&self) -> Mat4 {
        self.camera.projection_matrix(self.aspect_ratio()) * self.camera.view_matrix()
    }

    /// Evaluate the scene at `elapsed` seconds
    pub fn frame(&self, elapsed: f32) -> Frame {
        self.evaluator.evaluate(&self.scene, elapsed)
    }

    /// World-space normal segments of every mesh drawn in `frame`
    pub fn normal_overlay(&self, frame: &Frame, length: f32) -> Vec<(Vec3, Vec3)> {
        frame
            .draws
            .iter()
            .filter_map(|draw| self.meshes.get(draw.mesh).map(|mesh| (draw, mesh)))
            .flat_map(|(draw, mesh)| {
                mesh.normal_segments(length).into_iter().map(move |(start, end)| {
                    (
                        draw.world.transform_point(&Point3::from(start)).coords,
                        draw.world.transform_point(&Point3::from(end)).coords,
                    )
                })
            })
            .collect()
    }
}

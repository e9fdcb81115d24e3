//! Per-frame evaluation of a scene graph
//!
//! A [`Frame`] is everything a renderer needs to draw one image: a world
//! matrix per model and, optionally, the paths of spline-animated groups.
//! It is rebuilt from scratch for every elapsed-time sample.

use super::animation::PoseEvaluator;
use super::scene_graph::SceneGraph;
use super::spline;
use crate::foundation::collections::{GroupId, MeshId, SecondaryMap};
use crate::foundation::math::{Mat4, Point3, Vec3};

/// One model to draw
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCommand {
    /// Group the model belongs to
    pub group: GroupId,
    /// Index of the model within its group
    pub model_index: usize,
    /// Mesh to draw
    pub mesh: MeshId,
    /// Model-to-world matrix
    pub world: Mat4,
}

/// World-space polyline of an animated group's translation path
#[derive(Debug, Clone, PartialEq)]
pub struct PathOverlay {
    /// Group that moves along the path
    pub group: GroupId,
    /// Closed polyline, first and last points coincide
    pub points: Vec<Vec3>,
}

/// Evaluated scene at one instant
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// Seconds since animation start
    pub elapsed: f32,
    /// Draws in depth-first pre-order
    pub draws: Vec<DrawCommand>,
    /// Translation paths, in the same order as their groups
    pub paths: Vec<PathOverlay>,
}

/// Walks a scene graph and composes transforms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameEvaluator {
    /// Polyline segments per translation path
    pub curve_samples: usize,
    /// Whether frames carry path overlays
    pub include_paths: bool,
}

impl Default for FrameEvaluator {
    fn default() -> Self {
        Self {
            curve_samples: 100,
            include_paths: true,
        }
    }
}

impl FrameEvaluator {
    /// Evaluator sampling paths with `curve_samples` segments
    pub fn new(curve_samples: usize, include_paths: bool) -> Self {
        Self {
            curve_samples,
            include_paths,
        }
    }

    /// World matrix of every group at `elapsed` seconds
    pub fn world_matrices(&self, scene: &SceneGraph, elapsed: f32) -> SecondaryMap<GroupId, Mat4> {
        let mut matrices = SecondaryMap::new();
        self.traverse(scene, elapsed, |id, _, world| {
            matrices.insert(id, *world);
        });
        matrices
    }

    /// Evaluate the scene at `elapsed` seconds
    pub fn evaluate(&self, scene: &SceneGraph, elapsed: f32) -> Frame {
        let mut frame = Frame {
            elapsed,
            ..Frame::default()
        };

        self.traverse(scene, elapsed, |id, parent_world, world| {
            let Some(group) = scene.get(id) else {
                return;
            };

            frame.draws.extend(group.models.iter().enumerate().map(|(model_index, model)| DrawCommand {
                group: id,
                model_index,
                mesh: model.mesh,
                world: *world,
            }));

            let translate = &group.transform.translate;
            if self.include_paths && translate.is_animated() {
                let points = spline::closed_curve(&translate.control_points, self.curve_samples)
                    .into_iter()
                    .map(|p| parent_world.transform_point(&Point3::from(p)).coords)
                    .collect();
                frame.paths.push(PathOverlay { group: id, points });
            }
        });

        log::trace!(
            "frame at {elapsed:.3}s: {} draws, {} paths",
            frame.draws.len(),
            frame.paths.len()
        );
        frame
    }

    /// Visit groups in pre-order with `(group, parent world, world)`
    fn traverse(&self, scene: &SceneGraph, elapsed: f32, mut visit: impl FnMut(GroupId, &Mat4, &Mat4)) {
        let mut stack: Vec<(GroupId, Mat4)> = scene.roots().iter().rev().map(|&id| (id, Mat4::identity())).collect();

        while let Some((id, parent_world)) = stack.pop() {
            let Some(group) = scene.get(id) else {
                continue;
            };
            let world = parent_world * PoseEvaluator::local_matrix(&group.transform, elapsed);
            visit(id, &parent_world, &world);
            stack.extend(group.children().iter().rev().map(|&child| (child, world)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::collections::SlotMap;
    use crate::scene::scene_graph::{GroupDesc, Model};
    use crate::scene::transform::{Rotate, Transform, Translate};
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-4;

    fn mesh_id() -> MeshId {
        let mut meshes: SlotMap<MeshId, ()> = SlotMap::with_key();
        meshes.insert(())
    }

    /// Sun spinning once every 4 s with a planet 10 units out along +X
    fn solar_system(mesh: MeshId) -> SceneGraph {
        let planet = GroupDesc::new(Transform::identity().with_translate(Translate::fixed(Vec3::new(10.0, 0.0, 0.0))))
            .model(Model::new(mesh, "planet.3d"));
        let sun = GroupDesc::new(Transform::identity().with_rotate(Rotate::spinning(4.0, Vec3::y())))
            .model(Model::new(mesh, "sun.3d"))
            .child(planet);
        SceneGraph::from_groups(vec![sun])
    }

    #[test]
    fn test_child_inherits_parent_rotation() {
        let mesh = mesh_id();
        let scene = solar_system(mesh);
        let frame = FrameEvaluator::default().evaluate(&scene, 1.0);

        assert_eq!(frame.draws.len(), 2);
        assert_eq!(frame.draws[0].model_index, 0);
        let planet = &frame.draws[1];
        assert_eq!(planet.mesh, mesh);

        // A quarter turn about +Y carries +X to -Z
        let centre = planet.world.transform_point(&Point3::origin());
        assert_relative_eq!(centre, Point3::new(0.0, 0.0, -10.0), epsilon = EPSILON);
        assert!(frame.paths.is_empty());
    }

    #[test]
    fn test_frames_are_independent_of_history() {
        let scene = solar_system(mesh_id());
        let evaluator = FrameEvaluator::default();
        let direct = evaluator.evaluate(&scene, 3.0);
        evaluator.evaluate(&scene, 1.0);
        evaluator.evaluate(&scene, 2.5);
        assert_eq!(evaluator.evaluate(&scene, 3.0), direct);
    }

    #[test]
    fn test_paths_use_parent_frame() {
        let mesh = mesh_id();
        let points = vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -1.0),
        ];
        let mover = GroupDesc::new(Transform::identity().with_translate(Translate::along(points, 8.0)))
            .model(Model::new(mesh, "moon.3d"));
        let root = GroupDesc::new(Transform::identity().with_translate(Translate::fixed(Vec3::new(0.0, 5.0, 0.0))))
            .child(mover);
        let scene = SceneGraph::from_groups(vec![root]);

        let frame = FrameEvaluator::new(8, true).evaluate(&scene, 2.0);
        assert_eq!(frame.paths.len(), 1);
        let path = &frame.paths[0];
        assert_eq!(path.points.len(), 9);
        assert_relative_eq!(path.points[0], Vec3::new(1.0, 5.0, 0.0), epsilon = EPSILON);

        // At t = 0.25 the mover sits on the second control point, lifted by its parent
        let centre = frame.draws[0].world.transform_point(&Point3::origin());
        assert_relative_eq!(centre, Point3::new(0.0, 5.0, 1.0), epsilon = EPSILON);
        assert_relative_eq!(path.points[2], centre.coords, epsilon = EPSILON);

        let no_paths = FrameEvaluator::new(8, false).evaluate(&scene, 2.0);
        assert!(no_paths.paths.is_empty());
    }

    #[test]
    fn test_world_matrices_cover_every_group() {
        let scene = solar_system(mesh_id());
        let matrices = FrameEvaluator::default().world_matrices(&scene, 0.0);
        assert_eq!(matrices.len(), scene.len());
        for (id, _) in scene.walk() {
            assert!(matrices.contains_key(id));
        }
    }
}

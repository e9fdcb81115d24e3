//! Time-driven pose evaluation
//!
//! [`PoseEvaluator`] is a pure function of a [`Transform`] and the elapsed
//! time. It reads no clock and keeps no state between calls.

use super::spline;
use super::transform::{Rotate, Transform, Translate};
use crate::foundation::math::{self, constants, utils, Mat4, Quat, Unit, Vec3};

/// A transform sampled at one instant
#[derive(Debug, Clone, PartialEq)]
pub struct Pose {
    /// Per-axis scale
    pub scale: Vec3,

    /// Rotation angle in degrees
    pub angle: f32,

    /// Rotation axis as configured
    pub axis: Vec3,

    /// Translation
    pub translation: Vec3,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            scale: Vec3::new(1.0, 1.0, 1.0),
            angle: 0.0,
            axis: Vec3::y(),
            translation: Vec3::zeros(),
        }
    }
}

impl Pose {
    /// The identity pose
    pub fn identity() -> Self {
        Self::default()
    }

    /// Rotation as a unit quaternion; identity for a zero axis
    pub fn rotation(&self) -> Quat {
        match Unit::try_new(self.axis, constants::LENGTH_EPSILON) {
            Some(axis) => Quat::from_axis_angle(&axis, utils::deg_to_rad(self.angle)),
            None => Quat::identity(),
        }
    }

    /// Convert to a position/rotation/scale transform
    pub fn to_transform(&self) -> math::Transform {
        math::Transform::new(self.translation, self.rotation(), self.scale)
    }

    /// Local matrix `T · R · S`
    pub fn to_matrix(&self) -> Mat4 {
        self.to_transform().to_matrix()
    }
}

/// Samples transforms at a given elapsed time
pub struct PoseEvaluator;

impl PoseEvaluator {
    /// Rotation angle in degrees, or `None` when the rotation is inactive.
    ///
    /// A positive duration turns the group once every `duration` seconds,
    /// ignoring the configured angle.
    pub fn rotation_angle(rotate: &Rotate, elapsed: f32) -> Option<f32> {
        if !rotate.active {
            return None;
        }
        if rotate.duration > 0.0 {
            Some((elapsed * (360.0 / rotate.duration)).rem_euclid(360.0))
        } else {
            Some(rotate.angle)
        }
    }

    /// Translation at `elapsed` seconds.
    ///
    /// Animated translations follow the closed spline with period
    /// `duration`; otherwise the first control point is used as a fixed offset.
    pub fn translation(translate: &Translate, elapsed: f32) -> Vec3 {
        if !translate.active {
            return Vec3::zeros();
        }
        let Some(first) = translate.control_points.first() else {
            return Vec3::zeros();
        };

        if translate.is_animated() {
            let t = elapsed.rem_euclid(translate.duration) / translate.duration;
            spline::catmull_rom(&translate.control_points, t).unwrap_or(*first)
        } else {
            *first
        }
    }

    /// Sample every component of `transform` at `elapsed` seconds
    pub fn evaluate(transform: &Transform, elapsed: f32) -> Pose {
        let mut pose = Pose::identity();

        if let Some(scale) = transform.scale {
            pose.scale = scale;
        }
        if let Some(angle) = Self::rotation_angle(&transform.rotate, elapsed) {
            pose.angle = angle;
            pose.axis = transform.rotate.axis;
        }
        pose.translation = Self::translation(&transform.translate, elapsed);

        pose
    }

    /// Local matrix of `transform` at `elapsed` seconds
    pub fn local_matrix(transform: &Transform, elapsed: f32) -> Mat4 {
        Self::evaluate(transform, elapsed).to_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Point3;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_fixed_rotation_ignores_time() {
        let rotate = Rotate::fixed(90.0, Vec3::y());
        for elapsed in [0.0, 1.3, 57.0] {
            assert_eq!(PoseEvaluator::rotation_angle(&rotate, elapsed), Some(90.0));
        }
    }

    #[test]
    fn test_spinning_rotation_period() {
        let rotate = Rotate::spinning(4.0, Vec3::y());
        assert_relative_eq!(PoseEvaluator::rotation_angle(&rotate, 2.0).unwrap(), 180.0, epsilon = EPSILON);
        assert_relative_eq!(PoseEvaluator::rotation_angle(&rotate, 5.0).unwrap(), 90.0, epsilon = EPSILON);
        assert_relative_eq!(PoseEvaluator::rotation_angle(&rotate, 0.0).unwrap(), 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_negative_duration_is_static() {
        let mut rotate = Rotate::fixed(30.0, Vec3::x());
        rotate.duration = -1.0;
        assert_eq!(PoseEvaluator::rotation_angle(&rotate, 3.0), Some(30.0));

        let translate = Translate::along(vec![Vec3::x(), Vec3::y(), Vec3::z(), Vec3::zeros()], -2.0);
        assert_eq!(PoseEvaluator::translation(&translate, 0.7), Vec3::x());
    }

    #[test]
    fn test_inactive_components_are_identity() {
        let mut transform = Transform::identity()
            .with_rotate(Rotate::fixed(45.0, Vec3::z()))
            .with_translate(Translate::fixed(Vec3::new(1.0, 2.0, 3.0)));
        transform.rotate.active = false;
        transform.translate.active = false;
        assert_eq!(PoseEvaluator::evaluate(&transform, 1.0), Pose::identity());
    }

    #[test]
    fn test_unaligned_translation_uses_first_point() {
        let mut translate = Translate::along(vec![Vec3::x(), Vec3::y(), Vec3::z(), Vec3::zeros()], 4.0);
        translate.align = false;
        assert_eq!(PoseEvaluator::translation(&translate, 1.5), Vec3::x());
    }

    #[test]
    fn test_animated_translation_follows_spline() {
        let points = vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, -1.0),
        ];
        let translate = Translate::along(points.clone(), 8.0);
        assert_relative_eq!(PoseEvaluator::translation(&translate, 0.0), points[0], epsilon = EPSILON);
        assert_relative_eq!(PoseEvaluator::translation(&translate, 2.0), points[1], epsilon = EPSILON);
        // One full period later the position repeats
        assert_relative_eq!(PoseEvaluator::translation(&translate, 12.0), points[2], epsilon = EPSILON);
    }

    #[test]
    fn test_local_matrix_is_scale_rotate_translate() {
        let transform = Transform::identity()
            .with_scale(Vec3::new(2.0, 2.0, 2.0))
            .with_rotate(Rotate::fixed(90.0, Vec3::y()))
            .with_translate(Translate::fixed(Vec3::new(10.0, 0.0, 0.0)));

        let matrix = PoseEvaluator::local_matrix(&transform, 0.0);
        let moved = matrix.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(moved, Point3::new(10.0, 0.0, -2.0), epsilon = EPSILON);

        let pose = PoseEvaluator::evaluate(&transform, 0.0);
        assert_relative_eq!(pose.to_transform().to_matrix(), matrix, epsilon = EPSILON);
    }

    #[test]
    fn test_zero_axis_rotation_is_identity() {
        let transform = Transform::identity().with_rotate(Rotate::fixed(90.0, Vec3::zeros()));
        let pose = PoseEvaluator::evaluate(&transform, 0.0);
        assert_relative_eq!(pose.to_matrix(), Mat4::identity(), epsilon = EPSILON);
        assert_eq!(pose.rotation(), Quat::identity());
    }

    #[test]
    fn test_pose_matrix_uses_degrees() {
        let pose = Pose {
            angle: 90.0,
            axis: Vec3::z(),
            ..Pose::identity()
        };
        let turned = pose.to_matrix().transform_vector(&Vec3::x());
        assert_relative_eq!(turned, Vec3::y(), epsilon = EPSILON);

        let transform = pose.to_transform();
        assert_eq!(transform.position, Vec3::zeros());
        assert_eq!(transform.scale, Vec3::new(1.0, 1.0, 1.0));
    }
}

//! Group transform description
//!
//! These are plain value objects, filled in by whatever reads the scene
//! description. Turning them into a pose at a given time is the job of
//! [`crate::scene::animation::PoseEvaluator`].

use crate::foundation::math::Vec3;
use thiserror::Error;

/// Rotation, either fixed or spinning with a period
#[derive(Debug, Clone, PartialEq)]
pub struct Rotate {
    /// Whether the rotation applies at all
    pub active: bool,

    /// Fixed angle in degrees, used when `duration` is not positive
    pub angle: f32,

    /// Rotation axis, need not be normalized
    pub axis: Vec3,

    /// Seconds per full turn; zero means a fixed rotation
    pub duration: f32,
}

impl Default for Rotate {
    fn default() -> Self {
        Self {
            active: false,
            angle: 0.0,
            axis: Vec3::y(),
            duration: 0.0,
        }
    }
}

impl Rotate {
    /// Fixed rotation of `angle` degrees about `axis`
    pub fn fixed(angle: f32, axis: Vec3) -> Self {
        Self {
            active: true,
            angle,
            axis,
            duration: 0.0,
        }
    }

    /// Continuous rotation about `axis`, one turn every `duration` seconds
    pub fn spinning(duration: f32, axis: Vec3) -> Self {
        Self {
            active: true,
            angle: 0.0,
            axis,
            duration,
        }
    }

    /// Whether the angle depends on time
    pub fn is_animated(&self) -> bool {
        self.active && self.duration > 0.0
    }
}

/// Translation, either to a fixed point or along a closed Catmull-Rom loop
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Translate {
    /// Whether the translation applies at all
    pub active: bool,

    /// Follow the spline through the control points when animated
    pub align: bool,

    /// Seconds per loop; zero means a fixed translation
    pub duration: f32,

    /// Spline control points; the first one is the fixed position
    pub control_points: Vec<Vec3>,
}

impl Translate {
    /// Fixed translation by `offset`
    pub fn fixed(offset: Vec3) -> Self {
        Self {
            active: true,
            align: false,
            duration: 0.0,
            control_points: vec![offset],
        }
    }

    /// Closed-loop motion through `control_points`, one lap every `duration` seconds
    pub fn along(control_points: Vec<Vec3>, duration: f32) -> Self {
        Self {
            active: true,
            align: true,
            duration,
            control_points,
        }
    }

    /// Whether the position follows the spline over time
    pub fn is_animated(&self) -> bool {
        self.active && self.align && self.duration > 0.0 && !self.control_points.is_empty()
    }
}

/// Local transform of a group: optional scale, then rotation, then translation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Transform {
    /// Per-axis scale, identity when absent
    pub scale: Option<Vec3>,

    /// Rotation component
    pub rotate: Rotate,

    /// Translation component
    pub translate: Translate,
}

/// Suspicious but evaluable transform settings
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformIssue {
    /// An animated spline has fewer than four control points
    #[error("spline has only {points} control points; at least 4 give a smooth loop")]
    ShortSpline {
        /// Number of control points
        points: usize,
    },

    /// An animated translation has no control points
    #[error("animated translation has no control points")]
    EmptySpline,

    /// A duration is negative and is treated as zero
    #[error("{component} duration {duration} is negative, treating as static")]
    NegativeDuration {
        /// `rotate` or `translate`
        component: &'static str,
        /// The configured value
        duration: f32,
    },

    /// The rotation axis has zero length, so the rotation is the identity
    #[error("rotation axis is zero, rotation has no effect")]
    ZeroAxis,
}

impl Transform {
    /// Identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Set the scale
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Set the rotation
    #[must_use]
    pub fn with_rotate(mut self, rotate: Rotate) -> Self {
        self.rotate = rotate;
        self
    }

    /// Set the translation
    #[must_use]
    pub fn with_translate(mut self, translate: Translate) -> Self {
        self.translate = translate;
        self
    }

    /// Whether the pose depends on time
    pub fn is_animated(&self) -> bool {
        self.rotate.is_animated() || self.translate.is_animated()
    }

    /// Settings that evaluate but probably do not do what was meant
    pub fn issues(&self) -> Vec<TransformIssue> {
        let mut issues = Vec::new();

        if self.rotate.active {
            if self.rotate.duration < 0.0 {
                issues.push(TransformIssue::NegativeDuration {
                    component: "rotate",
                    duration: self.rotate.duration,
                });
            }
            if self.rotate.axis == Vec3::zeros() {
                issues.push(TransformIssue::ZeroAxis);
            }
        }

        let translate = &self.translate;
        if translate.active {
            if translate.duration < 0.0 {
                issues.push(TransformIssue::NegativeDuration {
                    component: "translate",
                    duration: translate.duration,
                });
            }
            if translate.align && translate.duration > 0.0 {
                match translate.control_points.len() {
                    0 => issues.push(TransformIssue::EmptySpline),
                    points @ 1..=3 => issues.push(TransformIssue::ShortSpline { points }),
                    _ => {}
                }
            }
        }

        issues
    }
}

//! Pose and size derivation for each primitive.
//!
//! Pure functions that turn a semantic draw call into the exact placement an
//! adornment needs. Degenerate input never fails: a zero-length line yields a
//! zero-length cylinder and a short vector is clamped to
//! [`MIN_VECTOR_LENGTH`].

use visualize_core::math::{
    Pose, Vec3, pose_forward, pose_from_position, pose_look_at, pose_position,
    pose_translate_forward,
};

use crate::config::Configuration;
use crate::sink::{AdornmentKind, AdornmentSize};

/// Shortest length a vector adornment is drawn with.
pub const MIN_VECTOR_LENGTH: f32 = 1.0;

/// Resolved transform and dimensions of one adornment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub pose: Pose,
    pub length: f32,
    pub radius: f32,
    pub inner_radius: Option<f32>,
}

impl Placement {
    /// Anchor position of the adornment.
    pub fn position(&self) -> Vec3 {
        pose_position(&self.pose)
    }

    /// Dimensions to hand to the sink.
    pub fn size(&self) -> AdornmentSize {
        AdornmentSize {
            length: self.length,
            radius: self.radius,
            inner_radius: self.inner_radius,
        }
    }
}

/// Adornment kind used for vectors under `config`.
pub fn vector_kind(config: &Configuration) -> AdornmentKind {
    if config.vector_line {
        AdornmentKind::Cylinder
    } else {
        AdornmentKind::Cone
    }
}

/// Place a vector starting at `origin` pointing along `direction`.
///
/// Arrow style anchors at `origin`. Line style shifts the anchor forward by
/// half the direction's magnitude so the cylinder's center sits halfway
/// along the vector.
pub fn resolve_vector(origin: Vec3, direction: Vec3, config: &Configuration) -> Placement {
    let magnitude = direction.norm();
    let offset = if config.vector_line { magnitude / 2.0 } else { 0.0 };
    let pose = pose_look_at(origin, origin + direction);

    Placement {
        pose: pose_translate_forward(&pose, offset),
        length: magnitude.max(MIN_VECTOR_LENGTH),
        radius: config.vector_radius,
        inner_radius: None,
    }
}

/// Place a point at `origin`.
pub fn resolve_point(origin: Vec3, config: &Configuration) -> Placement {
    Placement {
        pose: pose_from_position(origin),
        length: 0.0,
        radius: config.point_radius,
        inner_radius: None,
    }
}

/// Place a line spanning `start` to `finish`, centered between them.
pub fn resolve_line(start: Vec3, finish: Vec3, config: &Configuration) -> Placement {
    let length = (finish - start).norm();
    let pose = pose_look_at(start, finish);

    Placement {
        pose: pose_translate_forward(&pose, length / 2.0),
        length,
        radius: config.line_radius,
        inner_radius: Some(config.line_inner_radius),
    }
}

/// Place a frame as its forward vector scaled by the configured frame length.
pub fn resolve_frame(frame: &Pose, config: &Configuration) -> Placement {
    let direction = pose_forward(frame) * config.frame_length;
    resolve_vector(pose_position(frame), direction, config)
}

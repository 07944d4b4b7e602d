//! Math type aliases and pose helpers.
//!
//! All debug geometry is expressed in f32. Poses follow the right-handed
//! convention where an orientation "looks" down its local `-Z` axis.

pub use nalgebra;

/// 3D vector (f32).
pub type Vec3 = nalgebra::Vector3<f32>;

/// Unit quaternion (f32) used for orientations.
pub type UnitQuat = nalgebra::UnitQuaternion<f32>;

/// Position plus orientation.
pub type Pose = nalgebra::Isometry3<f32>;

/// Distances below this are treated as zero when deriving orientations.
pub const POSE_EPSILON: f32 = 1e-6;

/// Build a translation-only pose.
pub fn pose_from_position(position: Vec3) -> Pose {
    Pose::translation(position.x, position.y, position.z)
}

/// Build a pose at `position` with the given orientation.
pub fn pose_from_parts(position: Vec3, rotation: UnitQuat) -> Pose {
    Pose::from_parts(position.into(), rotation)
}

/// Build a pose at `eye` whose `-Z` axis points toward `target`.
///
/// World `+Y` is the up reference. When the look direction is parallel to
/// `+Y`, `+Z` is used instead. Coincident points yield identity orientation.
pub fn pose_look_at(eye: Vec3, target: Vec3) -> Pose {
    let direction = target - eye;
    let distance = direction.norm();
    if distance <= POSE_EPSILON {
        return pose_from_position(eye);
    }

    let look = direction / distance;
    let up = if look.y.abs() >= 1.0 - POSE_EPSILON {
        Vec3::z()
    } else {
        Vec3::y()
    };

    // face_towards maps +Z onto its argument, so aim it backwards.
    let rotation = UnitQuat::face_towards(&(-look), &up);
    pose_from_parts(eye, rotation)
}

/// Unit look vector of a pose (its local `-Z` axis in world space).
pub fn pose_forward(pose: &Pose) -> Vec3 {
    pose.rotation * -Vec3::z()
}

/// Move a pose along its own look axis by `distance`.
pub fn pose_translate_forward(pose: &Pose, distance: f32) -> Pose {
    let position = pose.translation.vector + pose_forward(pose) * distance;
    pose_from_parts(position, pose.rotation)
}

/// Position component of a pose.
pub fn pose_position(pose: &Pose) -> Vec3 {
    pose.translation.vector
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_vec_eq(a: Vec3, b: Vec3) {
        assert!((a - b).norm() < 1e-5, "expected {b:?}, got {a:?}");
    }

    #[test]
    fn test_pose_from_position() {
        let pose = pose_from_position(Vec3::new(1.0, 2.0, 3.0));
        assert_vec_eq(pose_position(&pose), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(pose.rotation, UnitQuat::identity());
    }

    #[test]
    fn test_identity_looks_down_negative_z() {
        let pose = pose_from_position(Vec3::zeros());
        assert_vec_eq(pose_forward(&pose), Vec3::new(0.0, 0.0, -1.0));
    }

    #[test]
    fn test_look_at_points_forward() {
        let pose = pose_look_at(Vec3::new(1.0, 1.0, 1.0), Vec3::new(5.0, 1.0, 1.0));
        assert_vec_eq(pose_position(&pose), Vec3::new(1.0, 1.0, 1.0));
        assert_vec_eq(pose_forward(&pose), Vec3::x());
    }

    #[test]
    fn test_look_at_keeps_y_up() {
        let pose = pose_look_at(Vec3::zeros(), Vec3::new(0.0, 0.0, 3.0));
        assert_vec_eq(pose.rotation * Vec3::y(), Vec3::y());
        assert_vec_eq(pose_forward(&pose), Vec3::z());
    }

    #[test]
    fn test_look_at_straight_up() {
        let pose = pose_look_at(Vec3::zeros(), Vec3::new(0.0, 10.0, 0.0));
        assert_vec_eq(pose_forward(&pose), Vec3::y());

        let pose = pose_look_at(Vec3::zeros(), Vec3::new(0.0, -2.0, 0.0));
        assert_vec_eq(pose_forward(&pose), -Vec3::y());
    }

    #[test]
    fn test_look_at_coincident_points() {
        let eye = Vec3::new(3.0, -1.0, 2.0);
        let pose = pose_look_at(eye, eye);
        assert_vec_eq(pose_position(&pose), eye);
        assert_eq!(pose.rotation, UnitQuat::identity());
    }

    #[test]
    fn test_translate_forward() {
        let pose = pose_look_at(Vec3::zeros(), Vec3::new(4.0, 0.0, 0.0));
        let moved = pose_translate_forward(&pose, 2.0);
        assert_vec_eq(pose_position(&moved), Vec3::new(2.0, 0.0, 0.0));
        assert_vec_eq(pose_forward(&moved), Vec3::x());
    }

    #[test]
    fn test_forward_of_rotated_pose() {
        let rotation = UnitQuat::from_axis_angle(&Vec3::y_axis(), FRAC_PI_2);
        let pose = pose_from_parts(Vec3::zeros(), rotation);
        assert_vec_eq(pose_forward(&pose), Vec3::new(-1.0, 0.0, 0.0));
    }
}

//! Transform component and spatial helpers.

use glam::{Mat3, Quat, Vec3};

/// Below this squared length a direction is treated as degenerate.
pub const DIRECTION_EPSILON: f32 = 1.0e-6;

/// A rigid pose: position and orientation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with position and rotation.
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Get the forward direction (negative Z in right-handed coordinates).
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Get the right direction (positive X).
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Get the up direction (positive Y).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Transform a point from local space into world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// Orientation keeping only the heading of this transform.
    pub fn yaw_only(&self) -> Quat {
        let forward = self.forward();
        let flat = Vec3::new(forward.x, 0.0, forward.z);
        look_rotation(flat, Vec3::Y).unwrap_or(Quat::IDENTITY)
    }
}

/// Rotation whose forward (-Z) points along `forward` and whose up is as close to `up` as possible.
///
/// Returns `None` when either direction is degenerate or both are parallel.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let forward = forward.try_normalize()?;
    let right = forward.cross(up).try_normalize()?;
    let up = right.cross(forward);
    Some(Quat::from_mat3(&Mat3::from_cols(right, up, -forward)).normalize())
}

/// Remove the component of `v` along `normal`.
pub fn project_on_plane(v: Vec3, normal: Vec3) -> Vec3 {
    let len_sq = normal.length_squared();
    if len_sq < DIRECTION_EPSILON {
        return v;
    }
    v - normal * (v.dot(normal) / len_sq)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_basis_matches_right_handed_convention() {
        let t = Transform::default();
        assert_eq!(t.forward(), -Vec3::Z);
        assert_eq!(t.right(), Vec3::X);
        assert_eq!(t.up(), Vec3::Y);
    }

    #[test]
    fn look_rotation_of_identity_basis_is_identity() {
        let q = look_rotation(-Vec3::Z, Vec3::Y).unwrap();
        assert!(q.angle_between(Quat::IDENTITY) < 1.0e-4);
    }

    #[test]
    fn look_rotation_aligns_forward_and_up() {
        let normal = Vec3::new(0.0, 1.0, 1.0).normalize();
        let forward = project_on_plane(-Vec3::Z, normal);
        let q = look_rotation(forward, normal).unwrap();
        assert!((q * Vec3::Y - normal).length() < 1.0e-4);
        assert!((q * -Vec3::Z - forward.normalize()).length() < 1.0e-4);
    }

    #[test]
    fn look_rotation_rejects_degenerate_input() {
        assert!(look_rotation(Vec3::ZERO, Vec3::Y).is_none());
        assert!(look_rotation(Vec3::Y, Vec3::Y).is_none());
    }

    #[test]
    fn project_on_plane_drops_normal_component() {
        let p = project_on_plane(Vec3::new(1.0, 2.0, 3.0), Vec3::Y);
        assert_eq!(p, Vec3::new(1.0, 0.0, 3.0));
        assert_eq!(project_on_plane(Vec3::ONE, Vec3::ZERO), Vec3::ONE);
    }

    #[test]
    fn yaw_only_flattens_pitch() {
        let t = Transform::from_position_rotation(
            Vec3::ZERO,
            Quat::from_rotation_y(0.5) * Quat::from_rotation_x(0.4),
        );
        let flat = Transform::from_position_rotation(Vec3::ZERO, t.yaw_only());
        assert!(flat.forward().y.abs() < 1.0e-4);
        assert!((flat.up() - Vec3::Y).length() < 1.0e-4);
    }
}

//! Core types used throughout the Ember engine

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Transform component representing position, rotation, and scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a transform from a position, XYZ Euler angles in radians, and a scale.
    pub fn from_euler(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::from_euler(EulerRot::XYZ, rotation.x, rotation.y, rotation.z),
            scale,
        }
    }

    /// Compute the model matrix for this transform
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Rotate by the given quaternion
    pub fn rotate(&mut self, rotation: Quat) {
        self.rotation = rotation * self.rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_matrix() {
        let transform = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let matrix = transform.matrix();
        let translation = matrix.col(3).truncate();
        assert_eq!(translation, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_from_euler_single_axis() {
        let transform = Transform::from_euler(Vec3::ZERO, Vec3::new(0.0, 0.7, 0.0), Vec3::ONE);
        assert!(transform
            .rotation
            .abs_diff_eq(Quat::from_rotation_y(0.7), 1e-5));
    }

    #[test]
    fn test_from_euler_keeps_scale() {
        let transform = Transform::from_euler(Vec3::X, Vec3::ZERO, Vec3::splat(2.0));
        let scaled = transform.matrix().transform_point3(Vec3::ONE);
        assert!((scaled - Vec3::new(3.0, 2.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn test_rotate_composes_in_world_space() {
        let mut transform = Transform::from_euler(Vec3::ZERO, Vec3::new(0.5, 0.0, 0.0), Vec3::ONE);
        transform.rotate(Quat::from_rotation_y(0.25));
        let expected = Quat::from_rotation_y(0.25) * Quat::from_rotation_x(0.5);
        assert!(transform.rotation.abs_diff_eq(expected, 1e-5));
    }
}

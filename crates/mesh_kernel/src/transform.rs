//! Transform type used to place primitives and detail geometry.

use glam::{Mat3, Mat4, Quat, Vec3};

/// A 3D transform representing position, rotation, and scale.
#[derive(Debug, Clone, Copy, PartialEq)]
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
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Create a new transform with position and rotation.
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            ..Default::default()
        }
    }

    /// Create a transform whose local X/Y/Z axes map onto the given
    /// orthonormal world axes.
    pub fn from_axes(position: Vec3, x: Vec3, y: Vec3, z: Vec3) -> Self {
        let rotation = Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize();
        Self::from_position_rotation(position, rotation)
    }

    /// Create the model matrix for this transform.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Matrix of `child` expressed in this transform's space.
    pub fn compose(&self, child: &Transform) -> Mat4 {
        self.to_matrix() * child.to_matrix()
    }

    /// Rotate around the local Z axis.
    pub fn rotate_local_z(&mut self, angle: f32) {
        self.rotation = self.rotation * Quat::from_rotation_z(angle);
    }

    /// Move along the transform's own axes.
    pub fn translate_local(&mut self, delta: Vec3) {
        self.position += self.rotation * delta;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn from_axes_maps_local_z_to_given_axis() {
        let m = Transform::from_axes(Vec3::new(1.0, 2.0, 3.0), Vec3::Y, Vec3::Z, Vec3::X).to_matrix();
        let z = m.transform_vector3(Vec3::Z);
        assert_relative_eq!(z.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(z.y, 0.0, epsilon = 1e-5);
        let p = m.transform_point3(Vec3::Z);
        assert_relative_eq!(p.x, 2.0, epsilon = 1e-5);
    }

    #[test]
    fn compose_places_child_in_parent_space() {
        let mut parent = Transform::from_position(Vec3::new(0.5, -1.0, 2.0));
        parent.scale = Vec3::splat(2.0);
        parent.rotate_local_z(0.3);
        let child = Transform::from_position(Vec3::new(1.0, 2.0, 3.0));
        let a = parent.compose(&child).transform_point3(Vec3::ZERO);
        let b = parent.to_matrix().transform_point3(child.position);
        assert!((a - b).length() < 1e-4);
    }

    #[test]
    fn translate_local_follows_rotation() {
        let mut t = Transform::from_position_rotation(Vec3::ZERO, Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));
        t.translate_local(Vec3::X);
        assert_relative_eq!(t.position.y, 1.0, epsilon = 1e-5);
    }
}

//! Math utilities and types
//!
//! Thin aliases over nalgebra plus the node transform used by scene graphs.

pub use nalgebra::{Matrix4, Quaternion, Unit, Vector3};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Transform representing position, rotation, and scale
///
/// Composes as `T * R * S`: a point is scaled first, then rotated, then
/// translated.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// Position in 3D space
    pub position: Vec3,

    /// Rotation quaternion
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl Transform {
    /// Create a new identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create a transform with position and a uniform scale factor
    pub fn from_position_uniform_scale(position: Vec3, scale: f32) -> Self {
        Self {
            position,
            scale: Vec3::repeat(scale),
            ..Default::default()
        }
    }

    /// Convert to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.position)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_identity_leaves_points() {
        let transform = Transform::identity();
        let point = Point3::new(1.0, -2.0, 3.0);

        assert_relative_eq!(transform.to_matrix().transform_point(&point), point, epsilon = EPSILON);
    }

    #[test]
    fn test_scale_applies_before_translation() {
        let transform = Transform::from_position_uniform_scale(Vec3::new(1.0, 0.0, 0.0), 2.0);
        let moved = transform.to_matrix().transform_point(&Point3::new(1.0, 1.0, 1.0));

        assert_relative_eq!(moved, Point3::new(3.0, 2.0, 2.0), epsilon = EPSILON);
    }

    #[test]
    fn test_rotation_about_y() {
        let rotation = Quat::from_axis_angle(&Vec3::y_axis(), std::f32::consts::FRAC_PI_2);
        let transform = Transform {
            rotation,
            ..Transform::identity()
        };
        let rotated = transform.to_matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));

        assert_relative_eq!(rotated, Point3::new(0.0, 0.0, -1.0), epsilon = EPSILON);
    }
}

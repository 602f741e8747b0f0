//! Affine transform (basis + origin)

use std::ops::Mul;

use glam::{Mat3, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::math;

/// Position, rotation and scale as a single affine transform.
///
/// The basis columns are the transformed X, Y and Z axes; they may carry
/// non-uniform scale and need not be orthogonal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub basis: Mat3,
    pub origin: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        basis: Mat3::IDENTITY,
        origin: Vec3::ZERO,
    };

    pub fn new(basis: Mat3, origin: Vec3) -> Self {
        Self { basis, origin }
    }

    pub fn from_translation(origin: Vec3) -> Self {
        Self::new(Mat3::IDENTITY, origin)
    }

    pub fn from_scale(scale: Vec3) -> Self {
        Self::new(Mat3::from_diagonal(scale), Vec3::ZERO)
    }

    pub fn from_scale_rotation_translation(scale: Vec3, rotation: Quat, origin: Vec3) -> Self {
        Self::new(
            Mat3::from_quat(rotation) * Mat3::from_diagonal(scale),
            origin,
        )
    }

    /// Column `index` of the basis (0 = X, 1 = Y, 2 = Z).
    pub fn axis(&self, index: usize) -> Vec3 {
        self.basis.col(index)
    }

    pub fn determinant(&self) -> f32 {
        self.basis.determinant()
    }

    /// True when the basis has collapsed or contains non-finite values.
    pub fn is_degenerate(&self) -> bool {
        let det = self.determinant();
        det == 0.0 || !det.is_finite() || !self.origin.is_finite()
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.basis * point + self.origin
    }

    /// Full affine inverse. The basis must not be degenerate.
    pub fn inverse(&self) -> Self {
        let basis = self.basis.inverse();
        Self::new(basis, -(basis * self.origin))
    }

    /// Move the origin by `offset` in parent (world) space.
    pub fn translated(&self, offset: Vec3) -> Self {
        Self::new(self.basis, self.origin + offset)
    }

    /// Move the origin by `offset` expressed along this transform's own axes.
    pub fn translated_local(&self, offset: Vec3) -> Self {
        Self::new(self.basis, self.origin + self.basis * offset)
    }

    /// Same origin, basis with scale and skew removed.
    pub fn orthonormalized(&self) -> Self {
        Self::new(math::orthonormalize(self.basis), self.origin)
    }

    /// Basis whose -Z axis points along `forward`, with Y as close to `up`
    /// as possible. Falls back to identity when `forward` is parallel to `up`.
    pub fn looking_at(forward: Vec3, up: Vec3) -> Mat3 {
        let z = -forward.normalize_or_zero();
        let x = up.cross(z);
        if x.length_squared() < 1e-12 || z == Vec3::ZERO {
            return Mat3::IDENTITY;
        }
        let x = x.normalize();
        let y = z.cross(x);
        Mat3::from_cols(x, y, z)
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_cols(
            self.basis.x_axis.extend(0.0),
            self.basis.y_axis.extend(0.0),
            self.basis.z_axis.extend(0.0),
            self.origin.extend(1.0),
        )
    }

    pub fn from_mat4(m: Mat4) -> Self {
        Self::new(Mat3::from_mat4(m), m.w_axis.truncate())
    }

    pub fn abs_diff_eq(&self, other: &Self, max_abs_diff: f32) -> bool {
        self.basis.abs_diff_eq(other.basis, max_abs_diff)
            && self.origin.abs_diff_eq(other.origin, max_abs_diff)
    }
}

impl Mul for Transform {
    type Output = Transform;

    fn mul(self, rhs: Transform) -> Transform {
        Transform::new(self.basis * rhs.basis, self.basis * rhs.origin + self.origin)
    }
}

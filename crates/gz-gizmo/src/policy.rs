//! Hooks for adjusting motion before it is applied
//!
//! A policy sees every motion after local-space conversion and may return a
//! different value. Rotations arrive already snapped, as an axis scaled by
//! the angle in radians; translation and scale are snapped afterwards.

use glam::Vec3;
use gz_core::math::snapped_vec;

/// Adjusts motion values before they are composed onto targets
pub trait EditPolicy {
    /// Translation offset to apply
    fn adjust_translation(&self, translation: Vec3) -> Vec3 {
        translation
    }

    /// Per-axis scale delta to apply
    fn adjust_scale(&self, scale: Vec3) -> Vec3 {
        scale
    }

    /// Rotation axis scaled by the angle to apply
    fn adjust_rotation(&self, rotation: Vec3) -> Vec3 {
        rotation
    }
}

/// Applies motion unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPolicy;

impl EditPolicy for DefaultPolicy {}

/// Snaps translation to a fixed grid regardless of the snapping modifier
#[derive(Debug, Clone, Copy)]
pub struct GridTranslation {
    /// Grid spacing in world units
    pub step: f32,
}

impl EditPolicy for GridTranslation {
    fn adjust_translation(&self, translation: Vec3) -> Vec3 {
        snapped_vec(translation, self.step)
    }
}

/// Forces uniform scaling using the largest requested component
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformScale;

impl EditPolicy for UniformScale {
    fn adjust_scale(&self, scale: Vec3) -> Vec3 {
        // Keep the sign of whichever component moved furthest
        let dominant = [scale.x, scale.y, scale.z]
            .into_iter()
            .fold(0.0_f32, |acc, v| if v.abs() > acc.abs() { v } else { acc });
        Vec3::splat(dominant)
    }
}

/// Limits a single rotation step to `max_angle` radians
#[derive(Debug, Clone, Copy)]
pub struct ClampRotation {
    /// Largest angle allowed, radians
    pub max_angle: f32,
}

impl EditPolicy for ClampRotation {
    fn adjust_rotation(&self, rotation: Vec3) -> Vec3 {
        rotation.clamp_length_max(self.max_angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_identity() {
        let policy = DefaultPolicy;
        let v = Vec3::new(0.3, -1.0, 2.0);
        assert_eq!(policy.adjust_translation(v), v);
        assert_eq!(policy.adjust_scale(v), v);
        assert_eq!(policy.adjust_rotation(v), v);
    }

    #[test]
    fn test_grid_translation() {
        let policy = GridTranslation { step: 2.0 };
        assert_eq!(policy.adjust_translation(Vec3::new(2.9, -0.4, 5.1)), Vec3::new(2.0, 0.0, 6.0));
        assert_eq!(policy.adjust_scale(Vec3::ONE), Vec3::ONE);
    }

    #[test]
    fn test_uniform_scale_keeps_sign() {
        let policy = UniformScale;
        assert_eq!(policy.adjust_scale(Vec3::new(0.2, -0.5, 0.1)), Vec3::splat(-0.5));
    }

    #[test]
    fn test_clamp_rotation() {
        let policy = ClampRotation { max_angle: 1.0 };
        let clamped = policy.adjust_rotation(Vec3::Z * 3.0);
        assert!(clamped.abs_diff_eq(Vec3::Z, 1e-6));
        let small = Vec3::X * 0.5;
        assert_eq!(policy.adjust_rotation(small), small);
    }
}

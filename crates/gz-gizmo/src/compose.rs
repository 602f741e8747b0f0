//! Applying a motion to a target's original transform

use glam::{Mat3, Vec3};
use gz_core::math::{scale_orthogonal, snapped_vec};
use gz_core::{GizmoError, Transform};

use crate::session::Motion;
use crate::types::TransformMode;

/// Transform a target should take for `motion`, starting from the
/// transforms it had when the edit began.
///
/// The result is a local transform when `motion.local` is set and a global
/// one otherwise. Results with a collapsed basis are rejected with
/// [`GizmoError::DegenerateBasis`] so the caller can skip the write.
pub fn compose(
    motion: &Motion,
    center: Vec3,
    original_global: &Transform,
    original_local: &Transform,
) -> Result<Transform, GizmoError> {
    let value = match motion.snap {
        Some(step) => snapped_vec(motion.value, step),
        None => motion.value,
    };

    let result = match motion.mode {
        TransformMode::Scale => {
            let factors = value + Vec3::ONE;
            if motion.local {
                Transform::new(
                    original_local.basis * Mat3::from_diagonal(factors),
                    original_local.origin,
                )
            } else {
                let scale = Mat3::from_diagonal(factors);
                let basis = if motion.orthogonal {
                    scale_orthogonal(original_global.basis, factors)
                } else {
                    scale * original_global.basis
                };
                Transform::new(basis, scale * (original_global.origin - center) + center)
            }
        }
        TransformMode::Translate => {
            if motion.local {
                original_local.translated_local(value)
            } else {
                original_global.translated(value)
            }
        }
        TransformMode::Rotate => rotate(value, motion.local, center, original_global, original_local),
        TransformMode::None => return Err(GizmoError::InvalidMode),
    };

    if result.is_degenerate() {
        return Err(GizmoError::DegenerateBasis);
    }
    Ok(result)
}

/// `value` is the rotation axis scaled by the angle
fn rotate(
    value: Vec3,
    local: bool,
    center: Vec3,
    original_global: &Transform,
    original_local: &Transform,
) -> Transform {
    let angle = value.length();
    if angle <= f32::EPSILON {
        return if local { *original_local } else { *original_global };
    }
    let axis = value / angle;

    if local {
        let world_axis = (original_local.basis * axis).normalize_or_zero();
        if world_axis == Vec3::ZERO {
            return *original_local;
        }
        return Transform::new(
            Mat3::from_axis_angle(world_axis, angle) * original_local.basis,
            original_local.origin,
        );
    }

    // Parent frame of the target, so the rotation is expressed in world space
    let parent = original_global.basis * original_local.basis.inverse();
    let parent_axis = (parent.inverse() * axis).normalize_or_zero();
    let basis = if parent_axis == Vec3::ZERO {
        original_global.basis
    } else {
        parent * Mat3::from_axis_angle(parent_axis, angle) * original_local.basis
    };

    let origin = Mat3::from_axis_angle(axis, angle) * (original_global.origin - center) + center;
    Transform::new(basis, origin)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;
    use std::f32::consts::FRAC_PI_2;

    fn motion(mode: TransformMode, value: Vec3) -> Motion {
        Motion {
            mode,
            value,
            snap: None,
            local: false,
            orthogonal: false,
            message: String::new(),
        }
    }

    #[test]
    fn test_global_scale_about_center() {
        let original = Transform::from_translation(Vec3::new(2.0, 0.0, 0.0));
        let m = motion(TransformMode::Scale, Vec3::new(1.0, 0.0, 0.0));

        let result = compose(&m, Vec3::ZERO, &original, &original).unwrap();
        assert!(result.basis.abs_diff_eq(Mat3::from_diagonal(Vec3::new(2.0, 1.0, 1.0)), 1e-6));
        assert!(result.origin.abs_diff_eq(Vec3::new(4.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn test_collapsing_scale_is_rejected() {
        let original = Transform::IDENTITY;
        let m = motion(TransformMode::Scale, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(
            compose(&m, Vec3::ZERO, &original, &original),
            Err(GizmoError::DegenerateBasis)
        );
    }

    #[test]
    fn test_local_scale_keeps_rotation() {
        let rotation = Mat3::from_rotation_z(FRAC_PI_2);
        let original = Transform::new(rotation, Vec3::ONE);
        let mut m = motion(TransformMode::Scale, Vec3::new(1.0, 0.0, 0.0));
        m.local = true;

        let result = compose(&m, Vec3::ZERO, &original, &original).unwrap();
        // Local X (world Y) doubles in length
        assert!(result.axis(0).abs_diff_eq(Vec3::new(0.0, 2.0, 0.0), 1e-6));
        assert_eq!(result.origin, Vec3::ONE);
    }

    #[test]
    fn test_translate_snaps() {
        let original = Transform::IDENTITY;
        let mut m = motion(TransformMode::Translate, Vec3::new(0.3, 0.0, 0.0));
        m.snap = Some(0.25);

        let result = compose(&m, Vec3::ZERO, &original, &original).unwrap();
        assert!(result.origin.abs_diff_eq(Vec3::new(0.25, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn test_local_translate_follows_own_axes() {
        let original = Transform::new(Mat3::from_rotation_z(FRAC_PI_2), Vec3::ZERO);
        let mut m = motion(TransformMode::Translate, Vec3::X);
        m.local = true;

        let result = compose(&m, Vec3::ZERO, &original, &original).unwrap();
        assert!(result.origin.abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn test_global_rotation_orbits_center() {
        let original = Transform::from_translation(Vec3::X);
        let m = motion(TransformMode::Rotate, Vec3::Z * FRAC_PI_2);

        let result = compose(&m, Vec3::ZERO, &original, &original).unwrap();
        assert!(result.origin.abs_diff_eq(Vec3::Y, 1e-6));
        assert!(result.basis.abs_diff_eq(Mat3::from_rotation_z(FRAC_PI_2), 1e-6));
    }

    #[test]
    fn test_global_rotation_under_rotated_parent() {
        // Parent turned 90 degrees about Y, child at identity local
        let parent = Transform::new(Mat3::from_rotation_y(FRAC_PI_2), Vec3::ZERO);
        let local = Transform::IDENTITY;
        let global = parent * local;
        let m = motion(TransformMode::Rotate, Vec3::Z * FRAC_PI_2);

        let result = compose(&m, Vec3::ZERO, &global, &local).unwrap();
        let expected = Mat3::from_rotation_z(FRAC_PI_2) * global.basis;
        assert!(result.basis.abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_local_rotation_about_own_axis() {
        let original = Transform::from_scale_rotation_translation(
            Vec3::ONE,
            Quat::from_rotation_x(FRAC_PI_2),
            Vec3::new(1.0, 2.0, 3.0),
        );
        let mut m = motion(TransformMode::Rotate, Vec3::Z * FRAC_PI_2);
        m.local = true;

        let result = compose(&m, Vec3::ZERO, &original, &original).unwrap();
        // Local Z is world -Y after the X rotation; the origin stays put
        let expected = Mat3::from_axis_angle(Vec3::NEG_Y, FRAC_PI_2) * original.basis;
        assert!(result.basis.abs_diff_eq(expected, 1e-5));
        assert_eq!(result.origin, original.origin);
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        let original = Transform::from_translation(Vec3::ONE);
        let m = motion(TransformMode::Rotate, Vec3::ZERO);
        assert_eq!(compose(&m, Vec3::ZERO, &original, &original), Ok(original));
    }

    #[test]
    fn test_none_mode_is_invalid() {
        let m = motion(TransformMode::None, Vec3::ONE);
        assert_eq!(
            compose(&m, Vec3::ZERO, &Transform::IDENTITY, &Transform::IDENTITY),
            Err(GizmoError::InvalidMode)
        );
    }
}

//! Edit sessions: turning pointer motion into a transform delta
//!
//! A session is started by grabbing a handle and records the click ray and
//! gizmo frame at that moment. Every pointer move re-derives the full motion
//! from the click, so deltas never accumulate.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat3, Vec2, Vec3};
use gz_core::constants::{epsilon, handle as dims, motion as motion_consts};
use gz_core::math::{self, Plane};
use gz_core::SnapConfig;

use crate::camera::{GizmoCamera, Projection};
use crate::placement::Placement;
use crate::types::{Handle, TransformMode, TransformPlane};

/// Result of one motion computation
#[derive(Debug, Clone, PartialEq)]
pub struct Motion {
    /// Tool that produced the motion
    pub mode: TransformMode,
    /// Translation offset, scale delta, or rotation axis scaled by the angle in radians
    pub value: Vec3,
    /// Increment applied when composing (translate and scale only)
    pub snap: Option<f32>,
    /// Apply in each target's own frame instead of world space
    pub local: bool,
    /// Scale along the target's orthonormal frame
    pub orthogonal: bool,
    /// Progress text for the host UI
    pub message: String,
}

/// Inputs that may change while a session is running
#[derive(Debug, Clone, Copy)]
pub struct MotionContext<'a> {
    /// Snapping modifier held
    pub snapping: bool,
    /// Fine-snap modifier held
    pub fine_snap: bool,
    /// Snap increments
    pub snap: &'a SnapConfig,
    /// Express motion in the gizmo's own frame
    pub use_local_space: bool,
    /// Current gizmo scale
    pub scale: f32,
}

/// Data captured when a handle is grabbed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditSession {
    /// Tool being used
    pub mode: TransformMode,
    /// Axis or plane the motion is constrained to
    pub plane: TransformPlane,
    /// Pick ray direction at grab time
    pub click_ray: Vec3,
    /// Pick ray origin at grab time
    pub click_ray_origin: Vec3,
    /// Gizmo origin at grab time
    pub center: Vec3,
    /// Gizmo basis at grab time
    pub basis: Mat3,
    /// Latest pointer position in screen pixels
    pub pointer_pos: Vec2,
}

impl EditSession {
    /// Start editing `handle` with the pointer at `pointer_pos`
    pub fn begin(
        camera: &impl GizmoCamera,
        pointer_pos: Vec2,
        placement: &Placement,
        handle: Handle,
    ) -> Self {
        Self {
            mode: handle.mode,
            plane: handle.plane,
            click_ray: camera.ray_direction(pointer_pos),
            click_ray_origin: camera.ray_origin(pointer_pos),
            center: placement.origin,
            basis: placement.basis,
            pointer_pos,
        }
    }

    fn axis(&self, index: usize) -> Vec3 {
        self.basis.col(index).normalize_or_zero()
    }

    /// Motion from the click to the current pointer position.
    ///
    /// Returns `None` when the geometry is degenerate for this frame, for
    /// example a constraint plane seen exactly edge-on.
    pub fn compute_motion(&self, camera: &impl GizmoCamera, ctx: &MotionContext) -> Option<Motion> {
        let ray_pos = camera.ray_origin(self.pointer_pos);
        let ray = camera.ray_direction(self.pointer_pos);

        match self.mode {
            TransformMode::Translate => self.translate_motion(camera, ray_pos, ray, ctx),
            TransformMode::Scale => self.scale_motion(camera, ray_pos, ray, ctx),
            TransformMode::Rotate => self.rotate_motion(camera, ray_pos, ray, ctx),
            TransformMode::None => None,
        }
    }

    /// Plane the pointer is projected onto, and the axis mask for single-axis edits
    fn constraint_plane(&self, view: Vec3) -> (Plane, Option<Vec3>) {
        match (self.plane.axis_index(), self.plane.normal_index()) {
            (Some(axis), _) => {
                let mask = self.axis(axis);
                // Plane containing the axis, turned as far toward the camera as possible
                let normal = mask.cross(mask.cross(view)).normalize_or_zero();
                (Plane::from_point_normal(normal, self.center), Some(mask))
            }
            (None, Some(normal)) => (
                Plane::from_point_normal(self.axis(normal), self.center),
                None,
            ),
            (None, None) => (Plane::from_point_normal(view, self.center), None),
        }
    }

    fn drag_points(&self, plane: &Plane, ray_pos: Vec3, ray: Vec3) -> Option<(Vec3, Vec3)> {
        let current = plane.intersects_ray(ray_pos, ray)?;
        let click = plane.intersects_ray(self.click_ray_origin, self.click_ray)?;
        Some((click, current))
    }

    fn translate_motion(
        &self,
        camera: &impl GizmoCamera,
        ray_pos: Vec3,
        ray: Vec3,
        ctx: &MotionContext,
    ) -> Option<Motion> {
        let (plane, mask) = self.constraint_plane(camera.view_direction());
        let (click, current) = self.drag_points(&plane, ray_pos, ray)?;

        let mut motion = current - click;
        if let Some(mask) = mask {
            motion = math::project_onto_axis(motion, mask);
        }

        let step = if ctx.snapping {
            ctx.snap.translate_step(ctx.fine_snap)
        } else {
            motion_consts::DEFAULT_FLOAT_STEP
        };
        let shown = math::snapped_vec(motion, step);
        let message = format!("Translating: ({:.3}, {:.3}, {:.3})", shown.x, shown.y, shown.z);

        let local = ctx.use_local_space && self.plane != TransformPlane::View;
        if local {
            motion = self.basis.inverse() * motion;
        }

        Some(Motion {
            mode: TransformMode::Translate,
            value: motion,
            snap: ctx.snapping.then_some(step),
            local,
            orthogonal: false,
            message,
        })
    }

    fn scale_motion(
        &self,
        camera: &impl GizmoCamera,
        ray_pos: Vec3,
        ray: Vec3,
        ctx: &MotionContext,
    ) -> Option<Motion> {
        let (plane, mask) = self.constraint_plane(camera.view_direction());
        let (click, current) = self.drag_points(&plane, ray_pos, ray)?;

        let click_dist = click.distance(self.center);
        if click_dist <= epsilon::CMP {
            return None;
        }

        let mut motion = if self.plane == TransformPlane::View {
            Vec3::splat(current.distance(self.center) - click_dist)
        } else {
            let delta = current - click;
            match mask {
                Some(mask) => math::project_onto_axis(delta, mask),
                None => delta,
            }
        };
        motion /= click_dist;

        let local = ctx.use_local_space && self.plane != TransformPlane::View;
        if local {
            motion = math::orthonormalize(self.basis).transpose() * motion;
        }

        let step = if ctx.snapping {
            ctx.snap.scale_step(ctx.fine_snap)
        } else {
            motion_consts::DEFAULT_FLOAT_STEP
        };
        let shown = math::snapped_vec(motion, step);
        let message = format!("Scaling: ({:.3}, {:.3}, {:.3})", shown.x, shown.y, shown.z);

        Some(Motion {
            mode: TransformMode::Scale,
            value: motion,
            snap: ctx.snapping.then_some(step),
            local,
            orthogonal: self.plane != TransformPlane::View,
            message,
        })
    }

    /// Normal of the plane the pointer is tracked on while rotating.
    ///
    /// In perspective the plane faces from the camera toward the gizmo; a
    /// camera sitting on the center falls back to the view direction.
    fn rotation_normal(&self, camera: &impl GizmoCamera) -> Vec3 {
        let view = camera.view_direction();
        match camera.projection() {
            Projection::Perspective => {
                let to_center = self.center - camera.global_transform().origin;
                if to_center.length() > epsilon::CMP {
                    to_center.normalize()
                } else {
                    view
                }
            }
            Projection::Orthographic => view,
        }
    }

    fn rotate_motion(
        &self,
        camera: &impl GizmoCamera,
        ray_pos: Vec3,
        ray: Vec3,
        ctx: &MotionContext,
    ) -> Option<Motion> {
        let normal = self.rotation_normal(camera);

        let (local_axis, global_axis) = match self.plane {
            TransformPlane::View => (normal, normal),
            plane => {
                let index = plane.axis_index()?;
                let local_axis = Vec3::AXES[index];
                (local_axis, (self.basis * local_axis).normalize_or_zero())
            }
        };
        if global_axis == Vec3::ZERO {
            return None;
        }

        let rotation_plane = Plane::from_point_normal(normal, self.center);
        let (click, current) = self.drag_points(&rotation_plane, ray_pos, ray)?;

        let threshold = motion_consts::ORTHOGONAL_THRESHOLD_DEGREES.to_radians().cos();
        let orthogonal = normal.dot(global_axis).abs() < threshold;

        let angle = if orthogonal {
            // Ring seen nearly edge-on: drag along the ring's tangent
            let tangent = normal.cross(global_axis);
            let projection = (current - click).dot(tangent);
            projection * FRAC_PI_2 / (ctx.scale * dims::CIRCLE_SIZE)
        } else {
            let from = (click - self.center).normalize_or_zero();
            let to = (current - self.center).normalize_or_zero();
            math::signed_angle_to(from, to, global_axis)
        };
        if !angle.is_finite() {
            return None;
        }

        let step = if ctx.snapping {
            ctx.snap.rotate_step(ctx.fine_snap)
        } else {
            motion_consts::DEFAULT_FLOAT_STEP
        };
        let degrees = math::snapped(angle.to_degrees(), step);
        let message = format!("Rotating: {degrees:.3} degrees");
        let angle = degrees.to_radians();

        let local = ctx.use_local_space && self.plane != TransformPlane::View;
        let axis = if local { local_axis } else { global_axis };

        Some(Motion {
            mode: TransformMode::Rotate,
            value: axis * angle,
            snap: None,
            local,
            orthogonal: false,
            message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;

    fn front_camera() -> Camera {
        Camera::looking_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec2::new(800.0, 600.0))
    }

    fn unit_placement() -> Placement {
        Placement {
            origin: Vec3::ZERO,
            basis: Mat3::IDENTITY,
            scale: 1.0,
            visible: true,
        }
    }

    fn ctx(snap: &SnapConfig) -> MotionContext<'_> {
        MotionContext {
            snapping: false,
            fine_snap: false,
            snap,
            use_local_space: false,
            scale: 1.0,
        }
    }

    fn drag(camera: &Camera, handle: Handle, from: Vec3, to: Vec3) -> EditSession {
        let mut session = EditSession::begin(
            camera,
            camera.world_to_screen(from),
            &unit_placement(),
            handle,
        );
        session.pointer_pos = camera.world_to_screen(to);
        session
    }

    #[test]
    fn test_translate_x_is_axis_constrained() {
        let camera = Camera::looking_at(Vec3::new(2.0, 3.0, 10.0), Vec3::ZERO, Vec2::new(800.0, 600.0));
        let snap = SnapConfig::default();
        let handle = Handle::new(TransformMode::Translate, TransformPlane::X);
        let session = drag(&camera, handle, Vec3::X, Vec3::new(2.5, 0.0, 0.0));

        let motion = session.compute_motion(&camera, &ctx(&snap)).unwrap();
        assert!(motion.value.abs_diff_eq(Vec3::new(1.5, 0.0, 0.0), 1e-3));
        assert_eq!(motion.message, "Translating: (1.500, 0.000, 0.000)");
        assert_eq!(motion.snap, None);
    }

    #[test]
    fn test_translate_snapping_sets_step() {
        let camera = front_camera();
        let snap = SnapConfig::default();
        let mut context = ctx(&snap);
        context.snapping = true;
        context.fine_snap = true;
        let handle = Handle::new(TransformMode::Translate, TransformPlane::XY);
        let session = drag(&camera, handle, Vec3::ZERO, Vec3::new(0.26, 0.0, 0.0));

        let motion = session.compute_motion(&camera, &context).unwrap();
        assert_eq!(motion.snap, Some(snap.translate_step(true)));
        assert_eq!(motion.message, "Translating: (0.300, 0.000, 0.000)");
    }

    #[test]
    fn test_rotation_sign_counter_clockwise() {
        let camera = front_camera();
        let snap = SnapConfig::default();
        let handle = Handle::new(TransformMode::Rotate, TransformPlane::Z);
        let session = drag(&camera, handle, Vec3::X, Vec3::Y);

        let motion = session.compute_motion(&camera, &ctx(&snap)).unwrap();
        assert!(motion.value.abs_diff_eq(Vec3::Z * FRAC_PI_2, 1e-3));
        assert_eq!(motion.message, "Rotating: 90.000 degrees");
    }

    #[test]
    fn test_rotation_normal_with_camera_on_center() {
        let camera = Camera::looking_at(Vec3::ZERO, Vec3::NEG_Z, Vec2::new(800.0, 600.0));
        let handle = Handle::new(TransformMode::Rotate, TransformPlane::View);
        let mut session = drag(&camera, handle, Vec3::new(0.0, 0.0, -5.0), Vec3::new(1.0, 0.0, -5.0));

        session.center = Vec3::new(1e-6, 0.0, 0.0);
        assert!(session.rotation_normal(&camera).abs_diff_eq(Vec3::NEG_Z, 1e-4));

        session.center = Vec3::new(3.0, 0.0, 0.0);
        assert!(session.rotation_normal(&camera).abs_diff_eq(Vec3::X, 1e-4));
    }

    #[test]
    fn test_rotation_tangent_branch() {
        // The X ring is edge-on from this camera
        let camera = front_camera();
        let snap = SnapConfig::default();
        let handle = Handle::new(TransformMode::Rotate, TransformPlane::X);
        let session = drag(&camera, handle, Vec3::ZERO, Vec3::new(0.0, 0.5, 0.0));

        let motion = session.compute_motion(&camera, &ctx(&snap)).unwrap();
        // tangent = normal x axis = -Z x X = -Y, so dragging +Y turns negatively
        let expected = -0.5 * FRAC_PI_2 / dims::CIRCLE_SIZE;
        assert!((motion.value.x - expected).abs() < 1e-2);
        assert!(motion.value.y.abs() < 1e-6);
    }

    #[test]
    fn test_rotation_snaps_to_step() {
        let camera = front_camera();
        let snap = SnapConfig::default();
        let mut context = ctx(&snap);
        context.snapping = true;
        let handle = Handle::new(TransformMode::Rotate, TransformPlane::Z);
        let to = Vec3::new(20.0_f32.to_radians().cos(), 20.0_f32.to_radians().sin(), 0.0);
        let session = drag(&camera, handle, Vec3::X, to);

        let motion = session.compute_motion(&camera, &context).unwrap();
        assert!((motion.value.z - 15.0_f32.to_radians()).abs() < 1e-4);
    }

    #[test]
    fn test_uniform_scale_from_view_plane() {
        let camera = front_camera();
        let snap = SnapConfig::default();
        let handle = Handle::new(TransformMode::Scale, TransformPlane::View);
        let session = drag(&camera, handle, Vec3::X, Vec3::new(2.0, 0.0, 0.0));

        let motion = session.compute_motion(&camera, &ctx(&snap)).unwrap();
        assert!(motion.value.abs_diff_eq(Vec3::ONE, 1e-3));
        assert!(!motion.orthogonal);
    }

    #[test]
    fn test_scale_click_on_center_aborts() {
        let camera = front_camera();
        let snap = SnapConfig::default();
        let handle = Handle::new(TransformMode::Scale, TransformPlane::View);
        let session = drag(&camera, handle, Vec3::ZERO, Vec3::X);
        assert!(session.compute_motion(&camera, &ctx(&snap)).is_none());
    }

    #[test]
    fn test_edge_on_axis_plane_aborts() {
        // The Z axis points straight at the camera, so its drag plane collapses
        let camera = front_camera();
        let snap = SnapConfig::default();
        let handle = Handle::new(TransformMode::Translate, TransformPlane::Z);
        let session = drag(&camera, handle, Vec3::ZERO, Vec3::X);
        assert!(session.compute_motion(&camera, &ctx(&snap)).is_none());
    }

    #[test]
    fn test_local_translation_uses_captured_basis() {
        let camera = front_camera();
        let snap = SnapConfig::default();
        let mut context = ctx(&snap);
        context.use_local_space = true;
        let placement = Placement {
            basis: Mat3::from_rotation_z(FRAC_PI_2),
            ..unit_placement()
        };
        // Local X points along world Y
        let handle = Handle::new(TransformMode::Translate, TransformPlane::X);
        let mut session = EditSession::begin(
            &camera,
            camera.world_to_screen(Vec3::ZERO),
            &placement,
            handle,
        );
        session.pointer_pos = camera.world_to_screen(Vec3::new(0.0, 2.0, 0.0));

        let motion = session.compute_motion(&camera, &context).unwrap();
        assert!(motion.local);
        assert!(motion.value.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-3));
    }
}

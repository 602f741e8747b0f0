//! Gizmo placement and constant on-screen size

use glam::{Mat3, Vec3};
use gz_core::constants::epsilon;
use gz_core::{GizmoConfig, TargetScene, Transform};

use crate::camera::GizmoCamera;
use crate::selection::Selection;

/// Where the gizmo sits this frame and how large it is drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Centroid of the selected objects
    pub origin: Vec3,
    /// Gizmo axes; identity unless a single object is edited in local space
    pub basis: Mat3,
    /// World units per handle unit
    pub scale: f32,
    /// Whether the gizmo is drawn and pickable
    pub visible: bool,
}

impl Default for Placement {
    fn default() -> Self {
        Self::hidden()
    }
}

impl Placement {
    /// Invisible placement at the origin
    pub fn hidden() -> Self {
        Self {
            origin: Vec3::ZERO,
            basis: Mat3::IDENTITY,
            scale: 1.0,
            visible: false,
        }
    }

    /// Normalized gizmo axis `index`
    pub fn axis(&self, index: usize) -> Vec3 {
        self.basis.col(index).normalize_or_zero()
    }

    /// Origin and basis, without the screen scale
    pub fn transform(&self) -> Transform {
        Transform::new(self.basis, self.origin)
    }

    /// Position and orient the gizmo for the current selection.
    ///
    /// The scale is left at 1; see [`compute_screen_scale`].
    pub fn from_selection(
        selection: &Selection,
        scene: &impl TargetScene,
        use_local_space: bool,
    ) -> Self {
        let mut sum = Vec3::ZERO;
        let mut count = 0usize;
        let mut basis = Mat3::IDENTITY;

        for item in selection.iter() {
            let Some(global) = scene.global_transform(item.target) else {
                continue;
            };
            sum += global.origin;
            count += 1;
            basis = global.basis;
        }

        if count == 0 {
            return Self::hidden();
        }

        Self {
            origin: sum / count as f32,
            basis: if count == 1 && use_local_space {
                basis
            } else {
                Mat3::IDENTITY
            },
            scale: 1.0,
            visible: true,
        }
    }

    /// Full per-frame placement: position, orientation and screen scale.
    ///
    /// The gizmo is hidden when nothing is selected, when it sits exactly at
    /// the camera, or when its basis has collapsed.
    pub fn compute(
        selection: &Selection,
        scene: &impl TargetScene,
        camera: &impl GizmoCamera,
        config: &GizmoConfig,
    ) -> Self {
        let mut placement = Self::from_selection(selection, scene, config.use_local_space);
        if !placement.visible {
            return placement;
        }

        let det = placement.basis.determinant();
        if det == 0.0 || !det.is_finite() {
            tracing::debug!("Gizmo basis is degenerate, hiding");
            return Self::hidden();
        }

        match compute_screen_scale(camera, placement.origin, config.size) {
            Some(scale) => placement.scale = scale,
            None => return Self::hidden(),
        }
        placement
    }
}

/// World units that make one handle unit cover `target_pixel_size` pixels
/// at `origin`.
///
/// Returns `None` when `origin` coincides with the camera position.
pub fn compute_screen_scale(
    camera: &impl GizmoCamera,
    origin: Vec3,
    target_pixel_size: f32,
) -> Option<f32> {
    let cam = camera.global_transform();
    if origin.abs_diff_eq(cam.origin, epsilon::CMP) {
        return None;
    }

    let cam_z = -cam.axis(2).normalize_or_zero();
    let cam_y = -cam.axis(1).normalize_or_zero();

    // Depth of the gizmo along the view direction
    let depth = cam_z.dot(origin) - cam_z.dot(cam.origin);
    let depth = depth.abs().max(epsilon::SCALE);

    let probe = cam.origin + cam_z * depth;
    let d0 = camera.world_to_screen(probe).y;
    let d1 = camera.world_to_screen(probe + cam_y).y;
    let pixels_per_unit = (d0 - d1).abs().max(epsilon::SCALE);

    let scale = target_pixel_size / pixels_per_unit;
    scale.is_finite().then_some(scale)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{Camera, Projection};
    use crate::selection::SelectedItem;
    use glam::{Quat, Vec2};
    use gz_core::Scene;

    fn camera_at(z: f32) -> Camera {
        Camera::looking_at(Vec3::new(0.0, 0.0, z), Vec3::ZERO, Vec2::new(800.0, 600.0))
    }

    #[test]
    fn test_scale_doubles_with_distance() {
        let near = compute_screen_scale(&camera_at(5.0), Vec3::ZERO, 80.0).unwrap();
        let far = compute_screen_scale(&camera_at(10.0), Vec3::ZERO, 80.0).unwrap();
        assert!((far / near - 2.0).abs() < 1e-3);
    }

    #[test]
    fn test_scale_matches_pixel_size() {
        let camera = camera_at(10.0);
        let scale = compute_screen_scale(&camera, Vec3::ZERO, 80.0).unwrap();
        let a = camera.world_to_screen(Vec3::ZERO);
        let b = camera.world_to_screen(Vec3::Y * scale);
        assert!(((a.y - b.y).abs() - 80.0).abs() < 0.1);
    }

    #[test]
    fn test_orthographic_scale_ignores_distance() {
        let mut near = camera_at(5.0);
        near.set_projection(Projection::Orthographic);
        let mut far = camera_at(10.0);
        far.set_projection(Projection::Orthographic);

        let a = compute_screen_scale(&near, Vec3::ZERO, 80.0).unwrap();
        let b = compute_screen_scale(&far, Vec3::ZERO, 80.0).unwrap();
        assert!((a - b).abs() < 1e-4);
    }

    #[test]
    fn test_origin_at_camera_is_hidden() {
        let camera = camera_at(10.0);
        assert!(compute_screen_scale(&camera, Vec3::new(0.0, 0.0, 10.0), 80.0).is_none());
    }

    #[test]
    fn test_centroid_of_two_targets() {
        let mut scene = Scene::new();
        let a = scene.add_node("a", Transform::from_translation(Vec3::ZERO));
        let b = scene.add_node(
            "b",
            Transform::new(Mat3::from_rotation_y(0.5), Vec3::new(2.0, 0.0, 0.0)),
        );
        let mut selection = Selection::new();
        selection.insert(SelectedItem::capture(&scene, a, None));
        selection.insert(SelectedItem::capture(&scene, b, None));

        let placement = Placement::from_selection(&selection, &scene, true);
        assert!(placement.visible);
        assert!(placement.origin.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-6));
        assert_eq!(placement.basis, Mat3::IDENTITY);
    }

    #[test]
    fn test_single_local_target_uses_its_basis() {
        let mut scene = Scene::new();
        let rotation = Quat::from_rotation_z(0.3);
        let a = scene.add_node(
            "a",
            Transform::from_scale_rotation_translation(Vec3::ONE, rotation, Vec3::ONE),
        );
        let mut selection = Selection::new();
        selection.insert(SelectedItem::capture(&scene, a, None));

        let local = Placement::from_selection(&selection, &scene, true);
        assert!(local.basis.abs_diff_eq(Mat3::from_quat(rotation), 1e-6));
        let global = Placement::from_selection(&selection, &scene, false);
        assert_eq!(global.basis, Mat3::IDENTITY);
    }

    #[test]
    fn test_empty_selection_hidden() {
        let scene = Scene::new();
        let placement = Placement::compute(
            &Selection::new(),
            &scene,
            &camera_at(10.0),
            &GizmoConfig::default(),
        );
        assert!(!placement.visible);
    }

    #[test]
    fn test_degenerate_local_basis_hidden() {
        let mut scene = Scene::new();
        let flat = scene.add_node("flat", Transform::from_scale(Vec3::new(1.0, 0.0, 1.0)));
        let mut selection = Selection::new();
        selection.insert(SelectedItem::capture(&scene, flat, None));
        let config = GizmoConfig {
            use_local_space: true,
            ..GizmoConfig::default()
        };

        let placement = Placement::compute(&selection, &scene, &camera_at(10.0), &config);
        assert!(!placement.visible);
    }
}

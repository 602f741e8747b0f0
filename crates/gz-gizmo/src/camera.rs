//! Camera interface and a Y-up orbit camera for 3D viewports

use glam::{Mat4, Vec2, Vec3, Vec4};
use gz_core::Transform;

/// Projection kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    /// Vanishing-point projection with a vertical field of view
    #[default]
    Perspective,
    /// Parallel projection; rays share one direction
    Orthographic,
}

/// What the gizmo needs from the host camera.
///
/// Screen coordinates are in pixels with the origin at the top-left corner
/// and Y growing downward.
pub trait GizmoCamera {
    /// World-space origin of the pick ray through `screen`
    fn ray_origin(&self, screen: Vec2) -> Vec3;
    /// Normalized world-space direction of the pick ray through `screen`
    fn ray_direction(&self, screen: Vec2) -> Vec3;
    /// Project a world point to screen pixels
    fn world_to_screen(&self, point: Vec3) -> Vec2;
    /// Camera placement in the world. Basis columns are right, up and back.
    fn global_transform(&self) -> Transform;
    /// Projection kind, which decides how pick rays and the rotation plane are built
    fn projection(&self) -> Projection;

    /// Direction the camera looks along (its -Z axis)
    fn view_direction(&self) -> Vec3 {
        -self.global_transform().axis(2).normalize_or_zero()
    }
}

/// Orbit camera
#[derive(Debug, Clone)]
pub struct Camera {
    /// Eye position
    pub position: Vec3,
    /// Orbit center
    pub target: Vec3,
    /// World up vector
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Near clip distance
    pub near: f32,
    /// Far clip distance
    pub far: f32,
    /// Current projection
    pub projection: Projection,
    /// Vertical extent of the view volume in orthographic mode
    pub ortho_size: f32,
    /// Viewport size in pixels
    pub viewport: Vec2,
    // Orbit state
    /// Rotation around the up axis, radians
    pub yaw: f32,
    /// Elevation above the XZ plane, radians
    pub pitch: f32,
    /// Distance from the target
    pub distance: f32,
}

impl Camera {
    /// Create a camera orbiting the world origin
    pub fn new(viewport: Vec2) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov: 40.0_f32.to_radians(),
            near: 0.05,
            far: 4000.0,
            projection: Projection::Perspective,
            ortho_size: 10.0,
            viewport,
            yaw: 45.0_f32.to_radians(),
            pitch: 30.0_f32.to_radians(),
            distance: 5.0,
        };
        camera.update_position_from_orbit();
        camera
    }

    /// Camera at `position` looking at `target`
    pub fn looking_at(position: Vec3, target: Vec3, viewport: Vec2) -> Self {
        let mut camera = Self::new(viewport);
        camera.target = target;
        camera.position = position;

        let offset = position - target;
        camera.distance = offset.length();
        if camera.distance > 0.0 {
            camera.pitch = (offset.y / camera.distance).clamp(-1.0, 1.0).asin();
            camera.yaw = offset.x.atan2(offset.z);
        }
        camera
    }

    /// Viewport width over height
    pub fn aspect(&self) -> f32 {
        if self.viewport.y > 0.0 {
            self.viewport.x / self.viewport.y
        } else {
            1.0
        }
    }

    /// Update viewport size
    pub fn resize(&mut self, viewport: Vec2) {
        self.viewport = viewport;
    }

    /// Orbit the camera around the target
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw += delta_yaw;
        self.pitch =
            (self.pitch + delta_pitch).clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
        self.update_position_from_orbit();
    }

    /// Zoom the camera
    pub fn zoom(&mut self, delta: f32) {
        self.distance = (self.distance * (1.0 - delta * 0.1)).clamp(0.1, 10000.0);
        self.ortho_size = (self.ortho_size * (1.0 - delta * 0.1)).clamp(0.01, 10000.0);
        self.update_position_from_orbit();
    }

    /// Switch between perspective and orthographic
    pub fn set_projection(&mut self, projection: Projection) {
        self.projection = projection;
    }

    fn update_position_from_orbit(&mut self) {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.position = self.target + Vec3::new(x, y, z);
    }

    /// Get view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Get projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective => {
                Mat4::perspective_rh(self.fov, self.aspect(), self.near, self.far)
            }
            Projection::Orthographic => {
                let half_h = self.ortho_size * 0.5;
                let half_w = half_h * self.aspect();
                Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, self.near, self.far)
            }
        }
    }

    /// Convert screen coordinates to a world ray
    pub fn screen_to_ray(&self, screen: Vec2) -> (Vec3, Vec3) {
        let ndc_x = (2.0 * screen.x / self.viewport.x) - 1.0;
        let ndc_y = 1.0 - (2.0 * screen.y / self.viewport.y);

        let inv_view_proj = (self.projection_matrix() * self.view_matrix()).inverse();

        // glam projections map depth to [0, 1]
        let near = inv_view_proj * Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
        let far = inv_view_proj * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let near_world = near.truncate() / near.w;
        let far_world = far.truncate() / far.w;

        let direction = (far_world - near_world).normalize_or_zero();
        let origin = match self.projection {
            Projection::Perspective => self.position,
            Projection::Orthographic => near_world,
        };

        (origin, direction)
    }
}

impl GizmoCamera for Camera {
    fn ray_origin(&self, screen: Vec2) -> Vec3 {
        self.screen_to_ray(screen).0
    }

    fn ray_direction(&self, screen: Vec2) -> Vec3 {
        self.screen_to_ray(screen).1
    }

    fn world_to_screen(&self, point: Vec3) -> Vec2 {
        let clip = self.projection_matrix() * self.view_matrix() * point.extend(1.0);
        if clip.w.abs() < f32::EPSILON {
            return Vec2::splat(f32::NAN);
        }
        let ndc = clip.truncate() / clip.w;
        Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.viewport.x,
            (1.0 - ndc.y) * 0.5 * self.viewport.y,
        )
    }

    fn global_transform(&self) -> Transform {
        Transform::from_mat4(self.view_matrix().inverse())
    }

    fn projection(&self) -> Projection {
        self.projection
    }
}

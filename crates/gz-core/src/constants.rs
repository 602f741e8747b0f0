//! Global constants for gz-core
//!
//! Handle dimensions are expressed in gizmo-local units and are multiplied
//! by the screen-space scale factor before use.

/// Handle geometry constants
pub mod handle {
    /// Length of the move arrow head
    pub const ARROW_SIZE: f32 = 0.35;
    /// Half width of a rotation ring (hit tolerance)
    pub const RING_HALF_WIDTH: f32 = 0.1;
    /// Edge length of a plane quad
    pub const PLANE_SIZE: f32 = 0.2;
    /// Distance of a plane quad from the gizmo origin
    pub const PLANE_DST: f32 = 0.3;
    /// Rotation ring radius
    pub const CIRCLE_SIZE: f32 = 1.1;
    /// Distance of the scale cube from the gizmo origin
    pub const SCALE_OFFSET: f32 = CIRCLE_SIZE - 0.3;
    /// Distance of the move arrow from the gizmo origin
    pub const ARROW_OFFSET: f32 = CIRCLE_SIZE + 0.15;
    /// Plane hit tolerance as a multiple of the plane size
    pub const PLANE_TOLERANCE: f32 = 1.5;
    /// Plane distance weight used to place the plane grabber
    pub const PLANE_GRAB_WEIGHT: f32 = 0.6667;
}

/// Picking constants
pub mod pick {
    /// Length of the segment used in place of an infinite ray
    pub const MAX_Z: f32 = 1_000_000.0;
    /// Initial "no hit yet" distance
    pub const FAR_SENTINEL: f32 = 1e20;
    /// Rotate sphere hits are only accepted when `normal · view` is below this
    pub const RING_FRONT_FACING: f32 = 0.05;
    /// Ring plane fallback rejects directions with `view · dir` above this
    pub const RING_BACK_CUTOFF: f32 = 0.005;
}

/// Motion constants
pub mod motion {
    /// Step used when snapping is disabled
    pub const DEFAULT_FLOAT_STEP: f32 = 0.001;
    /// Rotation axis counts as orthogonal to the view within this angle (degrees)
    pub const ORTHOGONAL_THRESHOLD_DEGREES: f32 = 85.0;
}

/// Numeric tolerances
pub mod epsilon {
    /// General comparison epsilon
    pub const CMP: f32 = 1e-5;
    /// Smallest scale divisor accepted by placement
    pub const SCALE: f32 = f32::EPSILON;
}

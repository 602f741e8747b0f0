//! Handle hit testing
//!
//! Tools are tested in a fixed order: move, then rotate, then scale. The
//! first tool with any hit wins. Within a tool, single-axis handles take
//! priority over plane handles.

use glam::Vec3;
use gz_core::constants::{handle as dims, pick};
use gz_core::math::{self, Plane};
use gz_core::{ToolModes, ray_sphere_intersect};

use crate::placement::Placement;
use crate::types::{Handle, TransformMode, TransformPlane};

/// World-space pick ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickRay {
    /// Where the ray starts, on the camera or its near plane
    pub origin: Vec3,
    /// Normalized direction
    pub direction: Vec3,
    /// Camera view direction, used for front-facing checks
    pub view: Vec3,
}

/// Find the handle under `ray`, if any
pub fn pick(placement: &Placement, ray: &PickRay, modes: ToolModes) -> Option<Handle> {
    if !placement.visible {
        return None;
    }

    if modes.contains(ToolModes::MOVE)
        && let Some(plane) =
            pick_axis_or_plane(placement, ray, dims::ARROW_OFFSET + dims::ARROW_SIZE * 0.5)
    {
        return Some(Handle::new(TransformMode::Translate, plane));
    }

    if modes.contains(ToolModes::ROTATE)
        && let Some(plane) = pick_ring(placement, ray)
    {
        return Some(Handle::new(TransformMode::Rotate, plane));
    }

    if modes.contains(ToolModes::SCALE)
        && let Some(plane) = pick_axis_or_plane(placement, ray, dims::SCALE_OFFSET)
    {
        return Some(Handle::new(TransformMode::Scale, plane));
    }

    None
}

/// Axis grabbers (spheres `offset` along each axis, in gizmo units) first,
/// plane grabbers second
fn pick_axis_or_plane(placement: &Placement, ray: &PickRay, offset: f32) -> Option<TransformPlane> {
    pick_axis(placement, ray, offset)
        .map(TransformPlane::axis)
        .or_else(|| pick_plane(placement, ray).map(TransformPlane::plane))
}

/// Nearest axis grabber sphere hit by the ray
pub(crate) fn pick_axis(placement: &Placement, ray: &PickRay, offset: f32) -> Option<usize> {
    let scale = placement.scale;
    let radius = scale * dims::ARROW_SIZE;

    let mut closest = None;
    let mut closest_dist = pick::FAR_SENTINEL;

    for i in 0..3 {
        let grabber = placement.origin + placement.axis(i) * scale * offset;
        if let Some(hit) = ray_sphere_intersect(ray.origin, ray.direction, grabber, radius) {
            let dist = hit.point.distance(ray.origin);
            if dist < closest_dist {
                closest_dist = dist;
                closest = Some(i);
            }
        }
    }

    closest
}

/// Nearest plane grabber hit by the ray, as the index of the plane's normal axis
pub(crate) fn pick_plane(placement: &Placement, ray: &PickRay) -> Option<usize> {
    let scale = placement.scale;
    let grabber_offset = dims::PLANE_SIZE + dims::PLANE_DST * dims::PLANE_GRAB_WEIGHT;
    let tolerance = scale * dims::PLANE_SIZE * dims::PLANE_TOLERANCE;

    let mut closest = None;
    let mut closest_dist = pick::FAR_SENTINEL;

    for i in 0..3 {
        // Center of the quad spanned by the two in-plane axes
        let in_plane = placement.axis((i + 1) % 3) + placement.axis((i + 2) % 3);
        let grabber = placement.origin + in_plane * scale * grabber_offset;

        let plane = Plane::from_point_normal(placement.axis(i), placement.origin);
        let Some(hit) = plane.intersects_ray(ray.origin, ray.direction) else {
            continue;
        };

        if hit.distance(grabber) < tolerance {
            let dist = hit.distance(ray.origin);
            if dist < closest_dist {
                closest_dist = dist;
                closest = Some(i);
            }
        }
    }

    closest
}

/// Rotation rings: sphere surface test first, ring-plane annulus test second
pub(crate) fn pick_ring(placement: &Placement, ray: &PickRay) -> Option<TransformPlane> {
    let scale = placement.scale;
    let radius = scale * dims::CIRCLE_SIZE;
    let half_width = scale * dims::RING_HALF_WIDTH;

    // Segment long enough to pass through the whole sphere
    let ray_length = placement.origin.distance(ray.origin) + radius * 4.0;
    if let Some(hit) = math::segment_sphere_intersect(
        ray.origin,
        ray.origin + ray.direction * ray_length,
        placement.origin,
        radius,
    ) && hit.normal.dot(ray.view) < pick::RING_FRONT_FACING
    {
        let frame = math::orthonormalize(placement.basis);
        let local = (frame.transpose() * (hit.point - placement.origin)).abs();
        let axis = math::min_axis_index(local);
        if local[axis] < half_width {
            return Some(TransformPlane::axis(axis));
        }
    }

    // Rings seen nearly edge-on can be missed by the sphere test
    let mut closest = None;
    let mut closest_dist = pick::FAR_SENTINEL;
    for i in 0..3 {
        let plane = Plane::from_point_normal(placement.axis(i), placement.origin);
        let Some(hit) = plane.intersects_ray(ray.origin, ray.direction) else {
            continue;
        };

        let offset = hit - placement.origin;
        let dist = offset.length();
        let facing = ray.view.dot(offset.normalize_or_zero());
        if facing <= pick::RING_BACK_CUTOFF && dist > radius - half_width && dist < radius + half_width {
            let ray_dist = ray.origin.distance(hit);
            if ray_dist < closest_dist {
                closest_dist = ray_dist;
                closest = Some(i);
            }
        }
    }

    closest.map(TransformPlane::axis)
}

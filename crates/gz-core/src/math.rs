//! Analytic geometry for gizmo picking and motion
//!
//! Pure functions only. Every intersection helper reports a miss as `None`
//! so a zero vector is never mistaken for a valid hit point.

use glam::{Mat3, Vec3};

use crate::constants::{epsilon, pick};

/// Result of a ray or segment hitting a sphere.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereHit {
    /// Entry point on the sphere surface.
    pub point: Vec3,
    /// Outward surface normal at `point`.
    pub normal: Vec3,
}

/// Infinite plane `normal · p = d`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f32,
}

impl Plane {
    /// Plane through `point` with the given normal.
    pub fn from_point_normal(normal: Vec3, point: Vec3) -> Self {
        Self {
            normal,
            d: normal.dot(point),
        }
    }

    /// Signed distance from the plane to `point`.
    pub fn distance_to(&self, point: Vec3) -> f32 {
        self.normal.dot(point) - self.d
    }

    /// Intersect a ray with this plane.
    pub fn intersects_ray(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<Vec3> {
        ray_plane_intersect(ray_origin, ray_dir, self.normal, self.d)
    }
}

/// Ray-plane intersection.
///
/// The plane is `plane_normal · p = plane_d`. Returns `None` when the ray is
/// parallel to the plane or the plane lies behind the ray origin.
pub fn ray_plane_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    plane_normal: Vec3,
    plane_d: f32,
) -> Option<Vec3> {
    let denom = plane_normal.dot(ray_dir);
    if denom.abs() < epsilon::CMP {
        return None;
    }

    let dist = (plane_normal.dot(ray_origin) - plane_d) / denom;
    // Positive distance means the plane is behind the origin
    if dist > epsilon::CMP {
        return None;
    }

    Some(ray_origin - ray_dir * dist)
}

/// Segment-sphere intersection.
///
/// Returns the entry point of the segment `from..to` into the sphere. A
/// segment starting inside the sphere, or ending before reaching it, misses.
pub fn segment_sphere_intersect(
    from: Vec3,
    to: Vec3,
    sphere_center: Vec3,
    radius: f32,
) -> Option<SphereHit> {
    let sphere_pos = sphere_center - from;
    let rel = to - from;
    let rel_len = rel.length();
    if rel_len < epsilon::CMP {
        return None;
    }

    let dir = rel / rel_len;
    let sphere_d = dir.dot(sphere_pos);
    let ray_distance = sphere_pos.distance(dir * sphere_d);
    if ray_distance >= radius {
        return None;
    }

    let inters_d2 = radius * radius - ray_distance * ray_distance;
    let mut inters_d = sphere_d;
    if inters_d2 >= epsilon::CMP {
        inters_d -= inters_d2.sqrt();
    }

    if inters_d < 0.0 || inters_d > rel_len {
        return None;
    }

    let point = from + dir * inters_d;
    Some(SphereHit {
        point,
        normal: (point - sphere_center).normalize_or_zero(),
    })
}

/// Ray-sphere intersection, with the ray capped at [`pick::MAX_Z`].
pub fn ray_sphere_intersect(
    ray_origin: Vec3,
    ray_dir: Vec3,
    sphere_center: Vec3,
    radius: f32,
) -> Option<SphereHit> {
    segment_sphere_intersect(
        ray_origin,
        ray_origin + ray_dir * pick::MAX_Z,
        sphere_center,
        radius,
    )
}

/// Project `v` onto the (unit) direction `axis`.
pub fn project_onto_axis(v: Vec3, axis: Vec3) -> Vec3 {
    axis * axis.dot(v)
}

/// Gram-Schmidt orthonormalization of a basis, keeping the X column direction.
pub fn orthonormalize(basis: Mat3) -> Mat3 {
    let x = basis.x_axis.normalize_or_zero();
    let y = (basis.y_axis - x * x.dot(basis.y_axis)).normalize_or_zero();
    let z = (basis.z_axis - x * x.dot(basis.z_axis) - y * y.dot(basis.z_axis)).normalize_or_zero();
    Mat3::from_cols(x, y, z)
}

/// Apply a non-uniform scale along the basis's own orthonormal frame.
///
/// The requested scale is projected onto the orthonormalized axes, weighted
/// by how well each original (possibly skewed) column lines up with them.
/// The sign of the aggregate scale change is preserved, so shrinking stays
/// shrinking. Rotated, already non-uniformly scaled bases come out without
/// shear.
pub fn scale_orthogonal(basis: Mat3, scale: Vec3) -> Mat3 {
    let s = scale - Vec3::ONE;
    let shrinking = s.element_sum() < 0.0;
    let ortho = orthonormalize(basis);
    let s = ortho.transpose() * s;

    let mut dots = Vec3::ZERO;
    for i in 0..3 {
        let column = basis.col(i).normalize_or_zero();
        for j in 0..3 {
            dots[j] += s[i] * column.dot(ortho.col(j)).abs();
        }
    }
    if shrinking != (dots.element_sum() < 0.0) {
        dots = -dots;
    }

    basis * Mat3::from_diagonal(Vec3::ONE + dots)
}

/// Round `value` to the nearest multiple of `step`. A zero step is a no-op.
pub fn snapped(value: f32, step: f32) -> f32 {
    if step == 0.0 {
        return value;
    }
    (value / step + 0.5).floor() * step
}

/// Component-wise [`snapped`].
pub fn snapped_vec(value: Vec3, step: f32) -> Vec3 {
    Vec3::new(
        snapped(value.x, step),
        snapped(value.y, step),
        snapped(value.z, step),
    )
}

/// Angle from `from` to `to`, signed by the right-hand rule about `axis`.
pub fn signed_angle_to(from: Vec3, to: Vec3, axis: Vec3) -> f32 {
    let cross = from.cross(to);
    let unsigned = cross.length().atan2(from.dot(to));
    if cross.dot(axis) < 0.0 {
        -unsigned
    } else {
        unsigned
    }
}

/// Index of the smallest component.
pub fn min_axis_index(v: Vec3) -> usize {
    if v.x < v.y {
        if v.x < v.z { 0 } else { 2 }
    } else if v.y < v.z {
        1
    } else {
        2
    }
}

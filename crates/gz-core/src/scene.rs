//! Target identity and scene access
//!
//! The gizmo never owns the objects it manipulates. It refers to them by
//! [`TargetId`] and reads or writes their transforms through a
//! [`TargetScene`] implementation supplied by the host.

use std::collections::HashMap;
use std::fmt;

use glam::{Mat3, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::transform::Transform;

/// Stable identity of an externally owned scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub Uuid);

impl TargetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for TargetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Axis-aligned bounding box in an object's local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Transform that maps the unit cube `[0, 1]^3` onto this box.
    pub fn unit_cube_transform(&self) -> Transform {
        Transform::new(Mat3::from_diagonal(self.size()), self.min)
    }
}

/// Read/write access to the transforms of externally owned objects.
///
/// Lookups for unknown ids return `None`; writes to unknown ids are ignored.
pub trait TargetScene {
    /// Transform relative to the object's parent.
    fn local_transform(&self, id: TargetId) -> Option<Transform>;
    /// Transform relative to the world.
    fn global_transform(&self, id: TargetId) -> Option<Transform>;
    fn set_local_transform(&mut self, id: TargetId, transform: Transform);
    fn set_global_transform(&mut self, id: TargetId, transform: Transform);
    /// Local-space bounds, used only for the selection box.
    fn bounds(&self, _id: TargetId) -> Option<Aabb> {
        None
    }
}

/// A node in the in-memory [`Scene`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    pub local: Transform,
    pub parent: Option<TargetId>,
    pub bounds: Option<Aabb>,
}

/// Minimal parent/child scene graph implementing [`TargetScene`].
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: HashMap<TargetId, SceneNode>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a root node, returns its id
    pub fn add_node(&mut self, name: impl Into<String>, local: Transform) -> TargetId {
        self.insert(name.into(), local, None)
    }

    /// Add a node parented to `parent`, returns its id
    pub fn add_child(
        &mut self,
        parent: TargetId,
        name: impl Into<String>,
        local: Transform,
    ) -> TargetId {
        self.insert(name.into(), local, Some(parent))
    }

    fn insert(&mut self, name: String, local: Transform, parent: Option<TargetId>) -> TargetId {
        let id = TargetId::new();
        self.nodes.insert(
            id,
            SceneNode {
                name,
                local,
                parent,
                bounds: None,
            },
        );
        id
    }

    pub fn set_bounds(&mut self, id: TargetId, bounds: Aabb) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.bounds = Some(bounds);
        }
    }

    pub fn node(&self, id: TargetId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn remove(&mut self, id: TargetId) -> Option<SceneNode> {
        self.nodes.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = TargetId> + '_ {
        self.nodes.keys().copied()
    }

    fn parent_global(&self, node: &SceneNode) -> Transform {
        node.parent
            .and_then(|parent| self.global_transform(parent))
            .unwrap_or(Transform::IDENTITY)
    }
}

impl TargetScene for Scene {
    fn local_transform(&self, id: TargetId) -> Option<Transform> {
        self.nodes.get(&id).map(|node| node.local)
    }

    fn global_transform(&self, id: TargetId) -> Option<Transform> {
        // Walk up the chain; bounded by the node count so a cycle cannot hang
        let mut node = self.nodes.get(&id)?;
        let mut global = node.local;
        for _ in 0..self.nodes.len() {
            let Some(parent) = node.parent.and_then(|p| self.nodes.get(&p)) else {
                break;
            };
            global = parent.local * global;
            node = parent;
        }
        Some(global)
    }

    fn set_local_transform(&mut self, id: TargetId, transform: Transform) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.local = transform;
        }
    }

    fn set_global_transform(&mut self, id: TargetId, transform: Transform) {
        let Some(node) = self.nodes.get(&id) else {
            return;
        };
        let parent = self.parent_global(node);
        let local = if parent.is_degenerate() {
            transform
        } else {
            parent.inverse() * transform
        };
        self.set_local_transform(id, local);
    }

    fn bounds(&self, id: TargetId) -> Option<Aabb> {
        self.nodes.get(&id).and_then(|node| node.bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_global_composes_parent() {
        let mut scene = Scene::new();
        let parent = scene.add_node("parent", Transform::from_translation(Vec3::new(1.0, 0.0, 0.0)));
        let child = scene.add_child(parent, "child", Transform::from_translation(Vec3::new(0.0, 2.0, 0.0)));

        let global = scene.global_transform(child).unwrap();
        assert!(global.origin.abs_diff_eq(Vec3::new(1.0, 2.0, 0.0), 1e-6));
    }

    #[test]
    fn test_set_global_rederives_local() {
        let mut scene = Scene::new();
        let parent = scene.add_node("parent", Transform::from_scale(Vec3::splat(2.0)));
        let child = scene.add_child(parent, "child", Transform::IDENTITY);

        scene.set_global_transform(child, Transform::from_translation(Vec3::new(4.0, 0.0, 0.0)));

        let local = scene.local_transform(child).unwrap();
        assert!(local.origin.abs_diff_eq(Vec3::new(2.0, 0.0, 0.0), 1e-6));
        let global = scene.global_transform(child).unwrap();
        assert!(global.origin.abs_diff_eq(Vec3::new(4.0, 0.0, 0.0), 1e-6));
    }

    #[test]
    fn test_unknown_id() {
        let mut scene = Scene::new();
        let missing = TargetId::new();
        assert!(scene.global_transform(missing).is_none());
        scene.set_local_transform(missing, Transform::IDENTITY);
        assert!(scene.is_empty());
    }

    #[test]
    fn test_aabb_unit_cube_transform() {
        let aabb = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5));
        let t = aabb.unit_cube_transform();
        assert_eq!(t.transform_point(Vec3::ZERO), Vec3::splat(-0.5));
        assert_eq!(t.transform_point(Vec3::ONE), Vec3::splat(0.5));
        assert_eq!(aabb.center(), Vec3::ZERO);
    }
}

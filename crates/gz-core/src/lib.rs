//! Gizmo3D core types
//!
//! Math, transforms, scene access and configuration shared by the
//! interactive gizmo. Nothing in this crate knows about pointers or
//! cameras; it only describes affine transforms and how to read and
//! write them on externally owned objects.

pub mod config;
pub mod constants;
pub mod error;
pub mod math;
pub mod scene;
pub mod transform;

pub use config::{AxisColors, GizmoConfig, PointerButton, SnapConfig, ToolModes};
pub use error::GizmoError;
pub use math::{SphereHit, ray_plane_intersect, ray_sphere_intersect, scale_orthogonal};
pub use scene::{Aabb, Scene, SceneNode, TargetId, TargetScene};
pub use transform::Transform;

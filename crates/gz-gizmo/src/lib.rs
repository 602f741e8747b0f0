//! Interactive transform gizmo
//!
//! Picks move, rotate and scale handles under the pointer, turns pointer
//! drags into translation, rotation or scale deltas, and writes the result
//! back to the selected targets through [`gz_core::TargetScene`].
//!
//! The host supplies the camera ([`GizmoCamera`]) and, optionally, a
//! [`HandleRenderer`] that draws the handle visuals.

pub mod camera;
pub mod compose;
pub mod events;
pub mod gizmo;
pub mod handles;
pub mod picking;
pub mod placement;
pub mod policy;
pub mod selection;
pub mod session;
pub mod types;

pub use camera::{Camera, GizmoCamera, Projection};
pub use compose::compose;
pub use events::GizmoEvent;
pub use gizmo::Gizmo;
pub use handles::{
    HandleInstance, HandleRenderer, HandleSet, InstanceRecorder, NullRenderer, RenderHandle,
    VisualKind,
};
pub use picking::{PickRay, pick};
pub use placement::{Placement, compute_screen_scale};
pub use policy::{ClampRotation, DefaultPolicy, EditPolicy, GridTranslation, UniformScale};
pub use selection::{SelectedItem, Selection};
pub use session::{EditSession, Motion, MotionContext};
pub use types::{Handle, TransformMode, TransformPlane};

//! Edit lifecycle notifications

use glam::Vec3;

use crate::types::TransformMode;

/// Notification emitted by the gizmo controller, drained by the host
#[derive(Debug, Clone, PartialEq)]
pub enum GizmoEvent {
    /// A handle was grabbed
    EditBegin(TransformMode),
    /// Motion was applied to the selection
    EditProgress {
        mode: TransformMode,
        /// Motion after policy adjustment
        value: Vec3,
    },
    /// The edit ended (release, focus loss or visibility loss)
    EditEnd(TransformMode),
}

impl GizmoEvent {
    /// Tool mode of the edit this event belongs to
    pub fn mode(&self) -> TransformMode {
        match self {
            GizmoEvent::EditBegin(mode) | GizmoEvent::EditEnd(mode) => *mode,
            GizmoEvent::EditProgress { mode, .. } => *mode,
        }
    }
}

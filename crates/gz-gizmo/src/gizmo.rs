//! Gizmo controller
//!
//! Owns the selection, the current placement and the edit session, and
//! routes pointer input between hovering, grabbing and dragging.

use std::collections::VecDeque;

use glam::Vec2;
use gz_core::{GizmoConfig, GizmoError, PointerButton, TargetId, TargetScene, ToolModes};

use crate::camera::GizmoCamera;
use crate::compose::compose;
use crate::events::GizmoEvent;
use crate::handles::{HandleRenderer, HandleSet, NullRenderer, VisualKind};
use crate::picking::{self, PickRay};
use crate::placement::Placement;
use crate::policy::{DefaultPolicy, EditPolicy};
use crate::selection::{SelectedItem, Selection};
use crate::session::{EditSession, MotionContext};
use crate::types::{Handle, TransformMode};

/// Interactive move/rotate/scale gizmo
pub struct Gizmo<R: HandleRenderer = NullRenderer> {
    config: GizmoConfig,
    selection: Selection,
    placement: Placement,
    session: Option<EditSession>,
    hovered: Option<Handle>,
    snapping: bool,
    fine_snap: bool,
    message: String,
    policy: Box<dyn EditPolicy>,
    events: VecDeque<GizmoEvent>,
    renderer: R,
    handles: HandleSet,
}

impl Gizmo<NullRenderer> {
    /// Gizmo without visuals
    pub fn new(config: GizmoConfig) -> Self {
        Self::with_renderer(config, NullRenderer::default())
    }
}

impl<R: HandleRenderer> Gizmo<R> {
    /// Gizmo drawing its handles through `renderer`
    pub fn with_renderer(config: GizmoConfig, mut renderer: R) -> Self {
        let handles = HandleSet::create(&mut renderer);
        Self {
            config,
            selection: Selection::new(),
            placement: Placement::hidden(),
            session: None,
            hovered: None,
            snapping: false,
            fine_snap: false,
            message: String::new(),
            policy: Box::new(DefaultPolicy),
            events: VecDeque::new(),
            renderer,
            handles,
        }
    }

    /// Replace the motion policy
    pub fn with_policy(mut self, policy: impl EditPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Current configuration
    pub fn config(&self) -> &GizmoConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect on the next update.
    pub fn set_config(&mut self, config: GizmoConfig) {
        self.config = config;
    }

    /// Enable a different set of tools
    pub fn set_modes(&mut self, modes: ToolModes) {
        self.config.modes = modes;
    }

    /// Switch between world and local space. Ignored while editing.
    pub fn set_local_space(&mut self, local: bool) {
        if self.is_editing() {
            tracing::debug!("Ignoring space change during edit");
            return;
        }
        self.config.use_local_space = local;
    }

    /// The handle renderer
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable access to the handle renderer
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Render handles of the gizmo visuals
    pub fn handles(&self) -> &HandleSet {
        &self.handles
    }

    // ========== Selection ==========

    /// Select a target. Selecting it again refreshes its snapshot, unless an
    /// edit is in progress and the snapshot is its starting point.
    pub fn select(&mut self, scene: &impl TargetScene, target: TargetId) {
        if let Some(item) = self.selection.get_mut(target) {
            if self.session.is_none() {
                item.refresh(scene);
            }
            return;
        }

        let selection_box = self.renderer.create(VisualKind::SelectionBox, None);
        self.selection
            .insert(SelectedItem::capture(scene, target, Some(selection_box)));
        tracing::debug!("Selected {} ({} total)", target, self.selection.len());
    }

    /// Deselect a target. Returns whether it was selected.
    pub fn deselect(&mut self, target: TargetId) -> bool {
        let Some(item) = self.selection.remove(target) else {
            return false;
        };
        if let Some(selection_box) = item.selection_box {
            self.renderer.destroy(selection_box);
        }
        if self.selection.is_empty() {
            self.set_hovered(None);
        }
        tracing::debug!("Deselected {} ({} left)", target, self.selection.len());
        true
    }

    /// Whether `target` is selected
    pub fn is_selected(&self, target: TargetId) -> bool {
        self.selection.contains(target)
    }

    /// Deselect everything
    pub fn clear_selection(&mut self) {
        for item in self.selection.drain() {
            if let Some(selection_box) = item.selection_box {
                self.renderer.destroy(selection_box);
            }
        }
        self.set_hovered(None);
    }

    /// Number of selected targets
    pub fn selected_count(&self) -> usize {
        self.selection.len()
    }

    /// The selected targets and their snapshots
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    // ========== State ==========

    /// Placement computed by the last [`Gizmo::update`]
    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    /// Whether a handle is being dragged
    pub fn is_editing(&self) -> bool {
        self.session.is_some()
    }

    /// Whether a handle is under the pointer
    pub fn is_hovering(&self) -> bool {
        self.hovered.is_some()
    }

    /// Handle under the pointer, or the one being dragged
    pub fn hovered(&self) -> Option<Handle> {
        self.hovered
    }

    /// Mode of the current edit, [`TransformMode::None`] when idle
    pub fn edit_mode(&self) -> TransformMode {
        self.session.map_or(TransformMode::None, |s| s.mode)
    }

    /// Progress text of the current edit, empty when idle
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GizmoEvent> {
        self.events.drain(..).collect()
    }

    // ========== Frame update ==========

    /// Recompute placement and push visuals. Call once per frame.
    pub fn update(&mut self, scene: &impl TargetScene, camera: &impl GizmoCamera) {
        self.placement = Placement::compute(&self.selection, scene, camera, &self.config);

        let editing = self.session.map(|s| s.plane);
        self.handles.update(
            &mut self.renderer,
            &self.placement,
            self.config.modes,
            editing,
            self.config.show_axes,
        );

        for item in self.selection.iter() {
            let Some(selection_box) = item.selection_box else {
                continue;
            };
            match (scene.global_transform(item.target), scene.bounds(item.target)) {
                (Some(global), Some(bounds)) => {
                    let transform = global * bounds.unit_cube_transform();
                    self.renderer.set_transform(selection_box, &transform);
                    self.renderer.set_visible(selection_box, true);
                }
                _ => self.renderer.set_visible(selection_box, false),
            }
        }
    }

    /// Handle under `screen_pos`, if any
    pub fn pick(&self, camera: &impl GizmoCamera, screen_pos: Vec2) -> Option<Handle> {
        let ray = PickRay {
            origin: camera.ray_origin(screen_pos),
            direction: camera.ray_direction(screen_pos),
            view: camera.view_direction(),
        };
        picking::pick(&self.placement, &ray, self.config.modes)
    }

    // ========== Input ==========

    /// Pointer pressed. Grabs the handle under the pointer when idle.
    pub fn on_pointer_down(
        &mut self,
        scene: &impl TargetScene,
        camera: &impl GizmoCamera,
        screen_pos: Vec2,
        button: PointerButton,
    ) {
        if !self.placement.visible {
            self.end_edit();
            self.set_hovered(None);
            return;
        }
        if button != self.config.edit_button || self.session.is_some() {
            return;
        }

        let Some(handle) = self.pick(camera, screen_pos) else {
            return;
        };

        self.selection.snapshot(scene);
        self.session = Some(EditSession::begin(
            camera,
            screen_pos,
            &self.placement,
            handle,
        ));
        self.set_hovered(Some(handle));
        self.events.push_back(GizmoEvent::EditBegin(handle.mode));
        tracing::debug!("Edit started: {} {:?}", handle.mode, handle.plane);
    }

    /// Pointer moved. Drags while editing, updates the hover highlight otherwise.
    pub fn on_pointer_move(
        &mut self,
        scene: &mut impl TargetScene,
        camera: &impl GizmoCamera,
        screen_pos: Vec2,
        button_held: bool,
    ) {
        if !self.placement.visible {
            self.end_edit();
            self.set_hovered(None);
            return;
        }

        if let Some(session) = self.session.as_mut() {
            if !button_held {
                // Release happened outside our input stream
                self.end_edit();
                return;
            }
            session.pointer_pos = screen_pos;
            self.apply_motion(scene, camera);
            return;
        }

        let hovered = self.pick(camera, screen_pos);
        self.set_hovered(hovered);
    }

    /// Pointer released. Ends the edit if the edit button was released.
    pub fn on_pointer_up(&mut self, button: PointerButton) {
        if button == self.config.edit_button {
            self.end_edit();
        }
    }

    /// Snapping modifiers changed
    pub fn on_modifier_changed(&mut self, snapping: bool, fine_snap: bool) {
        self.snapping = snapping;
        self.fine_snap = fine_snap;
    }

    /// The viewport lost focus: drop the edit, modifiers and hover
    pub fn on_focus_lost(&mut self) {
        self.end_edit();
        self.snapping = false;
        self.fine_snap = false;
        self.set_hovered(None);
    }

    fn set_hovered(&mut self, hovered: Option<Handle>) {
        if hovered != self.hovered {
            self.handles
                .highlight(&mut self.renderer, self.hovered, hovered);
            self.hovered = hovered;
        }
    }

    fn end_edit(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        self.message.clear();
        self.set_hovered(None);
        self.events.push_back(GizmoEvent::EditEnd(session.mode));
        tracing::debug!("Edit ended: {}", session.mode);
    }

    fn apply_motion(&mut self, scene: &mut impl TargetScene, camera: &impl GizmoCamera) {
        let Some(session) = self.session else {
            return;
        };

        let ctx = MotionContext {
            snapping: self.snapping,
            fine_snap: self.fine_snap,
            snap: &self.config.snap,
            use_local_space: self.config.use_local_space,
            scale: self.placement.scale,
        };
        let Some(mut motion) = session.compute_motion(camera, &ctx) else {
            tracing::trace!("No motion this frame ({} {:?})", session.mode, session.plane);
            return;
        };

        motion.value = match motion.mode {
            TransformMode::Translate => self.policy.adjust_translation(motion.value),
            TransformMode::Scale => self.policy.adjust_scale(motion.value),
            TransformMode::Rotate => self.policy.adjust_rotation(motion.value),
            TransformMode::None => motion.value,
        };

        for item in self.selection.iter() {
            match compose(&motion, session.center, &item.original_global, &item.original_local) {
                Ok(transform) if motion.local => scene.set_local_transform(item.target, transform),
                Ok(transform) => scene.set_global_transform(item.target, transform),
                Err(GizmoError::DegenerateBasis) => {
                    tracing::trace!("Skipping degenerate result for {}", item.target);
                }
                Err(e) => {
                    tracing::error!("Failed to apply {} to {}: {}", motion.mode, item.target, e);
                }
            }
        }

        self.events.push_back(GizmoEvent::EditProgress {
            mode: motion.mode,
            value: motion.value,
        });
        self.message = motion.message;
    }
}

impl<R: HandleRenderer> Drop for Gizmo<R> {
    fn drop(&mut self) {
        self.clear_selection();
        self.handles.destroy(&mut self.renderer);
    }
}

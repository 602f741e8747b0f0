//! Handle visuals
//!
//! The gizmo does not draw anything itself. It creates one render instance
//! per visual through a [`HandleRenderer`] and keeps those instances'
//! transforms, visibility and highlight in sync with the gizmo state.

use std::collections::HashMap;

use bytemuck::{Pod, Zeroable};
use gz_core::{AxisColors, ToolModes, Transform};

use crate::placement::Placement;
use crate::types::{Handle, TransformMode, TransformPlane};

/// Opaque reference to a render instance owned by the host renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RenderHandle(pub u64);

/// Kind of visual a render instance represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualKind {
    /// Translation arrow along one axis
    MoveArrow,
    /// Translation quad in one coordinate plane
    MovePlane,
    /// Rotation ring around one axis
    RotateRing,
    /// Silhouette circle drawn around the rotation rings
    RotateOutline,
    /// Scale grabber on one axis
    ScaleCube,
    /// Two-axis scale quad
    ScalePlane,
    /// Infinite guide line shown along constrained axes while editing
    AxisLine,
    /// Wireframe box around a selected object
    SelectionBox,
}

/// Host-side renderer of gizmo visuals
pub trait HandleRenderer {
    /// Create a hidden render instance. `axis` is the axis the visual belongs to, if any.
    fn create(&mut self, kind: VisualKind, axis: Option<usize>) -> RenderHandle;
    /// Release an instance. The handle is not used again.
    fn destroy(&mut self, handle: RenderHandle);
    /// Show or hide an instance
    fn set_visible(&mut self, handle: RenderHandle, visible: bool);
    /// World transform of an instance, in gizmo units scaled to the screen
    fn set_transform(&mut self, handle: RenderHandle, transform: &Transform);
    /// Draw an instance in its hover color
    fn set_highlighted(&mut self, handle: RenderHandle, highlighted: bool);
}

/// Renderer that hands out handles and draws nothing
#[derive(Debug, Default)]
pub struct NullRenderer {
    next: u64,
}

impl HandleRenderer for NullRenderer {
    fn create(&mut self, _kind: VisualKind, _axis: Option<usize>) -> RenderHandle {
        self.next += 1;
        RenderHandle(self.next)
    }

    fn destroy(&mut self, _handle: RenderHandle) {}
    fn set_visible(&mut self, _handle: RenderHandle, _visible: bool) {}
    fn set_transform(&mut self, _handle: RenderHandle, _transform: &Transform) {}
    fn set_highlighted(&mut self, _handle: RenderHandle, _highlighted: bool) {}
}

/// Per-instance GPU data for one handle visual
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct HandleInstance {
    /// Column-major model matrix
    pub transform: [[f32; 4]; 4],
    /// Linear RGBA
    pub color: [f32; 4],
    /// 1.0 when hovered or dragged
    pub highlighted: f32,
    /// Keeps the struct 16-byte aligned
    pub _pad: [f32; 3],
}

impl HandleInstance {
    /// Pack one visual
    pub fn new(transform: &Transform, color: [f32; 4], highlighted: bool) -> Self {
        Self {
            transform: transform.to_mat4().to_cols_array_2d(),
            color,
            highlighted: if highlighted { 1.0 } else { 0.0 },
            _pad: [0.0; 3],
        }
    }
}

/// State of one instance tracked by [`InstanceRecorder`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordedVisual {
    /// What the instance draws
    pub kind: VisualKind,
    /// Owning axis, `None` for shared visuals
    pub axis: Option<usize>,
    /// Last visibility set
    pub visible: bool,
    /// Last highlight state set
    pub highlighted: bool,
    /// Last transform set
    pub transform: Transform,
}

/// CPU-side mirror of every live visual, ready to be packed into an
/// instance buffer with [`InstanceRecorder::instance_bytes`].
#[derive(Debug, Default)]
pub struct InstanceRecorder {
    next: u64,
    visuals: HashMap<RenderHandle, RecordedVisual>,
    colors: AxisColors,
    neutral: [f32; 3],
    opacity: f32,
}

impl InstanceRecorder {
    /// `neutral` colors visuals without an axis (outline, selection boxes)
    pub fn new(colors: AxisColors, neutral: [f32; 3], opacity: f32) -> Self {
        Self {
            next: 0,
            visuals: HashMap::new(),
            colors,
            neutral,
            opacity,
        }
    }

    /// Recorded state of a live instance
    pub fn get(&self, handle: RenderHandle) -> Option<&RecordedVisual> {
        self.visuals.get(&handle)
    }

    /// Number of live (created and not destroyed) instances
    pub fn live_count(&self) -> usize {
        self.visuals.len()
    }

    /// Live instances of one kind
    pub fn count_of(&self, kind: VisualKind) -> usize {
        self.visuals.values().filter(|v| v.kind == kind).count()
    }

    /// All live instances, in no particular order
    pub fn visuals(&self) -> impl Iterator<Item = (RenderHandle, &RecordedVisual)> {
        self.visuals.iter().map(|(handle, visual)| (*handle, visual))
    }

    /// Instance data for every visible visual, ordered by handle
    pub fn instances(&self) -> Vec<HandleInstance> {
        let mut visible: Vec<_> = self.visuals.iter().filter(|(_, v)| v.visible).collect();
        visible.sort_by_key(|(handle, _)| **handle);
        visible
            .into_iter()
            .map(|(_, v)| {
                let color = match v.axis {
                    Some(axis) => self.colors.rgba(axis, self.opacity),
                    None => [self.neutral[0], self.neutral[1], self.neutral[2], self.opacity],
                };
                HandleInstance::new(&v.transform, color, v.highlighted)
            })
            .collect()
    }

    /// Raw bytes of [`Self::instances`] for upload
    pub fn instance_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.instances()).to_vec()
    }
}

impl HandleRenderer for InstanceRecorder {
    fn create(&mut self, kind: VisualKind, axis: Option<usize>) -> RenderHandle {
        self.next += 1;
        let handle = RenderHandle(self.next);
        self.visuals.insert(
            handle,
            RecordedVisual {
                kind,
                axis,
                visible: false,
                highlighted: false,
                transform: Transform::IDENTITY,
            },
        );
        handle
    }

    fn destroy(&mut self, handle: RenderHandle) {
        self.visuals.remove(&handle);
    }

    fn set_visible(&mut self, handle: RenderHandle, visible: bool) {
        if let Some(v) = self.visuals.get_mut(&handle) {
            v.visible = visible;
        }
    }

    fn set_transform(&mut self, handle: RenderHandle, transform: &Transform) {
        if let Some(v) = self.visuals.get_mut(&handle) {
            v.transform = *transform;
        }
    }

    fn set_highlighted(&mut self, handle: RenderHandle, highlighted: bool) {
        if let Some(v) = self.visuals.get_mut(&handle) {
            v.highlighted = highlighted;
        }
    }
}

/// Visuals belonging to one axis
#[derive(Debug, Clone, Copy)]
pub struct AxisVisuals {
    /// Translation arrow
    pub move_arrow: RenderHandle,
    /// Plane quad whose normal is this axis
    pub move_plane: RenderHandle,
    /// Rotation ring around this axis
    pub rotate_ring: RenderHandle,
    /// Scale cube at the end of the axis
    pub scale_cube: RenderHandle,
    /// Scale quad whose normal is this axis
    pub scale_plane: RenderHandle,
    /// Guide line shown while this axis is constrained
    pub axis_line: RenderHandle,
}

/// Every handle visual of a gizmo, created once and reused across frames
#[derive(Debug, Clone, Copy)]
pub struct HandleSet {
    /// Per-axis visuals, indexed X, Y, Z
    pub axes: [AxisVisuals; 3],
    /// View-facing outline around the rings
    pub rotate_outline: RenderHandle,
}

impl HandleSet {
    /// Create every visual through `renderer`
    pub fn create(renderer: &mut impl HandleRenderer) -> Self {
        let axes = [0, 1, 2].map(|i| AxisVisuals {
            move_arrow: renderer.create(VisualKind::MoveArrow, Some(i)),
            move_plane: renderer.create(VisualKind::MovePlane, Some(i)),
            rotate_ring: renderer.create(VisualKind::RotateRing, Some(i)),
            scale_cube: renderer.create(VisualKind::ScaleCube, Some(i)),
            scale_plane: renderer.create(VisualKind::ScalePlane, Some(i)),
            axis_line: renderer.create(VisualKind::AxisLine, Some(i)),
        });
        let rotate_outline = renderer.create(VisualKind::RotateOutline, None);
        Self {
            axes,
            rotate_outline,
        }
    }

    fn all(&self) -> impl Iterator<Item = RenderHandle> + '_ {
        self.axes
            .iter()
            .flat_map(|a| {
                [
                    a.move_arrow,
                    a.move_plane,
                    a.rotate_ring,
                    a.scale_cube,
                    a.scale_plane,
                    a.axis_line,
                ]
            })
            .chain(std::iter::once(self.rotate_outline))
    }

    /// Release every visual
    pub fn destroy(&self, renderer: &mut impl HandleRenderer) {
        for handle in self.all() {
            renderer.destroy(handle);
        }
    }

    /// Hide every visual
    pub fn hide(&self, renderer: &mut impl HandleRenderer) {
        for handle in self.all() {
            renderer.set_visible(handle, false);
        }
    }

    /// Visual that represents `handle`
    pub fn visual_for(&self, handle: Handle) -> Option<RenderHandle> {
        let (axis, is_plane) = match (handle.plane.axis_index(), handle.plane.normal_index()) {
            (Some(axis), _) => (axis, false),
            (None, Some(normal)) => (normal, true),
            (None, None) => return None,
        };
        let visuals = &self.axes[axis];
        match (handle.mode, is_plane) {
            (TransformMode::Translate, false) => Some(visuals.move_arrow),
            (TransformMode::Translate, true) => Some(visuals.move_plane),
            (TransformMode::Rotate, false) => Some(visuals.rotate_ring),
            (TransformMode::Scale, false) => Some(visuals.scale_cube),
            (TransformMode::Scale, true) => Some(visuals.scale_plane),
            _ => None,
        }
    }

    /// Move the highlight from `previous` to `current`
    pub fn highlight(
        &self,
        renderer: &mut impl HandleRenderer,
        previous: Option<Handle>,
        current: Option<Handle>,
    ) {
        if let Some(visual) = previous.and_then(|h| self.visual_for(h)) {
            renderer.set_highlighted(visual, false);
        }
        if let Some(visual) = current.and_then(|h| self.visual_for(h)) {
            renderer.set_highlighted(visual, true);
        }
    }

    /// Push placement, tool visibility and guide lines to the renderer.
    ///
    /// `editing` is the constraint of the edit in progress, if any.
    pub fn update(
        &self,
        renderer: &mut impl HandleRenderer,
        placement: &Placement,
        modes: ToolModes,
        editing: Option<TransformPlane>,
        show_axes: bool,
    ) {
        if !placement.visible {
            self.hide(renderer);
            return;
        }

        let show_move = modes.contains(ToolModes::MOVE);
        let show_rotate = modes.contains(ToolModes::ROTATE);
        let show_scale = modes.contains(ToolModes::SCALE);
        // Scale planes sit where the move planes are
        let show_scale_planes = show_scale && !show_move;

        let guide = Transform::new(placement.basis, placement.origin);
        for (i, visuals) in self.axes.iter().enumerate() {
            let forward = placement.axis(i);
            let up = placement.axis((i + 1) % 3);
            let transform = Transform::new(
                Transform::looking_at(forward, up) * placement.scale,
                placement.origin,
            );

            for (handle, visible) in [
                (visuals.move_arrow, show_move),
                (visuals.move_plane, show_move),
                (visuals.rotate_ring, show_rotate),
                (visuals.scale_cube, show_scale),
                (visuals.scale_plane, show_scale_planes),
            ] {
                renderer.set_transform(handle, &transform);
                renderer.set_visible(handle, visible);
            }

            let line_visible = show_axes && editing.is_some_and(|plane| plane.involves_axis(i));
            renderer.set_transform(visuals.axis_line, &guide);
            renderer.set_visible(visuals.axis_line, line_visible);
        }

        let frame = placement.transform().orthonormalized();
        let outline = Transform::new(frame.basis * placement.scale, frame.origin);
        renderer.set_transform(self.rotate_outline, &outline);
        renderer.set_visible(self.rotate_outline, show_rotate);
    }
}

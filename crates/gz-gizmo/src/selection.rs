//! Selection set with per-target transform snapshots

use std::collections::HashMap;

use gz_core::{TargetId, TargetScene, Transform};

use crate::handles::RenderHandle;

/// One selected target and the transforms it had when the current edit began
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedItem {
    /// The selected object
    pub target: TargetId,
    /// Local transform when the snapshot was taken
    pub original_local: Transform,
    /// Global transform when the snapshot was taken
    pub original_global: Transform,
    /// Render instance of the selection box, if one was created
    pub selection_box: Option<RenderHandle>,
}

impl SelectedItem {
    /// Snapshot `target`'s current transforms. Unknown targets snapshot as identity.
    pub fn capture(
        scene: &impl TargetScene,
        target: TargetId,
        selection_box: Option<RenderHandle>,
    ) -> Self {
        Self {
            target,
            original_local: scene.local_transform(target).unwrap_or_default(),
            original_global: scene.global_transform(target).unwrap_or_default(),
            selection_box,
        }
    }

    /// Refresh both snapshots from the scene
    pub fn refresh(&mut self, scene: &impl TargetScene) {
        if let Some(local) = scene.local_transform(self.target) {
            self.original_local = local;
        }
        if let Some(global) = scene.global_transform(self.target) {
            self.original_global = global;
        }
    }
}

/// Unordered set of selected targets.
///
/// Items live in a dense vector for iteration; the map stores each target's
/// slot so insert, lookup and removal stay O(1).
#[derive(Debug, Clone, Default)]
pub struct Selection {
    slots: HashMap<TargetId, usize>,
    items: Vec<SelectedItem>,
}

impl Selection {
    /// Empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite an item. Returns the replaced item, if any.
    pub fn insert(&mut self, item: SelectedItem) -> Option<SelectedItem> {
        match self.slots.get(&item.target) {
            Some(&slot) => Some(std::mem::replace(&mut self.items[slot], item)),
            None => {
                self.slots.insert(item.target, self.items.len());
                self.items.push(item);
                None
            }
        }
    }

    /// Remove a target. Returns the removed item, if it was selected.
    pub fn remove(&mut self, target: TargetId) -> Option<SelectedItem> {
        let slot = self.slots.remove(&target)?;
        let item = self.items.swap_remove(slot);
        if let Some(moved) = self.items.get(slot) {
            self.slots.insert(moved.target, slot);
        }
        Some(item)
    }

    /// Whether `target` is selected
    pub fn contains(&self, target: TargetId) -> bool {
        self.slots.contains_key(&target)
    }

    /// Entry for `target`
    pub fn get(&self, target: TargetId) -> Option<&SelectedItem> {
        self.slots.get(&target).map(|&slot| &self.items[slot])
    }

    /// Mutable entry for `target`
    pub fn get_mut(&mut self, target: TargetId) -> Option<&mut SelectedItem> {
        self.slots.get(&target).map(|&slot| &mut self.items[slot])
    }

    /// Number of selected targets
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Entries in insertion order, until a removal reorders them
    pub fn iter(&self) -> impl Iterator<Item = &SelectedItem> {
        self.items.iter()
    }

    /// Selected target ids
    pub fn targets(&self) -> impl Iterator<Item = TargetId> + '_ {
        self.items.iter().map(|item| item.target)
    }

    /// Remove every item, returning them
    pub fn drain(&mut self) -> Vec<SelectedItem> {
        self.slots.clear();
        std::mem::take(&mut self.items)
    }

    /// Re-capture every item's original transforms
    pub fn snapshot(&mut self, scene: &impl TargetScene) {
        for item in &mut self.items {
            item.refresh(scene);
        }
    }
}

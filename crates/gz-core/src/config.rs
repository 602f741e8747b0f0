//! Gizmo configuration
//!
//! Settings can be serialized to and loaded from RON files. Every section
//! falls back to its defaults when missing.

use std::path::Path;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::GizmoError;

bitflags! {
    /// Which manipulation tools are enabled.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct ToolModes: u8 {
        const MOVE = 1 << 0;
        const ROTATE = 1 << 1;
        const SCALE = 1 << 2;
    }
}

impl Default for ToolModes {
    fn default() -> Self {
        Self::all()
    }
}

/// Pointer button that grabs handles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointerButton {
    #[default]
    Left,
    Right,
    Middle,
}

/// Per-axis handle colors (RGB)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AxisColors {
    pub x: [f32; 3],
    pub y: [f32; 3],
    pub z: [f32; 3],
}

impl Default for AxisColors {
    fn default() -> Self {
        Self {
            x: [0.96, 0.20, 0.32],
            y: [0.53, 0.84, 0.01],
            z: [0.16, 0.55, 0.96],
        }
    }
}

impl AxisColors {
    /// Color of axis `index` (0 = X, 1 = Y, 2 = Z) with the given alpha
    pub fn rgba(&self, index: usize, alpha: f32) -> [f32; 4] {
        let [r, g, b] = match index {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        };
        [r, g, b, alpha]
    }
}

/// Snapping increments
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapConfig {
    /// Translation increment in world units
    pub translate: f32,
    /// Rotation increment in degrees
    pub rotate: f32,
    /// Scale increment (dimensionless)
    pub scale: f32,
    /// Divisor applied to `translate` while fine snapping
    pub translate_fine_divisor: f32,
    /// Divisor applied to `rotate` while fine snapping
    pub rotate_fine_divisor: f32,
    /// Divisor applied to `scale` while fine snapping
    pub scale_fine_divisor: f32,
}

impl Default for SnapConfig {
    fn default() -> Self {
        Self {
            translate: 1.0,
            rotate: 15.0,
            scale: 0.25,
            translate_fine_divisor: 10.0,
            rotate_fine_divisor: 3.0,
            scale_fine_divisor: 2.0,
        }
    }
}

impl SnapConfig {
    pub fn translate_step(&self, fine: bool) -> f32 {
        Self::step(self.translate, self.translate_fine_divisor, fine)
    }

    pub fn rotate_step(&self, fine: bool) -> f32 {
        Self::step(self.rotate, self.rotate_fine_divisor, fine)
    }

    pub fn scale_step(&self, fine: bool) -> f32 {
        Self::step(self.scale, self.scale_fine_divisor, fine)
    }

    fn step(base: f32, divisor: f32, fine: bool) -> f32 {
        if fine && divisor != 0.0 {
            base / divisor
        } else {
            base
        }
    }
}

/// Complete gizmo configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GizmoConfig {
    /// Enabled tools
    pub modes: ToolModes,
    /// Target on-screen handle size in pixels
    pub size: f32,
    /// Handle opacity
    pub opacity: f32,
    /// Show axis guide lines while editing
    pub show_axes: bool,
    /// Handle colors
    pub colors: AxisColors,
    /// Selection box color (RGB)
    pub selection_box_color: [f32; 3],
    /// Display and apply motion in the selected object's own frame
    pub use_local_space: bool,
    /// Button that grabs handles
    pub edit_button: PointerButton,
    /// Snapping increments
    pub snap: SnapConfig,
}

impl Default for GizmoConfig {
    fn default() -> Self {
        Self {
            modes: ToolModes::all(),
            size: 80.0,
            opacity: 0.9,
            show_axes: true,
            colors: AxisColors::default(),
            selection_box_color: [1.0, 0.5, 0.0],
            use_local_space: false,
            edit_button: PointerButton::Left,
            snap: SnapConfig::default(),
        }
    }
}

impl GizmoConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from RON text
    pub fn from_ron_str(content: &str) -> Result<Self, GizmoError> {
        ron::from_str(content).map_err(|e| GizmoError::Config(e.to_string()))
    }

    /// Serialize the configuration to pretty RON text
    pub fn to_ron_string(&self) -> Result<String, GizmoError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| GizmoError::Config(e.to_string()))
    }

    /// Load configuration from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GizmoError> {
        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|e| GizmoError::Io(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), GizmoError> {
        let content = self.to_ron_string()?;
        std::fs::write(path.as_ref(), content).map_err(|e| GizmoError::Io(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GizmoConfig::default();
        assert_eq!(config.modes, ToolModes::MOVE | ToolModes::ROTATE | ToolModes::SCALE);
        assert_eq!(config.size, 80.0);
        assert!(!config.use_local_space);
    }

    #[test]
    fn test_fine_snap_steps() {
        let snap = SnapConfig::default();
        assert_eq!(snap.translate_step(false), 1.0);
        assert!((snap.translate_step(true) - 0.1).abs() < 1e-6);
        assert_eq!(snap.rotate_step(true), 5.0);
        assert_eq!(snap.scale_step(true), 0.125);
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config = GizmoConfig::from_ron_str("(size: 120.0, use_local_space: true)").unwrap();
        assert_eq!(config.size, 120.0);
        assert!(config.use_local_space);
        assert_eq!(config.snap, SnapConfig::default());
    }

    #[test]
    fn test_invalid_ron_is_config_error() {
        let err = GizmoConfig::from_ron_str("(size: \"big\")").unwrap_err();
        assert!(matches!(err, GizmoError::Config(_)));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gizmo.ron");

        let mut config = GizmoConfig::default();
        config.modes = ToolModes::MOVE | ToolModes::SCALE;
        config.snap.rotate = 45.0;
        config.save(&path).unwrap();

        let loaded = GizmoConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = GizmoConfig::load("/nonexistent/gizmo.ron").unwrap_err();
        assert!(matches!(err, GizmoError::Io(_)));
    }
}

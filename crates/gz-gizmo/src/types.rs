//! Handle identification shared by picking, editing and rendering

use std::fmt;

/// What kind of transform an edit performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransformMode {
    /// No edit in progress
    #[default]
    None,
    /// Move
    Translate,
    /// Rotate
    Rotate,
    /// Scale
    Scale,
}

impl fmt::Display for TransformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TransformMode::None => "None",
            TransformMode::Translate => "Translate",
            TransformMode::Rotate => "Rotate",
            TransformMode::Scale => "Scale",
        };
        f.write_str(name)
    }
}

/// Which axis, coordinate plane, or view plane an edit is constrained to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TransformPlane {
    /// Plane facing the camera
    #[default]
    View,
    /// Single X axis
    X,
    /// Single Y axis
    Y,
    /// Single Z axis
    Z,
    /// Plane spanned by Y and Z (normal X)
    YZ,
    /// Plane spanned by X and Z (normal Y)
    XZ,
    /// Plane spanned by X and Y (normal Z)
    XY,
}

impl TransformPlane {
    /// Single-axis plane for axis `index` (0 = X, 1 = Y, 2 = Z)
    pub fn axis(index: usize) -> Self {
        match index {
            0 => TransformPlane::X,
            1 => TransformPlane::Y,
            _ => TransformPlane::Z,
        }
    }

    /// Coordinate plane whose normal is axis `index`
    pub fn plane(normal_index: usize) -> Self {
        match normal_index {
            0 => TransformPlane::YZ,
            1 => TransformPlane::XZ,
            _ => TransformPlane::XY,
        }
    }

    /// Axis index for single-axis variants
    pub fn axis_index(&self) -> Option<usize> {
        match self {
            TransformPlane::X => Some(0),
            TransformPlane::Y => Some(1),
            TransformPlane::Z => Some(2),
            _ => None,
        }
    }

    /// Normal axis index for coordinate-plane variants
    pub fn normal_index(&self) -> Option<usize> {
        match self {
            TransformPlane::YZ => Some(0),
            TransformPlane::XZ => Some(1),
            TransformPlane::XY => Some(2),
            _ => None,
        }
    }

    /// Whether motion along axis `index` is part of this constraint
    pub fn involves_axis(&self, index: usize) -> bool {
        match self {
            TransformPlane::View => false,
            TransformPlane::X | TransformPlane::Y | TransformPlane::Z => {
                self.axis_index() == Some(index)
            }
            _ => self.normal_index().is_some_and(|normal| normal != index),
        }
    }
}

/// A pickable handle: the tool it belongs to and the constraint it applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    /// Tool
    pub mode: TransformMode,
    /// Constraint
    pub plane: TransformPlane,
}

impl Handle {
    /// Create a handle
    pub fn new(mode: TransformMode, plane: TransformPlane) -> Self {
        Self { mode, plane }
    }
}

//! Error types

/// Gizmo-related errors
///
/// Geometric misses (a ray that does not hit a plane or sphere) are not
/// errors; they are reported as `None` by the math helpers.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GizmoError {
    /// Transform composition was asked to apply `TransformMode::None`
    #[error("Invalid transform mode: composition requires translate, rotate or scale")]
    InvalidMode,
    /// The composed basis collapsed to zero volume
    #[error("Degenerate basis: determinant is zero")]
    DegenerateBasis,
    #[error("IO error: {0}")]
    Io(String),
    #[error("Config error: {0}")]
    Config(String),
}

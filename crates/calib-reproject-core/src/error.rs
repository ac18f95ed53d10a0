use crate::CoordinateFrame;

/// Errors returned by the projection model and its parameter types.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ProjectionError {
    #[error("invalid camera parameters: {reason}")]
    InvalidParameter { reason: String },
    #[error("unsupported frame mapping {from} -> {to}")]
    UnsupportedFrame {
        from: CoordinateFrame,
        to: CoordinateFrame,
    },
    #[error("point {index} cannot be projected (camera-frame depth {depth})")]
    DegenerateProjection { index: usize, depth: f64 },
    #[error("point sequences differ in length (expected {expected}, got {got})")]
    LengthMismatch { expected: usize, got: usize },
}

impl ProjectionError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            reason: reason.into(),
        }
    }
}

use thiserror::Error;

use crate::component::Dir;

/// Unified result type for the gantry-hud crate.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors surfaced while laying out and flushing a frame.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Fixed-size children claim more of the primary axis than the region holds.
    #[error("cannot render in {available} {axis}; need at least {required}")]
    Unsatisfiable {
        axis: Dir,
        available: usize,
        required: usize,
    },
    #[error("cannot open a growing region inside a fixed region")]
    GrowingRegion,
    #[error("cannot distribute space along an unbounded axis")]
    UnboundedAxis,
    #[error("a growing box needs an inner component")]
    UnboundedBox,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

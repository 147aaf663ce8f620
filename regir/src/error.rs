use glam::{UVec3, Vec3};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Misconfiguration reported when setting up a grid.
///
/// Per-frame work never fails: degenerate lights and numeric problems are
/// turned into zero-weight candidates instead.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum Error {
    #[error("grid dimension must be non-zero on each axis, got {0}")]
    ZeroDimension(UVec3),

    #[error("scene bounds must have a positive extent, got {min} ..= {max}")]
    DegenerateBounds { min: Vec3, max: Vec3 },

    #[error("grid of {0} cells doesn't fit in memory")]
    TooManySlots(UVec3),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

//! Common structs, algorithms etc. used by ReGIR's kernels and by the
//! host-side reservoir grid.

#![allow(clippy::len_without_is_empty)]
#![allow(clippy::manual_range_contains)]

mod grid;
mod light;
mod lights;
mod noise;
mod passes;
mod reservoir;
mod utils;

pub use self::grid::*;
pub use self::light::*;
pub use self::lights::*;
pub use self::noise::*;
pub use self::passes::*;
pub use self::reservoir::*;
pub use self::utils::*;

pub mod prelude {
    pub use core::f32::consts::PI;

    pub use glam::*;

    pub use crate::*;
}

/// Number of reservoirs ("light slots") owned by each cell of the grid.
pub const LIGHT_SLOTS_PER_CELL: usize = 32;

/// Smallest squared distance used when evaluating `1 / distance²` terms, so
/// that a reference point sitting on top of an emitter stays finite.
pub const REGIR_EPSILON: f32 = 0.0001;

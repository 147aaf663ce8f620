use glam::Vec3;

use crate::{CellCoord, GridInfo, WhiteNoise};

/// Parameters shared by all slots built during a single frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildPassParams {
    pub grid: GridInfo,

    /// Number of light candidates streamed into each slot.
    pub num_candidates: u32,

    /// Maximum stream length a previous-frame reservoir may carry into the
    /// temporal merge.
    pub max_prev_m: u32,

    /// Whether each slot picks its reference point uniformly within its cell
    /// (instead of using the cell's center).
    pub enable_cell_randomization: bool,

    pub env_light_probability: f32,

    /// Whether the previous frame got reset (e.g. after a resize); disables
    /// the temporal merge.
    pub new_sequence: bool,
}

impl BuildPassParams {
    /// Returns the reference point a slot of given cell builds its reservoir
    /// for.
    pub fn reference_point(
        &self,
        cell: CellCoord,
        wnoise: &mut WhiteNoise,
    ) -> Vec3 {
        if self.enable_cell_randomization {
            self.grid.cell_point(cell, wnoise.sample_cube())
        } else {
            self.grid.cell_center(cell)
        }
    }
}

/// Parameters of the shading-time resampling pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadingPassParams {
    pub grid: GridInfo,

    /// Number of slots drawn from the shading point's cell.
    pub num_candidates: u32,

    /// Whether visibility is tested for every drawn slot (`true`) or only for
    /// the finally selected one (`false`).
    pub enable_candidate_visibility: bool,
}

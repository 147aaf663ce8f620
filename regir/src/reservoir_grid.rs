use std::ops::Range;

use derivative::Derivative;
use glam::{UVec3, Vec3};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use regir_common::{
    BuildPassParams, CellCoord, CellReservoir, CellReservoirData, GridInfo,
    LightSample, ReservoirInfo, ShadingPassParams, WhiteNoise,
    LIGHT_SLOTS_PER_CELL,
};
use regir_kernels::{
    build_cell_reservoirs, build_cell_reservoirs_and_temporal_reuse,
    resample_cell,
};

use crate::{
    utils, AccessTracker, BoundingBox, CellBuffers, DoubleBuffered, Error,
    LightCatalog, ReGirConfig, RebuildPolicy, Result,
};

/// World-space grid of cells, each holding [`LIGHT_SLOTS_PER_CELL`]
/// reservoirs that approximate the light field as seen from that cell.
///
/// Each frame goes through:
///
/// - [`Self::rebuild_reservoirs()`], exactly once,
/// - [`Self::resample()`] (and optionally [`Self::report_cell_access()`]),
///   any number of times and from any number of threads.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct ReservoirGrid {
    bounds: BoundingBox,
    grid: GridInfo,

    #[derivative(Debug = "ignore")]
    buffers: DoubleBuffered<CellBuffers>,

    #[derivative(Debug = "ignore")]
    noises: Vec<WhiteNoise>,

    #[derivative(Debug = "ignore")]
    tracker: AccessTracker,

    num_active_cells: usize,
    last_frame: Option<u32>,
}

impl ReservoirGrid {
    pub const DEFAULT_SEED: u64 = 591842031321323413;

    /// Lays out a grid of `dimension` cells over `bounds`.
    pub fn new(bounds: BoundingBox, dimension: UVec3) -> Result<Self> {
        Self::with_seed(bounds, dimension, Self::DEFAULT_SEED)
    }

    /// Same as [`Self::new()`], but with a custom seed for the slots' random
    /// number generators.
    pub fn with_seed(
        bounds: BoundingBox,
        dimension: UVec3,
        seed: u64,
    ) -> Result<Self> {
        if dimension.cmpeq(UVec3::ZERO).any() {
            return Err(Error::ZeroDimension(dimension));
        }

        if !bounds.is_solid() {
            return Err(Error::DegenerateBounds {
                min: bounds.min(),
                max: bounds.max(),
            });
        }

        let num_slots = (dimension.x as u64)
            .checked_mul(dimension.y as u64)
            .and_then(|n| n.checked_mul(dimension.z as u64))
            .and_then(|n| n.checked_mul(LIGHT_SLOTS_PER_CELL as u64))
            .filter(|&n| n <= u32::MAX as u64)
            .ok_or(Error::TooManySlots(dimension))?;

        let grid = GridInfo {
            origin: bounds.min(),
            cell_size: bounds.extent() / dimension.as_vec3(),
            dimension,
        };

        info!(
            "Creating reservoir grid; dimension = {}, cell-size = {}, \
             slots = {}",
            dimension,
            grid.cell_size,
            num_slots,
        );

        let num_slots = num_slots as usize;
        let mut rng = StdRng::seed_from_u64(seed);

        let noises = (0..num_slots)
            .map(|_| WhiteNoise::from_state(rng.gen()))
            .collect();

        Ok(Self {
            bounds,
            grid,
            buffers: DoubleBuffered::new(
                CellBuffers::new(num_slots),
                CellBuffers::new(num_slots),
            ),
            noises,
            tracker: AccessTracker::new(grid.num_cells()),
            num_active_cells: 0,
            last_frame: None,
        })
    }

    /// Rebuilds reservoirs of the buffer belonging to `frame`, possibly
    /// reusing the reservoirs built during the previous frame.
    ///
    /// `new_sequence` marks the previous frame's buffer as invalid (e.g.
    /// after the scene got changed abruptly), disabling the reuse; it's
    /// implied when the last rebuild wasn't for `frame - 1`.
    ///
    /// `config` is expected to have passed [`ReGirConfig::validate()`];
    /// out-of-range values get clamped in release builds.
    pub fn rebuild_reservoirs(
        &mut self,
        lights: &LightCatalog,
        frame: u32,
        new_sequence: bool,
        config: &ReGirConfig,
    ) {
        debug_assert!(
            config.validate().is_ok(),
            "config should've been checked with `ReGirConfig::validate()`",
        );

        // Reusing anything but the directly preceding frame would merge with
        // a stale buffer
        let new_sequence =
            new_sequence || self.last_frame != Some(frame.wrapping_sub(1));

        if new_sequence {
            debug!("Starting new sequence; frame = {}", frame);
        }

        let params = BuildPassParams {
            grid: self.grid,
            num_candidates: config.candidates_per_light_slot(),
            max_prev_m: config.max_prev_m(),
            enable_cell_randomization: config.enable_cell_randomization,
            env_light_probability: config.env_light_probability,
            new_sequence,
        };

        self.tracker.reset_accesses();

        let lights = lights.view();
        let tracker = &self.tracker;
        let noises = &mut self.noises;
        let (curr, prev) = self.buffers.curr_and_past_mut(frame);

        let num_active_cells = utils::measure("rebuild_reservoirs", || {
            curr.reservoirs
                .par_chunks_mut(LIGHT_SLOTS_PER_CELL)
                .zip(curr.infos.par_chunks_mut(LIGHT_SLOTS_PER_CELL))
                .zip(noises.par_chunks_mut(LIGHT_SLOTS_PER_CELL))
                .enumerate()
                .map(|(cell_idx, ((reservoirs, infos), noises))| {
                    let first_slot = cell_idx * LIGHT_SLOTS_PER_CELL;
                    let slots = first_slot..first_slot + LIGHT_SLOTS_PER_CELL;

                    let is_active = match config.rebuild_policy {
                        RebuildPolicy::All => true,

                        RebuildPolicy::RecentlyAccessed {
                            max_inactive_frames,
                        } => tracker.is_active(
                            cell_idx,
                            frame,
                            max_inactive_frames,
                        ),
                    };

                    if !is_active {
                        carry_over(
                            reservoirs,
                            infos,
                            prev,
                            slots,
                            new_sequence,
                        );

                        return 0;
                    }

                    for (slot, wnoise) in noises.iter_mut().enumerate() {
                        let slot_idx = first_slot + slot;

                        let res = if config.enable_temporal_reuse {
                            build_cell_reservoirs_and_temporal_reuse::main(
                                &params,
                                lights,
                                slot_idx,
                                wnoise,
                                &prev.reservoirs,
                                &prev.infos,
                            )
                        } else {
                            build_cell_reservoirs::main(
                                &params, lights, slot_idx, wnoise,
                            )
                        };

                        res.write(reservoirs, infos, slot);
                    }

                    1
                })
                .sum::<usize>()
        });

        debug!(
            "Reservoirs rebuilt; frame = {}, active-cells = {} / {}",
            frame,
            num_active_cells,
            self.grid.num_cells(),
        );

        self.num_active_cells = num_active_cells;
        self.last_frame = Some(frame);
    }

    /// Picks a light sample for shading point `point`, out of reservoirs
    /// built during `frame`.
    ///
    /// See: [`resample_cell::main()`].
    pub fn resample(
        &self,
        frame: u32,
        point: Vec3,
        wnoise: &mut WhiteNoise,
        config: &ReGirConfig,
        target_fn: impl FnMut(&LightSample) -> f32,
        visibility_fn: impl FnMut(&LightSample) -> bool,
    ) -> (LightSample, f32) {
        let params = ShadingPassParams {
            grid: self.grid,
            num_candidates: config.candidates_per_cell(),
            enable_candidate_visibility: config.enable_candidate_visibility,
        };

        let buffer = self.buffer(frame);

        resample_cell::main(
            &params,
            &buffer.reservoirs,
            &buffer.infos,
            point,
            wnoise,
            target_fn,
            visibility_fn,
        )
    }

    /// Notes that shading consulted given cell during `frame`.
    pub fn report_cell_access(&self, cell_idx: usize, frame: u32) {
        self.tracker.report(cell_idx, frame);
    }

    /// Clears all reservoirs and access statistics, as if the grid had just
    /// been created.
    pub fn reset(&mut self) {
        let num_slots = self.grid.num_slots();

        info!("Resetting reservoir grid");

        self.buffers = DoubleBuffered::new(
            CellBuffers::new(num_slots),
            CellBuffers::new(num_slots),
        );

        self.tracker = AccessTracker::new(self.grid.num_cells());
        self.num_active_cells = 0;
        self.last_frame = None;
    }

    /// Returns the cell containing `point` (clamped to the grid) and its
    /// linear index.
    pub fn cell_of(&self, point: Vec3) -> (CellCoord, usize) {
        let cell = self.grid.cell_of(point);

        (cell, self.grid.cell_to_idx(cell))
    }

    /// Returns the number of cells rebuilt during the last rebuild.
    pub fn num_active_cells(&self) -> usize {
        self.num_active_cells
    }

    /// Returns the number of accesses reported for given cell since the last
    /// rebuild.
    pub fn cell_accesses(&self, cell_idx: usize) -> u32 {
        self.tracker.num_accesses(cell_idx)
    }

    pub fn last_access_frame(&self, cell_idx: usize) -> Option<u32> {
        self.tracker.last_access_frame(cell_idx)
    }

    /// Returns the frame of the last rebuild, if any.
    pub fn last_frame(&self) -> Option<u32> {
        self.last_frame
    }

    pub fn reservoir(&self, frame: u32, slot_idx: usize) -> CellReservoir {
        self.buffer(frame).reservoir(slot_idx)
    }

    pub fn info(&self, frame: u32, slot_idx: usize) -> ReservoirInfo {
        self.buffer(frame).info(slot_idx)
    }

    /// Returns a hash of the buffer belonging to `frame`.
    pub fn checksum(&self, frame: u32) -> u64 {
        self.buffer(frame).checksum()
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn grid(&self) -> GridInfo {
        self.grid
    }

    fn buffer(&self, frame: u32) -> &CellBuffers {
        self.buffers
            .get(DoubleBuffered::<CellBuffers>::is_alternate(frame))
    }
}

/// Fills reservoirs of a cell that isn't rebuilt this frame with its content
/// from the previous frame, or with empty reservoirs if that content is stale.
fn carry_over(
    reservoirs: &mut [CellReservoirData],
    infos: &mut [ReservoirInfo],
    prev: &CellBuffers,
    slots: Range<usize>,
    new_sequence: bool,
) {
    if new_sequence {
        reservoirs.fill(Default::default());
        infos.fill(Default::default());
    } else {
        reservoirs.copy_from_slice(&prev.reservoirs[slots.clone()]);
        infos.copy_from_slice(&prev.infos[slots]);
    }
}

//! ReGIR: reservoir-based grid importance resampling of many lights.
//!
//! The scene's bounding box is split into a grid of cells; each frame, every
//! cell resamples the scene's light catalog into a small set of reservoirs
//! (optionally reusing last frame's reservoirs) and shading points then pick
//! their light samples out of their cell's reservoirs.
//!
//! ```no_run
//! use regir::glam::{uvec3, vec3, Vec3};
//! use regir::{BoundingBox, Light, LightCatalog, ReGirConfig, ReservoirGrid};
//! use regir::WhiteNoise;
//!
//! let lights: LightCatalog =
//!     [Light::point(vec3(1.0, 2.0, 1.0), Vec3::splat(10.0))]
//!         .into_iter()
//!         .collect();
//!
//! let bounds = BoundingBox::new(Vec3::ZERO, vec3(4.0, 4.0, 4.0));
//! let config = ReGirConfig::default();
//!
//! config.validate().unwrap();
//!
//! let mut grid = ReservoirGrid::new(bounds, uvec3(8, 8, 8)).unwrap();
//! let mut wnoise = WhiteNoise::from_state(1234);
//!
//! for frame in 0..10 {
//!     grid.rebuild_reservoirs(&lights, frame, frame == 0, &config);
//!
//!     let point = vec3(2.0, 0.0, 2.0);
//!
//!     let (sample, weight) = grid.resample(
//!         frame,
//!         point,
//!         &mut wnoise,
//!         &config,
//!         |sample| sample.target_density(point),
//!         |_| true,
//!     );
//!
//!     grid.report_cell_access(grid.cell_of(point).1, frame);
//! }
//! ```

mod access_tracker;
mod buffers;
mod config;
mod error;
mod light_catalog;
mod reservoir_grid;
mod utils;

pub use glam;
pub use regir_common::{
    CellCoord, CellReservoir, GridInfo, Light, LightId, LightInstance,
    LightSample, LightsView, ReservoirInfo, WhiteNoise, LIGHT_SLOTS_PER_CELL,
};

pub use self::access_tracker::*;
pub use self::buffers::*;
pub use self::config::*;
pub use self::error::*;
pub use self::light_catalog::*;
pub use self::reservoir_grid::*;
pub use self::utils::*;

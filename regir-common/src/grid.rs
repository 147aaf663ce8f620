use glam::{uvec3, UVec3, Vec3};

use crate::LIGHT_SLOTS_PER_CELL;

/// Integer coordinates of a grid cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellCoord {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl CellCoord {
    pub fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }

    pub fn as_uvec3(self) -> UVec3 {
        uvec3(self.x, self.y, self.z)
    }
}

impl From<UVec3> for CellCoord {
    fn from(value: UVec3) -> Self {
        Self::new(value.x, value.y, value.z)
    }
}

/// Geometry of the reservoir grid: a uniform partition of an axis-aligned box
/// into `dimension.x * dimension.y * dimension.z` cells.
///
/// Cells are linearized x-first, i.e. `x + nx * (y + ny * z)`; each cell owns
/// [`LIGHT_SLOTS_PER_CELL`] consecutive slots.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridInfo {
    pub origin: Vec3,
    pub cell_size: Vec3,
    pub dimension: UVec3,
}

impl GridInfo {
    pub fn num_cells(&self) -> usize {
        self.dimension.x as usize
            * self.dimension.y as usize
            * self.dimension.z as usize
    }

    pub fn num_slots(&self) -> usize {
        self.num_cells() * LIGHT_SLOTS_PER_CELL
    }

    /// Returns the cell containing given world-space position.
    ///
    /// Positions outside of the grid get clamped to the nearest border cell
    /// (the grid never wraps around); NaN coordinates map to zero.
    ///
    /// Grids with a zero dimension (which `ReservoirGrid` never builds) have
    /// no cells at all and map everything to the zeroth cell.
    pub fn cell_of(&self, point: Vec3) -> CellCoord {
        let cell = ((point - self.origin) / self.cell_size).floor();

        fn clamp(value: f32, len: u32) -> u32 {
            // `as` saturates and maps NaN to zero
            (value as i64).min(len as i64 - 1).max(0) as u32
        }

        CellCoord::new(
            clamp(cell.x, self.dimension.x),
            clamp(cell.y, self.dimension.y),
            clamp(cell.z, self.dimension.z),
        )
    }

    /// Returns the linear index of given cell.
    pub fn cell_to_idx(&self, cell: CellCoord) -> usize {
        debug_assert!(self.contains(cell));

        let nx = self.dimension.x as usize;
        let ny = self.dimension.y as usize;

        cell.x as usize + nx * (cell.y as usize + ny * cell.z as usize)
    }

    /// Returns the cell with given linear index.
    pub fn idx_to_cell(&self, idx: usize) -> CellCoord {
        debug_assert!(idx < self.num_cells());

        let nx = self.dimension.x as usize;
        let ny = self.dimension.y as usize;

        CellCoord::new(
            (idx % nx) as u32,
            ((idx / nx) % ny) as u32,
            (idx / (nx * ny)) as u32,
        )
    }

    /// Returns the linear index of slot `slot` of cell `cell_idx`.
    pub fn slot_idx(&self, cell_idx: usize, slot: usize) -> usize {
        debug_assert!(slot < LIGHT_SLOTS_PER_CELL);

        cell_idx * LIGHT_SLOTS_PER_CELL + slot
    }

    pub fn contains(&self, cell: CellCoord) -> bool {
        cell.as_uvec3().cmplt(self.dimension).all()
    }

    /// Returns the minimum corner of given cell.
    pub fn cell_min(&self, cell: CellCoord) -> Vec3 {
        self.origin + cell.as_uvec3().as_vec3() * self.cell_size
    }

    /// Returns a point inside given cell, where `uvw` (`0.0 ..= 1.0` on each
    /// axis) is the point's relative position within the cell.
    pub fn cell_point(&self, cell: CellCoord, uvw: Vec3) -> Vec3 {
        self.cell_min(cell) + uvw * self.cell_size
    }

    pub fn cell_center(&self, cell: CellCoord) -> Vec3 {
        self.cell_point(cell, Vec3::splat(0.5))
    }
}

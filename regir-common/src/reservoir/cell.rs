use core::ops::{Deref, DerefMut};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::{LightSample, Reservoir};

/// Reservoir stored in one of the grid's light slots.
///
/// See: [`Reservoir`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CellReservoir {
    pub reservoir: Reservoir<LightSample>,

    /// Target pdf of `sample`, evaluated at the reference point the sample
    /// got selected for.
    pub target_density: f32,
}

/// Packed form of [`CellReservoir`]'s reservoir, as kept in the grid buffers.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct CellReservoirData {
    pub emittance: Vec3,
    pub w_sum: f32,
    pub position: Vec3,
    pub m: u32,
    pub normal: Vec3,
    pub flags: u32,
}

/// Auxiliary data paired with each packed reservoir.
///
/// Zeroed iff the paired reservoir has no weight (it's empty or has seen only
/// zero-weight candidates).
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ReservoirInfo {
    /// Unbiased contribution weight of the reservoir's sample, i.e. an
    /// estimate of `1 / pdf(sample)`.
    pub rec_pdf_estimate: f32,

    /// Target pdf of the reservoir's sample at the time it got selected.
    pub target_density: f32,
}

impl CellReservoirData {
    const FLAG_AT_INFINITY: u32 = 1;
}

impl CellReservoir {
    pub fn read(
        reservoirs: &[CellReservoirData],
        infos: &[ReservoirInfo],
        id: usize,
    ) -> Self {
        let data = reservoirs[id];
        let info = infos[id];

        Self {
            reservoir: Reservoir {
                sample: LightSample {
                    emittance: data.emittance,
                    position: data.position,
                    normal: data.normal,
                    at_infinity: (data.flags
                        & CellReservoirData::FLAG_AT_INFINITY)
                        != 0,
                },
                w_sum: data.w_sum,
                m: data.m,
            },
            target_density: info.target_density,
        }
    }

    pub fn write(
        &self,
        reservoirs: &mut [CellReservoirData],
        infos: &mut [ReservoirInfo],
        id: usize,
    ) {
        let rec_pdf_estimate = self.contribution_weight();

        // Reservoirs that have seen only zero-weight candidates keep just
        // their stream length
        if rec_pdf_estimate == 0.0 {
            reservoirs[id] = CellReservoirData {
                m: self.m,
                ..Default::default()
            };

            infos[id] = ReservoirInfo::default();

            return;
        }

        reservoirs[id] = CellReservoirData {
            emittance: self.sample.emittance,
            w_sum: self.w_sum,
            position: self.sample.position,
            m: self.m,
            normal: self.sample.normal,
            flags: if self.sample.at_infinity {
                CellReservoirData::FLAG_AT_INFINITY
            } else {
                0
            },
        };

        infos[id] = ReservoirInfo {
            rec_pdf_estimate,
            target_density: self.target_density,
        };
    }

    /// Returns the unbiased contribution weight of this reservoir's sample.
    pub fn contribution_weight(&self) -> f32 {
        self.reservoir.contribution_weight(self.target_density)
    }
}

impl Deref for CellReservoir {
    type Target = Reservoir<LightSample>;

    fn deref(&self) -> &Self::Target {
        &self.reservoir
    }
}

impl DerefMut for CellReservoir {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.reservoir
    }
}

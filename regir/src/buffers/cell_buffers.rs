use std::hash::Hasher;

use fxhash::FxHasher64;
use regir_common::{CellReservoir, CellReservoirData, ReservoirInfo};

/// One complete set of per-slot reservoirs, as written during a single frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CellBuffers {
    pub reservoirs: Vec<CellReservoirData>,
    pub infos: Vec<ReservoirInfo>,
}

impl CellBuffers {
    /// Creates buffers for `len` slots, each holding an empty reservoir.
    pub fn new(len: usize) -> Self {
        Self {
            reservoirs: vec![Default::default(); len],
            infos: vec![Default::default(); len],
        }
    }

    pub fn len(&self) -> usize {
        self.reservoirs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reservoirs.is_empty()
    }

    pub fn reservoir(&self, slot_idx: usize) -> CellReservoir {
        CellReservoir::read(&self.reservoirs, &self.infos, slot_idx)
    }

    pub fn info(&self, slot_idx: usize) -> ReservoirInfo {
        self.infos[slot_idx]
    }

    /// Returns a hash of the raw content of these buffers.
    pub fn checksum(&self) -> u64 {
        let mut hasher = FxHasher64::default();

        hasher.write(bytemuck::cast_slice(&self.reservoirs));
        hasher.write(bytemuck::cast_slice(&self.infos));
        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use regir_common::{LightSample, Reservoir};

    use super::*;

    #[test]
    fn checksum() {
        let mut target = CellBuffers::new(4);
        let empty = target.checksum();

        assert_eq!(empty, CellBuffers::new(4).checksum());
        assert!(target.reservoir(3).is_empty());

        let res = CellReservoir {
            reservoir: Reservoir {
                sample: LightSample {
                    emittance: Vec3::ONE,
                    ..Default::default()
                },
                w_sum: 1.0,
                m: 1,
            },
            target_density: 1.0,
        };

        res.write(&mut target.reservoirs, &mut target.infos, 3);

        assert_ne!(empty, target.checksum());
        assert_eq!(res, target.reservoir(3));
        assert_eq!(1.0, target.info(3).rec_pdf_estimate);
    }
}

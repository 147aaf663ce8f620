use std::sync::atomic::{AtomicU32, Ordering};

use regir_kernels::update_last_access;

/// Per-cell bookkeeping of which cells shading actually consults.
///
/// Reporting only requires a shared reference, so it can happen from many
/// threads at once while shading points are being resolved.
#[derive(Debug, Default)]
pub struct AccessTracker {
    num_accesses: Vec<AtomicU32>,
    last_access_frames: Vec<AtomicU32>,
}

impl AccessTracker {
    const NEVER: u32 = u32::MAX;

    pub fn new(num_cells: usize) -> Self {
        Self {
            num_accesses: (0..num_cells).map(|_| AtomicU32::new(0)).collect(),
            last_access_frames: (0..num_cells)
                .map(|_| AtomicU32::new(Self::NEVER))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.num_accesses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.num_accesses.is_empty()
    }

    pub fn report(&self, cell_idx: usize, frame: u32) {
        update_last_access::main(
            &self.num_accesses,
            &self.last_access_frames,
            cell_idx,
            frame,
        );
    }

    /// Returns how many times given cell has been reported since the last
    /// call to [`Self::reset_accesses()`].
    pub fn num_accesses(&self, cell_idx: usize) -> u32 {
        self.num_accesses[cell_idx].load(Ordering::Relaxed)
    }

    /// Returns the most recent frame during which given cell got reported, if
    /// ever.
    pub fn last_access_frame(&self, cell_idx: usize) -> Option<u32> {
        let frame = self.last_access_frames[cell_idx].load(Ordering::Relaxed);

        (frame != Self::NEVER).then_some(frame)
    }

    /// Returns whether given cell has been reported during the last
    /// `max_inactive_frames` frames before `frame`.
    pub fn is_active(
        &self,
        cell_idx: usize,
        frame: u32,
        max_inactive_frames: u32,
    ) -> bool {
        let Some(last) = self.last_access_frame(cell_idx) else {
            return false;
        };

        frame.saturating_sub(last) <= max_inactive_frames
    }

    pub fn reset_accesses(&mut self) {
        for num_accesses in &mut self.num_accesses {
            *num_accesses.get_mut() = 0;
        }
    }
}

use core::sync::atomic::{AtomicU32, Ordering};

/// Marks cell `cell_idx` as consulted during `frame`.
///
/// Concurrent reports for the same cell are fine: the counter only grows and
/// the last-access frame only moves forward.
pub fn main(
    num_accesses: &[AtomicU32],
    last_access_frames: &[AtomicU32],
    cell_idx: usize,
    frame: u32,
) {
    num_accesses[cell_idx].fetch_add(1, Ordering::Relaxed);

    let last_access = &last_access_frames[cell_idx];

    // `u32::MAX` stands for "never accessed", so it can't take part in
    // `fetch_max()`
    let _ = last_access.fetch_update(
        Ordering::Relaxed,
        Ordering::Relaxed,
        |prev| {
            if prev == u32::MAX || prev < frame {
                Some(frame)
            } else {
                None
            }
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atomics(value: u32) -> Vec<AtomicU32> {
        (0..4).map(|_| AtomicU32::new(value)).collect()
    }

    #[test]
    fn smoke() {
        let num_accesses = atomics(0);
        let last_access_frames = atomics(u32::MAX);

        main(&num_accesses, &last_access_frames, 2, 10);
        main(&num_accesses, &last_access_frames, 2, 12);
        main(&num_accesses, &last_access_frames, 2, 11);
        main(&num_accesses, &last_access_frames, 0, 0);

        let num_accesses: Vec<_> = num_accesses
            .iter()
            .map(|n| n.load(Ordering::Relaxed))
            .collect();

        let last_access_frames: Vec<_> = last_access_frames
            .iter()
            .map(|n| n.load(Ordering::Relaxed))
            .collect();

        assert_eq!(vec![1, 0, 3, 0], num_accesses);
        assert_eq!(vec![0, u32::MAX, 12, u32::MAX], last_access_frames);
    }
}

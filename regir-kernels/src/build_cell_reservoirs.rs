use regir_common::prelude::*;

/// Builds a fresh reservoir for light slot `slot_idx`.
pub fn main(
    params: &BuildPassParams,
    lights: LightsView,
    slot_idx: usize,
    wnoise: &mut WhiteNoise,
) -> CellReservoir {
    let cell = params.grid.idx_to_cell(slot_idx / LIGHT_SLOTS_PER_CELL);
    let point = params.reference_point(cell, wnoise);

    build(params, lights, point, wnoise)
}

/// Streams `params.num_candidates` candidates drawn from the light catalog
/// into a fresh reservoir, targeting the unshadowed contribution at `point`.
///
/// Draws with a zero source pdf are not candidates at all, so an empty catalog
/// yields an empty reservoir.
pub fn build(
    params: &BuildPassParams,
    lights: LightsView,
    point: Vec3,
    wnoise: &mut WhiteNoise,
) -> CellReservoir {
    let mut res = CellReservoir::default();

    for _ in 0..params.num_candidates {
        let Some((sample, source_pdf)) =
            lights.sample(wnoise, params.env_light_probability)
        else {
            break;
        };

        if source_pdf.or_zero() == 0.0 {
            continue;
        }

        let target_density = sample.target_density(point);

        if res.update(wnoise, sample, target_density / source_pdf) {
            res.target_density = target_density;
        }
    }

    res
}

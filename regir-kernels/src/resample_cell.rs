use regir_common::prelude::*;

/// Picks one light sample for a shading point out of its cell's slots.
///
/// `target_fn` returns the exact (shading-model dependent) target pdf of a
/// sample at `point`; `visibility_fn` tells whether a sample is unoccluded
/// from `point`. Returns the selected sample and its unbiased contribution
/// weight, which is zero when nothing got selected.
pub fn main(
    params: &ShadingPassParams,
    reservoirs: &[CellReservoirData],
    infos: &[ReservoirInfo],
    point: Vec3,
    wnoise: &mut WhiteNoise,
    mut target_fn: impl FnMut(&LightSample) -> f32,
    mut visibility_fn: impl FnMut(&LightSample) -> bool,
) -> (LightSample, f32) {
    let cell_idx = params.grid.cell_to_idx(params.grid.cell_of(point));
    let mut res = Reservoir::<LightSample>::default();
    let mut res_pdf = 0.0;

    for _ in 0..params.num_candidates {
        let slot = wnoise.sample_index(LIGHT_SLOTS_PER_CELL);
        let slot_idx = params.grid.slot_idx(cell_idx, slot);
        let slot_w = infos[slot_idx].rec_pdf_estimate;

        // Empty slots still count as (zero-weight) candidates
        if slot_w <= 0.0 {
            res.m += 1;
            continue;
        }

        let candidate = CellReservoir::read(reservoirs, infos, slot_idx);
        let mut pdf = target_fn(&candidate.sample).or_zero();

        if pdf > 0.0
            && params.enable_candidate_visibility
            && !visibility_fn(&candidate.sample)
        {
            pdf = 0.0;
        }

        if res.update(wnoise, candidate.sample, pdf * slot_w) {
            res_pdf = pdf;
        }
    }

    let res_w = res.contribution_weight(res_pdf);

    if res_w == 0.0
        || (!params.enable_candidate_visibility && !visibility_fn(&res.sample))
    {
        return (LightSample::default(), 0.0);
    }

    (res.sample, res_w)
}

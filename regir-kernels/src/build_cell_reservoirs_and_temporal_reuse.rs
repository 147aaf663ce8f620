use regir_common::prelude::*;

use crate::build_cell_reservoirs;

/// Builds a fresh reservoir for light slot `slot_idx` and merges the same
/// slot's reservoir from the previous frame into it.
pub fn main(
    params: &BuildPassParams,
    lights: LightsView,
    slot_idx: usize,
    wnoise: &mut WhiteNoise,
    prev_reservoirs: &[CellReservoirData],
    prev_infos: &[ReservoirInfo],
) -> CellReservoir {
    let cell = params.grid.idx_to_cell(slot_idx / LIGHT_SLOTS_PER_CELL);
    let point = params.reference_point(cell, wnoise);
    let mut res = build_cell_reservoirs::build(params, lights, point, wnoise);

    if params.new_sequence || (lights.len() == 0 && !lights.has_environment())
    {
        return res;
    }

    // ---

    let mut prev = CellReservoir::read(prev_reservoirs, prev_infos, slot_idx);

    if prev.is_empty() {
        return res;
    }

    let prev_w = prev.contribution_weight();

    prev.clamp_m(params.max_prev_m);

    // The previous sample competes with its stream length, re-targeted at
    // this frame's reference point
    let prev_pdf = prev.sample.target_density(point);

    if res.merge(wnoise, &prev, prev_w, prev_pdf) {
        res.target_density = prev_pdf;
    }

    res
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn params() -> BuildPassParams {
        BuildPassParams {
            grid: GridInfo {
                origin: Vec3::ZERO,
                cell_size: Vec3::ONE,
                dimension: uvec3(2, 2, 2),
            },
            num_candidates: 4,
            max_prev_m: 20 * 4,
            enable_cell_randomization: false,
            env_light_probability: 0.25,
            new_sequence: false,
        }
    }

    fn prev(sample: LightSample, m: u32) -> CellReservoir {
        CellReservoir {
            reservoir: Reservoir {
                sample,
                w_sum: m as f32,
                m,
            },
            target_density: 1.0,
        }
    }

    fn stored(
        res: CellReservoir,
        slot_idx: usize,
    ) -> (Vec<CellReservoirData>, Vec<ReservoirInfo>) {
        let len = params().grid.num_slots();
        let mut reservoirs = vec![CellReservoirData::default(); len];
        let mut infos = vec![ReservoirInfo::default(); len];

        res.write(&mut reservoirs, &mut infos, slot_idx);

        (reservoirs, infos)
    }

    fn light() -> LightSample {
        LightSample {
            emittance: Vec3::ONE,
            position: vec3(0.5, 1.5, 0.5),
            normal: Vec3::ZERO,
            at_infinity: false,
        }
    }

    #[test]
    fn previous_reservoir_survives_with_its_stream_length() {
        let lights = [Light::point(vec3(0.5, 1.5, 0.5), Vec3::ONE)];
        let light_cdf = [1.0];

        let instances = [LightInstance {
            first_light: 0,
            num_lights: 1,
        }];

        let instance_cdf = [1.0];

        let lights = LightsView::new(
            &lights,
            &light_cdf,
            &instances,
            &instance_cdf,
            None,
        );

        let (reservoirs, infos) = stored(prev(light(), 12), 7);
        let mut wnoise = WhiteNoise::from_state(1);
        let res =
            main(&params(), lights, 7, &mut wnoise, &reservoirs, &infos);

        assert_eq!(4 + 12, res.m);
        assert_eq!(light(), res.sample);

        // Fresh candidates weigh `1 / 1`, while the previous reservoir weighs
        // `p̂ * W * m = 1 * 1 * 12`
        assert_relative_eq!(16.0, res.w_sum, max_relative = 0.0001);
        assert_relative_eq!(
            1.0,
            res.contribution_weight(),
            max_relative = 0.0001
        );
    }

    #[test]
    fn zero_weight_previous_reservoir_keeps_its_stream_length() {
        let lights = [Light::point(vec3(0.5, 1.5, 0.5), Vec3::ONE)];
        let light_cdf = [1.0];

        let instances = [LightInstance {
            first_light: 0,
            num_lights: 1,
        }];

        let instance_cdf = [1.0];

        let lights = LightsView::new(
            &lights,
            &light_cdf,
            &instances,
            &instance_cdf,
            None,
        );

        // Previous frame saw 12 candidates, none of which had any weight
        let prev = CellReservoir {
            reservoir: Reservoir {
                sample: light(),
                w_sum: 0.0,
                m: 12,
            },
            target_density: 0.0,
        };

        let (reservoirs, infos) = stored(prev, 7);
        let mut wnoise = WhiteNoise::from_state(5);
        let res =
            main(&params(), lights, 7, &mut wnoise, &reservoirs, &infos);

        assert_eq!(4 + 12, res.m);
        assert_eq!(light(), res.sample);
        assert_relative_eq!(4.0, res.w_sum, max_relative = 0.0001);

        // The fresh candidates get spread across both streams
        assert_relative_eq!(
            4.0 / 16.0,
            res.contribution_weight(),
            max_relative = 0.0001
        );
    }

    #[test]
    fn previous_stream_length_is_clamped() {
        let (reservoirs, infos) = stored(prev(light(), 1_000), 0);
        let mut wnoise = WhiteNoise::from_state(2);

        let res = main(
            &params(),
            LightsView::new(&[], &[], &[], &[], Some(Vec3::ONE)),
            0,
            &mut wnoise,
            &reservoirs,
            &infos,
        );

        assert_eq!(4 + 80, res.m);
    }

    #[test]
    fn new_sequence_ignores_previous_frame() {
        let (reservoirs, infos) = stored(prev(light(), 12), 0);
        let mut wnoise = WhiteNoise::from_state(3);

        let params = BuildPassParams {
            new_sequence: true,
            ..params()
        };

        let res = main(
            &params,
            LightsView::new(&[], &[], &[], &[], Some(Vec3::ONE)),
            0,
            &mut wnoise,
            &reservoirs,
            &infos,
        );

        assert_eq!(4, res.m);
        assert!(res.sample.at_infinity);
    }

    #[test]
    fn empty_catalog_drops_previous_frame() {
        let (reservoirs, infos) = stored(prev(light(), 12), 0);
        let mut wnoise = WhiteNoise::from_state(4);

        let res = main(
            &params(),
            LightsView::empty(),
            0,
            &mut wnoise,
            &reservoirs,
            &infos,
        );

        assert!(res.is_empty());
        assert_eq!(0.0, res.contribution_weight());
    }
}

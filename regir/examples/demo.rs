//! Headless walkthrough: a room lit by a row of small area lights plus a dim
//! sky, shaded at a handful of floor points over a couple of frames.
//!
//! Run with `RUST_LOG=info` (or `debug`) to see what the grid is doing.

use regir::glam::{uvec2, uvec3, vec3, Vec3};
use regir::{
    BoundingBox, Light, LightCatalog, LightSample, ReGirConfig, RebuildPolicy,
    ReservoirGrid, WhiteNoise,
};

fn main() {
    env_logger::init();

    let mut lights =
        LightCatalog::builder().with_environment(Vec3::splat(0.05));

    for i in 0..16 {
        let x = 0.5 + i as f32;

        // Facing down
        lights.add_instance([Light::triangle(
            [
                vec3(x, 3.9, 2.0),
                vec3(x + 0.25, 3.9, 2.0),
                vec3(x, 3.9, 2.25),
            ],
            vec3(20.0, 18.0, 15.0) * (1.0 + (i % 4) as f32),
        )]);
    }

    let lights = lights.build();

    let config = ReGirConfig {
        rebuild_policy: RebuildPolicy::RecentlyAccessed {
            max_inactive_frames: 8,
        },
        ..Default::default()
    };

    if let Err(err) = config.validate() {
        log::error!("Invalid config: {}", err);
        return;
    }

    let bounds = BoundingBox::new(Vec3::ZERO, vec3(17.0, 4.0, 4.0));

    let mut grid = match ReservoirGrid::new(bounds, uvec3(17, 4, 4)) {
        Ok(grid) => grid,
        Err(err) => {
            log::error!("Couldn't create grid: {}", err);
            return;
        }
    };

    let normal = Vec3::Y;

    for frame in 0..16 {
        grid.rebuild_reservoirs(&lights, frame, frame == 0, &config);

        let mut radiance = Vec3::ZERO;

        for i in 0..64 {
            let point = vec3(0.25 + i as f32 * 0.25, 0.0, 2.0);
            let mut wnoise = WhiteNoise::new(frame, uvec2(i, 0));

            let target_fn = |sample: &LightSample| {
                let (dir, _) = sample.direction_from(point);

                sample.target_density(point) * normal.dot(dir).max(0.0)
            };

            let (sample, w) = grid.resample(
                frame,
                point,
                &mut wnoise,
                &config,
                target_fn,
                |_| true,
            );

            if w > 0.0 {
                radiance += shade(point, normal, &sample) * w;
            }

            grid.report_cell_access(grid.cell_of(point).1, frame);
        }

        log::info!(
            "frame = {}, active-cells = {}, mean-radiance = {}",
            frame,
            grid.num_active_cells(),
            radiance / 64.0,
        );
    }
}

/// Unshadowed radiance arriving at `point` from `sample`.
fn shade(point: Vec3, normal: Vec3, sample: &LightSample) -> Vec3 {
    let (dir, distance) = sample.direction_from(point);
    let cos_surface = normal.dot(dir).max(0.0);

    if sample.at_infinity {
        return sample.emittance * cos_surface;
    }

    let cos_light = if sample.normal == Vec3::ZERO {
        1.0
    } else {
        sample.normal.dot(-dir).max(0.0)
    };

    sample.emittance * cos_surface * cos_light / distance.powi(2).max(1e-4)
}

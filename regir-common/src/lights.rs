use glam::Vec3;

use crate::{Light, LightId, LightSample, WhiteNoise};

/// Contiguous range of lights coming from the same emissive instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LightInstance {
    pub first_light: u32,
    pub num_lights: u32,
}

/// Read-only, two-level view of the light catalog.
///
/// Sampling first picks an instance according to `instance_cdf`, then a light
/// within that instance according to the instance's slice of `light_cdf`.
/// Both cdfs are normalized so that their last element is `1.0` (for
/// `light_cdf`: the last element of each instance's slice).
#[derive(Clone, Copy, Debug)]
pub struct LightsView<'a> {
    lights: &'a [Light],
    light_cdf: &'a [f32],
    instances: &'a [LightInstance],
    instance_cdf: &'a [f32],
    environment: Option<Vec3>,
}

impl<'a> LightsView<'a> {
    pub fn new(
        lights: &'a [Light],
        light_cdf: &'a [f32],
        instances: &'a [LightInstance],
        instance_cdf: &'a [f32],
        environment: Option<Vec3>,
    ) -> Self {
        debug_assert_eq!(lights.len(), light_cdf.len());
        debug_assert_eq!(instances.len(), instance_cdf.len());

        Self {
            lights,
            light_cdf,
            instances,
            instance_cdf,
            environment,
        }
    }

    pub fn empty() -> Self {
        Self::new(&[], &[], &[], &[], None)
    }

    pub fn get(&self, id: LightId) -> Light {
        self.lights[id.get() as usize]
    }

    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn has_environment(&self) -> bool {
        self.environment.is_some()
    }

    /// Returns the probability of picking the environment light instead of
    /// one of the primitives.
    pub fn environment_probability(&self, env_light_probability: f32) -> f32 {
        match (self.environment.is_some(), self.instances.is_empty()) {
            (false, _) => 0.0,
            (true, true) => 1.0,
            (true, false) => env_light_probability.clamp(0.0, 1.0),
        }
    }

    /// Returns the discrete probability of picking light `id`, including the
    /// probability of picking its instance.
    pub fn probability(&self, id: LightId, env_light_probability: f32) -> f32 {
        let light_idx = id.get() as usize;

        let Some(instance_idx) = self.instances.iter().position(|instance| {
            let first = instance.first_light as usize;

            (first..first + instance.num_lights as usize).contains(&light_idx)
        }) else {
            return 0.0;
        };

        let instance = self.instances[instance_idx];
        let first = instance.first_light as usize;
        let light_cdf =
            &self.light_cdf[first..first + instance.num_lights as usize];

        (1.0 - self.environment_probability(env_light_probability))
            * pmf(self.instance_cdf, instance_idx)
            * pmf(light_cdf, light_idx - first)
    }

    /// Draws a light sample according to the catalog's source distribution.
    ///
    /// Returns the sample and its source pdf, i.e. the product of the
    /// discrete probabilities of picking the instance and the light, and of
    /// the density of the point chosen on that light; `None` if the catalog
    /// is empty.
    pub fn sample(
        &self,
        wnoise: &mut WhiteNoise,
        env_light_probability: f32,
    ) -> Option<(LightSample, f32)> {
        let env_probability =
            self.environment_probability(env_light_probability);

        if let Some(emittance) = self.environment {
            if env_probability >= 1.0 || wnoise.sample() < env_probability {
                let (sample, pdf) =
                    Light::environment(emittance).sample(wnoise);

                return Some((sample, env_probability * pdf));
            }
        }

        if self.instances.is_empty() {
            return None;
        }

        let instance_idx = sample_cdf(self.instance_cdf, wnoise.sample());
        let instance = self.instances[instance_idx];
        let first = instance.first_light as usize;
        let light_cdf =
            &self.light_cdf[first..first + instance.num_lights as usize];

        if light_cdf.is_empty() {
            return None;
        }

        let light_idx = sample_cdf(light_cdf, wnoise.sample());
        let (sample, pdf) = self.lights[first + light_idx].sample(wnoise);

        let pdf = (1.0 - env_probability)
            * pmf(self.instance_cdf, instance_idx)
            * pmf(light_cdf, light_idx)
            * pdf;

        Some((sample, pdf))
    }
}

/// Returns index of the first element whose cdf exceeds `u`.
///
/// Elements with zero probability mass share their cdf value with their
/// predecessor and so are never picked.
fn sample_cdf(cdf: &[f32], u: f32) -> usize {
    cdf.partition_point(|&c| c <= u).min(cdf.len() - 1)
}

fn pmf(cdf: &[f32], idx: usize) -> f32 {
    let prev = if idx == 0 { 0.0 } else { cdf[idx - 1] };

    (cdf[idx] - prev).max(0.0)
}

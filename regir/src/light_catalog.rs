use glam::Vec3;
use log::{debug, warn};
use regir_common::{Light, LightInstance, LightsView};

use crate::BoundingBox;

/// Importance-weighted enumeration of the scene's emitters.
///
/// Built once per scene change and then read (through [`Self::view()`]) by
/// every slot of the grid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LightCatalog {
    lights: Vec<Light>,
    light_cdf: Vec<f32>,
    instances: Vec<LightInstance>,
    instance_cdf: Vec<f32>,
    environment: Option<Vec3>,
}

impl LightCatalog {
    pub fn builder() -> LightCatalogBuilder {
        Default::default()
    }

    pub fn view(&self) -> LightsView<'_> {
        LightsView::new(
            &self.lights,
            &self.light_cdf,
            &self.instances,
            &self.instance_cdf,
            self.environment,
        )
    }

    /// Returns the number of emitters (not including the environment light).
    pub fn len(&self) -> usize {
        self.lights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lights.is_empty() && self.environment.is_none()
    }

    pub fn instances(&self) -> &[LightInstance] {
        &self.instances
    }

    pub fn environment(&self) -> Option<Vec3> {
        self.environment
    }

    /// Returns the bounding box of all emitters at finite positions.
    pub fn bounds(&self) -> BoundingBox {
        self.lights
            .iter()
            .flat_map(|light| match *light {
                Light::Triangle { positions, .. } => positions.to_vec(),
                Light::Point { position, .. } => vec![position],
                Light::Environment { .. } => Vec::new(),
            })
            .collect()
    }
}

impl FromIterator<Light> for LightCatalog {
    /// Creates a catalog with all of the lights in a single instance.
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = Light>,
    {
        Self::builder().with_instance(iter).build()
    }
}

#[derive(Clone, Debug, Default)]
pub struct LightCatalogBuilder {
    instances: Vec<Vec<Light>>,
    environment: Option<Vec3>,
}

impl LightCatalogBuilder {
    /// Adds an emissive instance, e.g. all of the emissive triangles of a
    /// single mesh.
    pub fn add_instance(&mut self, lights: impl IntoIterator<Item = Light>) {
        let mut instance = Vec::new();

        for light in lights {
            if let Light::Environment { emittance } = light {
                self.add_environment(emittance);
            } else {
                instance.push(light);
            }
        }

        self.instances.push(instance);
    }

    pub fn with_instance(
        mut self,
        lights: impl IntoIterator<Item = Light>,
    ) -> Self {
        self.add_instance(lights);
        self
    }

    /// Adds a constant-radiance environment light; multiple environments sum
    /// up.
    pub fn add_environment(&mut self, emittance: Vec3) {
        *self.environment.get_or_insert(Vec3::ZERO) += emittance;
    }

    pub fn with_environment(mut self, emittance: Vec3) -> Self {
        self.add_environment(emittance);
        self
    }

    pub fn build(self) -> LightCatalog {
        let mut catalog = LightCatalog::default();
        let mut instance_powers = Vec::new();

        for lights in self.instances {
            let first_light = catalog.lights.len();
            let mut instance_power = 0.0;

            for light in lights {
                let power = light.power();

                if !power.is_finite() || power < 0.0 {
                    warn!("Skipping light with invalid power: {:?}", light);
                    continue;
                }

                if power == 0.0 {
                    debug!("Skipping non-emissive light: {:?}", light);
                    continue;
                }

                instance_power += power;
                catalog.lights.push(light);
                catalog.light_cdf.push(instance_power);
            }

            if instance_power <= 0.0 || !instance_power.is_finite() {
                catalog.lights.truncate(first_light);
                catalog.light_cdf.truncate(first_light);
                continue;
            }

            normalize_cdf(&mut catalog.light_cdf[first_light..]);

            catalog.instances.push(LightInstance {
                first_light: first_light as u32,
                num_lights: (catalog.lights.len() - first_light) as u32,
            });

            instance_powers.push(instance_power);
        }

        let mut total_power = 0.0;

        for power in instance_powers {
            total_power += power;
            catalog.instance_cdf.push(total_power);
        }

        normalize_cdf(&mut catalog.instance_cdf);

        catalog.environment = self.environment.filter(|emittance| {
            let power = Light::environment(*emittance).power();

            if power.is_finite() && power > 0.0 {
                true
            } else {
                warn!("Skipping environment light: {}", emittance);
                false
            }
        });

        debug!(
            "Light catalog built; lights = {}, instances = {}, \
             environment = {}",
            catalog.lights.len(),
            catalog.instances.len(),
            catalog.environment.is_some(),
        );

        catalog
    }
}

/// Turns running sums into a cdf ending at exactly `1.0`.
fn normalize_cdf(cdf: &mut [f32]) {
    let Some(&total) = cdf.last() else {
        return;
    };

    for value in cdf.iter_mut() {
        *value /= total;
    }

    if let Some(last) = cdf.last_mut() {
        *last = 1.0;
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::vec3;
    use regir_common::{LightId, WhiteNoise};

    use super::*;

    fn triangle(y: f32, emittance: f32) -> Light {
        Light::triangle(
            [
                vec3(0.0, y, 0.0),
                vec3(1.0, y, 0.0),
                vec3(0.0, y, 2.0),
            ],
            Vec3::splat(emittance),
        )
    }

    #[test]
    fn empty() {
        let target = LightCatalog::builder().build();

        assert!(target.is_empty());
        assert_eq!(0, target.len());
        assert!(!target.bounds().is_set());
        assert!(target
            .view()
            .sample(&mut WhiteNoise::default(), 0.25)
            .is_none());
    }

    #[test]
    fn probabilities() {
        let target = LightCatalog::builder()
            .with_instance([triangle(0.0, 1.0), triangle(1.0, 3.0)])
            .with_instance([Light::point(
                vec3(0.0, 5.0, 0.0),
                Vec3::splat(4.0),
            )])
            .build();

        let view = target.view();

        assert_eq!(3, target.len());
        assert_eq!(2, target.instances().len());

        // Instances weigh 4 (= 1 + 3) and 4, picked at 50% each
        assert_relative_eq!(0.125, view.probability(LightId::new(0), 0.25));
        assert_relative_eq!(0.375, view.probability(LightId::new(1), 0.25));
        assert_relative_eq!(0.5, view.probability(LightId::new(2), 0.25));

        assert_eq!(vec3(0.0, 0.0, 0.0), target.bounds().min());
        assert_eq!(vec3(1.0, 5.0, 2.0), target.bounds().max());
    }

    #[test]
    fn invalid_lights_are_skipped() {
        let target = LightCatalog::builder()
            .with_instance([
                triangle(0.0, f32::NAN),
                triangle(0.0, 0.0),
                Light::triangle([Vec3::ONE; 3], Vec3::ONE),
                Light::point(Vec3::ZERO, Vec3::splat(-1.0)),
            ])
            .with_instance([triangle(0.0, 2.0)])
            .with_environment(Vec3::splat(f32::INFINITY))
            .build();

        assert_eq!(1, target.len());
        assert_eq!(
            vec![LightInstance {
                first_light: 0,
                num_lights: 1
            }],
            target.instances()
        );
        assert_eq!(None, target.environment());
        assert_relative_eq!(
            1.0,
            target.view().probability(LightId::new(0), 0.25)
        );
    }

    #[test]
    fn environment() {
        let target = LightCatalog::builder()
            .with_instance([Light::environment(Vec3::ONE)])
            .with_environment(Vec3::ONE)
            .build();

        assert!(!target.is_empty());
        assert_eq!(0, target.len());
        assert_eq!(Some(Vec3::splat(2.0)), target.environment());
        assert_relative_eq!(1.0, target.view().environment_probability(0.25));
    }

    #[test]
    fn from_iter() {
        let target: LightCatalog = [triangle(0.0, 1.0), triangle(1.0, 1.0)]
            .into_iter()
            .collect();

        assert_eq!(2, target.len());
        assert_eq!(1, target.instances().len());
        assert_relative_eq!(
            0.5,
            target.view().probability(LightId::new(1), 0.25)
        );
    }
}

use core::f32::consts::PI;

use glam::Vec3;

use crate::{F32Ext, Vec3Ext, WhiteNoise, REGIR_EPSILON};

/// Emissive primitive, as enumerated by the light catalog.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Light {
    /// One-sided emissive triangle; emits towards the side its winding
    /// order faces.
    Triangle {
        positions: [Vec3; 3],
        emittance: Vec3,
    },

    /// Omnidirectional point emitter.
    Point { position: Vec3, emittance: Vec3 },

    /// Constant-radiance environment, i.e. a light "at infinity".
    Environment { emittance: Vec3 },
}

impl Light {
    pub fn triangle(positions: [Vec3; 3], emittance: Vec3) -> Self {
        Self::Triangle {
            positions,
            emittance,
        }
    }

    pub fn point(position: Vec3, emittance: Vec3) -> Self {
        Self::Point {
            position,
            emittance,
        }
    }

    pub fn environment(emittance: Vec3) -> Self {
        Self::Environment { emittance }
    }

    pub fn emittance(&self) -> Vec3 {
        match *self {
            Self::Triangle { emittance, .. }
            | Self::Point { emittance, .. }
            | Self::Environment { emittance } => emittance,
        }
    }

    /// Returns surface area of this light; zero for point lights and for the
    /// environment light.
    pub fn area(&self) -> f32 {
        match *self {
            Self::Triangle { positions: [p0, p1, p2], .. } => {
                0.5 * (p1 - p0).cross(p2 - p0).length()
            }
            Self::Point { .. } | Self::Environment { .. } => 0.0,
        }
    }

    /// Returns importance of this light, used as its (unnormalized)
    /// probability of being picked from the catalog.
    pub fn power(&self) -> f32 {
        let emittance = self.emittance().average();

        match self {
            Self::Triangle { .. } => emittance * self.area(),
            Self::Point { .. } | Self::Environment { .. } => emittance,
        }
    }

    /// Picks a point on this light.
    ///
    /// Returns the sample together with the probability density of choosing
    /// it given this light was already chosen: per unit area for triangles,
    /// per unit solid angle for the environment and `1.0` for point lights
    /// (whose position is a delta).
    pub fn sample(&self, wnoise: &mut WhiteNoise) -> (LightSample, f32) {
        match *self {
            Self::Triangle {
                positions: [p0, p1, p2],
                emittance,
            } => {
                let uv = wnoise.sample_triangle();
                let position = p0 + uv.x * (p1 - p0) + uv.y * (p2 - p0);
                let normal = (p1 - p0).cross(p2 - p0);
                let area = 0.5 * normal.length();

                if area <= 0.0 || !area.is_finite() {
                    return (LightSample::default(), 0.0);
                }

                let sample = LightSample {
                    emittance,
                    position,
                    normal: normal.normalize(),
                    at_infinity: false,
                };

                (sample, 1.0 / area)
            }

            Self::Point {
                position,
                emittance,
            } => {
                let sample = LightSample {
                    emittance,
                    position,
                    normal: Vec3::ZERO,
                    at_infinity: false,
                };

                (sample, 1.0)
            }

            Self::Environment { emittance } => {
                let sample = LightSample {
                    emittance,
                    position: wnoise.sample_sphere(),
                    normal: Vec3::ZERO,
                    at_infinity: true,
                };

                (sample, 1.0 / (4.0 * PI))
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct LightId(u32);

impl LightId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

/// A point (or, for lights at infinity, a direction) picked on an emitter.
///
/// A zero `normal` marks an omnidirectional emitter.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LightSample {
    pub emittance: Vec3,

    /// World-space position; when `at_infinity` is set, the unit direction
    /// pointing from the scene towards the light.
    pub position: Vec3,

    pub normal: Vec3,
    pub at_infinity: bool,
}

impl LightSample {
    /// Returns the unit direction from `point` towards this sample and the
    /// distance to it (`f32::INFINITY` for samples at infinity).
    pub fn direction_from(&self, point: Vec3) -> (Vec3, f32) {
        if self.at_infinity {
            return (self.position, f32::INFINITY);
        }

        let to_light = self.position - point;
        let distance = to_light.length();

        if distance > 0.0 {
            (to_light / distance, distance)
        } else {
            (Vec3::ZERO, 0.0)
        }
    }

    /// Returns the cheap, unshadowed estimate of this sample's contribution
    /// at `point`: `luminance · cos_light / distance²`.
    ///
    /// This is the target function used when building cell reservoirs; it
    /// knows nothing about the receiving surface at all.
    pub fn target_density(&self, point: Vec3) -> f32 {
        let luma = self.emittance.luma();

        if self.at_infinity {
            return luma.or_zero();
        }

        let to_light = self.position - point;
        let distance_squared = to_light.length_squared();

        let cos_light = if self.normal == Vec3::ZERO {
            1.0
        } else {
            let distance = distance_squared.sqrt();

            if distance > 0.0 {
                self.normal.dot(-to_light / distance).saturate()
            } else {
                1.0
            }
        };

        (luma * cos_light / distance_squared.max(REGIR_EPSILON)).or_zero()
    }
}

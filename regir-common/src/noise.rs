use core::f32::consts::PI;

use glam::{vec2, vec3, UVec2, Vec2, Vec3};

/// PCG-based white noise generator.
///
/// Each light slot owns one of those (seeded once when the grid gets
/// created) and each shading point creates its own from a per-frame seed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WhiteNoise {
    state: u32,
}

impl WhiteNoise {
    pub fn new(seed: u32, id: UVec2) -> Self {
        Self {
            state: seed
                ^ 48619u32.wrapping_mul(id.x)
                ^ 95461u32.wrapping_mul(id.y),
        }
    }

    pub fn from_state(state: u32) -> Self {
        Self { state }
    }

    /// Generates a uniform sample in range `<0.0, 1.0)`.
    pub fn sample(&mut self) -> f32 {
        (self.sample_int() >> 8) as f32 * (1.0 / (1u32 << 24) as f32)
    }

    /// Generates a uniform sample in range `<0, u32::MAX>`.
    pub fn sample_int(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(747796405)
            .wrapping_add(2891336453);

        let word = ((self.state >> ((self.state >> 28) + 4)) ^ self.state)
            .wrapping_mul(277803737);

        (word >> 22) ^ word
    }

    /// Generates a uniform index in range `<0, len)`.
    pub fn sample_index(&mut self, len: usize) -> usize {
        ((self.sample() * len as f32) as usize).min(len.saturating_sub(1))
    }

    /// Generates a uniform sample inside of a unit cube.
    pub fn sample_cube(&mut self) -> Vec3 {
        vec3(self.sample(), self.sample(), self.sample())
    }

    /// Generates a uniform direction on a unit sphere.
    pub fn sample_sphere(&mut self) -> Vec3 {
        let phi = self.sample() * 2.0 * PI;
        let cos_theta = 1.0 - 2.0 * self.sample();
        let sin_theta = (1.0 - cos_theta * cos_theta).max(0.0).sqrt();

        vec3(sin_theta * phi.cos(), sin_theta * phi.sin(), cos_theta)
    }

    /// Generates uniformly distributed barycentric coordinates `(b1, b2)` of
    /// a point inside a triangle.
    pub fn sample_triangle(&mut self) -> Vec2 {
        let u = self.sample();
        let v = self.sample();

        if u + v > 1.0 {
            vec2(1.0 - u, 1.0 - v)
        } else {
            vec2(u, v)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample() {
        let mut target = WhiteNoise::from_state(1234);

        for _ in 0..10_000 {
            let x = target.sample();

            assert!(x >= 0.0 && x < 1.0, "{x}");
        }
    }

    #[test]
    fn sample_index() {
        let mut target = WhiteNoise::from_state(4321);
        let mut hits = [0; 4];

        for _ in 0..4_000 {
            hits[target.sample_index(4)] += 1;
        }

        for hit in hits {
            assert!(hit > 800 && hit < 1200, "{hits:?}");
        }

        assert_eq!(0, target.sample_index(0));
    }

    #[test]
    fn sample_sphere() {
        let mut target = WhiteNoise::new(7, UVec2::new(3, 5));
        let mut sum = Vec3::ZERO;

        for _ in 0..10_000 {
            let dir = target.sample_sphere();

            approx::assert_relative_eq!(1.0, dir.length(), epsilon = 0.001);

            sum += dir;
        }

        assert!((sum / 10_000.0).length() < 0.05);
    }

    #[test]
    fn sample_triangle() {
        let mut target = WhiteNoise::from_state(99);

        for _ in 0..1_000 {
            let uv = target.sample_triangle();

            assert!(uv.x >= 0.0 && uv.y >= 0.0 && uv.x + uv.y <= 1.0);
        }
    }

    #[test]
    fn streams_are_independent() {
        let mut a = WhiteNoise::new(1, UVec2::new(0, 0));
        let mut b = WhiteNoise::new(1, UVec2::new(1, 0));

        assert_ne!(a.sample_int(), b.sample_int());
    }
}

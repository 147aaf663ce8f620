mod cell;

pub use self::cell::*;
use crate::{F32Ext, WhiteNoise};

/// Weighted reservoir for streaming resampled importance sampling.
///
/// `w_sum` is the running sum of resampling weights seen so far and `m` is the
/// number of candidates folded in (the stream length); a reservoir with
/// `m == 0` is empty and its `sample` is meaningless.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Reservoir<T> {
    pub sample: T,
    pub w_sum: f32,
    pub m: u32,
}

impl<T> Reservoir<T>
where
    T: Clone + Copy,
{
    /// Folds one candidate into this reservoir; returns whether the candidate
    /// got selected.
    ///
    /// Non-finite and non-positive weights still count towards `m`, but can
    /// never get selected.
    pub fn update(
        &mut self,
        wnoise: &mut WhiteNoise,
        sample: T,
        weight: f32,
    ) -> bool {
        self.m += 1;

        let weight = weight.or_zero();

        if weight == 0.0 {
            return false;
        }

        self.w_sum += weight;

        if wnoise.sample() * self.w_sum < weight {
            self.sample = sample;
            true
        } else {
            false
        }
    }

    /// Folds another reservoir into this one, as if all of its candidates had
    /// been streamed through this reservoir.
    ///
    /// `rhs_w` is the unbiased contribution weight of `rhs` and `pdf` is the
    /// target pdf of `rhs.sample` evaluated at *this* reservoir's reference.
    pub fn merge(
        &mut self,
        wnoise: &mut WhiteNoise,
        rhs: &Self,
        rhs_w: f32,
        pdf: f32,
    ) -> bool {
        if rhs.m == 0 {
            return false;
        }

        let selected =
            self.update(wnoise, rhs.sample, pdf * rhs_w * rhs.m as f32);

        self.m += rhs.m - 1;
        selected
    }

    /// Returns the unbiased contribution weight of this reservoir's sample,
    /// `w_sum / (m * pdf)`, where `pdf` is the sample's target pdf.
    pub fn contribution_weight(&self, pdf: f32) -> f32 {
        let t = self.m as f32 * pdf;

        if t > 0.0 {
            (self.w_sum / t).or_zero()
        } else {
            0.0
        }
    }

    pub fn clamp_m(&mut self, max: u32) {
        self.m = self.m.min(max);
    }

    pub fn is_empty(&self) -> bool {
        self.m == 0
    }
}

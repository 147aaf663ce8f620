use derivative::Derivative;

use crate::{Error, Result};

/// Toggles and knobs of the reservoir grid, passed explicitly to each
/// rebuild and query.
#[derive(Clone, Debug, PartialEq, Derivative)]
#[derivative(Default)]
pub struct ReGirConfig {
    /// `log2` of the number of light candidates streamed into each slot.
    #[derivative(Default(value = "3"))]
    pub log2_candidates_per_light_slot: u32,

    /// `log2` of the number of slots resampled per shading point.
    #[derivative(Default(value = "2"))]
    pub log2_candidates_per_cell: u32,

    #[derivative(Default(value = "true"))]
    pub enable_temporal_reuse: bool,

    /// Whether slots build their reservoirs at random points within their
    /// cells instead of at the cell centers.
    ///
    /// Note that the jitter itself isn't compensated for, so the grid is then
    /// slightly biased towards lights that are close to the cells' borders.
    #[derivative(Default(value = "true"))]
    pub enable_cell_randomization: bool,

    /// Previous frame's stream length is clamped to this multiple of the
    /// current frame's candidate count.
    #[derivative(Default(value = "20.0"))]
    pub temporal_m_clamp: f32,

    pub rebuild_policy: RebuildPolicy,

    /// Probability of drawing the environment light instead of one of the
    /// other emitters (when there are both).
    ///
    /// Must lie strictly between zero and one, as either endpoint would never
    /// sample one of the two light classes.
    #[derivative(Default(value = "0.25"))]
    pub env_light_probability: f32,

    /// Whether visibility is tested for every resampled slot (more accurate,
    /// but `M` times more rays) or just for the finally selected one.
    pub enable_candidate_visibility: bool,
}

impl ReGirConfig {
    pub const MAX_LOG2_CANDIDATES_PER_LIGHT_SLOT: u32 = 8;
    pub const MAX_LOG2_CANDIDATES_PER_CELL: u32 = 5;

    pub fn validate(&self) -> Result<()> {
        if self.log2_candidates_per_light_slot
            > Self::MAX_LOG2_CANDIDATES_PER_LIGHT_SLOT
        {
            return Err(Error::InvalidConfig(format!(
                "log2_candidates_per_light_slot must be at most {}, got {}",
                Self::MAX_LOG2_CANDIDATES_PER_LIGHT_SLOT,
                self.log2_candidates_per_light_slot,
            )));
        }

        if self.log2_candidates_per_cell > Self::MAX_LOG2_CANDIDATES_PER_CELL {
            return Err(Error::InvalidConfig(format!(
                "log2_candidates_per_cell must be at most {}, got {}",
                Self::MAX_LOG2_CANDIDATES_PER_CELL,
                self.log2_candidates_per_cell,
            )));
        }

        if !(self.temporal_m_clamp >= 0.0 && self.temporal_m_clamp.is_finite())
        {
            return Err(Error::InvalidConfig(format!(
                "temporal_m_clamp must be finite and non-negative, got {}",
                self.temporal_m_clamp,
            )));
        }

        if !(self.env_light_probability > 0.0
            && self.env_light_probability < 1.0)
        {
            return Err(Error::InvalidConfig(format!(
                "env_light_probability must be within 0.0 .. 1.0 (exclusive), \
                 got {}",
                self.env_light_probability,
            )));
        }

        Ok(())
    }

    /// Number of light candidates streamed into each slot (`N`).
    pub fn candidates_per_light_slot(&self) -> u32 {
        1 << self
            .log2_candidates_per_light_slot
            .min(Self::MAX_LOG2_CANDIDATES_PER_LIGHT_SLOT)
    }

    /// Number of slots resampled per shading point (`M`).
    pub fn candidates_per_cell(&self) -> u32 {
        1 << self
            .log2_candidates_per_cell
            .min(Self::MAX_LOG2_CANDIDATES_PER_CELL)
    }

    /// Maximum stream length the previous frame's reservoir can carry into
    /// the temporal merge.
    pub fn max_prev_m(&self) -> u32 {
        (self.temporal_m_clamp.max(0.0)
            * self.candidates_per_light_slot() as f32) as u32
    }
}

/// Which cells get rebuilt each frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RebuildPolicy {
    /// Every cell, every frame.
    #[default]
    All,

    /// Only cells that had been consulted by shading during the last
    /// `max_inactive_frames` frames; the remaining cells carry over their
    /// previous content unchanged.
    RecentlyAccessed { max_inactive_frames: u32 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default() {
        let target = ReGirConfig::default();

        assert_eq!(Ok(()), target.validate());
        assert_eq!(8, target.candidates_per_light_slot());
        assert_eq!(4, target.candidates_per_cell());
        assert_eq!(160, target.max_prev_m());
        assert!(target.enable_temporal_reuse);
        assert!(target.enable_cell_randomization);
        assert!(!target.enable_candidate_visibility);
        assert_eq!(RebuildPolicy::All, target.rebuild_policy);
    }

    #[test]
    fn validate() {
        let target = ReGirConfig {
            log2_candidates_per_light_slot: 9,
            ..Default::default()
        };

        assert!(matches!(target.validate(), Err(Error::InvalidConfig(_))));

        let target = ReGirConfig {
            log2_candidates_per_cell: 6,
            ..Default::default()
        };

        assert!(matches!(target.validate(), Err(Error::InvalidConfig(_))));

        let target = ReGirConfig {
            temporal_m_clamp: f32::NAN,
            ..Default::default()
        };

        assert!(matches!(target.validate(), Err(Error::InvalidConfig(_))));

        for env_light_probability in [-0.5, 0.0, 1.0, 1.5, f32::NAN] {
            let target = ReGirConfig {
                env_light_probability,
                ..Default::default()
            };

            assert!(
                matches!(target.validate(), Err(Error::InvalidConfig(_))),
                "{env_light_probability}"
            );
        }
    }
}

//! Statutory contribution rates for the two pillars

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

/// Contribution rates applied to the contribution base
///
/// Only the per-pillar rates are stored; the combined rate and the pillar I
/// share are derived so they can never drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContributionRates {
    /// Share of the base credited to pillar I
    pub i_pillar_rate: f64,

    /// Share of the base credited to pillar II (sub-account)
    pub ii_pillar_rate: f64,
}

impl ContributionRates {
    pub fn new(i_pillar_rate: f64, ii_pillar_rate: f64) -> Self {
        Self { i_pillar_rate, ii_pillar_rate }
    }

    /// Combined pension contribution rate
    pub fn total_rate(&self) -> f64 {
        self.i_pillar_rate + self.ii_pillar_rate
    }

    /// Fraction of each contribution routed to pillar I
    pub fn pillar1_share(&self) -> f64 {
        let total = self.total_rate();
        if total > 0.0 {
            self.i_pillar_rate / total
        } else {
            0.0
        }
    }

    pub fn validate(&self) -> Result<(), ProjectionError> {
        for (field, rate) in [
            ("i_pillar_rate", self.i_pillar_rate),
            ("ii_pillar_rate", self.ii_pillar_rate),
        ] {
            if !rate.is_finite() || !(0.0..1.0).contains(&rate) {
                return Err(ProjectionError::assumption(field, format!("{rate} is outside [0, 1)")));
            }
        }
        let share = self.pillar1_share();
        if share <= 0.0 || share >= 1.0 {
            return Err(ProjectionError::assumption(
                "pillar1_share",
                format!("split ratio {share} is outside (0, 1)"),
            ));
        }
        Ok(())
    }
}

impl Default for ContributionRates {
    /// 12.22% pillar I + 7.30% pillar II = 19.52%
    fn default() -> Self {
        Self::new(0.1222, 0.073)
    }
}

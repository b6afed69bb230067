//! Per-player strength metrics used by the team balancer

use crate::config::{BalanceConfig, RatingConfig, StrengthStrategy};
use crate::rating::RatingState;

/// Maps a rating state to the scalar the balancer equalizes across teams
pub trait StrengthMetric: Send + Sync {
    /// Strength on the public rating scale
    fn strength(&self, state: &RatingState) -> f64;

    fn name(&self) -> &'static str;
}

/// Deviation-blended long-term and recent-form rating
#[derive(Debug, Clone, Default)]
pub struct EffectiveRatingStrength {
    config: RatingConfig,
}

impl EffectiveRatingStrength {
    pub fn new(config: RatingConfig) -> Self {
        Self { config }
    }
}

impl StrengthMetric for EffectiveRatingStrength {
    fn strength(&self, state: &RatingState) -> f64 {
        state.effective_rating(&self.config)
    }

    fn name(&self) -> &'static str {
        "effective_rating"
    }
}

/// Rating discounted by uncertainty: rating - γ·RD
#[derive(Debug, Clone)]
pub struct RiskAdjustedStrength {
    gamma: f64,
    config: RatingConfig,
}

impl RiskAdjustedStrength {
    pub fn new(gamma: f64, config: RatingConfig) -> Self {
        Self { gamma, config }
    }
}

impl StrengthMetric for RiskAdjustedStrength {
    fn strength(&self, state: &RatingState) -> f64 {
        state.rating(&self.config.scale) - self.gamma * state.rating_deviation(&self.config.scale)
    }

    fn name(&self) -> &'static str {
        "risk_adjusted"
    }
}

/// Build the metric selected by the balancing configuration
pub fn metric_from_config(
    balance: &BalanceConfig,
    rating: &RatingConfig,
) -> Box<dyn StrengthMetric> {
    match balance.strength {
        StrengthStrategy::EffectiveRating => Box::new(EffectiveRatingStrength::new(rating.clone())),
        StrengthStrategy::RiskAdjusted { gamma } => {
            Box::new(RiskAdjustedStrength::new(gamma, rating.clone()))
        }
    }
}

//! Team balancing configuration

use crate::config::non_negative_finite;
use crate::error::{RatingError, Result};
use serde::{Deserialize, Serialize};

/// Which per-player value the balancer treats as strength
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum StrengthStrategy {
    /// Deviation-blended long-term and recent-form rating
    #[default]
    EffectiveRating,
    /// rating - γ·deviation
    RiskAdjusted { gamma: f64 },
}

/// Configuration for the two-way partition search
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    /// Weight of the uncertainty gap in the objective
    pub lambda: f64,
    /// Hard constraint: the two strongest players end up on opposite sides
    pub separate_top_players: bool,
    /// For odd pools, the strongest player goes to the smaller side
    pub top_player_to_smaller_side: bool,
    /// Upper bound on candidate partitions examined
    pub max_combinations: usize,
    pub strength: StrengthStrategy,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            lambda: 0.8,
            separate_top_players: true,
            top_player_to_smaller_side: true,
            max_combinations: 10_000,
            strength: StrengthStrategy::EffectiveRating,
        }
    }
}

impl BalanceConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !non_negative_finite(self.lambda) {
            return Err(RatingError::config("Lambda must be a non-negative number").into());
        }

        if self.max_combinations == 0 {
            return Err(RatingError::config("Combination budget must be non-zero").into());
        }

        if let StrengthStrategy::RiskAdjusted { gamma } = self.strength {
            if !non_negative_finite(gamma) {
                return Err(RatingError::config("Gamma must be non-negative").into());
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_config_default() {
        let config = BalanceConfig::default();
        assert_eq!(config.lambda, 0.8);
        assert!(config.separate_top_players);
        assert!(config.top_player_to_smaller_side);
        assert_eq!(config.max_combinations, 10_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_balance_config_validation() {
        let mut config = BalanceConfig::default();
        config.max_combinations = 0;
        assert!(config.validate().is_err());

        config = BalanceConfig::default();
        config.lambda = -1.0;
        assert!(config.validate().is_err());

        config = BalanceConfig::default();
        config.strength = StrengthStrategy::RiskAdjusted { gamma: -0.5 };
        assert!(config.validate().is_err());

        config = BalanceConfig::default();
        config.strength = StrengthStrategy::RiskAdjusted { gamma: f64::NAN };
        assert!(config.validate().is_err());
    }
}

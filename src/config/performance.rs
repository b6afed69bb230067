//! Performance weighting configuration

use crate::config::{non_negative_finite, positive_finite};
use crate::error::{RatingError, Result};
use serde::{Deserialize, Serialize};

/// Which formulation turns a z-score into a rating-change multiplier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalingStrategy {
    /// f = clamp(1 + β·sign(Δμ)·z, fMin, fMax)
    #[default]
    SignAware,
    /// w = clamp(1 + α·z, wMin, wMax), renormalized to a team mean of 1
    Weighted,
}

/// Performance weighting parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    pub strategy: ScalingStrategy,
    /// Sensitivity of the sign-aware factor
    pub beta: f64,
    pub min_factor: f64,
    pub max_factor: f64,
    /// Added to the team standard deviation so identical scores don't divide by zero
    pub epsilon: f64,
    /// Sensitivity of the weighted model
    pub alpha: f64,
    pub min_weight: f64,
    pub max_weight: f64,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            strategy: ScalingStrategy::SignAware,
            beta: 0.2,
            min_factor: 0.5,
            max_factor: 1.5,
            epsilon: 1e-6,
            alpha: 0.2,
            min_weight: 0.5,
            max_weight: 1.5,
        }
    }
}

impl PerformanceConfig {
    /// Create conservative configuration (performance matters less)
    pub fn conservative() -> Self {
        Self {
            beta: 0.15,
            alpha: 0.15,
            ..Self::default()
        }
    }

    /// Create aggressive configuration (performance matters more)
    pub fn aggressive() -> Self {
        Self {
            beta: 0.30,
            alpha: 0.30,
            ..Self::default()
        }
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !non_negative_finite(self.beta) || !non_negative_finite(self.alpha) {
            return Err(RatingError::config("Performance sensitivity must be non-negative").into());
        }

        if !positive_finite(self.min_factor)
            || !self.max_factor.is_finite()
            || self.min_factor > self.max_factor
        {
            return Err(RatingError::config(format!(
                "Scaling factor bounds are invalid: [{}, {}]",
                self.min_factor, self.max_factor
            ))
            .into());
        }

        if !positive_finite(self.min_weight)
            || !self.max_weight.is_finite()
            || self.min_weight > self.max_weight
        {
            return Err(RatingError::config(format!(
                "Weight bounds are invalid: [{}, {}]",
                self.min_weight, self.max_weight
            ))
            .into());
        }

        if !positive_finite(self.epsilon) {
            return Err(RatingError::config("Epsilon must be positive").into());
        }

        Ok(())
    }
}

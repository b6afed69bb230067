//! Performance scaling strategies
//!
//! A scaler turns a player's team-relative z-score, together with the pending
//! unscaled rating change, into a multiplier on that change. It only modulates
//! magnitude: the direction of a rating change always comes from the match
//! outcome.

use crate::config::{PerformanceConfig, ScalingStrategy};

/// Sign of a pending rating change, with exact zero mapped to 0
pub fn change_sign(pending_change: f64) -> f64 {
    if pending_change > 0.0 {
        1.0
    } else if pending_change < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// f = clamp(1 + β·sign(Δμ)·z, fMin, fMax)
pub fn scaling_factor(z_score: f64, pending_change: f64, beta: f64, f_min: f64, f_max: f64) -> f64 {
    (1.0 + beta * change_sign(pending_change) * z_score).clamp(f_min, f_max)
}

/// Trait for performance scaling strategies
#[cfg_attr(test, mockall::automock)]
pub trait PerformanceScaler: Send + Sync {
    /// Multiplier for one player's pending rating change
    fn scaling_factor(&self, z_score: f64, pending_change: f64) -> f64;

    /// Multipliers for a whole team, in roster order.
    ///
    /// The default applies [`PerformanceScaler::scaling_factor`] per player;
    /// strategies that need the whole team override it.
    fn team_factors(&self, z_scores: &[f64], pending_changes: &[f64]) -> Vec<f64> {
        z_scores
            .iter()
            .zip(pending_changes)
            .map(|(z, change)| self.scaling_factor(*z, *change))
            .collect()
    }

    /// Strategy name for logging
    fn name(&self) -> &'static str;
}

/// Sign-aware scaling: above-average players gain more on wins and lose less on losses
#[derive(Debug, Clone)]
pub struct SignAwareScaler {
    pub beta: f64,
    pub min_factor: f64,
    pub max_factor: f64,
}

impl SignAwareScaler {
    pub fn from_config(config: &PerformanceConfig) -> Self {
        Self {
            beta: config.beta,
            min_factor: config.min_factor,
            max_factor: config.max_factor,
        }
    }
}

impl Default for SignAwareScaler {
    fn default() -> Self {
        Self::from_config(&PerformanceConfig::default())
    }
}

impl PerformanceScaler for SignAwareScaler {
    fn scaling_factor(&self, z_score: f64, pending_change: f64) -> f64 {
        scaling_factor(
            z_score,
            pending_change,
            self.beta,
            self.min_factor,
            self.max_factor,
        )
    }

    fn name(&self) -> &'static str {
        "sign_aware"
    }
}

/// Clamp-and-renormalize weights: w = clamp(1 + α·z), rescaled to a team mean of 1.
///
/// Ignores the direction of the pending change, so a strong performer's
/// loss is amplified just like their gain.
#[derive(Debug, Clone)]
pub struct WeightedScaler {
    pub alpha: f64,
    pub min_weight: f64,
    pub max_weight: f64,
}

impl WeightedScaler {
    pub fn from_config(config: &PerformanceConfig) -> Self {
        Self {
            alpha: config.alpha,
            min_weight: config.min_weight,
            max_weight: config.max_weight,
        }
    }
}

impl PerformanceScaler for WeightedScaler {
    fn scaling_factor(&self, z_score: f64, _pending_change: f64) -> f64 {
        (1.0 + self.alpha * z_score).clamp(self.min_weight, self.max_weight)
    }

    fn team_factors(&self, z_scores: &[f64], pending_changes: &[f64]) -> Vec<f64> {
        let clamped: Vec<f64> = z_scores
            .iter()
            .zip(pending_changes)
            .map(|(z, change)| self.scaling_factor(*z, *change))
            .collect();

        let sum: f64 = clamped.iter().sum();
        if clamped.is_empty() || sum <= 0.0 {
            return clamped;
        }

        let normalization = clamped.len() as f64 / sum;
        clamped.into_iter().map(|w| w * normalization).collect()
    }

    fn name(&self) -> &'static str {
        "weighted"
    }
}

/// Build the scaler selected by configuration
pub fn scaler_from_config(config: &PerformanceConfig) -> Box<dyn PerformanceScaler> {
    match config.strategy {
        ScalingStrategy::SignAware => Box::new(SignAwareScaler::from_config(config)),
        ScalingStrategy::Weighted => Box::new(WeightedScaler::from_config(config)),
    }
}

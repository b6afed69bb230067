//! Rating system configuration
//!
//! Glicko-2 parameters, public-scale conversion, recent-performance tracking and
//! inactivity decay settings. Every engine call receives these by reference;
//! nothing here is global.

use crate::config::{non_negative_finite, positive_finite};
use crate::error::{RatingError, Result};
use serde::{Deserialize, Serialize};

/// Conversion between the internal Glicko-2 scale and the public rating scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingScale {
    /// Points per internal unit (173.7178 for classic Glicko)
    pub scale: f64,
    /// Public rating that maps to internal mean 0
    pub base: f64,
}

impl Default for RatingScale {
    fn default() -> Self {
        Self {
            scale: 173.7178,
            base: 1400.0,
        }
    }
}

impl RatingScale {
    pub fn to_public_rating(&self, mean: f64) -> f64 {
        mean * self.scale + self.base
    }

    pub fn to_public_deviation(&self, deviation: f64) -> f64 {
        deviation * self.scale
    }

    pub fn to_internal_mean(&self, rating: f64) -> f64 {
        (rating - self.base) / self.scale
    }

    pub fn to_internal_deviation(&self, deviation: f64) -> f64 {
        deviation / self.scale
    }
}

/// Rolling recent-performance settings used by the effective rating
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentPerformanceConfig {
    /// Number of games the EMA behaves like once warmed up
    pub target_window: u32,
    /// Rating points per 1σ of recent performance
    pub perf_to_rating: f64,
    /// Blend constant C in RD²/(RD²+C²)
    pub rd_scale: f64,
    /// Z-scores are clipped to ±max_z before entering the EMA
    pub max_z: f64,
    /// Absolute ceiling for the performance boost, in rating points
    pub max_boost: f64,
}

impl Default for RecentPerformanceConfig {
    fn default() -> Self {
        Self {
            target_window: 10,
            perf_to_rating: 80.0,
            rd_scale: 80.0,
            max_z: 3.0,
            max_boost: 200.0,
        }
    }
}

/// Inactivity decay settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DecayConfig {
    /// Rounds in the recent window needed to count as active
    pub activity_threshold: u32,
    /// Length of one rating period in days
    pub period_length_days: f64,
}

impl Default for DecayConfig {
    fn default() -> Self {
        Self {
            activity_threshold: 3,
            period_length_days: 7.0,
        }
    }
}

/// Team Glicko-2 configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    pub scale: RatingScale,
    /// Initial public deviation for unseen players
    pub initial_deviation: f64,
    /// Initial volatility for unseen players
    pub initial_volatility: f64,
    /// Public deviation ceiling applied by decay
    pub max_deviation: f64,
    /// System constant τ, constrains volatility change
    pub tau: f64,
    /// Bracket width at which the volatility solver stops
    pub convergence_tolerance: f64,
    /// Expected-score exponent is clamped to ±this value
    pub max_exponent: f64,
    /// Whether |μ' - μ| is limited per match
    pub clamp_mean_change: bool,
    /// Maximum |μ' - μ| per match on the internal scale
    pub max_mean_change: f64,
    /// Whether match processing also feeds the recent-performance EMA
    pub track_recent_performance: bool,
    pub recent: RecentPerformanceConfig,
    pub decay: DecayConfig,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            scale: RatingScale::default(),
            initial_deviation: 350.0,
            initial_volatility: 0.06,
            max_deviation: 350.0,
            tau: 0.5,
            convergence_tolerance: 0.000001,
            max_exponent: 30.0,
            clamp_mean_change: true,
            // roughly 300 public points
            max_mean_change: 1.73,
            track_recent_performance: true,
            recent: RecentPerformanceConfig::default(),
            decay: DecayConfig::default(),
        }
    }
}

impl RatingConfig {
    /// Maximum deviation on the internal scale
    pub fn max_internal_deviation(&self) -> f64 {
        self.scale.to_internal_deviation(self.max_deviation)
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !positive_finite(self.scale.scale) || !self.scale.base.is_finite() {
            return Err(RatingError::config("Rating scale must be positive and base finite").into());
        }

        if !positive_finite(self.initial_deviation) || !positive_finite(self.max_deviation) {
            return Err(RatingError::config("Deviations must be positive").into());
        }

        if self.initial_deviation > self.max_deviation {
            return Err(RatingError::config(
                "Initial deviation cannot exceed the maximum deviation",
            )
            .into());
        }

        if !positive_finite(self.initial_volatility) {
            return Err(RatingError::config("Initial volatility must be positive").into());
        }

        if !positive_finite(self.tau) {
            return Err(RatingError::config("Tau must be positive").into());
        }

        if !positive_finite(self.convergence_tolerance) {
            return Err(RatingError::config("Convergence tolerance must be positive").into());
        }

        if !positive_finite(self.max_exponent) {
            return Err(RatingError::config("Exponent clamp must be positive").into());
        }

        if self.clamp_mean_change && !positive_finite(self.max_mean_change) {
            return Err(RatingError::config("Maximum per-match change must be positive").into());
        }

        if self.recent.target_window == 0 {
            return Err(RatingError::config("Recent performance window must be non-zero").into());
        }

        if !positive_finite(self.recent.max_z) || !positive_finite(self.recent.rd_scale) {
            return Err(
                RatingError::config("Recent performance clip and RD scale must be positive").into(),
            );
        }

        if !non_negative_finite(self.recent.max_boost) || !self.recent.perf_to_rating.is_finite() {
            return Err(RatingError::config(
                "Recent performance boost cap must be non-negative and conversion finite",
            )
            .into());
        }

        if !positive_finite(self.decay.period_length_days) {
            return Err(RatingError::config("Decay period length must be positive").into());
        }

        Ok(())
    }
}

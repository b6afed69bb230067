//! Per-player Glicko-2 rating state
//!
//! A [`RatingState`] keeps the three Glicko-2 variables on the internal scale
//! plus a rolling summary of recent match performance. All operations return
//! new values; a state is never modified through a shared reference.

use crate::config::{DecayConfig, RatingConfig, RatingScale, RecentPerformanceConfig};
use crate::error::{RatingError, Result};
use crate::utils::days_between;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Glicko-2 discounting factor for an opponent with the given internal deviation
pub fn g_factor(deviation: f64) -> f64 {
    1.0 / (1.0 + 3.0 * deviation * deviation / (PI * PI)).sqrt()
}

/// Expected score of `mean` against `opponent_mean`, discounted by `opponent_g`.
///
/// The exponent is clamped to ±`max_exponent` so the result stays strictly
/// inside (0, 1) for any finite input.
pub fn expected_score(mean: f64, opponent_mean: f64, opponent_g: f64, max_exponent: f64) -> f64 {
    let exponent = (-opponent_g * (mean - opponent_mean)).clamp(-max_exponent, max_exponent);
    1.0 / (1.0 + exponent.exp())
}

/// Rating information for a player, on the internal Glicko-2 scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingState {
    /// μ
    pub mean: f64,
    /// φ, always positive
    pub deviation: f64,
    /// σ, always positive
    pub volatility: f64,
    /// EMA of recent match z-scores
    pub recent_performance_ema: f64,
    /// Number of matches folded into the EMA
    pub recent_performance_games: u32,
}

impl RatingState {
    /// Create a state from internal-scale values
    pub fn new(mean: f64, deviation: f64, volatility: f64) -> Result<Self> {
        if !mean.is_finite() {
            return Err(RatingError::invalid(format!("Mean must be finite, got {}", mean)).into());
        }
        if !(deviation > 0.0) || !deviation.is_finite() {
            return Err(RatingError::invalid(format!(
                "Deviation must be positive, got {}",
                deviation
            ))
            .into());
        }
        if !(volatility > 0.0) || !volatility.is_finite() {
            return Err(RatingError::invalid(format!(
                "Volatility must be positive, got {}",
                volatility
            ))
            .into());
        }

        Ok(Self {
            mean,
            deviation,
            volatility,
            recent_performance_ema: 0.0,
            recent_performance_games: 0,
        })
    }

    /// Create a state from public-scale rating and deviation
    pub fn from_public(
        rating: f64,
        rating_deviation: f64,
        volatility: f64,
        scale: &RatingScale,
    ) -> Result<Self> {
        Self::new(
            scale.to_internal_mean(rating),
            scale.to_internal_deviation(rating_deviation),
            volatility,
        )
    }

    /// Default state for a player seen for the first time
    pub fn initial(config: &RatingConfig) -> Self {
        Self {
            mean: 0.0,
            deviation: config.scale.to_internal_deviation(config.initial_deviation),
            volatility: config.initial_volatility,
            recent_performance_ema: 0.0,
            recent_performance_games: 0,
        }
    }

    /// Public rating
    pub fn rating(&self, scale: &RatingScale) -> f64 {
        scale.to_public_rating(self.mean)
    }

    /// Public rating deviation
    pub fn rating_deviation(&self, scale: &RatingScale) -> f64 {
        scale.to_public_deviation(self.deviation)
    }

    /// g(φ) of this player when acting as an opponent
    pub fn compute_g(&self) -> f64 {
        g_factor(self.deviation)
    }

    /// Expected score against an opponent of mean `opponent_mean` and factor `opponent_g`
    pub fn compute_expected_score(
        &self,
        opponent_mean: f64,
        opponent_g: f64,
        config: &RatingConfig,
    ) -> f64 {
        expected_score(self.mean, opponent_mean, opponent_g, config.max_exponent)
    }

    /// Widen the deviation for each whole inactive rating period.
    ///
    /// Players with at least `activity_threshold` recent rounds are unchanged.
    /// Each period applies φ ← sqrt(φ² + σ²), stopping at `max_deviation`.
    pub fn decay_for_inactivity(
        &self,
        rounds_recently: u32,
        days_since_last_match: f64,
        decay: &DecayConfig,
        max_deviation: f64,
    ) -> Self {
        let mut decayed = *self;
        if rounds_recently >= decay.activity_threshold || days_since_last_match <= 0.0 {
            return decayed;
        }

        let periods = (days_since_last_match / decay.period_length_days).floor() as u64;
        for _ in 0..periods {
            let widened = (decayed.deviation.powi(2) + decayed.volatility.powi(2)).sqrt();
            if widened >= max_deviation {
                decayed.deviation = max_deviation;
                break;
            }
            // σ too small to move φ in f64; further periods change nothing
            if widened <= decayed.deviation {
                break;
            }
            decayed.deviation = widened;
        }

        decayed
    }

    /// Decay using timestamps instead of a precomputed day count
    pub fn decay_since(
        &self,
        rounds_recently: u32,
        last_played: DateTime<Utc>,
        now: DateTime<Utc>,
        config: &RatingConfig,
    ) -> Self {
        self.decay_for_inactivity(
            rounds_recently,
            days_between(last_played, now),
            &config.decay,
            config.max_internal_deviation(),
        )
    }

    /// Fold one match z-score into the recent-performance EMA
    pub fn update_recent_performance(
        &self,
        z_score: f64,
        recent: &RecentPerformanceConfig,
    ) -> Self {
        let clipped = z_score.clamp(-recent.max_z, recent.max_z);
        let games = self.recent_performance_games;
        let window = recent.target_window;

        let alpha = if games == 0 {
            1.0
        } else if games < window {
            // Running average until the window fills
            1.0 / (games as f64 + 1.0)
        } else {
            2.0 / (window as f64 + 1.0)
        };

        Self {
            recent_performance_ema: (1.0 - alpha) * self.recent_performance_ema + alpha * clipped,
            recent_performance_games: games.saturating_add(1),
            ..*self
        }
    }

    /// Public rating plus the capped recent-performance boost
    pub fn recent_rating(&self, config: &RatingConfig) -> f64 {
        let rd = self.rating_deviation(&config.scale);
        let max_boost = (2.0 * rd).min(config.recent.max_boost);
        let boost = (self.recent_performance_ema * config.recent.perf_to_rating)
            .clamp(-max_boost, max_boost);
        self.rating(&config.scale) + boost
    }

    /// Blend of long-term rating and recent rating, weighted by uncertainty.
    ///
    /// Weight is 0.5·RD²/(RD²+C²), so recent form never fully overrides the
    /// long-term estimate.
    pub fn effective_rating(&self, config: &RatingConfig) -> f64 {
        let long_term = self.rating(&config.scale);
        let recent = self.recent_rating(config);
        let rd_squared = self.rating_deviation(&config.scale).powi(2);
        let c_squared = config.recent.rd_scale.powi(2);
        let weight = 0.5 * rd_squared / (rd_squared + c_squared);

        long_term + weight * (recent - long_term)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn state(rating: f64, rd: f64) -> RatingState {
        RatingState::from_public(rating, rd, 0.06, &RatingScale::default()).unwrap()
    }

    #[test]
    fn test_initial_state() {
        let config = RatingConfig::default();
        let initial = RatingState::initial(&config);
        assert_eq!(initial.rating(&config.scale), 1400.0);
        assert!((initial.rating_deviation(&config.scale) - 350.0).abs() < 1e-9);
        assert_eq!(initial.volatility, 0.06);
        assert_eq!(initial.recent_performance_games, 0);
    }

    #[test]
    fn test_rejects_non_positive_deviation() {
        let scale = RatingScale::default();
        assert!(RatingState::from_public(1500.0, 0.0, 0.06, &scale).is_err());
        assert!(RatingState::from_public(1500.0, 100.0, 0.0, &scale).is_err());
        assert!(RatingState::from_public(f64::NAN, 100.0, 0.06, &scale).is_err());
    }

    #[test]
    fn test_g_decreases_with_deviation() {
        assert!((g_factor(0.0) - 1.0).abs() < 1e-12);
        assert!(state(1500.0, 50.0).compute_g() > state(1500.0, 300.0).compute_g());
    }

    #[test]
    fn test_expected_score_bounds() {
        let config = RatingConfig::default();
        let even = state(1500.0, 200.0);
        assert!((even.compute_expected_score(even.mean, 1.0, &config) - 0.5).abs() < 1e-12);

        // Extreme gaps stay strictly inside (0, 1)
        let strong = RatingState::new(1e6, 1.0, 0.06).unwrap();
        let high = strong.compute_expected_score(-1e6, 1.0, &config);
        let low = strong.compute_expected_score(1e7, 1.0, &config);
        assert!(high < 1.0 && high > 0.5);
        assert!(low > 0.0 && low < 0.5);
        assert!(1.0 - high > 0.0);
    }

    #[test]
    fn test_decay_skips_active_players() {
        let config = RatingConfig::default();
        let player = state(1500.0, 100.0);
        let decayed = player.decay_for_inactivity(
            5,
            60.0,
            &config.decay,
            config.max_internal_deviation(),
        );
        assert_eq!(decayed, player);
    }

    #[test]
    fn test_decay_per_whole_period() {
        let config = RatingConfig::default();
        let player = state(1500.0, 100.0);

        let short = player.decay_for_inactivity(0, 6.9, &config.decay, config.max_internal_deviation());
        assert_eq!(short.deviation, player.deviation);

        let two = player.decay_for_inactivity(0, 14.5, &config.decay, config.max_internal_deviation());
        let expected = (player.deviation.powi(2) + 2.0 * player.volatility.powi(2)).sqrt();
        assert!((two.deviation - expected).abs() < 1e-12);
        assert_eq!(two.mean, player.mean);
    }

    #[test]
    fn test_decay_stops_when_volatility_negligible() {
        let config = RatingConfig::default();
        let player = RatingState::new(1.0, 1.0, 1e-12).unwrap();

        let decayed = player.decay_for_inactivity(
            0,
            f64::INFINITY,
            &config.decay,
            config.max_internal_deviation(),
        );
        assert_eq!(decayed.deviation, player.deviation);
    }

    #[test]
    fn test_decay_caps_at_max_deviation() {
        let config = RatingConfig::default();
        let player = RatingState::from_public(1500.0, 340.0, 0.5, &config.scale).unwrap();
        let decayed =
            player.decay_for_inactivity(0, 7.0 * 1000.0, &config.decay, config.max_internal_deviation());
        assert_eq!(decayed.deviation, config.max_internal_deviation());
    }

    #[test]
    fn test_decay_since_uses_timestamps() {
        let config = RatingConfig::default();
        let player = state(1500.0, 100.0);
        let now = Utc::now();
        let decayed = player.decay_since(0, now - chrono::Duration::days(21), now, &config);
        let expected = (player.deviation.powi(2) + 3.0 * player.volatility.powi(2)).sqrt();
        assert!((decayed.deviation - expected).abs() < 1e-9);
    }

    #[test]
    fn test_recent_performance_adaptive_smoothing() {
        let recent = RecentPerformanceConfig::default();
        let player = state(1500.0, 100.0);

        // First observation replaces outright, and is clipped
        let first = player.update_recent_performance(5.0, &recent);
        assert_eq!(first.recent_performance_ema, 3.0);
        assert_eq!(first.recent_performance_games, 1);

        // Running average during warm-up
        let second = first.update_recent_performance(1.0, &recent);
        assert!((second.recent_performance_ema - 2.0).abs() < 1e-12);

        // Fixed-window EMA once warmed up
        let mut warmed = player;
        for _ in 0..recent.target_window {
            warmed = warmed.update_recent_performance(0.0, &recent);
        }
        let next = warmed.update_recent_performance(1.0, &recent);
        let alpha = 2.0 / (recent.target_window as f64 + 1.0);
        assert!((next.recent_performance_ema - alpha).abs() < 1e-12);
    }

    #[test]
    fn test_effective_rating_blend() {
        let config = RatingConfig::default();
        let neutral = state(1500.0, 100.0);
        assert!((neutral.effective_rating(&config) - 1500.0).abs() < 1e-9);

        let hot = neutral.update_recent_performance(2.0, &config.recent);
        // Boost 160 (within the 200 cap), weight 0.5·100²/(100²+80²)
        let weight = 0.5 * 10_000.0 / (10_000.0 + 6_400.0);
        let expected = 1500.0 + weight * 160.0;
        assert!((hot.effective_rating(&config) - expected).abs() < 1e-6);
        assert!((hot.recent_rating(&config) - 1660.0).abs() < 1e-6);
    }

    #[test]
    fn test_recent_boost_capped_by_deviation() {
        let config = RatingConfig::default();
        let settled = state(1500.0, 30.0).update_recent_performance(3.0, &config.recent);
        // 240 boost capped at 2·RD = 60
        assert!((settled.recent_rating(&config) - 1560.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_public_round_trip(rating in 0.0f64..4000.0, rd in 1.0f64..500.0) {
            let scale = RatingScale::default();
            let converted = RatingState::from_public(rating, rd, 0.06, &scale).unwrap();
            prop_assert!((converted.rating(&scale) - rating).abs() < 1e-9);
            prop_assert!((converted.rating_deviation(&scale) - rd).abs() < 1e-9);
        }

        #[test]
        fn prop_expected_score_open_interval(mean in -1e4f64..1e4, opp in -1e4f64..1e4, g in 0.01f64..1.0) {
            let e = expected_score(mean, opp, g, 30.0);
            prop_assert!(e > 0.0 && e < 1.0);
        }
    }
}

//! Team-extended Glicko-2 match engine
//!
//! Every player is rated against the opposing team's aggregate as a single
//! opponent. The unscaled Glicko-2 mean change is then multiplied by a
//! performance factor derived from the player's z-score within their own team.

use crate::config::{PerformanceConfig, RatingConfig, SystemConfig};
use crate::error::{RatingError, Result};
use crate::performance::{scaler_from_config, team_z_scores, PerformanceScaler};
use crate::rating::aggregator::TeamAggregate;
use crate::rating::calculator::RatingCalculator;
use crate::rating::state::{g_factor, RatingState};
use crate::rating::volatility::VolatilityProblem;
use crate::types::{MatchParticipant, MatchRatingResult, RatingChange, TeamMatch, TeamSide};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Configuration of the match engine
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamGlicko2Config {
    pub rating: RatingConfig,
    pub performance: PerformanceConfig,
}

impl TeamGlicko2Config {
    /// Smaller performance influence on rating changes
    pub fn conservative() -> Self {
        Self {
            rating: RatingConfig::default(),
            performance: PerformanceConfig::conservative(),
        }
    }

    /// Larger performance influence on rating changes
    pub fn aggressive() -> Self {
        Self {
            rating: RatingConfig::default(),
            performance: PerformanceConfig::aggressive(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.rating.validate()?;
        self.performance.validate()
    }
}

impl From<&SystemConfig> for TeamGlicko2Config {
    fn from(config: &SystemConfig) -> Self {
        Self {
            rating: config.rating.clone(),
            performance: config.performance.clone(),
        }
    }
}

/// Intermediate Glicko-2 quantities for one player, before performance scaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnscaledUpdate {
    pub g: f64,
    pub expected_score: f64,
    pub variance: f64,
    pub delta: f64,
    /// σ'
    pub volatility: f64,
    /// min(φ', φ)
    pub deviation: f64,
    /// μ*
    pub mean: f64,
}

/// Team Glicko-2 rating calculator implementation
pub struct TeamGlicko2Calculator {
    config: TeamGlicko2Config,
    scaler: Box<dyn PerformanceScaler>,
}

impl std::fmt::Debug for TeamGlicko2Calculator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeamGlicko2Calculator")
            .field("config", &self.config)
            .field("scaler", &self.scaler.name())
            .finish()
    }
}

impl TeamGlicko2Calculator {
    /// Create a calculator using the scaler selected by configuration
    pub fn new(config: TeamGlicko2Config) -> Result<Self> {
        config.validate()?;
        let scaler = scaler_from_config(&config.performance);
        Ok(Self { config, scaler })
    }

    /// Create a calculator with an explicit scaling strategy
    pub fn with_scaler(
        config: TeamGlicko2Config,
        scaler: Box<dyn PerformanceScaler>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, scaler })
    }

    pub fn settings(&self) -> &TeamGlicko2Config {
        &self.config
    }

    /// Probability-like expected score of one roster against another
    pub fn expected_team_score(&self, team: &[RatingState], opponent: &[RatingState]) -> Result<f64> {
        let team = TeamAggregate::from_roster(team)?;
        let opponent = TeamAggregate::from_roster(opponent)?;
        let g = g_factor(opponent.deviation);
        Ok(crate::rating::state::expected_score(
            team.mean,
            opponent.mean,
            g,
            self.config.rating.max_exponent,
        ))
    }

    /// Glicko-2 update of one player against an aggregate opponent, before scaling
    pub fn unscaled_update(
        &self,
        player: &RatingState,
        opponent: &TeamAggregate,
        score: f64,
    ) -> Result<UnscaledUpdate> {
        let rating = &self.config.rating;

        let g = g_factor(opponent.deviation);
        let expected_score = player.compute_expected_score(opponent.mean, g, rating);
        let variance = 1.0 / (g * g * expected_score * (1.0 - expected_score));
        let delta = variance * g * (score - expected_score);

        let volatility = VolatilityProblem {
            volatility: player.volatility,
            deviation: player.deviation,
            delta,
            variance,
            tau: rating.tau,
        }
        .solve(rating.convergence_tolerance)?;

        let deviation_star = (player.deviation.powi(2) + volatility.powi(2)).sqrt();
        let deviation_prime = 1.0 / (1.0 / deviation_star.powi(2) + 1.0 / variance).sqrt();
        let mean = player.mean + deviation_prime.powi(2) * g * (score - expected_score);

        // Match processing never widens the emitted uncertainty; only decay does
        let deviation = deviation_prime.min(player.deviation);

        Ok(UnscaledUpdate {
            g,
            expected_score,
            variance,
            delta,
            volatility,
            deviation,
            mean,
        })
    }

    /// Scale the pending change, clamp it and build the new state
    fn scaled_state(
        &self,
        player: &RatingState,
        update: &UnscaledUpdate,
        factor: f64,
        z_score: f64,
    ) -> Result<RatingState> {
        let rating = &self.config.rating;

        let mut change = factor * (update.mean - player.mean);
        if rating.clamp_mean_change {
            change = change.clamp(-rating.max_mean_change, rating.max_mean_change);
        }

        let mut next = RatingState {
            mean: player.mean + change,
            deviation: update.deviation,
            volatility: update.volatility,
            ..*player
        };
        if rating.track_recent_performance {
            next = next.update_recent_performance(z_score, &rating.recent);
        }

        if !next.mean.is_finite() || !(next.deviation > 0.0) || !(next.volatility > 0.0) {
            return Err(RatingError::NumericalFailure {
                reason: format!("Update produced an invalid rating state: {:?}", next),
            }
            .into());
        }

        Ok(next)
    }

    /// Update a single player against an opposing aggregate given their z-score
    pub fn update_player(
        &self,
        player: &RatingState,
        opponent: &TeamAggregate,
        score: f64,
        z_score: f64,
    ) -> Result<RatingState> {
        if opponent.size == 0 {
            return Err(RatingError::invalid("Opponent team is empty").into());
        }
        let update = self.unscaled_update(player, opponent, score)?;
        let factor = self
            .scaler
            .scaling_factor(z_score, update.mean - player.mean);
        self.scaled_state(player, &update, factor, z_score)
    }

    fn update_team(
        &self,
        roster: &[MatchParticipant],
        side: TeamSide,
        opponent: &TeamAggregate,
        score: f64,
    ) -> Result<Vec<RatingChange>> {
        let performances: Vec<f64> = roster.iter().map(|p| p.performance).collect();
        let z_scores = team_z_scores(&performances, self.config.performance.epsilon)?;

        let updates = roster
            .iter()
            .map(|p| self.unscaled_update(&p.rating, opponent, score))
            .collect::<Result<Vec<_>>>()?;

        let pending: Vec<f64> = roster
            .iter()
            .zip(&updates)
            .map(|(p, u)| u.mean - p.rating.mean)
            .collect();
        let factors = self.scaler.team_factors(&z_scores, &pending);

        roster
            .iter()
            .zip(updates.iter())
            .zip(z_scores.iter().zip(factors.iter()))
            .map(|((participant, update), (&z_score, &factor))| {
                let new_rating = self.scaled_state(&participant.rating, update, factor, z_score)?;
                trace!(
                    player_id = %participant.player_id,
                    team = %side,
                    expected = update.expected_score,
                    z_score,
                    factor,
                    delta_mean = new_rating.mean - participant.rating.mean,
                    "Updated player rating"
                );
                Ok(RatingChange {
                    player_id: participant.player_id.clone(),
                    team: side,
                    old_rating: participant.rating,
                    new_rating,
                    z_score,
                    scaling_factor: factor,
                })
            })
            .collect()
    }
}

impl RatingCalculator for TeamGlicko2Calculator {
    fn process_match(&self, team_match: &TeamMatch) -> Result<MatchRatingResult> {
        team_match.validate()?;

        let team_a_aggregate = TeamAggregate::from_roster(team_match.team_a.iter().map(|p| &p.rating))?;
        let team_b_aggregate = TeamAggregate::from_roster(team_match.team_b.iter().map(|p| &p.rating))?;

        let team_a = self.update_team(
            &team_match.team_a,
            TeamSide::A,
            &team_b_aggregate,
            team_match.score_a,
        )?;
        let team_b = self.update_team(
            &team_match.team_b,
            TeamSide::B,
            &team_a_aggregate,
            team_match.score_b,
        )?;

        debug!(
            team_a_size = team_a.len(),
            team_b_size = team_b.len(),
            score_a = team_match.score_a,
            score_b = team_match.score_b,
            scaler = self.scaler.name(),
            "Processed team match"
        );

        Ok(MatchRatingResult {
            team_a,
            team_b,
            team_a_aggregate,
            team_b_aggregate,
        })
    }

    fn initial_rating(&self) -> RatingState {
        RatingState::initial(&self.config.rating)
    }

    fn config(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or(serde_json::Value::Null)
    }

    fn update_config(&mut self, config: serde_json::Value) -> Result<()> {
        let new_config: TeamGlicko2Config = serde_json::from_value(config).map_err(|e| {
            RatingError::ConfigurationError {
                message: format!("Invalid team Glicko-2 configuration: {}", e),
            }
        })?;

        new_config.validate()?;
        self.scaler = scaler_from_config(&new_config.performance);
        self.config = new_config;
        Ok(())
    }
}

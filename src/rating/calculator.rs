//! Rating calculator trait and implementations
//!
//! This module defines the interface for processing team matches and a
//! no-op implementation for dry runs.

use crate::error::RatingError;
use crate::rating::aggregator::TeamAggregate;
use crate::rating::state::RatingState;
use crate::types::{MatchParticipant, MatchRatingResult, RatingChange, TeamMatch, TeamSide};

/// Trait for calculating rating changes after team matches
pub trait RatingCalculator: Send + Sync {
    /// Calculate new rating states for every participant
    ///
    /// # Arguments
    /// * `team_match` - Both rosters with performance scores and outcome scores
    ///
    /// # Returns
    /// Result containing one rating change per participant, in roster order
    fn process_match(&self, team_match: &TeamMatch) -> crate::error::Result<MatchRatingResult>;

    /// Get the initial rating for new players
    fn initial_rating(&self) -> RatingState;

    /// Get current configuration as JSON
    fn config(&self) -> serde_json::Value;

    /// Update configuration from JSON
    fn update_config(&mut self, config: serde_json::Value) -> crate::error::Result<()>;
}

/// Rating calculator that leaves every state unchanged
#[derive(Debug, Clone)]
pub struct NoOpRatingCalculator {
    initial_rating: RatingState,
}

impl NoOpRatingCalculator {
    /// Create a new no-op rating calculator
    pub fn new(initial_rating: RatingState) -> Self {
        Self { initial_rating }
    }
}

impl Default for NoOpRatingCalculator {
    fn default() -> Self {
        Self::new(RatingState::initial(&crate::config::RatingConfig::default()))
    }
}

fn unchanged(roster: &[MatchParticipant], team: TeamSide) -> Vec<RatingChange> {
    roster
        .iter()
        .map(|p| RatingChange {
            player_id: p.player_id.clone(),
            team,
            old_rating: p.rating,
            new_rating: p.rating,
            z_score: 0.0,
            scaling_factor: 1.0,
        })
        .collect()
}

impl RatingCalculator for NoOpRatingCalculator {
    fn process_match(&self, team_match: &TeamMatch) -> crate::error::Result<MatchRatingResult> {
        team_match.validate()?;

        Ok(MatchRatingResult {
            team_a: unchanged(&team_match.team_a, TeamSide::A),
            team_b: unchanged(&team_match.team_b, TeamSide::B),
            team_a_aggregate: TeamAggregate::from_roster(team_match.team_a.iter().map(|p| &p.rating))?,
            team_b_aggregate: TeamAggregate::from_roster(team_match.team_b.iter().map(|p| &p.rating))?,
        })
    }

    fn initial_rating(&self) -> RatingState {
        self.initial_rating
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "no_op",
            "initial_mean": self.initial_rating.mean,
            "initial_deviation": self.initial_rating.deviation,
            "initial_volatility": self.initial_rating.volatility
        })
    }

    fn update_config(&mut self, config: serde_json::Value) -> crate::error::Result<()> {
        let field = |key: &str, current: f64| {
            config.get(key).and_then(|v| v.as_f64()).unwrap_or(current)
        };
        let current = self.initial_rating;

        self.initial_rating = RatingState::new(
            field("initial_mean", current.mean),
            field("initial_deviation", current.deviation),
            field("initial_volatility", current.volatility),
        )
        .map_err(|err| RatingError::config(err.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MatchOutcome;

    fn roster(ids: &[&str]) -> Vec<MatchParticipant> {
        ids.iter()
            .map(|id| MatchParticipant::new(*id, RatingState::new(0.2, 1.0, 0.06).unwrap(), 10.0))
            .collect()
    }

    #[test]
    fn test_noop_calculator() {
        let calculator = NoOpRatingCalculator::default();
        let team_match = TeamMatch::new(
            roster(&["a1", "a2"]),
            roster(&["b1", "b2"]),
            MatchOutcome::TeamAWins,
        );

        let result = calculator.process_match(&team_match).unwrap();
        assert_eq!(result.team_a.len(), 2);
        assert_eq!(result.team_b.len(), 2);
        assert!(result.changes().all(|c| c.old_rating == c.new_rating));
        assert_eq!(result.change_for("b2").unwrap().team, TeamSide::B);
    }

    #[test]
    fn test_noop_calculator_config() {
        let mut calculator = NoOpRatingCalculator::default();
        assert_eq!(calculator.initial_rating().mean, 0.0);

        calculator
            .update_config(serde_json::json!({
                "initial_mean": 0.5,
                "initial_deviation": 1.5
            }))
            .unwrap();

        let updated = calculator.initial_rating();
        assert_eq!(updated.mean, 0.5);
        assert_eq!(updated.deviation, 1.5);
        assert_eq!(calculator.config()["type"], "no_op");
    }

    #[test]
    fn test_noop_calculator_rejects_invalid_initial_state() {
        let mut calculator = NoOpRatingCalculator::default();
        let before = calculator.initial_rating();

        for bad in [-1.0, 0.0] {
            let err = calculator
                .update_config(serde_json::json!({ "initial_deviation": bad }))
                .unwrap_err();
            assert!(matches!(
                err.downcast_ref::<RatingError>(),
                Some(RatingError::ConfigurationError { .. })
            ));
        }

        let err = calculator
            .update_config(serde_json::json!({ "initial_mean": 0.5, "initial_volatility": -0.06 }))
            .unwrap_err();
        assert!(err.downcast_ref::<RatingError>().is_some());
        assert_eq!(calculator.initial_rating(), before);
    }

    #[test]
    fn test_empty_team_error() {
        let calculator = NoOpRatingCalculator::default();
        let team_match = TeamMatch::new(vec![], roster(&["b1"]), MatchOutcome::Draw);
        assert!(calculator.process_match(&team_match).is_err());
    }
}

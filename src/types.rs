//! Common types used by the rating and balancing engines

use crate::error::{RatingError, Result};
use crate::rating::aggregator::TeamAggregate;
use crate::rating::state::RatingState;
use serde::{Deserialize, Serialize};

/// Unique identifier for players
pub type PlayerId = String;

/// Which side of a two-team match or partition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TeamSide {
    A,
    B,
}

impl std::fmt::Display for TeamSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TeamSide::A => write!(f, "A"),
            TeamSide::B => write!(f, "B"),
        }
    }
}

/// Result of a match from team A's point of view
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MatchOutcome {
    TeamAWins,
    TeamBWins,
    Draw,
    /// Fractional split, scores for (A, B)
    Split { score_a: f64, score_b: f64 },
}

impl MatchOutcome {
    /// Outcome scores for (A, B)
    pub fn scores(&self) -> (f64, f64) {
        match *self {
            MatchOutcome::TeamAWins => (1.0, 0.0),
            MatchOutcome::TeamBWins => (0.0, 1.0),
            MatchOutcome::Draw => (0.5, 0.5),
            MatchOutcome::Split { score_a, score_b } => (score_a, score_b),
        }
    }
}

/// A player's rating snapshot and performance for one match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchParticipant {
    pub player_id: PlayerId,
    pub rating: RatingState,
    /// Caller-computed performance score, opaque to the engine
    pub performance: f64,
}

impl MatchParticipant {
    pub fn new(player_id: impl Into<PlayerId>, rating: RatingState, performance: f64) -> Self {
        Self {
            player_id: player_id.into(),
            rating,
            performance,
        }
    }
}

/// Two rosters and their outcome scores
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMatch {
    pub team_a: Vec<MatchParticipant>,
    pub team_b: Vec<MatchParticipant>,
    pub score_a: f64,
    pub score_b: f64,
}

impl TeamMatch {
    pub fn new(
        team_a: Vec<MatchParticipant>,
        team_b: Vec<MatchParticipant>,
        outcome: MatchOutcome,
    ) -> Self {
        let (score_a, score_b) = outcome.scores();
        Self {
            team_a,
            team_b,
            score_a,
            score_b,
        }
    }

    /// Reject empty rosters, out-of-range scores and non-finite performance
    pub fn validate(&self) -> Result<()> {
        for (side, roster) in [(TeamSide::A, &self.team_a), (TeamSide::B, &self.team_b)] {
            if roster.is_empty() {
                return Err(RatingError::invalid(format!("Team {} has no players", side)).into());
            }
            for participant in roster {
                if !participant.performance.is_finite() {
                    return Err(RatingError::invalid(format!(
                        "Performance for player {} must be finite",
                        participant.player_id
                    ))
                    .into());
                }
            }
        }

        for (side, score) in [(TeamSide::A, self.score_a), (TeamSide::B, self.score_b)] {
            if !(0.0..=1.0).contains(&score) {
                return Err(RatingError::invalid(format!(
                    "Outcome score for team {} must be within [0, 1], got {}",
                    side, score
                ))
                .into());
            }
        }

        Ok(())
    }
}

/// Rating change information for a player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingChange {
    pub player_id: PlayerId,
    pub team: TeamSide,
    pub old_rating: RatingState,
    pub new_rating: RatingState,
    /// Performance relative to teammates
    pub z_score: f64,
    /// Multiplier applied to the unscaled mean change
    pub scaling_factor: f64,
}

impl RatingChange {
    /// μ' − μ on the internal scale
    pub fn mean_delta(&self) -> f64 {
        self.new_rating.mean - self.old_rating.mean
    }
}

/// Output of processing one match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRatingResult {
    pub team_a: Vec<RatingChange>,
    pub team_b: Vec<RatingChange>,
    pub team_a_aggregate: TeamAggregate,
    pub team_b_aggregate: TeamAggregate,
}

impl MatchRatingResult {
    /// All changes, team A first
    pub fn changes(&self) -> impl Iterator<Item = &RatingChange> {
        self.team_a.iter().chain(self.team_b.iter())
    }

    pub fn change_for(&self, player_id: &str) -> Option<&RatingChange> {
        self.changes().find(|c| c.player_id == player_id)
    }

    /// Like [`MatchRatingResult::change_for`] but an unknown id is an error
    pub fn require_change(&self, player_id: &str) -> Result<&RatingChange> {
        self.change_for(player_id).ok_or_else(|| {
            RatingError::PlayerNotFound {
                player_id: player_id.to_string(),
            }
            .into()
        })
    }
}

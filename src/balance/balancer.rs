//! Constrained team balancer
//!
//! Splits a pool into two sides of sizes ⌊N/2⌋ and ⌈N/2⌉ by exhaustively
//! searching one side's membership, up to a candidate budget. The objective
//! combines the average-strength gap with the gap in size-normalized
//! root-sum-of-squares uncertainty.

use crate::balance::search::PartitionSearch;
use crate::balance::strength::{metric_from_config, StrengthMetric};
use crate::config::{BalanceConfig, RatingConfig};
use crate::error::{RatingError, Result};
use crate::rating::RatingState;
use crate::types::PlayerId;
use crate::utils::rating_difference;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, warn};

/// Objective values closer than this are treated as equal
const TIE_TOLERANCE: f64 = 1e-9;

/// A constraint that can be dropped when no partition satisfies it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceConstraint {
    SeparateTopPlayers,
    TopPlayerToSmallerSide,
}

/// How the returned assignment was found
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum BalanceStatus {
    /// Every candidate was examined
    Optimal,
    /// Best candidate among those examined before the budget ran out
    BudgetExhausted,
    /// No candidate honored every constraint; these were dropped
    Relaxed { dropped: Vec<BalanceConstraint> },
}

/// Result of balancing a pool, with the components of the objective
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamAssignment {
    /// Smaller side when the pool is odd
    pub team_a: Vec<PlayerId>,
    pub team_b: Vec<PlayerId>,
    pub objective: f64,
    /// |avg strength A − avg strength B|
    pub strength_gap: f64,
    /// |U_A/√|A| − U_B/√|B||, U being the root-sum-of-squares of member RDs.
    /// This is √(mean RD²) per side, not the mean RD, so one shaky player
    /// outweighs several settled ones.
    pub uncertainty_gap: f64,
    /// Average public rating gap, ignoring deviation
    pub raw_rating_gap: f64,
    pub team_a_strength: f64,
    pub team_b_strength: f64,
    pub team_a_uncertainty: f64,
    pub team_b_uncertainty: f64,
    pub candidates_examined: usize,
    pub status: BalanceStatus,
}

impl TeamAssignment {
    pub fn contains(&self, player_id: &str) -> bool {
        self.team_a.iter().chain(self.team_b.iter()).any(|id| id == player_id)
    }
}

#[derive(Debug)]
struct RankedPlayer<'a> {
    player_id: &'a PlayerId,
    strength: f64,
    rating: f64,
    deviation: f64,
}

#[derive(Debug, Clone, Copy, Default)]
struct SideTotals {
    size: usize,
    strength: f64,
    rating: f64,
    variance: f64,
}

impl SideTotals {
    fn add(&mut self, player: &RankedPlayer<'_>) {
        self.size += 1;
        self.strength += player.strength;
        self.rating += player.rating;
        self.variance += player.deviation * player.deviation;
    }

    fn uncertainty(&self) -> f64 {
        self.variance.sqrt()
    }

    fn average(&self, total: f64) -> f64 {
        if self.size == 0 {
            0.0
        } else {
            total / self.size as f64
        }
    }

    fn normalized_uncertainty(&self) -> f64 {
        if self.size == 0 {
            0.0
        } else {
            self.uncertainty() / (self.size as f64).sqrt()
        }
    }
}

#[derive(Debug, Clone)]
struct Candidate {
    members: Vec<bool>,
    objective: f64,
    strength_gap: f64,
    uncertainty_gap: f64,
    raw_rating_gap: f64,
    side_a: SideTotals,
    side_b: SideTotals,
}

impl Candidate {
    /// Lower objective first, then smaller raw-rating gap, then smaller uncertainty gap
    fn beats(&self, best: &Candidate) -> bool {
        for (mine, theirs) in [
            (self.objective, best.objective),
            (self.raw_rating_gap, best.raw_rating_gap),
            (self.uncertainty_gap, best.uncertainty_gap),
        ] {
            if mine < theirs - TIE_TOLERANCE {
                return true;
            }
            if mine > theirs + TIE_TOLERANCE {
                return false;
            }
        }
        false
    }
}

struct SearchOutcome {
    best: Option<Candidate>,
    examined: usize,
    exhausted: bool,
}

/// Team balancer over a pool of rated players
pub struct TeamBalancer {
    config: BalanceConfig,
    rating: RatingConfig,
    metric: Box<dyn StrengthMetric>,
}

impl std::fmt::Debug for TeamBalancer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeamBalancer")
            .field("config", &self.config)
            .field("metric", &self.metric.name())
            .finish()
    }
}

impl TeamBalancer {
    pub fn new(rating: RatingConfig, config: BalanceConfig) -> Result<Self> {
        rating.validate()?;
        config.validate()?;
        let metric = metric_from_config(&config, &rating);
        Ok(Self {
            config,
            rating,
            metric,
        })
    }

    /// Use a caller-supplied strength metric instead of the configured one
    pub fn with_metric(
        rating: RatingConfig,
        config: BalanceConfig,
        metric: Box<dyn StrengthMetric>,
    ) -> Result<Self> {
        rating.validate()?;
        config.validate()?;
        Ok(Self {
            config,
            rating,
            metric,
        })
    }

    pub fn config(&self) -> &BalanceConfig {
        &self.config
    }

    /// Split the pool into two teams
    pub fn balance(&self, pool: &[(PlayerId, RatingState)]) -> Result<TeamAssignment> {
        let ranked = self.rank(pool)?;
        let team_size = ranked.len() / 2;
        let uneven = ranked.len() % 2 != 0;

        let separate = self.config.separate_top_players;
        let pin_top = uneven && self.config.top_player_to_smaller_side;

        let mut outcome = self.search(&ranked, team_size, separate, pin_top);
        let mut status = if outcome.exhausted {
            warn!(
                pool_size = ranked.len(),
                budget = self.config.max_combinations,
                "Combination budget exhausted before the search completed"
            );
            BalanceStatus::BudgetExhausted
        } else {
            BalanceStatus::Optimal
        };

        if outcome.best.is_none() {
            let mut dropped = Vec::new();
            if separate {
                dropped.push(BalanceConstraint::SeparateTopPlayers);
            }
            if pin_top {
                dropped.push(BalanceConstraint::TopPlayerToSmallerSide);
            }
            warn!(?dropped, "No partition satisfied every constraint, relaxing");

            let examined = outcome.examined;
            outcome = self.search(&ranked, team_size, false, false);
            outcome.examined += examined;
            status = BalanceStatus::Relaxed { dropped };
        }

        let examined = outcome.examined;
        let best = outcome.best.ok_or_else(|| RatingError::NumericalFailure {
            reason: "Partition search produced no candidate".to_string(),
        })?;

        debug!(
            pool_size = ranked.len(),
            candidates = examined,
            objective = best.objective,
            strength_gap = best.strength_gap,
            uncertainty_gap = best.uncertainty_gap,
            metric = self.metric.name(),
            "Balanced teams"
        );

        Ok(self.assignment(&ranked, best, examined, status))
    }

    /// Validate the pool and sort it by descending strength
    fn rank<'a>(&self, pool: &'a [(PlayerId, RatingState)]) -> Result<Vec<RankedPlayer<'a>>> {
        if pool.len() < 2 {
            return Err(RatingError::invalid(format!(
                "Need at least 2 players to balance, got {}",
                pool.len()
            ))
            .into());
        }

        let mut seen = HashSet::with_capacity(pool.len());
        let mut ranked = Vec::with_capacity(pool.len());
        for (player_id, state) in pool {
            if !seen.insert(player_id.as_str()) {
                return Err(
                    RatingError::invalid(format!("Duplicate player id {} in pool", player_id))
                        .into(),
                );
            }

            let strength = self.metric.strength(state);
            if !strength.is_finite() {
                return Err(RatingError::invalid(format!(
                    "Strength for player {} is not finite",
                    player_id
                ))
                .into());
            }

            ranked.push(RankedPlayer {
                player_id,
                strength,
                rating: state.rating(&self.rating.scale),
                deviation: state.rating_deviation(&self.rating.scale),
            });
        }

        // Equal strengths fall back to id order so input order never matters
        ranked.sort_by(|a, b| {
            b.strength
                .partial_cmp(&a.strength)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.player_id.cmp(b.player_id))
        });

        Ok(ranked)
    }

    fn search(
        &self,
        ranked: &[RankedPlayer<'_>],
        team_size: usize,
        separate: bool,
        pin_top: bool,
    ) -> SearchOutcome {
        let mut candidates = if pin_top {
            PartitionSearch::with_top_pinned(ranked.len(), team_size, separate)
        } else {
            PartitionSearch::new(ranked.len(), team_size, separate)
        };

        let mut best: Option<Candidate> = None;
        let mut examined = 0;

        while examined < self.config.max_combinations {
            let Some(side_a) = candidates.next() else {
                return SearchOutcome {
                    best,
                    examined,
                    exhausted: false,
                };
            };
            examined += 1;

            let mut members = vec![false; ranked.len()];
            for &index in &side_a {
                members[index] = true;
            }

            // Only the complement can still hold both top players
            if separate && !members[0] && !members[1] {
                continue;
            }

            let candidate = self.evaluate(ranked, members);
            if best.as_ref().map_or(true, |b| candidate.beats(b)) {
                best = Some(candidate);
            }
        }

        let exhausted = candidates.next().is_some();
        SearchOutcome {
            best,
            examined,
            exhausted,
        }
    }

    fn evaluate(&self, ranked: &[RankedPlayer<'_>], members: Vec<bool>) -> Candidate {
        let mut side_a = SideTotals::default();
        let mut side_b = SideTotals::default();
        for (player, &on_a) in ranked.iter().zip(&members) {
            if on_a {
                side_a.add(player);
            } else {
                side_b.add(player);
            }
        }

        let strength_gap =
            rating_difference(side_a.average(side_a.strength), side_b.average(side_b.strength));
        let uncertainty_gap =
            (side_a.normalized_uncertainty() - side_b.normalized_uncertainty()).abs();
        let raw_rating_gap =
            rating_difference(side_a.average(side_a.rating), side_b.average(side_b.rating));

        Candidate {
            members,
            objective: strength_gap + self.config.lambda * uncertainty_gap,
            strength_gap,
            uncertainty_gap,
            raw_rating_gap,
            side_a,
            side_b,
        }
    }

    fn assignment(
        &self,
        ranked: &[RankedPlayer<'_>],
        best: Candidate,
        candidates_examined: usize,
        status: BalanceStatus,
    ) -> TeamAssignment {
        let mut team_a = Vec::with_capacity(best.side_a.size);
        let mut team_b = Vec::with_capacity(best.side_b.size);
        for (player, &on_a) in ranked.iter().zip(&best.members) {
            if on_a {
                team_a.push(player.player_id.clone());
            } else {
                team_b.push(player.player_id.clone());
            }
        }

        TeamAssignment {
            team_a,
            team_b,
            objective: best.objective,
            strength_gap: best.strength_gap,
            uncertainty_gap: best.uncertainty_gap,
            raw_rating_gap: best.raw_rating_gap,
            team_a_strength: best.side_a.strength,
            team_b_strength: best.side_b.strength,
            team_a_uncertainty: best.side_a.uncertainty(),
            team_b_uncertainty: best.side_b.uncertainty(),
            candidates_examined,
            status,
        }
    }
}

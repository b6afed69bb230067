//! Team-relative performance normalization
//!
//! Converts raw per-match performance numbers into z-scores measured against
//! teammates only. Scores from different teams are never mixed.

use crate::error::{RatingError, Result};
use crate::utils::{mean, population_std_dev};
use serde::{Deserialize, Serialize};

/// Mean and floored standard deviation of one team's performance scores
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamPerformanceStats {
    pub mean: f64,
    /// Population standard deviation plus ε, always positive
    pub std_dev: f64,
    pub team_size: usize,
}

/// One player's normalized performance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerPerformance {
    pub raw_score: f64,
    pub z_score: f64,
    pub clipped_z_score: f64,
}

/// Compute team statistics; `epsilon` is added to the standard deviation
pub fn compute_team_stats(scores: &[f64], epsilon: f64) -> Result<TeamPerformanceStats> {
    if scores.is_empty() {
        return Err(RatingError::invalid("No performance scores provided for team").into());
    }

    if let Some(bad) = scores.iter().find(|s| !s.is_finite()) {
        return Err(RatingError::invalid(format!(
            "Performance scores must be finite, got {}",
            bad
        ))
        .into());
    }

    let team_mean = mean(scores);
    Ok(TeamPerformanceStats {
        mean: team_mean,
        std_dev: population_std_dev(scores, team_mean) + epsilon,
        team_size: scores.len(),
    })
}

/// Standard deviations of `score` from the team mean
pub fn z_score(score: f64, stats: &TeamPerformanceStats) -> f64 {
    (score - stats.mean) / stats.std_dev
}

/// Clip a z-score to [-max_z, +max_z]
pub fn clip_z_score(z_score: f64, max_z: f64) -> f64 {
    z_score.clamp(-max_z, max_z)
}

/// Z-scores for every member of a team, in roster order
pub fn team_z_scores(scores: &[f64], epsilon: f64) -> Result<Vec<f64>> {
    let stats = compute_team_stats(scores, epsilon)?;
    Ok(scores.iter().map(|s| z_score(*s, &stats)).collect())
}

/// Normalize a team's scores, keeping raw, z and clipped z values
pub fn normalize_team(scores: &[f64], epsilon: f64, max_z: f64) -> Result<Vec<PlayerPerformance>> {
    let stats = compute_team_stats(scores, epsilon)?;
    Ok(scores
        .iter()
        .map(|&raw_score| {
            let z = z_score(raw_score, &stats);
            PlayerPerformance {
                raw_score,
                z_score: z,
                clipped_z_score: clip_z_score(z, max_z),
            }
        })
        .collect())
}

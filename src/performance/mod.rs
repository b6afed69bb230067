//! Per-player performance handling
//!
//! Raw performance scores are supplied by the caller as opaque numbers. This
//! module turns them into team-relative z-scores and then into bounded
//! multipliers on the Glicko-2 rating change.

pub mod normalizer;
pub mod scaling;

// Re-export commonly used types
pub use normalizer::{
    clip_z_score, compute_team_stats, normalize_team, team_z_scores, z_score, PlayerPerformance,
    TeamPerformanceStats,
};
pub use scaling::{
    scaler_from_config, scaling_factor, PerformanceScaler, SignAwareScaler, WeightedScaler,
};

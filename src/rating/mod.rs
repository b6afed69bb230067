//! Team-extended Glicko-2 rating system
//!
//! This module provides the per-player rating state, team aggregation, the
//! volatility solver and the match engine that combines them with
//! performance scaling.

pub mod aggregator;
pub mod calculator;
pub mod state;
pub mod team_glicko2;
pub mod volatility;

// Re-export commonly used types
pub use aggregator::TeamAggregate;
pub use calculator::{NoOpRatingCalculator, RatingCalculator};
pub use state::{expected_score, g_factor, RatingState};
pub use team_glicko2::{TeamGlicko2Calculator, TeamGlicko2Config, UnscaledUpdate};
pub use volatility::VolatilityProblem;

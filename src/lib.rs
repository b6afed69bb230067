//! Team Glicko - Team-extended Glicko-2 rating and team balancing
//!
//! This crate rates players in team matches against the opposing team's
//! aggregate, scales each change by the player's performance relative to
//! teammates, and splits player pools into balanced teams.

pub mod balance;
pub mod config;
pub mod error;
pub mod logging;
pub mod performance;
pub mod rating;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use balance::{BalanceStatus, TeamAssignment, TeamBalancer};
pub use config::SystemConfig;
pub use rating::{RatingCalculator, RatingState, TeamAggregate, TeamGlicko2Calculator};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

//! Team balancing for lobby formation
//!
//! Splits a pool of rated players into two sides with balanced strength and
//! uncertainty, optionally keeping the two strongest players apart.

pub mod balancer;
pub mod search;
pub mod strength;

// Re-export commonly used types
pub use balancer::{BalanceConstraint, BalanceStatus, TeamAssignment, TeamBalancer};
pub use search::PartitionSearch;
pub use strength::{metric_from_config, EffectiveRatingStrength, RiskAdjustedStrength, StrengthMetric};

//! Configuration management for the rating and balancing engines
//!
//! This module handles configuration loading from TOML files and environment
//! variables, validation, and default values. Engines take these values by
//! reference on every call; there is no global configuration state.

pub mod app;
pub mod balance;
pub mod performance;
pub mod rating;

// Re-export commonly used types
pub use app::{validate_config, SystemConfig};
pub use balance::{BalanceConfig, StrengthStrategy};
pub use performance::{PerformanceConfig, ScalingStrategy};
pub use rating::{DecayConfig, RatingConfig, RatingScale, RecentPerformanceConfig};

/// True for finite values strictly above zero; rejects NaN
pub(crate) fn positive_finite(value: f64) -> bool {
    value > 0.0 && value.is_finite()
}

/// True for finite values at or above zero; rejects NaN
pub(crate) fn non_negative_finite(value: f64) -> bool {
    value >= 0.0 && value.is_finite()
}

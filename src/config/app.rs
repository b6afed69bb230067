//! Top-level configuration
//!
//! Bundles the rating, performance and balancing sections into a single
//! immutable value. It can be loaded from a TOML file or overlaid from
//! `TEAM_GLICKO_*` environment variables, and is validated before use.

use crate::config::{
    BalanceConfig, PerformanceConfig, RatingConfig, ScalingStrategy, StrengthStrategy,
};
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

/// Complete engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    pub rating: RatingConfig,
    pub performance: PerformanceConfig,
    pub balance: BalanceConfig,
}

impl SystemConfig {
    /// Load configuration from a TOML file; missing keys fall back to defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("Failed to load config file {}", path.display()))
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: SystemConfig =
            toml::from_str(raw).map_err(|e| anyhow!("Invalid TOML configuration: {}", e))?;
        validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from environment variables with fallback to defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Overlay values from an arbitrary key lookup onto the defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        // Rating settings
        if let Some(base) = parse_var(&lookup, "TEAM_GLICKO_BASE_RATING")? {
            config.rating.scale.base = base;
        }
        if let Some(deviation) = parse_var(&lookup, "TEAM_GLICKO_INITIAL_DEVIATION")? {
            config.rating.initial_deviation = deviation;
        }
        if let Some(volatility) = parse_var(&lookup, "TEAM_GLICKO_INITIAL_VOLATILITY")? {
            config.rating.initial_volatility = volatility;
        }
        if let Some(max_deviation) = parse_var(&lookup, "TEAM_GLICKO_MAX_DEVIATION")? {
            config.rating.max_deviation = max_deviation;
        }
        if let Some(tau) = parse_var(&lookup, "TEAM_GLICKO_TAU")? {
            config.rating.tau = tau;
        }
        if let Some(clamp) = parse_var(&lookup, "TEAM_GLICKO_CLAMP_MEAN_CHANGE")? {
            config.rating.clamp_mean_change = clamp;
        }
        if let Some(max_change) = parse_var(&lookup, "TEAM_GLICKO_MAX_MEAN_CHANGE")? {
            config.rating.max_mean_change = max_change;
        }

        // Performance settings
        if let Some(strategy) = lookup("TEAM_GLICKO_SCALING_STRATEGY") {
            config.performance.strategy = match strategy.to_lowercase().as_str() {
                "sign_aware" => ScalingStrategy::SignAware,
                "weighted" => ScalingStrategy::Weighted,
                other => return Err(anyhow!("Invalid TEAM_GLICKO_SCALING_STRATEGY value: {}", other)),
            };
        }
        if let Some(beta) = parse_var(&lookup, "TEAM_GLICKO_BETA")? {
            config.performance.beta = beta;
        }
        if let Some(min_factor) = parse_var(&lookup, "TEAM_GLICKO_MIN_FACTOR")? {
            config.performance.min_factor = min_factor;
        }
        if let Some(max_factor) = parse_var(&lookup, "TEAM_GLICKO_MAX_FACTOR")? {
            config.performance.max_factor = max_factor;
        }

        // Balance settings
        if let Some(lambda) = parse_var(&lookup, "TEAM_GLICKO_LAMBDA")? {
            config.balance.lambda = lambda;
        }
        if let Some(separate) = parse_var(&lookup, "TEAM_GLICKO_SEPARATE_TOP_PLAYERS")? {
            config.balance.separate_top_players = separate;
        }
        if let Some(smaller) = parse_var(&lookup, "TEAM_GLICKO_TOP_PLAYER_TO_SMALLER_SIDE")? {
            config.balance.top_player_to_smaller_side = smaller;
        }
        if let Some(budget) = parse_var(&lookup, "TEAM_GLICKO_MAX_COMBINATIONS")? {
            config.balance.max_combinations = budget;
        }
        if let Some(gamma) = parse_var::<_, f64>(&lookup, "TEAM_GLICKO_RISK_GAMMA")? {
            config.balance.strength = StrengthStrategy::RiskAdjusted { gamma };
        }

        validate_config(&config)?;
        Ok(config)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("Invalid {} value: {}", key, value)),
        None => Ok(None),
    }
}

/// Validate configuration values
pub fn validate_config(config: &SystemConfig) -> Result<()> {
    config.rating.validate()?;
    config.performance.validate()?;
    config.balance.validate()?;
    Ok(())
}

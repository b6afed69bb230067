//! Test fixtures shared by the integration tests

#![allow(dead_code)]

use team_glicko::config::RatingConfig;
use team_glicko::rating::RatingState;
use team_glicko::types::{MatchParticipant, PlayerId};

/// Rating state from public rating and deviation with default volatility
pub fn rated(rating: f64, deviation: f64) -> RatingState {
    RatingState::from_public(rating, deviation, 0.06, &RatingConfig::default().scale)
        .expect("valid public rating")
}

/// Build a roster from (rating, deviation, performance) triples, ids `{prefix}{index}`
pub fn create_roster(prefix: &str, entries: &[(f64, f64, f64)]) -> Vec<MatchParticipant> {
    entries
        .iter()
        .enumerate()
        .map(|(i, &(rating, deviation, performance))| {
            MatchParticipant::new(
                format!("{}{}", prefix, i),
                rated(rating, deviation),
                performance,
            )
        })
        .collect()
}

/// A roster of `size` identical players with descending performance
pub fn create_uniform_roster(
    prefix: &str,
    size: usize,
    rating: f64,
    deviation: f64,
) -> Vec<MatchParticipant> {
    let entries: Vec<_> = (0..size)
        .map(|i| (rating, deviation, 100.0 * (size - i) as f64))
        .collect();
    create_roster(prefix, &entries)
}

/// Balancing pool from (id, rating, deviation) triples
pub fn create_pool(entries: &[(&str, f64, f64)]) -> Vec<(PlayerId, RatingState)> {
    entries
        .iter()
        .map(|&(id, rating, deviation)| (id.to_string(), rated(rating, deviation)))
        .collect()
}

/// Two standout players plus six near 1500
pub fn create_lobby_pool() -> Vec<(PlayerId, RatingState)> {
    create_pool(&[
        ("star", 2200.0, 100.0),
        ("second", 2150.0, 110.0),
        ("p1", 1550.0, 150.0),
        ("p2", 1520.0, 150.0),
        ("p3", 1505.0, 150.0),
        ("p4", 1495.0, 150.0),
        ("p5", 1480.0, 150.0),
        ("p6", 1450.0, 150.0),
    ])
}

/// Sample TOML configuration exercising every section
pub const SAMPLE_CONFIG_TOML: &str = r#"
[rating]
tau = 0.4
initial_deviation = 300.0
max_deviation = 300.0

[rating.scale]
base = 1500.0

[performance]
strategy = "weighted"
alpha = 0.25

[balance]
lambda = 0.5
max_combinations = 500

[balance.strength]
kind = "risk_adjusted"
gamma = 0.5
"#;

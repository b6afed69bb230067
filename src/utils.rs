//! Utility functions shared by the rating and balancing engines

use chrono::{DateTime, Utc};

/// Fractional days elapsed from `earlier` to `later`, never negative
pub fn days_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    let elapsed = later.signed_duration_since(earlier);
    (elapsed.num_milliseconds() as f64 / 86_400_000.0).max(0.0)
}

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation around a precomputed mean
pub fn population_std_dev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Calculate the absolute difference between two ratings
pub fn rating_difference(rating1: f64, rating2: f64) -> f64 {
    (rating1 - rating2).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_days_between() {
        let now = Utc::now();
        assert_eq!(days_between(now - chrono::Duration::hours(36), now), 1.5);
        assert_eq!(days_between(now, now - chrono::Duration::days(3)), 0.0);
    }

    #[test]
    fn test_mean_and_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        let m = mean(&values);
        assert_eq!(m, 5.0);
        assert_eq!(population_std_dev(&values, m), 2.0);
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(population_std_dev(&[], 0.0), 0.0);
    }

    #[test]
    fn test_rating_difference() {
        assert_eq!(rating_difference(1500.0, 1400.0), 100.0);
        assert_eq!(rating_difference(1400.0, 1500.0), 100.0);
        assert_eq!(rating_difference(1500.0, 1500.0), 0.0);
    }
}

//! Team rating aggregation
//!
//! Reduces a roster to a single virtual opponent. The team mean is the plain
//! average of member means; the team deviation is root-sum-of-squares divided
//! by team size, so larger teams carry less aggregate uncertainty.

use crate::error::{RatingError, Result};
use crate::rating::state::RatingState;
use serde::{Deserialize, Serialize};

/// A team represented as one opponent on the internal scale
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TeamAggregate {
    pub mean: f64,
    pub deviation: f64,
    pub size: usize,
}

impl TeamAggregate {
    /// The (0, 0) sentinel for an empty roster
    pub const EMPTY: TeamAggregate = TeamAggregate {
        mean: 0.0,
        deviation: 0.0,
        size: 0,
    };

    /// Aggregate a roster, rejecting empty teams
    pub fn from_roster<'a, I>(roster: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a RatingState>,
    {
        let aggregate = Self::from_roster_unchecked(roster);
        if aggregate.size == 0 {
            return Err(RatingError::invalid("Cannot aggregate an empty team").into());
        }
        Ok(aggregate)
    }

    /// Aggregate a roster, returning [`TeamAggregate::EMPTY`] for an empty one
    pub fn from_roster_unchecked<'a, I>(roster: I) -> Self
    where
        I: IntoIterator<Item = &'a RatingState>,
    {
        let (size, mean_sum, variance_sum) = roster
            .into_iter()
            .fold((0usize, 0.0, 0.0), |(n, mean_sum, variance_sum), state| {
                (n + 1, mean_sum + state.mean, variance_sum + state.deviation.powi(2))
            });

        if size == 0 {
            return Self::EMPTY;
        }

        Self {
            mean: mean_sum / size as f64,
            deviation: variance_sum.sqrt() / size as f64,
            size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(mean: f64, deviation: f64) -> RatingState {
        RatingState::new(mean, deviation, 0.06).unwrap()
    }

    #[test]
    fn test_single_player_team() {
        let player = state(0.5, 1.2);
        let aggregate = TeamAggregate::from_roster([&player]).unwrap();
        assert_eq!(aggregate.mean, 0.5);
        assert!((aggregate.deviation - 1.2).abs() < 1e-12);
        assert_eq!(aggregate.size, 1);
    }

    #[test]
    fn test_root_sum_of_squares_deviation() {
        let roster = vec![state(1.0, 1.0), state(-1.0, 1.0), state(0.0, 1.0), state(0.0, 1.0)];
        let aggregate = TeamAggregate::from_roster(&roster).unwrap();
        assert_eq!(aggregate.mean, 0.0);
        // sqrt(4) / 4
        assert!((aggregate.deviation - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_deviation_shrinks_with_team_size() {
        let small: Vec<_> = (0..2).map(|_| state(0.0, 1.0)).collect();
        let large: Vec<_> = (0..6).map(|_| state(0.0, 1.0)).collect();
        let small = TeamAggregate::from_roster(&small).unwrap();
        let large = TeamAggregate::from_roster(&large).unwrap();
        assert!(large.deviation < small.deviation);
    }

    #[test]
    fn test_empty_team() {
        let empty: Vec<RatingState> = Vec::new();
        assert_eq!(TeamAggregate::from_roster_unchecked(&empty), TeamAggregate::EMPTY);

        let err = TeamAggregate::from_roster(&empty).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RatingError>(),
            Some(RatingError::InvalidArgument { .. })
        ));
    }
}

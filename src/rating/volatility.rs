//! Glicko-2 volatility update
//!
//! Solves for the new volatility σ' with the Illinois variant of regula falsi,
//! as in step 5 of the Glicko-2 procedure.

use crate::error::{RatingError, Result};

/// Bracket-search and refinement iteration caps; never reached for valid input.
const MAX_BRACKET_STEPS: usize = 10_000;
const MAX_REFINEMENT_STEPS: usize = 10_000;

/// Inputs of the volatility equation for one player
#[derive(Debug, Clone, Copy)]
pub struct VolatilityProblem {
    /// Current σ
    pub volatility: f64,
    /// Current φ
    pub deviation: f64,
    /// Δ, the estimated improvement
    pub delta: f64,
    /// v, the estimated variance
    pub variance: f64,
    /// System constant τ
    pub tau: f64,
}

impl VolatilityProblem {
    /// f(x) = eˣ(Δ² − φ² − v − eˣ) / 2(φ² + v + eˣ)² − (x − a)/τ²
    fn f(&self, x: f64, a: f64) -> f64 {
        let ex = x.exp();
        let phi_sq = self.deviation * self.deviation;
        let denominator = phi_sq + self.variance + ex;
        let numerator = ex * (self.delta * self.delta - phi_sq - self.variance - ex);
        numerator / (2.0 * denominator * denominator) - (x - a) / (self.tau * self.tau)
    }

    /// Run the Illinois iteration until the bracket is narrower than `tolerance`
    pub fn solve(&self, tolerance: f64) -> Result<f64> {
        if !(self.variance > 0.0) || !self.variance.is_finite() {
            return Err(RatingError::NumericalFailure {
                reason: format!("Variance must be finite and positive, got {}", self.variance),
            }
            .into());
        }

        let a = (self.volatility * self.volatility).ln();
        let delta_sq = self.delta * self.delta;
        let phi_sq = self.deviation * self.deviation;

        let mut lower = a;
        let mut upper = if delta_sq > phi_sq + self.variance {
            (delta_sq - phi_sq - self.variance).ln()
        } else {
            let mut k = 1.0;
            let mut candidate = a - k * self.tau;
            let mut steps = 0;
            while self.f(candidate, a) < 0.0 {
                steps += 1;
                if steps > MAX_BRACKET_STEPS {
                    return Err(RatingError::NumericalFailure {
                        reason: "Volatility bracket search did not terminate".to_string(),
                    }
                    .into());
                }
                k += 1.0;
                candidate = a - k * self.tau;
            }
            candidate
        };

        let mut f_lower = self.f(lower, a);
        let mut f_upper = self.f(upper, a);
        let mut steps = 0;

        while (upper - lower).abs() > tolerance {
            steps += 1;
            if steps > MAX_REFINEMENT_STEPS {
                return Err(RatingError::NumericalFailure {
                    reason: "Volatility iteration did not converge".to_string(),
                }
                .into());
            }

            let c = lower + (lower - upper) * f_lower / (f_upper - f_lower);
            let f_c = self.f(c, a);

            if f_c * f_upper <= 0.0 {
                lower = upper;
                f_lower = f_upper;
            } else {
                f_lower /= 2.0;
            }

            upper = c;
            f_upper = f_c;
        }

        Ok((lower / 2.0).exp())
    }
}

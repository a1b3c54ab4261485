//! Salary regression coefficients and the experience curve they parameterize
//!
//! The regression that produces `alpha`/`beta` from industry, city and age
//! lives outside this crate. Only its output contract is modelled here.

use serde::{Deserialize, Serialize};

/// Default career start age when the caller does not provide one
pub const DEFAULT_CAREER_START_AGE: u32 = 23;

/// Experience multiplier: `1 + alpha * (1 - e^(-beta * exp))`
///
/// A saturation curve, not an exponential. Negative experience is treated as zero.
pub fn experience_multiplier(experience_years: f64, alpha: f64, beta: f64) -> f64 {
    let exp = experience_years.max(0.0);
    1.0 + alpha * (1.0 - (-beta * exp).exp())
}

/// Coefficients of the experience curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    pub alpha: f64,
    pub beta: f64,
}

impl Coefficients {
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }

    /// Flat curve: salary does not move with experience
    pub fn neutral() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Resolve coefficients with precedence fresh > cached > defaults
    pub fn resolve(fresh: Option<Coefficients>, cached: Option<Coefficients>) -> Coefficients {
        match (fresh, cached) {
            (Some(fresh), _) => fresh,
            (None, Some(cached)) => {
                log::debug!(
                    "using cached coefficients alpha={} beta={}",
                    cached.alpha,
                    cached.beta
                );
                cached
            }
            (None, None) => Coefficients::default(),
        }
    }

    /// Multiplier at the given experience
    pub fn multiplier(&self, experience_years: f64) -> f64 {
        experience_multiplier(experience_years, self.alpha, self.beta)
    }
}

impl Default for Coefficients {
    fn default() -> Self {
        Self::new(0.85, 0.12)
    }
}

/// Response contract of the salary benchmarking service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryEstimate {
    /// Estimated current monthly salary
    pub salary: f64,
    pub experience_years: u32,
    pub retirement_age: u32,
    pub years_to_retirement: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpha: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub beta: Option<f64>,
}

impl SalaryEstimate {
    /// Coefficients carried by the estimate, if both were returned
    pub fn coefficients(&self) -> Option<Coefficients> {
        match (self.alpha, self.beta) {
            (Some(alpha), Some(beta)) => Some(Coefficients::new(alpha, beta)),
            _ => None,
        }
    }
}

/// Years worked so far, floored at zero
pub fn experience_years(age: u32, career_start: Option<u32>) -> u32 {
    age.saturating_sub(career_start.unwrap_or(DEFAULT_CAREER_START_AGE))
}

/// Years left until retirement, floored at zero
pub fn years_to_retirement(age: u32, retirement_age: u32) -> u32 {
    retirement_age.saturating_sub(age)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_multiplier_saturates() {
        assert_relative_eq!(experience_multiplier(0.0, 0.85, 0.12), 1.0);
        let m10 = experience_multiplier(10.0, 0.85, 0.12);
        let m40 = experience_multiplier(40.0, 0.85, 0.12);
        assert!(m10 > 1.0 && m40 > m10);
        assert!(m40 < 1.85);
        // Negative experience is clamped
        assert_relative_eq!(experience_multiplier(-5.0, 0.85, 0.12), 1.0);
    }

    #[test]
    fn test_neutral_is_flat() {
        let c = Coefficients::neutral();
        assert_relative_eq!(c.multiplier(0.0), 1.0);
        assert_relative_eq!(c.multiplier(30.0), 1.0);
    }

    #[test]
    fn test_resolution_precedence() {
        let fresh = Coefficients::new(0.5, 0.1);
        let cached = Coefficients::new(0.7, 0.2);
        assert_eq!(Coefficients::resolve(Some(fresh), Some(cached)), fresh);
        assert_eq!(Coefficients::resolve(None, Some(cached)), cached);
        assert_eq!(Coefficients::resolve(None, None), Coefficients::default());
    }

    #[test]
    fn test_salary_estimate_contract() {
        let json = r#"{"salary":8000.0,"experience_years":7,"retirement_age":65,"years_to_retirement":35}"#;
        let estimate: SalaryEstimate = serde_json::from_str(json).unwrap();
        assert!(estimate.coefficients().is_none());

        let with_coeffs = SalaryEstimate { alpha: Some(0.4), beta: Some(0.1), ..estimate };
        assert_eq!(with_coeffs.coefficients(), Some(Coefficients::new(0.4, 0.1)));
    }

    #[test]
    fn test_experience_and_horizon_helpers() {
        assert_eq!(experience_years(30, None), 7);
        assert_eq!(experience_years(20, Some(23)), 0);
        assert_eq!(years_to_retirement(30, 65), 35);
        assert_eq!(years_to_retirement(70, 65), 0);
    }
}

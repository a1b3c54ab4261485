//! Payout-phase assumptions: statutory retirement ages and the annuity divisor

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

/// Statutory retirement age by sex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetirementAges {
    pub male: u32,
    pub female: u32,
}

impl RetirementAges {
    pub fn for_sex(&self, is_male: bool) -> u32 {
        if is_male {
            self.male
        } else {
            self.female
        }
    }
}

impl Default for RetirementAges {
    fn default() -> Self {
        Self { male: 65, female: 60 }
    }
}

/// Converts capital at retirement into a monthly pension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoutAssumptions {
    /// Average age reached by men, used to derive months of payout
    pub male_life_expectancy_age: f64,

    /// Average age reached by women
    pub female_life_expectancy_age: f64,

    /// Fixed divisor in months; when set, life expectancy is ignored
    pub divisor_months_override: Option<f64>,
}

impl PayoutAssumptions {
    /// Expected months of payout at `retirement_age`
    ///
    /// Fails when the divisor is not a positive finite number, e.g. when
    /// retirement is planned past the life-expectancy age.
    pub fn annuity_divisor_months(
        &self,
        is_male: bool,
        retirement_age: u32,
    ) -> Result<f64, ProjectionError> {
        let months = match self.divisor_months_override {
            Some(months) => months,
            None => {
                let life_expectancy = if is_male {
                    self.male_life_expectancy_age
                } else {
                    self.female_life_expectancy_age
                };
                (life_expectancy - retirement_age as f64) * 12.0
            }
        };

        if !months.is_finite() || months <= 0.0 {
            return Err(ProjectionError::domain(
                "annuity_divisor_months",
                format!(
                    "expected payout of {months} months at age {retirement_age} cannot annuitize capital"
                ),
            ));
        }
        Ok(months)
    }
}

impl Default for PayoutAssumptions {
    fn default() -> Self {
        Self {
            male_life_expectancy_age: 84.0,
            female_life_expectancy_age: 88.0,
            divisor_months_override: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_divisor_from_life_expectancy() {
        let payout = PayoutAssumptions::default();
        assert_relative_eq!(payout.annuity_divisor_months(true, 65).unwrap(), 228.0);
        assert_relative_eq!(payout.annuity_divisor_months(false, 60).unwrap(), 336.0);
    }

    #[test]
    fn test_override_wins() {
        let payout = PayoutAssumptions {
            divisor_months_override: Some(250.0),
            ..Default::default()
        };
        assert_relative_eq!(payout.annuity_divisor_months(true, 70).unwrap(), 250.0);
    }

    #[test]
    fn test_retirement_past_life_expectancy_is_domain_error() {
        let payout = PayoutAssumptions::default();
        let err = payout.annuity_divisor_months(true, 84).unwrap_err();
        assert_eq!(err.field(), Some("annuity_divisor_months"));
    }

    #[test]
    fn test_statutory_ages() {
        let ages = RetirementAges::default();
        assert_eq!(ages.for_sex(true), 65);
        assert_eq!(ages.for_sex(false), 60);
    }
}

//! Contribution schedule: per-year salary and contribution base over the career

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::events::EventEffect;
use crate::assumptions::{Coefficients, MacroeconomicFactors};
use crate::error::ProjectionError;
use crate::profile::ProjectionInput;

/// Salary and contribution base for one calendar year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearContribution {
    pub year: i32,

    /// Age reached during the year
    pub age: u32,

    /// Gross salary before any event reduction
    pub gross_annual_salary: f64,

    /// Base on which contributions are charged
    pub effective_base: f64,

    /// Event effect applied to the year
    pub effect: EventEffect,
}

/// Gross annual salary as a function of years from the base year
///
/// Moves along the experience curve (ratio method, since the curve
/// saturates) and, for future years, with nominal wage growth.
#[derive(Debug, Clone, Copy)]
pub struct SalaryPath {
    annual_salary_now: f64,
    experience_now: f64,
    coefficients: Coefficients,
    nominal_wage_growth: f64,
    multiplier_now: f64,
}

impl SalaryPath {
    pub fn new(
        input: &ProjectionInput,
        macroeconomic: &MacroeconomicFactors,
    ) -> Result<Self, ProjectionError> {
        let coefficients = input.coefficients();
        let multiplier_now = coefficients.multiplier(input.years_of_experience);
        if !multiplier_now.is_finite() || multiplier_now <= 0.0 {
            return Err(ProjectionError::domain(
                "alpha",
                format!(
                    "experience multiplier {multiplier_now} at {} years cannot scale salaries",
                    input.years_of_experience
                ),
            ));
        }

        Ok(Self {
            annual_salary_now: input.current_monthly_salary * 12.0,
            experience_now: input.years_of_experience,
            coefficients,
            nominal_wage_growth: macroeconomic.nominal_wage_growth_rate(),
            multiplier_now,
        })
    }

    /// Gross annual salary `offset` years from the base year (negative for the past)
    pub fn annual_salary(&self, offset: i32) -> Result<f64, ProjectionError> {
        let multiplier_then = self.coefficients.multiplier(self.experience_now + offset as f64);
        if multiplier_then < 0.0 {
            return Err(ProjectionError::domain(
                "alpha",
                format!(
                    "experience multiplier turns negative ({multiplier_then}) {offset} years from now"
                ),
            ));
        }

        let indexation = if offset > 0 {
            (1.0 + self.nominal_wage_growth).powi(offset)
        } else {
            1.0
        };

        let salary = self.annual_salary_now * multiplier_then / self.multiplier_now * indexation;
        if !salary.is_finite() {
            return Err(ProjectionError::domain(
                "current_monthly_salary",
                format!("salary overflows {offset} years from now"),
            ));
        }
        Ok(salary)
    }
}

/// Build the schedule for `[base_year, base_year + years_to_retirement)`
pub fn build_schedule(
    input: &ProjectionInput,
    events: &BTreeMap<i32, EventEffect>,
    base_year: i32,
    macroeconomic: &MacroeconomicFactors,
) -> Result<Vec<YearContribution>, ProjectionError> {
    if input.retirement_age <= input.current_age {
        return Err(ProjectionError::EmptyCareerSpan {
            current_age: input.current_age,
            retirement_age: input.retirement_age,
        });
    }

    let salary_path = SalaryPath::new(input, macroeconomic)?;
    let years = input.retirement_age - input.current_age;

    (0..years)
        .map(|offset| {
            let year = base_year + offset as i32;
            let gross = salary_path.annual_salary(offset as i32)?;
            let effect = events.get(&year).copied().unwrap_or_default();
            let effective_base = if effect.basis_zero {
                0.0
            } else {
                gross * effect.contrib_multiplier
            };

            Ok(YearContribution {
                year,
                age: input.current_age + offset,
                gross_annual_salary: gross,
                effective_base,
                effect,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn input() -> ProjectionInput {
        ProjectionInput::new(30, 7.0, 8000.0, true, Coefficients::new(0.85, 0.12), 65)
    }

    #[test]
    fn test_schedule_spans_career() {
        let macro_factors = MacroeconomicFactors::default();
        let schedule = build_schedule(&input(), &BTreeMap::new(), 2026, &macro_factors).unwrap();

        assert_eq!(schedule.len(), 35);
        assert_eq!(schedule[0].year, 2026);
        assert_eq!(schedule[0].age, 30);
        assert_eq!(schedule[34].year, 2060);
        assert_relative_eq!(schedule[0].gross_annual_salary, 96_000.0, epsilon = 1e-9);
        assert_eq!(schedule[0].effective_base, schedule[0].gross_annual_salary);
    }

    #[test]
    fn test_salary_grows_without_events() {
        let macro_factors = MacroeconomicFactors::default();
        let schedule = build_schedule(&input(), &BTreeMap::new(), 2026, &macro_factors).unwrap();
        assert!(schedule.windows(2).all(|w| w[1].gross_annual_salary > w[0].gross_annual_salary));
    }

    #[test]
    fn test_neutral_curve_follows_wage_growth_only() {
        let mut profile = input();
        profile.alpha = 0.0;
        let macro_factors = MacroeconomicFactors::flat(0.02, 0.01, 0.04, 0.04);
        let path = SalaryPath::new(&profile, &macro_factors).unwrap();
        assert_relative_eq!(path.annual_salary(10).unwrap(), 96_000.0 * 1.03_f64.powi(10), epsilon = 1e-6);
        // No indexation backwards
        assert_relative_eq!(path.annual_salary(-5).unwrap(), 96_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_events_reduce_base() {
        let mut events = BTreeMap::new();
        events.insert(2030, EventEffect { basis_zero: true, contrib_multiplier: 0.0 });
        events.insert(2031, EventEffect { basis_zero: false, contrib_multiplier: 0.5 });

        let macro_factors = MacroeconomicFactors::default();
        let schedule = build_schedule(&input(), &events, 2026, &macro_factors).unwrap();

        assert_eq!(schedule[4].effective_base, 0.0);
        assert!(schedule[4].gross_annual_salary > 0.0);
        assert_relative_eq!(schedule[5].effective_base, schedule[5].gross_annual_salary * 0.5);
    }

    #[test]
    fn test_empty_career_span() {
        let mut profile = input();
        profile.retirement_age = 30;
        let err = build_schedule(&profile, &BTreeMap::new(), 2026, &MacroeconomicFactors::default()).unwrap_err();
        assert_eq!(err, ProjectionError::EmptyCareerSpan { current_age: 30, retirement_age: 30 });
    }

    #[test]
    fn test_degenerate_curve_is_domain_error() {
        let mut profile = input();
        profile.alpha = -2.0;
        let err = SalaryPath::new(&profile, &MacroeconomicFactors::default()).unwrap_err();
        assert_eq!(err.field(), Some("alpha"));
    }
}

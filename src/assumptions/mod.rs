//! Pension assumptions: contribution rates, macroeconomic factors, payout and
//! retirement ages, and the salary curve coefficients

mod contribution;
mod macroeconomic;
mod payout;
pub mod coefficients;
pub mod loader;

pub use contribution::ContributionRates;
pub use macroeconomic::{MacroeconomicFactors, HistoricalYear};
pub use payout::{PayoutAssumptions, RetirementAges};
pub use coefficients::{
    experience_multiplier, experience_years, years_to_retirement, Coefficients, SalaryEstimate,
};
pub use loader::LoadedAssumptions;

use std::path::Path;

use crate::error::{LoadError, ProjectionError};

/// Container for all projection assumptions
#[derive(Debug, Clone, PartialEq)]
pub struct PensionAssumptions {
    pub contributions: ContributionRates,
    pub macroeconomic: MacroeconomicFactors,
    pub payout: PayoutAssumptions,
    pub retirement_ages: RetirementAges,
}

impl PensionAssumptions {
    /// Statutory defaults with the built-in macro history
    pub fn statutory() -> Self {
        Self {
            contributions: ContributionRates::default(),
            macroeconomic: MacroeconomicFactors::default(),
            payout: PayoutAssumptions::default(),
            retirement_ages: RetirementAges::default(),
        }
    }

    /// Load assumptions from CSV files in the default location (data/assumptions/)
    pub fn from_csv() -> Result<Self, LoadError> {
        Self::from_csv_path(Path::new(loader::DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load assumptions from CSV files in a specific directory
    ///
    /// Parameters missing from parameters.csv keep their statutory defaults.
    pub fn from_csv_path(path: &Path) -> Result<Self, LoadError> {
        let loaded = LoadedAssumptions::load_from(path)?;
        let assumptions = Self::from_loaded(&loaded)?;
        assumptions.validate()?;
        Ok(assumptions)
    }

    pub fn from_loaded(loaded: &LoadedAssumptions) -> Result<Self, LoadError> {
        let mut assumptions = Self::statutory();
        assumptions.macroeconomic.historical = loaded.macro_history.clone();

        for (key, &value) in &loaded.parameters {
            match key.as_str() {
                "i_pillar_rate" => assumptions.contributions.i_pillar_rate = value,
                "ii_pillar_rate" => assumptions.contributions.ii_pillar_rate = value,
                "inflation_rate" => assumptions.macroeconomic.inflation_rate = value,
                "real_wage_growth_rate" => assumptions.macroeconomic.real_wage_growth_rate = value,
                "i_pillar_growth_rate" => assumptions.macroeconomic.i_pillar_growth_rate = value,
                "ii_pillar_growth_rate" => assumptions.macroeconomic.ii_pillar_growth_rate = value,
                "male_life_expectancy_age" => assumptions.payout.male_life_expectancy_age = value,
                "female_life_expectancy_age" => {
                    assumptions.payout.female_life_expectancy_age = value
                }
                "annuity_divisor_months" => {
                    assumptions.payout.divisor_months_override = Some(value)
                }
                "male_retirement_age" => assumptions.retirement_ages.male = whole_age(key, value)?,
                "female_retirement_age" => {
                    assumptions.retirement_ages.female = whole_age(key, value)?
                }
                other => return Err(LoadError::UnknownParameter(other.to_string())),
            }
        }

        Ok(assumptions)
    }

    /// Check that the assumptions can drive a projection
    pub fn validate(&self) -> Result<(), ProjectionError> {
        self.contributions.validate()?;

        let m = &self.macroeconomic;
        for (field, rate) in [
            ("inflation_rate", m.inflation_rate),
            ("real_wage_growth_rate", m.real_wage_growth_rate),
            ("i_pillar_growth_rate", m.i_pillar_growth_rate),
            ("ii_pillar_growth_rate", m.ii_pillar_growth_rate),
        ] {
            if !rate.is_finite() || rate <= -1.0 {
                return Err(ProjectionError::assumption(
                    field,
                    format!("{rate} must be finite and above -100%"),
                ));
            }
        }

        if m.i_pillar_growth_rate < 0.0 || m.ii_pillar_growth_rate < 0.0 {
            log::warn!(
                "negative projected valorization (I: {}, II: {}); capital will shrink in years without contributions",
                m.i_pillar_growth_rate,
                m.ii_pillar_growth_rate
            );
        }

        Ok(())
    }
}

impl Default for PensionAssumptions {
    fn default() -> Self {
        Self::statutory()
    }
}

fn whole_age(key: &str, value: f64) -> Result<u32, LoadError> {
    if value.fract() != 0.0 || value <= 0.0 || value > 120.0 {
        return Err(LoadError::Parse {
            key: key.to_string(),
            value: value.to_string(),
        });
    }
    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_csv_matches_statutory_defaults() {
        let from_csv = PensionAssumptions::from_csv().expect("default assumptions should load");
        assert_eq!(from_csv, PensionAssumptions::statutory());
    }

    #[test]
    fn test_unknown_parameter_rejected() {
        let mut parameters = BTreeMap::new();
        parameters.insert("disability_rate".to_string(), 0.08);
        let loaded = LoadedAssumptions {
            parameters,
            macro_history: BTreeMap::new(),
        };
        let err = PensionAssumptions::from_loaded(&loaded).unwrap_err();
        assert!(matches!(err, LoadError::UnknownParameter(ref k) if k == "disability_rate"));
    }

    #[test]
    fn test_divisor_override_from_parameters() {
        let mut parameters = BTreeMap::new();
        parameters.insert("annuity_divisor_months".to_string(), 261.8);
        parameters.insert("female_retirement_age".to_string(), 62.0);
        let loaded = LoadedAssumptions {
            parameters,
            macro_history: BTreeMap::new(),
        };
        let assumptions = PensionAssumptions::from_loaded(&loaded).unwrap();
        assert_eq!(assumptions.payout.divisor_months_override, Some(261.8));
        assert_eq!(assumptions.retirement_ages.female, 62);
        assert!(assumptions.macroeconomic.historical.is_empty());
    }

    #[test]
    fn test_validate_rejects_total_loss_rate() {
        let mut assumptions = PensionAssumptions::statutory();
        assumptions.macroeconomic.inflation_rate = -1.0;
        assert!(matches!(
            assumptions.validate(),
            Err(ProjectionError::InvalidAssumption { field: "inflation_rate", .. })
        ));
    }
}

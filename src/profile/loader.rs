//! Load member profiles from a cohort CSV and simulation events from JSON

use csv::Reader;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::{ProjectionInput, SimulationEvent};
use crate::assumptions::{Coefficients, RetirementAges};
use crate::error::LoadError;

/// Default cohort file
pub const DEFAULT_COHORT_PATH: &str = "data/cohort.csv";

/// Raw CSV row matching cohort.csv columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "ProfileID")]
    profile_id: u32,
    #[serde(rename = "Age")]
    age: u32,
    #[serde(rename = "Experience")]
    experience: f64,
    #[serde(rename = "MonthlySalary")]
    monthly_salary: f64,
    #[serde(rename = "Sex")]
    sex: String,
    #[serde(rename = "Alpha")]
    alpha: Option<f64>,
    #[serde(rename = "Beta")]
    beta: Option<f64>,
    #[serde(rename = "RetirementAge")]
    retirement_age: Option<u32>,
}

/// One member of a cohort file
#[derive(Debug, Clone, PartialEq)]
pub struct CohortProfile {
    pub profile_id: u32,
    pub input: ProjectionInput,
}

impl CsvRow {
    fn to_profile(self, ages: &RetirementAges) -> Result<CohortProfile, LoadError> {
        let is_male = match self.sex.as_str() {
            "M" | "Male" | "male" => true,
            "F" | "Female" | "female" => false,
            other => {
                return Err(LoadError::Parse {
                    key: "Sex".to_string(),
                    value: other.to_string(),
                })
            }
        };

        let fresh = match (self.alpha, self.beta) {
            (Some(alpha), Some(beta)) => Some(Coefficients::new(alpha, beta)),
            _ => None,
        };
        let coefficients = Coefficients::resolve(fresh, None);
        let retirement_age = self.retirement_age.unwrap_or_else(|| ages.for_sex(is_male));

        Ok(CohortProfile {
            profile_id: self.profile_id,
            input: ProjectionInput::new(
                self.age,
                self.experience,
                self.monthly_salary,
                is_male,
                coefficients,
                retirement_age,
            ),
        })
    }
}

/// Load profiles from any reader producing cohort CSV
pub fn load_profiles_from_reader<R: Read>(
    reader: R,
    ages: &RetirementAges,
) -> Result<Vec<CohortProfile>, LoadError> {
    let mut reader = Reader::from_reader(reader);
    let mut profiles = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        profiles.push(row.to_profile(ages)?);
    }

    Ok(profiles)
}

/// Load profiles from a cohort CSV file
pub fn load_profiles(path: &Path, ages: &RetirementAges) -> Result<Vec<CohortProfile>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_profiles_from_reader(file, ages)
}

/// Load a JSON array of simulation events
pub fn load_events(path: &Path) -> Result<Vec<SimulationEvent>, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_reader(file)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
ProfileID,Age,Experience,MonthlySalary,Sex,Alpha,Beta,RetirementAge
1,30,7,8000,M,0.5,0.1,65
2,45,20,12000,F,,,
";

    #[test]
    fn test_load_profiles_from_reader() {
        let profiles = load_profiles_from_reader(SAMPLE.as_bytes(), &RetirementAges::default()).unwrap();
        assert_eq!(profiles.len(), 2);

        let first = &profiles[0].input;
        assert!(first.is_male);
        assert_eq!(first.alpha, 0.5);
        assert_eq!(first.retirement_age, 65);

        // Missing coefficients fall back to defaults, missing retirement age to the statutory one
        let second = &profiles[1].input;
        assert!(!second.is_male);
        assert_eq!(second.coefficients(), Coefficients::default());
        assert_eq!(second.retirement_age, 60);
    }

    #[test]
    fn test_unknown_sex_rejected() {
        let csv = "ProfileID,Age,Experience,MonthlySalary,Sex,Alpha,Beta,RetirementAge\n1,30,7,8000,X,,,\n";
        let err = load_profiles_from_reader(csv.as_bytes(), &RetirementAges::default()).unwrap_err();
        assert!(matches!(err, LoadError::Parse { ref key, .. } if key == "Sex"));
    }

    #[test]
    fn test_load_default_cohort() {
        let profiles = load_profiles(Path::new(DEFAULT_COHORT_PATH), &RetirementAges::default()).unwrap();
        assert!(!profiles.is_empty());
        assert!(profiles.iter().all(|p| p.input.validate().is_ok()));
    }
}

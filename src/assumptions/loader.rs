//! CSV-based assumption loader
//!
//! Loads pension assumptions from CSV files in data/assumptions/

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use super::HistoricalYear;
use crate::error::LoadError;

/// Default path to assumptions directory
pub const DEFAULT_ASSUMPTIONS_PATH: &str = "data/assumptions";

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Raw row of macro_history.csv
#[derive(Debug, serde::Deserialize)]
struct MacroHistoryRow {
    year: i32,
    inflation: f64,
    real_wage_growth: f64,
    i_pillar_index: f64,
    ii_pillar_index: f64,
}

/// Load the historical macro table from macro_history.csv
/// Returns BTreeMap<year, HistoricalYear>
pub fn load_macro_history(path: &Path) -> Result<BTreeMap<i32, HistoricalYear>, LoadError> {
    let file = open(&path.join("macro_history.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut history = BTreeMap::new();
    for result in reader.deserialize() {
        let row: MacroHistoryRow = result?;
        history.insert(
            row.year,
            HistoricalYear {
                inflation: row.inflation,
                real_wage_growth: row.real_wage_growth,
                i_pillar_index: row.i_pillar_index,
                ii_pillar_index: row.ii_pillar_index,
            },
        );
    }

    Ok(history)
}

/// Load scalar parameters from parameters.csv
/// Returns BTreeMap<parameter_name, value>
pub fn load_parameters(path: &Path) -> Result<BTreeMap<String, f64>, LoadError> {
    let file = open(&path.join("parameters.csv"))?;
    let mut reader = csv::Reader::from_reader(file);

    let mut parameters = BTreeMap::new();
    for result in reader.records() {
        let record = result?;
        let key = record[0].trim().to_string();
        let raw = record[1].trim();
        let value: f64 = raw.parse().map_err(|_| LoadError::Parse {
            key: key.clone(),
            value: raw.to_string(),
        })?;
        parameters.insert(key, value);
    }

    Ok(parameters)
}

/// All assumption files from one directory
#[derive(Debug, Clone)]
pub struct LoadedAssumptions {
    pub parameters: BTreeMap<String, f64>,
    pub macro_history: BTreeMap<i32, HistoricalYear>,
}

impl LoadedAssumptions {
    /// Load all assumptions from the default path
    pub fn load_default() -> Result<Self, LoadError> {
        Self::load_from(Path::new(DEFAULT_ASSUMPTIONS_PATH))
    }

    /// Load all assumptions from a specific path
    pub fn load_from(path: &Path) -> Result<Self, LoadError> {
        Ok(Self {
            parameters: load_parameters(path)?,
            macro_history: load_macro_history(path)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_default_assumptions() {
        let result = LoadedAssumptions::load_default();
        assert!(result.is_ok(), "Failed to load assumptions: {:?}", result.err());

        let assumptions = result.unwrap();

        assert!(assumptions.macro_history.len() >= 20);
        assert!(assumptions.macro_history[&2022].inflation > 0.1);
        assert!(assumptions.parameters.contains_key("i_pillar_rate"));
    }

    #[test]
    fn test_missing_directory_reports_path() {
        let err = LoadedAssumptions::load_from(Path::new("does/not/exist")).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("parameters.csv"));
    }
}

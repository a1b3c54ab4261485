//! Projection output structures: yearly timeline and retirement summary

use serde::{Deserialize, Serialize};
use std::io;

/// One year of the projection, nominal and in base-year money
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearRecord {
    pub year: i32,

    // Capital accumulated before the start of `year`
    pub i_pillar: f64,
    pub ii_pillar: f64,
    pub total: f64,

    /// Gross salary earned during `year`
    pub annual_salary: f64,

    pub i_pillar_real: f64,
    pub ii_pillar_real: f64,
    pub total_real: f64,
    pub annual_salary_real: f64,

    /// Share of the salary contributions are charged on (0 for a break)
    pub contrib_base_multiplier: f64,
}

/// Figures at the retirement point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub retirement_age: u32,
    pub years_to_retirement: u32,
    pub retirement_year: i32,

    pub monthly_pension_nominal: f64,
    pub monthly_pension_real: f64,
    pub replacement_rate_percent_nominal: f64,
    pub replacement_rate_percent_real: f64,

    pub i_pillar_capital_nominal: f64,
    pub ii_pillar_capital_nominal: f64,
    pub total_capital_nominal: f64,
    pub i_pillar_capital_real: f64,
    pub ii_pillar_capital_real: f64,
    pub total_capital_real: f64,

    pub current_monthly_salary_nominal: f64,
    pub final_monthly_salary_nominal: f64,
    pub final_monthly_salary_real: f64,
}

/// Complete projection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub summary: ProjectionSummary,

    /// Yearly records from the base year up to and including retirement
    pub timeline: Vec<YearRecord>,
}

impl ProjectionResult {
    /// Record for a calendar year, if it lies on the timeline
    pub fn record(&self, year: i32) -> Option<&YearRecord> {
        self.timeline.iter().find(|r| r.year == year)
    }

    /// The last record, at the retirement year
    pub fn retirement_record(&self) -> Option<&YearRecord> {
        self.timeline.last()
    }

    /// Write the timeline as CSV with a header row
    pub fn write_timeline_csv<W: io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        for record in &self.timeline {
            wtr.serialize(record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

//! Pillar accumulator: rolls pillar I and pillar II capital forward year by year

use serde::{Deserialize, Serialize};

use super::schedule::YearContribution;
use crate::assumptions::{ContributionRates, MacroeconomicFactors};
use crate::error::{Pillar, ProjectionError};

/// Capital held in both pillars at a point in time
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PillarBalances {
    pub i_pillar: f64,
    pub ii_pillar: f64,
}

impl PillarBalances {
    pub fn new(i_pillar: f64, ii_pillar: f64) -> Self {
        Self { i_pillar, ii_pillar }
    }

    pub fn total(&self) -> f64 {
        self.i_pillar + self.ii_pillar
    }
}

/// Closing capital of one calendar year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearCapital {
    pub year: i32,
    pub i_pillar: f64,
    pub ii_pillar: f64,
    pub total: f64,

    /// Contributions credited during the year
    pub contribution_i: f64,
    pub contribution_ii: f64,
}

fn check_capital(pillar: Pillar, year: i32, value: f64) -> Result<f64, ProjectionError> {
    if value < 0.0 || value.is_nan() {
        return Err(ProjectionError::NegativeCapital { pillar, year, value });
    }
    Ok(value)
}

/// Accumulate capital over the schedule, starting from `opening`
///
/// `capital[y] = capital[y-1] * (1 + growth[y]) + contribution[y]` for each
/// pillar. Growth rates come from the macroeconomic assumptions and may be
/// negative. Capital below zero is reported, never clamped.
pub fn accumulate(
    schedule: &[YearContribution],
    opening: PillarBalances,
    rates: &ContributionRates,
    macroeconomic: &MacroeconomicFactors,
) -> Result<Vec<YearCapital>, ProjectionError> {
    let split_ratio = rates.pillar1_share();
    if !(split_ratio > 0.0 && split_ratio < 1.0) {
        return Err(ProjectionError::assumption(
            "pillar1_share",
            format!("split ratio {split_ratio} is outside (0, 1)"),
        ));
    }
    let total_rate = rates.total_rate();

    let mut i_pillar = opening.i_pillar;
    let mut ii_pillar = opening.ii_pillar;
    let mut capital = Vec::with_capacity(schedule.len());

    for entry in schedule {
        let contribution = entry.effective_base * total_rate;
        let contribution_i = contribution * split_ratio;
        let contribution_ii = contribution - contribution_i;

        i_pillar = i_pillar * (1.0 + macroeconomic.i_pillar_rate(entry.year)) + contribution_i;
        ii_pillar = ii_pillar * (1.0 + macroeconomic.ii_pillar_rate(entry.year)) + contribution_ii;

        let i_pillar_checked = check_capital(Pillar::First, entry.year, i_pillar)?;
        let ii_pillar_checked = check_capital(Pillar::Second, entry.year, ii_pillar)?;

        capital.push(YearCapital {
            year: entry.year,
            i_pillar: i_pillar_checked,
            ii_pillar: ii_pillar_checked,
            total: i_pillar_checked + ii_pillar_checked,
            contribution_i,
            contribution_ii,
        });
    }

    Ok(capital)
}

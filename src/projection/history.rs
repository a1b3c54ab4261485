//! Reconstruction of capital accumulated before the projection starts
//!
//! Past contributions are estimated from the experience curve (no wage
//! indexation backwards) and valorized with the historical index table. Events
//! never apply here: they are resolved against the projection horizon only.

use super::accumulator::{accumulate, PillarBalances};
use super::events::EventEffect;
use super::schedule::{SalaryPath, YearContribution};
use crate::assumptions::PensionAssumptions;
use crate::error::ProjectionError;
use crate::profile::{OpeningBalance, ProjectionInput};

/// Capital at the start of `base_year` for the input's opening balance mode
pub fn opening_balance(
    input: &ProjectionInput,
    base_year: i32,
    assumptions: &PensionAssumptions,
) -> Result<PillarBalances, ProjectionError> {
    match input.opening_balance {
        OpeningBalance::Zero => Ok(PillarBalances::default()),
        OpeningBalance::Explicit { i_pillar, ii_pillar } => {
            Ok(PillarBalances::new(i_pillar, ii_pillar))
        }
        OpeningBalance::Reconstructed => reconstruct(input, base_year, assumptions),
    }
}

fn reconstruct(
    input: &ProjectionInput,
    base_year: i32,
    assumptions: &PensionAssumptions,
) -> Result<PillarBalances, ProjectionError> {
    let years_worked = input.years_of_experience.floor() as i32;
    if years_worked <= 0 {
        return Ok(PillarBalances::default());
    }

    let salary_path = SalaryPath::new(input, &assumptions.macroeconomic)?;
    let past: Vec<YearContribution> = (-years_worked..0)
        .map(|offset| {
            let gross = salary_path.annual_salary(offset)?;
            Ok(YearContribution {
                year: base_year + offset,
                age: (input.current_age as i32 + offset).max(0) as u32,
                gross_annual_salary: gross,
                effective_base: gross,
                effect: EventEffect::NONE,
            })
        })
        .collect::<Result<_, ProjectionError>>()?;

    let capital = accumulate(
        &past,
        PillarBalances::default(),
        &assumptions.contributions,
        &assumptions.macroeconomic,
    )?;

    let balances = capital
        .last()
        .map(|c| PillarBalances::new(c.i_pillar, c.ii_pillar))
        .unwrap_or_default();

    log::debug!(
        "reconstructed {years_worked} past years ({}..{base_year}): I {:.2}, II {:.2}",
        base_year - years_worked,
        balances.i_pillar,
        balances.ii_pillar
    );
    Ok(balances)
}

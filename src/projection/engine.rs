//! Projection engine: turns one member profile into a capital timeline and retirement summary

use chrono::Datelike;
use std::fmt;

use super::accumulator::{accumulate, PillarBalances, YearCapital};
use super::events::resolve_events;
use super::history::opening_balance;
use super::inflation::InflationModel;
use super::schedule::{build_schedule, SalaryPath};
use super::timeline::{ProjectionResult, ProjectionSummary, YearRecord};
use crate::assumptions::PensionAssumptions;
use crate::error::ProjectionError;
use crate::profile::ProjectionInput;

/// Configuration for a projection run
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionConfig {
    /// Calendar year of "today": real values are expressed in this year's money
    pub base_year: i32,

    /// Deflate with this rate instead of the projected inflation assumption
    pub inflation_rate_override: Option<f64>,

    /// Keep every year in the timeline; when false only the retirement record is kept
    pub detailed_output: bool,
}

impl ProjectionConfig {
    pub fn with_base_year(base_year: i32) -> Self {
        Self {
            base_year,
            ..Self::default()
        }
    }
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            base_year: chrono::Local::now().year(),
            inflation_rate_override: None,
            detailed_output: true,
        }
    }
}

/// Pipeline stages, in the order a projection passes through them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionStage {
    Idle,
    EventsResolved,
    ScheduleBuilt,
    Accumulated,
    Deflated,
    Summarized,
}

impl fmt::Display for ProjectionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProjectionStage::Idle => "idle",
            ProjectionStage::EventsResolved => "events resolved",
            ProjectionStage::ScheduleBuilt => "schedule built",
            ProjectionStage::Accumulated => "accumulated",
            ProjectionStage::Deflated => "deflated",
            ProjectionStage::Summarized => "summarized",
        };
        f.write_str(name)
    }
}

/// Main projection engine
///
/// Holds assumptions and configuration only, so one engine can be shared
/// across threads and reused for any number of profiles.
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    assumptions: PensionAssumptions,
    config: ProjectionConfig,
}

impl ProjectionEngine {
    pub fn new(assumptions: PensionAssumptions, config: ProjectionConfig) -> Self {
        Self { assumptions, config }
    }

    pub fn assumptions(&self) -> &PensionAssumptions {
        &self.assumptions
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Inflation rate used to deflate nominal amounts
    pub fn inflation_rate(&self) -> f64 {
        self.config
            .inflation_rate_override
            .unwrap_or(self.assumptions.macroeconomic.inflation_rate)
    }

    /// Run the full pipeline for one profile
    pub fn project(&self, input: &ProjectionInput) -> Result<ProjectionResult, ProjectionError> {
        input.validate()?;
        self.assumptions.validate()?;

        let base_year = self.config.base_year;
        let years_to_retirement = input.years_to_retirement();
        let retirement_year = base_year + years_to_retirement as i32;
        let macroeconomic = &self.assumptions.macroeconomic;

        let mut stage = ProjectionStage::Idle;
        let events = resolve_events(
            &input.simulation_events,
            base_year,
            input.current_age,
            years_to_retirement,
        )
        .map_err(|e| aborted(stage, e))?;
        stage = advance(stage, ProjectionStage::EventsResolved);

        let schedule = build_schedule(input, &events, base_year, macroeconomic)
            .map_err(|e| aborted(stage, e))?;
        let final_salary = SalaryPath::new(input, macroeconomic)
            .and_then(|path| path.annual_salary(years_to_retirement as i32))
            .map_err(|e| aborted(stage, e))?;
        stage = advance(stage, ProjectionStage::ScheduleBuilt);

        let opening = opening_balance(input, base_year, &self.assumptions)
            .map_err(|e| aborted(stage, e))?;
        let capital = accumulate(&schedule, opening, &self.assumptions.contributions, macroeconomic)
            .map_err(|e| aborted(stage, e))?;
        stage = advance(stage, ProjectionStage::Accumulated);

        let inflation = InflationModel::new(self.inflation_rate(), base_year);
        let mut timeline = Vec::with_capacity(schedule.len() + 1);
        for (offset, year) in (base_year..=retirement_year).enumerate() {
            // Capital entering `year` is the previous year's closing balance
            let balances = match offset.checked_sub(1).and_then(|i| capital.get(i)) {
                Some(closing) => balances_of(closing),
                None => opening,
            };
            let annual_salary = schedule
                .get(offset)
                .map(|entry| entry.gross_annual_salary)
                .unwrap_or(final_salary);
            let multiplier = events.get(&year).copied().unwrap_or_default().effective_multiplier();

            let record = self
                .year_record(&inflation, year, balances, annual_salary, multiplier)
                .map_err(|e| aborted(stage, e))?;
            timeline.push(record);
        }
        stage = advance(stage, ProjectionStage::Deflated);

        let summary = self
            .summarize(input, retirement_year, &timeline)
            .map_err(|e| aborted(stage, e))?;
        advance(stage, ProjectionStage::Summarized);

        log::debug!(
            "projected {} -> {}: capital {:.2}, pension {:.2}/month ({:.1}% replacement)",
            base_year,
            retirement_year,
            summary.total_capital_nominal,
            summary.monthly_pension_nominal,
            summary.replacement_rate_percent_nominal
        );

        if !self.config.detailed_output {
            let retirement_index = timeline.len().saturating_sub(1);
            timeline = timeline.split_off(retirement_index);
        }
        Ok(ProjectionResult { summary, timeline })
    }

    fn year_record(
        &self,
        inflation: &InflationModel,
        year: i32,
        balances: PillarBalances,
        annual_salary: f64,
        contrib_base_multiplier: f64,
    ) -> Result<YearRecord, ProjectionError> {
        Ok(YearRecord {
            year,
            i_pillar: balances.i_pillar,
            ii_pillar: balances.ii_pillar,
            total: balances.total(),
            annual_salary,
            i_pillar_real: inflation.deflate(balances.i_pillar, year)?,
            ii_pillar_real: inflation.deflate(balances.ii_pillar, year)?,
            total_real: inflation.deflate(balances.total(), year)?,
            annual_salary_real: inflation.deflate(annual_salary, year)?,
            contrib_base_multiplier,
        })
    }

    fn summarize(
        &self,
        input: &ProjectionInput,
        retirement_year: i32,
        timeline: &[YearRecord],
    ) -> Result<ProjectionSummary, ProjectionError> {
        let last = timeline.last().ok_or(ProjectionError::EmptyCareerSpan {
            current_age: input.current_age,
            retirement_age: input.retirement_age,
        })?;

        let divisor = self
            .assumptions
            .payout
            .annuity_divisor_months(input.is_male, input.retirement_age)?;
        let monthly_pension_nominal = last.total / divisor;
        let monthly_pension_real = last.total_real / divisor;
        let final_monthly_salary_nominal = last.annual_salary / 12.0;
        let final_monthly_salary_real = last.annual_salary_real / 12.0;

        Ok(ProjectionSummary {
            retirement_age: input.retirement_age,
            years_to_retirement: input.years_to_retirement(),
            retirement_year,
            monthly_pension_nominal,
            monthly_pension_real,
            replacement_rate_percent_nominal: replacement_rate(
                monthly_pension_nominal,
                final_monthly_salary_nominal,
            ),
            replacement_rate_percent_real: replacement_rate(
                monthly_pension_real,
                final_monthly_salary_real,
            ),
            i_pillar_capital_nominal: last.i_pillar,
            ii_pillar_capital_nominal: last.ii_pillar,
            total_capital_nominal: last.total,
            i_pillar_capital_real: last.i_pillar_real,
            ii_pillar_capital_real: last.ii_pillar_real,
            total_capital_real: last.total_real,
            current_monthly_salary_nominal: input.current_monthly_salary,
            final_monthly_salary_nominal,
            final_monthly_salary_real,
        })
    }
}

fn balances_of(capital: &YearCapital) -> PillarBalances {
    PillarBalances::new(capital.i_pillar, capital.ii_pillar)
}

/// Pension as a percentage of the final salary; 0 when there is no final salary
fn replacement_rate(monthly_pension: f64, final_monthly_salary: f64) -> f64 {
    if final_monthly_salary > 0.0 {
        monthly_pension / final_monthly_salary * 100.0
    } else {
        0.0
    }
}

fn advance(from: ProjectionStage, to: ProjectionStage) -> ProjectionStage {
    log::trace!("projection stage: {from} -> {to}");
    to
}

fn aborted(stage: ProjectionStage, err: ProjectionError) -> ProjectionError {
    log::debug!("projection aborted after stage `{stage}`: {err}");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assumptions::{Coefficients, MacroeconomicFactors};
    use crate::error::ErrorKind;
    use crate::profile::{OpeningBalance, SimulationEvent};
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    const BASE_YEAR: i32 = 2026;

    fn engine() -> ProjectionEngine {
        ProjectionEngine::new(PensionAssumptions::statutory(), ProjectionConfig::with_base_year(BASE_YEAR))
    }

    fn baseline() -> ProjectionInput {
        ProjectionInput::new(30, 7.0, 8000.0, true, Coefficients::neutral(), 65)
    }

    #[test]
    fn test_baseline_projection() {
        let result = engine().project(&baseline()).unwrap();
        let summary = &result.summary;

        assert_eq!(summary.years_to_retirement, 35);
        assert_eq!(summary.retirement_year, 2061);
        assert_eq!(result.timeline.len(), 36);
        assert_eq!(result.timeline[0].year, 2026);
        assert_eq!(result.timeline[35].year, 2061);

        assert!(summary.total_capital_nominal > 0.0);
        assert!(summary.monthly_pension_nominal > 0.0);
        assert!(summary.replacement_rate_percent_nominal > 20.0);
        assert!(summary.replacement_rate_percent_nominal < 80.0);

        // Regression values for the flat statutory assumptions
        assert_relative_eq!(summary.total_capital_nominal, 2_975_000.0, max_relative = 0.01);
        assert_relative_eq!(summary.monthly_pension_nominal, 13_049.0, max_relative = 0.01);
        assert_relative_eq!(summary.final_monthly_salary_nominal, 37_339.0, max_relative = 0.01);
        assert_eq!(summary.current_monthly_salary_nominal, 8000.0);
    }

    #[test]
    fn test_timeline_starts_from_opening_balance() {
        let result = engine().project(&baseline()).unwrap();
        let first = &result.timeline[0];
        assert_eq!(first.total, 0.0);
        assert_relative_eq!(first.annual_salary, 96_000.0, epsilon = 1e-9);
        assert_eq!(first.contrib_base_multiplier, 1.0);

        // Capital entering 2027 is exactly one year of contributions
        assert_relative_eq!(result.timeline[1].i_pillar, 96_000.0 * 0.1222, epsilon = 1e-6);
        assert_relative_eq!(result.timeline[1].ii_pillar, 96_000.0 * 0.073, epsilon = 1e-6);
    }

    #[test]
    fn test_summary_matches_retirement_record() {
        let result = engine().project(&baseline()).unwrap();
        let last = result.retirement_record().unwrap();
        assert_eq!(result.summary.total_capital_nominal, last.total);
        assert_eq!(result.summary.total_capital_real, last.total_real);
        assert_relative_eq!(result.summary.monthly_pension_nominal, last.total / ((84.0 - 65.0) * 12.0));
    }

    #[test]
    fn test_identity_at_base_year() {
        let input = baseline().with_opening_balance(OpeningBalance::Explicit {
            i_pillar: 40_000.0,
            ii_pillar: 10_000.0,
        });
        let result = engine().project(&input).unwrap();
        let first = &result.timeline[0];
        assert_eq!(first.i_pillar_real, first.i_pillar);
        assert_eq!(first.ii_pillar_real, first.ii_pillar);
        assert_eq!(first.total_real, 50_000.0);
        assert_eq!(first.annual_salary_real, first.annual_salary);
    }

    #[test]
    fn test_immediate_retirement_rejected() {
        let mut input = baseline();
        input.retirement_age = 30;
        let err = engine().project(&input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.field(), Some("retirement_age"));
    }

    #[test]
    fn test_full_career_unemployment() {
        let input = baseline().with_events(vec![SimulationEvent::without_contributions("unemployment", 30, 65)]);
        let result = engine().project(&input).unwrap();

        assert_eq!(result.summary.total_capital_nominal, 0.0);
        assert_eq!(result.summary.monthly_pension_nominal, 0.0);
        assert_eq!(result.summary.replacement_rate_percent_nominal, 0.0);
        assert!(result.timeline.iter().all(|r| r.total == 0.0));
        // The salary is still earned, it just carries no contributions
        assert!(result.summary.final_monthly_salary_nominal > 0.0);
    }

    #[test]
    fn test_event_outside_horizon_changes_nothing() {
        let plain = engine().project(&baseline()).unwrap();
        let with_past = engine()
            .project(&baseline().with_events(vec![SimulationEvent::without_contributions("abroad", 20, 25)]))
            .unwrap();
        let with_future = engine()
            .project(&baseline().with_events(vec![SimulationEvent::reduced("late gig", 70, 75, 0.5)]))
            .unwrap();

        assert_eq!(plain, with_past);
        assert_eq!(plain, with_future);
    }

    #[test]
    fn test_event_zeroes_contributions() {
        let plain = engine().project(&baseline()).unwrap();
        let input = baseline().with_events(vec![SimulationEvent::without_contributions("unemployment", 35, 37)]);
        let result = engine().project(&input).unwrap();

        // Ages 35 and 36 are 2031 and 2032
        assert_eq!(result.record(2031).unwrap().contrib_base_multiplier, 0.0);
        assert_eq!(result.record(2032).unwrap().contrib_base_multiplier, 0.0);
        assert_eq!(result.record(2033).unwrap().contrib_base_multiplier, 1.0);

        // No contribution during the break: capital only grows by valorization
        let entering_2032 = result.record(2032).unwrap();
        let entering_2033 = result.record(2033).unwrap();
        assert_relative_eq!(entering_2033.i_pillar, entering_2032.i_pillar * 1.045, epsilon = 1e-6);
        assert_relative_eq!(entering_2033.ii_pillar, entering_2032.ii_pillar * 1.0475, epsilon = 1e-6);

        // Salary is unaffected by the break
        assert_eq!(result.record(2031).unwrap().annual_salary, plain.record(2031).unwrap().annual_salary);
        assert!(result.summary.total_capital_nominal < plain.summary.total_capital_nominal);
    }

    #[test]
    fn test_part_time_lies_between_full_and_break() {
        let run = |events: Vec<SimulationEvent>| {
            engine()
                .project(&baseline().with_events(events))
                .unwrap()
                .summary
                .total_capital_nominal
        };
        let full = run(Vec::new());
        let part = run(vec![SimulationEvent::reduced("part-time", 40, 45, 0.5)]);
        let stop = run(vec![SimulationEvent::without_contributions("break", 40, 45)]);
        assert!(stop < part && part < full);
    }

    #[test]
    fn test_invalid_event_rejected() {
        let input = baseline().with_events(vec![SimulationEvent::reduced("backwards", 50, 40, 0.5)]);
        let err = engine().project(&input).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidEventRange);
    }

    #[test]
    fn test_idempotent_output() {
        let input = baseline().with_events(vec![
            SimulationEvent::reduced("part-time", 40, 44, 0.6),
            SimulationEvent::without_contributions("abroad", 50, 52),
        ]);
        let engine = engine();
        let first = serde_json::to_vec(&engine.project(&input).unwrap()).unwrap();
        let second = serde_json::to_vec(&engine.project(&input).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_female_profile_uses_longer_divisor() {
        let mut input = baseline();
        input.is_male = false;
        input.retirement_age = 60;
        let result = engine().project(&input).unwrap();
        assert_relative_eq!(
            result.summary.monthly_pension_nominal,
            result.summary.total_capital_nominal / ((88.0 - 60.0) * 12.0)
        );
    }

    #[test]
    fn test_zero_salary_gives_zero_replacement() {
        let mut input = baseline();
        input.current_monthly_salary = 0.0;
        let result = engine().project(&input).unwrap();
        assert_eq!(result.summary.final_monthly_salary_nominal, 0.0);
        assert_eq!(result.summary.replacement_rate_percent_nominal, 0.0);
        assert_eq!(result.summary.replacement_rate_percent_real, 0.0);
    }

    #[test]
    fn test_reconstructed_history_adds_capital() {
        let plain = engine().project(&baseline()).unwrap();
        let input = baseline().with_opening_balance(OpeningBalance::Reconstructed);
        let result = engine().project(&input).unwrap();
        assert!(result.timeline[0].total > 0.0);
        assert!(result.summary.total_capital_nominal > plain.summary.total_capital_nominal);
    }

    #[test]
    fn test_divisor_override_and_bad_divisor() {
        let mut assumptions = PensionAssumptions::statutory();
        assumptions.payout.divisor_months_override = Some(240.0);
        let engine = ProjectionEngine::new(assumptions.clone(), ProjectionConfig::with_base_year(BASE_YEAR));
        let result = engine.project(&baseline()).unwrap();
        assert_relative_eq!(result.summary.monthly_pension_nominal, result.summary.total_capital_nominal / 240.0);

        assumptions.payout.divisor_months_override = Some(0.0);
        let engine = ProjectionEngine::new(assumptions, ProjectionConfig::with_base_year(BASE_YEAR));
        let err = engine.project(&baseline()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArithmeticDomain);
    }

    #[test]
    fn test_summary_only_output() {
        let config = ProjectionConfig {
            detailed_output: false,
            ..ProjectionConfig::with_base_year(BASE_YEAR)
        };
        let detailed = engine().project(&baseline()).unwrap();
        let compact = ProjectionEngine::new(PensionAssumptions::statutory(), config)
            .project(&baseline())
            .unwrap();

        assert_eq!(compact.timeline.len(), 1);
        assert_eq!(compact.timeline[0].year, 2061);
        assert_eq!(compact.summary, detailed.summary);
    }

    #[test]
    fn test_inflation_override_only_moves_real_values() {
        let config = ProjectionConfig {
            inflation_rate_override: Some(0.05),
            ..ProjectionConfig::with_base_year(BASE_YEAR)
        };
        let base = engine().project(&baseline()).unwrap();
        let high = ProjectionEngine::new(PensionAssumptions::statutory(), config)
            .project(&baseline())
            .unwrap();

        assert_eq!(high.summary.total_capital_nominal, base.summary.total_capital_nominal);
        assert!(high.summary.total_capital_real < base.summary.total_capital_real);
    }

    #[test]
    fn test_stage_display() {
        assert_eq!(ProjectionStage::EventsResolved.to_string(), "events resolved");
        assert_eq!(ProjectionStage::Summarized.to_string(), "summarized");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_timeline_invariants(
            current_age in 18u32..64,
            span in 1u32..40,
            salary in 0.0f64..50_000.0,
            alpha in 0.0f64..1.5,
            beta in 0.01f64..0.5,
            inflation in 0.0f64..0.1,
            break_start in 18u32..80,
            break_len in 0u32..10,
        ) {
            let retirement_age = (current_age + span).min(80);
            prop_assume!(retirement_age > current_age);

            let mut assumptions = PensionAssumptions::statutory();
            assumptions.macroeconomic = MacroeconomicFactors::flat(inflation, 0.01, 0.04, 0.03);
            let engine = ProjectionEngine::new(assumptions, ProjectionConfig::with_base_year(BASE_YEAR));

            let experience = (current_age - 18) as f64;
            let input = ProjectionInput::new(current_age, experience, salary, true, Coefficients::new(alpha, beta), retirement_age)
                .with_events(vec![SimulationEvent::without_contributions("break", break_start, break_start + break_len)]);
            let result = engine.project(&input).unwrap();

            prop_assert_eq!(result.summary.years_to_retirement, retirement_age - current_age);
            prop_assert_eq!(result.timeline.len() as u32, retirement_age - current_age + 1);
            for record in &result.timeline {
                let tol = 1e-9 * record.total.abs().max(1.0);
                prop_assert!((record.total - (record.i_pillar + record.ii_pillar)).abs() <= tol);
                prop_assert!((record.total_real - (record.i_pillar_real + record.ii_pillar_real)).abs() <= tol);
                prop_assert!(record.total_real <= record.total + tol);
                prop_assert!(record.annual_salary_real <= record.annual_salary * (1.0 + 1e-12));
                prop_assert!(record.total >= 0.0);
            }
        }
    }
}

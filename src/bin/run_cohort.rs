//! Run projections for a whole cohort from cohort.csv
//!
//! Writes one summary row per member and the cohort's aggregated capital by year

use anyhow::{Context, Result};
use clap::Parser;
use pension_projection::{
    profile::{load_profiles, loader::DEFAULT_COHORT_PATH},
    ProjectionConfig, ProjectionResult, ScenarioRunner,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about = "Project every member of a cohort file", long_about = None)]
struct Cli {
    /// Cohort CSV (ProfileID,Age,Experience,MonthlySalary,Sex,Alpha,Beta,RetirementAge)
    #[arg(long, default_value = DEFAULT_COHORT_PATH)]
    cohort: PathBuf,

    /// Assumptions directory; built-in values when omitted
    #[arg(long)]
    assumptions: Option<PathBuf>,

    /// Base year (defaults to the current year)
    #[arg(long)]
    base_year: Option<i32>,

    /// Per-member summary output
    #[arg(long, default_value = "cohort_summary.csv")]
    summary_out: PathBuf,

    /// Aggregated capital by calendar year
    #[arg(long, default_value = "cohort_by_year.csv")]
    by_year_out: PathBuf,
}

/// One output row per projected member
#[derive(Debug, Serialize)]
struct SummaryRow {
    profile_id: u32,
    retirement_year: i32,
    years_to_retirement: u32,
    total_capital_nominal: f64,
    total_capital_real: f64,
    monthly_pension_nominal: f64,
    monthly_pension_real: f64,
    replacement_rate_percent_nominal: f64,
    replacement_rate_percent_real: f64,
    error: String,
}

impl SummaryRow {
    fn from_result(profile_id: u32, result: &ProjectionResult) -> Self {
        let s = &result.summary;
        Self {
            profile_id,
            retirement_year: s.retirement_year,
            years_to_retirement: s.years_to_retirement,
            total_capital_nominal: s.total_capital_nominal,
            total_capital_real: s.total_capital_real,
            monthly_pension_nominal: s.monthly_pension_nominal,
            monthly_pension_real: s.monthly_pension_real,
            replacement_rate_percent_nominal: s.replacement_rate_percent_nominal,
            replacement_rate_percent_real: s.replacement_rate_percent_real,
            error: String::new(),
        }
    }

    fn failed(profile_id: u32, error: String) -> Self {
        Self {
            profile_id,
            retirement_year: 0,
            years_to_retirement: 0,
            total_capital_nominal: 0.0,
            total_capital_real: 0.0,
            monthly_pension_nominal: 0.0,
            monthly_pension_real: 0.0,
            replacement_rate_percent_nominal: 0.0,
            replacement_rate_percent_real: 0.0,
            error,
        }
    }
}

/// Cohort capital in one calendar year
#[derive(Debug, Default, Serialize)]
struct YearAggregate {
    year: i32,
    members: u32,
    i_pillar: f64,
    ii_pillar: f64,
    total: f64,
    total_real: f64,
    annual_salary: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    let runner = match &cli.assumptions {
        Some(dir) => ScenarioRunner::from_csv_path(dir)
            .with_context(|| format!("loading assumptions from {}", dir.display()))?,
        None => ScenarioRunner::new(),
    };

    println!("Loading profiles from {}...", cli.cohort.display());
    let profiles = load_profiles(&cli.cohort, &runner.assumptions().retirement_ages)
        .with_context(|| format!("loading cohort {}", cli.cohort.display()))?;
    println!("Loaded {} profiles in {:?}", profiles.len(), start.elapsed());

    let mut config = ProjectionConfig::default();
    if let Some(year) = cli.base_year {
        config.base_year = year;
    }

    println!("Running projections...");
    let proj_start = Instant::now();
    let results = runner.run_batch(&profiles, config);
    println!("Projections complete in {:?}", proj_start.elapsed());

    let mut summary_writer = csv::Writer::from_path(&cli.summary_out)
        .with_context(|| format!("creating {}", cli.summary_out.display()))?;
    let mut by_year: BTreeMap<i32, YearAggregate> = BTreeMap::new();
    let mut failures = 0usize;

    for (profile_id, outcome) in &results {
        let row = match outcome {
            Ok(result) => {
                for record in &result.timeline {
                    let agg = by_year.entry(record.year).or_insert_with(|| YearAggregate {
                        year: record.year,
                        ..Default::default()
                    });
                    agg.members += 1;
                    agg.i_pillar += record.i_pillar;
                    agg.ii_pillar += record.ii_pillar;
                    agg.total += record.total;
                    agg.total_real += record.total_real;
                    agg.annual_salary += record.annual_salary;
                }
                SummaryRow::from_result(*profile_id, result)
            }
            Err(err) => {
                failures += 1;
                log::warn!("profile {profile_id} failed: {err}");
                SummaryRow::failed(*profile_id, err.to_string())
            }
        };
        summary_writer.serialize(row)?;
    }
    summary_writer.flush()?;
    println!("Summary written to {}", cli.summary_out.display());

    let mut year_writer = csv::Writer::from_path(&cli.by_year_out)
        .with_context(|| format!("creating {}", cli.by_year_out.display()))?;
    for agg in by_year.values() {
        year_writer.serialize(agg)?;
    }
    year_writer.flush()?;
    println!("Yearly aggregate written to {}", cli.by_year_out.display());

    let projected: Vec<&ProjectionResult> =
        results.iter().filter_map(|(_, r)| r.as_ref().ok()).collect();
    if !projected.is_empty() {
        let n = projected.len() as f64;
        let avg_pension =
            projected.iter().map(|r| r.summary.monthly_pension_nominal).sum::<f64>() / n;
        let avg_replacement = projected
            .iter()
            .map(|r| r.summary.replacement_rate_percent_nominal)
            .sum::<f64>()
            / n;
        let total_capital: f64 = projected.iter().map(|r| r.summary.total_capital_nominal).sum();

        println!("\nCohort Summary:");
        println!("  Members projected: {} ({} failed)", projected.len(), failures);
        println!("  Capital at retirement: {:.0}", total_capital);
        println!("  Average monthly pension: {:.2}", avg_pension);
        println!("  Average replacement rate: {:.1}%", avg_replacement);
    }

    println!("\nTotal time: {:?}", start.elapsed());
    Ok(())
}

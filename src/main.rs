//! Pension Projection CLI
//!
//! Projects one member profile and prints the timeline and retirement summary

use anyhow::{Context, Result};
use clap::Parser;
use pension_projection::{
    assumptions::{experience_years, Coefficients},
    profile::{load_events, OpeningBalance},
    PensionAssumptions, ProjectionConfig, ProjectionEngine, ProjectionInput,
};
use std::fs::File;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Project pension capital and income until retirement",
    long_about = None
)]
struct Cli {
    /// Current age in whole years
    #[arg(long)]
    age: u32,

    /// Gross monthly salary today
    #[arg(long)]
    salary: f64,

    /// Years of professional experience (defaults to age minus 23)
    #[arg(long)]
    experience: Option<f64>,

    /// Project a female member (statutory age 60 instead of 65)
    #[arg(long, default_value_t = false)]
    female: bool,

    /// Retirement age (defaults to the statutory age)
    #[arg(long)]
    retirement_age: Option<u32>,

    /// Experience curve amplitude
    #[arg(long, requires = "beta")]
    alpha: Option<f64>,

    /// Experience curve speed
    #[arg(long, requires = "alpha")]
    beta: Option<f64>,

    /// JSON file with a list of simulation events
    #[arg(long)]
    events: Option<PathBuf>,

    /// Rebuild capital for the years already worked
    #[arg(long, default_value_t = false)]
    with_history: bool,

    /// Assumptions directory (parameters.csv, macro_history.csv); built-in values when omitted
    #[arg(long)]
    assumptions: Option<PathBuf>,

    /// Base year (defaults to the current year)
    #[arg(long)]
    base_year: Option<i32>,

    /// Write the full timeline to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the full result as JSON to this file
    #[arg(long)]
    json: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let assumptions = match &cli.assumptions {
        Some(dir) => PensionAssumptions::from_csv_path(dir)
            .with_context(|| format!("loading assumptions from {}", dir.display()))?,
        None => PensionAssumptions::statutory(),
    };

    let is_male = !cli.female;
    let fresh = cli.alpha.zip(cli.beta).map(|(alpha, beta)| Coefficients::new(alpha, beta));
    let experience = cli
        .experience
        .unwrap_or_else(|| experience_years(cli.age, None) as f64);
    let retirement_age = cli
        .retirement_age
        .unwrap_or_else(|| assumptions.retirement_ages.for_sex(is_male));

    let mut input = ProjectionInput::new(
        cli.age,
        experience,
        cli.salary,
        is_male,
        Coefficients::resolve(fresh, None),
        retirement_age,
    );
    if let Some(path) = &cli.events {
        let events =
            load_events(path).with_context(|| format!("reading events from {}", path.display()))?;
        input = input.with_events(events);
    }
    if cli.with_history {
        input = input.with_opening_balance(OpeningBalance::Reconstructed);
    }

    let mut config = ProjectionConfig::default();
    if let Some(year) = cli.base_year {
        config.base_year = year;
    }

    println!("Pension Projection v{}", env!("CARGO_PKG_VERSION"));
    println!("=========================\n");
    println!("Profile:");
    println!("  Age: {} ({})", input.current_age, if is_male { "male" } else { "female" });
    println!("  Experience: {:.1} years", input.years_of_experience);
    println!("  Monthly salary: {:.2}", input.current_monthly_salary);
    println!("  Coefficients: alpha={} beta={}", input.alpha, input.beta);
    println!("  Retirement age: {}", input.retirement_age);
    println!("  Events: {}", input.simulation_events.len());
    println!();

    let engine = ProjectionEngine::new(assumptions, config);
    let result = engine.project(&input).context("projection failed")?;

    println!(
        "{:>6} {:>16} {:>16} {:>16} {:>14} {:>16} {:>6}",
        "Year", "Pillar I", "Pillar II", "Total", "Salary", "Total (real)", "Base"
    );
    println!("{}", "-".repeat(98));
    for row in &result.timeline {
        println!(
            "{:>6} {:>16.2} {:>16.2} {:>16.2} {:>14.2} {:>16.2} {:>6.2}",
            row.year,
            row.i_pillar,
            row.ii_pillar,
            row.total,
            row.annual_salary,
            row.total_real,
            row.contrib_base_multiplier,
        );
    }

    let s = &result.summary;
    println!(
        "\nSummary (retirement in {}, {} years):",
        s.retirement_year, s.years_to_retirement
    );
    println!("  {:<28} {:>16} {:>16}", "", "nominal", "real");
    let rows = [
        ("Pillar I capital", s.i_pillar_capital_nominal, s.i_pillar_capital_real),
        ("Pillar II capital", s.ii_pillar_capital_nominal, s.ii_pillar_capital_real),
        ("Total capital", s.total_capital_nominal, s.total_capital_real),
        ("Monthly pension", s.monthly_pension_nominal, s.monthly_pension_real),
        ("Final monthly salary", s.final_monthly_salary_nominal, s.final_monthly_salary_real),
    ];
    for (label, nominal, real) in rows {
        println!("  {:<28} {:>16.2} {:>16.2}", label, nominal, real);
    }
    println!(
        "  {:<28} {:>15.1}% {:>15.1}%",
        "Replacement rate", s.replacement_rate_percent_nominal, s.replacement_rate_percent_real
    );

    if let Some(path) = &cli.csv {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        result
            .write_timeline_csv(file)
            .with_context(|| format!("writing timeline to {}", path.display()))?;
        println!("\nTimeline written to: {}", path.display());
    }

    if let Some(path) = &cli.json {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(file, &result).context("serializing projection result")?;
        println!("Result written to: {}", path.display());
    }

    Ok(())
}

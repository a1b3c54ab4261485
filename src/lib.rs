//! Pension Projection - retirement capital and income engine for two-pillar pension systems
//!
//! This library provides:
//! - Year-by-year projection of pillar I and pillar II capital, nominal and real
//! - Experience-curve salary paths with macroeconomic wage indexation
//! - Career events (unemployment, part-time, unpaid leave) applied to the contribution base
//! - Retirement summary: monthly pension, replacement rate, capital totals
//! - CSV-loaded assumptions and batch/scenario runs over member cohorts

pub mod error;
pub mod assumptions;
pub mod profile;
pub mod projection;
pub mod scenario;
pub mod preview;

// Re-export commonly used types
pub use error::{ErrorKind, LoadError, Pillar, ProjectionError};
pub use assumptions::{
    Coefficients, ContributionRates, MacroeconomicFactors, PayoutAssumptions, PensionAssumptions,
    RetirementAges,
};
pub use profile::{OpeningBalance, ProjectionInput, SimulationEvent};
pub use projection::{
    ProjectionConfig, ProjectionEngine, ProjectionResult, ProjectionSummary, YearRecord,
};
pub use scenario::ScenarioRunner;
pub use preview::{PreviewRequest, PreviewResponse};

//! Projection pipeline: events, contribution schedule, pillar accumulation and deflation

mod accumulator;
mod engine;
mod events;
mod history;
mod inflation;
mod schedule;
mod timeline;

pub use accumulator::{accumulate, PillarBalances, YearCapital};
pub use engine::{ProjectionConfig, ProjectionEngine, ProjectionStage};
pub use events::{resolve_events, EventEffect};
pub use history::opening_balance;
pub use inflation::InflationModel;
pub use schedule::{build_schedule, SalaryPath, YearContribution};
pub use timeline::{ProjectionResult, ProjectionSummary, YearRecord};

//! Scenario runner for batch and what-if projections
//!
//! Loads assumptions once, then runs any number of profiles or configurations
//! against them without re-reading CSV files.

use rayon::prelude::*;
use std::path::Path;

use crate::assumptions::PensionAssumptions;
use crate::error::{LoadError, ProjectionError};
use crate::profile::{CohortProfile, ProjectionInput, SimulationEvent};
use crate::projection::{ProjectionConfig, ProjectionEngine, ProjectionResult};

/// Pre-loaded scenario runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_csv()?;
///
/// for rate in [0.02, 0.035, 0.05] {
///     let config = ProjectionConfig { inflation_rate_override: Some(rate), ..Default::default() };
///     let result = runner.run(&input, config)?;
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    base_assumptions: PensionAssumptions,
}

impl ScenarioRunner {
    /// Runner with the built-in statutory assumptions
    pub fn new() -> Self {
        Self {
            base_assumptions: PensionAssumptions::statutory(),
        }
    }

    /// Runner with assumptions loaded from the default CSV directory
    pub fn from_csv() -> Result<Self, LoadError> {
        Ok(Self {
            base_assumptions: PensionAssumptions::from_csv()?,
        })
    }

    pub fn from_csv_path(path: &Path) -> Result<Self, LoadError> {
        Ok(Self {
            base_assumptions: PensionAssumptions::from_csv_path(path)?,
        })
    }

    pub fn with_assumptions(assumptions: PensionAssumptions) -> Self {
        Self {
            base_assumptions: assumptions,
        }
    }

    /// Run a single projection with the given config
    pub fn run(
        &self,
        input: &ProjectionInput,
        config: ProjectionConfig,
    ) -> Result<ProjectionResult, ProjectionError> {
        ProjectionEngine::new(self.base_assumptions.clone(), config).project(input)
    }

    /// Project every profile of a cohort with the same config, in parallel
    ///
    /// Results keep the cohort order. One failing profile does not stop the others.
    pub fn run_batch(
        &self,
        profiles: &[CohortProfile],
        config: ProjectionConfig,
    ) -> Vec<(u32, Result<ProjectionResult, ProjectionError>)> {
        let engine = ProjectionEngine::new(self.base_assumptions.clone(), config);
        profiles
            .par_iter()
            .map(|p| (p.profile_id, engine.project(&p.input)))
            .collect()
    }

    /// Run one profile under several configurations
    pub fn run_scenarios(
        &self,
        input: &ProjectionInput,
        configs: &[ProjectionConfig],
    ) -> Vec<Result<ProjectionResult, ProjectionError>> {
        configs.iter().map(|config| self.run(input, config.clone())).collect()
    }

    /// Run one profile against alternative event sets, e.g. to compare career breaks
    pub fn run_event_variants(
        &self,
        input: &ProjectionInput,
        variants: &[Vec<SimulationEvent>],
        config: ProjectionConfig,
    ) -> Vec<Result<ProjectionResult, ProjectionError>> {
        let engine = ProjectionEngine::new(self.base_assumptions.clone(), config);
        variants
            .iter()
            .map(|events| engine.project(&input.clone().with_events(events.clone())))
            .collect()
    }

    pub fn assumptions(&self) -> &PensionAssumptions {
        &self.base_assumptions
    }

    pub fn assumptions_mut(&mut self) -> &mut PensionAssumptions {
        &mut self.base_assumptions
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

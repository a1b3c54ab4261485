//! Wire format of the pension preview endpoint
//!
//! The request tolerates missing coefficients and retirement age; the response
//! carries both the nominal/real figures and the flat fields older clients
//! still read. Mapping happens only here, the engine has a single result type.

use serde::{Deserialize, Serialize};

use crate::assumptions::{Coefficients, RetirementAges};
use crate::error::ProjectionError;
use crate::profile::{OpeningBalance, ProjectionInput, SimulationEvent};
use crate::projection::{ProjectionEngine, ProjectionResult, YearRecord};

/// Route served by the preview adapter
pub const PREVIEW_PATH: &str = "/api/v1/user-profile/pension/preview";

/// Request body of the preview endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewRequest {
    pub current_age: u32,
    pub years_of_experience: f64,
    pub current_monthly_salary: f64,
    pub is_male: bool,

    #[serde(default)]
    pub alpha: Option<f64>,
    #[serde(default)]
    pub beta: Option<f64>,

    /// Coefficients from an earlier salary estimate, used when none are sent
    #[serde(default)]
    pub cached_coefficients: Option<Coefficients>,

    /// Statutory age for the member's sex when omitted
    #[serde(default)]
    pub retirement_age: Option<u32>,

    #[serde(default)]
    pub simulation_mode: bool,
    #[serde(default)]
    pub simulation_events: Vec<SimulationEvent>,

    #[serde(default)]
    pub opening_balance: OpeningBalance,
}

impl PreviewRequest {
    /// Resolve defaults and build the engine input
    pub fn to_input(&self, ages: &RetirementAges) -> ProjectionInput {
        let fresh = match (self.alpha, self.beta) {
            (Some(alpha), Some(beta)) => Some(Coefficients::new(alpha, beta)),
            _ => None,
        };
        let coefficients = Coefficients::resolve(fresh, self.cached_coefficients);
        let retirement_age = self.retirement_age.unwrap_or_else(|| ages.for_sex(self.is_male));

        ProjectionInput {
            simulation_mode: self.simulation_mode,
            simulation_events: self.simulation_events.clone(),
            opening_balance: self.opening_balance,
            ..ProjectionInput::new(
                self.current_age,
                self.years_of_experience,
                self.current_monthly_salary,
                self.is_male,
                coefficients,
                retirement_age,
            )
        }
    }
}

/// Response body of the preview endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub retirement_age: u32,
    pub years_to_retirement: u32,

    pub monthly_pension_nominal: f64,
    pub replacement_rate_percent_nominal: f64,
    pub i_pillar_capital_nominal: f64,
    pub ii_pillar_capital_nominal: f64,
    pub total_capital_nominal: f64,
    pub current_monthly_salary_nominal: f64,
    pub final_monthly_salary_nominal: f64,

    pub monthly_pension_real: f64,
    pub replacement_rate_percent_real: f64,
    pub i_pillar_capital_real: f64,
    pub ii_pillar_capital_real: f64,
    pub total_capital_real: f64,
    pub final_monthly_salary_real: f64,

    // Legacy flat fields, nominal
    pub monthly_pension: f64,
    pub replacement_rate_percent: f64,
    pub i_pillar_capital: f64,
    pub ii_pillar_capital: f64,
    pub total_capital: f64,
    pub current_monthly_salary: f64,

    pub timeline: Vec<YearRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simulation_events: Option<Vec<SimulationEvent>>,
}

impl PreviewResponse {
    pub fn from_result(result: ProjectionResult, input: &ProjectionInput) -> Self {
        let s = result.summary;
        Self {
            retirement_age: s.retirement_age,
            years_to_retirement: s.years_to_retirement,
            monthly_pension_nominal: s.monthly_pension_nominal,
            replacement_rate_percent_nominal: s.replacement_rate_percent_nominal,
            i_pillar_capital_nominal: s.i_pillar_capital_nominal,
            ii_pillar_capital_nominal: s.ii_pillar_capital_nominal,
            total_capital_nominal: s.total_capital_nominal,
            current_monthly_salary_nominal: s.current_monthly_salary_nominal,
            final_monthly_salary_nominal: s.final_monthly_salary_nominal,
            monthly_pension_real: s.monthly_pension_real,
            replacement_rate_percent_real: s.replacement_rate_percent_real,
            i_pillar_capital_real: s.i_pillar_capital_real,
            ii_pillar_capital_real: s.ii_pillar_capital_real,
            total_capital_real: s.total_capital_real,
            final_monthly_salary_real: s.final_monthly_salary_real,
            monthly_pension: s.monthly_pension_nominal,
            replacement_rate_percent: s.replacement_rate_percent_nominal,
            i_pillar_capital: s.i_pillar_capital_nominal,
            ii_pillar_capital: s.ii_pillar_capital_nominal,
            total_capital: s.total_capital_nominal,
            current_monthly_salary: s.current_monthly_salary_nominal,
            timeline: result.timeline,
            simulation_events: input.simulation_mode.then(|| input.simulation_events.clone()),
        }
    }
}

/// Error body returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl From<&ProjectionError> for ErrorBody {
    fn from(err: &ProjectionError) -> Self {
        Self {
            error: err.to_string(),
            field: err.field().map(str::to_string),
        }
    }
}

/// Run a preview end to end
pub fn preview(
    engine: &ProjectionEngine,
    request: &PreviewRequest,
) -> Result<PreviewResponse, ProjectionError> {
    let input = request.to_input(&engine.assumptions().retirement_ages);
    let result = engine.project(&input)?;
    Ok(PreviewResponse::from_result(result, &input))
}

//! Projection input: the personal and career profile of one member

use serde::{Deserialize, Serialize};

use crate::assumptions::Coefficients;
use crate::error::ProjectionError;

/// Oldest age accepted for either the current or the retirement age
pub const MAX_AGE: u32 = 120;

/// A caller-specified career interruption or reduction
///
/// Covers ages `[start_age, end_age)`. While active the contribution base is
/// either zeroed (`basis_zero`) or scaled by `contrib_multiplier`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Short description, e.g. "unemployment", "half-time"
    #[serde(default)]
    pub reason: String,

    /// First age affected
    pub start_age: u32,

    /// First age no longer affected
    pub end_age: u32,

    /// No insurance title: contribution base is zero
    #[serde(default)]
    pub basis_zero: bool,

    /// Contribution base multiplier in [0, 1]
    #[serde(default = "default_multiplier")]
    pub contrib_multiplier: f64,

    /// Free-form category label ("break", "abroad", "part-time", ...)
    #[serde(default)]
    pub kind: String,
}

fn default_multiplier() -> f64 {
    1.0
}

impl SimulationEvent {
    /// Event with no insurance title
    pub fn without_contributions(reason: &str, start_age: u32, end_age: u32) -> Self {
        Self {
            reason: reason.to_string(),
            start_age,
            end_age,
            basis_zero: true,
            contrib_multiplier: 0.0,
            kind: "break".to_string(),
        }
    }

    /// Event with a reduced contribution base
    pub fn reduced(reason: &str, start_age: u32, end_age: u32, contrib_multiplier: f64) -> Self {
        Self {
            reason: reason.to_string(),
            start_age,
            end_age,
            basis_zero: false,
            contrib_multiplier,
            kind: "part-time".to_string(),
        }
    }
}

/// Capital already held when the projection starts
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OpeningBalance {
    /// Start from empty accounts
    #[default]
    Zero,
    /// Balances known from an account statement
    Explicit { i_pillar: f64, ii_pillar: f64 },
    /// Estimate past contributions from years of experience
    Reconstructed,
}

/// Everything the engine needs to project one member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub current_age: u32,

    pub years_of_experience: f64,

    /// Gross monthly salary today
    pub current_monthly_salary: f64,

    pub is_male: bool,

    /// Experience curve amplitude
    pub alpha: f64,

    /// Experience curve speed
    pub beta: f64,

    pub retirement_age: u32,

    /// Whether the caller is exploring a what-if scenario; events are echoed back when set
    #[serde(default)]
    pub simulation_mode: bool,

    #[serde(default)]
    pub simulation_events: Vec<SimulationEvent>,

    #[serde(default)]
    pub opening_balance: OpeningBalance,
}

impl ProjectionInput {
    /// Profile without events or opening capital
    pub fn new(
        current_age: u32,
        years_of_experience: f64,
        current_monthly_salary: f64,
        is_male: bool,
        coefficients: Coefficients,
        retirement_age: u32,
    ) -> Self {
        Self {
            current_age,
            years_of_experience,
            current_monthly_salary,
            is_male,
            alpha: coefficients.alpha,
            beta: coefficients.beta,
            retirement_age,
            simulation_mode: false,
            simulation_events: Vec::new(),
            opening_balance: OpeningBalance::Zero,
        }
    }

    /// Attach simulation events and switch on simulation mode
    pub fn with_events(mut self, events: Vec<SimulationEvent>) -> Self {
        self.simulation_mode = true;
        self.simulation_events = events;
        self
    }

    pub fn with_opening_balance(mut self, opening_balance: OpeningBalance) -> Self {
        self.opening_balance = opening_balance;
        self
    }

    pub fn coefficients(&self) -> Coefficients {
        Coefficients::new(self.alpha, self.beta)
    }

    /// Years between today and retirement
    pub fn years_to_retirement(&self) -> u32 {
        self.retirement_age.saturating_sub(self.current_age)
    }

    /// Reject malformed input before any computation starts
    ///
    /// Event-level checks happen when events are resolved.
    pub fn validate(&self) -> Result<(), ProjectionError> {
        if self.current_age == 0 || self.current_age > MAX_AGE {
            return Err(ProjectionError::validation(
                "current_age",
                format!("{} is outside 1..={MAX_AGE}", self.current_age),
            ));
        }
        if self.retirement_age <= self.current_age {
            return Err(ProjectionError::validation(
                "retirement_age",
                format!(
                    "retirement age {} must be greater than current age {}",
                    self.retirement_age, self.current_age
                ),
            ));
        }
        if self.retirement_age > MAX_AGE {
            return Err(ProjectionError::validation(
                "retirement_age",
                format!("{} exceeds {MAX_AGE}", self.retirement_age),
            ));
        }
        if !self.years_of_experience.is_finite() || self.years_of_experience < 0.0 {
            return Err(ProjectionError::validation(
                "years_of_experience",
                format!("{} must be a non-negative number", self.years_of_experience),
            ));
        }
        if self.years_of_experience > self.current_age as f64 {
            return Err(ProjectionError::validation(
                "years_of_experience",
                format!(
                    "{} years exceeds current age {}",
                    self.years_of_experience, self.current_age
                ),
            ));
        }
        if !self.current_monthly_salary.is_finite() || self.current_monthly_salary < 0.0 {
            return Err(ProjectionError::validation(
                "current_monthly_salary",
                format!("{} must be a non-negative number", self.current_monthly_salary),
            ));
        }
        if !self.alpha.is_finite() {
            return Err(ProjectionError::validation("alpha", "must be finite"));
        }
        if !self.beta.is_finite() {
            return Err(ProjectionError::validation("beta", "must be finite"));
        }
        if let OpeningBalance::Explicit { i_pillar, ii_pillar } = self.opening_balance {
            if !i_pillar.is_finite() || i_pillar < 0.0 {
                return Err(ProjectionError::validation(
                    "opening_balance.i_pillar",
                    "must be non-negative",
                ));
            }
            if !ii_pillar.is_finite() || ii_pillar < 0.0 {
                return Err(ProjectionError::validation(
                    "opening_balance.ii_pillar",
                    "must be non-negative",
                ));
            }
        }
        Ok(())
    }
}

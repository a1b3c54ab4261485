//! Error types surfaced by the projection engine and the assumption loader

use std::fmt;
use thiserror::Error;

/// Pension pillar identifier, used to tag capital errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pillar {
    /// Pillar I (main account, valorized)
    First,
    /// Pillar II (sub-account, indexed)
    Second,
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pillar::First => write!(f, "pillar I"),
            Pillar::Second => write!(f, "pillar II"),
        }
    }
}

/// Coarse error category, stable across variants so callers can map it to a
/// user-facing message or a transport status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    InvalidEventRange,
    ArithmeticDomain,
    EmptyCareerSpan,
    NegativeCapital,
    InvalidYearOrder,
    InvalidAssumption,
}

/// Errors produced while projecting a single profile
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProjectionError {
    #[error("invalid input `{field}`: {message}")]
    Validation { field: &'static str, message: String },

    #[error("invalid simulation event #{index} (`{field}`): {message}")]
    InvalidEventRange {
        index: usize,
        field: &'static str,
        message: String,
    },

    #[error("arithmetic domain error in `{field}`: {message}")]
    ArithmeticDomain { field: &'static str, message: String },

    #[error("empty career span: retirement age {retirement_age} is not after current age {current_age}")]
    EmptyCareerSpan { current_age: u32, retirement_age: u32 },

    #[error("{pillar} capital fell below zero in {year} ({value})")]
    NegativeCapital { pillar: Pillar, year: i32, value: f64 },

    #[error("year {year} precedes base year {base_year}")]
    InvalidYearOrder { year: i32, base_year: i32 },

    #[error("invalid assumption `{field}`: {message}")]
    InvalidAssumption { field: &'static str, message: String },
}

impl ProjectionError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ProjectionError::Validation { field, message: message.into() }
    }

    pub fn event(index: usize, field: &'static str, message: impl Into<String>) -> Self {
        ProjectionError::InvalidEventRange { index, field, message: message.into() }
    }

    pub fn domain(field: &'static str, message: impl Into<String>) -> Self {
        ProjectionError::ArithmeticDomain { field, message: message.into() }
    }

    pub fn assumption(field: &'static str, message: impl Into<String>) -> Self {
        ProjectionError::InvalidAssumption { field, message: message.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ProjectionError::Validation { .. } => ErrorKind::Validation,
            ProjectionError::InvalidEventRange { .. } => ErrorKind::InvalidEventRange,
            ProjectionError::ArithmeticDomain { .. } => ErrorKind::ArithmeticDomain,
            ProjectionError::EmptyCareerSpan { .. } => ErrorKind::EmptyCareerSpan,
            ProjectionError::NegativeCapital { .. } => ErrorKind::NegativeCapital,
            ProjectionError::InvalidYearOrder { .. } => ErrorKind::InvalidYearOrder,
            ProjectionError::InvalidAssumption { .. } => ErrorKind::InvalidAssumption,
        }
    }

    /// Name of the offending input field, when one can be identified
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ProjectionError::Validation { field, .. }
            | ProjectionError::InvalidEventRange { field, .. }
            | ProjectionError::ArithmeticDomain { field, .. }
            | ProjectionError::InvalidAssumption { field, .. } => Some(*field),
            ProjectionError::EmptyCareerSpan { .. } => Some("retirement_age"),
            ProjectionError::NegativeCapital { .. }
            | ProjectionError::InvalidYearOrder { .. } => None,
        }
    }

    /// Whether the caller supplied bad data (as opposed to bad assumptions or an engine fault)
    pub fn is_client_error(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Validation | ErrorKind::InvalidEventRange | ErrorKind::EmptyCareerSpan
        )
    }
}

/// Errors raised while loading assumptions or profiles from disk
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("i/o error reading {path}: {source}")]
    Io {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),

    #[error("could not parse `{value}` for `{key}`")]
    Parse { key: String, value: String },

    #[error(transparent)]
    Assumption(#[from] ProjectionError),
}

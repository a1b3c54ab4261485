//! Inflation model: converts nominal amounts at a future year into base-year money

use serde::{Deserialize, Serialize};

use crate::error::ProjectionError;

/// Compounding deflator with a single annual inflation rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InflationModel {
    /// Annual inflation rate
    pub annual_rate: f64,

    /// Year in which real and nominal amounts coincide
    pub base_year: i32,
}

impl InflationModel {
    pub fn new(annual_rate: f64, base_year: i32) -> Self {
        Self { annual_rate, base_year }
    }

    /// Cumulative price level of `year` relative to the base year
    pub fn cumulative_factor(&self, year: i32) -> Result<f64, ProjectionError> {
        if year < self.base_year {
            return Err(ProjectionError::InvalidYearOrder { year, base_year: self.base_year });
        }
        let factor = (1.0 + self.annual_rate).powi(year - self.base_year);
        if !factor.is_finite() || factor <= 0.0 {
            return Err(ProjectionError::domain(
                "annual_inflation_rate",
                format!("rate {} gives deflation factor {factor} for {year}", self.annual_rate),
            ));
        }
        Ok(factor)
    }

    /// Real value of `nominal` received in `year`
    pub fn deflate(&self, nominal: f64, year: i32) -> Result<f64, ProjectionError> {
        if year == self.base_year {
            return Ok(nominal);
        }
        Ok(nominal / self.cumulative_factor(year)?)
    }

    /// One-off deflation without building a model
    pub fn deflate_at(
        nominal: f64,
        year: i32,
        base_year: i32,
        annual_rate: f64,
    ) -> Result<f64, ProjectionError> {
        Self::new(annual_rate, base_year).deflate(nominal, year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_at_base_year() {
        let model = InflationModel::new(0.025, 2026);
        assert_eq!(model.deflate(12_345.67, 2026).unwrap(), 12_345.67);
    }

    #[test]
    fn test_compounding() {
        let real = InflationModel::deflate_at(1_000.0, 2036, 2026, 0.03).unwrap();
        assert_relative_eq!(real, 1_000.0 / 1.03_f64.powi(10), epsilon = 1e-9);
        assert!(real < 1_000.0);
    }

    #[test]
    fn test_deflation_raises_real_value() {
        let real = InflationModel::deflate_at(1_000.0, 2030, 2026, -0.01).unwrap();
        assert!(real > 1_000.0);
    }

    #[test]
    fn test_year_before_base_rejected() {
        let err = InflationModel::deflate_at(1.0, 2025, 2026, 0.02).unwrap_err();
        assert_eq!(err, ProjectionError::InvalidYearOrder { year: 2025, base_year: 2026 });
    }

    #[test]
    fn test_total_loss_rate_is_domain_error() {
        let err = InflationModel::deflate_at(1.0, 2027, 2026, -1.0).unwrap_err();
        assert_eq!(err.field(), Some("annual_inflation_rate"));
    }
}

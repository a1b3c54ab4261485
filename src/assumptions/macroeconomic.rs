//! Macroeconomic assumptions: inflation, wage growth and pillar valorization
//!
//! Future years use flat projected rates. Years covered by the historical
//! table use the published figures instead, which matters when rebuilding
//! capital for years already worked.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Published figures for one calendar year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalYear {
    /// CPI inflation
    pub inflation: f64,
    /// Real wage growth
    pub real_wage_growth: f64,
    /// Pillar I valorization index
    pub i_pillar_index: f64,
    /// Pillar II indexation
    pub ii_pillar_index: f64,
}

/// (year, inflation, real wage growth, pillar I index, pillar II index)
const POLAND_2005_2024: [(i32, f64, f64, f64, f64); 20] = [
    (2005, 0.021, 0.018, 0.039, 0.029),
    (2006, 0.013, 0.022, 0.035, 0.026),
    (2007, 0.025, 0.025, 0.050, 0.038),
    (2008, 0.043, 0.020, 0.063, 0.047),
    (2009, 0.035, 0.015, 0.050, 0.038),
    (2010, 0.026, 0.018, 0.044, 0.033),
    (2011, 0.043, 0.017, 0.060, 0.045),
    (2012, 0.037, 0.012, 0.049, 0.037),
    (2013, 0.009, 0.015, 0.024, 0.018),
    (2014, 0.000, 0.018, 0.018, 0.014),
    (2015, -0.009, 0.020, 0.011, 0.008),
    (2016, -0.006, 0.022, 0.016, 0.012),
    (2017, 0.020, 0.024, 0.044, 0.033),
    (2018, 0.016, 0.028, 0.044, 0.033),
    (2019, 0.023, 0.030, 0.053, 0.040),
    (2020, 0.034, 0.008, 0.042, 0.032),
    (2021, 0.051, -0.010, 0.041, 0.031),
    (2022, 0.144, -0.021, 0.123, 0.092),
    (2023, 0.115, 0.011, 0.126, 0.095),
    (2024, 0.037, 0.045, 0.082, 0.062),
];

/// Macroeconomic factors driving salary growth, valorization and deflation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroeconomicFactors {
    /// Projected average annual inflation
    pub inflation_rate: f64,

    /// Projected real wage growth
    pub real_wage_growth_rate: f64,

    /// Projected pillar I valorization (inflation + real growth)
    pub i_pillar_growth_rate: f64,

    /// Projected pillar II indexation
    pub ii_pillar_growth_rate: f64,

    /// Known figures by calendar year
    pub historical: BTreeMap<i32, HistoricalYear>,
}

impl MacroeconomicFactors {
    /// Flat projected rates with an empty history
    pub fn flat(
        inflation_rate: f64,
        real_wage_growth_rate: f64,
        i_pillar: f64,
        ii_pillar: f64,
    ) -> Self {
        Self {
            inflation_rate,
            real_wage_growth_rate,
            i_pillar_growth_rate: i_pillar,
            ii_pillar_growth_rate: ii_pillar,
            historical: BTreeMap::new(),
        }
    }

    /// Built-in Polish history for 2005-2024
    pub fn poland_history() -> BTreeMap<i32, HistoricalYear> {
        POLAND_2005_2024
            .iter()
            .map(|&(year, inflation, real_wage_growth, i_pillar_index, ii_pillar_index)| {
                (
                    year,
                    HistoricalYear {
                        inflation,
                        real_wage_growth,
                        i_pillar_index,
                        ii_pillar_index,
                    },
                )
            })
            .collect()
    }

    /// Nominal wage growth used to index salaries forward
    pub fn nominal_wage_growth_rate(&self) -> f64 {
        self.inflation_rate + self.real_wage_growth_rate
    }

    /// Pillar I valorization rate applied during `year`
    pub fn i_pillar_rate(&self, year: i32) -> f64 {
        self.historical
            .get(&year)
            .map(|h| h.i_pillar_index)
            .unwrap_or(self.i_pillar_growth_rate)
    }

    /// Pillar II indexation rate applied during `year`
    pub fn ii_pillar_rate(&self, year: i32) -> f64 {
        self.historical
            .get(&year)
            .map(|h| h.ii_pillar_index)
            .unwrap_or(self.ii_pillar_growth_rate)
    }
}

impl Default for MacroeconomicFactors {
    fn default() -> Self {
        Self {
            inflation_rate: 0.025,
            real_wage_growth_rate: 0.02,
            i_pillar_growth_rate: 0.045,
            ii_pillar_growth_rate: 0.0475,
            historical: Self::poland_history(),
        }
    }
}

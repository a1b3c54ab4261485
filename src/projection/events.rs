//! Resolution of age-based simulation events onto calendar years

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ProjectionError;
use crate::profile::SimulationEvent;

/// Effect of the events active in one calendar year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EventEffect {
    pub basis_zero: bool,
    pub contrib_multiplier: f64,
}

impl EventEffect {
    /// No event: full contribution base
    pub const NONE: EventEffect = EventEffect {
        basis_zero: false,
        contrib_multiplier: 1.0,
    };

    /// Multiplier actually applied to the base
    pub fn effective_multiplier(&self) -> f64 {
        if self.basis_zero {
            0.0
        } else {
            self.contrib_multiplier
        }
    }

    /// Keep the more severe of two overlapping effects; ties keep `self`
    fn most_severe(self, other: EventEffect) -> EventEffect {
        if other.effective_multiplier() < self.effective_multiplier() {
            other
        } else {
            self
        }
    }
}

impl Default for EventEffect {
    fn default() -> Self {
        Self::NONE
    }
}

fn validate_event(index: usize, event: &SimulationEvent) -> Result<(), ProjectionError> {
    if event.end_age < event.start_age {
        return Err(ProjectionError::event(
            index,
            "end_age",
            format!("end age {} precedes start age {}", event.end_age, event.start_age),
        ));
    }
    let m = event.contrib_multiplier;
    if !m.is_finite() || !(0.0..=1.0).contains(&m) {
        return Err(ProjectionError::event(
            index,
            "contrib_multiplier",
            format!("{m} is outside [0, 1]"),
        ));
    }
    Ok(())
}

/// Map events onto absolute years within `[base_year, base_year + horizon_years]`
///
/// Events are half-open age intervals. Years where several events overlap get
/// the effect with the lowest effective multiplier. Events entirely outside
/// the horizon are dropped.
pub fn resolve_events(
    events: &[SimulationEvent],
    base_year: i32,
    current_age: u32,
    horizon_years: u32,
) -> Result<BTreeMap<i32, EventEffect>, ProjectionError> {
    let first_year = base_year;
    let last_year = base_year + horizon_years as i32;
    let mut effects: BTreeMap<i32, EventEffect> = BTreeMap::new();

    // Ages come straight off the wire and may be arbitrarily large
    let to_year = |age: u32| i64::from(base_year) + i64::from(age) - i64::from(current_age);

    for (index, event) in events.iter().enumerate() {
        validate_event(index, event)?;

        let clipped_start = to_year(event.start_age).max(i64::from(first_year));
        let clipped_end = to_year(event.end_age).min(i64::from(last_year) + 1);
        if clipped_start >= clipped_end {
            log::debug!(
                "event #{index} ({}) at ages {}..{} falls outside {first_year}..={last_year}, ignored",
                event.reason,
                event.start_age,
                event.end_age
            );
            continue;
        }

        let effect = EventEffect {
            basis_zero: event.basis_zero,
            contrib_multiplier: if event.basis_zero { 0.0 } else { event.contrib_multiplier },
        };
        // Both bounds now lie within [first_year, last_year + 1]
        for year in clipped_start as i32..clipped_end as i32 {
            effects
                .entry(year)
                .and_modify(|existing| *existing = existing.most_severe(effect))
                .or_insert(effect);
        }
    }

    Ok(effects)
}

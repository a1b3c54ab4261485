//! Member profiles and cohort loading

mod data;
pub mod loader;

pub use data::{ProjectionInput, SimulationEvent, OpeningBalance, MAX_AGE};
pub use loader::{load_profiles, load_profiles_from_reader, load_events, CohortProfile};

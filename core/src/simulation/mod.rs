//! Wire-level data model of a simulation run.

mod event;
mod result;
mod run_config;
mod scores;

pub use event::{ActionEvent, LogEvent, NarrativeEvent};
pub use result::SimulationResult;
pub use run_config::{RunConfiguration, SimulateRequest};
pub use scores::{FinalScores, ScoreEntry};

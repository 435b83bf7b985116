use serde::Deserialize;

use super::event::LogEvent;
use super::scores::FinalScores;

/// Successful response of `POST /simulate`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationResult {
    pub game_log: Vec<LogEvent>,
    pub final_scores: FinalScores,
}

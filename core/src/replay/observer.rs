use async_trait::async_trait;

use super::render::RenderedLine;
use crate::simulation::FinalScores;

/// What the UI learns after each narrated event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayStep {
    /// 0-based position in the log.
    pub index: usize,
    pub total: usize,
    pub line: RenderedLine,
    /// Table after this event; unchanged unless the event carried `table_after`.
    pub table: Vec<String>,
    pub table_changed: bool,
}

#[async_trait]
pub trait ReplayObserver: Send {
    async fn on_event(&mut self, step: ReplayStep);

    /// Called exactly once, after the last event, unless the replay was cancelled.
    async fn on_complete(&mut self, scores: &FinalScores);
}

/// Collects every step and completion in memory.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    pub steps: Vec<ReplayStep>,
    pub completions: Vec<FinalScores>,
}

#[async_trait]
impl ReplayObserver for RecordingObserver {
    async fn on_event(&mut self, step: ReplayStep) {
        self.steps.push(step);
    }

    async fn on_complete(&mut self, scores: &FinalScores) {
        self.completions.push(scores.clone());
    }
}

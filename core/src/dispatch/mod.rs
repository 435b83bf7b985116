//! Validates a [`RunConfiguration`] and hands it to the backend, once.

use std::sync::Arc;

use crate::backend::SimulationBackend;
use crate::error::DispatchError;
use crate::simulation::{RunConfiguration, SimulationResult};

#[derive(Clone)]
pub struct Dispatcher {
    backend: Arc<dyn SimulationBackend>,
}

impl Dispatcher {
    pub fn new(backend: Arc<dyn SimulationBackend>) -> Self {
        Self { backend }
    }

    #[tracing::instrument(
        name = "dispatch.submit",
        skip(self, config),
        fields(backend = self.backend.name(), players = config.num_players)
    )]
    pub async fn submit(
        &self,
        config: &RunConfiguration,
    ) -> Result<SimulationResult, DispatchError> {
        if let Err(err) = config.validate() {
            tracing::warn!(
                target: "escoba.dispatch",
                stage = "dispatch.validate.failed",
                error = %err
            );
            return Err(err.into());
        }

        let request = config.to_request();
        tracing::debug!(
            target: "escoba.dispatch",
            stage = "dispatch.request.in",
            models = ?request.models
        );
        let result = self.backend.simulate(&request).await?;
        tracing::debug!(
            target: "escoba.dispatch",
            stage = "dispatch.request.out",
            events = result.game_log.len(),
            players = result.final_scores.len()
        );
        Ok(result)
    }
}

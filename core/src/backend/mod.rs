//! Seams to the remote simulation service. `escoba-plugins` provides the HTTP
//! implementation; tests plug in in-memory fakes.

use async_trait::async_trait;

use crate::error::{CatalogUnavailable, TransportError};
use crate::simulation::{SimulateRequest, SimulationResult};

#[async_trait]
pub trait SimulationBackend: Send + Sync {
    fn name(&self) -> &str;

    /// Issue one run. Implementations must not retry.
    async fn simulate(
        &self,
        request: &SimulateRequest<'_>,
    ) -> Result<SimulationResult, TransportError>;
}

#[async_trait]
pub trait ModelCatalog: Send + Sync {
    async fn fetch_models(&self) -> Result<Vec<String>, CatalogUnavailable>;
}

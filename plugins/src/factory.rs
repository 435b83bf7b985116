use std::sync::Arc;

use anyhow::Result;

use escoba_core::api::{BackendConfig, CatalogCache, SessionController};
use escoba_core::config::AppConfig;

use crate::http::HttpBackend;

pub fn build_backend(cfg: &BackendConfig) -> Result<Arc<HttpBackend>> {
    Ok(Arc::new(HttpBackend::from_config(cfg)?))
}

pub fn build_catalog(backend: Arc<HttpBackend>) -> CatalogCache {
    CatalogCache::new(backend)
}

pub fn build_controller(cfg: &AppConfig, backend: Arc<HttpBackend>) -> SessionController {
    SessionController::from_config(backend, &cfg.replay)
}

use std::time::Duration;

use async_trait::async_trait;
use escoba_core::api::{
    BackendConfig, CatalogUnavailable, ModelCatalog, SimulateRequest, SimulationBackend,
    SimulationResult, TransportError,
};
use serde::de::DeserializeOwned;

use super::error::{preview_body, status_message, HttpError};

async fn parse_json_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, HttpError> {
    let status = resp.status();
    let url = resp.url().to_string();
    let body = resp
        .text()
        .await
        .map_err(|err| HttpError::from_reqwest(err, url.clone()))?;

    if !status.is_success() {
        let message = status_message(status, &body);
        return Err(HttpError::status_error(status.as_u16(), url, message));
    }

    serde_json::from_str::<T>(&body).map_err(|err| {
        let preview = preview_body(&body);
        HttpError::decode_error(status.as_u16(), url, err, preview)
    })
}

/// Talks to the simulation service over HTTP: `GET /models` and `POST /simulate`.
#[derive(Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    request_timeout: Option<Duration>,
    catalog_timeout: Duration,
    // Pre-built URL endpoints
    url_models: String,
    url_simulate: String,
}

impl HttpBackend {
    pub fn new(
        base_url: &str,
        request_timeout_ms: Option<u64>,
        catalog_timeout_ms: u64,
    ) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().build()?;
        let normalized = base_url.trim().trim_end_matches('/');
        if normalized.is_empty() {
            anyhow::bail!("backend base_url is empty");
        }
        Ok(Self {
            http,
            request_timeout: request_timeout_ms.map(Duration::from_millis),
            catalog_timeout: Duration::from_millis(catalog_timeout_ms),
            url_models: format!("{}/models", normalized),
            url_simulate: format!("{}/simulate", normalized),
        })
    }

    pub fn from_config(cfg: &BackendConfig) -> anyhow::Result<Self> {
        Self::new(&cfg.base_url, cfg.request_timeout_ms, cfg.catalog_timeout_ms)
    }
}

#[async_trait]
impl SimulationBackend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn simulate(
        &self,
        request: &SimulateRequest<'_>,
    ) -> Result<SimulationResult, TransportError> {
        let url = &self.url_simulate;
        tracing::debug!(
            target: "escoba.http",
            stage = "http.simulate.in",
            url = %url,
            num_players = request.num_players,
            timeout_ms = ?self.request_timeout.map(|t| t.as_millis())
        );
        let mut req = self.http.post(url).json(request);
        if let Some(timeout) = self.request_timeout {
            req = req.timeout(timeout);
        }
        let resp = req.send().await.map_err(|err| {
            let err = HttpError::from_reqwest(err, url.clone());
            tracing::warn!(target: "escoba.http", stage = "http.simulate.error", error = %err);
            err
        })?;
        let status = resp.status();
        let result = parse_json_response::<SimulationResult>(resp)
            .await
            .map_err(|err| {
                tracing::warn!(target: "escoba.http", stage = "http.simulate.error", error = %err);
                err
            })?;
        tracing::debug!(
            target: "escoba.http",
            stage = "http.simulate.out",
            status = %status,
            events = result.game_log.len()
        );
        Ok(result)
    }
}

#[async_trait]
impl ModelCatalog for HttpBackend {
    async fn fetch_models(&self) -> Result<Vec<String>, CatalogUnavailable> {
        let url = &self.url_models;
        tracing::debug!(target: "escoba.http", stage = "http.models.in", url = %url);
        let resp = self
            .http
            .get(url)
            .timeout(self.catalog_timeout)
            .send()
            .await
            .map_err(|err| HttpError::from_reqwest(err, url.clone()))?;
        let status = resp.status();
        let models = parse_json_response::<Vec<String>>(resp).await?;
        tracing::debug!(
            target: "escoba.http",
            stage = "http.models.out",
            status = %status,
            models = models.len()
        );
        Ok(models)
    }
}

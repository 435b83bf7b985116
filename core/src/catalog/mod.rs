//! Last-known-good cache over a [`ModelCatalog`].

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::backend::ModelCatalog;
use crate::error::CatalogUnavailable;

#[derive(Clone)]
pub struct CatalogCache {
    source: Arc<dyn ModelCatalog>,
    last_good: Arc<RwLock<Option<Vec<String>>>>,
}

impl CatalogCache {
    pub fn new(source: Arc<dyn ModelCatalog>) -> Self {
        Self {
            source,
            last_good: Arc::new(RwLock::new(None)),
        }
    }

    /// The cached catalog, fetching it on first use. Never fails: an
    /// unreachable catalog yields an empty list so the form still renders.
    pub async fn current(&self) -> Vec<String> {
        if let Some(models) = self.last_good.read().await.as_ref() {
            return models.clone();
        }
        match self.refresh().await {
            Ok(models) => models,
            Err(_) => Vec::new(),
        }
    }

    /// Force a new fetch. On failure the previous good catalog stays cached.
    pub async fn refresh(&self) -> Result<Vec<String>, CatalogUnavailable> {
        match self.source.fetch_models().await {
            Ok(models) => {
                tracing::debug!(
                    target: "escoba.catalog",
                    stage = "catalog.refresh.ok",
                    models = models.len()
                );
                *self.last_good.write().await = Some(models.clone());
                Ok(models)
            }
            Err(err) => {
                tracing::warn!(
                    target: "escoba.catalog",
                    stage = "catalog.refresh.failed",
                    error = %err,
                    "model catalog unavailable, offering custom models only"
                );
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedCatalog {
        replies: Mutex<Vec<Result<Vec<String>, CatalogUnavailable>>>,
        calls: AtomicUsize,
    }

    impl ScriptedCatalog {
        fn new(mut replies: Vec<Result<Vec<String>, CatalogUnavailable>>) -> Self {
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl ModelCatalog for ScriptedCatalog {
        async fn fetch_models(&self) -> Result<Vec<String>, CatalogUnavailable> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Err(CatalogUnavailable::new("exhausted")))
        }
    }

    fn ok(list: &[&str]) -> Result<Vec<String>, CatalogUnavailable> {
        Ok(list.iter().map(|s| s.to_string()).collect())
    }

    #[tokio::test]
    async fn current_fetches_once_then_reuses() {
        let source = Arc::new(ScriptedCatalog::new(vec![ok(&["a", "b"]), ok(&["c"])]));
        let cache = CatalogCache::new(source.clone());

        assert_eq!(cache.current().await, vec!["a", "b"]);
        assert_eq!(cache.current().await, vec!["a", "b"]);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unavailable_catalog_degrades_to_empty() {
        let source = Arc::new(ScriptedCatalog::new(vec![
            Err(CatalogUnavailable::new("connection refused")),
            ok(&["a"]),
        ]));
        let cache = CatalogCache::new(source.clone());

        assert!(cache.current().await.is_empty());
        // nothing was cached, so the next call fetches again
        assert_eq!(cache.current().await, vec!["a"]);
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_catalog() {
        let source = Arc::new(ScriptedCatalog::new(vec![
            ok(&["a"]),
            Err(CatalogUnavailable::new("502")),
        ]));
        let cache = CatalogCache::new(source);

        assert_eq!(cache.current().await, vec!["a"]);
        assert!(cache.refresh().await.is_err());
        assert_eq!(cache.current().await, vec!["a"]);
    }
}

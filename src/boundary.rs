// The boundary is fetched by the first page view that needs it and kept for
// the lifetime of the process. Failed fetches are never cached.

use crate::error::{MapError, MapResult};
use geojson::{FeatureCollection, GeoJson};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

/// GeoJSON FeatureCollection of polygon features. Properties are passed
/// through untouched.
pub type BoundaryDocument = FeatureCollection;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Capability to fetch the boundary document from somewhere.
pub trait BoundarySource: Send + Sync {
    fn fetch(&self) -> BoxFuture<'_, MapResult<BoundaryDocument>>;
}

/// Single GET against a fixed URL.
pub struct HttpBoundarySource {
    url: String,
    client: reqwest::Client,
}

impl HttpBoundarySource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> MapResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MapError::Fetch(format!("failed to build http client: {}", e)))?;
        Ok(Self {
            url: url.into(),
            client,
        })
    }
}

impl BoundarySource for HttpBoundarySource {
    fn fetch(&self) -> BoxFuture<'_, MapResult<BoundaryDocument>> {
        Box::pin(async move {
            let response = self
                .client
                .get(&self.url)
                .send()
                .await
                .map_err(|e| MapError::Fetch(format!("GET {} failed: {}", self.url, e)))?;
            let response = response
                .error_for_status()
                .map_err(|e| MapError::Fetch(format!("GET {} failed: {}", self.url, e)))?;
            let body = response
                .text()
                .await
                .map_err(|e| MapError::Fetch(format!("reading {} failed: {}", self.url, e)))?;
            parse_boundary(&body)
        })
    }
}

pub fn parse_boundary(body: &str) -> MapResult<BoundaryDocument> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| MapError::Fetch(format!("boundary body is not JSON: {}", e)))?;
    match GeoJson::from_json_value(value) {
        Ok(GeoJson::FeatureCollection(collection)) => Ok(collection),
        Ok(_) => Err(MapError::Fetch(
            "boundary document must be a FeatureCollection".to_string(),
        )),
        Err(e) => Err(MapError::Fetch(format!("boundary body is not GeoJSON: {}", e))),
    }
}

/// Get-or-fetch cache owned by the composition root.
///
/// Check-then-set: two first requests racing may both fetch, and the later
/// write replaces the earlier one. Both documents are equivalent.
pub struct BoundaryCache {
    source: Arc<dyn BoundarySource>,
    cached: RwLock<Option<Arc<BoundaryDocument>>>,
}

impl BoundaryCache {
    pub fn new(source: Arc<dyn BoundarySource>) -> Self {
        Self {
            source,
            cached: RwLock::new(None),
        }
    }

    pub async fn get_or_fetch(&self) -> MapResult<Arc<BoundaryDocument>> {
        let cached = self.cached.read().await.clone();
        if let Some(document) = cached {
            debug!("boundary cache hit");
            return Ok(document);
        }

        info!("fetching boundary document");
        let document = match self.source.fetch().await {
            Ok(document) => Arc::new(document),
            Err(e) => {
                error!(error = %e, "boundary fetch failed");
                return Err(e);
            }
        };
        info!(features = document.features.len(), "boundary document cached");

        *self.cached.write().await = Some(Arc::clone(&document));
        Ok(document)
    }

    #[cfg(test)]
    pub async fn cached(&self) -> Option<Arc<BoundaryDocument>> {
        self.cached.read().await.clone()
    }
}

use crate::boundary::{BoundaryCache, HttpBoundarySource};
use crate::config::{AppConfig, MapConfig};
use crate::error::{MapError, MapResult};
use crate::processing::compose_map;
use crate::render::PageRenderer;
use crate::types::Catalog;
use anyhow::{Context, Result};
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

pub struct AppState {
    pub catalog: Catalog,
    pub boundary: BoundaryCache,
    pub renderer: PageRenderer,
    pub map: MapConfig,
}

impl AppState {
    /// Compose and render one page view from the load-once catalog and the
    /// cached boundary.
    pub async fn page(&self) -> MapResult<String> {
        let boundary = self.boundary.get_or_fetch().await?;
        let map = compose_map(&self.catalog, &boundary, &self.map)?;
        self.renderer.render_page(&map, &self.map)
    }
}

impl IntoResponse for MapError {
    fn into_response(self) -> Response {
        error!(error = %self, "page render failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "The map could not be rendered.",
        )
            .into_response()
    }
}

pub fn boundary_cache(config: &AppConfig) -> MapResult<BoundaryCache> {
    let source = HttpBoundarySource::new(
        config.boundary.url.clone(),
        Duration::from_secs(config.boundary.timeout_secs),
    )?;
    Ok(BoundaryCache::new(Arc::new(source)))
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(page_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn start_server(config: AppConfig, catalog: Catalog) -> Result<()> {
    let state = Arc::new(AppState {
        catalog,
        boundary: boundary_cache(&config)?,
        renderer: PageRenderer::new()?,
        map: config.map.clone(),
    });

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("serving map on http://{}", addr);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn page_handler(State(state): State<Arc<AppState>>) -> Result<Html<String>, MapError> {
    state.page().await.map(Html)
}

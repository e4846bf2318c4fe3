//! radio-api library - HTTP query service for radio program episodes
//!
//! Thin transport adapter over the read-only catalog in `radio-common`.
//! Boundary validation (search term length, numeric parameters) happens here,
//! before any call into the query engine.

use std::sync::Arc;

use axum::Router;
use radio_common::{Catalog, QueryEngine};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Catalog loaded once at startup, never mutated afterwards
    pub catalog: Arc<Catalog>,
}

impl AppState {
    /// Create new application state
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(catalog),
        }
    }

    pub fn engine(&self) -> QueryEngine<'_> {
        QueryEngine::new(&self.catalog)
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let episodes = Router::new()
        .route("/programas", get(api::list_episodes))
        .route("/programas/", get(api::list_episodes))
        .route("/programas/fecha/:year", get(api::episodes_by_date))
        .route("/programas/fecha/:year/", get(api::episodes_by_date))
        .route("/programas/buscar", get(api::search_episodes))
        .route("/programas/buscar/", get(api::search_episodes));

    let service = Router::new()
        .route("/", get(api::welcome))
        .merge(api::health_routes());

    Router::new()
        .merge(episodes)
        .merge(service)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

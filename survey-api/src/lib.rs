//! survey-api library - AI readiness survey intake service
//!
//! Accepts one JSON survey per request, validates and normalizes it, and
//! stores it as a single `survey_results` row through a `Datastore`.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, Router};
use survey_common::db::Datastore;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod submission;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Persistence seam, one per process
    pub datastore: Arc<dyn Datastore>,
    /// Largest accepted survey body in bytes
    pub max_body_bytes: usize,
}

impl AppState {
    /// Create new application state
    pub fn new(datastore: Arc<dyn Datastore>, max_body_bytes: usize) -> Self {
        Self {
            datastore,
            max_body_bytes,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::post;

    let surveys = Router::new()
        .route("/upload_results", post(api::upload_results))
        .layer(DefaultBodyLimit::max(state.max_body_bytes));

    Router::new()
        .merge(surveys)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

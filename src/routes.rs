// src/routes.rs
use std::sync::Arc;

use axum::routing::{delete, get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::clock::Clock;
use crate::handlers;
use crate::store::PollStore;
use crate::templates::Templates;

/// Shared handles passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn PollStore>,
    pub clock: Arc<dyn Clock>,
    pub templates: Arc<Templates>,
}

impl AppState {
    pub fn new(store: Arc<dyn PollStore>, clock: Arc<dyn Clock>, templates: Templates) -> Self {
        Self {
            store,
            clock,
            templates: Arc::new(templates),
        }
    }
}

pub fn create_routes(state: AppState, cors_allow_any: bool) -> Router {
    let router = Router::new()
        .route("/", get(handlers::index))
        .route("/{question_id}/", get(handlers::detail))
        .route("/{question_id}/results/", get(handlers::results))
        .route("/{question_id}/vote/", post(handlers::vote))
        .route("/admin/questions", post(handlers::create_question))
        .route("/admin/questions/{question_id}", delete(handlers::delete_question))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if cors_allow_any {
        router.layer(CorsLayer::permissive())
    } else {
        router
    }
}

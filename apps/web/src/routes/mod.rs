pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::tracker::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Tracker page
        .route("/", get(handlers::handle_index))
        .route("/applications", post(handlers::handle_submit))
        .route("/applications/import", post(handlers::handle_import))
        .route("/applications/:id", post(handlers::handle_update))
        .route("/applications/:id/edit", get(handlers::handle_edit))
        .route("/applications/:id/delete", post(handlers::handle_delete))
        .with_state(state)
}

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::features::assistants::handlers;
use crate::features::assistants::services::AssistantService;

/// Create routes for the assistants feature
pub fn routes(service: Arc<AssistantService>) -> Router {
    Router::new()
        .route("/assistants", post(handlers::create_assistant))
        .route(
            "/assistants/{id}",
            get(handlers::get_assistant)
                .put(handlers::update_assistant)
                .delete(handlers::delete_assistant),
        )
        .with_state(service)
}

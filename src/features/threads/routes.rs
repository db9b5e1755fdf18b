use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::post,
    Router,
};

use crate::features::threads::handlers::{self, AttachmentState};
use crate::features::threads::services::{ThreadAttachmentService, ThreadService};

/// Create routes for the threads feature
pub fn routes(
    thread_service: Arc<ThreadService>,
    attachment_service: Arc<ThreadAttachmentService>,
    attachment_body_limit: usize,
) -> Router {
    let thread_routes = Router::new()
        .route("/threads", post(handlers::create_thread))
        .route(
            "/threads/{id}/messages",
            post(handlers::create_message).get(handlers::list_messages),
        )
        .with_state(thread_service);

    // Multipart bodies need a larger limit than axum's default
    let attachment_routes = Router::new()
        .route("/threads/{id}/files", post(handlers::attach_file))
        .layer(DefaultBodyLimit::max(attachment_body_limit))
        .with_state(AttachmentState { attachment_service });

    Router::new().merge(thread_routes).merge(attachment_routes)
}

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::core::error::Result;
use crate::features::threads::dtos::ThreadResponseDto;
use crate::features::threads::services::ThreadService;
use crate::shared::types::ErrorResponse;

/// Create an empty thread
#[utoipa::path(
    post,
    path = "/threads",
    tag = "threads",
    responses(
        (status = 201, description = "Thread created", body = ThreadResponseDto),
        (status = 500, description = "Upstream failure", body = ErrorResponse)
    )
)]
pub async fn create_thread(
    State(service): State<Arc<ThreadService>>,
) -> Result<(StatusCode, Json<ThreadResponseDto>)> {
    let thread = service.create_thread().await?;
    Ok((StatusCode::CREATED, Json(thread)))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::Value;
    use std::sync::Arc;

    use crate::shared::test_helpers::{threads_app, FakeAssistantsApi};

    #[tokio::test]
    async fn test_create_thread_returns_201() {
        let tmp = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeAssistantsApi::default());
        let server = TestServer::new(threads_app(api.clone(), tmp.path(), 1024)).unwrap();

        let response = server.post("/threads").await;
        response.assert_status(StatusCode::CREATED);
        let thread: Value = response.json();
        assert!(thread["id"].as_str().unwrap().starts_with("thread_"));
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_create_thread_upstream_failure_is_500() {
        let tmp = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeAssistantsApi::default());
        api.fail_all("Incorrect API key provided");
        let server = TestServer::new(threads_app(api, tmp.path(), 1024)).unwrap();

        let response = server.post("/threads").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        response.assert_json(&serde_json::json!({"error": "Incorrect API key provided"}));
    }
}

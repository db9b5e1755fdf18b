use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::{AppPath, ValidJson, ValidQuery};
use crate::features::threads::dtos::{CreateMessageDto, ListMessagesQuery, MessageResponseDto};
use crate::features::threads::services::ThreadService;
use crate::shared::types::{ErrorResponse, ValidationErrorResponse};

/// Append a message to a thread
#[utoipa::path(
    post,
    path = "/threads/{id}/messages",
    tag = "threads",
    params(
        ("id" = String, Path, description = "Thread ID")
    ),
    request_body = CreateMessageDto,
    responses(
        (status = 201, description = "Message created", body = MessageResponseDto),
        (status = 400, description = "Validation error", body = ValidationErrorResponse),
        (status = 500, description = "Upstream failure", body = ErrorResponse)
    )
)]
pub async fn create_message(
    State(service): State<Arc<ThreadService>>,
    AppPath(thread_id): AppPath<String>,
    ValidJson(dto): ValidJson<CreateMessageDto>,
) -> Result<(StatusCode, Json<MessageResponseDto>)> {
    let message = service.create_message(&thread_id, dto).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

/// List the messages of a thread in creation order
#[utoipa::path(
    get,
    path = "/threads/{id}/messages",
    tag = "threads",
    params(
        ("id" = String, Path, description = "Thread ID"),
        ListMessagesQuery
    ),
    responses(
        (status = 200, description = "Messages, oldest first", body = Vec<MessageResponseDto>),
        (status = 400, description = "Invalid query", body = ValidationErrorResponse),
        (status = 500, description = "Upstream failure", body = ErrorResponse)
    )
)]
pub async fn list_messages(
    State(service): State<Arc<ThreadService>>,
    AppPath(thread_id): AppPath<String>,
    ValidQuery(query): ValidQuery<ListMessagesQuery>,
) -> Result<Json<Vec<MessageResponseDto>>> {
    let messages = service.list_messages(&thread_id, query).await?;
    Ok(Json(messages))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::Arc;

    use crate::shared::test_helpers::{threads_app, FakeAssistantsApi};

    async fn server_with_thread() -> (TestServer, Arc<FakeAssistantsApi>, String, tempfile::TempDir) {
        let tmp = tempfile::tempdir().unwrap();
        let api = Arc::new(FakeAssistantsApi::default());
        let server = TestServer::new(threads_app(api.clone(), tmp.path(), 1024)).unwrap();
        let thread: Value = server.post("/threads").await.json();
        let thread_id = thread["id"].as_str().unwrap().to_string();
        (server, api, thread_id, tmp)
    }

    #[tokio::test]
    async fn test_create_message_returns_201() {
        let (server, _api, thread_id, _tmp) = server_with_thread().await;

        let response = server
            .post(&format!("/threads/{}/messages", thread_id))
            .json(&json!({"content": "What is 2 + 2?", "role": "user"}))
            .await;
        response.assert_status(StatusCode::CREATED);
        let message: Value = response.json();
        assert_eq!(message["thread_id"], thread_id.as_str());
        assert_eq!(message["role"], "user");
        assert_eq!(message["content"], "What is 2 + 2?");
        assert_eq!(message["file_ids"], json!([]));
    }

    #[tokio::test]
    async fn test_create_message_rejects_unknown_role() {
        let (server, api, thread_id, _tmp) = server_with_thread().await;
        let calls_before = api.call_count();

        for role in ["system", "tool", "USER", ""] {
            let response = server
                .post(&format!("/threads/{}/messages", thread_id))
                .json(&json!({"content": "hi", "role": role}))
                .await;
            response.assert_status(StatusCode::BAD_REQUEST);
            let body: Value = response.json();
            assert_eq!(body["errors"][0]["field"], "role");
        }

        assert_eq!(api.call_count(), calls_before);
    }

    #[tokio::test]
    async fn test_create_message_requires_content() {
        let (server, _api, thread_id, _tmp) = server_with_thread().await;

        let response = server
            .post(&format!("/threads/{}/messages", thread_id))
            .json(&json!({"content": "", "role": "assistant"}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(
            body["errors"],
            json!([{"field": "content", "message": "content must not be empty", "location": "body"}])
        );
    }

    #[tokio::test]
    async fn test_create_message_unknown_thread_is_500() {
        let (server, _api, _thread_id, _tmp) = server_with_thread().await;

        server
            .post("/threads/thread_missing/messages")
            .json(&json!({"content": "hi", "role": "user"}))
            .await
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_list_messages_in_creation_order() {
        let (server, _api, thread_id, _tmp) = server_with_thread().await;
        let path = format!("/threads/{}/messages", thread_id);

        for (content, role) in [("first", "user"), ("second", "assistant"), ("third", "user")] {
            server
                .post(&path)
                .json(&json!({"content": content, "role": role}))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server.get(&path).await;
        response.assert_status_ok();
        let messages: Vec<Value> = response.json();
        let contents: Vec<&str> = messages
            .iter()
            .map(|m| m["content"].as_str().unwrap())
            .collect();
        assert_eq!(contents, vec!["first", "second", "third"]);
    }

    #[tokio::test]
    async fn test_list_messages_pages_with_after() {
        let (server, _api, thread_id, _tmp) = server_with_thread().await;
        let path = format!("/threads/{}/messages", thread_id);

        let mut ids = Vec::new();
        for content in ["one", "two", "three"] {
            let message: Value = server
                .post(&path)
                .json(&json!({"content": content, "role": "user"}))
                .await
                .json();
            ids.push(message["id"].as_str().unwrap().to_string());
        }

        let page: Vec<Value> = server
            .get(&path)
            .add_query_param("after", &ids[0])
            .add_query_param("limit", 1)
            .await
            .json();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0]["content"], "two");
    }

    #[tokio::test]
    async fn test_list_messages_rejects_limit_out_of_range() {
        let (server, _api, thread_id, _tmp) = server_with_thread().await;

        let response = server
            .get(&format!("/threads/{}/messages", thread_id))
            .add_query_param("limit", 500)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["errors"][0]["field"], "limit");
        assert_eq!(body["errors"][0]["location"], "query");
    }
}

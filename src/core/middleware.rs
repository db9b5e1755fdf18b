use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::Request,
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use base64::prelude::*;
use tower_http::cors::{AllowOrigin, Any as AnyOrigin, CorsLayer};
use tower_http::request_id::{MakeRequestId, RequestId};
use tracing::Span;
use uuid::Uuid;

use crate::core::error::{unhandled_response, ErrorKind};

/// Request ID generator using UUID v7 (time-ordered)
#[derive(Clone, Copy)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Custom MakeSpan that includes request_id in the tracing span
#[derive(Clone, Debug)]
pub struct MakeSpanWithRequestId;

impl<B> tower_http::trace::MakeSpan<B> for MakeSpanWithRequestId {
    fn make_span(&mut self, request: &axum::http::Request<B>) -> Span {
        let request_id = request
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        tracing::info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id,
        )
    }
}

pub fn cors_layer(allowed_origins: Vec<String>) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods(AnyOrigin)
        .allow_headers(AnyOrigin);

    // If origins list contains "*", allow any origin
    if allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(AnyOrigin)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn basic_auth_middleware(
    valid_credentials: Arc<String>,
) -> impl Fn(
    Request,
    Next,
)
    -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<Response, Response>> + Send>>
       + Clone {
    move |req: Request, next: Next| {
        let credentials = valid_credentials.clone();
        Box::pin(async move {
            let auth_header = req
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|header| header.to_str().ok());

            if let Some(auth_header) = auth_header {
                if let Some(encoded) = auth_header.strip_prefix("Basic ") {
                    if let Ok(decoded) = BASE64_STANDARD.decode(encoded) {
                        if let Ok(creds) = String::from_utf8(decoded) {
                            if creds == *credentials {
                                return Ok(next.run(req).await);
                            }
                        }
                    }
                }
            }

            Err((
                StatusCode::UNAUTHORIZED,
                [(header::WWW_AUTHENTICATE, "Basic realm=\"Swagger UI\"")],
                "Unauthorized",
            )
                .into_response())
        })
    }
}

/// Promote generic 500s to 404/413/504 based on the failure kind
/// recorded by the error boundary. Installed only in strict mode.
pub async fn strict_status_codes(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    if let Some(status) = response
        .extensions()
        .get::<ErrorKind>()
        .and_then(|kind| kind.strict_status())
    {
        *response.status_mut() = status;
    }
    response
}

/// Outermost boundary for panics escaping a handler.
/// The client only ever sees the generic message.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    tracing::error!(panic = %detail, "Unhandled fault while serving request");
    unhandled_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};
    use axum_test::TestServer;
    use tower_http::catch_panic::CatchPanicLayer;

    use crate::core::error::AppError;
    use crate::modules::openai::UpstreamError;

    async fn not_found() -> Result<(), AppError> {
        Err(AppError::Upstream(UpstreamError::Api {
            status: 404,
            message: "No assistant found".to_string(),
        }))
    }

    async fn timed_out() -> Result<(), AppError> {
        Err(AppError::Upstream(UpstreamError::Timeout(
            "create thread".to_string(),
        )))
    }

    async fn explode() -> &'static str {
        panic!("secret internal detail at src/features/mod.rs:7")
    }

    #[tokio::test]
    async fn test_strict_mode_maps_upstream_not_found() {
        let app = Router::new()
            .route("/missing", get(not_found))
            .layer(axum::middleware::from_fn(strict_status_codes));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/missing").await;
        response.assert_status(StatusCode::NOT_FOUND);
        response.assert_json(&serde_json::json!({"error": "No assistant found"}));
    }

    #[tokio::test]
    async fn test_strict_mode_maps_timeout_to_504() {
        let app = Router::new()
            .route("/slow", get(timed_out))
            .layer(axum::middleware::from_fn(strict_status_codes));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/slow").await;
        response.assert_status(StatusCode::GATEWAY_TIMEOUT);
        response.assert_json(&serde_json::json!({
            "error": "Upstream request timed out: create thread"
        }));
    }

    #[tokio::test]
    async fn test_default_mode_keeps_500() {
        let app = Router::new().route("/missing", get(not_found));
        let server = TestServer::new(app).unwrap();

        server
            .get("/missing")
            .await
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_panic_yields_generic_body() {
        let app = Router::new()
            .route("/boom", get(explode))
            .layer(CatchPanicLayer::custom(handle_panic));
        let server = TestServer::new(app).unwrap();

        let response = server.get("/boom").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(response.text(), r#"{"error":"Something went wrong!"}"#);
        assert!(!response.text().contains("secret"));
    }

    #[tokio::test]
    async fn test_basic_auth_rejects_missing_credentials() {
        let app = Router::new()
            .route("/docs", get(|| async { "docs" }))
            .layer(axum::middleware::from_fn(basic_auth_middleware(Arc::new(
                "admin:secret".to_string(),
            ))));
        let server = TestServer::new(app).unwrap();

        server
            .get("/docs")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        let encoded = BASE64_STANDARD.encode("admin:secret");
        server
            .get("/docs")
            .add_header(
                header::AUTHORIZATION,
                HeaderValue::from_str(&format!("Basic {}", encoded)).unwrap(),
            )
            .await
            .assert_status_ok();
    }
}

use axum::{
    body::{Body, Bytes},
    extract::{FromRequest, FromRequestParts, Multipart, Path, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use validator::Validate;

use crate::core::error::AppError;
use crate::shared::types::ViolationLocation;
use crate::shared::validation::{all_violations, check_body, RequestSchema};

/// JSON body extractor that runs the schema check before the handler.
///
/// An empty body counts as `{}`. Syntax errors are a bad request; missing,
/// empty or mistyped fields are reported as field violations.
pub struct ValidJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidJson<T>
where
    T: RequestSchema,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(format!("Failed to read request body: {}", e)))?;

        let object = if bytes.iter().all(u8::is_ascii_whitespace) {
            Map::new()
        } else {
            match serde_json::from_slice::<Value>(&bytes) {
                Ok(Value::Object(map)) => map,
                Ok(_) => {
                    return Err(AppError::BadRequest(
                        "Request body must be a JSON object".to_string(),
                    ))
                }
                Err(e) => return Err(AppError::BadRequest(format!("Invalid JSON syntax: {}", e))),
            }
        };

        check_body::<T>(object)
            .map(ValidJson)
            .map_err(AppError::Validation)
    }
}

/// Query string extractor with validator rules applied
pub struct ValidQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid query string: {}", e.body_text())))?;

        value
            .validate()
            .map_err(|e| AppError::Validation(all_violations(&e, ViolationLocation::Query)))?;

        Ok(ValidQuery(value))
    }
}

/// Path parameters; a rejection goes through the `AppError` boundary
pub struct AppPath<T>(pub T);

impl<T, S> FromRequestParts<S> for AppPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid path parameter: {}", e.body_text())))?;

        Ok(AppPath(value))
    }
}

/// Multipart body; a missing or malformed `multipart/form-data` content type
/// is a bad request with the usual `{error}` body
pub struct ValidMultipart(pub Multipart);

impl<S> FromRequest<S> for ValidMultipart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        Multipart::from_request(req, state)
            .await
            .map(ValidMultipart)
            .map_err(|e| AppError::BadRequest(e.body_text()))
    }
}

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::{AppPath, ValidJson};
use crate::features::assistants::dtos::{
    AssistantResponseDto, CreateAssistantDto, DeleteAssistantResponseDto, UpdateAssistantDto,
};
use crate::features::assistants::services::AssistantService;
use crate::shared::types::{ErrorResponse, ValidationErrorResponse};

/// Create an assistant
#[utoipa::path(
    post,
    path = "/assistants",
    tag = "assistants",
    request_body = CreateAssistantDto,
    responses(
        (status = 201, description = "Assistant created", body = AssistantResponseDto),
        (status = 400, description = "Validation error", body = ValidationErrorResponse),
        (status = 500, description = "Upstream failure", body = ErrorResponse)
    )
)]
pub async fn create_assistant(
    State(service): State<Arc<AssistantService>>,
    ValidJson(dto): ValidJson<CreateAssistantDto>,
) -> Result<(StatusCode, Json<AssistantResponseDto>)> {
    let assistant = service.create(dto).await?;
    Ok((StatusCode::CREATED, Json(assistant)))
}

/// Get an assistant by ID
///
/// Unknown IDs surface as an upstream failure (500), or 404 in strict mode.
#[utoipa::path(
    get,
    path = "/assistants/{id}",
    tag = "assistants",
    params(
        ("id" = String, Path, description = "Assistant ID")
    ),
    responses(
        (status = 200, description = "Assistant found", body = AssistantResponseDto),
        (status = 500, description = "Upstream failure", body = ErrorResponse)
    )
)]
pub async fn get_assistant(
    State(service): State<Arc<AssistantService>>,
    AppPath(id): AppPath<String>,
) -> Result<Json<AssistantResponseDto>> {
    let assistant = service.get(&id).await?;
    Ok(Json(assistant))
}

/// Update an assistant
///
/// Any subset of `name`, `model` and `instructions` may be sent.
#[utoipa::path(
    put,
    path = "/assistants/{id}",
    tag = "assistants",
    params(
        ("id" = String, Path, description = "Assistant ID")
    ),
    request_body = UpdateAssistantDto,
    responses(
        (status = 200, description = "Assistant updated", body = AssistantResponseDto),
        (status = 400, description = "Validation error", body = ValidationErrorResponse),
        (status = 500, description = "Upstream failure", body = ErrorResponse)
    )
)]
pub async fn update_assistant(
    State(service): State<Arc<AssistantService>>,
    AppPath(id): AppPath<String>,
    ValidJson(dto): ValidJson<UpdateAssistantDto>,
) -> Result<Json<AssistantResponseDto>> {
    let assistant = service.update(&id, dto).await?;
    Ok(Json(assistant))
}

/// Delete an assistant
#[utoipa::path(
    delete,
    path = "/assistants/{id}",
    tag = "assistants",
    params(
        ("id" = String, Path, description = "Assistant ID")
    ),
    responses(
        (status = 200, description = "Assistant deleted", body = DeleteAssistantResponseDto),
        (status = 500, description = "Upstream failure", body = ErrorResponse)
    )
)]
pub async fn delete_assistant(
    State(service): State<Arc<AssistantService>>,
    AppPath(id): AppPath<String>,
) -> Result<Json<DeleteAssistantResponseDto>> {
    let deletion = service.delete(&id).await?;
    Ok(Json(deletion))
}

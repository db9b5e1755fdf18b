use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartError, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::core::error::AppError;
use crate::core::extractor::{AppPath, ValidMultipart};
use crate::features::threads::dtos::{AttachmentResponseDto, UploadAttachmentDto};
use crate::features::threads::services::ThreadAttachmentService;
use crate::modules::staging::{StagedUpload, StagingError};
use crate::shared::types::{ErrorResponse, FieldViolation, ValidationErrorResponse};

/// State for attachment handlers
#[derive(Clone)]
pub struct AttachmentState {
    pub attachment_service: Arc<ThreadAttachmentService>,
}

/// Oversized bodies rejected by the body limit are reported like oversized files
fn multipart_error(e: MultipartError, max_file_size: usize) -> AppError {
    debug!("Failed to read multipart data: {}", e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Staging(StagingError::PayloadTooLarge {
            limit: max_file_size,
        })
    } else {
        AppError::BadRequest(format!("Failed to read multipart data: {}", e.body_text()))
    }
}

/// Attach a file to a thread
///
/// Stages the `file` part locally, uploads it upstream, then adds a user
/// message referencing the uploaded file.
#[utoipa::path(
    post,
    path = "/threads/{id}/files",
    tag = "threads",
    params(
        ("id" = String, Path, description = "Thread ID")
    ),
    request_body(
        content = UploadAttachmentDto,
        content_type = "multipart/form-data",
        description = "File to attach to the thread"
    ),
    responses(
        (status = 201, description = "File uploaded and message created", body = AttachmentResponseDto),
        (status = 400, description = "Missing file or malformed multipart body", body = ValidationErrorResponse),
        (status = 500, description = "Staging or upstream failure", body = ErrorResponse)
    )
)]
pub async fn attach_file(
    AppPath(thread_id): AppPath<String>,
    State(state): State<AttachmentState>,
    ValidMultipart(mut multipart): ValidMultipart,
) -> Result<(StatusCode, Json<AttachmentResponseDto>), AppError> {
    let max_file_size = state.attachment_service.max_file_size();
    let mut staged: Option<StagedUpload> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_file_size))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        if field_name != "file" {
            debug!("Ignoring unknown field: {}", field_name);
            continue;
        }

        if staged.is_some() {
            return Err(AppError::BadRequest(
                "Only one file may be attached per request".to_string(),
            ));
        }

        let file_name = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "unnamed".to_string());
        let content_type = field.content_type().map(|s| s.to_string());

        let mut writer = state
            .attachment_service
            .begin_upload(&file_name, content_type)
            .await?;

        // Chunks are checked against the limit before they touch the disk
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(e, max_file_size))?
        {
            writer.write_chunk(&chunk).await?;
        }

        staged = Some(writer.finish().await?);
    }

    let staged = staged.ok_or_else(|| {
        AppError::Validation(vec![FieldViolation::body("file", "file is required")])
    })?;

    let response = state
        .attachment_service
        .attach_file(&thread_id, staged)
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

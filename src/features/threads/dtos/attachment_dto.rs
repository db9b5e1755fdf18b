use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::threads::dtos::MessageResponseDto;
use crate::modules::openai::UpstreamFile;

/// Content of the message created for every attached file
pub const ATTACHMENT_PROMPT: &str = "Please analyze the attached file";

/// Upload attachment request DTO for OpenAPI documentation
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadAttachmentDto {
    /// The file to attach
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

/// A file accepted by the upstream service
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadedFileDto {
    pub id: String,
    /// Original filename as uploaded
    pub filename: String,
    pub purpose: String,
    /// Size of the file in bytes
    pub bytes: u64,
    pub created_at: i64,
}

impl From<UpstreamFile> for UploadedFileDto {
    fn from(file: UpstreamFile) -> Self {
        Self {
            id: file.id,
            filename: file.filename,
            purpose: file.purpose,
            bytes: file.bytes,
            created_at: file.created_at,
        }
    }
}

/// Response DTO for attaching a file to a thread
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttachmentResponseDto {
    pub file: UploadedFileDto,
    pub message: MessageResponseDto,
}

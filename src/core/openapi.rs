use utoipa::{Modify, OpenApi};

use crate::features::assistants::{dtos as assistants_dtos, handlers as assistants_handlers};
use crate::features::threads::{dtos as threads_dtos, handlers as threads_handlers};
use crate::modules::openai::MessageRole;
use crate::shared::types::{
    ErrorResponse, FieldViolation, ValidationErrorResponse, ViolationLocation,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Assistants
        assistants_handlers::create_assistant,
        assistants_handlers::get_assistant,
        assistants_handlers::update_assistant,
        assistants_handlers::delete_assistant,
        // Threads
        threads_handlers::create_thread,
        threads_handlers::create_message,
        threads_handlers::list_messages,
        threads_handlers::attach_file,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            ValidationErrorResponse,
            FieldViolation,
            ViolationLocation,
            MessageRole,
            // Assistants
            assistants_dtos::CreateAssistantDto,
            assistants_dtos::UpdateAssistantDto,
            assistants_dtos::AssistantResponseDto,
            assistants_dtos::DeleteAssistantResponseDto,
            // Threads
            threads_dtos::ThreadResponseDto,
            threads_dtos::CreateMessageDto,
            threads_dtos::MessageResponseDto,
            threads_dtos::UploadAttachmentDto,
            threads_dtos::UploadedFileDto,
            threads_dtos::AttachmentResponseDto,
        )
    ),
    tags(
        (name = "assistants", description = "Assistant management"),
        (name = "threads", description = "Threads, messages and file attachments"),
    ),
    info(
        title = "Assistant Gateway API",
        version = "0.1.0",
        description = "REST surface over the upstream assistants service",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

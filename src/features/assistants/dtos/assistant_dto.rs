use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::modules::openai::{UpstreamAssistant, UpstreamDeletion};
use crate::shared::validation::RequestSchema;

/// Request DTO for creating an assistant
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateAssistantDto {
    /// Display name of the assistant
    #[validate(
        required(message = "name is required"),
        length(min = 1, message = "name must not be empty")
    )]
    #[schema(value_type = String, example = "Math Tutor")]
    pub name: Option<String>,

    /// Identifier of the backing model
    #[validate(
        required(message = "model is required"),
        length(min = 1, message = "model must not be empty")
    )]
    #[schema(value_type = String, example = "gpt-4o")]
    pub model: Option<String>,

    /// System instructions for the assistant
    #[validate(
        required(message = "instructions is required"),
        length(min = 1, message = "instructions must not be empty")
    )]
    #[schema(value_type = String, example = "You are a personal math tutor.")]
    pub instructions: Option<String>,
}

impl RequestSchema for CreateAssistantDto {
    const FIELDS: &'static [&'static str] = &["name", "model", "instructions"];
}

/// Request DTO for a partial assistant update.
///
/// Every field is optional; an empty object is a no-op update.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateAssistantDto {
    pub name: Option<String>,
    pub model: Option<String>,
    pub instructions: Option<String>,
}

impl RequestSchema for UpdateAssistantDto {
    const FIELDS: &'static [&'static str] = &["name", "model", "instructions"];
}

/// Response DTO for assistant operations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AssistantResponseDto {
    pub id: String,
    pub name: Option<String>,
    pub model: String,
    pub instructions: Option<String>,
    /// Unix timestamp (seconds) assigned upstream
    pub created_at: i64,
}

impl From<UpstreamAssistant> for AssistantResponseDto {
    fn from(assistant: UpstreamAssistant) -> Self {
        Self {
            id: assistant.id,
            name: assistant.name,
            model: assistant.model,
            instructions: assistant.instructions,
            created_at: assistant.created_at,
        }
    }
}

/// Response DTO for delete operations
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DeleteAssistantResponseDto {
    pub id: String,
    pub deleted: bool,
}

impl From<UpstreamDeletion> for DeleteAssistantResponseDto {
    fn from(deletion: UpstreamDeletion) -> Self {
        Self {
            id: deletion.id,
            deleted: deletion.deleted,
        }
    }
}

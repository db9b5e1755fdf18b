use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::modules::openai::{MessageRole, UpstreamMessage};
use crate::shared::validation::RequestSchema;

/// Request DTO for appending a message to a thread
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateMessageDto {
    /// Message text
    #[validate(
        required(message = "content is required"),
        length(min = 1, message = "content must not be empty")
    )]
    #[schema(value_type = String, example = "What is 2 + 2?")]
    pub content: Option<String>,

    /// Author role: "user" or "assistant"
    #[validate(
        required(message = "role is required"),
        custom(function = "crate::shared::validation::validate_role")
    )]
    #[schema(value_type = MessageRole, example = "user")]
    pub role: Option<String>,
}

impl RequestSchema for CreateMessageDto {
    const FIELDS: &'static [&'static str] = &["content", "role"];
}

/// Query params for listing thread messages
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListMessagesQuery {
    /// Maximum number of messages to return (1-100)
    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    #[param(minimum = 1, maximum = 100)]
    pub limit: Option<u32>,

    /// Return messages created after this message ID
    #[validate(length(min = 1, message = "after must not be empty"))]
    pub after: Option<String>,
}

/// Response DTO for a thread message
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponseDto {
    pub id: String,
    pub thread_id: String,
    pub role: MessageRole,
    /// Text content of the message
    pub content: String,
    /// IDs of files attached to the message
    pub file_ids: Vec<String>,
    pub created_at: i64,
}

impl From<UpstreamMessage> for MessageResponseDto {
    fn from(message: UpstreamMessage) -> Self {
        let content = message.text();
        let file_ids = message.referenced_file_ids();
        Self {
            id: message.id,
            thread_id: message.thread_id,
            role: message.role,
            content,
            file_ids,
            created_at: message.created_at,
        }
    }
}

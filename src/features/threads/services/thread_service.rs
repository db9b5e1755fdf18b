use std::sync::Arc;

use tracing::info;

use crate::core::error::{AppError, Result};
use crate::features::threads::dtos::{
    CreateMessageDto, ListMessagesQuery, MessageResponseDto, ThreadResponseDto,
};
use crate::modules::openai::{AssistantsApi, CreateMessageRequest, ListMessagesParams, MessageRole};

/// Service for threads and their messages
pub struct ThreadService {
    api: Arc<dyn AssistantsApi>,
}

impl ThreadService {
    pub fn new(api: Arc<dyn AssistantsApi>) -> Self {
        Self { api }
    }

    pub async fn create_thread(&self) -> Result<ThreadResponseDto> {
        let thread = self.api.create_thread().await?;

        info!(thread_id = %thread.id, "Thread created");
        Ok(thread.into())
    }

    pub async fn create_message(
        &self,
        thread_id: &str,
        dto: CreateMessageDto,
    ) -> Result<MessageResponseDto> {
        let role = dto.role.as_deref().and_then(MessageRole::parse);
        let (Some(content), Some(role)) = (dto.content, role) else {
            return Err(AppError::Internal(
                "create message payload reached the service unvalidated".to_string(),
            ));
        };

        let message = self
            .api
            .create_message(
                thread_id,
                CreateMessageRequest {
                    role,
                    content,
                    attachments: Vec::new(),
                },
            )
            .await?;

        info!(thread_id, message_id = %message.id, "Message created");
        Ok(message.into())
    }

    /// Messages in creation order
    pub async fn list_messages(
        &self,
        thread_id: &str,
        query: ListMessagesQuery,
    ) -> Result<Vec<MessageResponseDto>> {
        let messages = self
            .api
            .list_messages(
                thread_id,
                ListMessagesParams::chronological(query.limit, query.after),
            )
            .await?;

        Ok(messages.into_iter().map(Into::into).collect())
    }
}

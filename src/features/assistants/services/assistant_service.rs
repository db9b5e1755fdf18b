use std::sync::Arc;

use tracing::info;

use crate::core::error::{AppError, Result};
use crate::features::assistants::dtos::{
    AssistantResponseDto, CreateAssistantDto, DeleteAssistantResponseDto, UpdateAssistantDto,
};
use crate::modules::openai::{AssistantsApi, CreateAssistantRequest, UpdateAssistantRequest};

/// Service for managing assistants held by the upstream service
pub struct AssistantService {
    api: Arc<dyn AssistantsApi>,
}

impl AssistantService {
    pub fn new(api: Arc<dyn AssistantsApi>) -> Self {
        Self { api }
    }

    pub async fn create(&self, dto: CreateAssistantDto) -> Result<AssistantResponseDto> {
        // The extractor guarantees all three fields are present
        let (Some(name), Some(model), Some(instructions)) = (dto.name, dto.model, dto.instructions)
        else {
            return Err(AppError::Internal(
                "create assistant payload reached the service unvalidated".to_string(),
            ));
        };

        let assistant = self
            .api
            .create_assistant(CreateAssistantRequest {
                name,
                model,
                instructions,
            })
            .await?;

        info!(assistant_id = %assistant.id, "Assistant created");
        Ok(assistant.into())
    }

    pub async fn get(&self, assistant_id: &str) -> Result<AssistantResponseDto> {
        let assistant = self.api.get_assistant(assistant_id).await?;
        Ok(assistant.into())
    }

    pub async fn update(
        &self,
        assistant_id: &str,
        dto: UpdateAssistantDto,
    ) -> Result<AssistantResponseDto> {
        let request = UpdateAssistantRequest {
            name: dto.name,
            model: dto.model,
            instructions: dto.instructions,
        };

        let assistant = self.api.update_assistant(assistant_id, request).await?;

        info!(assistant_id = %assistant.id, "Assistant updated");
        Ok(assistant.into())
    }

    pub async fn delete(&self, assistant_id: &str) -> Result<DeleteAssistantResponseDto> {
        let deletion = self.api.delete_assistant(assistant_id).await?;

        info!(assistant_id = %deletion.id, deleted = deletion.deleted, "Assistant deleted");
        Ok(deletion.into())
    }
}

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::core::error::Result;
use crate::features::threads::dtos::{AttachmentResponseDto, UploadedFileDto, ATTACHMENT_PROMPT};
use crate::modules::openai::{
    AssistantsApi, CreateMessageRequest, MessageAttachment, MessageRole, ASSISTANTS_FILE_PURPOSE,
};
use crate::modules::staging::{StagedUpload, StagingWriter, UploadStagingStore};

/// Service for attaching files to threads.
///
/// Attaching is two upstream calls: the file upload, then a user message
/// referencing the uploaded file. The pair is not atomic.
pub struct ThreadAttachmentService {
    api: Arc<dyn AssistantsApi>,
    staging: Arc<UploadStagingStore>,
    compensate_orphans: bool,
}

impl ThreadAttachmentService {
    pub fn new(
        api: Arc<dyn AssistantsApi>,
        staging: Arc<UploadStagingStore>,
        compensate_orphans: bool,
    ) -> Self {
        Self {
            api,
            staging,
            compensate_orphans,
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.staging.max_file_size()
    }

    /// Start staging an incoming file part
    pub async fn begin_upload(
        &self,
        original_filename: &str,
        content_type: Option<String>,
    ) -> Result<StagingWriter> {
        Ok(self.staging.begin(original_filename, content_type).await?)
    }

    /// Forward a staged file upstream and reference it from a new user message
    pub async fn attach_file(
        &self,
        thread_id: &str,
        staged: StagedUpload,
    ) -> Result<AttachmentResponseDto> {
        let original_filename = staged.original_filename().to_string();
        info!(
            thread_id,
            filename = %original_filename,
            bytes = staged.size(),
            "Forwarding staged upload"
        );
        let upload = staged.open().await?;

        let file = self.api.upload_file(upload, ASSISTANTS_FILE_PURPOSE).await?;
        // Forwarded; the local copy is no longer needed
        drop(staged);
        info!(thread_id, file_id = %file.id, "File uploaded upstream");

        let request = CreateMessageRequest {
            role: MessageRole::User,
            content: ATTACHMENT_PROMPT.to_string(),
            attachments: vec![MessageAttachment::for_analysis(&file.id)],
        };

        let message = match self.api.create_message(thread_id, request).await {
            Ok(message) => message,
            Err(e) => {
                warn!(
                    thread_id,
                    file_id = %file.id,
                    "Orphaned upstream file: message creation failed after upload: {}",
                    e
                );
                self.compensate(&file.id).await;
                return Err(e.into());
            }
        };

        info!(thread_id, file_id = %file.id, message_id = %message.id, "File attached to thread");

        let mut file: UploadedFileDto = file.into();
        if file.filename.is_empty() {
            file.filename = original_filename;
        }

        Ok(AttachmentResponseDto {
            file,
            message: message.into(),
        })
    }

    /// Best-effort removal of an uploaded file nothing references
    async fn compensate(&self, file_id: &str) {
        if !self.compensate_orphans {
            return;
        }

        match self.api.delete_file(file_id).await {
            Ok(_) => info!(file_id, "Deleted orphaned upstream file"),
            Err(e) => error!(file_id, "Failed to delete orphaned upstream file: {}", e),
        }
    }
}

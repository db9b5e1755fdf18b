//! Upstream assistants service client
//!
//! Every operation maps to exactly one upstream request. No retries and no
//! caching happen here; transport faults, timeouts and non-2xx responses all
//! surface as [`UpstreamError`].

mod client;
mod error;
pub mod types;

use async_trait::async_trait;

pub use client::OpenAIClient;
pub use error::UpstreamError;
pub use types::{
    CreateAssistantRequest, CreateMessageRequest, FileUpload, ListMessagesParams,
    MessageAttachment, MessageRole, UpdateAssistantRequest, UpstreamAssistant, UpstreamDeletion,
    UpstreamFile, UpstreamMessage, UpstreamThread,
};

/// Purpose sent with files uploaded for use by assistants
pub const ASSISTANTS_FILE_PURPOSE: &str = "assistants";

#[async_trait]
pub trait AssistantsApi: Send + Sync {
    async fn create_assistant(
        &self,
        request: CreateAssistantRequest,
    ) -> Result<UpstreamAssistant, UpstreamError>;

    async fn get_assistant(&self, assistant_id: &str) -> Result<UpstreamAssistant, UpstreamError>;

    async fn update_assistant(
        &self,
        assistant_id: &str,
        request: UpdateAssistantRequest,
    ) -> Result<UpstreamAssistant, UpstreamError>;

    async fn delete_assistant(&self, assistant_id: &str) -> Result<UpstreamDeletion, UpstreamError>;

    async fn create_thread(&self) -> Result<UpstreamThread, UpstreamError>;

    async fn create_message(
        &self,
        thread_id: &str,
        request: CreateMessageRequest,
    ) -> Result<UpstreamMessage, UpstreamError>;

    /// Messages of a thread in creation order
    async fn list_messages(
        &self,
        thread_id: &str,
        params: ListMessagesParams,
    ) -> Result<Vec<UpstreamMessage>, UpstreamError>;

    async fn upload_file(
        &self,
        upload: FileUpload,
        purpose: &str,
    ) -> Result<UpstreamFile, UpstreamError>;

    async fn delete_file(&self, file_id: &str) -> Result<UpstreamDeletion, UpstreamError>;
}

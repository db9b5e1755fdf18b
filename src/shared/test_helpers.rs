//! In-memory stand-in for the upstream assistants service, plus router
//! builders used by handler tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use axum::Router;
use futures::TryStreamExt;

use crate::core::config::UploadConfig;
use crate::features::threads::{self, ThreadAttachmentService, ThreadService};
use crate::modules::openai::{
    AssistantsApi, CreateAssistantRequest, CreateMessageRequest, FileUpload, ListMessagesParams,
    UpdateAssistantRequest, UpstreamAssistant, UpstreamDeletion, UpstreamError, UpstreamFile,
    UpstreamMessage, UpstreamThread,
};
use crate::modules::openai::types::MessageContentPart;
use crate::modules::staging::UploadStagingStore;

/// Page size the upstream applies when no limit is sent
const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Default)]
struct FakeState {
    next_id: u64,
    calls: usize,
    failure: Option<String>,
    assistants: HashMap<String, UpstreamAssistant>,
    threads: HashMap<String, Vec<UpstreamMessage>>,
    files: Vec<(UpstreamFile, Vec<u8>)>,
    deleted_files: Vec<String>,
}

impl FakeState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}_{:04}", prefix, self.next_id)
    }

    fn timestamp(&self) -> i64 {
        1_700_000_000 + self.next_id as i64
    }
}

fn not_found(message: String) -> UpstreamError {
    UpstreamError::Api {
        status: 404,
        message,
    }
}

#[derive(Default)]
pub struct FakeAssistantsApi {
    state: Mutex<FakeState>,
}

impl FakeAssistantsApi {
    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Record a call and fail it if a failure is armed
    fn enter(&self) -> Result<MutexGuard<'_, FakeState>, UpstreamError> {
        let mut state = self.state();
        state.calls += 1;
        if let Some(message) = state.failure.clone() {
            return Err(UpstreamError::Api {
                status: 401,
                message,
            });
        }
        Ok(state)
    }

    /// Number of upstream operations invoked so far, failed ones included
    pub fn call_count(&self) -> usize {
        self.state().calls
    }

    /// Make every subsequent call fail with the given upstream message
    pub fn fail_all(&self, message: &str) {
        self.state().failure = Some(message.to_string());
    }

    pub fn uploaded_file_ids(&self) -> Vec<String> {
        self.state()
            .files
            .iter()
            .map(|(file, _)| file.id.clone())
            .collect()
    }

    pub fn uploaded_contents(&self, file_id: &str) -> Option<Vec<u8>> {
        self.state()
            .files
            .iter()
            .find(|(file, _)| file.id == file_id)
            .map(|(_, contents)| contents.clone())
    }

    pub fn deleted_file_ids(&self) -> Vec<String> {
        self.state().deleted_files.clone()
    }
}

#[async_trait]
impl AssistantsApi for FakeAssistantsApi {
    async fn create_assistant(
        &self,
        request: CreateAssistantRequest,
    ) -> Result<UpstreamAssistant, UpstreamError> {
        let mut state = self.enter()?;
        let assistant = UpstreamAssistant {
            id: state.next_id("asst"),
            created_at: state.timestamp(),
            name: Some(request.name),
            model: request.model,
            instructions: Some(request.instructions),
        };
        state
            .assistants
            .insert(assistant.id.clone(), assistant.clone());
        Ok(assistant)
    }

    async fn get_assistant(&self, assistant_id: &str) -> Result<UpstreamAssistant, UpstreamError> {
        let state = self.enter()?;
        state.assistants.get(assistant_id).cloned().ok_or_else(|| {
            not_found(format!("No assistant found with id '{}'.", assistant_id))
        })
    }

    async fn update_assistant(
        &self,
        assistant_id: &str,
        request: UpdateAssistantRequest,
    ) -> Result<UpstreamAssistant, UpstreamError> {
        let mut state = self.enter()?;
        let assistant = state.assistants.get_mut(assistant_id).ok_or_else(|| {
            not_found(format!("No assistant found with id '{}'.", assistant_id))
        })?;

        if let Some(name) = request.name {
            assistant.name = Some(name);
        }
        if let Some(model) = request.model {
            assistant.model = model;
        }
        if let Some(instructions) = request.instructions {
            assistant.instructions = Some(instructions);
        }
        Ok(assistant.clone())
    }

    async fn delete_assistant(&self, assistant_id: &str) -> Result<UpstreamDeletion, UpstreamError> {
        let mut state = self.enter()?;
        state
            .assistants
            .remove(assistant_id)
            .map(|assistant| UpstreamDeletion {
                id: assistant.id,
                deleted: true,
            })
            .ok_or_else(|| not_found(format!("No assistant found with id '{}'.", assistant_id)))
    }

    async fn create_thread(&self) -> Result<UpstreamThread, UpstreamError> {
        let mut state = self.enter()?;
        let thread = UpstreamThread {
            id: state.next_id("thread"),
            created_at: state.timestamp(),
        };
        state.threads.insert(thread.id.clone(), Vec::new());
        Ok(thread)
    }

    async fn create_message(
        &self,
        thread_id: &str,
        request: CreateMessageRequest,
    ) -> Result<UpstreamMessage, UpstreamError> {
        let mut state = self.enter()?;
        if !state.threads.contains_key(thread_id) {
            return Err(not_found(format!("No thread found with id '{}'.", thread_id)));
        }

        let message = UpstreamMessage {
            id: state.next_id("msg"),
            thread_id: thread_id.to_string(),
            role: request.role,
            created_at: state.timestamp(),
            content: vec![MessageContentPart::text(request.content)],
            attachments: request.attachments,
            file_ids: Vec::new(),
        };
        if let Some(messages) = state.threads.get_mut(thread_id) {
            messages.push(message.clone());
        }
        Ok(message)
    }

    async fn list_messages(
        &self,
        thread_id: &str,
        params: ListMessagesParams,
    ) -> Result<Vec<UpstreamMessage>, UpstreamError> {
        let state = self.enter()?;
        let messages = state
            .threads
            .get(thread_id)
            .ok_or_else(|| not_found(format!("No thread found with id '{}'.", thread_id)))?;

        let start = match &params.after {
            Some(after) => messages
                .iter()
                .position(|m| &m.id == after)
                .map(|i| i + 1)
                .unwrap_or(messages.len()),
            None => 0,
        };
        let limit = params
            .limit
            .map(|l| l as usize)
            .unwrap_or(DEFAULT_PAGE_SIZE);

        Ok(messages.iter().skip(start).take(limit).cloned().collect())
    }

    async fn upload_file(
        &self,
        upload: FileUpload,
        purpose: &str,
    ) -> Result<UpstreamFile, UpstreamError> {
        drop(self.enter()?);

        let chunks: Vec<Vec<u8>> = upload
            .stream
            .try_collect()
            .await
            .map_err(|e| UpstreamError::Transport(format!("upload_file: {}", e)))?;
        let contents = chunks.concat();

        let mut state = self.state();
        let file = UpstreamFile {
            id: state.next_id("file"),
            filename: upload.filename,
            purpose: purpose.to_string(),
            bytes: contents.len() as u64,
            created_at: state.timestamp(),
        };
        state.files.push((file.clone(), contents));
        Ok(file)
    }

    async fn delete_file(&self, file_id: &str) -> Result<UpstreamDeletion, UpstreamError> {
        let mut state = self.enter()?;
        if !state.files.iter().any(|(file, _)| file.id == file_id) {
            return Err(not_found(format!("No such File object: {}", file_id)));
        }
        state.deleted_files.push(file_id.to_string());
        Ok(UpstreamDeletion {
            id: file_id.to_string(),
            deleted: true,
        })
    }
}

pub fn upload_config(staging_dir: &Path, max_file_size: usize) -> UploadConfig {
    UploadConfig {
        staging_dir: staging_dir.to_path_buf(),
        max_file_size,
        compensate_orphans: true,
    }
}

/// Threads router wired to the fake upstream, staging into `staging_dir`
pub fn threads_app(api: Arc<FakeAssistantsApi>, staging_dir: &Path, max_file_size: usize) -> Router {
    threads_app_with(api, staging_dir, max_file_size, true)
}

pub fn threads_app_with(
    api: Arc<FakeAssistantsApi>,
    staging_dir: &Path,
    max_file_size: usize,
    compensate_orphans: bool,
) -> Router {
    let config = UploadConfig {
        compensate_orphans,
        ..upload_config(staging_dir, max_file_size)
    };
    let staging = Arc::new(UploadStagingStore::new(&config));

    threads::routes(
        Arc::new(ThreadService::new(api.clone())),
        Arc::new(ThreadAttachmentService::new(
            api,
            staging,
            config.compensate_orphans,
        )),
        config.body_limit(),
    )
}

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client, RequestBuilder};
use serde::de::DeserializeOwned;

use super::error::UpstreamError;
use super::types::{
    CreateAssistantRequest, CreateMessageRequest, FileUpload, ListMessagesParams, MessageList,
    UpdateAssistantRequest, UpstreamAssistant, UpstreamDeletion, UpstreamFile, UpstreamMessage,
    UpstreamThread,
};
use super::AssistantsApi;
use crate::core::config::UpstreamConfig;

/// HTTP client for the upstream assistants API
pub struct OpenAIClient {
    http_client: Client,
    base_url: String,
}

impl OpenAIClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, UpstreamError> {
        let mut headers = HeaderMap::new();

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| UpstreamError::Transport("API key is not a valid header value".into()))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let beta = HeaderValue::from_str(&config.beta_header).map_err(|_| {
            UpstreamError::Transport("OpenAI-Beta value is not a valid header value".into())
        })?;
        headers.insert("OpenAI-Beta", beta);

        let http_client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Send a request and decode a 2xx JSON body
    async fn send<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T, UpstreamError> {
        let response = request.send().await.map_err(|e| {
            tracing::error!("Upstream {} failed: {}", operation, e);
            UpstreamError::from_reqwest(operation, e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Upstream {} error: HTTP {} - {}", operation, status, body);
            return Err(UpstreamError::from_response(status.as_u16(), &body));
        }

        response.json::<T>().await.map_err(|e| {
            tracing::error!("Failed to parse upstream {} response: {}", operation, e);
            UpstreamError::from_reqwest(operation, e)
        })
    }
}

#[async_trait]
impl AssistantsApi for OpenAIClient {
    async fn create_assistant(
        &self,
        request: CreateAssistantRequest,
    ) -> Result<UpstreamAssistant, UpstreamError> {
        tracing::debug!(model = %request.model, "Creating assistant upstream");
        let builder = self.http_client.post(self.url("/assistants")).json(&request);
        self.send("create assistant", builder).await
    }

    async fn get_assistant(&self, assistant_id: &str) -> Result<UpstreamAssistant, UpstreamError> {
        let url = self.url(&format!("/assistants/{}", urlencoding::encode(assistant_id)));
        tracing::debug!("Fetching assistant from upstream: {}", url);
        self.send("retrieve assistant", self.http_client.get(&url))
            .await
    }

    async fn update_assistant(
        &self,
        assistant_id: &str,
        request: UpdateAssistantRequest,
    ) -> Result<UpstreamAssistant, UpstreamError> {
        // The upstream modifies assistants with POST, not PUT
        let url = self.url(&format!("/assistants/{}", urlencoding::encode(assistant_id)));
        tracing::debug!("Updating assistant upstream: {}", url);
        self.send("update assistant", self.http_client.post(&url).json(&request))
            .await
    }

    async fn delete_assistant(&self, assistant_id: &str) -> Result<UpstreamDeletion, UpstreamError> {
        let url = self.url(&format!("/assistants/{}", urlencoding::encode(assistant_id)));
        tracing::debug!("Deleting assistant upstream: {}", url);
        self.send("delete assistant", self.http_client.delete(&url))
            .await
    }

    async fn create_thread(&self) -> Result<UpstreamThread, UpstreamError> {
        let builder = self
            .http_client
            .post(self.url("/threads"))
            .json(&serde_json::json!({}));
        self.send("create thread", builder).await
    }

    async fn create_message(
        &self,
        thread_id: &str,
        request: CreateMessageRequest,
    ) -> Result<UpstreamMessage, UpstreamError> {
        let url = self.url(&format!(
            "/threads/{}/messages",
            urlencoding::encode(thread_id)
        ));
        tracing::debug!(
            attachments = request.attachments.len(),
            "Creating message upstream: {}",
            url
        );
        self.send("create message", self.http_client.post(&url).json(&request))
            .await
    }

    async fn list_messages(
        &self,
        thread_id: &str,
        params: ListMessagesParams,
    ) -> Result<Vec<UpstreamMessage>, UpstreamError> {
        let url = self.url(&format!(
            "/threads/{}/messages",
            urlencoding::encode(thread_id)
        ));
        tracing::debug!("Listing messages from upstream: {}", url);
        let list: MessageList = self
            .send("list messages", self.http_client.get(&url).query(&params))
            .await?;
        Ok(list.data)
    }

    async fn upload_file(
        &self,
        upload: FileUpload,
        purpose: &str,
    ) -> Result<UpstreamFile, UpstreamError> {
        tracing::debug!(
            filename = %upload.filename,
            bytes = upload.length,
            "Uploading file upstream"
        );

        let mut part = Part::stream_with_length(Body::wrap_stream(upload.stream), upload.length)
            .file_name(upload.filename);
        if let Some(content_type) = upload.content_type {
            part = part
                .mime_str(&content_type)
                .map_err(|e| UpstreamError::from_reqwest("upload file", e))?;
        }

        let form = Form::new().text("purpose", purpose.to_string()).part("file", part);
        let builder = self.http_client.post(self.url("/files")).multipart(form);
        self.send("upload file", builder).await
    }

    async fn delete_file(&self, file_id: &str) -> Result<UpstreamDeletion, UpstreamError> {
        let url = self.url(&format!("/files/{}", urlencoding::encode(file_id)));
        tracing::debug!("Deleting file upstream: {}", url);
        self.send("delete file", self.http_client.delete(&url)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn config(api_key: &str) -> UpstreamConfig {
        UpstreamConfig {
            api_key: api_key.to_string(),
            base_url: "http://localhost:9".to_string(),
            beta_header: "assistants=v2".to_string(),
            request_timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_url_joins_base_and_path() {
        let client = OpenAIClient::new(&config("sk-test")).unwrap();
        assert_eq!(client.url("/threads"), "http://localhost:9/threads");
    }

    #[test]
    fn test_rejects_invalid_api_key() {
        let result = OpenAIClient::new(&config("bad\nkey"));
        assert!(matches!(result, Err(UpstreamError::Transport(_))));
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_wrapped() {
        let client = OpenAIClient::new(&config("sk-test")).unwrap();
        let err = client.create_thread().await.unwrap_err();
        assert!(matches!(
            err,
            UpstreamError::Transport(_) | UpstreamError::Timeout(_)
        ));
    }

    #[tokio::test]
    async fn test_hung_upstream_times_out() {
        // Accepts connections and never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = OpenAIClient::new(&UpstreamConfig {
            base_url: format!("http://{}", addr),
            request_timeout: Duration::from_millis(300),
            ..config("sk-test")
        })
        .unwrap();

        let err = client.create_thread().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Timeout(ref op) if op == "create thread"));
    }
}

//! Transport abstraction between the session and the backend

use async_trait::async_trait;
use concierge_api::{ChatClient, ChatRequest, ChatResponse, FileUpload, Result};

/// One request/response cycle against the backend
#[async_trait]
pub trait Transport: Send + Sync {
    /// `POST {base}/chat`
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse>;

    /// `POST {base}/upload`
    async fn upload(&self, file: &FileUpload, conversation_id: &str) -> Result<ChatResponse>;
}

#[async_trait]
impl Transport for ChatClient {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        ChatClient::chat(self, request).await
    }

    async fn upload(&self, file: &FileUpload, conversation_id: &str) -> Result<ChatResponse> {
        ChatClient::upload(self, file, conversation_id).await
    }
}

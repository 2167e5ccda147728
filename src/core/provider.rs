//! Provider abstraction over the external chat completion API
//!
//! The request client only needs "send this request, give me the response or
//! an error", so the trait is kept to that single call. Tests substitute
//! scripted providers here.

use crate::models::openai::{ChatCompletionRequest, ChatCompletionResponse};
use async_trait::async_trait;
use thiserror::Error;

/// Error types for provider operations
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Invalid response body: {0}")]
    InvalidResponse(String),
}

/// Trait for chat completion API providers
#[async_trait]
pub trait Provider: Send + Sync {
    /// Send one non-streaming chat completion request
    async fn create_chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ProviderError>;

    /// Get the provider name
    fn provider_name(&self) -> &str;
}

//! OpenAI-compatible provider implementation
//!
//! Talks to any server exposing `/v1/chat/completions` with bearer auth,
//! which is what Gaia nodes do.

use crate::core::constants::api::CHAT_COMPLETIONS_PATH;
use crate::core::provider::{Provider, ProviderError};
use crate::models::openai::{ChatCompletionRequest, ChatCompletionResponse};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// OpenAI-compatible provider
pub struct OpenAICompatibleProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAICompatibleProvider {
    /// Create a new provider
    ///
    /// # Arguments
    ///
    /// * `api_key` - Bearer credential
    /// * `base_url` - Node base URL, e.g. `https://tejumola.gaia.domains`
    /// * `timeout` - Request timeout in seconds
    pub fn new(api_key: String, base_url: String, timeout: u64) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .map_err(|e| ProviderError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}{}", self.base_url, CHAT_COMPLETIONS_PATH)
    }
}

#[async_trait]
impl Provider for OpenAICompatibleProvider {
    async fn create_chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ProviderError> {
        let url = self.completions_url();
        debug!("POST {} model={}", url, request.model);

        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: error_text,
            });
        }

        response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }

    fn provider_name(&self) -> &str {
        "OpenAI-compatible"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::openai::ChatMessage;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::post;
    use axum::{Json, Router};
    use serde_json::{Value, json};

    async fn spawn_stub(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn request() -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: "qwen2-0.5b-instruct".to_string(),
            messages: vec![ChatMessage::user("Explain proof-of-stake.")],
            temperature: Some(0.7),
        }
    }

    #[tokio::test]
    async fn test_success_returns_parsed_body() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                assert_eq!(headers["authorization"], "Bearer gaia-key");
                assert_eq!(body["messages"][0]["content"], "Explain proof-of-stake.");
                Json(json!({
                    "id": "chatcmpl-1",
                    "choices": [{
                        "index": 0,
                        "message": {"role": "assistant", "content": "Validators stake."},
                        "finish_reason": "stop"
                    }]
                }))
            }),
        );
        let base_url = spawn_stub(router).await;

        let provider =
            OpenAICompatibleProvider::new("gaia-key".to_string(), format!("{}/", base_url), 5)
                .unwrap();
        let response = provider.create_chat_completion(&request()).await.unwrap();
        assert_eq!(
            response.choices[0].message.text().as_deref(),
            Some("Validators stake.")
        );
    }

    #[tokio::test]
    async fn test_error_status_carries_body() {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        );
        let base_url = spawn_stub(router).await;

        let provider = OpenAICompatibleProvider::new("k".to_string(), base_url, 5).unwrap();
        match provider.create_chat_completion(&request()).await {
            Err(ProviderError::ApiError { status, message }) => {
                assert_eq!(status, 429);
                assert_eq!(message, "slow down");
            }
            other => panic!("expected ApiError, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_json_body_is_invalid_response() {
        let router = Router::new().route("/v1/chat/completions", post(|| async { "not json" }));
        let base_url = spawn_stub(router).await;

        let provider = OpenAICompatibleProvider::new("k".to_string(), base_url, 5).unwrap();
        let err = provider.create_chat_completion(&request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider =
            OpenAICompatibleProvider::new("k".to_string(), format!("http://{}", addr), 5).unwrap();
        let err = provider.create_chat_completion(&request()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Transport(_)));
    }
}

//! Chat client with retry and exponential backoff
//!
//! This module wraps a [`Provider`] with the retry loop used for every
//! question: one request per attempt, a doubling delay after each failure,
//! and a terminal error once the attempt budget is spent. Backoff starts
//! from attempt 0 on every call to [`ChatClient::ask`].

use crate::core::constants::preview;
use crate::core::provider::{Provider, ProviderError};
use crate::models::openai::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Error types surfaced by the chat client
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Max retries exceeded after {attempts} attempts: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Request cancelled")]
    Cancelled,
}

/// Retry bounds and backoff shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub backoff_multiplier: u32,
}

impl RetryPolicy {
    /// Delay after the failed attempt with the given zero-based index
    ///
    /// `base_delay * backoff_multiplier^attempt_index`, saturating.
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        let factor = u64::from(self.backoff_multiplier).saturating_pow(attempt_index);
        let factor = u32::try_from(factor).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }
}

/// Something that can wait
///
/// Production code sleeps on the tokio timer; tests record the requested
/// delays instead.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeper backed by `tokio::time::sleep`
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Pull the answer text out of a completion response
///
/// # Errors
///
/// Returns [`ClientError::MalformedResponse`] when there is no first choice
/// or the first choice carries no text.
pub fn extract_answer(response: &ChatCompletionResponse) -> Result<String, ClientError> {
    let choice = response
        .choices
        .first()
        .ok_or_else(|| ClientError::MalformedResponse("response has no choices".to_string()))?;
    choice.message.text().ok_or_else(|| {
        ClientError::MalformedResponse("first choice has no message content".to_string())
    })
}

/// Chat client that retries each question until it gets an answer
pub struct ChatClient {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    cancellation: CancellationToken,
}

impl ChatClient {
    /// Create a new client
    ///
    /// # Arguments
    ///
    /// * `provider` - Transport for single requests; holds the credential
    /// * `model` - Model identifier sent with every request
    /// * `temperature` - Sampling temperature sent with every request
    /// * `policy` - Attempt budget and backoff shape
    pub fn new(
        provider: Arc<dyn Provider>,
        model: String,
        temperature: f32,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            provider,
            model,
            temperature,
            policy,
            sleeper: Arc::new(TokioSleeper),
            cancellation: CancellationToken::new(),
        }
    }

    /// Replace the sleeper used between attempts
    #[cfg(test)]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Abort in-flight requests and backoff waits when the token fires
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Build the request for one question
    pub fn build_request(&self, question: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user(question)],
            temperature: Some(self.temperature),
        }
    }

    /// Ask one question, retrying until an answer arrives or the budget runs out
    ///
    /// Every failure, whatever its kind, waits `delay_for(attempt)` and tries
    /// again, including after the final attempt.
    ///
    /// # Errors
    ///
    /// - [`ClientError::RetriesExhausted`] once `max_attempts` attempts failed
    /// - [`ClientError::Cancelled`] if the cancellation token fires, including
    ///   mid-request
    pub async fn ask(&self, question: &str) -> Result<String, ClientError> {
        let request = self.build_request(question);
        let mut last_error = String::from("no attempts made");

        for attempt in 0..self.policy.max_attempts {
            if self.cancellation.is_cancelled() {
                return Err(ClientError::Cancelled);
            }

            info!("Attempt {} for question: {}...", attempt + 1, preview(question));

            let outcome = tokio::select! {
                biased;
                _ = self.cancellation.cancelled() => return Err(ClientError::Cancelled),
                outcome = self.attempt(&request) => outcome,
            };

            match outcome {
                Ok(answer) => return Ok(answer),
                Err(AttemptError::Provider(ProviderError::ApiError { status, message })) => {
                    warn!("API Error ({}): {}", status, message);
                    last_error = format!("API error (status {}): {}", status, message);
                }
                Err(err) => {
                    error!("Request failed: {}", err);
                    last_error = err.to_string();
                }
            }

            let delay = self.policy.delay_for(attempt);
            info!("Retrying in {}s...", delay.as_secs());
            tokio::select! {
                biased;
                _ = self.cancellation.cancelled() => return Err(ClientError::Cancelled),
                _ = self.sleeper.sleep(delay) => {}
            }
        }

        Err(ClientError::RetriesExhausted {
            attempts: self.policy.max_attempts,
            last_error,
        })
    }

    async fn attempt(&self, request: &ChatCompletionRequest) -> Result<String, AttemptError> {
        let response = self.provider.create_chat_completion(request).await?;
        if let Some(usage) = &response.usage {
            debug!(
                "Token usage: {} prompt, {} completion, {} total",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }
        Ok(extract_answer(&response)?)
    }
}

/// Failure of a single attempt
#[derive(Debug, thiserror::Error)]
enum AttemptError {
    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Client(#[from] ClientError),
}

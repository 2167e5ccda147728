//! Test doubles for the provider and sleeper seams

use crate::core::client::Sleeper;
use crate::core::provider::{Provider, ProviderError};
use crate::models::openai::{ChatChoice, ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

type Responder =
    Box<dyn Fn(&ChatCompletionRequest) -> Result<ChatCompletionResponse, ProviderError> + Send + Sync>;

/// Completion response whose first choice says `text`
pub fn answer(text: &str) -> ChatCompletionResponse {
    ChatCompletionResponse {
        id: Some("chatcmpl-test".to_string()),
        model: None,
        choices: vec![ChatChoice {
            index: 0,
            message: ChatMessage {
                role: "assistant".to_string(),
                content: Some(Value::String(text.to_string())),
            },
            finish_reason: Some("stop".to_string()),
        }],
        usage: None,
    }
}

/// Completion response with no choices, as parsed from `{}`
pub fn empty_response() -> ChatCompletionResponse {
    ChatCompletionResponse {
        id: None,
        model: None,
        choices: Vec::new(),
        usage: None,
    }
}

/// Question text of a request built by the client
pub fn question_of(request: &ChatCompletionRequest) -> String {
    request.messages[0].text().unwrap_or_default()
}

/// Provider that replays canned results and records every request
pub struct ScriptedProvider {
    responder: Responder,
    requests: Mutex<Vec<ChatCompletionRequest>>,
}

impl ScriptedProvider {
    /// Answer with `responder(request)` on every call
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&ChatCompletionRequest) -> Result<ChatCompletionResponse, ProviderError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Replay `script` in order, then fail with a transport error
    pub fn from_sequence(script: Vec<Result<ChatCompletionResponse, ProviderError>>) -> Self {
        let script = Mutex::new(VecDeque::from(script));
        Self::new(move |_| {
            script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ProviderError::Transport("script exhausted".to_string())))
        })
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Question texts in the order they were sent
    pub fn questions(&self) -> Vec<String> {
        self.requests.lock().unwrap().iter().map(question_of).collect()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn create_chat_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ProviderError> {
        self.requests.lock().unwrap().push(request.clone());
        (self.responder)(request)
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }
}

/// Sleeper that returns immediately and remembers what it was asked
#[derive(Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays.lock().unwrap().push(duration);
    }
}

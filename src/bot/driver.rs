//! Driver loop
//!
//! Cycles through the question source forever: shuffle, ask every question
//! once, repeat. A question that fails after all retries is logged and
//! skipped; nothing short of cancellation ends the loop.

use crate::bot::questions::QuestionSource;
use crate::core::client::{ChatClient, ClientError, Sleeper, TokioSleeper};
use crate::core::constants::preview;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, error, info, info_span};
use uuid::Uuid;

/// Outcome counts of one pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub answered: usize,
    pub failed: usize,
}

/// Owns the question list and the client, and runs passes until cancelled
pub struct Driver {
    client: ChatClient,
    questions: QuestionSource,
    question_delay: Duration,
    sleeper: Arc<dyn Sleeper>,
    rng: StdRng,
    cancellation: CancellationToken,
    passes: u64,
}

impl Driver {
    pub fn new(client: ChatClient, questions: QuestionSource, question_delay: Duration) -> Self {
        Self {
            client,
            questions,
            question_delay,
            sleeper: Arc::new(TokioSleeper),
            rng: StdRng::from_entropy(),
            cancellation: CancellationToken::new(),
            passes: 0,
        }
    }

    /// Replace the sleeper used for the pause between questions
    #[cfg(test)]
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Use a fixed random source for shuffling
    #[cfg(test)]
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Stop the loop when the token fires
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    /// Run passes until cancelled
    pub async fn run(&mut self) {
        while !self.cancellation.is_cancelled() {
            let summary = self.run_pass().await;
            info!(
                "Pass {} finished: {} answered, {} failed",
                self.passes, summary.answered, summary.failed
            );
        }
        info!("Stopping after {} passes", self.passes);
    }

    /// Shuffle, then ask every question once
    ///
    /// Returns early, with partial counts, if cancelled mid-pass.
    pub async fn run_pass(&mut self) -> PassSummary {
        self.passes += 1;
        self.questions.shuffle_with(&mut self.rng);
        let total = self.questions.as_slice().len();
        info!(
            "Starting chatbot with {} questions in random order (pass {})",
            total, self.passes
        );

        let mut summary = PassSummary::default();

        for (i, question) in self.questions.as_slice().iter().enumerate() {
            if self.cancellation.is_cancelled() {
                break;
            }

            let span = info_span!("question", id = %Uuid::new_v4());
            let answered = Self::process_question(&self.client, question, i + 1, total)
                .instrument(span)
                .await;

            match answered {
                Ok(()) => {
                    summary.answered += 1;
                    tokio::select! {
                        biased;
                        _ = self.cancellation.cancelled() => break,
                        _ = self.sleeper.sleep(self.question_delay) => {}
                    }
                }
                Err(ClientError::Cancelled) => break,
                Err(_) => summary.failed += 1,
            }
        }

        summary
    }

    async fn process_question(
        client: &ChatClient,
        question: &str,
        index: usize,
        total: usize,
    ) -> Result<(), ClientError> {
        info!("Processing question {}/{}", index, total);
        info!("Question: {}", question);

        let start = Instant::now();
        match client.ask(question).await {
            Ok(response) => {
                let elapsed = start.elapsed();
                println!("Answer to '{}...':\n{}", preview(question), response);
                info!("Received full response in {:.2}s", elapsed.as_secs_f64());
                info!("Response length: {} characters", response.chars().count());
                Ok(())
            }
            Err(ClientError::Cancelled) => Err(ClientError::Cancelled),
            Err(e) => {
                error!("Failed to process question: {}", e);
                Err(e)
            }
        }
    }
}

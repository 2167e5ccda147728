//! Gaia question bot
//!
//! Asks a Gaia node (or any OpenAI-compatible chat endpoint) a rotating set
//! of questions forever, printing every answer.

mod bot;
mod core;
mod models;

use crate::bot::driver::Driver;
use crate::bot::questions::QuestionSource;
use crate::core::client::ChatClient;
use crate::core::config::Config;
use crate::core::constants::banner;
use crate::core::logging::init_logging;
use crate::core::provider::Provider;
use crate::core::providers::OpenAICompatibleProvider;
use anyhow::{Context, Result, bail};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    // Load configuration
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging; the guard flushes the log file on exit
    let log_guard = match init_logging(&config.log_level, &config.log_file) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Logging Error: {:#}", e);
            std::process::exit(1);
        }
    };

    print_banner();

    if let Err(e) = run(config).await {
        error!("{:#}", e);
        drop(log_guard);
        std::process::exit(1);
    }
}

/// Everything after logging is up: credential, wiring, the endless loop
async fn run(config: Config) -> Result<()> {
    let api_key = read_api_key(&mut io::stdin().lock())?;

    let questions = QuestionSource::from_config(config.questions.clone())
        .context("Invalid question list")?;

    let provider: Arc<dyn Provider> = Arc::new(OpenAICompatibleProvider::new(
        api_key,
        config.base_url.clone(),
        config.request_timeout,
    )?);

    info!(
        "Using {} provider at {} with model {}",
        provider.provider_name(),
        config.base_url,
        config.model
    );

    let cancellation = CancellationToken::new();
    {
        let cancellation = cancellation.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, shutting down");
                cancellation.cancel();
            }
        });
    }

    let client = ChatClient::new(
        provider,
        config.model.clone(),
        config.temperature,
        config.retry_policy(),
    )
    .with_cancellation(cancellation.clone());

    let mut driver = Driver::new(client, questions, config.question_delay())
        .with_cancellation(cancellation);

    driver.run().await;
    Ok(())
}

fn print_banner() {
    println!("{}", banner::TITLE);
    println!("{}", banner::CREATED_BY);
    println!("{}", banner::TWITTER);
}

/// Prompt for the API key and read one line from `input`
fn read_api_key<R: BufRead>(input: &mut R) -> Result<String> {
    print!("Enter your API key: ");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    let read = input
        .read_line(&mut line)
        .context("Failed to read API key from stdin")?;
    if read == 0 {
        bail!("No API key provided: stdin closed");
    }

    let key = line.trim();
    if key.is_empty() {
        bail!("API key must not be empty");
    }
    Ok(key.to_string())
}

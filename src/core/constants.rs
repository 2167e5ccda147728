//! Constants for message roles, endpoints and console output
//!
//! This module defines string constants used throughout the application for
//! message roles, API paths and the startup banner.

/// Message role constants
pub mod role {
    /// User role identifier
    pub const USER: &str = "user";
}

/// API path constants
pub mod api {
    /// Chat completion endpoint, relative to the node base URL
    pub const CHAT_COMPLETIONS_PATH: &str = "/v1/chat/completions";
}

/// Console banner lines
pub mod banner {
    pub const TITLE: &str = "Title: GaiaAI Chatbot";
    pub const CREATED_BY: &str = "Created by: MEFURY";
    pub const TWITTER: &str = "Twitter: https://x.com/meefury";
}

/// Number of characters of a question shown in log lines and answer headers
pub const QUESTION_PREVIEW_CHARS: usize = 50;

/// Shorten a question for log output
///
/// Cuts on a character boundary, never inside a multi-byte sequence.
pub fn preview(question: &str) -> &str {
    match question.char_indices().nth(QUESTION_PREVIEW_CHARS) {
        Some((idx, _)) => &question[..idx],
        None => question,
    }
}

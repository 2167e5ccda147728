//! The question bot
//!
//! The question source and the driver loop that feeds it through the chat
//! client.

pub mod driver;
pub mod questions;

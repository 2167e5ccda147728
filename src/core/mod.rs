//! Core application modules
//!
//! This module contains configuration, constants, logging, the provider
//! seam and the retrying chat client.

pub mod client;
pub mod config;
pub mod constants;
pub mod logging;
pub mod provider;
pub mod providers;

#[cfg(test)]
pub mod testing;

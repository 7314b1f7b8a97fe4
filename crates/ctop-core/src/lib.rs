//! Shared configuration and error types for the ctOP chatbot services.

pub mod config;
pub mod error;

pub use config::BotConfig;
pub use error::{BotError, Result};

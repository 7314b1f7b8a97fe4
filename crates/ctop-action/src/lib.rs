//! Conversational actions for the ctOP assistant.
//!
//! Implements the action-server side of the dialogue framework: the
//! tracker and response wire model, and the handlers the dialogue manager
//! calls by name (FAQ recommendations, fallback escalation, help topics,
//! analytics navigation).

pub mod dispatcher;
pub mod error;
pub mod handler;
pub mod types;

pub use dispatcher::Dispatcher;
pub use error::ActionError;
pub use handler::{ActionHandler, ActionRegistry};
pub use types::{
    ActionCall, ActionErrorBody, ActionResponse, ActionSettings, BotMessage, Button, Entity,
    Event, FrontendCommand, Tracker,
};

//! ctOP chatbot HTTP surfaces.
//!
//! Two axum routers: the action server the dialogue manager calls back
//! into, and the chat façade the web frontend talks to.

pub mod agent;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use agent::{Agent, AgentMessage, RestAgent};
pub use error::ApiError;
pub use routes::{create_action_router, create_chat_router};
pub use state::{ActionState, ChatState};

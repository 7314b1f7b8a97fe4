//! Application state shared across route handlers.
//!
//! Each router has its own state, passed to handlers via axum's State
//! extractor. All fields are `Arc` or plain data so cloning per request is
//! cheap.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use ctop_action::ActionRegistry;
use ctop_recommend::{RecommenderHandle, DEFAULT_TOP_K};

use crate::agent::Agent;

/// State of the action server.
#[derive(Clone)]
pub struct ActionState {
    pub registry: Arc<ActionRegistry>,
    /// Catalog shared with the recommendation action.
    pub recommender: Arc<RecommenderHandle>,
    /// Where `/catalog/reload` reads from. `None` disables reloading.
    pub catalog_path: Option<PathBuf>,
    pub default_top_k: usize,
    pub start_time: Instant,
}

impl ActionState {
    pub fn new(registry: ActionRegistry, recommender: Arc<RecommenderHandle>) -> Self {
        Self {
            registry: Arc::new(registry),
            recommender,
            catalog_path: None,
            default_top_k: DEFAULT_TOP_K,
            start_time: Instant::now(),
        }
    }

    pub fn with_catalog_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.catalog_path = Some(path.into());
        self
    }

    pub fn with_default_top_k(mut self, top_k: usize) -> Self {
        self.default_top_k = top_k;
        self
    }
}

/// State of the chat façade.
#[derive(Clone)]
pub struct ChatState {
    /// `None` when no agent could be configured; chat requests then fail.
    pub agent: Option<Arc<dyn Agent>>,
    /// CORS origins. Empty allows any origin.
    pub allowed_origins: Vec<String>,
}

impl ChatState {
    pub fn new(agent: Option<Arc<dyn Agent>>) -> Self {
        Self {
            agent,
            allowed_origins: Vec::new(),
        }
    }

    pub fn with_allowed_origins(mut self, origins: Vec<String>) -> Self {
        self.allowed_origins = origins;
        self
    }

    pub fn agent_loaded(&self) -> bool {
        self.agent.is_some()
    }
}

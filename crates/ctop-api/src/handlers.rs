//! Route handler functions for both routers.
//!
//! Each handler extracts its input via axum extractors, calls into the
//! action registry, the recommender or the agent, and returns JSON.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use ctop_action::{ActionCall, ActionError, ActionResponse, Button};
use ctop_recommend::{CatalogLoader, RecommendRequest, Recommender};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::agent::AgentMessage;
use crate::error::ApiError;
use crate::state::{ActionState, ChatState};

const VERSION: &str = env!("CARGO_PKG_VERSION");
const EMPTY_REPLY_FALLBACK: &str =
    "I'm sorry, I didn't understand that. Could you please rephrase?";

// =============================================================================
// Request / response types
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ActionHealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub actions: usize,
    pub catalog_entries: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActionsResponse {
    pub actions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendationItem {
    pub text: String,
    pub intent: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    pub score: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub recommendations: Vec<RecommendationItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub entries: usize,
    pub previous_entries: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub agent_loaded: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatHealthResponse {
    pub status: String,
    pub agent_loaded: bool,
    pub version: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub sender: String,
    pub message: String,
}

/// One reply entry the frontend renders.
#[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<Button>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<Value>,
}

impl From<AgentMessage> for ChatReply {
    fn from(msg: AgentMessage) -> Self {
        let custom = msg.custom.filter(|c| match c {
            Value::Null => false,
            Value::Object(map) => !map.is_empty(),
            _ => true,
        });
        Self {
            text: msg.text.filter(|t| !t.is_empty()),
            buttons: (!msg.buttons.is_empty()).then_some(msg.buttons),
            custom,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub responses: Vec<ChatReply>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookAck {
    pub status: String,
}

// =============================================================================
// Action server handlers
// =============================================================================

/// POST /webhook - run the action named in the call.
pub async fn run_action(
    State(state): State<ActionState>,
    Json(body): Json<Value>,
) -> Result<Json<ActionResponse>, ApiError> {
    let action_name = body
        .get("next_action")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let call: ActionCall = serde_json::from_value(body).map_err(|e| {
        ApiError::action(
            action_name.clone(),
            ActionError::Rejected {
                action: action_name.clone(),
                reason: e.to_string(),
            },
        )
    })?;

    match state.registry.dispatch(&call).await {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            warn!(action = %action_name, error = %err, "Action call failed");
            Err(ApiError::action(action_name, err))
        }
    }
}

/// GET /actions - registered action names.
pub async fn list_actions(State(state): State<ActionState>) -> Json<ActionsResponse> {
    Json(ActionsResponse {
        actions: state
            .registry
            .names()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}

/// GET /health
pub async fn action_health(State(state): State<ActionState>) -> Json<ActionHealthResponse> {
    Json(ActionHealthResponse {
        status: "healthy".to_string(),
        version: VERSION.to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
        actions: state.registry.len(),
        catalog_entries: state.recommender.current().len(),
    })
}

/// POST /recommend - rank the catalog for a text and intent.
pub async fn recommend(
    State(state): State<ActionState>,
    Json(body): Json<Value>,
) -> Result<Json<RecommendResponse>, ApiError> {
    let request = RecommendRequest::try_from(&body)?;
    let recommendations = state
        .recommender
        .current()
        .recommend_request(&request, state.default_top_k)
        .into_iter()
        .map(|rec| RecommendationItem {
            text: rec.entry.text,
            intent: rec.entry.intent,
            answer: rec.entry.answer,
            score: rec.score,
        })
        .collect();
    Ok(Json(RecommendResponse { recommendations }))
}

/// POST /catalog/reload - re-read the catalog file and swap it in.
///
/// A catalog that fails to load leaves the current one in service.
pub async fn reload_catalog(
    State(state): State<ActionState>,
) -> Result<Json<ReloadResponse>, ApiError> {
    let path = state
        .catalog_path
        .clone()
        .ok_or_else(|| ApiError::BadRequest("no catalog path configured".to_string()))?;

    let loaded = tokio::task::spawn_blocking(move || CatalogLoader::load(&path))
        .await
        .map_err(|e| ApiError::Internal(format!("catalog reload task failed: {}", e)))?;

    let entries = match loaded {
        Ok(entries) => entries,
        Err(err) => {
            error!(
                error = %err,
                malformed = ?err.malformed_indices(),
                "Catalog reload failed, keeping current catalog"
            );
            return Err(err.into());
        }
    };

    let count = entries.len();
    let previous = state.recommender.replace(Recommender::new(entries));
    info!(entries = count, previous = previous.len(), "Catalog reloaded");
    Ok(Json(ReloadResponse {
        entries: count,
        previous_entries: previous.len(),
    }))
}

// =============================================================================
// Chat façade handlers
// =============================================================================

/// GET /
pub async fn root(State(state): State<ChatState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "ctOP chatbot API is running".to_string(),
        agent_loaded: state.agent_loaded(),
    })
}

/// GET /health
pub async fn chat_health(State(state): State<ChatState>) -> Json<ChatHealthResponse> {
    Json(ChatHealthResponse {
        status: "healthy".to_string(),
        agent_loaded: state.agent_loaded(),
        version: VERSION.to_string(),
    })
}

/// POST /chat - forward a user message to the agent.
pub async fn chat(
    State(state): State<ChatState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Some(agent) = state.agent.as_ref().map(Arc::clone) else {
        error!("Agent not loaded");
        return Err(ApiError::Internal(
            "Agent not loaded. Please check server logs.".to_string(),
        ));
    };

    let messages = agent
        .handle_message(&request.sender, &request.message)
        .await
        .map_err(|e| {
            error!(sender = %request.sender, error = %e, "Error processing message");
            ApiError::Internal(format!("Error processing message: {}", e))
        })?;

    let mut responses: Vec<ChatReply> = messages.into_iter().map(ChatReply::from).collect();
    if responses.is_empty() {
        responses.push(ChatReply {
            text: Some(EMPTY_REPLY_FALLBACK.to_string()),
            ..ChatReply::default()
        });
    }

    Ok(Json(ChatResponse { responses }))
}

/// POST /webhook - acknowledge an external integration callback.
pub async fn chat_webhook() -> Json<WebhookAck> {
    Json(WebhookAck {
        status: "received".to_string(),
    })
}

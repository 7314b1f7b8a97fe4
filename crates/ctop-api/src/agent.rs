//! The dialogue agent behind the chat façade.

use std::time::Duration;

use async_trait::async_trait;
use ctop_action::Button;
use ctop_core::{BotError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// One message produced by the agent for a user turn.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Button>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<Value>,
}

/// A dialogue engine that turns a user message into bot messages.
#[async_trait]
pub trait Agent: Send + Sync {
    async fn handle_message(&self, sender: &str, text: &str) -> Result<Vec<AgentMessage>>;
}

#[derive(Serialize)]
struct RestRequest<'a> {
    sender: &'a str,
    message: &'a str,
}

/// Agent reached through its REST input channel.
pub struct RestAgent {
    client: reqwest::Client,
    endpoint: String,
}

impl RestAgent {
    pub const WEBHOOK_PATH: &'static str = "/webhooks/rest/webhook";

    /// `base_url` is the agent server root, e.g. `http://localhost:5005`.
    /// A URL already ending in the REST webhook path is used as is.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BotError::Agent(format!("failed to build HTTP client: {}", e)))?;
        let base = base_url.trim_end_matches('/');
        let endpoint = if base.ends_with(Self::WEBHOOK_PATH) {
            base.to_string()
        } else {
            format!("{}{}", base, Self::WEBHOOK_PATH)
        };
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl Agent for RestAgent {
    async fn handle_message(&self, sender: &str, text: &str) -> Result<Vec<AgentMessage>> {
        debug!(endpoint = %self.endpoint, sender, "Forwarding message to agent");
        let response = self
            .client
            .post(&self.endpoint)
            .json(&RestRequest {
                sender,
                message: text,
            })
            .send()
            .await
            .map_err(|e| BotError::Agent(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BotError::Agent(format!("agent returned status {}", status)));
        }

        response
            .json::<Vec<AgentMessage>>()
            .await
            .map_err(|e| BotError::Agent(format!("invalid agent reply: {}", e)))
    }
}

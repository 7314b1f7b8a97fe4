//! Wire types of the action-server protocol.
//!
//! The dialogue manager posts an [`ActionCall`] naming the action to run
//! together with the conversation [`Tracker`]; the server answers with the
//! [`Event`]s to apply and the [`BotMessage`]s to send.

use std::collections::HashMap;

use ctop_core::config::BotConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Slot names shared with the dialogue domain.
pub mod slots {
    pub const CONSECUTIVE_FALLBACKS: &str = "consecutive_fallbacks";
    pub const LAST_RECOMMENDATIONS: &str = "last_recommendations";
    pub const PENDING_NODE_NAME: &str = "pending_node_name";
    pub const PENDING_SENSOR_TYPE: &str = "pending_sensor_type";
    pub const CONFIRMATION_ID: &str = "confirmation_id";
}

// =============================================================================
// Inbound
// =============================================================================

/// Request body of the action webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionCall {
    pub next_action: String,
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub tracker: Tracker,
    #[serde(default)]
    pub domain: Value,
    #[serde(default)]
    pub version: Option<String>,
}

/// An extracted entity of the latest user message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub entity: String,
    #[serde(default)]
    pub value: Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntentRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LatestMessage {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub intent: IntentRef,
    #[serde(default)]
    pub entities: Vec<Entity>,
}

/// Conversation state as seen by the action server.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tracker {
    #[serde(default)]
    pub sender_id: String,
    #[serde(default)]
    pub slots: HashMap<String, Value>,
    #[serde(default)]
    pub latest_message: LatestMessage,
    /// Raw event history, oldest first.
    #[serde(default)]
    pub events: Vec<Value>,
}

impl Tracker {
    /// Slot value, treating `null` as unset.
    pub fn get_slot(&self, name: &str) -> Option<&Value> {
        self.slots.get(name).filter(|v| !v.is_null())
    }

    /// Slot value as a non-empty string.
    pub fn slot_str(&self, name: &str) -> Option<&str> {
        self.get_slot(name)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// String values of entity `entity` in the latest message, in order.
    pub fn latest_entity_values<'a>(&'a self, entity: &'a str) -> impl Iterator<Item = &'a str> {
        self.latest_message
            .entities
            .iter()
            .filter(move |e| e.entity == entity)
            .filter_map(|e| e.value.as_str())
    }

    /// The most recent `user` event of the history.
    pub fn last_user_event(&self) -> Option<&Value> {
        self.events
            .iter()
            .rev()
            .find(|e| e.get("event").and_then(Value::as_str) == Some("user"))
    }
}

// =============================================================================
// Outbound
// =============================================================================

/// A conversation event returned to the dialogue manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// Set (or clear, with `null`) a slot.
    Slot { name: String, value: Value },
}

impl Event {
    pub fn slot(name: &str, value: impl Into<Value>) -> Self {
        Event::Slot {
            name: name.to_string(),
            value: value.into(),
        }
    }

    pub fn clear_slot(name: &str) -> Self {
        Event::slot(name, Value::Null)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub title: String,
    pub payload: String,
}

impl Button {
    pub fn new(title: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            payload: payload.into(),
        }
    }
}

/// One bot utterance. `response` names a template owned by the dialogue
/// domain; the other fields are literal content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BotMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<Button>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

/// Command object the web frontend acts on when it finds it in a reply's
/// `custom` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FrontendCommand {
    NavigateToNodeAnalytics {
        #[serde(rename = "nodeName")]
        node_name: String,
        #[serde(rename = "confirmationId")]
        confirmation_id: Option<String>,
    },
    NavigateToSensorTypeAnalytics {
        #[serde(rename = "sensorType")]
        sensor_type: String,
        #[serde(rename = "confirmationId")]
        confirmation_id: Option<String>,
    },
    RequestNodeList,
    RequestSensorTypeList,
    CheckAuthStatus,
}

/// Response body of a successful action call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionResponse {
    pub events: Vec<Event>,
    pub responses: Vec<BotMessage>,
}

/// Response body of a failed action call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionErrorBody {
    pub error: String,
    pub action_name: String,
}

// =============================================================================
// Settings
// =============================================================================

/// Tunables the handlers read at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSettings {
    pub top_k: usize,
    pub fallback_threshold: u32,
    pub max_button_label: usize,
}

impl Default for ActionSettings {
    fn default() -> Self {
        Self {
            top_k: 3,
            fallback_threshold: 3,
            max_button_label: 35,
        }
    }
}

impl ActionSettings {
    pub fn from_config(config: &BotConfig) -> Self {
        Self {
            top_k: config.catalog.default_top_k,
            fallback_threshold: config.actions.fallback_threshold,
            max_button_label: config.actions.max_button_label,
        }
    }
}

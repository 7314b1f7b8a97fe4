//! Action handler registry and trait definition.
//!
//! Defines the `ActionHandler` async trait and provides the registry the
//! webhook uses to dispatch a call to the handler registered under its name.

pub mod auth;
pub mod fallback;
pub mod help;
pub mod navigation;
pub mod recommend;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use ctop_recommend::RecommenderHandle;
use tracing::{debug, info};

use crate::dispatcher::Dispatcher;
use crate::error::ActionError;
use crate::types::{ActionCall, ActionResponse, ActionSettings, Event, Tracker};

use self::navigation::NavigationTarget;

/// A custom action the dialogue manager can call by name.
#[async_trait]
pub trait ActionHandler: Send + Sync {
    /// Name the dialogue domain refers to this action by.
    fn name(&self) -> &'static str;

    /// Run the action, sending messages through `dispatcher` and returning
    /// the events to apply to the conversation.
    async fn run(
        &self,
        dispatcher: &mut Dispatcher,
        tracker: &Tracker,
    ) -> Result<Vec<Event>, ActionError>;
}

/// Name-indexed set of action handlers.
#[derive(Default)]
pub struct ActionRegistry {
    handlers: BTreeMap<&'static str, Arc<dyn ActionHandler>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in action.
    pub fn with_defaults(recommender: Arc<RecommenderHandle>, settings: ActionSettings) -> Self {
        let mut registry = Self::new();
        registry.register_defaults(recommender, settings);
        registry
    }

    /// Register `handler`, replacing any handler with the same name.
    pub fn register(&mut self, handler: Arc<dyn ActionHandler>) {
        let name = handler.name();
        if self.handlers.insert(name, handler).is_some() {
            debug!(action = name, "Replaced action handler");
        }
    }

    pub fn register_defaults(&mut self, recommender: Arc<RecommenderHandle>, settings: ActionSettings) {
        self.register(Arc::new(recommend::RecommendFaqsAction::new(
            recommender,
            settings,
        )));
        self.register(Arc::new(fallback::EscalatedFallbackAction::new(
            settings.fallback_threshold,
        )));
        self.register(Arc::new(fallback::ResetFallbackCounterAction));
        self.register(Arc::new(help::HelpSelectionAction));
        for target in [NavigationTarget::Node, NavigationTarget::SensorType] {
            self.register(Arc::new(navigation::RequestNavigationConfirmation(target)));
            self.register(Arc::new(navigation::NavigateToAnalytics(target)));
            self.register(Arc::new(navigation::RequestSelection(target)));
            self.register(Arc::new(navigation::ListAvailable(target)));
        }
        self.register(Arc::new(navigation::DenyNavigationAction));
        self.register(Arc::new(auth::CheckAuthStatusAction));
        info!(actions = self.handlers.len(), "Registered default actions");
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn ActionHandler>> {
        self.handlers.get(name)
    }

    /// Registered action names in sorted order.
    pub fn names(&self) -> Vec<&'static str> {
        self.handlers.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Run the action named by `call` against its tracker.
    pub async fn dispatch(&self, call: &ActionCall) -> Result<ActionResponse, ActionError> {
        let handler = self
            .get(&call.next_action)
            .ok_or_else(|| ActionError::UnknownAction(call.next_action.clone()))?;

        debug!(
            action = %call.next_action,
            sender = %call.sender_id,
            "Running action"
        );

        let mut dispatcher = Dispatcher::new();
        let events = handler.run(&mut dispatcher, &call.tracker).await?;
        Ok(ActionResponse {
            events,
            responses: dispatcher.into_messages(),
        })
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use serde_json::{json, Value};

    use crate::types::Tracker;

    pub fn tracker(value: Value) -> Tracker {
        serde_json::from_value(value).unwrap()
    }

    pub fn tracker_with_entities(entities: Value) -> Tracker {
        tracker(json!({"latest_message": {"entities": entities}}))
    }

    pub fn tracker_with_slots(slots: Value) -> Tracker {
        tracker(json!({ "slots": slots }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctop_recommend::{CatalogEntry, Recommender};
    use serde_json::json;

    fn default_registry() -> ActionRegistry {
        let handle = Arc::new(RecommenderHandle::new(Recommender::new(vec![
            CatalogEntry::new("How do I reset my password?", "faq_reset_password"),
        ])));
        ActionRegistry::with_defaults(handle, ActionSettings::default())
    }

    #[test]
    fn test_default_registry_names() {
        let registry = default_registry();
        assert_eq!(
            registry.names(),
            vec![
                "action_check_auth_status",
                "action_deny_navigation",
                "action_handle_escalated_fallback",
                "action_handle_help_selection",
                "action_list_available_nodes",
                "action_list_available_sensor_types",
                "action_navigate_to_node_analytics",
                "action_navigate_to_sensor_analytics",
                "action_recommend_faqs",
                "action_request_node_navigation_confirmation",
                "action_request_node_selection",
                "action_request_sensor_navigation_confirmation",
                "action_request_sensor_type_selection",
                "action_reset_fallback_counter",
            ]
        );
        assert_eq!(registry.len(), 14);
    }

    #[test]
    fn test_empty_registry() {
        let registry = ActionRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("action_recommend_faqs").is_none());
    }

    #[tokio::test]
    async fn test_dispatch_unknown_action() {
        let registry = default_registry();
        let call: ActionCall =
            serde_json::from_value(json!({"next_action": "action_do_magic"})).unwrap();
        let err = registry.dispatch(&call).await.unwrap_err();
        assert!(matches!(err, ActionError::UnknownAction(ref n) if n == "action_do_magic"));
    }

    #[tokio::test]
    async fn test_dispatch_collects_events_and_responses() {
        let registry = default_registry();
        let call: ActionCall = serde_json::from_value(json!({
            "next_action": "action_reset_fallback_counter",
            "sender_id": "user1",
            "tracker": {"slots": {"consecutive_fallbacks": 2}}
        }))
        .unwrap();
        let response = registry.dispatch(&call).await.unwrap();
        assert_eq!(
            response.events,
            vec![Event::slot(crate::types::slots::CONSECUTIVE_FALLBACKS, 0)]
        );
        assert!(response.responses.is_empty());
    }

    struct EchoAction;

    #[async_trait]
    impl ActionHandler for EchoAction {
        fn name(&self) -> &'static str {
            "action_check_auth_status"
        }

        async fn run(
            &self,
            dispatcher: &mut Dispatcher,
            tracker: &Tracker,
        ) -> Result<Vec<Event>, ActionError> {
            dispatcher.utter_text(format!("echo {}", tracker.sender_id));
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_register_replaces_same_name() {
        let mut registry = default_registry();
        registry.register(Arc::new(EchoAction));
        assert_eq!(registry.len(), 14);

        let call: ActionCall = serde_json::from_value(json!({
            "next_action": "action_check_auth_status",
            "tracker": {"sender_id": "user7"}
        }))
        .unwrap();
        let response = registry.dispatch(&call).await.unwrap();
        assert_eq!(response.responses[0].text.as_deref(), Some("echo user7"));
    }
}

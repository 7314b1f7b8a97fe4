//! Confirmed navigation to node and sensor-type analytics views.
//!
//! Navigation is two-step: the request action stores the target in a pending
//! slot and asks for confirmation, then the navigate action (or the deny
//! action) consumes and clears it. Both node and sensor-type flows share one
//! set of handlers parameterized by [`NavigationTarget`].

use async_trait::async_trait;
use tracing::{debug, info};
use uuid::Uuid;

use crate::dispatcher::Dispatcher;
use crate::error::ActionError;
use crate::handler::ActionHandler;
use crate::types::{slots, Button, Event, FrontendCommand, Tracker};

const CONFIRM_PAYLOAD: &str = "/confirm_navigation";
const DENY_PAYLOAD: &str = "/deny_navigation";

/// What the user is navigating to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationTarget {
    Node,
    SensorType,
}

impl NavigationTarget {
    /// Entity carrying the target in the latest message.
    pub fn entity(&self) -> &'static str {
        match self {
            NavigationTarget::Node => "node_name",
            NavigationTarget::SensorType => "sensor_type",
        }
    }

    /// Slot holding the target while confirmation is pending.
    pub fn pending_slot(&self) -> &'static str {
        match self {
            NavigationTarget::Node => slots::PENDING_NODE_NAME,
            NavigationTarget::SensorType => slots::PENDING_SENSOR_TYPE,
        }
    }

    fn describe(&self, value: &str) -> String {
        match self {
            NavigationTarget::Node => format!("the analytics view for node '{}'", value),
            NavigationTarget::SensorType => format!("the analytics view for '{}' sensors", value),
        }
    }

    fn missing_entity_prompt(&self) -> &'static str {
        match self {
            NavigationTarget::Node => "Please specify which node you'd like to navigate to.",
            NavigationTarget::SensorType => {
                "Please specify which sensor type you'd like to navigate to."
            }
        }
    }

    fn missing_slot_message(&self) -> &'static str {
        match self {
            NavigationTarget::Node => "No node specified for navigation.",
            NavigationTarget::SensorType => "No sensor type specified for navigation.",
        }
    }

    fn navigate_command(&self, value: &str, confirmation_id: Option<String>) -> FrontendCommand {
        match self {
            NavigationTarget::Node => FrontendCommand::NavigateToNodeAnalytics {
                node_name: value.to_string(),
                confirmation_id,
            },
            NavigationTarget::SensorType => FrontendCommand::NavigateToSensorTypeAnalytics {
                sensor_type: value.to_string(),
                confirmation_id,
            },
        }
    }

    fn list_command(&self) -> FrontendCommand {
        match self {
            NavigationTarget::Node => FrontendCommand::RequestNodeList,
            NavigationTarget::SensorType => FrontendCommand::RequestSensorTypeList,
        }
    }
}

/// Asks the user to confirm navigating to the target named in their message.
pub struct RequestNavigationConfirmation(pub NavigationTarget);

#[async_trait]
impl ActionHandler for RequestNavigationConfirmation {
    fn name(&self) -> &'static str {
        match self.0 {
            NavigationTarget::Node => "action_request_node_navigation_confirmation",
            NavigationTarget::SensorType => "action_request_sensor_navigation_confirmation",
        }
    }

    async fn run(
        &self,
        dispatcher: &mut Dispatcher,
        tracker: &Tracker,
    ) -> Result<Vec<Event>, ActionError> {
        let target = self.0;
        let Some(value) = tracker
            .latest_entity_values(target.entity())
            .next()
            .filter(|v| !v.is_empty())
        else {
            dispatcher.utter_text(target.missing_entity_prompt());
            return Ok(Vec::new());
        };

        let confirmation_id = Uuid::new_v4().to_string();
        debug!(kind = ?target, value, %confirmation_id, "Requesting navigation confirmation");

        dispatcher.utter_buttons(
            format!("Would you like me to navigate you to {}?", target.describe(value)),
            vec![
                Button::new("Yes, navigate", CONFIRM_PAYLOAD),
                Button::new("No, cancel", DENY_PAYLOAD),
            ],
        );

        Ok(vec![
            Event::slot(target.pending_slot(), value),
            Event::slot(slots::CONFIRMATION_ID, confirmation_id),
        ])
    }
}

/// Sends the frontend command for a confirmed navigation.
pub struct NavigateToAnalytics(pub NavigationTarget);

#[async_trait]
impl ActionHandler for NavigateToAnalytics {
    fn name(&self) -> &'static str {
        match self.0 {
            NavigationTarget::Node => "action_navigate_to_node_analytics",
            NavigationTarget::SensorType => "action_navigate_to_sensor_analytics",
        }
    }

    async fn run(
        &self,
        dispatcher: &mut Dispatcher,
        tracker: &Tracker,
    ) -> Result<Vec<Event>, ActionError> {
        let target = self.0;
        let Some(value) = tracker.slot_str(target.pending_slot()) else {
            dispatcher.utter_text(target.missing_slot_message());
            return Ok(Vec::new());
        };
        let confirmation_id = tracker.slot_str(slots::CONFIRMATION_ID).map(str::to_string);

        info!(kind = ?target, value, "Navigating to analytics");
        dispatcher.utter_command(
            format!("Navigating you to {}...", target.describe(value)),
            &target.navigate_command(value, confirmation_id),
        )?;

        Ok(vec![
            Event::clear_slot(target.pending_slot()),
            Event::clear_slot(slots::CONFIRMATION_ID),
        ])
    }
}

/// Asks which target to open and requests the list from the frontend.
pub struct RequestSelection(pub NavigationTarget);

#[async_trait]
impl ActionHandler for RequestSelection {
    fn name(&self) -> &'static str {
        match self.0 {
            NavigationTarget::Node => "action_request_node_selection",
            NavigationTarget::SensorType => "action_request_sensor_type_selection",
        }
    }

    async fn run(
        &self,
        dispatcher: &mut Dispatcher,
        _tracker: &Tracker,
    ) -> Result<Vec<Event>, ActionError> {
        let text = match self.0 {
            NavigationTarget::Node => {
                "Which node would you like to navigate to? You can say something like 'Navigate to node sensor_01'"
            }
            NavigationTarget::SensorType => {
                "Which sensor type would you like to navigate to? You can say something like 'Navigate to air quality sensor analytics'"
            }
        };
        dispatcher.utter_command(text, &self.0.list_command())?;
        Ok(Vec::new())
    }
}

/// Requests the list of available targets from the frontend.
pub struct ListAvailable(pub NavigationTarget);

#[async_trait]
impl ActionHandler for ListAvailable {
    fn name(&self) -> &'static str {
        match self.0 {
            NavigationTarget::Node => "action_list_available_nodes",
            NavigationTarget::SensorType => "action_list_available_sensor_types",
        }
    }

    async fn run(
        &self,
        dispatcher: &mut Dispatcher,
        _tracker: &Tracker,
    ) -> Result<Vec<Event>, ActionError> {
        let text = match self.0 {
            NavigationTarget::Node => "Let me get the list of available nodes for you...",
            NavigationTarget::SensorType => {
                "Let me get the list of available sensor types for you..."
            }
        };
        dispatcher.utter_command(text, &self.0.list_command())?;
        Ok(Vec::new())
    }
}

/// Cancels any pending navigation.
pub struct DenyNavigationAction;

#[async_trait]
impl ActionHandler for DenyNavigationAction {
    fn name(&self) -> &'static str {
        "action_deny_navigation"
    }

    async fn run(
        &self,
        dispatcher: &mut Dispatcher,
        _tracker: &Tracker,
    ) -> Result<Vec<Event>, ActionError> {
        dispatcher.utter_text("Navigation cancelled. Is there anything else I can help you with?");
        Ok(vec![
            Event::clear_slot(slots::PENDING_NODE_NAME),
            Event::clear_slot(slots::PENDING_SENSOR_TYPE),
            Event::clear_slot(slots::CONFIRMATION_ID),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::test_support::{tracker_with_entities, tracker_with_slots};
    use serde_json::{json, Value};

    #[tokio::test]
    async fn test_node_confirmation_sets_pending_slots() {
        let tracker = tracker_with_entities(json!([
            {"entity": "node_name", "value": "sensor_01"}
        ]));
        let mut d = Dispatcher::new();
        let events = RequestNavigationConfirmation(NavigationTarget::Node)
            .run(&mut d, &tracker)
            .await
            .unwrap();

        let msg = &d.messages()[0];
        assert_eq!(
            msg.text.as_deref(),
            Some("Would you like me to navigate you to the analytics view for node 'sensor_01'?")
        );
        assert_eq!(
            msg.buttons,
            vec![
                Button::new("Yes, navigate", "/confirm_navigation"),
                Button::new("No, cancel", "/deny_navigation"),
            ]
        );

        assert_eq!(events.len(), 2);
        assert_eq!(events[0], Event::slot(slots::PENDING_NODE_NAME, "sensor_01"));
        let Event::Slot { name, value } = &events[1];
        assert_eq!(name, slots::CONFIRMATION_ID);
        let id = value.as_str().unwrap();
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[tokio::test]
    async fn test_confirmation_ids_are_fresh() {
        let tracker = tracker_with_entities(json!([
            {"entity": "sensor_type", "value": "air quality"}
        ]));
        let action = RequestNavigationConfirmation(NavigationTarget::SensorType);
        let first = action.run(&mut Dispatcher::new(), &tracker).await.unwrap();
        let second = action.run(&mut Dispatcher::new(), &tracker).await.unwrap();
        assert_eq!(first[0], Event::slot(slots::PENDING_SENSOR_TYPE, "air quality"));
        assert_ne!(first[1], second[1]);
    }

    #[tokio::test]
    async fn test_confirmation_without_entity_prompts() {
        let tracker = tracker_with_entities(json!([]));
        let mut d = Dispatcher::new();
        let events = RequestNavigationConfirmation(NavigationTarget::SensorType)
            .run(&mut d, &tracker)
            .await
            .unwrap();
        assert!(events.is_empty());
        assert_eq!(
            d.messages()[0].text.as_deref(),
            Some("Please specify which sensor type you'd like to navigate to.")
        );
    }

    #[tokio::test]
    async fn test_navigate_to_node_sends_command_and_clears() {
        let tracker = tracker_with_slots(json!({
            "pending_node_name": "sensor_01",
            "confirmation_id": "c-42"
        }));
        let mut d = Dispatcher::new();
        let events = NavigateToAnalytics(NavigationTarget::Node)
            .run(&mut d, &tracker)
            .await
            .unwrap();

        let msg = &d.messages()[0];
        assert_eq!(
            msg.text.as_deref(),
            Some("Navigating you to the analytics view for node 'sensor_01'...")
        );
        assert_eq!(
            msg.custom,
            Some(json!({
                "action": "NAVIGATE_TO_NODE_ANALYTICS",
                "nodeName": "sensor_01",
                "confirmationId": "c-42"
            }))
        );
        assert_eq!(
            events,
            vec![
                Event::clear_slot(slots::PENDING_NODE_NAME),
                Event::clear_slot(slots::CONFIRMATION_ID),
            ]
        );
    }

    #[tokio::test]
    async fn test_navigate_to_sensor_without_confirmation_id() {
        let tracker = tracker_with_slots(json!({ "pending_sensor_type": "temperature" }));
        let mut d = Dispatcher::new();
        NavigateToAnalytics(NavigationTarget::SensorType)
            .run(&mut d, &tracker)
            .await
            .unwrap();
        assert_eq!(
            d.messages()[0].custom,
            Some(json!({
                "action": "NAVIGATE_TO_SENSOR_TYPE_ANALYTICS",
                "sensorType": "temperature",
                "confirmationId": Value::Null
            }))
        );
    }

    #[tokio::test]
    async fn test_navigate_without_pending_slot() {
        let tracker = tracker_with_slots(json!({ "pending_node_name": null }));
        let mut d = Dispatcher::new();
        let events = NavigateToAnalytics(NavigationTarget::Node)
            .run(&mut d, &tracker)
            .await
            .unwrap();
        assert!(events.is_empty());
        assert_eq!(
            d.messages()[0].text.as_deref(),
            Some("No node specified for navigation.")
        );
        assert!(d.messages()[0].custom.is_none());
    }

    #[tokio::test]
    async fn test_selection_and_listing_request_lists() {
        let cases: [(Box<dyn ActionHandler>, &str); 4] = [
            (
                Box::new(RequestSelection(NavigationTarget::Node)),
                "REQUEST_NODE_LIST",
            ),
            (Box::new(ListAvailable(NavigationTarget::Node)), "REQUEST_NODE_LIST"),
            (
                Box::new(RequestSelection(NavigationTarget::SensorType)),
                "REQUEST_SENSOR_TYPE_LIST",
            ),
            (
                Box::new(ListAvailable(NavigationTarget::SensorType)),
                "REQUEST_SENSOR_TYPE_LIST",
            ),
        ];
        for (action, command) in cases {
            let mut d = Dispatcher::new();
            let events = action.run(&mut d, &Tracker::default()).await.unwrap();
            assert!(events.is_empty());
            assert_eq!(d.messages()[0].custom, Some(json!({ "action": command })));
            assert!(d.messages()[0].text.is_some());
        }
    }

    #[tokio::test]
    async fn test_deny_clears_all_pending_slots() {
        let tracker = tracker_with_slots(json!({
            "pending_node_name": "sensor_01",
            "confirmation_id": "c-1"
        }));
        let mut d = Dispatcher::new();
        let events = DenyNavigationAction.run(&mut d, &tracker).await.unwrap();
        assert_eq!(
            d.messages()[0].text.as_deref(),
            Some("Navigation cancelled. Is there anything else I can help you with?")
        );
        assert_eq!(
            events,
            vec![
                Event::clear_slot(slots::PENDING_NODE_NAME),
                Event::clear_slot(slots::PENDING_SENSOR_TYPE),
                Event::clear_slot(slots::CONFIRMATION_ID),
            ]
        );
    }
}

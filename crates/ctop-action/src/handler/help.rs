//! Help menu topic selection.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use tracing::debug;

use crate::dispatcher::Dispatcher;
use crate::error::ActionError;
use crate::handler::ActionHandler;
use crate::types::{slots, Event, Tracker};

/// Topics offered by the help menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpTopic {
    GettingStarted,
    Features,
    Management,
    Security,
    General,
}

impl HelpTopic {
    /// Response template answering this topic.
    pub fn template(&self) -> String {
        format!("utter_help_{}", self)
    }
}

impl fmt::Display for HelpTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HelpTopic::GettingStarted => write!(f, "getting_started"),
            HelpTopic::Features => write!(f, "features"),
            HelpTopic::Management => write!(f, "management"),
            HelpTopic::Security => write!(f, "security"),
            HelpTopic::General => write!(f, "general"),
        }
    }
}

impl FromStr for HelpTopic {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "getting_started" => Ok(HelpTopic::GettingStarted),
            "features" => Ok(HelpTopic::Features),
            "management" => Ok(HelpTopic::Management),
            "security" => Ok(HelpTopic::Security),
            "general" => Ok(HelpTopic::General),
            _ => Err(format!("Unknown help topic: {}", s)),
        }
    }
}

/// Answers the topic picked from the help menu.
pub struct HelpSelectionAction;

#[async_trait]
impl ActionHandler for HelpSelectionAction {
    fn name(&self) -> &'static str {
        "action_handle_help_selection"
    }

    async fn run(
        &self,
        dispatcher: &mut Dispatcher,
        tracker: &Tracker,
    ) -> Result<Vec<Event>, ActionError> {
        // Only the first help_topic entity counts, whatever its value type.
        let topic = tracker
            .latest_message
            .entities
            .iter()
            .find(|e| e.entity == "help_topic")
            .and_then(|e| e.value.as_str())
            .map(HelpTopic::from_str);

        match topic {
            Some(Ok(topic)) => dispatcher.utter_template(topic.template()),
            other => {
                debug!(topic = ?other, "No recognized help topic");
                dispatcher.utter_text("Please select one of the help topics above.");
            }
        }

        // The user engaged with help, so the fallback streak is over.
        Ok(vec![Event::slot(slots::CONSECUTIVE_FALLBACKS, 0)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::test_support::tracker_with_entities;
    use serde_json::json;

    #[test]
    fn test_help_topic_roundtrip() {
        for topic in [
            HelpTopic::GettingStarted,
            HelpTopic::Features,
            HelpTopic::Management,
            HelpTopic::Security,
            HelpTopic::General,
        ] {
            assert_eq!(topic.to_string().parse::<HelpTopic>(), Ok(topic));
        }
        assert!("billing".parse::<HelpTopic>().is_err());
    }

    #[tokio::test]
    async fn test_known_topic_utters_template() {
        let tracker = tracker_with_entities(json!([
            {"entity": "help_topic", "value": "getting_started"}
        ]));
        let mut d = Dispatcher::new();
        let events = HelpSelectionAction.run(&mut d, &tracker).await.unwrap();
        assert_eq!(
            d.messages()[0].response.as_deref(),
            Some("utter_help_getting_started")
        );
        assert_eq!(events, vec![Event::slot(slots::CONSECUTIVE_FALLBACKS, 0)]);
    }

    #[tokio::test]
    async fn test_first_help_topic_entity_wins() {
        let tracker = tracker_with_entities(json!([
            {"entity": "node_name", "value": "sensor_01"},
            {"entity": "help_topic", "value": "security"},
            {"entity": "help_topic", "value": "features"}
        ]));
        let mut d = Dispatcher::new();
        HelpSelectionAction.run(&mut d, &tracker).await.unwrap();
        assert_eq!(d.messages()[0].response.as_deref(), Some("utter_help_security"));
    }

    #[tokio::test]
    async fn test_non_string_first_topic_prompts() {
        let tracker = tracker_with_entities(json!([
            {"entity": "help_topic", "value": 7},
            {"entity": "help_topic", "value": "security"}
        ]));
        let mut d = Dispatcher::new();
        let events = HelpSelectionAction.run(&mut d, &tracker).await.unwrap();
        assert_eq!(
            d.messages()[0].text.as_deref(),
            Some("Please select one of the help topics above.")
        );
        assert!(d.messages()[0].response.is_none());
        assert_eq!(events, vec![Event::slot(slots::CONSECUTIVE_FALLBACKS, 0)]);
    }

    #[tokio::test]
    async fn test_unknown_or_missing_topic_prompts() {
        for entities in [json!([]), json!([{"entity": "help_topic", "value": "billing"}])] {
            let tracker = tracker_with_entities(entities);
            let mut d = Dispatcher::new();
            let events = HelpSelectionAction.run(&mut d, &tracker).await.unwrap();
            assert_eq!(
                d.messages()[0].text.as_deref(),
                Some("Please select one of the help topics above.")
            );
            assert_eq!(events, vec![Event::slot(slots::CONSECUTIVE_FALLBACKS, 0)]);
        }
    }
}

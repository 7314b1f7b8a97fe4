//! Follow-up FAQ suggestions after a free-text user turn.

use std::sync::Arc;

use async_trait::async_trait;
use ctop_recommend::{RecommendError, RecommendRequest, RecommenderHandle, CONTROL_PREFIX};
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::dispatcher::Dispatcher;
use crate::error::ActionError;
use crate::handler::ActionHandler;
use crate::types::{slots, ActionSettings, Button, Event, Tracker};

const RECOMMENDATION_PROMPT: &str = "You might also want to know:";
const FALLBACK_PROMPT: &str = "Here are some common questions:";
const FALLBACK_TEMPLATE: &str = "utter_fallback_suggestions";

/// Suggests related questions as buttons that route to their intents.
pub struct RecommendFaqsAction {
    recommender: Arc<RecommenderHandle>,
    settings: ActionSettings,
}

impl RecommendFaqsAction {
    pub fn new(recommender: Arc<RecommenderHandle>, settings: ActionSettings) -> Self {
        Self {
            recommender,
            settings,
        }
    }
}

/// Text and intent of the last user event.
fn last_user_request(tracker: &Tracker) -> Result<Option<RecommendRequest>, RecommendError> {
    let Some(event) = tracker.last_user_event() else {
        return Ok(None);
    };
    let intent = event
        .get("parse_data")
        .and_then(|p| p.get("intent"))
        .and_then(|i| i.get("name"));
    RecommendRequest::from_parts(event.get("text"), intent).map(Some)
}

/// Cut `text` to at most `max` characters, marking the cut with `...`.
pub fn truncate_label(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

#[async_trait]
impl ActionHandler for RecommendFaqsAction {
    fn name(&self) -> &'static str {
        "action_recommend_faqs"
    }

    async fn run(
        &self,
        dispatcher: &mut Dispatcher,
        tracker: &Tracker,
    ) -> Result<Vec<Event>, ActionError> {
        let request = match last_user_request(tracker) {
            Ok(Some(request)) => request,
            Ok(None) => {
                warn!("No user message found in tracker events");
                return Ok(Vec::new());
            }
            Err(RecommendError::InvalidArgument(reason)) => {
                error!(reason = %reason, "Recommendation failed on malformed user event");
                dispatcher.utter_text(FALLBACK_PROMPT);
                dispatcher.utter_template(FALLBACK_TEMPLATE);
                return Ok(Vec::new());
            }
        };

        debug!(text = %request.text, intent = %request.intent, "Recommending FAQs");

        if request.text.is_empty() {
            warn!("Last user message has no text");
            return Ok(Vec::new());
        }
        if request.text.starts_with(CONTROL_PREFIX) {
            debug!("Skipping recommendation for button click");
            return Ok(Vec::new());
        }

        let recs = self
            .recommender
            .current()
            .recommend_request(&request, self.settings.top_k);
        if recs.is_empty() {
            debug!("No recommendations found");
            return Ok(Vec::new());
        }

        for (i, rec) in recs.iter().enumerate() {
            debug!(
                rank = i + 1,
                text = %rec.entry.text,
                score = rec.score,
                "Recommendation"
            );
        }

        let buttons = recs
            .iter()
            .map(|rec| {
                Button::new(
                    truncate_label(&rec.entry.text, self.settings.max_button_label),
                    format!("{}{}", CONTROL_PREFIX, rec.entry.intent),
                )
            })
            .collect();
        dispatcher.utter_buttons(RECOMMENDATION_PROMPT, buttons);

        let intents: Vec<Value> = recs
            .iter()
            .map(|rec| Value::String(rec.entry.intent.clone()))
            .collect();
        Ok(vec![Event::slot(slots::LAST_RECOMMENDATIONS, intents)])
    }
}

//! Consecutive fallback counting and escalation to the help menu.

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::dispatcher::Dispatcher;
use crate::error::ActionError;
use crate::handler::ActionHandler;
use crate::types::{slots, Event, Tracker};

/// Counts fallbacks and shows the help menu once `threshold` is reached.
pub struct EscalatedFallbackAction {
    threshold: u32,
}

impl EscalatedFallbackAction {
    pub fn new(threshold: u32) -> Self {
        Self { threshold }
    }
}

/// Current fallback count. The slot may arrive as a float.
fn fallback_count(tracker: &Tracker) -> u32 {
    tracker
        .get_slot(slots::CONSECUTIVE_FALLBACKS)
        .and_then(Value::as_f64)
        .filter(|n| n.is_finite() && *n > 0.0)
        .map(|n| n.min(u32::MAX as f64) as u32)
        .unwrap_or(0)
}

#[async_trait]
impl ActionHandler for EscalatedFallbackAction {
    fn name(&self) -> &'static str {
        "action_handle_escalated_fallback"
    }

    async fn run(
        &self,
        dispatcher: &mut Dispatcher,
        tracker: &Tracker,
    ) -> Result<Vec<Event>, ActionError> {
        let count = fallback_count(tracker).saturating_add(1);

        if count >= self.threshold {
            info!(count, "Fallback threshold reached, showing help menu");
            dispatcher.utter_template("utter_help_menu");
            return Ok(vec![Event::slot(slots::CONSECUTIVE_FALLBACKS, 0)]);
        }

        dispatcher.utter_template("utter_default");
        Ok(vec![Event::slot(slots::CONSECUTIVE_FALLBACKS, count)])
    }
}

pub struct ResetFallbackCounterAction;

#[async_trait]
impl ActionHandler for ResetFallbackCounterAction {
    fn name(&self) -> &'static str {
        "action_reset_fallback_counter"
    }

    async fn run(
        &self,
        _dispatcher: &mut Dispatcher,
        _tracker: &Tracker,
    ) -> Result<Vec<Event>, ActionError> {
        Ok(vec![Event::slot(slots::CONSECUTIVE_FALLBACKS, 0)])
    }
}

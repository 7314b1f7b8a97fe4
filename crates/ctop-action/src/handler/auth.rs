use async_trait::async_trait;

use crate::dispatcher::Dispatcher;
use crate::error::ActionError;
use crate::handler::ActionHandler;
use crate::types::{Event, FrontendCommand, Tracker};

/// Asks the frontend to report whether the user is signed in.
pub struct CheckAuthStatusAction;

#[async_trait]
impl ActionHandler for CheckAuthStatusAction {
    fn name(&self) -> &'static str {
        "action_check_auth_status"
    }

    async fn run(
        &self,
        dispatcher: &mut Dispatcher,
        _tracker: &Tracker,
    ) -> Result<Vec<Event>, ActionError> {
        dispatcher.utter_command(
            "Checking authentication status...",
            &FrontendCommand::CheckAuthStatus,
        )?;
        Ok(Vec::new())
    }
}

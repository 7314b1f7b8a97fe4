//! Collects the messages an action sends during one run.

use crate::error::ActionError;
use crate::types::{BotMessage, Button, FrontendCommand};

#[derive(Debug, Default)]
pub struct Dispatcher {
    messages: Vec<BotMessage>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn utter_text(&mut self, text: impl Into<String>) {
        self.messages.push(BotMessage {
            text: Some(text.into()),
            ..BotMessage::default()
        });
    }

    pub fn utter_buttons(&mut self, text: impl Into<String>, buttons: Vec<Button>) {
        self.messages.push(BotMessage {
            text: Some(text.into()),
            buttons,
            ..BotMessage::default()
        });
    }

    /// Send a response template defined in the dialogue domain.
    pub fn utter_template(&mut self, name: impl Into<String>) {
        self.messages.push(BotMessage {
            response: Some(name.into()),
            ..BotMessage::default()
        });
    }

    /// Send text together with a command for the web frontend.
    pub fn utter_command(
        &mut self,
        text: impl Into<String>,
        command: &FrontendCommand,
    ) -> Result<(), ActionError> {
        let custom = serde_json::to_value(command)?;
        self.messages.push(BotMessage {
            text: Some(text.into()),
            custom: Some(custom),
            ..BotMessage::default()
        });
        Ok(())
    }

    pub fn messages(&self) -> &[BotMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<BotMessage> {
        self.messages
    }
}

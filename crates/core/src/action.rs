//! Dialog actions and the per-turn request/response envelope

use serde::{Deserialize, Serialize};

use crate::session::{InvocationPhase, Session};
use crate::slots::SlotName;

/// A single button on a choice card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    /// Text shown on the button
    pub label: String,
    /// Value sent back when the button is pressed
    pub value: String,
}

impl Choice {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Rich card with an ordered list of buttons
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceCard {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub buttons: Vec<Choice>,
}

impl ChoiceCard {
    pub fn new(title: impl Into<String>, buttons: Vec<Choice>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            buttons,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }
}

/// Message sent back to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    PlainText { content: String },
    Card { card: ChoiceCard },
}

impl Message {
    /// Create a plain-text message
    pub fn text(content: impl Into<String>) -> Self {
        Self::PlainText {
            content: content.into(),
        }
    }

    /// Create a card message
    pub fn card(card: ChoiceCard) -> Self {
        Self::Card { card }
    }

    /// Text content, if this is a plain-text message
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Message::PlainText { content } => Some(content),
            Message::Card { .. } => None,
        }
    }

    /// Card, if this is a card message
    pub fn as_card(&self) -> Option<&ChoiceCard> {
        match self {
            Message::Card { card } => Some(card),
            Message::PlainText { .. } => None,
        }
    }
}

/// Final state reported on `Close`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FulfillmentState {
    Fulfilled,
    NotFulfilled,
}

/// What the host should do next
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DialogAction {
    /// Ask the user to supply or correct one slot
    ElicitSlot {
        slot: SlotName,
        messages: Vec<Message>,
    },
    /// Return to free-form input, keeping the intent's slots
    ElicitIntent { messages: Vec<Message> },
    /// Hand control to the host's fulfillment phase
    Delegate,
    /// End the dialog with a final outcome
    Close {
        state: FulfillmentState,
        messages: Vec<Message>,
    },
}

impl DialogAction {
    /// Short name used in logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            DialogAction::ElicitSlot { .. } => "elicit_slot",
            DialogAction::ElicitIntent { .. } => "elicit_intent",
            DialogAction::Delegate => "delegate",
            DialogAction::Close { .. } => "close",
        }
    }

    /// Messages carried by this action
    pub fn messages(&self) -> &[Message] {
        match self {
            DialogAction::ElicitSlot { messages, .. }
            | DialogAction::ElicitIntent { messages }
            | DialogAction::Close { messages, .. } => messages,
            DialogAction::Delegate => &[],
        }
    }

    /// Slot being elicited, if any
    pub fn elicited_slot(&self) -> Option<SlotName> {
        match self {
            DialogAction::ElicitSlot { slot, .. } => Some(*slot),
            _ => None,
        }
    }
}

/// Inbound turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnRequest {
    pub phase: InvocationPhase,
    pub session: Session,
}

impl TurnRequest {
    pub fn new(phase: InvocationPhase, session: Session) -> Self {
        Self { phase, session }
    }
}

/// Outbound turn: updated session plus the action to take
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnResponse {
    pub session: Session,
    pub action: DialogAction,
}

impl TurnResponse {
    pub fn new(session: Session, action: DialogAction) -> Self {
        Self { session, action }
    }
}

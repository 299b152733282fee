//! Dialog driver
//!
//! `IntakeEngine::process_turn` is a function of (session, utterance, phase)
//! to (session, action). It holds no per-session state between calls.
//!
//! Turn flow:
//! 1. Turns for another intent get the capability prompt.
//! 2. The restart command wins over everything else, in either phase.
//! 3. Pre-commit: first unset or invalid slot is elicited and any earlier
//!    confirmation is dropped; once all data slots are valid the
//!    confirmation workflow takes over.
//! 4. Post-commit: the finalizer persists or aborts. Incomplete data falls
//!    back to the pre-commit scan instead of being persisted.

use std::sync::Arc;

use intake_config::{ClosingMessages, DialogConfig};
use intake_core::{
    DialogAction, Error, InvocationPhase, Message, Session, SlotName, TurnRequest, TurnResponse,
};
use intake_persistence::RecordStore;

use crate::command::{CommandParser, TurnCommand};
use crate::confirmation::ConfirmationWorkflow;
use crate::dst::{next_missing, scan_slots, Reprompt, SlotScan, ValidatorRegistry};
use crate::finalizer::Finalizer;
use crate::reset::reset;

/// Slot-filling state machine for the service-request form
pub struct IntakeEngine {
    intent_name: String,
    closing: ClosingMessages,
    commands: CommandParser,
    validators: ValidatorRegistry,
    confirmation: ConfirmationWorkflow,
    finalizer: Finalizer,
}

impl IntakeEngine {
    pub fn new(config: &DialogConfig, store: Arc<dyn RecordStore>) -> Self {
        let messages = &config.messages;
        let confirmation = ConfirmationWorkflow::new(
            messages.confirmation.clone(),
            config.restart_command.clone(),
        );
        let finalizer = Finalizer::new(
            store,
            messages.closing.clone(),
            confirmation.answers().clone(),
            &config.restart_command,
        );

        Self {
            intent_name: config.intent_name.clone(),
            closing: messages.closing.clone(),
            commands: CommandParser::new(&config.restart_command),
            validators: ValidatorRegistry::new(messages.clone()),
            confirmation,
            finalizer,
        }
    }

    /// Intent owned by this engine
    pub fn intent_name(&self) -> &str {
        &self.intent_name
    }

    /// Process one turn
    pub async fn process_turn(&self, request: TurnRequest) -> TurnResponse {
        let TurnRequest { phase, mut session } = request;

        if session.intent_name != self.intent_name {
            let err = Error::UnknownIntent(session.intent_name.clone());
            tracing::warn!(session_id = %session.session_id, error = %err, "Turn not handled");
            return TurnResponse::new(session, self.unknown_intent_action());
        }

        if self.commands.parse(&session.raw_utterance) == TurnCommand::Restart {
            let action = reset(&mut session, &self.closing.restart);
            return TurnResponse::new(session, action);
        }

        let action = match phase {
            InvocationPhase::PreCommit => self.pre_commit(&mut session),
            InvocationPhase::PostCommit => self.post_commit(&mut session).await,
        };

        tracing::debug!(
            session_id = %session.session_id,
            phase = ?phase,
            action = action.kind(),
            slot = ?action.elicited_slot(),
            "Turn processed"
        );

        TurnResponse::new(session, action)
    }

    /// Generic reply for events that could not be turned into a request
    pub fn fallback_action(&self) -> DialogAction {
        DialogAction::ElicitIntent {
            messages: vec![Message::text(&self.closing.fallback)],
        }
    }

    /// Reply for turns routed to an intent this engine does not own
    pub fn unknown_intent_action(&self) -> DialogAction {
        DialogAction::ElicitIntent {
            messages: vec![Message::text(&self.closing.unknown_intent)],
        }
    }

    fn pre_commit(&self, session: &mut Session) -> DialogAction {
        match scan_slots(session, &self.validators) {
            SlotScan::NeedsInput { slot, reprompt } => {
                // An earlier answer covered values that are about to change
                session.clear(SlotName::Confirmation);
                elicit(slot, reprompt)
            }
            SlotScan::Complete => self.confirmation.handle(session),
        }
    }

    async fn post_commit(&self, session: &mut Session) -> DialogAction {
        if let SlotScan::NeedsInput { slot, reprompt } = scan_slots(session, &self.validators) {
            tracing::warn!(
                session_id = %session.session_id,
                slot = %slot,
                first_unset = ?next_missing(session),
                "Fulfillment requested with incomplete data, re-eliciting"
            );
            session.clear(SlotName::Confirmation);
            return elicit(slot, reprompt);
        }

        match self.finalizer.finalize(session).await {
            Ok(action) => action,
            Err(e) => {
                tracing::warn!(
                    session_id = %session.session_id,
                    error = %e,
                    "Finalize failed, asking the user to confirm again"
                );
                self.confirmation
                    .retry(session, &self.closing.persistence_failed)
            }
        }
    }
}

fn elicit(slot: SlotName, reprompt: Reprompt) -> DialogAction {
    let mut messages = vec![Message::text(reprompt.message)];
    if let Some(card) = reprompt.choices {
        messages.push(Message::card(card));
    }
    DialogAction::ElicitSlot { slot, messages }
}

//! Fulfillment finalizer
//!
//! Post-commit only. Builds the record, writes it once, and closes the
//! dialog. The store write is the engine's only durable side effect.

use std::sync::Arc;

use intake_config::{render, ClosingMessages};
use intake_core::{
    Choice, ChoiceCard, DialogAction, Error, FulfillmentState, Message, Result,
    ServiceRequestRecord, Session,
};
use intake_persistence::RecordStore;

use crate::confirmation::{AnswerParser, ConfirmationAnswer};

/// Persists confirmed requests and renders the closing messages
pub struct Finalizer {
    store: Arc<dyn RecordStore>,
    closing: ClosingMessages,
    answers: AnswerParser,
    restart_command: String,
}

impl Finalizer {
    pub fn new(
        store: Arc<dyn RecordStore>,
        closing: ClosingMessages,
        answers: AnswerParser,
        restart_command: impl Into<String>,
    ) -> Self {
        Self {
            store,
            closing,
            answers,
            restart_command: restart_command.into(),
        }
    }

    /// Close the dialog for a post-commit turn.
    ///
    /// Anything other than an affirmative answer closes as `NotFulfilled`
    /// without touching the store. A failed write returns
    /// `Error::Persistence` and nothing is reported as created.
    pub async fn finalize(&self, session: &Session) -> Result<DialogAction> {
        if self.answers.from_session(session) != Some(ConfirmationAnswer::Affirmative) {
            tracing::info!(session_id = %session.session_id, "Request not confirmed, closing");
            return Ok(DialogAction::Close {
                state: FulfillmentState::NotFulfilled,
                messages: vec![Message::text(&self.closing.not_confirmed)],
            });
        }

        let record = ServiceRequestRecord::from_session(session)?;

        if let Err(e) = self.store.put(&record).await {
            metrics::counter!("intake_persistence_failures_total").increment(1);
            tracing::error!(
                session_id = %session.session_id,
                reference_id = %record.reference_id(),
                error = %e,
                "Failed to store service request"
            );
            return Err(Error::from(e));
        }

        metrics::counter!("intake_records_created_total").increment(1);
        tracing::info!(
            session_id = %session.session_id,
            reference_id = %record.reference_id(),
            "Service request created"
        );

        Ok(self.fulfilled(&record))
    }

    fn fulfilled(&self, record: &ServiceRequestRecord) -> DialogAction {
        let text = render(
            &self.closing.fulfilled,
            &[
                ("contact_name", record.contact_name()),
                ("reference_id", record.reference_id().as_str()),
            ],
        );
        let another = ChoiceCard::new(
            self.closing.another_request_title.clone(),
            vec![Choice::new(
                &self.closing.another_request_label,
                &self.restart_command,
            )],
        );

        DialogAction::Close {
            state: FulfillmentState::Fulfilled,
            messages: vec![Message::text(text), Message::card(another)],
        }
    }
}

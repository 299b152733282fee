//! Confirmation workflow
//!
//! Once every data slot is valid the user sees a summary and a yes/no card.
//! A negative answer clears only `Confirmation`; data slots are kept so the
//! user can correct a single field. Any other answer is delegated and the
//! fulfillment turn decides: only an affirmative answer is persisted.

use intake_config::constants::choices;
use intake_config::{fold, render, ConfirmationMessages};
use intake_core::{Choice, ChoiceCard, DialogAction, Message, Session, SlotName};

/// Interpretation of the value held in `Confirmation`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmationAnswer {
    Affirmative,
    Negative,
    Unrecognized,
}

/// Yes/no vocabulary: the built-in answers plus the configured button values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerParser {
    affirmative: Vec<String>,
    negative: Vec<String>,
}

impl AnswerParser {
    pub fn new(messages: &ConfirmationMessages) -> Self {
        Self {
            affirmative: vocabulary(&choices::AFFIRMATIVE, &messages.yes_value),
            negative: vocabulary(&choices::NEGATIVE, &messages.no_value),
        }
    }

    /// Parse a raw answer, case and accent insensitive
    pub fn parse(&self, value: &str) -> ConfirmationAnswer {
        let folded = fold(value);
        if self.affirmative.contains(&folded) {
            ConfirmationAnswer::Affirmative
        } else if self.negative.contains(&folded) {
            ConfirmationAnswer::Negative
        } else {
            ConfirmationAnswer::Unrecognized
        }
    }

    /// Answer currently held by the session, if any
    pub fn from_session(&self, session: &Session) -> Option<ConfirmationAnswer> {
        session.get(SlotName::Confirmation).map(|v| self.parse(v))
    }
}

impl Default for AnswerParser {
    fn default() -> Self {
        Self::new(&ConfirmationMessages::default())
    }
}

fn vocabulary(builtin: &[&str], configured: &str) -> Vec<String> {
    let mut words: Vec<String> = builtin.iter().map(|w| w.to_string()).collect();
    let configured = fold(configured);
    if !configured.is_empty() && !words.contains(&configured) {
        words.push(configured);
    }
    words
}

/// Renders the summary and branches on the user's answer
#[derive(Debug, Clone)]
pub struct ConfirmationWorkflow {
    messages: ConfirmationMessages,
    answers: AnswerParser,
    restart_command: String,
}

impl ConfirmationWorkflow {
    pub fn new(messages: ConfirmationMessages, restart_command: impl Into<String>) -> Self {
        Self {
            answers: AnswerParser::new(&messages),
            messages,
            restart_command: restart_command.into(),
        }
    }

    /// Vocabulary used to read the `Confirmation` slot
    pub fn answers(&self) -> &AnswerParser {
        &self.answers
    }

    /// Summary of every captured data value, one labeled line each
    pub fn summary(&self, session: &Session) -> String {
        let contact = session.get(SlotName::ContactName).unwrap_or("-");
        let mut text = render(&self.messages.header, &[("contact_name", contact)]);

        for (slot, value) in session.data_slots() {
            text.push_str(&format!("\n• {}: {}", slot.label(), value.unwrap_or("-")));
        }

        text.push('\n');
        text.push_str(&self.messages.footer);
        text
    }

    /// Binary yes/no card
    pub fn confirmation_card(&self) -> ChoiceCard {
        ChoiceCard::new(
            self.messages.card_title.clone(),
            vec![
                Choice::new(&self.messages.yes_label, &self.messages.yes_value),
                Choice::new(&self.messages.no_label, &self.messages.no_value),
            ],
        )
        .with_subtitle(self.messages.card_subtitle.clone())
    }

    /// Ask for confirmation: summary plus the yes/no card
    pub fn request(&self, session: &mut Session) -> DialogAction {
        session.clear(SlotName::Confirmation);
        DialogAction::ElicitSlot {
            slot: SlotName::Confirmation,
            messages: vec![
                Message::text(self.summary(session)),
                Message::card(self.confirmation_card()),
            ],
        }
    }

    /// Re-ask for confirmation after a failed save, leading with `notice`
    pub fn retry(&self, session: &mut Session, notice: &str) -> DialogAction {
        session.clear(SlotName::Confirmation);
        DialogAction::ElicitSlot {
            slot: SlotName::Confirmation,
            messages: vec![
                Message::text(notice),
                Message::card(self.confirmation_card()),
            ],
        }
    }

    /// Branch on the answer held in `Confirmation` during pre-commit turns
    pub fn handle(&self, session: &mut Session) -> DialogAction {
        match self.answers.from_session(session) {
            None => self.request(session),
            Some(ConfirmationAnswer::Affirmative) => {
                tracing::debug!(session_id = %session.session_id, "Confirmation accepted");
                DialogAction::Delegate
            }
            Some(ConfirmationAnswer::Negative) => {
                tracing::debug!(session_id = %session.session_id, "Confirmation denied");
                session.clear(SlotName::Confirmation);
                DialogAction::ElicitIntent {
                    messages: vec![Message::text(render(
                        &self.messages.denied,
                        &[("restart_command", &self.restart_command)],
                    ))],
                }
            }
            Some(ConfirmationAnswer::Unrecognized) => {
                tracing::debug!(
                    session_id = %session.session_id,
                    answer = session.get(SlotName::Confirmation).unwrap_or_default(),
                    "Unrecognized confirmation answer, delegating"
                );
                DialogAction::Delegate
            }
        }
    }
}

impl Default for ConfirmationWorkflow {
    fn default() -> Self {
        Self::new(
            ConfirmationMessages::default(),
            intake_config::constants::dialog::RESTART_COMMAND,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::DATA_SLOTS;

    fn complete() -> Session {
        Session::new("s-9", "SolicitudServicio")
            .with_slot(SlotName::ContactName, "Laura")
            .with_slot(SlotName::PhoneNumber, "3001234567")
            .with_slot(SlotName::ChildName, "Tomás")
            .with_slot(SlotName::ChildAge, "6")
            .with_slot(SlotName::SchoolLevel, "Primaria")
            .with_slot(SlotName::DaysPerWeek, "3")
            .with_slot(SlotName::HoursPerDay, "2")
            .with_slot(SlotName::Shift, "Tarde")
    }

    #[test]
    fn test_parse_answers() {
        let answers = AnswerParser::default();
        for yes in ["sí", "si", "s", "SÍ", " Si "] {
            assert_eq!(answers.parse(yes), ConfirmationAnswer::Affirmative);
        }
        for no in ["no", "n", "NO"] {
            assert_eq!(answers.parse(no), ConfirmationAnswer::Negative);
        }
        assert_eq!(answers.parse("tal vez"), ConfirmationAnswer::Unrecognized);
    }

    #[test]
    fn test_configured_button_values_are_understood() {
        let messages = ConfirmationMessages {
            yes_value: "Confirmar".to_string(),
            no_value: "corregir".to_string(),
            ..ConfirmationMessages::default()
        };
        let workflow = ConfirmationWorkflow::new(messages, "registrar otra");

        let card = workflow.confirmation_card();
        let answers = workflow.answers();
        assert_eq!(answers.parse(&card.buttons[0].value), ConfirmationAnswer::Affirmative);
        assert_eq!(answers.parse(&card.buttons[1].value), ConfirmationAnswer::Negative);
        assert_eq!(answers.parse("sí"), ConfirmationAnswer::Affirmative);

        let mut session = complete().with_slot(SlotName::Confirmation, "confirmar");
        assert_eq!(workflow.handle(&mut session), DialogAction::Delegate);
    }

    #[test]
    fn test_summary_lists_every_value() {
        let workflow = ConfirmationWorkflow::default();
        let session = complete();
        let summary = workflow.summary(&session);

        assert!(summary.starts_with("Laura, ¿son correctos estos datos?"));
        for slot in DATA_SLOTS {
            let line = format!("• {}: {}", slot.label(), session.get(slot).unwrap());
            assert!(summary.contains(&line), "missing line {line}");
        }
    }

    #[test]
    fn test_request_elicits_confirmation_with_card() {
        let workflow = ConfirmationWorkflow::default();
        let mut session = complete();
        let action = workflow.request(&mut session);

        assert_eq!(action.elicited_slot(), Some(SlotName::Confirmation));
        let card = action.messages()[1].as_card().unwrap();
        let values: Vec<_> = card.buttons.iter().map(|b| b.value.as_str()).collect();
        assert_eq!(values, vec!["sí", "no"]);
    }

    #[test]
    fn test_denial_keeps_data_slots() {
        let workflow = ConfirmationWorkflow::default();
        let mut session = complete().with_slot(SlotName::Confirmation, "no");
        let action = workflow.handle(&mut session);

        assert!(matches!(action, DialogAction::ElicitIntent { .. }));
        assert!(action.messages()[0].as_text().unwrap().contains("'registrar otra'"));
        assert!(!session.is_set(SlotName::Confirmation));
        assert!(DATA_SLOTS.iter().all(|slot| session.is_set(*slot)));
    }

    #[test]
    fn test_affirmative_delegates() {
        let workflow = ConfirmationWorkflow::default();
        let mut session = complete().with_slot(SlotName::Confirmation, "sí");
        assert_eq!(workflow.handle(&mut session), DialogAction::Delegate);
        assert_eq!(session.get(SlotName::Confirmation), Some("sí"));
    }

    #[test]
    fn test_unrecognized_answer_is_delegated() {
        let workflow = ConfirmationWorkflow::default();
        let mut session = complete().with_slot(SlotName::Confirmation, "quizás");

        assert_eq!(workflow.handle(&mut session), DialogAction::Delegate);
        assert_eq!(session.get(SlotName::Confirmation), Some("quizás"));
    }
}

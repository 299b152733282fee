//! Form reset

use intake_core::{DialogAction, Message, Session, SlotName};

/// Clear every slot, `Confirmation` included, and ask for the first field again
pub fn reset(session: &mut Session, restart_prompt: &str) -> DialogAction {
    session.clear_all();
    tracing::info!(session_id = %session.session_id, "Form restarted");

    DialogAction::ElicitSlot {
        slot: SlotName::ContactName,
        messages: vec![Message::text(restart_prompt)],
    }
}

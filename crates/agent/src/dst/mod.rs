//! Dialogue State Tracking (DST) for the intake form
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Slot Order Registry                      │
//! │  - fixed SLOT_ORDER, next_missing, terminal marker          │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Field Validator Registry                   │
//! │  - one FieldRule per slot, rejection reprompts              │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       scan_slots                            │
//! │  - first unset or invalid slot in order, or Complete        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod order;
pub mod validators;

pub use order::{is_terminal, next_missing};
pub use validators::{FieldRule, Outcome, Reprompt, ValidatorRegistry};

use intake_core::{Session, SlotName, DATA_SLOTS};

/// Result of walking the data slots in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotScan {
    /// Every data slot holds a value that passes its rule
    Complete,
    /// The first slot needing input, with the prompt to issue
    NeedsInput { slot: SlotName, reprompt: Reprompt },
}

/// Walk the data slots in fixed order and stop at the first one that is
/// unset or fails its rule. Later slots are not evaluated.
pub fn scan_slots(session: &Session, validators: &ValidatorRegistry) -> SlotScan {
    for slot in DATA_SLOTS {
        if let Outcome::Rejected(reprompt) = validators.validate(slot, session.get(slot)) {
            return SlotScan::NeedsInput { slot, reprompt };
        }
    }
    SlotScan::Complete
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> Session {
        Session::new("s", "SolicitudServicio")
            .with_slot(SlotName::ContactName, "Ana")
            .with_slot(SlotName::PhoneNumber, "3001234567")
            .with_slot(SlotName::ChildName, "Luis")
            .with_slot(SlotName::ChildAge, "5")
            .with_slot(SlotName::SchoolLevel, "Preescolar")
            .with_slot(SlotName::DaysPerWeek, "3")
            .with_slot(SlotName::HoursPerDay, "2")
            .with_slot(SlotName::Shift, "Tarde")
    }

    #[test]
    fn test_complete_session() {
        assert_eq!(
            scan_slots(&filled(), &ValidatorRegistry::default()),
            SlotScan::Complete
        );
    }

    #[test]
    fn test_stops_at_first_invalid_before_later_unset() {
        let mut session = filled().with_slot(SlotName::ChildAge, "15");
        session.clear(SlotName::Shift);

        match scan_slots(&session, &ValidatorRegistry::default()) {
            SlotScan::NeedsInput { slot, .. } => assert_eq!(slot, SlotName::ChildAge),
            SlotScan::Complete => panic!("expected ChildAge"),
        }
    }

    #[test]
    fn test_unset_slot_reported_with_base_prompt() {
        let mut session = filled();
        session.clear(SlotName::PhoneNumber);

        match scan_slots(&session, &ValidatorRegistry::default()) {
            SlotScan::NeedsInput { slot, reprompt } => {
                assert_eq!(slot, SlotName::PhoneNumber);
                assert_eq!(reprompt.message, "¿Cuál es tu número de celular?");
            }
            SlotScan::Complete => panic!("expected PhoneNumber"),
        }
    }
}

//! Slot Order Registry
//!
//! The elicitation order is the constant `SLOT_ORDER` from the core crate;
//! nothing here derives or reorders it at runtime.

use intake_core::{Session, SlotName, DATA_SLOTS};

/// First data slot without a value, scanning up to (not including) `Confirmation`
pub fn next_missing(session: &Session) -> Option<SlotName> {
    DATA_SLOTS
        .iter()
        .copied()
        .find(|slot| !session.is_set(*slot))
}

/// Whether the slot is the terminal confirmation marker
pub fn is_terminal(slot: SlotName) -> bool {
    slot.is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::SLOT_ORDER;
    use proptest::prelude::*;

    fn session() -> Session {
        Session::new("s", "SolicitudServicio")
    }

    #[test]
    fn test_empty_session_starts_with_contact_name() {
        assert_eq!(next_missing(&session()), Some(SlotName::ContactName));
    }

    #[test]
    fn test_skips_filled_slots() {
        let s = session()
            .with_slot(SlotName::ContactName, "Ana")
            .with_slot(SlotName::PhoneNumber, "3001234567");
        assert_eq!(next_missing(&s), Some(SlotName::ChildName));
    }

    #[test]
    fn test_confirmation_never_reported_missing() {
        let mut s = session();
        for slot in DATA_SLOTS {
            s.set(slot, "x");
        }
        assert!(!s.is_set(SlotName::Confirmation));
        assert_eq!(next_missing(&s), None);
    }

    #[test]
    fn test_is_terminal() {
        assert!(is_terminal(SlotName::Confirmation));
        assert!(!is_terminal(SlotName::Shift));
    }

    proptest! {
        #[test]
        fn prop_next_missing_is_earliest_unset(mask in proptest::collection::vec(any::<bool>(), 9)) {
            let mut s = session();
            for (slot, filled) in SLOT_ORDER.iter().zip(mask.iter()) {
                if *filled {
                    s.set(*slot, "value");
                }
            }

            let expected = DATA_SLOTS
                .iter()
                .zip(mask.iter())
                .find(|(_, filled)| !**filled)
                .map(|(slot, _)| *slot);

            prop_assert_eq!(next_missing(&s), expected);
            // Deterministic: asking twice gives the same answer
            prop_assert_eq!(next_missing(&s), next_missing(&s));
        }
    }
}

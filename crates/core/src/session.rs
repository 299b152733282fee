//! Per-turn session state
//!
//! A `Session` is rebuilt from the host event on every turn and written back
//! into the response. It is never cached between calls.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::slots::{SlotName, DATA_SLOTS, SLOT_ORDER};

/// Captured slot value. `None` means not yet captured.
pub type SlotValue = Option<String>;

/// Invocation phase signalled by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationPhase {
    /// Interactive elicitation and validation
    PreCommit,
    /// Final persistence after the user confirmed
    PostCommit,
}

/// One in-progress service request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Host session identifier
    pub session_id: String,
    /// Intent the host routed this turn to
    pub intent_name: String,
    /// Raw user utterance for this turn
    #[serde(default)]
    pub raw_utterance: String,
    /// Slot values keyed in fixed order
    slots: BTreeMap<SlotName, SlotValue>,
}

impl Session {
    /// Create a session with every slot unset
    pub fn new(session_id: impl Into<String>, intent_name: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            intent_name: intent_name.into(),
            raw_utterance: String::new(),
            slots: SLOT_ORDER.iter().map(|slot| (*slot, None)).collect(),
        }
    }

    /// Set the raw utterance for this turn
    pub fn with_utterance(mut self, utterance: impl Into<String>) -> Self {
        self.raw_utterance = utterance.into();
        self
    }

    /// Builder-style slot setter
    pub fn with_slot(mut self, slot: SlotName, value: impl Into<String>) -> Self {
        self.set(slot, value);
        self
    }

    /// Get a slot value
    pub fn get(&self, slot: SlotName) -> Option<&str> {
        self.slots.get(&slot).and_then(|v| v.as_deref())
    }

    /// Whether a slot holds a value
    pub fn is_set(&self, slot: SlotName) -> bool {
        self.get(slot).is_some()
    }

    /// Set a slot. Blank values are stored as unset.
    pub fn set(&mut self, slot: SlotName, value: impl Into<String>) {
        let value = value.into();
        let value = if value.trim().is_empty() { None } else { Some(value) };
        self.slots.insert(slot, value);
    }

    /// Set or clear a slot from an optional value
    pub fn set_value(&mut self, slot: SlotName, value: SlotValue) {
        match value {
            Some(v) => self.set(slot, v),
            None => self.clear(slot),
        }
    }

    /// Clear one slot
    pub fn clear(&mut self, slot: SlotName) {
        self.slots.insert(slot, None);
    }

    /// Clear every slot, including `Confirmation`
    pub fn clear_all(&mut self) {
        for slot in SLOT_ORDER {
            self.clear(slot);
        }
    }

    /// Iterate every slot in fixed order
    pub fn slots(&self) -> impl Iterator<Item = (SlotName, Option<&str>)> + '_ {
        SLOT_ORDER.iter().map(move |slot| (*slot, self.get(*slot)))
    }

    /// Iterate data slots (no `Confirmation`) in fixed order
    pub fn data_slots(&self) -> impl Iterator<Item = (SlotName, Option<&str>)> + '_ {
        DATA_SLOTS.iter().map(move |slot| (*slot, self.get(*slot)))
    }
}

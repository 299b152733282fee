//! Core types for the service-request intake agent
//!
//! This crate provides the types shared by every other crate:
//! - Slot names and their fixed order
//! - The per-turn `Session`
//! - Dialog actions, messages and choice cards
//! - The persisted `ServiceRequestRecord`
//! - Error types

pub mod action;
pub mod error;
pub mod record;
pub mod session;
pub mod slots;

pub use action::{
    Choice, ChoiceCard, DialogAction, FulfillmentState, Message, TurnRequest, TurnResponse,
};
pub use error::{Error, Result};
pub use record::{ReferenceId, ServiceRequestRecord, REFERENCE_HEX_LEN, REFERENCE_PREFIX};
pub use session::{InvocationPhase, Session, SlotValue};
pub use slots::{SlotName, DATA_SLOTS, SLOT_ORDER};

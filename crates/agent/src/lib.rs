//! Conversational intake engine
//!
//! Features:
//! - Fixed-order slot elicitation with per-field validation
//! - Restart command recognised before any slot dispatch
//! - Summary + yes/no confirmation with correction and retry branches
//! - Single-write finalizer behind the `RecordStore` port

pub mod command;
pub mod confirmation;
// Dialogue State Tracking: slot order and validators
pub mod dst;
pub mod engine;
pub mod finalizer;
pub mod reset;

pub use command::{CommandParser, TurnCommand};
pub use confirmation::{AnswerParser, ConfirmationAnswer, ConfirmationWorkflow};
pub use dst::{
    next_missing, scan_slots, FieldRule, Outcome, Reprompt, SlotScan, ValidatorRegistry,
};
pub use engine::IntakeEngine;
pub use finalizer::Finalizer;
pub use reset::reset;

//! Error types shared across the intake crates

use thiserror::Error;

use crate::slots::SlotName;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Host event is missing expected structure
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Turn belongs to an intent this engine does not own
    #[error("Unknown intent: {0}")]
    UnknownIntent(String),

    /// A record was requested before every data slot was captured
    #[error("Slot {0} has no value")]
    MissingSlot(SlotName),

    /// Store write or read failed
    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Result alias using the core error
pub type Result<T> = std::result::Result<T, Error>;

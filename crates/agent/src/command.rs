//! Turn command parser
//!
//! Runs once per turn, before any slot dispatch, and recognises reserved
//! utterances that override the normal flow.

use intake_config::fold;

/// What the raw utterance asks the engine to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnCommand {
    /// Clear the form and start over
    Restart,
    /// No reserved command; continue with slot dispatch
    Continue,
}

/// Matches the folded utterance against the configured commands
#[derive(Debug, Clone)]
pub struct CommandParser {
    restart: String,
}

impl CommandParser {
    pub fn new(restart_command: &str) -> Self {
        Self {
            restart: fold(restart_command),
        }
    }

    /// Classify an utterance. Only an exact (folded) match restarts.
    pub fn parse(&self, utterance: &str) -> TurnCommand {
        if !self.restart.is_empty() && fold(utterance) == self.restart {
            TurnCommand::Restart
        } else {
            TurnCommand::Continue
        }
    }
}

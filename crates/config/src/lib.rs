//! Configuration management for the intake agent
//!
//! Supports loading configuration from:
//! - YAML/TOML files (`config/default`, `config/{env}`)
//! - Environment variables (`INTAKE_AGENT__` prefix, `__` separator)
//!
//! The message catalogue under `dialog.messages` holds every user-facing
//! text; business bounds live in [`constants`].

pub mod constants;
pub mod messages;
pub mod normalize;
pub mod settings;

pub use messages::{
    render, ClosingMessages, ConfirmationMessages, MessagesConfig, RejectionMessages,
    SlotPrompts,
};
pub use normalize::fold;
pub use settings::{
    load_settings, DialogConfig, ObservabilityConfig, PersistenceConfig, RuntimeEnvironment,
    ServerConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

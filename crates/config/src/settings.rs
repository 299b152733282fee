//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{dialog, persistence, server};
use crate::messages::MessagesConfig;
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Relaxed validation, in-memory store allowed
    #[default]
    Development,
    Staging,
    /// Persistence must be enabled
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Whether strict validation applies
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    /// HTTP host surface
    #[serde(default)]
    pub server: ServerConfig,

    /// Dialog behaviour and message catalogue
    #[serde(default)]
    pub dialog: DialogConfig,

    /// Record store
    #[serde(default)]
    pub persistence: PersistenceConfig,

    /// Logging and metrics
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (empty = localhost only)
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    server::DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    server::DEFAULT_PORT
}

fn default_timeout() -> u64 {
    server::DEFAULT_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            timeout_seconds: default_timeout(),
            cors_enabled: true,
            cors_origins: Vec::new(),
        }
    }
}

/// Dialog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogConfig {
    /// Intent handled by the engine; anything else gets the capability prompt
    #[serde(default = "default_intent_name")]
    pub intent_name: String,

    /// Reserved utterance that restarts the form from the first slot
    #[serde(default = "default_restart_command")]
    pub restart_command: String,

    /// Host locale the catalogue is written for
    #[serde(default = "default_locale")]
    pub locale: String,

    #[serde(default)]
    pub messages: MessagesConfig,
}

fn default_intent_name() -> String {
    dialog::INTENT_NAME.to_string()
}

fn default_restart_command() -> String {
    dialog::RESTART_COMMAND.to_string()
}

fn default_locale() -> String {
    dialog::LOCALE.to_string()
}

impl Default for DialogConfig {
    fn default() -> Self {
        Self {
            intent_name: default_intent_name(),
            restart_command: default_restart_command(),
            locale: default_locale(),
            messages: MessagesConfig::default(),
        }
    }
}

/// Persistence configuration for ScyllaDB
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistenceConfig {
    /// Enable ScyllaDB persistence (false = in-memory only)
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_scylla_hosts")]
    pub scylla_hosts: Vec<String>,

    #[serde(default = "default_scylla_keyspace")]
    pub keyspace: String,

    #[serde(default = "default_replication_factor")]
    pub replication_factor: u8,
}

fn default_scylla_hosts() -> Vec<String> {
    std::env::var("SCYLLA_HOSTS")
        .map(|s| s.split(',').map(|h| h.trim().to_string()).collect())
        .unwrap_or_else(|_| vec![persistence::DEFAULT_HOST.to_string()])
}

fn default_scylla_keyspace() -> String {
    std::env::var("SCYLLA_KEYSPACE").unwrap_or_else(|_| persistence::DEFAULT_KEYSPACE.to_string())
}

fn default_replication_factor() -> u8 {
    1
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            scylla_hosts: default_scylla_hosts(),
            keyspace: default_scylla_keyspace(),
            replication_factor: default_replication_factor(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit JSON log lines
    #[serde(default)]
    pub log_json: bool,

    /// Install the Prometheus recorder and expose `/metrics`
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_dialog()?;
        self.validate_persistence()?;
        self.validate_observability()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port must be non-zero".to_string(),
            });
        }

        if self.server.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.timeout_seconds".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if self.environment.is_production() && !self.server.cors_enabled {
            return Err(ConfigError::InvalidValue {
                field: "server.cors_enabled".to_string(),
                message: "CORS must be enabled in production".to_string(),
            });
        }

        Ok(())
    }

    fn validate_dialog(&self) -> Result<(), ConfigError> {
        if self.dialog.intent_name.trim().is_empty() {
            return Err(ConfigError::MissingField("dialog.intent_name".to_string()));
        }

        if self.dialog.restart_command.trim().is_empty() {
            return Err(ConfigError::MissingField("dialog.restart_command".to_string()));
        }

        self.dialog.messages.validate()
    }

    fn validate_persistence(&self) -> Result<(), ConfigError> {
        if self.environment.is_production() && !self.persistence.enabled {
            return Err(ConfigError::InvalidValue {
                field: "persistence.enabled".to_string(),
                message: "Production requires a durable record store".to_string(),
            });
        }

        if !self.persistence.enabled && self.environment.is_strict() {
            tracing::warn!(
                environment = ?self.environment,
                "Persistence disabled, confirmed requests are kept in memory only"
            );
        }

        if self.persistence.enabled {
            if self.persistence.scylla_hosts.is_empty() {
                return Err(ConfigError::MissingField(
                    "persistence.scylla_hosts".to_string(),
                ));
            }

            let keyspace_ok = !self.persistence.keyspace.is_empty()
                && self
                    .persistence
                    .keyspace
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_');
            if !keyspace_ok {
                return Err(ConfigError::InvalidValue {
                    field: "persistence.keyspace".to_string(),
                    message: format!(
                        "Must be non-empty and alphanumeric/underscore, got '{}'",
                        self.persistence.keyspace
                    ),
                });
            }

            if self.persistence.replication_factor == 0 {
                return Err(ConfigError::InvalidValue {
                    field: "persistence.replication_factor".to_string(),
                    message: "Must be at least 1".to_string(),
                });
            }
        }

        Ok(())
    }

    fn validate_observability(&self) -> Result<(), ConfigError> {
        let level = self.observability.log_level.to_lowercase();
        if !matches!(
            level.as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            return Err(ConfigError::InvalidValue {
                field: "observability.log_level".to_string(),
                message: format!("Unknown log level '{}'", self.observability.log_level),
            });
        }
        Ok(())
    }
}

/// Load settings from files and environment
///
/// Priority: `INTAKE_AGENT__*` env vars > `config/{env}` > `config/default` > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name("config/default").required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("config/{}", env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("INTAKE_AGENT")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.dialog.intent_name, "SolicitudServicio");
        assert_eq!(settings.dialog.restart_command, "registrar otra");
        assert!(!settings.persistence.enabled);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_production_requires_persistence() {
        let mut settings = Settings::default();
        settings.environment = RuntimeEnvironment::Production;
        assert!(settings.validate().is_err());

        settings.persistence.enabled = true;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_keyspace_validation() {
        let mut settings = Settings::default();
        settings.persistence.enabled = true;
        settings.persistence.keyspace = "bad-keyspace".to_string();
        assert!(settings.validate_persistence().is_err());

        settings.persistence.keyspace = "intake_agent".to_string();
        assert!(settings.validate_persistence().is_ok());
    }

    #[test]
    fn test_blank_restart_command_rejected() {
        let mut settings = Settings::default();
        settings.dialog.restart_command = "  ".to_string();
        assert!(matches!(
            settings.validate_dialog(),
            Err(ConfigError::MissingField(_))
        ));
    }

    #[test]
    fn test_log_level_validation() {
        let mut settings = Settings::default();
        settings.observability.log_level = "loud".to_string();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_settings_from_yaml() {
        let yaml = r#"
environment: staging
server:
  port: 9090
dialog:
  restart_command: "empezar de nuevo"
  messages:
    closing:
      fallback: "¿Qué necesitas?"
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.environment, RuntimeEnvironment::Staging);
        assert_eq!(settings.server.port, 9090);
        assert_eq!(settings.dialog.restart_command, "empezar de nuevo");
        assert_eq!(settings.dialog.intent_name, "SolicitudServicio");
        assert_eq!(settings.dialog.messages.closing.fallback, "¿Qué necesitas?");
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_custom_confirmation_values() {
        let yaml = r#"
dialog:
  messages:
    confirmation:
      yes_value: "confirmar"
      no_value: "corregir"
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert!(settings.validate().is_ok());

        let yaml = r#"
dialog:
  messages:
    confirmation:
      yes_value: "n"
"#;
        let settings: Settings = serde_yaml::from_str(yaml).unwrap();
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}

//! Cluster session for the record store
//!
//! One `ScyllaClient` is built at startup and shared by every store in the
//! layer. The keyspace name is interpolated into CQL, so it is checked
//! before any statement is sent.

use crate::error::PersistenceError;
use crate::schema;
use scylla::{Session, SessionBuilder};
use std::sync::Arc;

/// Where confirmed requests are written
#[derive(Debug, Clone)]
pub struct ScyllaConfig {
    pub hosts: Vec<String>,
    pub keyspace: String,
    pub replication_factor: u8,
}

impl ScyllaConfig {
    /// Reject settings that would fail later with a less useful CQL error
    pub fn validate(&self) -> Result<(), PersistenceError> {
        if self.hosts.iter().all(|h| h.trim().is_empty()) {
            return Err(PersistenceError::Connection(
                "no ScyllaDB hosts configured".to_string(),
            ));
        }

        let valid_keyspace = !self.keyspace.is_empty()
            && self
                .keyspace
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_keyspace {
            return Err(PersistenceError::SchemaError(format!(
                "invalid keyspace name '{}'",
                self.keyspace
            )));
        }

        if self.replication_factor == 0 {
            return Err(PersistenceError::SchemaError(
                "replication factor must be at least 1".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Clone)]
pub struct ScyllaClient {
    session: Arc<Session>,
    config: ScyllaConfig,
}

impl ScyllaClient {
    pub async fn connect(config: ScyllaConfig) -> Result<Self, PersistenceError> {
        config.validate()?;

        tracing::info!(
            hosts = ?config.hosts,
            keyspace = %config.keyspace,
            "Connecting record store to ScyllaDB"
        );

        let session = SessionBuilder::new()
            .known_nodes(&config.hosts)
            .build()
            .await?;

        Ok(Self {
            session: Arc::new(session),
            config,
        })
    }

    /// Create the keyspace and the `service_requests` table if missing
    pub async fn ensure_schema(&self) -> Result<(), PersistenceError> {
        schema::create_keyspace(
            &self.session,
            &self.config.keyspace,
            self.config.replication_factor,
        )
        .await?;
        schema::create_tables(&self.session, &self.config.keyspace).await?;
        tracing::info!(
            table = %self.requests_table(),
            "Service request schema ready"
        );
        Ok(())
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Keyspace-qualified name of the request table
    pub fn requests_table(&self) -> String {
        schema::qualified(&self.config.keyspace, schema::REQUESTS_TABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ScyllaConfig {
        ScyllaConfig {
            hosts: vec!["127.0.0.1:9042".to_string()],
            keyspace: "intake_agent".to_string(),
            replication_factor: 1,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_rejects_missing_hosts() {
        let mut config = config();
        config.hosts = vec![" ".to_string()];
        assert!(matches!(
            config.validate(),
            Err(PersistenceError::Connection(_))
        ));
    }

    #[test]
    fn test_rejects_keyspace_that_would_break_cql() {
        for keyspace in ["", "intake-agent", "intake; DROP KEYSPACE x"] {
            let mut config = config();
            config.keyspace = keyspace.to_string();
            assert!(config.validate().is_err(), "accepted '{keyspace}'");
        }
    }

    #[test]
    fn test_rejects_zero_replication() {
        let mut config = config();
        config.replication_factor = 0;
        assert!(config.validate().is_err());
    }
}

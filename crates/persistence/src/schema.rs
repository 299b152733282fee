//! ScyllaDB schema creation

use crate::error::PersistenceError;
use scylla::Session;

/// Table holding one row per confirmed request
pub const REQUESTS_TABLE: &str = "service_requests";

/// `keyspace.table`
pub fn qualified(keyspace: &str, table: &str) -> String {
    format!("{}.{}", keyspace, table)
}

/// Create the keyspace if it doesn't exist
pub async fn create_keyspace(
    session: &Session,
    keyspace: &str,
    replication_factor: u8,
) -> Result<(), PersistenceError> {
    let query = format!(
        "CREATE KEYSPACE IF NOT EXISTS {} WITH replication = {{'class': 'SimpleStrategy', 'replication_factor': {}}}",
        keyspace, replication_factor
    );

    session
        .query_unpaged(query, &[])
        .await
        .map_err(|e| PersistenceError::SchemaError(format!("Failed to create keyspace: {}", e)))?;

    Ok(())
}

/// Create all required tables
pub async fn create_tables(session: &Session, keyspace: &str) -> Result<(), PersistenceError> {
    // One row per confirmed request: partition `Contract#<id>`, clustering `APPT#<id>`
    let requests_table = format!(
        r#"
        CREATE TABLE IF NOT EXISTS {} (
            partition_key TEXT,
            sort_key TEXT,
            reference_id TEXT,
            session_id TEXT,
            contact_name TEXT,
            phone_number TEXT,
            child_name TEXT,
            child_age TEXT,
            school_level TEXT,
            days_per_week TEXT,
            hours_per_day TEXT,
            shift TEXT,
            created_at TIMESTAMP,
            PRIMARY KEY ((partition_key), sort_key)
        )
    "#,
        qualified(keyspace, REQUESTS_TABLE)
    );

    session.query_unpaged(requests_table, &[]).await.map_err(|e| {
        PersistenceError::SchemaError(format!("Failed to create service_requests table: {}", e))
    })?;

    Ok(())
}

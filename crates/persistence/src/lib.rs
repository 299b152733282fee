//! Persistence layer for the intake agent
//!
//! Provides storage for confirmed service requests:
//! - `ScyllaRecordStore` for production (ScyllaDB, insert-if-not-exists)
//! - `InMemoryRecordStore` for development and tests

pub mod client;
pub mod error;
pub mod requests;
pub mod schema;

pub use client::{ScyllaClient, ScyllaConfig};
pub use error::PersistenceError;
pub use requests::{InMemoryRecordStore, RecordStore, ScyllaRecordStore};

/// Connect to ScyllaDB and make sure the schema exists
pub async fn init(config: ScyllaConfig) -> Result<PersistenceLayer, PersistenceError> {
    let client = ScyllaClient::connect(config).await?;
    client.ensure_schema().await?;

    Ok(PersistenceLayer {
        requests: ScyllaRecordStore::new(client),
    })
}

/// Combined persistence layer
pub struct PersistenceLayer {
    pub requests: ScyllaRecordStore,
}

//! Service-request record store
//!
//! The dialog engine only ever calls `put` once per confirmed request.
//! `get` exists for operational lookups and tests.

use crate::{PersistenceError, ScyllaClient};
use async_trait::async_trait;
use chrono::DateTime;
use intake_core::{ReferenceId, ServiceRequestRecord};
use parking_lot::RwLock;
use scylla::frame::response::result::CqlValue;
use scylla::frame::value::CqlTimestamp;
use std::collections::HashMap;

/// Record store trait
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a new record. Fails with `Duplicate` if the reference id exists.
    async fn put(&self, record: &ServiceRequestRecord) -> Result<(), PersistenceError>;

    /// Look a record up by reference id
    async fn get(
        &self,
        reference_id: &ReferenceId,
    ) -> Result<Option<ServiceRequestRecord>, PersistenceError>;
}

/// ScyllaDB implementation
pub struct ScyllaRecordStore {
    client: ScyllaClient,
}

impl ScyllaRecordStore {
    pub fn new(client: ScyllaClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RecordStore for ScyllaRecordStore {
    async fn put(&self, record: &ServiceRequestRecord) -> Result<(), PersistenceError> {
        let query = format!(
            "INSERT INTO {} (
                partition_key, sort_key, reference_id, session_id,
                contact_name, phone_number, child_name, child_age,
                school_level, days_per_week, hours_per_day, shift, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?) IF NOT EXISTS",
            self.client.requests_table()
        );

        let result = self
            .client
            .session()
            .query_unpaged(
                query,
                (
                    record.partition_key(),
                    record.sort_key(),
                    record.reference_id().as_str(),
                    record.session_id(),
                    record.contact_name(),
                    record.phone_number(),
                    record.child_name(),
                    record.child_age(),
                    record.school_level(),
                    record.days_per_week(),
                    record.hours_per_day(),
                    record.shift(),
                    CqlTimestamp(record.created_at().timestamp_millis()),
                ),
            )
            .await?;

        // Lightweight transactions report `[applied]` in the first column
        let applied = result
            .rows
            .as_ref()
            .and_then(|rows| rows.first())
            .and_then(|row| row.columns.first())
            .map(|col| matches!(col, Some(CqlValue::Boolean(true))))
            .unwrap_or(true);

        if !applied {
            return Err(PersistenceError::Duplicate(
                record.reference_id().to_string(),
            ));
        }

        tracing::info!(
            reference_id = %record.reference_id(),
            session_id = %record.session_id(),
            "Service request stored"
        );

        Ok(())
    }

    async fn get(
        &self,
        reference_id: &ReferenceId,
    ) -> Result<Option<ServiceRequestRecord>, PersistenceError> {
        let query = format!(
            "SELECT reference_id, session_id, contact_name, phone_number, child_name,
                    child_age, school_level, days_per_week, hours_per_day, shift, created_at
             FROM {} WHERE partition_key = ?",
            self.client.requests_table()
        );

        let result = self
            .client
            .session()
            .query_unpaged(query, (format!("Contract#{}", reference_id),))
            .await?;

        let row = match result.rows.and_then(|rows| rows.into_iter().next()) {
            Some(row) => row,
            None => return Ok(None),
        };

        let (
            reference_id,
            session_id,
            contact_name,
            phone_number,
            child_name,
            child_age,
            school_level,
            days_per_week,
            hours_per_day,
            shift,
            created_at,
        ): (
            String,
            String,
            String,
            String,
            String,
            String,
            String,
            String,
            String,
            String,
            CqlTimestamp,
        ) = row
            .into_typed()
            .map_err(|e| PersistenceError::InvalidData(e.to_string()))?;

        let created_at = DateTime::from_timestamp_millis(created_at.0).ok_or_else(|| {
            PersistenceError::InvalidData(format!("Bad timestamp for {}", reference_id))
        })?;

        Ok(Some(ServiceRequestRecord::from_stored(
            ReferenceId::from_string(reference_id),
            session_id,
            [
                contact_name,
                phone_number,
                child_name,
                child_age,
                school_level,
                days_per_week,
                hours_per_day,
                shift,
            ],
            created_at,
        )))
    }
}

/// In-memory implementation for development and tests
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<ReferenceId, ServiceRequestRecord>>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Snapshot of every stored record, oldest first
    pub fn records(&self) -> Vec<ServiceRequestRecord> {
        let mut records: Vec<_> = self.records.read().values().cloned().collect();
        records.sort_by_key(|r| r.created_at());
        records
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn put(&self, record: &ServiceRequestRecord) -> Result<(), PersistenceError> {
        let mut records = self.records.write();
        if records.contains_key(record.reference_id()) {
            return Err(PersistenceError::Duplicate(
                record.reference_id().to_string(),
            ));
        }
        records.insert(record.reference_id().clone(), record.clone());
        tracing::debug!(reference_id = %record.reference_id(), "Service request stored in memory");
        Ok(())
    }

    async fn get(
        &self,
        reference_id: &ReferenceId,
    ) -> Result<Option<ServiceRequestRecord>, PersistenceError> {
        Ok(self.records.read().get(reference_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use intake_core::{Session, SlotName};

    fn record() -> ServiceRequestRecord {
        let session = Session::new("session-7", "SolicitudServicio")
            .with_slot(SlotName::ContactName, "Marta")
            .with_slot(SlotName::PhoneNumber, "3109876543")
            .with_slot(SlotName::ChildName, "Sofía")
            .with_slot(SlotName::ChildAge, "4")
            .with_slot(SlotName::SchoolLevel, "Preescolar")
            .with_slot(SlotName::DaysPerWeek, "5")
            .with_slot(SlotName::HoursPerDay, "4")
            .with_slot(SlotName::Shift, "Mañana");
        ServiceRequestRecord::from_session(&session).unwrap()
    }

    #[tokio::test]
    async fn test_in_memory_put_and_get() {
        let store = InMemoryRecordStore::new();
        let record = record();

        store.put(&record).await.unwrap();
        assert_eq!(store.len(), 1);

        let found = store.get(record.reference_id()).await.unwrap();
        assert_eq!(found, Some(record));
    }

    #[tokio::test]
    async fn test_in_memory_rejects_duplicate_reference() {
        let store = InMemoryRecordStore::new();
        let record = record();

        store.put(&record).await.unwrap();
        let err = store.put(&record).await.unwrap_err();
        assert!(matches!(err, PersistenceError::Duplicate(_)));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_in_memory_get_missing() {
        let store = InMemoryRecordStore::new();
        let missing = ReferenceId::from_string("A-00000000");
        assert!(store.get(&missing).await.unwrap().is_none());
        assert!(store.is_empty());
    }
}

//! Persisted service-request record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::session::Session;
use crate::slots::SlotName;

/// Prefix of every reference id
pub const REFERENCE_PREFIX: &str = "A-";

/// Number of hex digits after the prefix
pub const REFERENCE_HEX_LEN: usize = 8;

/// Public reference handed to the user, e.g. `A-3F9C01B2`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceId(String);

impl ReferenceId {
    /// Generate a fresh id from a v4 UUID
    pub fn generate() -> Self {
        let hex = Uuid::new_v4().simple().to_string().to_uppercase();
        Self(format!("{}{}", REFERENCE_PREFIX, &hex[..REFERENCE_HEX_LEN]))
    }

    /// Wrap an existing id (e.g. read back from storage)
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A confirmed service request.
///
/// Fields are private; a record is built once from a complete session and
/// only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRequestRecord {
    reference_id: ReferenceId,
    session_id: String,
    contact_name: String,
    phone_number: String,
    child_name: String,
    child_age: String,
    school_level: String,
    days_per_week: String,
    hours_per_day: String,
    shift: String,
    created_at: DateTime<Utc>,
}

impl ServiceRequestRecord {
    /// Build a record with a freshly generated reference id.
    ///
    /// Fails with `MissingSlot` on the first data slot without a value.
    pub fn from_session(session: &Session) -> Result<Self> {
        Self::with_reference(ReferenceId::generate(), session, Utc::now())
    }

    /// Build a record with an explicit id and timestamp
    pub fn with_reference(
        reference_id: ReferenceId,
        session: &Session,
        created_at: DateTime<Utc>,
    ) -> Result<Self> {
        let take = |slot: SlotName| -> Result<String> {
            session
                .get(slot)
                .map(|v| v.trim().to_string())
                .ok_or(Error::MissingSlot(slot))
        };

        Ok(Self {
            reference_id,
            session_id: session.session_id.clone(),
            contact_name: take(SlotName::ContactName)?,
            phone_number: take(SlotName::PhoneNumber)?,
            child_name: take(SlotName::ChildName)?,
            child_age: take(SlotName::ChildAge)?,
            school_level: take(SlotName::SchoolLevel)?,
            days_per_week: take(SlotName::DaysPerWeek)?,
            hours_per_day: take(SlotName::HoursPerDay)?,
            shift: take(SlotName::Shift)?,
            created_at,
        })
    }

    /// Rebuild a record read back from storage.
    ///
    /// `values` holds the eight data slot values in `DATA_SLOTS` order.
    pub fn from_stored(
        reference_id: ReferenceId,
        session_id: String,
        values: [String; 8],
        created_at: DateTime<Utc>,
    ) -> Self {
        let [contact_name, phone_number, child_name, child_age, school_level, days_per_week, hours_per_day, shift] =
            values;
        Self {
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
        }
    }

    pub fn reference_id(&self) -> &ReferenceId {
        &self.reference_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn contact_name(&self) -> &str {
        &self.contact_name
    }

    pub fn phone_number(&self) -> &str {
        &self.phone_number
    }

    pub fn child_name(&self) -> &str {
        &self.child_name
    }

    pub fn child_age(&self) -> &str {
        &self.child_age
    }

    pub fn school_level(&self) -> &str {
        &self.school_level
    }

    pub fn days_per_week(&self) -> &str {
        &self.days_per_week
    }

    pub fn hours_per_day(&self) -> &str {
        &self.hours_per_day
    }

    pub fn shift(&self) -> &str {
        &self.shift
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Value of a data slot as stored in the record
    pub fn value(&self, slot: SlotName) -> Option<&str> {
        match slot {
            SlotName::ContactName => Some(&self.contact_name),
            SlotName::PhoneNumber => Some(&self.phone_number),
            SlotName::ChildName => Some(&self.child_name),
            SlotName::ChildAge => Some(&self.child_age),
            SlotName::SchoolLevel => Some(&self.school_level),
            SlotName::DaysPerWeek => Some(&self.days_per_week),
            SlotName::HoursPerDay => Some(&self.hours_per_day),
            SlotName::Shift => Some(&self.shift),
            SlotName::Confirmation => None,
        }
    }

    /// Partition key used by the store
    pub fn partition_key(&self) -> String {
        format!("Contract#{}", self.reference_id)
    }

    /// Sort key used by the store
    pub fn sort_key(&self) -> String {
        format!("APPT#{}", self.reference_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slots::DATA_SLOTS;

    fn complete_session() -> Session {
        Session::new("session-1", "SolicitudServicio")
            .with_slot(SlotName::ContactName, "Laura")
            .with_slot(SlotName::PhoneNumber, "3001234567")
            .with_slot(SlotName::ChildName, "Tomás")
            .with_slot(SlotName::ChildAge, "6")
            .with_slot(SlotName::SchoolLevel, "Primaria")
            .with_slot(SlotName::DaysPerWeek, "3")
            .with_slot(SlotName::HoursPerDay, "2")
            .with_slot(SlotName::Shift, "Tarde")
    }

    #[test]
    fn test_reference_id_format() {
        let id = ReferenceId::generate();
        let s = id.as_str();
        assert!(s.starts_with(REFERENCE_PREFIX));
        let hex = &s[REFERENCE_PREFIX.len()..];
        assert_eq!(hex.len(), REFERENCE_HEX_LEN);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[test]
    fn test_reference_ids_are_fresh() {
        assert_ne!(ReferenceId::generate(), ReferenceId::generate());
    }

    #[test]
    fn test_record_from_complete_session() {
        let record = ServiceRequestRecord::from_session(&complete_session()).unwrap();
        assert_eq!(record.contact_name(), "Laura");
        assert_eq!(record.shift(), "Tarde");
        assert_eq!(record.session_id(), "session-1");
        for slot in DATA_SLOTS {
            assert!(record.value(slot).is_some());
        }
        assert!(record.partition_key().starts_with("Contract#A-"));
        assert!(record.sort_key().starts_with("APPT#A-"));
    }

    #[test]
    fn test_record_requires_every_data_slot() {
        let mut session = complete_session();
        session.clear(SlotName::HoursPerDay);
        assert_eq!(
            ServiceRequestRecord::from_session(&session),
            Err(Error::MissingSlot(SlotName::HoursPerDay))
        );
    }
}

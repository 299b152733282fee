//! Slot names for the service-request form
//!
//! The form has eight data slots plus a terminal `Confirmation` marker.
//! Their order is fixed: the variant order below is the elicitation order,
//! and `Ord` is derived from it so ordered maps iterate in the same order.

use serde::{Deserialize, Serialize};

/// One named field of the intake form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotName {
    /// Name of the adult requesting the service
    ContactName,
    /// Contact mobile number (10 digits)
    PhoneNumber,
    /// Name of the child who will receive the service
    ChildName,
    /// Child age in years
    ChildAge,
    /// Preescolar / Primaria
    SchoolLevel,
    /// Days per week requested
    DaysPerWeek,
    /// Hours per day requested
    HoursPerDay,
    /// Mañana / Tarde
    Shift,
    /// Terminal marker holding the user's yes/no answer
    Confirmation,
}

/// Full slot order, terminal marker last
pub const SLOT_ORDER: [SlotName; 9] = [
    SlotName::ContactName,
    SlotName::PhoneNumber,
    SlotName::ChildName,
    SlotName::ChildAge,
    SlotName::SchoolLevel,
    SlotName::DaysPerWeek,
    SlotName::HoursPerDay,
    SlotName::Shift,
    SlotName::Confirmation,
];

/// Data slots only (everything before `Confirmation`)
pub const DATA_SLOTS: [SlotName; 8] = [
    SlotName::ContactName,
    SlotName::PhoneNumber,
    SlotName::ChildName,
    SlotName::ChildAge,
    SlotName::SchoolLevel,
    SlotName::DaysPerWeek,
    SlotName::HoursPerDay,
    SlotName::Shift,
];

impl SlotName {
    /// Slot name as the conversational host knows it
    pub fn wire_name(&self) -> &'static str {
        match self {
            SlotName::ContactName => "NombreContacto",
            SlotName::PhoneNumber => "NumCelular",
            SlotName::ChildName => "NombreHijo",
            SlotName::ChildAge => "Edad",
            SlotName::SchoolLevel => "Escolaridad",
            SlotName::DaysPerWeek => "DiasSolicitados",
            SlotName::HoursPerDay => "HorasDiariasSolicitadas",
            SlotName::Shift => "JornadaSolicitada",
            SlotName::Confirmation => "Confirmacion",
        }
    }

    /// Parse a host slot name. Unknown names return `None`.
    pub fn from_wire(name: &str) -> Option<Self> {
        SLOT_ORDER.iter().copied().find(|slot| slot.wire_name() == name)
    }

    /// Label used when the captured values are summarised back to the user
    pub fn label(&self) -> &'static str {
        match self {
            SlotName::ContactName => "Nombre de contacto",
            SlotName::PhoneNumber => "Número de celular",
            SlotName::ChildName => "Nombre de tu hijo(a)",
            SlotName::ChildAge => "Edad",
            SlotName::SchoolLevel => "Escolaridad",
            SlotName::DaysPerWeek => "Días por semana",
            SlotName::HoursPerDay => "Horas por día",
            SlotName::Shift => "Jornada",
            SlotName::Confirmation => "Confirmación",
        }
    }

    /// Whether this is the terminal confirmation marker
    pub fn is_terminal(&self) -> bool {
        matches!(self, SlotName::Confirmation)
    }

    /// Position in the fixed order
    pub fn position(&self) -> usize {
        *self as usize
    }
}

impl std::fmt::Display for SlotName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

/// Identity of a calendar event. The variants partition the id space so a
/// derived occurrence or a locally synthesized entry can never collide with
/// a persisted record, and analyses never collide with health records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EventId {
    /// Persisted health record.
    Record(i64),
    /// Persisted lab analysis.
    Analysis(i64),
    /// Occurrence derived from a repeat rule: the seed record plus the
    /// zero-based step index.
    Occurrence { record: i64, index: u32 },
    /// Optimistic local entry awaiting remote confirmation.
    Pending(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Symptom,
    Medication,
    Analysis,
}

/// Typed replacement for the wire's free-text notes column: the quantity is
/// parsed out of it once, at projection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MedicationDetails {
    pub dosage: Option<f64>,
    pub quantity: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "category", rename_all = "camelCase")]
pub enum EventDetails {
    #[serde(rename_all = "camelCase")]
    Symptom {
        symptom_id: i64,
        severity: Option<i16>,
    },
    #[serde(rename_all = "camelCase")]
    Medication {
        medication_id: i64,
        details: MedicationDetails,
    },
    #[serde(rename_all = "camelCase")]
    Analysis { file_path: String },
}

/// Calendar-displayable derivation of a record. Ephemeral: recomputed on
/// every read, never written back to any store.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEvent {
    pub id: EventId,
    pub title: String,
    pub start: NaiveDateTime,
    pub all_day: bool,
    #[serde(flatten)]
    pub details: EventDetails,
    pub is_future: bool,
}

impl CalendarEvent {
    pub fn category(&self) -> EventCategory {
        match self.details {
            EventDetails::Symptom { .. } => EventCategory::Symptom,
            EventDetails::Medication { .. } => EventCategory::Medication,
            EventDetails::Analysis { .. } => EventCategory::Analysis,
        }
    }

    /// Still awaiting remote confirmation.
    pub fn is_pending(&self) -> bool {
        matches!(self.id, EventId::Pending(_))
    }

    pub fn symptom_id(&self) -> Option<i64> {
        match self.details {
            EventDetails::Symptom { symptom_id, .. } => Some(symptom_id),
            _ => None,
        }
    }

    pub fn medication_id(&self) -> Option<i64> {
        match self.details {
            EventDetails::Medication { medication_id, .. } => Some(medication_id),
            _ => None,
        }
    }
}

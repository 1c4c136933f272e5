use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize, Serializer};
use validator::Validate;

/// Reference entity joined into a record by the backend (`{ "name": ... }`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

/// One logged symptom or medication occurrence, exactly as the backend
/// returns it. `record_date` carries local civil time and is never converted
/// across timezones. Exactly one of `symptom_id`/`medication_id` is set on a
/// well-formed record; the projector rejects everything else.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    pub id: i64,
    pub record_date: NaiveDateTime,
    #[serde(default)]
    pub weight: Option<i16>,
    #[serde(default)]
    pub dosage: Option<f64>,
    /// The wire overloads this with the medication quantity as a string.
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub symptom_id: Option<i64>,
    #[serde(default)]
    pub medication_id: Option<i64>,
    #[serde(default)]
    pub symptom: Option<NamedRef>,
    #[serde(default)]
    pub medication: Option<NamedRef>,
    #[serde(default)]
    pub is_future: bool,
    #[serde(default)]
    pub repeat_type: Option<RepeatType>,
    #[serde(default)]
    pub repeat_interval: Option<i64>,
    #[serde(default)]
    pub repeat_end_date: Option<NaiveDate>,
}

impl HealthRecord {
    /// A scheduled future medication with a repeat rule attached.
    pub fn is_recurring(&self) -> bool {
        self.is_future && !matches!(self.repeat_type, None | Some(RepeatType::None))
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RepeatType {
    None,
    Daily,
    Weekly,
    #[serde(rename = "everyXdays")]
    EveryXDays,
}

impl RepeatType {
    /// Resolve the repeat step in days. Daily and weekly have implicit
    /// intervals; `everyXdays` requires the explicit one.
    pub fn interval_days(self, explicit: Option<i64>) -> Option<i64> {
        match self {
            RepeatType::None => None,
            RepeatType::Daily => Some(1),
            RepeatType::Weekly => Some(7),
            RepeatType::EveryXDays => explicit,
        }
    }
}

/// POST /healthRecords/symptoms
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewSymptomRecord {
    pub record_date: NaiveDateTime,

    #[validate(range(min = 1, max = 5, message = "Severity must be 1-5"))]
    pub weight: i16,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    pub user_id: String,
    pub symptom_id: i64,
}

/// POST /healthRecords/medications. Recurrence fields ride along when the
/// dose is scheduled for the future.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewMedicationRecord {
    pub record_date: NaiveDateTime,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<f64>,

    /// Tablet count. The backend stores it in the free-text notes column,
    /// so it goes over the wire as a string.
    #[serde(
        rename = "notes",
        skip_serializing_if = "Option::is_none",
        serialize_with = "quantity_as_notes"
    )]
    pub quantity: Option<u32>,

    pub user_id: String,
    pub medication_id: i64,

    pub is_future: bool,
    pub repeat_type: RepeatType,

    #[validate(range(min = 1, message = "Repeat interval must be positive"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_interval: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub repeat_end_date: Option<NaiveDate>,
}

/// PUT /healthRecords/{id}. Partial update, unset fields untouched.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRecord {
    pub id: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_date: Option<NaiveDateTime>,

    #[validate(range(min = 1, max = 5, message = "Severity must be 1-5"))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<i16>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dosage: Option<f64>,

    #[serde(
        rename = "notes",
        skip_serializing_if = "Option::is_none",
        serialize_with = "quantity_as_notes"
    )]
    pub quantity: Option<u32>,

    pub user_id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub symptom_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub medication_id: Option<i64>,
}

fn quantity_as_notes<S>(quantity: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match quantity {
        Some(q) => serializer.serialize_str(&q.to_string()),
        None => serializer.serialize_none(),
    }
}

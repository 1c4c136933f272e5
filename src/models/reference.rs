use serde::{Deserialize, Serialize};
use validator::Validate;

/// Symptom reference entity. Predefined entries are shared; custom ones
/// belong to the user who created them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Symptom {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub is_custom: bool,
}

/// Medication reference entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub is_custom: bool,
}

/// POST /symptom and POST /medication share this body.
#[derive(Debug, Clone, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewReferenceEntity {
    #[validate(length(min = 1, max = 100, message = "Name must be 1-100 characters"))]
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    pub is_custom: bool,
    pub user_id: String,
}

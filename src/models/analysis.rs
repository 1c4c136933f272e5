use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A lab analysis: a file-backed record. Always an all-day calendar entry,
/// never recurs, carries no severity or dosage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub id: i64,
    pub title: String,
    pub file_path: String,
    pub record_date: NaiveDate,
    pub user_id: String,
}

/// POST /analysis/upload (multipart, so this never passes through serde).
#[derive(Debug, Clone, Validate)]
pub struct UploadAnalysis {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    pub record_date: NaiveDate,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

pub mod http;

use chrono::NaiveDate;

use crate::error::EngineResult;
use crate::models::analysis::{Analysis, UploadAnalysis};
use crate::models::kp::KpIndexEntry;
use crate::models::record::{HealthRecord, NewMedicationRecord, NewSymptomRecord, UpdateRecord};
use crate::models::reference::{Medication, NewReferenceEntity, Symptom};

/// The remote backend operations the engine consumes. `http::HttpApi` talks
/// to the real REST backend; tests substitute an in-memory fake.
#[allow(async_fn_in_trait)]
pub trait HealthApi {
    async fn fetch_records(&self, user_id: &str) -> EngineResult<Vec<HealthRecord>>;
    async fn fetch_symptoms(&self, user_id: &str) -> EngineResult<Vec<Symptom>>;
    async fn fetch_medications(&self, user_id: &str) -> EngineResult<Vec<Medication>>;

    async fn create_symptom_record(&self, record: &NewSymptomRecord) -> EngineResult<HealthRecord>;
    async fn create_medication_record(
        &self,
        record: &NewMedicationRecord,
    ) -> EngineResult<HealthRecord>;
    async fn update_record(&self, record: &UpdateRecord) -> EngineResult<HealthRecord>;
    async fn delete_record(&self, id: i64) -> EngineResult<()>;

    async fn create_symptom(&self, entity: &NewReferenceEntity) -> EngineResult<Symptom>;
    async fn create_medication(&self, entity: &NewReferenceEntity) -> EngineResult<Medication>;

    async fn fetch_kp_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> EngineResult<Vec<KpIndexEntry>>;
    async fn fetch_kp_forecast(&self) -> EngineResult<Vec<KpIndexEntry>>;

    async fn fetch_analyses(&self, user_id: &str) -> EngineResult<Vec<Analysis>>;
    async fn upload_analysis(&self, upload: &UploadAnalysis) -> EngineResult<Analysis>;
    async fn delete_analysis(&self, id: i64) -> EngineResult<()>;
    async fn download_analysis(&self, id: i64) -> EngineResult<Vec<u8>>;
}

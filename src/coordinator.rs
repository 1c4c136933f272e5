use std::sync::{Arc, RwLock, RwLockWriteGuard};

use anyhow::anyhow;
use chrono::{Duration, NaiveDate};
use uuid::Uuid;
use validator::Validate;

use crate::api::HealthApi;
use crate::error::{EngineError, EngineResult};
use crate::models::analysis::{Analysis, UploadAnalysis};
use crate::models::event::{CalendarEvent, EventDetails, EventId, MedicationDetails};
use crate::models::kp;
use crate::models::record::{HealthRecord, NewMedicationRecord, NewSymptomRecord, UpdateRecord};
use crate::models::reference::{Medication, NewReferenceEntity, Symptom};
use crate::projector;
use crate::store::CalendarStore;

/// Orchestrates every mutation of the calendar store: the optimistic local
/// step always lands before the remote call is dispatched, and the
/// reconciliation step only after that call resolves. The store lock is
/// never held across an await, so independent operations interleave freely;
/// when two full-list refetches race, the last one to resolve wins.
pub struct MutationCoordinator<A> {
    api: A,
    store: Arc<RwLock<CalendarStore>>,
    user_id: String,
}

impl<A: HealthApi> MutationCoordinator<A> {
    pub fn new(api: A, store: Arc<RwLock<CalendarStore>>, user_id: impl Into<String>) -> Self {
        Self {
            api,
            store,
            user_id: user_id.into(),
        }
    }

    pub fn store(&self) -> Arc<RwLock<CalendarStore>> {
        Arc::clone(&self.store)
    }

    fn store_mut(&self) -> EngineResult<RwLockWriteGuard<'_, CalendarStore>> {
        self.store
            .write()
            .map_err(|_| EngineError::Internal(anyhow!("calendar store lock poisoned")))
    }

    /// Full initial load: records, reference lists and analyses in one
    /// sweep. On failure no stale records survive.
    pub async fn load_all(&self) -> EngineResult<()> {
        self.store_mut()?.begin_op();

        let fetched = tokio::try_join!(
            self.api.fetch_records(&self.user_id),
            self.api.fetch_symptoms(&self.user_id),
            self.api.fetch_medications(&self.user_id),
            self.api.fetch_analyses(&self.user_id),
        );

        match fetched {
            Ok((records, symptoms, medications, analyses)) => {
                tracing::info!(
                    records = records.len(),
                    analyses = analyses.len(),
                    "calendar data loaded"
                );
                let mut store = self.store_mut()?;
                store.replace_records(records);
                store.replace_symptoms(symptoms);
                store.replace_medications(medications);
                store.replace_analyses(analyses);
                store.finish_op();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "calendar load failed");
                let mut store = self.store_mut()?;
                store.clear_records();
                store.fail_op(e.to_string());
                Err(e)
            }
        }
    }

    /// Create a symptom record: optimistic insert, remote create, then a
    /// full authoritative refetch replacing (not merging) local state.
    pub async fn create_symptom_record(
        &self,
        record: NewSymptomRecord,
    ) -> EngineResult<HealthRecord> {
        record
            .validate()
            .map_err(|e| EngineError::Validation(e.to_string()))?;

        let pending_id = EventId::Pending(Uuid::new_v4());
        {
            let mut store = self.store_mut()?;
            store.begin_op();
            let optimistic = optimistic_symptom_event(&store, &record, pending_id);
            store.push_pending(optimistic);
        }

        match self.api.create_symptom_record(&record).await {
            Ok(created) => self.confirm_create(pending_id, created).await,
            Err(e) => self.rollback_pending(pending_id, e),
        }
    }

    /// Create a medication record (possibly a repeating future schedule).
    pub async fn create_medication_record(
        &self,
        record: NewMedicationRecord,
    ) -> EngineResult<HealthRecord> {
        record
            .validate()
            .map_err(|e| EngineError::Validation(e.to_string()))?;

        let pending_id = EventId::Pending(Uuid::new_v4());
        {
            let mut store = self.store_mut()?;
            store.begin_op();
            let optimistic = optimistic_medication_event(&store, &record, pending_id);
            store.push_pending(optimistic);
        }

        match self.api.create_medication_record(&record).await {
            Ok(created) => self.confirm_create(pending_id, created).await,
            Err(e) => self.rollback_pending(pending_id, e),
        }
    }

    /// The confirmatory refetch after a successful create. The refetched
    /// list is authoritative for the snapshot it carries.
    async fn confirm_create(
        &self,
        pending_id: EventId,
        created: HealthRecord,
    ) -> EngineResult<HealthRecord> {
        let refetched = self.api.fetch_records(&self.user_id).await;
        let mut store = self.store_mut()?;
        store.remove_pending(&pending_id);
        match refetched {
            Ok(records) => {
                store.replace_records(records);
                store.finish_op();
                Ok(created)
            }
            Err(e) => {
                tracing::warn!(error = %e, "refetch after create failed");
                store.fail_op(e.to_string());
                Err(e)
            }
        }
    }

    /// Remote create failed: the optimistic entry is rolled back rather
    /// than left dangling, and the failure is surfaced on the store.
    fn rollback_pending(&self, pending_id: EventId, e: EngineError) -> EngineResult<HealthRecord> {
        tracing::warn!(error = %e, "record create failed, rolling back optimistic entry");
        let mut store = self.store_mut()?;
        store.remove_pending(&pending_id);
        store.fail_op(e.to_string());
        Err(e)
    }

    /// Update in place from the server's canonical record; no full-list
    /// refetch, so the rest of the calendar does not flash. On failure the
    /// local entry is left stale and the error surfaced.
    pub async fn update_record(&self, update: UpdateRecord) -> EngineResult<HealthRecord> {
        update
            .validate()
            .map_err(|e| EngineError::Validation(e.to_string()))?;
        {
            let mut store = self.store_mut()?;
            if store.find_record(update.id).is_none() {
                return Err(EngineError::NotFound(update.id));
            }
            store.begin_op();
        }

        match self.api.update_record(&update).await {
            Ok(canonical) => {
                let mut store = self.store_mut()?;
                store.patch_record(canonical.clone());
                store.finish_op();
                Ok(canonical)
            }
            Err(e) => {
                tracing::warn!(record_id = update.id, error = %e, "record update failed");
                self.store_mut()?.fail_op(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn delete_record(&self, id: i64) -> EngineResult<()> {
        {
            let mut store = self.store_mut()?;
            if store.find_record(id).is_none() {
                return Err(EngineError::NotFound(id));
            }
            store.begin_op();
        }

        match self.api.delete_record(id).await {
            Ok(()) => {
                let mut store = self.store_mut()?;
                store.remove_record(id);
                store.finish_op();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(record_id = id, error = %e, "record delete failed");
                self.store_mut()?.fail_op(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn create_custom_symptom(&self, entity: NewReferenceEntity) -> EngineResult<Symptom> {
        entity
            .validate()
            .map_err(|e| EngineError::Validation(e.to_string()))?;
        self.store_mut()?.begin_op();

        match self.api.create_symptom(&entity).await {
            Ok(symptom) => {
                let mut store = self.store_mut()?;
                store.push_symptom(symptom.clone());
                store.finish_op();
                Ok(symptom)
            }
            Err(e) => {
                self.store_mut()?.fail_op(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn create_custom_medication(
        &self,
        entity: NewReferenceEntity,
    ) -> EngineResult<Medication> {
        entity
            .validate()
            .map_err(|e| EngineError::Validation(e.to_string()))?;
        self.store_mut()?.begin_op();

        match self.api.create_medication(&entity).await {
            Ok(medication) => {
                let mut store = self.store_mut()?;
                store.push_medication(medication.clone());
                store.finish_op();
                Ok(medication)
            }
            Err(e) => {
                self.store_mut()?.fail_op(e.to_string());
                Err(e)
            }
        }
    }

    /// Replace the KP series with the merge of measured and forecast data
    /// over an arbitrary range.
    pub async fn load_kp_range(&self, start: NaiveDate, end: NaiveDate) -> EngineResult<()> {
        self.store_mut()?.begin_op();

        match tokio::try_join!(
            self.api.fetch_kp_range(start, end),
            self.api.fetch_kp_forecast(),
        ) {
            Ok((historical, forecast)) => {
                let merged = kp::merge_kp(&historical, &forecast);
                let mut store = self.store_mut()?;
                store.replace_kp(merged);
                store.finish_op();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "kp-index load failed");
                self.store_mut()?.fail_op(e.to_string());
                Err(e)
            }
        }
    }

    /// Fixed-width dashboard window starting at `start`.
    pub async fn load_kp_window(&self, start: NaiveDate, days: i64) -> EngineResult<()> {
        self.store_mut()?.begin_op();

        let end = start + Duration::days(days.max(1) - 1);
        match tokio::try_join!(
            self.api.fetch_kp_range(start, end),
            self.api.fetch_kp_forecast(),
        ) {
            Ok((historical, forecast)) => {
                let window = kp::kp_window(&historical, &forecast, start, days);
                let mut store = self.store_mut()?;
                store.replace_kp(window);
                store.finish_op();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "kp-index window load failed");
                self.store_mut()?.fail_op(e.to_string());
                Err(e)
            }
        }
    }

    pub async fn load_analyses(&self) -> EngineResult<()> {
        self.store_mut()?.begin_op();

        match self.api.fetch_analyses(&self.user_id).await {
            Ok(analyses) => {
                let mut store = self.store_mut()?;
                store.replace_analyses(analyses);
                store.finish_op();
                Ok(())
            }
            Err(e) => {
                self.store_mut()?.fail_op(e.to_string());
                Err(e)
            }
        }
    }

    /// Upload an analysis file, then refetch the authoritative list.
    pub async fn upload_analysis(&self, upload: UploadAnalysis) -> EngineResult<Analysis> {
        upload
            .validate()
            .map_err(|e| EngineError::Validation(e.to_string()))?;
        self.store_mut()?.begin_op();

        match self.api.upload_analysis(&upload).await {
            Ok(created) => {
                let refetched = self.api.fetch_analyses(&self.user_id).await;
                let mut store = self.store_mut()?;
                match refetched {
                    Ok(analyses) => {
                        store.replace_analyses(analyses);
                        store.finish_op();
                        Ok(created)
                    }
                    Err(e) => {
                        store.fail_op(e.to_string());
                        Err(e)
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "analysis upload failed");
                self.store_mut()?.fail_op(e.to_string());
                Err(e)
            }
        }
    }

    /// Delete an analysis; the backend drops the stored file with it.
    pub async fn delete_analysis(&self, id: i64) -> EngineResult<()> {
        {
            let mut store = self.store_mut()?;
            if store.find_analysis(id).is_none() {
                return Err(EngineError::NotFound(id));
            }
            store.begin_op();
        }

        match self.api.delete_analysis(id).await {
            Ok(()) => {
                let mut store = self.store_mut()?;
                store.remove_analysis(id);
                store.finish_op();
                Ok(())
            }
            Err(e) => {
                tracing::warn!(analysis_id = id, error = %e, "analysis delete failed");
                self.store_mut()?.fail_op(e.to_string());
                Err(e)
            }
        }
    }

    /// Byte passthrough; nothing is cached locally.
    pub async fn download_analysis(&self, id: i64) -> EngineResult<Vec<u8>> {
        self.api.download_analysis(id).await
    }
}

fn optimistic_symptom_event(
    store: &CalendarStore,
    record: &NewSymptomRecord,
    id: EventId,
) -> CalendarEvent {
    let name = store
        .symptoms()
        .iter()
        .find(|s| s.id == record.symptom_id)
        .map(|s| s.name.clone())
        .unwrap_or_else(|| format!("Symptom #{}", record.symptom_id));
    CalendarEvent {
        id,
        title: projector::symptom_title(&name, Some(record.weight)),
        start: record.record_date,
        all_day: false,
        details: EventDetails::Symptom {
            symptom_id: record.symptom_id,
            severity: Some(record.weight),
        },
        is_future: false,
    }
}

fn optimistic_medication_event(
    store: &CalendarStore,
    record: &NewMedicationRecord,
    id: EventId,
) -> CalendarEvent {
    let name = store
        .medications()
        .iter()
        .find(|m| m.id == record.medication_id)
        .map(|m| m.name.clone())
        .unwrap_or_else(|| format!("Medication #{}", record.medication_id));
    CalendarEvent {
        id,
        title: projector::medication_title(&name, record.quantity, record.dosage),
        start: record.record_date,
        all_day: false,
        details: EventDetails::Medication {
            medication_id: record.medication_id,
            details: MedicationDetails {
                dosage: record.dosage,
                quantity: record.quantity,
            },
        },
        is_future: record.is_future,
    }
}

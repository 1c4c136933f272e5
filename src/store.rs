use crate::models::analysis::Analysis;
use crate::models::event::{CalendarEvent, EventId};
use crate::models::kp::KpIndexEntry;
use crate::models::record::HealthRecord;
use crate::models::reference::{Medication, Symptom};
use crate::{projector, recurrence};

/// The single mutable holding area for everything the calendar shows.
///
/// Reads are pure selectors; writes are `pub(crate)` reconciliation methods
/// reachable only from the mutation coordinator, so the projector, filter
/// and classifier can never mutate state behind its back. There is no
/// ambient singleton: callers own the store and pass it by reference.
#[derive(Debug, Default)]
pub struct CalendarStore {
    records: Vec<HealthRecord>,
    symptoms: Vec<Symptom>,
    medications: Vec<Medication>,
    analyses: Vec<Analysis>,
    kp_data: Vec<KpIndexEntry>,
    pending: Vec<CalendarEvent>,
    loading: bool,
    error: Option<String>,
}

impl CalendarStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Read side: pure selectors
    // ------------------------------------------------------------------

    pub fn records(&self) -> &[HealthRecord] {
        &self.records
    }

    pub fn symptoms(&self) -> &[Symptom] {
        &self.symptoms
    }

    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }

    pub fn analyses(&self) -> &[Analysis] {
        &self.analyses
    }

    pub fn kp_data(&self) -> &[KpIndexEntry] {
        &self.kp_data
    }

    /// Optimistic entries still awaiting remote confirmation.
    pub fn pending_events(&self) -> &[CalendarEvent] {
        &self.pending
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn find_record(&self, id: i64) -> Option<&HealthRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn find_analysis(&self, id: i64) -> Option<&Analysis> {
        self.analyses.iter().find(|a| a.id == id)
    }

    /// The full projected event set: every record mapped to an event,
    /// repeating future medications expanded to their occurrences, analyses
    /// appended as all-day entries, and pending optimistic entries last.
    ///
    /// A record that fails projection or expansion is skipped with a
    /// warning; one bad record must not blank the whole calendar.
    pub fn events(&self) -> Vec<CalendarEvent> {
        let mut events = Vec::with_capacity(self.records.len() + self.analyses.len());

        for record in &self.records {
            if record.is_recurring() {
                match recurrence::expand(record, &self.symptoms, &self.medications) {
                    Ok(occurrences) if !occurrences.is_empty() => {
                        events.extend(occurrences);
                        continue;
                    }
                    // Degenerate rule: fall through to the seed projection.
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(record_id = record.id, error = %e, "skipping recurrence expansion");
                    }
                }
            }
            match projector::project_record(record, &self.symptoms, &self.medications) {
                Ok(event) => events.push(event),
                Err(e) => {
                    tracing::warn!(record_id = record.id, error = %e, "skipping unprojectable record");
                }
            }
        }

        events.extend(self.analyses.iter().map(projector::project_analysis));
        events.extend(self.pending.iter().cloned());
        events
    }

    // ------------------------------------------------------------------
    // Write side: reconciliation only, called by the coordinator
    // ------------------------------------------------------------------

    pub(crate) fn begin_op(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub(crate) fn finish_op(&mut self) {
        self.loading = false;
    }

    pub(crate) fn fail_op(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    pub(crate) fn replace_records(&mut self, records: Vec<HealthRecord>) {
        self.records = records;
    }

    pub(crate) fn clear_records(&mut self) {
        self.records.clear();
    }

    /// In-place single-entry patch from the server's canonical record, so a
    /// successful update does not flash the whole list.
    pub(crate) fn patch_record(&mut self, canonical: HealthRecord) -> bool {
        match self.records.iter_mut().find(|r| r.id == canonical.id) {
            Some(slot) => {
                *slot = canonical;
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove_record(&mut self, id: i64) -> bool {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        self.records.len() < before
    }

    pub(crate) fn replace_symptoms(&mut self, symptoms: Vec<Symptom>) {
        self.symptoms = symptoms;
    }

    pub(crate) fn replace_medications(&mut self, medications: Vec<Medication>) {
        self.medications = medications;
    }

    pub(crate) fn push_symptom(&mut self, symptom: Symptom) {
        self.symptoms.push(symptom);
    }

    pub(crate) fn push_medication(&mut self, medication: Medication) {
        self.medications.push(medication);
    }

    pub(crate) fn replace_analyses(&mut self, analyses: Vec<Analysis>) {
        self.analyses = analyses;
    }

    pub(crate) fn remove_analysis(&mut self, id: i64) -> bool {
        let before = self.analyses.len();
        self.analyses.retain(|a| a.id != id);
        self.analyses.len() < before
    }

    pub(crate) fn replace_kp(&mut self, kp_data: Vec<KpIndexEntry>) {
        self.kp_data = kp_data;
    }

    pub(crate) fn push_pending(&mut self, event: CalendarEvent) {
        self.pending.push(event);
    }

    pub(crate) fn remove_pending(&mut self, id: &EventId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|e| e.id != *id);
        self.pending.len() < before
    }
}

use std::collections::HashSet;

use crate::models::event::{CalendarEvent, EventCategory, EventDetails};

/// Which event categories the user toggled on. All-off means "no category
/// filtering", not "show nothing".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryToggles {
    pub symptom: bool,
    pub medication: bool,
    pub analysis: bool,
}

impl CategoryToggles {
    pub fn any(&self) -> bool {
        self.symptom || self.medication || self.analysis
    }

    pub fn allows(&self, category: EventCategory) -> bool {
        match category {
            EventCategory::Symptom => self.symptom,
            EventCategory::Medication => self.medication,
            EventCategory::Analysis => self.analysis,
        }
    }
}

/// User-chosen criteria set: category toggles plus per-entity allow-lists.
/// The two stages compose by AND; neither clears the other.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    pub categories: CategoryToggles,
    pub symptom_ids: HashSet<i64>,
    pub medication_ids: HashSet<i64>,
}

impl FilterCriteria {
    /// The default "off" state: nothing toggled, no allow-lists.
    pub fn is_empty(&self) -> bool {
        !self.categories.any() && self.symptom_ids.is_empty() && self.medication_ids.is_empty()
    }

    pub fn apply(&self, events: &[CalendarEvent]) -> Vec<CalendarEvent> {
        if self.is_empty() {
            return events.to_vec();
        }
        events.iter().filter(|e| self.matches(e)).cloned().collect()
    }

    fn matches(&self, event: &CalendarEvent) -> bool {
        if self.categories.any() && !self.categories.allows(event.category()) {
            return false;
        }
        match &event.details {
            EventDetails::Symptom { symptom_id, .. } => {
                self.symptom_ids.is_empty() || self.symptom_ids.contains(symptom_id)
            }
            EventDetails::Medication { medication_id, .. } => {
                self.medication_ids.is_empty() || self.medication_ids.contains(medication_id)
            }
            // Entity allow-lists never apply to analyses.
            EventDetails::Analysis { .. } => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::{EventId, MedicationDetails};
    use chrono::NaiveDate;

    fn symptom_event(id: i64, symptom_id: i64) -> CalendarEvent {
        CalendarEvent {
            id: EventId::Record(id),
            title: format!("Symptom #{}", symptom_id),
            start: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            all_day: false,
            details: EventDetails::Symptom {
                symptom_id,
                severity: Some(2),
            },
            is_future: false,
        }
    }

    fn medication_event(id: i64, medication_id: i64) -> CalendarEvent {
        CalendarEvent {
            id: EventId::Record(id),
            title: format!("Medication #{}", medication_id),
            start: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            all_day: false,
            details: EventDetails::Medication {
                medication_id,
                details: MedicationDetails {
                    dosage: None,
                    quantity: None,
                },
            },
            is_future: false,
        }
    }

    fn analysis_event(id: i64) -> CalendarEvent {
        CalendarEvent {
            id: EventId::Analysis(id),
            title: "Blood panel".into(),
            start: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            all_day: true,
            details: EventDetails::Analysis {
                file_path: "analyses/1.pdf".into(),
            },
            is_future: false,
        }
    }

    fn sample() -> Vec<CalendarEvent> {
        vec![
            symptom_event(1, 4),
            symptom_event(2, 5),
            medication_event(3, 7),
            medication_event(4, 8),
            analysis_event(9),
        ]
    }

    #[test]
    fn empty_criteria_is_a_no_op() {
        let events = sample();
        assert_eq!(FilterCriteria::default().apply(&events), events);
    }

    #[test]
    fn category_toggle_drops_other_categories() {
        let criteria = FilterCriteria {
            categories: CategoryToggles {
                medication: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let filtered = criteria.apply(&sample());
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|e| e.category() == EventCategory::Medication));
    }

    #[test]
    fn analyses_pass_only_with_their_toggle() {
        let criteria = FilterCriteria {
            categories: CategoryToggles {
                symptom: true,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(criteria.apply(&sample()).iter().all(|e| e.category() == EventCategory::Symptom));

        let criteria = FilterCriteria {
            categories: CategoryToggles {
                analysis: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let filtered = criteria.apply(&sample());
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, EventId::Analysis(9));
    }

    #[test]
    fn id_allow_list_restricts_within_category() {
        let criteria = FilterCriteria {
            medication_ids: HashSet::from([7]),
            ..Default::default()
        };
        let filtered = criteria.apply(&sample());
        // Symptoms and the analysis are untouched; only medications narrow.
        assert_eq!(filtered.len(), 4);
        assert!(filtered.iter().all(|e| e.medication_id() != Some(8)));
    }

    #[test]
    fn analyses_bypass_id_allow_lists() {
        let criteria = FilterCriteria {
            symptom_ids: HashSet::from([4]),
            medication_ids: HashSet::from([7]),
            ..Default::default()
        };
        let filtered = criteria.apply(&sample());
        assert!(filtered.iter().any(|e| e.id == EventId::Analysis(9)));
    }

    #[test]
    fn stages_compose_like_sequential_application() {
        let by_category = FilterCriteria {
            categories: CategoryToggles {
                medication: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let by_id = FilterCriteria {
            medication_ids: HashSet::from([7]),
            ..Default::default()
        };
        let combined = FilterCriteria {
            categories: CategoryToggles {
                medication: true,
                ..Default::default()
            },
            medication_ids: HashSet::from([7]),
            ..Default::default()
        };

        let sequential = by_id.apply(&by_category.apply(&sample()));
        assert_eq!(combined.apply(&sample()), sequential);
    }

    #[test]
    fn pending_events_are_filtered_like_any_other() {
        let mut pending = medication_event(0, 7);
        pending.id = EventId::Pending(uuid::Uuid::new_v4());

        let criteria = FilterCriteria {
            categories: CategoryToggles {
                medication: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let filtered = criteria.apply(&[pending.clone()]);
        assert_eq!(filtered, vec![pending]);
    }
}

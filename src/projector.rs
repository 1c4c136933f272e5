use chrono::NaiveTime;

use crate::error::{EngineError, EngineResult};
use crate::models::analysis::Analysis;
use crate::models::event::{CalendarEvent, EventDetails, EventId, MedicationDetails};
use crate::models::record::HealthRecord;
use crate::models::reference::{Medication, Symptom};

/// Map one persisted record to its calendar event. Pure and idempotent: the
/// same record always projects to the same event.
///
/// Name resolution prefers the reference joined into the record by the
/// backend, then the store's reference lists, then an id placeholder.
pub fn project_record(
    record: &HealthRecord,
    symptoms: &[Symptom],
    medications: &[Medication],
) -> EngineResult<CalendarEvent> {
    match (record.symptom_id, record.medication_id) {
        (Some(symptom_id), None) => {
            let name = record
                .symptom
                .as_ref()
                .map(|r| r.name.clone())
                .or_else(|| {
                    symptoms
                        .iter()
                        .find(|s| s.id == symptom_id)
                        .map(|s| s.name.clone())
                })
                .unwrap_or_else(|| format!("Symptom #{}", symptom_id));

            Ok(CalendarEvent {
                id: EventId::Record(record.id),
                title: symptom_title(&name, record.weight),
                start: record.record_date,
                all_day: false,
                details: EventDetails::Symptom {
                    symptom_id,
                    severity: record.weight,
                },
                is_future: record.is_future,
            })
        }
        (None, Some(medication_id)) => {
            let name = record
                .medication
                .as_ref()
                .map(|r| r.name.clone())
                .or_else(|| {
                    medications
                        .iter()
                        .find(|m| m.id == medication_id)
                        .map(|m| m.name.clone())
                })
                .unwrap_or_else(|| format!("Medication #{}", medication_id));

            let quantity = parse_quantity(record.notes.as_deref());
            Ok(CalendarEvent {
                id: EventId::Record(record.id),
                title: medication_title(&name, quantity, record.dosage),
                start: record.record_date,
                all_day: false,
                details: EventDetails::Medication {
                    medication_id,
                    details: MedicationDetails {
                        dosage: record.dosage,
                        quantity,
                    },
                },
                is_future: record.is_future,
            })
        }
        // Neither reference, or both: the record cannot be categorized.
        _ => Err(EngineError::MalformedRecord { id: record.id }),
    }
}

/// Analyses are always all-day entries pinned to midnight of their date.
pub fn project_analysis(analysis: &Analysis) -> CalendarEvent {
    CalendarEvent {
        id: EventId::Analysis(analysis.id),
        title: analysis.title.clone(),
        start: analysis.record_date.and_time(NaiveTime::MIN),
        all_day: true,
        details: EventDetails::Analysis {
            file_path: analysis.file_path.clone(),
        },
        is_future: false,
    }
}

/// The backend stores medication quantity in the free-text notes column.
pub fn parse_quantity(notes: Option<&str>) -> Option<u32> {
    notes.and_then(|n| n.trim().parse().ok())
}

pub fn symptom_title(name: &str, severity: Option<i16>) -> String {
    match severity {
        Some(severity) => format!("{} (severity {})", name, severity),
        None => name.to_string(),
    }
}

/// Quantity and dosage are independently optional; absent fields are left
/// out of the title entirely rather than rendered empty.
pub fn medication_title(name: &str, quantity: Option<u32>, dosage: Option<f64>) -> String {
    let mut title = name.to_string();
    if let Some(quantity) = quantity {
        title.push_str(&format!(" x{}", quantity));
    }
    if let Some(dosage) = dosage {
        title.push_str(&format!(" {} mg", dosage));
    }
    title
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::NamedRef;
    use chrono::NaiveDate;

    fn base_record(id: i64) -> HealthRecord {
        HealthRecord {
            id,
            record_date: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
            weight: None,
            dosage: None,
            notes: None,
            symptom_id: None,
            medication_id: None,
            symptom: None,
            medication: None,
            is_future: false,
            repeat_type: None,
            repeat_interval: None,
            repeat_end_date: None,
        }
    }

    #[test]
    fn symptom_projection_includes_severity() {
        let mut record = base_record(1);
        record.symptom_id = Some(4);
        record.weight = Some(3);
        record.symptom = Some(NamedRef {
            name: "Headache".into(),
        });

        let event = project_record(&record, &[], &[]).unwrap();
        assert_eq!(event.id, EventId::Record(1));
        assert_eq!(event.title, "Headache (severity 3)");
        assert!(!event.all_day);
        assert_eq!(event.start, record.record_date);
    }

    #[test]
    fn medication_title_omits_absent_fields() {
        assert_eq!(medication_title("Ibuprofen", Some(2), Some(500.0)), "Ibuprofen x2 500 mg");
        assert_eq!(medication_title("Ibuprofen", None, Some(500.0)), "Ibuprofen 500 mg");
        assert_eq!(medication_title("Ibuprofen", Some(2), None), "Ibuprofen x2");
        assert_eq!(medication_title("Ibuprofen", None, None), "Ibuprofen");
    }

    #[test]
    fn medication_quantity_parsed_from_notes() {
        let mut record = base_record(2);
        record.medication_id = Some(7);
        record.dosage = Some(500.0);
        record.notes = Some("2".into());
        record.medication = Some(NamedRef {
            name: "Ibuprofen".into(),
        });

        let event = project_record(&record, &[], &[]).unwrap();
        assert_eq!(
            event.details,
            EventDetails::Medication {
                medication_id: 7,
                details: MedicationDetails {
                    dosage: Some(500.0),
                    quantity: Some(2),
                },
            }
        );
        assert!(event.title.contains("500"));
        assert!(event.title.contains("2"));
    }

    #[test]
    fn non_numeric_notes_yield_no_quantity() {
        assert_eq!(parse_quantity(Some("after meals")), None);
        assert_eq!(parse_quantity(Some(" 3 ")), Some(3));
        assert_eq!(parse_quantity(None), None);
    }

    #[test]
    fn name_falls_back_to_reference_list() {
        let mut record = base_record(3);
        record.symptom_id = Some(4);
        let symptoms = vec![Symptom {
            id: 4,
            name: "Nausea".into(),
            is_custom: false,
        }];

        let event = project_record(&record, &symptoms, &[]).unwrap();
        assert_eq!(event.title, "Nausea");
    }

    #[test]
    fn record_without_any_reference_is_rejected() {
        let record = base_record(9);
        let err = project_record(&record, &[], &[]).unwrap_err();
        assert!(matches!(err, EngineError::MalformedRecord { id: 9 }));
    }

    #[test]
    fn projection_is_idempotent() {
        let mut record = base_record(5);
        record.medication_id = Some(7);
        record.notes = Some("1".into());

        let first = project_record(&record, &[], &[]).unwrap();
        let second = project_record(&record, &[], &[]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn analysis_projects_all_day() {
        let analysis = Analysis {
            id: 11,
            title: "Blood panel".into(),
            file_path: "analyses/11.pdf".into(),
            record_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            user_id: "u1".into(),
        };
        let event = project_analysis(&analysis);
        assert_eq!(event.id, EventId::Analysis(11));
        assert!(event.all_day);
        assert_eq!(event.start.time(), NaiveTime::MIN);
    }
}

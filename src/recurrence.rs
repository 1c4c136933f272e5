use chrono::Duration;

use crate::error::{EngineError, EngineResult};
use crate::models::event::{CalendarEvent, EventId};
use crate::models::record::{HealthRecord, RepeatType};
use crate::models::reference::{Medication, Symptom};
use crate::projector;

/// Expand a scheduled repeating medication into its concrete occurrences:
/// one event per repeat step from the record's own date up to and including
/// the end date (compared at date precision), each inheriting the seed's
/// time-of-day, medication, dosage and quantity.
///
/// Returns an empty vec for the degenerate cases (no repeat rule, end date
/// before the start, or no end date at all); the caller is expected to show
/// the seed record by itself then. A non-positive interval is an error.
pub fn expand(
    record: &HealthRecord,
    symptoms: &[Symptom],
    medications: &[Medication],
) -> EngineResult<Vec<CalendarEvent>> {
    let repeat_type = match record.repeat_type {
        Some(t) if t != RepeatType::None => t,
        _ => return Ok(Vec::new()),
    };
    if !record.is_future {
        return Ok(Vec::new());
    }

    let interval = repeat_type
        .interval_days(record.repeat_interval)
        .unwrap_or(0);
    if interval <= 0 {
        return Err(EngineError::InvalidRecurrence { interval });
    }

    // Unbounded schedules are not expanded.
    let end = match record.repeat_end_date {
        Some(end) => end,
        None => return Ok(Vec::new()),
    };
    if end < record.record_date.date() {
        return Ok(Vec::new());
    }

    let seed = projector::project_record(record, symptoms, medications)?;

    let mut occurrences = Vec::new();
    let mut start = record.record_date;
    let mut index: u32 = 0;
    while start.date() <= end {
        let mut event = seed.clone();
        event.id = EventId::Occurrence {
            record: record.id,
            index,
        };
        event.start = start;
        occurrences.push(event);
        start += Duration::days(interval);
        index += 1;
    }
    Ok(occurrences)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};

    fn scheduled(repeat_type: RepeatType, interval: Option<i64>, end: Option<(u32, u32)>) -> HealthRecord {
        HealthRecord {
            id: 42,
            record_date: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(8, 0, 0)
                .unwrap(),
            weight: None,
            dosage: Some(500.0),
            notes: Some("2".into()),
            symptom_id: None,
            medication_id: Some(7),
            symptom: None,
            medication: None,
            is_future: true,
            repeat_type: Some(repeat_type),
            repeat_interval: interval,
            repeat_end_date: end.map(|(m, d)| NaiveDate::from_ymd_opt(2024, m, d).unwrap()),
        }
    }

    #[test]
    fn every_three_days_stops_at_end_date() {
        let record = scheduled(RepeatType::EveryXDays, Some(3), Some((1, 10)));
        let occurrences = expand(&record, &[], &[]).unwrap();

        let dates: Vec<_> = occurrences.iter().map(|e| e.start.date()).collect();
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 7).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            ]
        );
    }

    #[test]
    fn occurrences_inherit_time_and_details() {
        let record = scheduled(RepeatType::Daily, None, Some((1, 3)));
        let occurrences = expand(&record, &[], &[]).unwrap();

        assert_eq!(occurrences.len(), 3);
        for (index, event) in occurrences.iter().enumerate() {
            assert_eq!(event.start.time(), record.record_date.time());
            assert_eq!(
                event.id,
                EventId::Occurrence {
                    record: 42,
                    index: index as u32,
                }
            );
            assert_eq!(event.medication_id(), Some(7));
        }
    }

    #[test]
    fn weekly_uses_implicit_seven_day_step() {
        let record = scheduled(RepeatType::Weekly, None, Some((1, 15)));
        let occurrences = expand(&record, &[], &[]).unwrap();
        let dates: Vec<_> = occurrences.iter().map(|e| e.start.day()).collect();
        assert_eq!(dates, vec![1, 8, 15]);
    }

    #[test]
    fn end_before_start_yields_no_occurrences() {
        let record = scheduled(RepeatType::Daily, None, None);
        assert!(expand(&record, &[], &[]).unwrap().is_empty());

        let mut record = scheduled(RepeatType::Daily, None, Some((1, 1)));
        record.record_date = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        assert!(expand(&record, &[], &[]).unwrap().is_empty());
    }

    #[test]
    fn non_positive_interval_is_an_error() {
        let record = scheduled(RepeatType::EveryXDays, Some(0), Some((1, 10)));
        let err = expand(&record, &[], &[]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidRecurrence { interval: 0 }));

        let record = scheduled(RepeatType::EveryXDays, None, Some((1, 10)));
        assert!(expand(&record, &[], &[]).is_err());
    }

    #[test]
    fn non_repeating_record_expands_to_nothing() {
        let mut record = scheduled(RepeatType::None, None, Some((1, 10)));
        assert!(expand(&record, &[], &[]).unwrap().is_empty());

        record = scheduled(RepeatType::Daily, None, Some((1, 10)));
        record.is_future = false;
        assert!(expand(&record, &[], &[]).unwrap().is_empty());
    }
}

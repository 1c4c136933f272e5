use chrono::NaiveDateTime;

use crate::models::event::CalendarEvent;

/// Display state of an event relative to wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemporalState {
    Upcoming,
    /// Due or already past; the boundary is inclusive.
    Elapsed,
}

/// Classify at query time against the caller's clock. Deliberately not
/// cached anywhere: the clock advances independently of any mutation, so a
/// cached state would go stale without an invalidation tick.
pub fn classify(event: &CalendarEvent, now: NaiveDateTime) -> TemporalState {
    if event.start <= now {
        TemporalState::Elapsed
    } else {
        TemporalState::Upcoming
    }
}

/// Three-way split kept for audit trails: a scheduled dose that became due
/// and an entry logged directly in the past are both elapsed, but their
/// provenance differs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditState {
    Upcoming,
    ScheduledDue,
    LoggedPast,
}

pub fn audit_state(event: &CalendarEvent, now: NaiveDateTime) -> AuditState {
    match classify(event, now) {
        TemporalState::Upcoming => AuditState::Upcoming,
        TemporalState::Elapsed if event.is_future => AuditState::ScheduledDue,
        TemporalState::Elapsed => AuditState::LoggedPast,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::{EventDetails, EventId};
    use chrono::NaiveDate;

    fn event_at(hour: u32, is_future: bool) -> CalendarEvent {
        CalendarEvent {
            id: EventId::Record(1),
            title: "Ibuprofen".into(),
            start: NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            all_day: false,
            details: EventDetails::Medication {
                medication_id: 7,
                details: crate::models::event::MedicationDetails {
                    dosage: None,
                    quantity: None,
                },
            },
            is_future,
        }
    }

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn start_equal_to_now_is_elapsed() {
        assert_eq!(classify(&event_at(9, false), at(9)), TemporalState::Elapsed);
    }

    #[test]
    fn future_start_is_upcoming() {
        assert_eq!(classify(&event_at(10, false), at(9)), TemporalState::Upcoming);
    }

    #[test]
    fn audit_distinguishes_scheduled_from_logged() {
        assert_eq!(audit_state(&event_at(8, true), at(9)), AuditState::ScheduledDue);
        assert_eq!(audit_state(&event_at(8, false), at(9)), AuditState::LoggedPast);
        assert_eq!(audit_state(&event_at(10, true), at(9)), AuditState::Upcoming);
    }
}

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Daily geomagnetic activity value, 0-9, or null when the day has neither a
/// measurement nor a forecast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpIndexEntry {
    pub date: NaiveDate,
    pub kp_index: Option<u8>,
}

/// Merge measured and forecast series into one, sorted by date. A measured
/// value wins on date collision; a null measurement falls through to the
/// forecast for that day.
pub fn merge_kp(historical: &[KpIndexEntry], forecast: &[KpIndexEntry]) -> Vec<KpIndexEntry> {
    let mut by_date: BTreeMap<NaiveDate, Option<u8>> = BTreeMap::new();
    for entry in forecast {
        by_date.entry(entry.date).or_insert(entry.kp_index);
    }
    for entry in historical {
        if entry.kp_index.is_some() {
            by_date.insert(entry.date, entry.kp_index);
        } else {
            by_date.entry(entry.date).or_insert(None);
        }
    }
    by_date
        .into_iter()
        .map(|(date, kp_index)| KpIndexEntry { date, kp_index })
        .collect()
}

/// Fixed-width dashboard series: exactly `days` entries starting at `start`,
/// measured values preferred per day, nulls filling the gaps.
pub fn kp_window(
    historical: &[KpIndexEntry],
    forecast: &[KpIndexEntry],
    start: NaiveDate,
    days: i64,
) -> Vec<KpIndexEntry> {
    (0..days.max(0))
        .map(|offset| {
            let date = start + Duration::days(offset);
            historical
                .iter()
                .find(|e| e.date == date && e.kp_index.is_some())
                .or_else(|| forecast.iter().find(|e| e.date == date))
                .cloned()
                .unwrap_or(KpIndexEntry {
                    date,
                    kp_index: None,
                })
        })
        .collect()
}

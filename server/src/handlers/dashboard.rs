//! Dashboard handler - user totals and recent subject creation.

use campus_engine::{EntityKind, Record};
use chrono::{Days, NaiveDate, Utc};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::error::Result;
use crate::source::DataSource;

/// Days covered by the subjects chart.
pub const CHART_DAYS: u32 = 7;

/// Registered users per role.
#[derive(Debug, Default, Serialize)]
pub struct UserTotals {
    pub administrators: usize,
    pub teachers: usize,
    pub students: usize,
}

/// One bar per day, oldest first.
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct DailySeries {
    pub labels: Vec<String>,
    pub data: Vec<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub users: UserTotals,
    pub subjects: usize,
    pub subjects_per_day: DailySeries,
}

/// Fetch all four collections concurrently and summarize them.
pub async fn handle_dashboard(
    source: &dyn DataSource,
    user: &AuthUser,
) -> Result<DashboardResponse> {
    let token = user.token();
    let (administrators, teachers, students, subjects) = futures::try_join!(
        source.fetch_all(EntityKind::Administrators, token),
        source.fetch_all(EntityKind::Teachers, token),
        source.fetch_all(EntityKind::Students, token),
        source.fetch_all(EntityKind::Subjects, token),
    )?;

    let today = Utc::now().date_naive();

    Ok(DashboardResponse {
        users: UserTotals {
            administrators: administrators.len(),
            teachers: teachers.len(),
            students: students.len(),
        },
        subjects: subjects.len(),
        subjects_per_day: subjects_per_day(&subjects, today, CHART_DAYS),
    })
}

/// Date a record was created, from `created_at` or `creation`.
///
/// Only the leading `YYYY-MM-DD` is read, so full timestamps work too.
fn created_on(record: &Record) -> Option<NaiveDate> {
    ["created_at", "creation"].into_iter().find_map(|key| {
        let raw = record.get(&[key])?.as_str()?;
        let date = raw.get(..10)?;
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
    })
}

/// Count records created on each of the `days` days ending at `today`.
pub fn subjects_per_day(records: &[Record], today: NaiveDate, days: u32) -> DailySeries {
    let dates: Vec<NaiveDate> = (0..days)
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(u64::from(back))))
        .collect();

    let mut data = vec![0; dates.len()];
    for date in records.iter().filter_map(created_on) {
        if let Some(slot) = dates.iter().position(|d| *d == date) {
            data[slot] += 1;
        }
    }

    DailySeries {
        labels: dates.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect(),
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_counts_last_week() {
        let records: Vec<Record> = [
            json!({"nrc": "10001", "created_at": "2024-03-10T08:00:00Z"}),
            json!({"nrc": "10002", "created_at": "2024-03-10"}),
            json!({"nrc": "10003", "creation": "2024-03-04 12:00"}),
            json!({"nrc": "10004", "created_at": "2024-03-03"}),
            json!({"nrc": "10005"}),
            json!({"nrc": "10006", "created_at": "yesterday"}),
        ]
        .into_iter()
        .map(Record::new)
        .collect();

        let series = subjects_per_day(&records, day("2024-03-10"), 7);

        assert_eq!(series.labels.first().map(String::as_str), Some("2024-03-04"));
        assert_eq!(series.labels.last().map(String::as_str), Some("2024-03-10"));
        assert_eq!(series.data, vec![1, 0, 0, 0, 0, 0, 2]);
    }

    #[test]
    fn test_empty_collection() {
        let series = subjects_per_day(&[], day("2024-01-01"), 3);
        assert_eq!(series.labels, vec!["2023-12-30", "2023-12-31", "2024-01-01"]);
        assert_eq!(series.data, vec![0, 0, 0]);
    }

    #[test]
    fn test_zero_days() {
        let series = subjects_per_day(&[], day("2024-01-01"), 0);
        assert!(series.labels.is_empty());
        assert!(series.data.is_empty());
    }
}

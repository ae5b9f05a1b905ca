//! Day-aligned trailing time windows
//!
//! A [`TimeRange`] covers the trailing `period_days` days in local time:
//! `end` is "now" normalized to 23:59:59.999, `start` is `end - period_days`
//! normalized to 00:00:00.000.

use chrono::{DateTime, Duration, Local, LocalResult, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

/// A `[start, end]` window over local time, day-aligned at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
}

impl TimeRange {
    /// Window for the trailing `period_days` days ending now.
    pub fn trailing_days(period_days: u32) -> Self {
        Self::trailing_days_from(period_days, Local::now())
    }

    /// Window for the trailing `period_days` days ending at `now`.
    /// Deterministic given a clock reading.
    pub fn trailing_days_from(period_days: u32, now: DateTime<Local>) -> Self {
        let today = now.date_naive();
        let end_naive = today
            .and_hms_milli_opt(23, 59, 59, 999)
            .unwrap_or_else(|| now.naive_local());
        let end = resolve_local(end_naive);

        let start_naive = (end_naive - Duration::days(i64::from(period_days)))
            .date()
            .and_hms_opt(0, 0, 0)
            .unwrap_or(end_naive);
        let start = resolve_local(start_naive);

        Self { start, end }
    }

    /// Whether an instant falls inside the window.
    pub fn contains(&self, instant: DateTime<Local>) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// Whether the interval `[start, end]` overlaps the window at all.
    pub fn overlaps(&self, start: DateTime<Local>, end: DateTime<Local>) -> bool {
        start <= self.end && end >= self.start
    }
}

/// Resolve a naive local timestamp against the local timezone. Ambiguous
/// readings (DST fold) take the earlier instant; readings inside a DST gap
/// fall back to interpreting the wall-clock value as UTC.
fn resolve_local(naive: NaiveDateTime) -> DateTime<Local> {
    match Local.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(earlier, _) => earlier,
        LocalResult::None => Local.from_utc_datetime(&naive),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use pretty_assertions::assert_eq;

    fn local(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_end_is_end_of_today() {
        let now = local(2024, 1, 15, 14, 30);
        let range = TimeRange::trailing_days_from(7, now);

        assert_eq!(range.end.date_naive(), now.date_naive());
        assert_eq!(range.end.hour(), 23);
        assert_eq!(range.end.minute(), 59);
        assert_eq!(range.end.second(), 59);
    }

    #[test]
    fn test_start_is_midnight_period_days_back() {
        let now = local(2024, 1, 15, 14, 30);
        let range = TimeRange::trailing_days_from(7, now);

        assert_eq!(
            range.start.date_naive(),
            now.date_naive() - Duration::days(7)
        );
        assert_eq!(range.start.hour(), 0);
        assert_eq!(range.start.minute(), 0);
        assert_eq!(range.start.second(), 0);
    }

    #[test]
    fn test_contains() {
        let range = TimeRange::trailing_days_from(7, local(2024, 1, 15, 12, 0));

        assert!(range.contains(local(2024, 1, 10, 8, 0)));
        assert!(range.contains(local(2024, 1, 8, 0, 0)));
        assert!(!range.contains(local(2024, 1, 7, 23, 59)));
        assert!(!range.contains(local(2024, 1, 16, 0, 0)));
    }

    #[test]
    fn test_overlaps_partial_intervals() {
        let range = TimeRange::trailing_days_from(7, local(2024, 1, 15, 12, 0));

        // Straddles the window start
        assert!(range.overlaps(local(2024, 1, 7, 22, 0), local(2024, 1, 8, 6, 0)));
        // Entirely before
        assert!(!range.overlaps(local(2024, 1, 6, 22, 0), local(2024, 1, 7, 6, 0)));
        // Entirely inside
        assert!(range.overlaps(local(2024, 1, 10, 22, 0), local(2024, 1, 11, 6, 0)));
    }

    #[test]
    fn test_one_day_window() {
        let now = local(2024, 3, 1, 9, 0);
        let range = TimeRange::trailing_days_from(1, now);

        assert_eq!(range.start, local(2024, 2, 29, 0, 0));
        assert_eq!(range.end.date_naive(), now.date_naive());
    }
}

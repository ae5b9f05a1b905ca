//! Sleep aggregation
//!
//! Segments a window's sleep-stage samples into sessions, folds the sessions
//! into per-day records, and derives the nightly averages: time in bed,
//! bedtime and wake-up time (circular means).

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::circular::mean_clock_time;
use crate::segmenter::{day_key, segment_sessions};
use crate::time_range::TimeRange;
use crate::types::{DailySleepRecord, IntervalSample, SleepStats};

/// Aggregator for sleep-interval samples.
pub struct SleepAggregator;

impl SleepAggregator {
    /// Aggregate a window's samples into [`SleepStats`].
    pub fn aggregate(samples: &[IntervalSample], range: &TimeRange) -> SleepStats {
        let (stats, _) = Self::aggregate_with_days(samples, range);
        stats
    }

    /// Aggregate and also return the per-day fold, ordered by date key.
    pub fn aggregate_with_days(
        samples: &[IntervalSample],
        range: &TimeRange,
    ) -> (SleepStats, Vec<DailySleepRecord>) {
        let sessions = segment_sessions(samples, range);

        let mut days: BTreeMap<NaiveDate, DailySleepRecord> = BTreeMap::new();
        for session in &sessions {
            let key = day_key(session);
            let record = days
                .entry(key)
                .or_insert_with(|| DailySleepRecord::new(key));
            // Sessions arrive ordered by start, so the first one mapped to a
            // key carries that day's bedtime; the wake time tracks the most
            // recent session.
            if record.first_bedtime.is_none() {
                record.first_bedtime = Some(session.start());
            }
            record.last_wake_time = Some(session.end());
            record.total_sleep_minutes += session.total_minutes();
        }

        let slept_minutes: Vec<f64> = days
            .values()
            .map(|r| r.total_sleep_minutes)
            .filter(|m| *m > 0.0)
            .collect();
        let average_time_in_bed_minutes = if slept_minutes.is_empty() {
            0.0
        } else {
            slept_minutes.iter().sum::<f64>() / slept_minutes.len() as f64
        };

        let bedtimes: Vec<_> = days.values().filter_map(|r| r.first_bedtime).collect();
        let wake_times: Vec<_> = days.values().filter_map(|r| r.last_wake_time).collect();

        let stats = SleepStats {
            period_start: range.start,
            period_end: range.end,
            average_time_in_bed_minutes,
            average_bedtime: mean_clock_time(&bedtimes),
            average_wake_time: mean_clock_time(&wake_times),
        };

        (stats, days.into_values().collect())
    }
}

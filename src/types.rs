//! Core types for the Vitalflow engine
//!
//! This module defines the data that flows through an aggregation cycle: raw
//! interval samples, segmented sessions, per-day sleep records, and the stats
//! objects returned to callers.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::time_range::TimeRange;

/// Statistic kind, used as part of the cache key and in log output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    Exercise,
    Sleep,
    Mood,
}

impl StatKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatKind::Exercise => "exercise",
            StatKind::Sleep => "sleep",
            StatKind::Mood => "mood",
        }
    }
}

/// One raw reading from a data source: an exercise interval (quantity in
/// minutes) or a sleep-stage interval (quantity unused, duration comes from
/// the timestamps).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntervalSample {
    /// Interval start (local time)
    pub start: DateTime<Local>,
    /// Interval end (local time)
    pub end: DateTime<Local>,
    /// Quantity associated with the interval (exercise minutes, mood valence)
    pub quantity: f64,
}

impl IntervalSample {
    pub fn new(start: DateTime<Local>, end: DateTime<Local>, quantity: f64) -> Self {
        Self {
            start,
            end,
            quantity,
        }
    }

    /// Duration of the interval in minutes, from the timestamps.
    pub fn duration_minutes(&self) -> f64 {
        (self.end - self.start).num_seconds() as f64 / 60.0
    }

    /// A sample with `end` before `start` is malformed and is silently
    /// excluded from aggregation.
    pub fn is_well_formed(&self) -> bool {
        self.end >= self.start
    }
}

/// An ordered, non-empty run of interval samples belonging to one contiguous
/// sleep episode. Consecutive samples are separated by less than the session
/// gap threshold; the segmenter guarantees this on construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    samples: Vec<IntervalSample>,
}

impl Session {
    /// Start a session from its first sample. The non-empty invariant holds
    /// from here on.
    pub fn new(first: IntervalSample) -> Self {
        Self {
            samples: vec![first],
        }
    }

    pub fn push(&mut self, sample: IntervalSample) {
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[IntervalSample] {
        &self.samples
    }

    /// First sample's start.
    pub fn start(&self) -> DateTime<Local> {
        self.samples[0].start
    }

    /// Last sample's end.
    pub fn end(&self) -> DateTime<Local> {
        self.samples[self.samples.len() - 1].end
    }

    /// Sum of sample durations in minutes.
    pub fn total_minutes(&self) -> f64 {
        self.samples.iter().map(IntervalSample::duration_minutes).sum()
    }
}

/// Aggregated sleep for one calendar-day bucket.
///
/// `first_bedtime` is set by the earliest session mapped to the key and never
/// overwritten; `last_wake_time` is always overwritten by later sessions;
/// `total_sleep_minutes` accumulates across all sessions mapped to the key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySleepRecord {
    pub date_key: NaiveDate,
    pub first_bedtime: Option<DateTime<Local>>,
    pub last_wake_time: Option<DateTime<Local>>,
    pub total_sleep_minutes: f64,
}

impl DailySleepRecord {
    pub fn new(date_key: NaiveDate) -> Self {
        Self {
            date_key,
            first_bedtime: None,
            last_wake_time: None,
            total_sleep_minutes: 0.0,
        }
    }
}

/// Exercise statistics over a trailing period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseStats {
    pub period_start: DateTime<Local>,
    pub period_end: DateTime<Local>,
    pub total_minutes: f64,
    /// Total minutes divided by the requested period length, not by the count
    /// of days with recorded activity.
    pub average_minutes: f64,
}

impl ExerciseStats {
    /// All-zero stats for a known period.
    pub fn zero(range: &TimeRange) -> Self {
        Self {
            period_start: range.start,
            period_end: range.end,
            total_minutes: 0.0,
            average_minutes: 0.0,
        }
    }

    /// Sentinel stats signaling "no data available": both period boundaries
    /// are the Unix epoch, distinguishing this from a legitimate all-zero
    /// result.
    pub fn unavailable() -> Self {
        Self {
            period_start: epoch_local(),
            period_end: epoch_local(),
            total_minutes: 0.0,
            average_minutes: 0.0,
        }
    }
}

/// Sleep statistics over a trailing period. Clock times are circular means
/// formatted as zero-padded `HH:MM`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepStats {
    pub period_start: DateTime<Local>,
    pub period_end: DateTime<Local>,
    /// Mean nightly minutes in bed, averaged over days with any recorded
    /// sleep.
    pub average_time_in_bed_minutes: f64,
    pub average_bedtime: String,
    pub average_wake_time: String,
}

impl SleepStats {
    pub fn zero(range: &TimeRange) -> Self {
        Self {
            period_start: range.start,
            period_end: range.end,
            average_time_in_bed_minutes: 0.0,
            average_bedtime: "00:00".to_string(),
            average_wake_time: "00:00".to_string(),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            period_start: epoch_local(),
            period_end: epoch_local(),
            average_time_in_bed_minutes: 0.0,
            average_bedtime: "00:00".to_string(),
            average_wake_time: "00:00".to_string(),
        }
    }
}

/// Mood statistics over a trailing period. No backend records valence yet, so
/// the average is currently always zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentalHealthStats {
    pub period_start: DateTime<Local>,
    pub period_end: DateTime<Local>,
    pub average_valence: f64,
}

impl MentalHealthStats {
    pub fn zero(range: &TimeRange) -> Self {
        Self {
            period_start: range.start,
            period_end: range.end,
            average_valence: 0.0,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            period_start: epoch_local(),
            period_end: epoch_local(),
            average_valence: 0.0,
        }
    }
}

/// Unix epoch expressed in the local timezone, used as the "no data" sentinel
/// for period boundaries.
pub fn epoch_local() -> DateTime<Local> {
    DateTime::<Utc>::UNIX_EPOCH.with_timezone(&Local)
}

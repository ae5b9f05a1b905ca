//! Exercise aggregation
//!
//! Reduces exercise-interval samples over a period into total and average
//! minutes.

use crate::time_range::TimeRange;
use crate::types::{ExerciseStats, IntervalSample};

/// Aggregator for exercise-minute samples.
pub struct ExerciseAggregator;

impl ExerciseAggregator {
    /// Sum the sample quantities (minutes) over the window.
    ///
    /// The average divides by the requested period length, not by the count
    /// of days with activity; `SleepAggregator` divides by days with recorded
    /// sleep. Both behaviors are observable contract.
    pub fn aggregate(
        samples: &[IntervalSample],
        range: &TimeRange,
        period_days: u32,
    ) -> ExerciseStats {
        let total_minutes: f64 = samples
            .iter()
            .filter(|s| s.is_well_formed() && range.overlaps(s.start, s.end))
            .map(|s| s.quantity)
            .sum();

        let average_minutes = if period_days == 0 {
            0.0
        } else {
            total_minutes / f64::from(period_days)
        };

        ExerciseStats {
            period_start: range.start,
            period_end: range.end,
            total_minutes,
            average_minutes,
        }
    }
}

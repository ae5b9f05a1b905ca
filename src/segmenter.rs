//! Session segmentation
//!
//! Groups a window's interval samples into contiguous sessions using a gap
//! threshold, and assigns each session to a calendar-day bucket.

use chrono::{Duration, NaiveDate, Timelike};

use crate::time_range::TimeRange;
use crate::types::{IntervalSample, Session};

/// Gap at or above which a new session starts, in hours.
pub const SESSION_GAP_HOURS: i64 = 4;

/// A session whose wake hour is at or past this local hour is attributed to
/// its wake day; earlier wakes count toward the previous night. The value 4
/// must not change: persisted aggregated history was bucketed with it.
pub const WAKE_ATTRIBUTION_HOUR: u32 = 4;

/// Segment an unsorted set of samples into ordered sessions.
///
/// Malformed samples (`end` before `start`) and samples that do not overlap
/// the window are dropped. The rest are sorted ascending by start time
/// (stable, so equal starts keep their input order) and split wherever the
/// gap from the previous sample's end reaches [`SESSION_GAP_HOURS`]. Sessions
/// that end up entirely outside the window are discarded.
pub fn segment_sessions(samples: &[IntervalSample], window: &TimeRange) -> Vec<Session> {
    let mut kept: Vec<&IntervalSample> = samples
        .iter()
        .filter(|s| s.is_well_formed() && window.overlaps(s.start, s.end))
        .collect();
    kept.sort_by_key(|s| s.start);

    let gap = Duration::hours(SESSION_GAP_HOURS);
    let mut sessions: Vec<Session> = Vec::new();
    for sample in kept {
        match sessions.last_mut() {
            Some(current) if sample.start - current.end() < gap => {
                current.push(sample.clone());
            }
            _ => sessions.push(Session::new(sample.clone())),
        }
    }

    sessions.retain(|s| window.overlaps(s.start(), s.end()));
    sessions
}

/// Calendar-day bucket for a session.
///
/// A session ending at or after [`WAKE_ATTRIBUTION_HOUR`] local is keyed by
/// its wake date; a post-midnight wake before that hour belongs to the night
/// before and is keyed by the session's start date.
pub fn day_key(session: &Session) -> NaiveDate {
    let end = session.end();
    if end.hour() >= WAKE_ATTRIBUTION_HOUR {
        end.date_naive()
    } else {
        session.start().date_naive()
    }
}

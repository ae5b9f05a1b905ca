//! Time-bounded stats cache
//!
//! Caches computed stats objects keyed by (statistic kind, period length).
//! Freshness is gated by a single shared `last_write` timestamp: writing any
//! entry resets the baseline used to judge every entry's validity. Matching
//! the aggregated history already shipped, this coarse policy is kept as-is
//! rather than moving to per-entry timestamps.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Local};
use tracing::debug;

use crate::types::{ExerciseStats, MentalHealthStats, SleepStats, StatKind};

/// Cache entries expire this many minutes after the shared `last_write`.
pub const CACHE_TTL_MINUTES: i64 = 30;

/// A cached stats object, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedStats {
    Exercise(ExerciseStats),
    Sleep(SleepStats),
    Mood(MentalHealthStats),
}

#[derive(Debug, Default)]
struct CacheInner {
    entries: HashMap<(StatKind, u32), CachedStats>,
    last_write: Option<DateTime<Local>>,
}

/// Process-wide TTL cache shared across repeated queries.
///
/// Access is serialized behind a mutex, so two concurrent queries for the
/// same key cannot observe a torn write; a miss-recompute-put race between
/// queries remains possible and is idempotent (last write wins).
#[derive(Debug, Default)]
pub struct StatsCache {
    inner: Mutex<CacheInner>,
}

impl StatsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a cached value. Returns `None` when the entry is absent or the
    /// shared freshness baseline is older than [`CACHE_TTL_MINUTES`].
    pub fn get(&self, kind: StatKind, period_days: u32, now: DateTime<Local>) -> Option<CachedStats> {
        let inner = self.lock();
        let fresh = matches!(
            inner.last_write,
            Some(written) if now - written < Duration::minutes(CACHE_TTL_MINUTES)
        );
        if !fresh {
            debug!(kind = kind.as_str(), period_days, "cache stale or empty");
            return None;
        }

        let value = inner.entries.get(&(kind, period_days)).cloned();
        debug!(
            kind = kind.as_str(),
            period_days,
            hit = value.is_some(),
            "cache lookup"
        );
        value
    }

    /// Store a value and reset the shared freshness baseline.
    pub fn put(&self, kind: StatKind, period_days: u32, value: CachedStats, now: DateTime<Local>) {
        let mut inner = self.lock();
        inner.entries.insert((kind, period_days), value);
        inner.last_write = Some(now);
    }

    /// Drop all entries and the freshness baseline.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.last_write = None;
    }

    fn lock(&self) -> MutexGuard<'_, CacheInner> {
        // A panic while holding the lock leaves plain data behind; recover
        // the guard rather than poisoning every later query.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_range::TimeRange;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap()
    }

    fn exercise_value() -> CachedStats {
        let range = TimeRange::trailing_days_from(7, now());
        CachedStats::Exercise(ExerciseStats {
            period_start: range.start,
            period_end: range.end,
            total_minutes: 140.0,
            average_minutes: 20.0,
        })
    }

    #[test]
    fn test_get_within_ttl() {
        let cache = StatsCache::new();
        cache.put(StatKind::Exercise, 7, exercise_value(), now());

        let hit = cache.get(StatKind::Exercise, 7, now() + Duration::minutes(29));
        assert_eq!(hit, Some(exercise_value()));
    }

    #[test]
    fn test_expired_after_ttl() {
        let cache = StatsCache::new();
        cache.put(StatKind::Exercise, 7, exercise_value(), now());

        assert_eq!(
            cache.get(StatKind::Exercise, 7, now() + Duration::minutes(30)),
            None
        );
    }

    #[test]
    fn test_miss_on_different_period() {
        let cache = StatsCache::new();
        cache.put(StatKind::Exercise, 7, exercise_value(), now());

        assert_eq!(cache.get(StatKind::Exercise, 30, now()), None);
    }

    #[test]
    fn test_write_refreshes_all_entries() {
        // The shared timestamp means a later write to any key revalidates
        // entries written before it.
        let cache = StatsCache::new();
        cache.put(StatKind::Exercise, 7, exercise_value(), now());

        let later = now() + Duration::minutes(45);
        let range = TimeRange::trailing_days_from(7, later);
        cache.put(
            StatKind::Sleep,
            7,
            CachedStats::Sleep(SleepStats::zero(&range)),
            later,
        );

        // The exercise entry written 45 minutes ago is fresh again
        assert_eq!(
            cache.get(StatKind::Exercise, 7, later + Duration::minutes(1)),
            Some(exercise_value())
        );
    }

    #[test]
    fn test_clear() {
        let cache = StatsCache::new();
        cache.put(StatKind::Exercise, 7, exercise_value(), now());
        cache.clear();

        assert_eq!(cache.get(StatKind::Exercise, 7, now()), None);
    }
}

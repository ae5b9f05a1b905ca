//! Health statistics facade
//!
//! The public query surface of the engine. A facade owns one injected data
//! source and the process-wide stats cache, and exposes per-period query
//! methods plus the textual summary. Every method is total: permission
//! denials and upstream failures are logged and mapped to zero-valued stats,
//! never raised.

use std::sync::Arc;

use chrono::Local;
use tracing::warn;

use crate::cache::{CachedStats, StatsCache};
use crate::error::SourceError;
use crate::exercise::ExerciseAggregator;
use crate::sleep::SleepAggregator;
use crate::sources::HealthDataSource;
use crate::time_range::TimeRange;
use crate::types::{ExerciseStats, IntervalSample, MentalHealthStats, SleepStats, StatKind};

/// Period length for the weekly convenience queries.
pub const WEEK_DAYS: u32 = 7;
/// Period length for the monthly convenience queries.
pub const MONTH_DAYS: u32 = 30;

/// Facade over one selected data source.
pub struct HealthFacade {
    source: Arc<dyn HealthDataSource>,
    cache: StatsCache,
}

impl HealthFacade {
    /// Build a facade around a source chosen by the composition root (see
    /// [`select_source`](crate::sources::select_source)).
    pub fn new(source: Arc<dyn HealthDataSource>) -> Self {
        Self {
            source,
            cache: StatsCache::new(),
        }
    }

    /// Exercise statistics over the trailing `period_days` days.
    pub async fn exercise_stats(&self, period_days: u32) -> ExerciseStats {
        let now = Local::now();
        if let Some(CachedStats::Exercise(stats)) =
            self.cache.get(StatKind::Exercise, period_days, now)
        {
            return stats;
        }

        if !self.authorized().await {
            return ExerciseStats::unavailable();
        }

        let range = TimeRange::trailing_days_from(period_days, now);
        let samples = self
            .fetch(self.source.query_exercise_samples(&range).await, "exercise");
        let stats = ExerciseAggregator::aggregate(&samples, &range, period_days);

        self.cache.put(
            StatKind::Exercise,
            period_days,
            CachedStats::Exercise(stats.clone()),
            Local::now(),
        );
        stats
    }

    /// Sleep statistics over the trailing `period_days` days.
    pub async fn sleep_stats(&self, period_days: u32) -> SleepStats {
        let now = Local::now();
        if let Some(CachedStats::Sleep(stats)) = self.cache.get(StatKind::Sleep, period_days, now)
        {
            return stats;
        }

        if !self.authorized().await {
            return SleepStats::unavailable();
        }

        let range = TimeRange::trailing_days_from(period_days, now);
        let samples = self.fetch(self.source.query_sleep_samples(&range).await, "sleep");
        let stats = SleepAggregator::aggregate(&samples, &range);

        self.cache.put(
            StatKind::Sleep,
            period_days,
            CachedStats::Sleep(stats.clone()),
            Local::now(),
        );
        stats
    }

    /// Mood statistics over the trailing `period_days` days. Zero until a
    /// backend records valence samples.
    pub async fn mood_stats(&self, period_days: u32) -> MentalHealthStats {
        let now = Local::now();
        if let Some(CachedStats::Mood(stats)) = self.cache.get(StatKind::Mood, period_days, now) {
            return stats;
        }

        if !self.authorized().await {
            return MentalHealthStats::unavailable();
        }

        let range = TimeRange::trailing_days_from(period_days, now);
        let samples = self.fetch(self.source.query_mood_samples(&range).await, "mood");
        let average_valence = if samples.is_empty() {
            0.0
        } else {
            samples.iter().map(|s| s.quantity).sum::<f64>() / samples.len() as f64
        };
        let stats = MentalHealthStats {
            period_start: range.start,
            period_end: range.end,
            average_valence,
        };

        self.cache.put(
            StatKind::Mood,
            period_days,
            CachedStats::Mood(stats.clone()),
            Local::now(),
        );
        stats
    }

    pub async fn weekly_exercise_stats(&self) -> ExerciseStats {
        self.exercise_stats(WEEK_DAYS).await
    }

    pub async fn monthly_exercise_stats(&self) -> ExerciseStats {
        self.exercise_stats(MONTH_DAYS).await
    }

    pub async fn weekly_sleep_stats(&self) -> SleepStats {
        self.sleep_stats(WEEK_DAYS).await
    }

    pub async fn monthly_sleep_stats(&self) -> SleepStats {
        self.sleep_stats(MONTH_DAYS).await
    }

    pub async fn weekly_mood_stats(&self) -> MentalHealthStats {
        self.mood_stats(WEEK_DAYS).await
    }

    /// Human-readable weekly summary.
    ///
    /// Concatenates the sections whose underlying averages are non-zero, in
    /// the order exercise, mood, sleep. When none qualify the summary is the
    /// literal `"unknown"`.
    pub async fn summarize(&self) -> String {
        let exercise = self.weekly_exercise_stats().await;
        let mood = self.weekly_mood_stats().await;
        let sleep = self.weekly_sleep_stats().await;

        let mut sections = Vec::new();
        if exercise.average_minutes > 0.0 {
            sections.push(format!(
                "Exercise: {:.0} minutes per day on average.",
                exercise.average_minutes
            ));
        }
        if mood.average_valence > 0.0 {
            sections.push(format!(
                "Mood: average valence {:.1}.",
                mood.average_valence
            ));
        }
        if sleep.average_time_in_bed_minutes > 0.0 {
            sections.push(format!(
                "Sleep: {} in bed on average, typical bedtime {}, wake-up {}.",
                format_minutes(sleep.average_time_in_bed_minutes),
                sleep.average_bedtime,
                sleep.average_wake_time
            ));
        }

        if sections.is_empty() {
            "unknown".to_string()
        } else {
            sections.join(" ")
        }
    }

    /// Availability and permission gate shared by all queries.
    async fn authorized(&self) -> bool {
        if !self.source.check_availability().await {
            return false;
        }
        match self.source.request_permissions().await {
            Ok(granted) => granted,
            Err(err) => {
                warn!(source = self.source.name(), %err, "permission request failed");
                false
            }
        }
    }

    /// Unwrap a query result, degrading failures to an empty sample set.
    fn fetch(
        &self,
        result: Result<Vec<IntervalSample>, SourceError>,
        kind: &str,
    ) -> Vec<IntervalSample> {
        match result {
            Ok(samples) => samples,
            Err(err) => {
                warn!(source = self.source.name(), kind, %err, "query failed, treating as empty");
                Vec::new()
            }
        }
    }
}

/// Render minutes as `7h 32m` (or `45m` under an hour).
pub fn format_minutes(minutes: f64) -> String {
    let total = minutes.round() as i64;
    let h = total / 60;
    let m = total % 60;
    if h > 0 {
        format!("{}h {}m", h, m)
    } else {
        format!("{}m", m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::{DeviceStoreSource, UnavailableSource};
    use crate::types::epoch_local;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Source that counts queries and can be told to fail.
    #[derive(Default)]
    struct CountingSource {
        exercise: Vec<IntervalSample>,
        sleep: Vec<IntervalSample>,
        exercise_queries: AtomicUsize,
        fail_queries: bool,
    }

    #[async_trait]
    impl HealthDataSource for CountingSource {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn check_availability(&self) -> bool {
            true
        }

        async fn request_permissions(&self) -> Result<bool, SourceError> {
            Ok(true)
        }

        async fn query_exercise_samples(
            &self,
            _range: &TimeRange,
        ) -> Result<Vec<IntervalSample>, SourceError> {
            self.exercise_queries.fetch_add(1, Ordering::SeqCst);
            if self.fail_queries {
                return Err(SourceError::UpstreamQuery("boom".to_string()));
            }
            Ok(self.exercise.clone())
        }

        async fn query_sleep_samples(
            &self,
            _range: &TimeRange,
        ) -> Result<Vec<IntervalSample>, SourceError> {
            if self.fail_queries {
                return Err(SourceError::UpstreamQuery("boom".to_string()));
            }
            Ok(self.sleep.clone())
        }
    }

    fn days_ago(days: i64, hour: u32) -> DateTime<Local> {
        let today = Local::now().date_naive() - Duration::days(days);
        match Local.from_local_datetime(&today.and_hms_opt(hour, 0, 0).unwrap()) {
            chrono::LocalResult::Single(dt) => dt,
            chrono::LocalResult::Ambiguous(dt, _) => dt,
            chrono::LocalResult::None => Local::now(),
        }
    }

    fn exercise_sample(days: i64, minutes: f64) -> IntervalSample {
        IntervalSample::new(days_ago(days, 8), days_ago(days, 9), minutes)
    }

    #[tokio::test]
    async fn test_weekly_exercise_end_to_end() {
        // 140 minutes over the 7-day window
        let source = DeviceStoreSource::with_samples(
            vec![
                exercise_sample(1, 50.0),
                exercise_sample(3, 60.0),
                exercise_sample(5, 30.0),
            ],
            Vec::new(),
        );
        let facade = HealthFacade::new(Arc::new(source));

        let stats = facade.weekly_exercise_stats().await;
        assert_eq!(stats.total_minutes, 140.0);
        assert_eq!(stats.average_minutes, 20.0);
    }

    #[tokio::test]
    async fn test_repeat_query_served_from_cache() {
        let source = Arc::new(CountingSource {
            exercise: vec![exercise_sample(1, 30.0)],
            ..CountingSource::default()
        });
        let facade = HealthFacade::new(source.clone());

        let first = facade.weekly_exercise_stats().await;
        let second = facade.weekly_exercise_stats().await;

        assert_eq!(first, second);
        assert_eq!(source.exercise_queries.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unavailable_source_gives_sentinel_stats() {
        let facade = HealthFacade::new(Arc::new(UnavailableSource));

        let stats = facade.weekly_exercise_stats().await;
        assert_eq!(stats.period_start, epoch_local());
        assert_eq!(stats.period_end, epoch_local());
        assert_eq!(stats.total_minutes, 0.0);

        let sleep = facade.weekly_sleep_stats().await;
        assert_eq!(sleep.period_start, epoch_local());
        assert_eq!(sleep.average_bedtime, "00:00");
    }

    #[tokio::test]
    async fn test_permission_denied_gives_sentinel_stats() {
        let store = DeviceStoreSource::with_samples(vec![exercise_sample(1, 30.0)], Vec::new());
        store.set_authorized(false);
        let facade = HealthFacade::new(Arc::new(store));

        let stats = facade.weekly_exercise_stats().await;
        assert_eq!(stats.period_start, epoch_local());
        assert_eq!(stats.average_minutes, 0.0);
    }

    #[tokio::test]
    async fn test_upstream_failure_degrades_to_zero_stats() {
        let source = Arc::new(CountingSource {
            fail_queries: true,
            ..CountingSource::default()
        });
        let facade = HealthFacade::new(source);

        let stats = facade.weekly_exercise_stats().await;
        // Treated as "no samples", period boundaries stay legitimate
        assert_eq!(stats.total_minutes, 0.0);
        assert!(stats.period_start > epoch_local());
    }

    #[tokio::test]
    async fn test_summary_unknown_when_all_zero() {
        let facade = HealthFacade::new(Arc::new(UnavailableSource));
        assert_eq!(facade.summarize().await, "unknown");
    }

    #[tokio::test]
    async fn test_summary_sections_in_order() {
        let source = DeviceStoreSource::with_samples(
            vec![exercise_sample(1, 140.0)],
            vec![IntervalSample::new(days_ago(2, 22), days_ago(1, 6), 0.0)],
        );
        let facade = HealthFacade::new(Arc::new(source));

        let summary = facade.summarize().await;
        assert!(summary.starts_with("Exercise:"));
        assert!(summary.contains("Sleep:"));
        let exercise_pos = summary.find("Exercise:").unwrap();
        let sleep_pos = summary.find("Sleep:").unwrap();
        assert!(exercise_pos < sleep_pos);
    }

    #[tokio::test]
    async fn test_mood_stats_always_zero() {
        let facade = HealthFacade::new(Arc::new(DeviceStoreSource::new()));
        let stats = facade.weekly_mood_stats().await;
        assert_eq!(stats.average_valence, 0.0);
    }

    #[test]
    fn test_format_minutes() {
        assert_eq!(format_minutes(452.0), "7h 32m");
        assert_eq!(format_minutes(45.0), "45m");
        assert_eq!(format_minutes(60.0), "1h 0m");
    }
}

//! On-device health store
//!
//! An in-process sample store standing in for the platform health database.
//! Samples are recorded by the host application (or loaded from NDJSON) and
//! served back per query window. Authorization models the user's answer to
//! the platform permission prompt.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::Deserialize;

use crate::error::SourceError;
use crate::sources::HealthDataSource;
use crate::time_range::TimeRange;
use crate::types::IntervalSample;

#[derive(Debug, Default)]
struct StoreRecords {
    exercise: Vec<IntervalSample>,
    sleep: Vec<IntervalSample>,
    authorized: bool,
}

/// Health data source backed by the on-device store.
#[derive(Debug)]
pub struct DeviceStoreSource {
    records: RwLock<StoreRecords>,
}

impl Default for DeviceStoreSource {
    fn default() -> Self {
        Self::new()
    }
}

/// One NDJSON line of sample input.
#[derive(Debug, Deserialize)]
struct SampleRecord {
    kind: RecordKind,
    start: DateTime<Local>,
    end: DateTime<Local>,
    #[serde(default)]
    minutes: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum RecordKind {
    Exercise,
    Sleep,
}

impl DeviceStoreSource {
    /// Empty, authorized store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(StoreRecords {
                authorized: true,
                ..StoreRecords::default()
            }),
        }
    }

    /// Store pre-populated with samples, authorized.
    pub fn with_samples(exercise: Vec<IntervalSample>, sleep: Vec<IntervalSample>) -> Self {
        Self {
            records: RwLock::new(StoreRecords {
                exercise,
                sleep,
                authorized: true,
            }),
        }
    }

    /// Set the outcome of the permission prompt.
    pub fn set_authorized(&self, authorized: bool) {
        self.write().authorized = authorized;
    }

    pub fn record_exercise(&self, sample: IntervalSample) {
        self.write().exercise.push(sample);
    }

    pub fn record_sleep(&self, sample: IntervalSample) {
        self.write().sleep.push(sample);
    }

    /// Load newline-delimited JSON sample records. Returns the number of
    /// records loaded; a malformed line fails the whole load.
    ///
    /// Record shape: `{"kind":"sleep","start":"...","end":"...","minutes":30}`
    /// with `minutes` meaningful for exercise records only.
    pub fn load_ndjson(&self, input: &str) -> Result<usize, SourceError> {
        let mut loaded = 0;
        for (idx, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let record: SampleRecord = serde_json::from_str(line).map_err(|e| {
                SourceError::MalformedRecord(format!("line {}: {}", idx + 1, e))
            })?;
            let sample = IntervalSample::new(record.start, record.end, record.minutes);
            match record.kind {
                RecordKind::Exercise => self.record_exercise(sample),
                RecordKind::Sleep => self.record_sleep(sample),
            }
            loaded += 1;
        }
        Ok(loaded)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, StoreRecords> {
        match self.records.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, StoreRecords> {
        match self.records.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl HealthDataSource for DeviceStoreSource {
    fn name(&self) -> &'static str {
        "device_store"
    }

    async fn check_availability(&self) -> bool {
        true
    }

    async fn request_permissions(&self) -> Result<bool, SourceError> {
        Ok(self.read().authorized)
    }

    async fn query_exercise_samples(
        &self,
        range: &TimeRange,
    ) -> Result<Vec<IntervalSample>, SourceError> {
        Ok(filter_window(&self.read().exercise, range))
    }

    async fn query_sleep_samples(
        &self,
        range: &TimeRange,
    ) -> Result<Vec<IntervalSample>, SourceError> {
        Ok(filter_window(&self.read().sleep, range))
    }
}

fn filter_window(samples: &[IntervalSample], range: &TimeRange) -> Vec<IntervalSample> {
    samples
        .iter()
        .filter(|s| range.overlaps(s.start, s.end))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn local(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
    }

    fn week_window() -> TimeRange {
        TimeRange::trailing_days_from(7, local(2024, 1, 15, 12))
    }

    #[tokio::test]
    async fn test_query_filters_by_window() {
        let store = DeviceStoreSource::new();
        store.record_exercise(IntervalSample::new(
            local(2024, 1, 12, 8),
            local(2024, 1, 12, 9),
            60.0,
        ));
        store.record_exercise(IntervalSample::new(
            local(2023, 12, 1, 8),
            local(2023, 12, 1, 9),
            45.0,
        ));

        let samples = store.query_exercise_samples(&week_window()).await.unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].quantity, 60.0);
    }

    #[tokio::test]
    async fn test_permissions_follow_authorization() {
        let store = DeviceStoreSource::new();
        assert!(store.request_permissions().await.unwrap());

        store.set_authorized(false);
        assert!(!store.request_permissions().await.unwrap());
    }

    #[tokio::test]
    async fn test_mood_samples_empty() {
        let store = DeviceStoreSource::new();
        let samples = store.query_mood_samples(&week_window()).await.unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn test_load_ndjson() {
        let store = DeviceStoreSource::new();
        let input = r#"
{"kind":"exercise","start":"2024-01-12T08:00:00+00:00","end":"2024-01-12T08:30:00+00:00","minutes":30}
{"kind":"sleep","start":"2024-01-12T23:00:00+00:00","end":"2024-01-13T07:00:00+00:00"}
"#;

        let loaded = store.load_ndjson(input).unwrap();
        assert_eq!(loaded, 2);
        assert_eq!(store.read().exercise.len(), 1);
        assert_eq!(store.read().sleep.len(), 1);
    }

    #[test]
    fn test_load_ndjson_reports_bad_line() {
        let store = DeviceStoreSource::new();
        let err = store.load_ndjson("{\"kind\":\"exercise\"}").unwrap_err();
        assert!(matches!(err, SourceError::MalformedRecord(_)));
    }
}

//! Fitness cloud payload adapter
//!
//! Adapts an already-fetched fitness-cloud JSON payload into interval
//! samples. Transport and credentials are the host application's concern;
//! this variant never performs I/O of its own, mirroring the engine's
//! non-goal of reading sensors or network APIs directly.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use serde::Deserialize;
use tracing::debug;

use crate::error::SourceError;
use crate::sources::HealthDataSource;
use crate::time_range::TimeRange;
use crate::types::IntervalSample;

/// Cloud API payload shape: workout intervals with active minutes, and raw
/// sleep intervals.
#[derive(Debug, Deserialize)]
struct CloudPayload {
    #[serde(default)]
    workouts: Vec<CloudWorkout>,
    #[serde(default)]
    sleep: Vec<CloudSleepInterval>,
}

#[derive(Debug, Deserialize)]
struct CloudWorkout {
    start: DateTime<Local>,
    end: DateTime<Local>,
    /// Active minutes reported by the cloud; falls back to the interval
    /// duration when absent.
    #[serde(default)]
    active_minutes: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CloudSleepInterval {
    start: DateTime<Local>,
    end: DateTime<Local>,
}

#[derive(Debug, Default)]
struct ParsedSamples {
    exercise: Vec<IntervalSample>,
    sleep: Vec<IntervalSample>,
    loaded: bool,
}

/// Health data source backed by a fitness cloud API payload.
#[derive(Debug, Default)]
pub struct CloudApiSource {
    samples: RwLock<ParsedSamples>,
}

impl CloudApiSource {
    /// Source with no payload loaded yet. Queries return empty sets until
    /// [`load_payload`](Self::load_payload) is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Source initialized from a payload.
    pub fn from_payload(raw_json: &str) -> Result<Self, SourceError> {
        let source = Self::new();
        source.load_payload(raw_json)?;
        Ok(source)
    }

    /// Replace the held samples with the contents of a fetched payload.
    /// Returns the number of samples parsed.
    pub fn load_payload(&self, raw_json: &str) -> Result<usize, SourceError> {
        let payload: CloudPayload = serde_json::from_str(raw_json)?;

        let exercise: Vec<IntervalSample> = payload
            .workouts
            .into_iter()
            .map(|w| {
                let minutes = w
                    .active_minutes
                    .unwrap_or_else(|| (w.end - w.start).num_seconds() as f64 / 60.0);
                IntervalSample::new(w.start, w.end, minutes)
            })
            .collect();
        let sleep: Vec<IntervalSample> = payload
            .sleep
            .into_iter()
            .map(|s| IntervalSample::new(s.start, s.end, 0.0))
            .collect();

        let count = exercise.len() + sleep.len();
        debug!(count, "cloud payload parsed");

        let mut held = self.write();
        held.exercise = exercise;
        held.sleep = sleep;
        held.loaded = true;
        Ok(count)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, ParsedSamples> {
        match self.samples.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, ParsedSamples> {
        match self.samples.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl HealthDataSource for CloudApiSource {
    fn name(&self) -> &'static str {
        "cloud_api"
    }

    async fn check_availability(&self) -> bool {
        true
    }

    /// Access was implicitly granted when the host fetched the payload.
    async fn request_permissions(&self) -> Result<bool, SourceError> {
        Ok(true)
    }

    async fn query_exercise_samples(
        &self,
        range: &TimeRange,
    ) -> Result<Vec<IntervalSample>, SourceError> {
        let held = self.read();
        Ok(held
            .exercise
            .iter()
            .filter(|s| range.overlaps(s.start, s.end))
            .cloned()
            .collect())
    }

    async fn query_sleep_samples(
        &self,
        range: &TimeRange,
    ) -> Result<Vec<IntervalSample>, SourceError> {
        let held = self.read();
        Ok(held
            .sleep
            .iter()
            .filter(|s| range.overlaps(s.start, s.end))
            .cloned()
            .collect())
    }
}

//! Health data sources
//!
//! This module defines the capability interface the engine aggregates over,
//! and its three variants: the on-device store, the fitness-cloud payload
//! adapter, and the unavailable stub. The composition root picks exactly one
//! variant per process from [`SourcePlatform`] and injects it into the facade.

mod cloud_api;
mod device_store;
mod unavailable;

pub use cloud_api::CloudApiSource;
pub use device_store::DeviceStoreSource;
pub use unavailable::UnavailableSource;

use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::SourceError;
use crate::time_range::TimeRange;
use crate::types::IntervalSample;

/// Backend selector. Serialized form matches the configuration file keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourcePlatform {
    DeviceStore,
    CloudApi,
    Unavailable,
}

impl SourcePlatform {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourcePlatform::DeviceStore => "device_store",
            SourcePlatform::CloudApi => "cloud_api",
            SourcePlatform::Unavailable => "unavailable",
        }
    }
}

impl FromStr for SourcePlatform {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "device_store" | "device-store" => Ok(SourcePlatform::DeviceStore),
            "cloud_api" | "cloud-api" => Ok(SourcePlatform::CloudApi),
            "unavailable" => Ok(SourcePlatform::Unavailable),
            other => Err(SourceError::UnknownPlatform(other.to_string())),
        }
    }
}

/// Capability interface over raw sample storage.
///
/// Implementations are interchangeable behind `Arc<dyn HealthDataSource>`.
/// Queries may fail; the facade converts every failure into the zero-valued
/// stats object, so implementors should report errors honestly rather than
/// papering over them.
#[async_trait]
pub trait HealthDataSource: Send + Sync {
    /// Short identifier used in log output.
    fn name(&self) -> &'static str;

    /// Whether a backend exists at all in this environment.
    async fn check_availability(&self) -> bool;

    /// Request read access. May prompt the user on first call; callable
    /// repeatedly.
    async fn request_permissions(&self) -> Result<bool, SourceError>;

    /// Exercise intervals overlapping the window, quantity in minutes.
    async fn query_exercise_samples(
        &self,
        range: &TimeRange,
    ) -> Result<Vec<IntervalSample>, SourceError>;

    /// Sleep-stage intervals overlapping the window.
    async fn query_sleep_samples(
        &self,
        range: &TimeRange,
    ) -> Result<Vec<IntervalSample>, SourceError>;

    /// Mood/valence samples. No backend records these yet; every variant
    /// returns an empty set.
    async fn query_mood_samples(
        &self,
        range: &TimeRange,
    ) -> Result<Vec<IntervalSample>, SourceError> {
        let _ = range;
        Ok(Vec::new())
    }
}

/// Build the variant for a configured platform.
///
/// Selection happens once at the composition root; the returned source is
/// shared for the remainder of the process via `Arc` cloning.
pub fn select_source(platform: SourcePlatform) -> Arc<dyn HealthDataSource> {
    match platform {
        SourcePlatform::DeviceStore => Arc::new(DeviceStoreSource::new()),
        SourcePlatform::CloudApi => Arc::new(CloudApiSource::new()),
        SourcePlatform::Unavailable => Arc::new(UnavailableSource),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_platform_from_str() {
        assert_eq!(
            "device_store".parse::<SourcePlatform>().unwrap(),
            SourcePlatform::DeviceStore
        );
        assert_eq!(
            "cloud-api".parse::<SourcePlatform>().unwrap(),
            SourcePlatform::CloudApi
        );
        assert!("watch".parse::<SourcePlatform>().is_err());
    }

    #[tokio::test]
    async fn test_select_source_names() {
        for (platform, name) in [
            (SourcePlatform::DeviceStore, "device_store"),
            (SourcePlatform::CloudApi, "cloud_api"),
            (SourcePlatform::Unavailable, "unavailable"),
        ] {
            let source = select_source(platform);
            assert_eq!(source.name(), name);
        }
    }
}

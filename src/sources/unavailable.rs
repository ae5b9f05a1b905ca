//! Unavailable stub
//!
//! Selected on platforms with no health backend. Reports no availability and
//! no permission, so the facade answers every query with the zero-valued
//! sentinel stats.

use async_trait::async_trait;

use crate::error::SourceError;
use crate::sources::HealthDataSource;
use crate::time_range::TimeRange;
use crate::types::IntervalSample;

/// The "no data available" variant.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableSource;

#[async_trait]
impl HealthDataSource for UnavailableSource {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    async fn check_availability(&self) -> bool {
        false
    }

    async fn request_permissions(&self) -> Result<bool, SourceError> {
        Ok(false)
    }

    async fn query_exercise_samples(
        &self,
        _range: &TimeRange,
    ) -> Result<Vec<IntervalSample>, SourceError> {
        Ok(Vec::new())
    }

    async fn query_sleep_samples(
        &self,
        _range: &TimeRange,
    ) -> Result<Vec<IntervalSample>, SourceError> {
        Ok(Vec::new())
    }
}

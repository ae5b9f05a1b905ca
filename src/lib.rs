//! Vitalflow - On-device aggregation engine for periodic health statistics
//!
//! Vitalflow turns raw streams of time-stamped exercise and sleep interval
//! samples into bounded, periodic summary statistics: trailing-window
//! averages, circular mean clock times, and session segmentation, behind a
//! time-bounded cache and a configuration-selected data source.
//!
//! ## Modules
//!
//! - **Aggregation core**: session segmentation, circular clock-time means,
//!   exercise and sleep reducers over day-aligned trailing windows
//! - **Sources**: the `HealthDataSource` capability trait with the device
//!   store, cloud payload and unavailable variants
//! - **Facade**: per-period query methods, TTL caching, and the textual
//!   summary; total at the boundary (failures become zero-valued stats)

pub mod cache;
pub mod circular;
pub mod error;
pub mod exercise;
pub mod facade;
pub mod segmenter;
pub mod sleep;
pub mod sources;
pub mod time_range;
pub mod types;

pub use cache::{CachedStats, StatsCache, CACHE_TTL_MINUTES};
pub use circular::mean_clock_time;
pub use error::SourceError;
pub use exercise::ExerciseAggregator;
pub use facade::{HealthFacade, MONTH_DAYS, WEEK_DAYS};
pub use segmenter::{day_key, segment_sessions, SESSION_GAP_HOURS, WAKE_ATTRIBUTION_HOUR};
pub use sleep::SleepAggregator;
pub use sources::{
    select_source, CloudApiSource, DeviceStoreSource, HealthDataSource, SourcePlatform,
    UnavailableSource,
};
pub use time_range::TimeRange;
pub use types::{
    DailySleepRecord, ExerciseStats, IntervalSample, MentalHealthStats, Session, SleepStats,
    StatKind,
};

/// Engine version embedded in CLI output
pub const VITALFLOW_VERSION: &str = env!("CARGO_PKG_VERSION");

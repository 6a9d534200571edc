pub mod client;
pub mod models;

use chrono::{DateTime, SecondsFormat, Utc};
use std::future::Future;

pub use client::WeatherApiClient;

use crate::config::Config;
use crate::error::AppResult;
use crate::model::{Alert, DailyRollup, ForecastPeriod, NeighborSample, Sample};
use crate::view::TimeWindow;

/// The reads issued by one refresh cycle.
///
/// Implemented by [`WeatherApiClient`]; tests substitute scripted sources.
pub trait WeatherSource: Send + Sync + 'static {
    fn current(&self, station: &str) -> impl Future<Output = AppResult<Option<Sample>>> + Send;

    fn history(
        &self,
        station: &str,
        query: &HistoryQuery,
    ) -> impl Future<Output = AppResult<Vec<Sample>>> + Send;

    fn daily(&self, station: &str, days: u32)
    -> impl Future<Output = AppResult<Vec<DailyRollup>>> + Send;

    fn alerts(&self, station: &str) -> impl Future<Output = AppResult<Vec<Alert>>> + Send;

    fn nearby(&self, station: &str) -> impl Future<Output = AppResult<Vec<NeighborSample>>> + Send;

    fn forecast(&self, station: &str)
    -> impl Future<Output = AppResult<Vec<ForecastPeriod>>> + Send;
}

/// Row caps and rollup depth applied to every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestLimits {
    pub history_limit: u32,
    pub history_limit_absolute: u32,
    pub daily_days: u32,
}

impl RequestLimits {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            history_limit: config.history_limit,
            history_limit_absolute: config.history_limit_absolute,
            daily_days: config.daily_days,
        }
    }
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self {
            history_limit: 500,
            history_limit_absolute: 1000,
            daily_days: 30,
        }
    }
}

/// Parameters of the `/api/history` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryQuery {
    Relative {
        hours: u32,
        limit: u32,
    },
    Absolute {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        limit: u32,
    },
}

impl HistoryQuery {
    #[must_use]
    pub fn for_window(window: &TimeWindow, limits: &RequestLimits) -> Self {
        match *window {
            TimeWindow::Relative { hours } => Self::Relative {
                hours,
                limit: limits.history_limit,
            },
            TimeWindow::Absolute { start, end } => Self::Absolute {
                start,
                end,
                limit: limits.history_limit_absolute,
            },
        }
    }

    /// Query-string pairs; instants are encoded as ISO-8601 UTC with milliseconds.
    #[must_use]
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match *self {
            Self::Relative { hours, limit } => {
                vec![("hours", hours.to_string()), ("limit", limit.to_string())]
            }
            Self::Absolute { start, end, limit } => vec![
                ("start", start.to_rfc3339_opts(SecondsFormat::Millis, true)),
                ("end", end.to_rfc3339_opts(SecondsFormat::Millis, true)),
                ("limit", limit.to_string()),
            ],
        }
    }
}

//! Shared fixtures for integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use wx_dashboard::api::{HistoryQuery, WeatherSource};
use wx_dashboard::error::{AppError, AppResult};
use wx_dashboard::model::{Alert, DailyRollup, ForecastPeriod, NeighborSample, Sample};

pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
}

/// `n` samples five minutes apart starting at [`t0`], temperature rising by one degree.
pub fn series(n: usize) -> Vec<Sample> {
    (0..n)
        .map(|i| {
            let mut s = Sample::empty(t0() + TimeDelta::minutes(5 * i as i64));
            s.temperature_f = Some(60.0 + i as f64);
            s.pressure_in = Some(29.92);
            s
        })
        .collect()
}

pub fn with_pressure(values: &[f64]) -> Vec<Sample> {
    values
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let mut s = Sample::empty(t0() + TimeDelta::minutes(i as i64));
            s.pressure_in = Some(*p);
            s
        })
        .collect()
}

/// Scripted source: every read returns the configured value, or fails when
/// `fail` is set. Calls are counted and history queries recorded.
#[derive(Default)]
pub struct ScriptedSource {
    pub current: Option<Sample>,
    pub history: Vec<Sample>,
    pub daily: Vec<DailyRollup>,
    pub alerts: Vec<Alert>,
    pub nearby: Vec<NeighborSample>,
    pub forecast: Vec<ForecastPeriod>,
    pub fail: bool,
    pub cycles: AtomicUsize,
    pub queries: Mutex<Vec<HistoryQuery>>,
}

impl ScriptedSource {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn cycles(&self) -> usize {
        self.cycles.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<HistoryQuery> {
        self.queries.lock().unwrap().last().copied()
    }

    fn reply<T: Clone>(&self, value: &T) -> AppResult<T> {
        if self.fail {
            Err(AppError::Api("HTTP 503 Service Unavailable: down".to_string()))
        } else {
            Ok(value.clone())
        }
    }
}

impl WeatherSource for ScriptedSource {
    async fn current(&self, _station: &str) -> AppResult<Option<Sample>> {
        self.cycles.fetch_add(1, Ordering::SeqCst);
        self.reply(&self.current)
    }

    async fn history(&self, _station: &str, query: &HistoryQuery) -> AppResult<Vec<Sample>> {
        self.queries.lock().unwrap().push(*query);
        self.reply(&self.history)
    }

    async fn daily(&self, _station: &str, _days: u32) -> AppResult<Vec<DailyRollup>> {
        self.reply(&self.daily)
    }

    async fn alerts(&self, _station: &str) -> AppResult<Vec<Alert>> {
        self.reply(&self.alerts)
    }

    async fn nearby(&self, _station: &str) -> AppResult<Vec<NeighborSample>> {
        self.reply(&self.nearby)
    }

    async fn forecast(&self, _station: &str) -> AppResult<Vec<ForecastPeriod>> {
        self.reply(&self.forecast)
    }
}

pub fn shared(source: ScriptedSource) -> Arc<ScriptedSource> {
    Arc::new(source)
}

//! One refresh cycle: fan out every read, absorb per-source failures, merge.

use chrono::Utc;
use std::fmt::Display;
use std::sync::Arc;

use crate::api::{HistoryQuery, RequestLimits, WeatherSource};
use crate::error::AppResult;
use crate::model::ViewSnapshot;
use crate::view::ViewState;

/// Run every request of a cycle concurrently and merge the results.
///
/// Never fails: a source that errors contributes its empty default and the
/// failure is logged. When the window is absolute and history came back
/// non-empty, the last historical sample stands in for the current reading
/// and the snapshot is marked not live.
pub async fn run_cycle<S: WeatherSource>(
    source: &S,
    state: &ViewState,
    limits: &RequestLimits,
    cycle: u64,
) -> ViewSnapshot {
    let station = state.station_id();
    let window = state.time_window();
    let query = HistoryQuery::for_window(&window, limits);

    tracing::debug!(cycle, station, ?query, "Starting refresh cycle");

    let (current, history, daily, alerts, nearby, forecast) = futures::join!(
        source.current(station),
        source.history(station, &query),
        source.daily(station, limits.daily_days),
        source.alerts(station),
        source.nearby(station),
        source.forecast(station),
    );

    let mut latest = or_default(cycle, "current", current);
    let series: Arc<[_]> = or_default(cycle, "history", history).into();
    let mut live = true;

    if window.is_absolute()
        && let Some(last) = series.last()
    {
        latest = Some(last.clone());
        live = false;
    }

    let snapshot = ViewSnapshot {
        cycle,
        station_id: station.to_string(),
        latest,
        series,
        daily: or_default(cycle, "daily", daily),
        alerts: or_default(cycle, "alerts", alerts),
        nearby: or_default(cycle, "nearby", nearby),
        forecast: or_default(cycle, "forecast", forecast),
        live,
        fetched_at: Utc::now(),
    };

    if snapshot.has_observations() {
        tracing::debug!(
            cycle,
            samples = snapshot.series.len(),
            live = snapshot.live,
            "Refresh cycle complete"
        );
    } else {
        tracing::info!(cycle, station, "No observations for station yet");
    }

    snapshot
}

fn or_default<T: Default>(cycle: u64, source: &'static str, result: AppResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(e) => {
            log_source_failure(cycle, source, &e, e.is_rate_limited());
            T::default()
        }
    }
}

fn log_source_failure(cycle: u64, source: &'static str, error: &impl Display, rate_limited: bool) {
    if rate_limited {
        tracing::warn!(cycle, source, "Source rate limited, using empty result");
    } else {
        tracing::warn!(cycle, source, error = %error, "Source failed, using empty result");
    }
}

/// Monotonic cycle counter deciding which snapshots may be applied.
///
/// A snapshot commits only if no cycle started after it has committed
/// already, so a slow early cycle can never overwrite a newer view.
#[derive(Debug, Default)]
pub struct CycleGate {
    next: u64,
    last_committed: u64,
}

impl CycleGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the id of a cycle about to start. Ids start at 1.
    pub fn begin(&mut self) -> u64 {
        self.next += 1;
        self.next
    }

    /// Claim the view for `cycle`. Returns false if a newer cycle already holds it.
    pub fn try_commit(&mut self, cycle: u64) -> bool {
        if cycle > self.last_committed {
            self.last_committed = cycle;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn last_committed(&self) -> u64 {
        self.last_committed
    }
}

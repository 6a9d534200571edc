use chrono::Local;
use futures::future::BoxFuture;
use futures::stream::{FuturesUnordered, StreamExt};
use futures::FutureExt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior, interval, interval_at};

use crate::api::{RequestLimits, WeatherSource};
use crate::chart::{ChartSyncController, VisibleRange};
use crate::error::AppResult;
use crate::model::ViewSnapshot;
use crate::present::{Surface, bind_view, export};
use crate::sync::orchestrator::{CycleGate, run_cycle};
use crate::view::persist::save_view_state;
use crate::view::{Intent, PanelId, SettingsStore, ViewState};

/// Everything the dashboard reacts to besides its own timer.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Intent(Intent),
    /// A panel was dragged or wheeled and now shows `range`.
    PanOrZoom { panel: PanelId, range: VisibleRange },
    Zoom(f64),
    ResetZoom,
    Refresh,
    Export(PathBuf),
}

/// Owns the view state and every collaborator, and runs the refresh loop.
pub struct Dashboard<S: WeatherSource> {
    source: Arc<S>,
    limits: RequestLimits,
    state: ViewState,
    store: Box<dyn SettingsStore>,
    charts: ChartSyncController,
    surface: Box<dyn Surface>,
    gate: CycleGate,
    snapshot: Option<Arc<ViewSnapshot>>,
}

impl<S: WeatherSource> Dashboard<S> {
    pub fn new(
        source: Arc<S>,
        limits: RequestLimits,
        state: ViewState,
        store: Box<dyn SettingsStore>,
        charts: ChartSyncController,
        surface: Box<dyn Surface>,
    ) -> Self {
        Self {
            source,
            limits,
            state,
            store,
            charts,
            surface,
            gate: CycleGate::new(),
            snapshot: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    #[must_use]
    pub fn charts(&self) -> &ChartSyncController {
        &self.charts
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<&Arc<ViewSnapshot>> {
        self.snapshot.as_ref()
    }

    #[must_use]
    pub fn refresh_period(&self) -> Duration {
        Duration::from_millis(self.state.refresh_interval_ms())
    }

    /// Apply an intent, persist the result and update charts and surface.
    ///
    /// Returns whether the intent calls for an immediate refresh cycle.
    pub fn apply_intent(&mut self, intent: &Intent) -> bool {
        let next = self.state.apply(intent);
        if next == self.state {
            tracing::debug!(?intent, "Intent left view unchanged");
        }
        self.state = next;
        self.persist();

        if let Intent::SetSliderPosition(_) = intent {
            self.charts.on_scrub(self.state.slider_position_pct());
        }
        self.render();
        intent.triggers_refresh()
    }

    /// Returns whether the command calls for an immediate refresh cycle.
    pub fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Intent(intent) => self.apply_intent(&intent),
            Command::PanOrZoom { panel, range } => {
                self.charts.on_pan_or_zoom(panel, range);
                false
            }
            Command::Zoom(factor) => {
                self.charts.zoom(factor);
                false
            }
            Command::ResetZoom => {
                self.charts.reset();
                self.sync_slider();
                false
            }
            Command::Refresh => true,
            Command::Export(path) => {
                if let Err(e) = self.export(&path) {
                    tracing::error!(error = %e, path = %path.display(), "Export failed");
                }
                false
            }
        }
    }

    /// Start a cycle against the current state. The returned future owns
    /// everything it needs, so intents applied meanwhile cannot leak into it.
    pub fn begin_cycle(&mut self) -> BoxFuture<'static, ViewSnapshot> {
        let cycle = self.gate.begin();
        let source = self.source.clone();
        let state = self.state.clone();
        let limits = self.limits;
        async move { run_cycle(source.as_ref(), &state, &limits, cycle).await }.boxed()
    }

    /// Apply a finished cycle unless a newer one has already been applied.
    pub fn commit(&mut self, snapshot: ViewSnapshot) -> bool {
        if !self.gate.try_commit(snapshot.cycle) {
            tracing::debug!(
                cycle = snapshot.cycle,
                last_committed = self.gate.last_committed(),
                "Discarding stale cycle"
            );
            return false;
        }

        let snapshot = Arc::new(snapshot);
        if !self.charts.is_bound_to(&snapshot.series) {
            self.charts.bind(snapshot.series.clone());
            self.sync_slider();
        }
        tracing::debug!(cycle = snapshot.cycle, "Committed cycle");
        self.snapshot = Some(snapshot);
        self.render();
        true
    }

    /// Run one cycle to completion and commit it.
    pub async fn refresh_now(&mut self) -> bool {
        let snapshot = self.begin_cycle().await;
        self.commit(snapshot)
    }

    /// Drive the dashboard until `shutdown` resolves.
    ///
    /// The timer fires immediately, then every refresh interval. Changing the
    /// interval replaces the timer, so only one is ever armed. A closed command
    /// channel only stops command handling; cycles keep running on the timer.
    pub async fn run(
        &mut self,
        mut commands: mpsc::Receiver<Command>,
        shutdown: impl Future<Output = ()>,
    ) {
        let mut period = self.refresh_period();
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut in_flight = FuturesUnordered::new();
        let mut input_open = true;
        tokio::pin!(shutdown);

        tracing::info!(
            station = self.state.station_id(),
            interval_ms = self.state.refresh_interval_ms(),
            "Starting refresh loop"
        );

        loop {
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!(in_flight = in_flight.len(), "Stopping refresh loop");
                    break;
                }
                _ = ticker.tick() => {
                    in_flight.push(self.begin_cycle());
                }
                command = commands.recv(), if input_open => {
                    let Some(command) = command else {
                        tracing::info!("Command channel closed, refreshing on timer only");
                        input_open = false;
                        continue;
                    };
                    if self.handle(command) {
                        in_flight.push(self.begin_cycle());
                    }
                    let next = self.refresh_period();
                    if next != period {
                        period = next;
                        ticker = interval_at(Instant::now() + period, period);
                        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
                        tracing::debug!(interval_ms = self.state.refresh_interval_ms(), "Refresh timer re-armed");
                    }
                }
                Some(snapshot) = in_flight.next(), if !in_flight.is_empty() => {
                    self.commit(snapshot);
                }
            }
        }
    }

    fn export(&self, path: &std::path::Path) -> AppResult<usize> {
        let series = self
            .snapshot
            .as_ref()
            .map(|s| s.series.clone())
            .unwrap_or_else(|| Arc::from(Vec::new()));
        export::export_to_path(
            path,
            &series,
            self.charts.visible_range().as_ref(),
            self.state.unit_system(),
        )
    }

    fn sync_slider(&mut self) {
        let pct = self.charts.slider_position_pct();
        if pct != self.state.slider_position_pct() {
            self.state = self.state.apply(&Intent::SetSliderPosition(pct));
            self.persist();
        }
    }

    fn persist(&mut self) {
        if let Err(e) = save_view_state(self.store.as_mut(), &self.state) {
            tracing::warn!(error = %e, "Failed to persist view state");
        }
    }

    fn render(&mut self) {
        if let Some(snapshot) = &self.snapshot {
            let view = bind_view(snapshot, &self.state, &Local);
            self.surface.render(&view);
        }
    }
}

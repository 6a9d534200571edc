//! Shared visible range across chart panels and the scrub control.
//!
//! Phases:
//!
//! | Phase | Meaning |
//! |-------|---------|
//! | `Idle` | no series with at least two samples is bound |
//! | `Bound` | every panel shows the canonical range |
//! | `Interacting` | a gesture from one source is being propagated |
//!
//! Propagation is synchronous under `&mut self`, so `Interacting` only lasts
//! for the duration of one call. Echoes (a panel reporting back the range it
//! was just given) compare equal to the canonical range and are dropped.

use chrono::TimeDelta;
use std::sync::Arc;

use crate::chart::panel::{ChartPanel, VisibleRange};
use crate::model::Sample;
use crate::view::PanelId;
use crate::view::state::DEFAULT_SLIDER_PCT;

/// Fewest samples a scrub window covers.
pub const MIN_SCRUB_WINDOW: usize = 5;

/// Narrowest span a zoom may reach, unless the whole series is shorter.
pub const MIN_ZOOM_SPAN: TimeDelta = TimeDelta::hours(1);

/// Where a gesture came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureSource {
    Panel(PanelId),
    Scrub,
    Zoom,
    Reset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    Idle,
    Bound,
    Interacting(GestureSource),
}

pub struct ChartSyncController {
    panels: Vec<Box<dyn ChartPanel>>,
    phase: SyncPhase,
    series: Arc<[Sample]>,
    visible: Option<VisibleRange>,
    slider_pct: f64,
}

impl ChartSyncController {
    #[must_use]
    pub fn new(panels: Vec<Box<dyn ChartPanel>>) -> Self {
        Self {
            panels,
            phase: SyncPhase::Idle,
            series: Arc::from(Vec::new()),
            visible: None,
            slider_pct: DEFAULT_SLIDER_PCT,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    #[must_use]
    pub fn visible_range(&self) -> Option<VisibleRange> {
        self.visible
    }

    #[must_use]
    pub fn slider_position_pct(&self) -> f64 {
        self.slider_pct
    }

    #[must_use]
    pub fn panels(&self) -> &[Box<dyn ChartPanel>] {
        &self.panels
    }

    /// Whether `series` is the exact allocation currently bound.
    #[must_use]
    pub fn is_bound_to(&self, series: &Arc<[Sample]>) -> bool {
        Arc::ptr_eq(&self.series, series)
    }

    /// Full span of the bound series, oldest to newest sample.
    #[must_use]
    pub fn full_range(&self) -> Option<VisibleRange> {
        match (self.series.first(), self.series.last()) {
            (Some(first), Some(last)) if self.series.len() >= 2 => {
                Some(VisibleRange::new(first.timestamp, last.timestamp))
            }
            _ => None,
        }
    }

    /// Bind a freshly fetched series. Any zoom in progress is discarded.
    pub fn bind(&mut self, series: Arc<[Sample]>) {
        self.series = series;
        self.slider_pct = DEFAULT_SLIDER_PCT;

        let Some(full) = self.full_range() else {
            tracing::debug!(samples = self.series.len(), "Series too short to chart");
            self.phase = SyncPhase::Idle;
            self.visible = None;
            return;
        };

        self.visible = Some(full);
        self.apply_to_panels(&full, None);
        self.phase = SyncPhase::Bound;
        tracing::debug!(samples = self.series.len(), min = %full.min, max = %full.max, "Charts bound");
    }

    /// A panel was panned or zoomed by the user and already shows `range`.
    ///
    /// Returns whether the canonical range changed.
    pub fn on_pan_or_zoom(&mut self, origin: PanelId, range: VisibleRange) -> bool {
        if self.phase == SyncPhase::Idle {
            return false;
        }
        let range = VisibleRange::new(range.min, range.max);
        if self.visible == Some(range) {
            return false;
        }
        self.propagate(GestureSource::Panel(origin), range);
        true
    }

    /// Move the scrub control. Returns whether the canonical range changed.
    pub fn on_scrub(&mut self, pct: f64) -> bool {
        if self.phase == SyncPhase::Idle || !pct.is_finite() {
            return false;
        }
        let pct = pct.clamp(0.0, 100.0);
        let (start, end) = scrub_window(self.series.len(), pct);
        let range = VisibleRange::new(self.series[start].timestamp, self.series[end].timestamp);

        self.slider_pct = pct;
        if self.visible == Some(range) {
            return false;
        }
        self.propagate(GestureSource::Scrub, range);
        true
    }

    /// Back to the full span with the scrub control at 100%.
    pub fn reset(&mut self) {
        if self.phase == SyncPhase::Idle {
            return;
        }
        let Some(full) = self.full_range() else {
            return;
        };
        self.slider_pct = DEFAULT_SLIDER_PCT;
        self.propagate(GestureSource::Reset, full);
    }

    /// Scale the visible span around its centre; `factor > 1` zooms out.
    ///
    /// The span stays within `[min(1h, full span), full span]` and the window
    /// is shifted back inside the series extent.
    pub fn zoom(&mut self, factor: f64) -> bool {
        if self.phase == SyncPhase::Idle || !factor.is_finite() || factor <= 0.0 {
            return false;
        }
        let (Some(current), Some(full)) = (self.visible, self.full_range()) else {
            return false;
        };

        let full_ms = full.span().num_milliseconds();
        let min_ms = MIN_ZOOM_SPAN.num_milliseconds().min(full_ms);
        #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
        let span_ms = ((current.span().num_milliseconds() as f64 * factor).round() as i64)
            .clamp(min_ms, full_ms);
        let span = TimeDelta::milliseconds(span_ms);

        let center = current.min + current.span() / 2;
        let mut min = center - span / 2;
        let mut max = min + span;
        if min < full.min {
            min = full.min;
            max = (min + span).min(full.max);
        }
        if max > full.max {
            max = full.max;
            min = (max - span).max(full.min);
        }

        let range = VisibleRange::new(min, max);
        if self.visible == Some(range) {
            return false;
        }
        self.propagate(GestureSource::Zoom, range);
        true
    }

    fn propagate(&mut self, source: GestureSource, range: VisibleRange) {
        self.phase = SyncPhase::Interacting(source);
        self.visible = Some(range);
        let skip = match source {
            GestureSource::Panel(origin) => Some(origin),
            _ => None,
        };
        self.apply_to_panels(&range, skip);
        self.phase = SyncPhase::Bound;
        tracing::debug!(?source, min = %range.min, max = %range.max, "Visible range synced");
    }

    fn apply_to_panels(&mut self, range: &VisibleRange, skip: Option<PanelId>) {
        for panel in &mut self.panels {
            if Some(panel.id()) != skip {
                panel.set_visible_range(range);
            }
        }
    }
}

/// Index bounds `(start, end)` (inclusive) of the scrub window over a series
/// of `len` samples at `pct` percent.
///
/// The window holds `max(5, floor(len / 5))` samples (never more than `len`),
/// centred on `floor(pct / 100 * (len - 1))` and clamped inside the series.
#[must_use]
pub fn scrub_window(len: usize, pct: f64) -> (usize, usize) {
    if len == 0 {
        return (0, 0);
    }
    let width = (len / 5).max(MIN_SCRUB_WINDOW).min(len);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let center = ((pct.clamp(0.0, 100.0) / 100.0) * (len - 1) as f64).floor() as usize;
    let start = center.saturating_sub(width / 2).min(len - width);
    (start, start + width - 1)
}

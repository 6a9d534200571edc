use chrono::{DateTime, TimeDelta, Utc};
use std::sync::{Arc, Mutex};

use crate::view::PanelId;

/// Time span shown on the x axis of every synchronised panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
    pub min: DateTime<Utc>,
    pub max: DateTime<Utc>,
}

impl VisibleRange {
    /// Build a range, swapping the bounds if they arrive reversed.
    #[must_use]
    pub fn new(a: DateTime<Utc>, b: DateTime<Utc>) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    #[must_use]
    pub fn span(&self) -> TimeDelta {
        self.max - self.min
    }

    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.min <= at && at <= self.max
    }
}

/// One chart panel as seen by the sync controller.
///
/// Implementations wrap whatever draws the chart. `set_visible_range` is only
/// called by the controller; a panel reports its own user gestures back
/// through `ChartSyncController::on_pan_or_zoom`.
pub trait ChartPanel: Send {
    fn id(&self) -> PanelId;

    fn set_visible_range(&mut self, range: &VisibleRange);

    fn visible_range(&self) -> Option<VisibleRange>;
}

#[derive(Debug, Default)]
struct PanelRecord {
    range: Option<VisibleRange>,
    applied: usize,
}

/// Headless panel that records what it was told to show.
///
/// Clones share the same record, so a handle kept outside the controller
/// sees every application.
#[derive(Debug, Clone)]
pub struct MemoryPanel {
    id: PanelId,
    record: Arc<Mutex<PanelRecord>>,
}

impl MemoryPanel {
    #[must_use]
    pub fn new(id: PanelId) -> Self {
        Self {
            id,
            record: Arc::new(Mutex::new(PanelRecord::default())),
        }
    }

    /// Number of times the controller applied a range to this panel.
    #[must_use]
    pub fn applied_count(&self) -> usize {
        self.record.lock().map_or(0, |r| r.applied)
    }

    /// A user drag or wheel on this panel: the range changes locally without
    /// counting as an application.
    pub fn gesture(&self, range: VisibleRange) {
        if let Ok(mut record) = self.record.lock() {
            record.range = Some(range);
        }
    }
}

impl ChartPanel for MemoryPanel {
    fn id(&self) -> PanelId {
        self.id
    }

    fn set_visible_range(&mut self, range: &VisibleRange) {
        if let Ok(mut record) = self.record.lock() {
            record.range = Some(*range);
            record.applied += 1;
        }
    }

    fn visible_range(&self) -> Option<VisibleRange> {
        self.record.lock().ok()?.range
    }
}

pub mod controller;
pub mod panel;

pub use controller::{ChartSyncController, GestureSource, SyncPhase, scrub_window};
pub use panel::{ChartPanel, MemoryPanel, VisibleRange};

//! Chart synchronisation state machine tests.
//!
//! Run with: cargo test --test chart_sync_test

mod common;

use chrono::TimeDelta;
use std::sync::Arc;
use wx_dashboard::chart::{
    ChartPanel, ChartSyncController, MemoryPanel, SyncPhase, VisibleRange, scrub_window,
};
use wx_dashboard::model::Sample;
use wx_dashboard::view::PanelId;

fn controller() -> (ChartSyncController, Vec<MemoryPanel>) {
    let panels: Vec<MemoryPanel> = [PanelId::Temperature, PanelId::Humidity, PanelId::Wind]
        .into_iter()
        .map(MemoryPanel::new)
        .collect();
    let boxed = panels
        .iter()
        .cloned()
        .map(|p| Box::new(p) as Box<dyn ChartPanel>)
        .collect();
    (ChartSyncController::new(boxed), panels)
}

fn bound(n: usize) -> (ChartSyncController, Vec<MemoryPanel>, Arc<[Sample]>) {
    let (mut sync, panels) = controller();
    let series: Arc<[Sample]> = common::series(n).into();
    sync.bind(series.clone());
    (sync, panels, series)
}

fn assert_all_panels_show(panels: &[MemoryPanel], expected: VisibleRange) {
    for panel in panels {
        assert_eq!(panel.visible_range(), Some(expected), "panel {:?}", panel.id());
    }
}

#[test]
fn bind_shows_full_span() {
    let (sync, panels, series) = bound(100);
    let full = VisibleRange::new(series[0].timestamp, series[99].timestamp);

    assert_eq!(sync.phase(), SyncPhase::Bound);
    assert_eq!(sync.visible_range(), Some(full));
    assert_eq!(sync.slider_position_pct(), 100.0);
    assert!(sync.is_bound_to(&series));
    assert_all_panels_show(&panels, full);
}

#[test]
fn short_series_stays_idle() {
    let (mut sync, panels) = controller();
    sync.bind(common::series(1).into());
    assert_eq!(sync.phase(), SyncPhase::Idle);
    assert_eq!(sync.visible_range(), None);

    // Gestures while idle do nothing
    let t = common::t0();
    assert!(!sync.on_pan_or_zoom(PanelId::Humidity, VisibleRange::new(t, t + TimeDelta::hours(1))));
    assert!(!sync.on_scrub(50.0));
    assert!(!sync.zoom(2.0));
    sync.reset();
    assert_eq!(sync.phase(), SyncPhase::Idle);
    assert!(panels.iter().all(|p| p.applied_count() == 0));
}

#[test]
fn scrub_centres_window() {
    let (mut sync, panels, series) = bound(100);
    assert_eq!(scrub_window(100, 50.0), (39, 58));

    assert!(sync.on_scrub(50.0));
    let expected = VisibleRange::new(series[39].timestamp, series[58].timestamp);
    assert_eq!(sync.visible_range(), Some(expected));
    assert_eq!(sync.slider_position_pct(), 50.0);
    assert_all_panels_show(&panels, expected);
}

#[test]
fn scrub_window_clamps_at_edges() {
    assert_eq!(scrub_window(100, 0.0), (0, 19));
    assert_eq!(scrub_window(100, 100.0), (80, 99));
    // Minimum width of five samples
    assert_eq!(scrub_window(10, 50.0), (2, 6));
    // Never wider than the series
    assert_eq!(scrub_window(3, 50.0), (0, 2));
}

#[test]
fn pan_is_not_reapplied_to_origin() {
    let (mut sync, panels, series) = bound(100);
    let before: Vec<usize> = panels.iter().map(MemoryPanel::applied_count).collect();

    let range = VisibleRange::new(series[10].timestamp, series[30].timestamp);
    panels[1].gesture(range);
    assert!(sync.on_pan_or_zoom(PanelId::Humidity, range));

    assert_eq!(sync.visible_range(), Some(range));
    assert_all_panels_show(&panels, range);
    assert_eq!(panels[0].applied_count(), before[0] + 1);
    assert_eq!(panels[1].applied_count(), before[1]);
    assert_eq!(panels[2].applied_count(), before[2] + 1);
}

#[test]
fn echoes_are_dropped() {
    let (mut sync, panels, series) = bound(100);
    let range = VisibleRange::new(series[10].timestamp, series[30].timestamp);
    panels[0].gesture(range);
    sync.on_pan_or_zoom(PanelId::Temperature, range);
    let counts: Vec<usize> = panels.iter().map(MemoryPanel::applied_count).collect();

    // Other panels report back the range they were given
    assert!(!sync.on_pan_or_zoom(PanelId::Humidity, range));
    assert!(!sync.on_pan_or_zoom(PanelId::Wind, range));
    let after: Vec<usize> = panels.iter().map(MemoryPanel::applied_count).collect();
    assert_eq!(counts, after);
}

#[test]
fn reversed_range_is_normalised() {
    let (mut sync, _panels, series) = bound(10);
    let (a, b) = (series[2].timestamp, series[6].timestamp);
    sync.on_pan_or_zoom(PanelId::Wind, VisibleRange { min: b, max: a });
    assert_eq!(sync.visible_range(), Some(VisibleRange { min: a, max: b }));
}

#[test]
fn reset_restores_full_span() {
    let (mut sync, panels, series) = bound(100);
    sync.on_scrub(20.0);
    sync.reset();

    let full = VisibleRange::new(series[0].timestamp, series[99].timestamp);
    assert_eq!(sync.visible_range(), Some(full));
    assert_eq!(sync.slider_position_pct(), 100.0);
    assert_eq!(sync.phase(), SyncPhase::Bound);
    assert_all_panels_show(&panels, full);
}

#[test]
fn rebinding_discards_zoom() {
    let (mut sync, panels, _) = bound(100);
    sync.on_scrub(10.0);

    let fresh: Arc<[Sample]> = common::series(50).into();
    sync.bind(fresh.clone());
    let full = VisibleRange::new(fresh[0].timestamp, fresh[49].timestamp);
    assert_eq!(sync.visible_range(), Some(full));
    assert_eq!(sync.slider_position_pct(), 100.0);
    assert_all_panels_show(&panels, full);
}

#[test]
fn zoom_scales_around_centre_and_clamps() {
    // 100 samples five minutes apart: 495 minutes of data
    let (mut sync, panels, series) = bound(100);
    let full = VisibleRange::new(series[0].timestamp, series[99].timestamp);

    // Zooming out of the full span changes nothing
    assert!(!sync.zoom(2.0));

    assert!(sync.zoom(0.5));
    let half = sync.visible_range().unwrap();
    assert_eq!(half.span(), full.span() / 2);
    assert_eq!(half.min + half.span() / 2, full.min + full.span() / 2);
    assert_all_panels_show(&panels, half);

    // Never narrower than an hour
    sync.zoom(0.01);
    assert_eq!(sync.visible_range().unwrap().span(), TimeDelta::hours(1));

    // Near an edge the window shifts back inside the data
    let edge = VisibleRange::new(series[0].timestamp, series[12].timestamp);
    sync.on_pan_or_zoom(PanelId::Temperature, edge);
    sync.zoom(4.0);
    let shifted = sync.visible_range().unwrap();
    assert_eq!(shifted.min, full.min);
    assert_eq!(shifted.span(), edge.span() * 4);
}

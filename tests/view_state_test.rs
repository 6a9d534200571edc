//! View state intents and persistence tests.
//!
//! Run with: cargo test --test view_state_test

mod common;

use chrono::TimeDelta;
use wx_dashboard::units::UnitSystem;
use wx_dashboard::view::persist::{load_view_state, save_view_state};
use wx_dashboard::view::state::{MAX_REFRESH_MS, MIN_REFRESH_MS};
use wx_dashboard::view::{
    CardId, FileStore, Intent, MemoryStore, PanelId, PersistedSettings, SETTINGS_KEY, Section,
    SettingsStore, TimeWindow, ViewDefaults, ViewState,
};

fn initial() -> ViewState {
    ViewState::new(&ViewDefaults::default())
}

#[test]
fn defaults() {
    let state = initial();
    assert_eq!(state.station_id(), "KALMILLP10");
    assert_eq!(state.time_window(), TimeWindow::Relative { hours: 24 });
    assert_eq!(state.unit_system(), UnitSystem::Fahrenheit);
    assert_eq!(state.visible_panels().len(), PanelId::ALL.len());
    assert_eq!(state.slider_position_pct(), 100.0);
}

#[test]
fn window_kinds_replace_each_other() {
    let start = common::t0();
    let end = start + TimeDelta::hours(6);

    let absolute = initial().apply(&Intent::SelectAbsoluteWindow { start, end });
    assert_eq!(absolute.time_window(), TimeWindow::Absolute { start, end });
    assert!(absolute.time_window().is_absolute());

    let relative = absolute.apply(&Intent::SelectRelativeWindow(48));
    assert_eq!(relative.time_window(), TimeWindow::Relative { hours: 48 });
}

#[test]
fn invalid_intents_keep_prior_state() {
    let state = initial().apply(&Intent::SelectRelativeWindow(6));
    let start = common::t0();

    assert_eq!(
        state.apply(&Intent::SelectAbsoluteWindow { start, end: start - TimeDelta::hours(1) }),
        state
    );
    assert_eq!(state.apply(&Intent::SelectAbsoluteWindow { start, end: start }), state);
    assert_eq!(state.apply(&Intent::SelectRelativeWindow(0)), state);
    assert_eq!(state.apply(&Intent::SelectStation("   ".to_string())), state);
    assert_eq!(state.apply(&Intent::SetRefreshInterval(0)), state);
    assert_eq!(state.apply(&Intent::SetSliderPosition(f64::NAN)), state);
}

#[test]
fn values_clamp_into_range() {
    let state = initial();
    assert_eq!(state.apply(&Intent::SetSliderPosition(140.0)).slider_position_pct(), 100.0);
    assert_eq!(state.apply(&Intent::SetSliderPosition(-3.0)).slider_position_pct(), 0.0);
    assert_eq!(
        state.apply(&Intent::SetRefreshInterval(1)).refresh_interval_ms(),
        MIN_REFRESH_MS
    );
    assert_eq!(
        state.apply(&Intent::SetRefreshInterval(u64::MAX)).refresh_interval_ms(),
        MAX_REFRESH_MS
    );
    assert_eq!(
        state.apply(&Intent::SelectRelativeWindow(100_000)).time_window(),
        TimeWindow::Relative { hours: 720 }
    );
}

#[test]
fn toggles() {
    let state = initial()
        .apply(&Intent::SelectStation(" kcasanfr5 ".to_string()))
        .apply(&Intent::ToggleUnit)
        .apply(&Intent::TogglePanel(PanelId::Solar))
        .apply(&Intent::ToggleCard(CardId::DewPoint))
        .apply(&Intent::ToggleSection(Section::Nearby));

    assert_eq!(state.station_id(), "KCASANFR5");
    assert_eq!(state.unit_system(), UnitSystem::Celsius);
    assert!(!state.is_panel_visible(PanelId::Solar));
    assert!(!state.is_card_visible(CardId::DewPoint));
    assert!(!state.sections().nearby);

    let back = state
        .apply(&Intent::ToggleUnit)
        .apply(&Intent::TogglePanel(PanelId::Solar));
    assert_eq!(back.unit_system(), UnitSystem::Fahrenheit);
    assert!(back.is_panel_visible(PanelId::Solar));
}

#[test]
fn refresh_triggering_intents() {
    assert!(Intent::SelectStation("X".to_string()).triggers_refresh());
    assert!(Intent::SelectRelativeWindow(6).triggers_refresh());
    assert!(Intent::ToggleUnit.triggers_refresh());
    assert!(!Intent::TogglePanel(PanelId::Uv).triggers_refresh());
    assert!(!Intent::SetSliderPosition(10.0).triggers_refresh());
    assert!(!Intent::SetRefreshInterval(10_000).triggers_refresh());
}

#[test]
fn persisted_state_round_trips() {
    let mut store = MemoryStore::new();
    let state = initial()
        .apply(&Intent::SelectStation("KTEST1".to_string()))
        .apply(&Intent::SelectRelativeWindow(6))
        .apply(&Intent::SetRefreshInterval(60_000))
        .apply(&Intent::ToggleUnit)
        .apply(&Intent::TogglePanel(PanelId::WindDirection))
        .apply(&Intent::ToggleCard(CardId::Solar))
        .apply(&Intent::ToggleSection(Section::Alerts));

    save_view_state(&mut store, &state).unwrap();
    let text = store.get(SETTINGS_KEY).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["station"], "KTEST1");
    assert_eq!(json["hours"], 6);
    assert_eq!(json["refreshMs"], 60_000);
    assert_eq!(json["useCelsius"], true);
    assert_eq!(json["hiddenCharts"], serde_json::json!(["wind-direction"]));
    assert_eq!(json["hiddenCards"], serde_json::json!(["solar"]));
    assert_eq!(json["hideAlerts"], true);
    assert_eq!(json["hideNearby"], false);

    let restored = load_view_state(&store, &ViewDefaults::default());
    assert_eq!(restored, state);
}

#[test]
fn absolute_window_is_not_persisted() {
    let mut store = MemoryStore::new();
    let start = common::t0();
    let state = initial().apply(&Intent::SelectAbsoluteWindow {
        start,
        end: start + TimeDelta::days(1),
    });
    save_view_state(&mut store, &state).unwrap();

    let restored = load_view_state(&store, &ViewDefaults::default());
    assert_eq!(restored.time_window(), TimeWindow::Relative { hours: 24 });
}

#[test]
fn malformed_settings_fall_back_to_defaults() {
    let defaults = ViewDefaults::default();

    let garbage = MemoryStore::with_entry(SETTINGS_KEY, "{not json");
    assert_eq!(load_view_state(&garbage, &defaults), ViewState::new(&defaults));

    let not_object = MemoryStore::with_entry(SETTINGS_KEY, "[1, 2, 3]");
    assert_eq!(load_view_state(&not_object, &defaults), ViewState::new(&defaults));

    // Mistyped fields fall back one by one; valid ones survive
    let partial = MemoryStore::with_entry(
        SETTINGS_KEY,
        r#"{"station": 42, "hours": "six", "useCelsius": true, "hiddenCharts": ["uv", "bogus", 7]}"#,
    );
    let state = load_view_state(&partial, &defaults);
    assert_eq!(state.station_id(), "KALMILLP10");
    assert_eq!(state.time_window(), TimeWindow::Relative { hours: 24 });
    assert_eq!(state.unit_system(), UnitSystem::Celsius);
    assert!(!state.is_panel_visible(PanelId::Uv));
    assert_eq!(state.visible_panels().len(), PanelId::ALL.len() - 1);
}

#[test]
fn settings_parse_is_lenient() {
    let settings = PersistedSettings::from_json(r#"{"refreshMs": -5, "hideDaily": "yes"}"#);
    assert_eq!(settings, PersistedSettings::default());
}

#[test]
fn file_store_persists_across_instances() {
    let dir = std::env::temp_dir().join(format!("wx-dashboard-test-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("settings.json");
    let _ = std::fs::remove_file(&path);

    let mut store = FileStore::new(&path);
    assert_eq!(store.load(SETTINGS_KEY).unwrap(), None);
    store.save(SETTINGS_KEY, r#"{"station":"KFILE"}"#).unwrap();
    store.save("other", "1").unwrap();

    let reopened = FileStore::new(&path);
    assert_eq!(
        reopened.load(SETTINGS_KEY).unwrap().as_deref(),
        Some(r#"{"station":"KFILE"}"#)
    );
    assert_eq!(
        load_view_state(&reopened, &ViewDefaults::default()).station_id(),
        "KFILE"
    );

    std::fs::write(&path, "corrupt").unwrap();
    assert_eq!(FileStore::new(&path).load(SETTINGS_KEY).unwrap(), None);

    let _ = std::fs::remove_dir_all(&dir);
}

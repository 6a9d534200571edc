//! Persistence of the view state to a key-value store.
//!
//! The whole state lives under one fixed key as a JSON object. Reading is
//! lenient field by field: a missing or mistyped field falls back to its
//! default, and unparseable JSON is treated as absent.

use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::{AppError, AppResult};
use crate::units::UnitSystem;
use crate::view::state::{CardId, PanelId, TimeWindow, ViewDefaults, ViewState, DEFAULT_HOURS};

/// Key the view state is stored under.
pub const SETTINGS_KEY: &str = "wx_settings";

/// Minimal string key-value store, the shape of the browser's local storage.
pub trait SettingsStore: Send {
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn load(&self, key: &str) -> AppResult<Option<String>>;

    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn save(&mut self, key: &str, value: &str) -> AppResult<()>;
}

/// Wire shape of the persisted settings object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSettings {
    pub station: Option<String>,
    pub hours: Option<u32>,
    pub refresh_ms: Option<u64>,
    pub use_celsius: Option<bool>,
    pub hidden_cards: Vec<CardId>,
    pub hidden_charts: Vec<PanelId>,
    pub hide_nearby: Option<bool>,
    pub hide_daily: Option<bool>,
    pub hide_alerts: Option<bool>,
}

impl PersistedSettings {
    /// Parse stored text; anything unusable becomes "not set".
    #[must_use]
    pub fn from_json(text: &str) -> Self {
        let Ok(Value::Object(map)) = serde_json::from_str::<Value>(text) else {
            return Self::default();
        };

        let string = |k: &str| {
            map.get(k)
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string)
        };
        let boolean = |k: &str| map.get(k).and_then(Value::as_bool);
        let ids = |k: &str| -> Vec<String> {
            map.get(k)
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default()
        };

        Self {
            station: string("station"),
            hours: map
                .get("hours")
                .and_then(Value::as_u64)
                .and_then(|h| u32::try_from(h).ok()),
            refresh_ms: map.get("refreshMs").and_then(Value::as_u64),
            use_celsius: boolean("useCelsius"),
            hidden_cards: ids("hiddenCards")
                .iter()
                .filter_map(|id| CardId::parse(id))
                .collect(),
            hidden_charts: ids("hiddenCharts")
                .iter()
                .filter_map(|id| PanelId::parse(id))
                .collect(),
            hide_nearby: boolean("hideNearby"),
            hide_daily: boolean("hideDaily"),
            hide_alerts: boolean("hideAlerts"),
        }
    }

    /// Snapshot of a view state. Absolute windows are not persisted.
    #[must_use]
    pub fn from_view(state: &ViewState) -> Self {
        let hours = match state.time_window() {
            TimeWindow::Relative { hours } => hours,
            TimeWindow::Absolute { .. } => DEFAULT_HOURS,
        };
        let sections = state.sections();
        Self {
            station: Some(state.station_id().to_string()),
            hours: Some(hours),
            refresh_ms: Some(state.refresh_interval_ms()),
            use_celsius: Some(state.unit_system() == UnitSystem::Celsius),
            hidden_cards: state.hidden_cards().iter().copied().collect(),
            hidden_charts: hidden_panels(state).into_iter().collect(),
            hide_nearby: Some(!sections.nearby),
            hide_daily: Some(!sections.daily),
            hide_alerts: Some(!sections.alerts),
        }
    }
}

/// Restore the view state from the store. Never fails.
pub fn load_view_state(store: &dyn SettingsStore, defaults: &ViewDefaults) -> ViewState {
    let settings = match store.load(SETTINGS_KEY) {
        Ok(Some(text)) => PersistedSettings::from_json(&text),
        Ok(None) => PersistedSettings::default(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to read persisted settings, using defaults");
            PersistedSettings::default()
        }
    };
    ViewState::restore(defaults, &settings)
}

/// Serialize the view state under [`SETTINGS_KEY`].
///
/// # Errors
///
/// Returns an error if serialization or the store write fails.
pub fn save_view_state(store: &mut dyn SettingsStore, state: &ViewState) -> AppResult<()> {
    let text = serde_json::to_string(&PersistedSettings::from_view(state))?;
    store.save(SETTINGS_KEY, &text)
}

/// In-memory store. Clones share the same map, so a test can keep a handle
/// while the dashboard owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        store
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }
}

impl SettingsStore for MemoryStore {
    fn load(&self, key: &str) -> AppResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| AppError::Internal("settings store lock poisoned".to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn save(&mut self, key: &str, value: &str) -> AppResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| AppError::Internal("settings store lock poisoned".to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store backed by a single JSON file holding a `{key: value}` object.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(&self) -> AppResult<HashMap<String, String>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(e) => return Err(e.into()),
        };
        // A corrupt file reads as empty rather than blocking every later save
        Ok(serde_json::from_str(&text).unwrap_or_default())
    }
}

impl SettingsStore for FileStore {
    fn load(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn save(&mut self, key: &str, value: &str) -> AppResult<()> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(&entries)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Hidden-panel ids as a set, for callers that render toggles.
#[must_use]
pub fn hidden_panels(state: &ViewState) -> BTreeSet<PanelId> {
    PanelId::ALL
        .into_iter()
        .filter(|p| !state.is_panel_visible(*p))
        .collect()
}

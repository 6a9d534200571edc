use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::config::Config;
use crate::units::UnitSystem;
use crate::view::persist::PersistedSettings;

pub const DEFAULT_HOURS: u32 = 24;
pub const MAX_RELATIVE_HOURS: u32 = 24 * 30;
pub const MIN_REFRESH_MS: u64 = 5_000;
pub const MAX_REFRESH_MS: u64 = 3_600_000;
pub const DEFAULT_SLIDER_PCT: f64 = 100.0;

/// Chart panels; each can be hidden independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PanelId {
    Temperature,
    Humidity,
    Pressure,
    Wind,
    Rain,
    Uv,
    WindDirection,
    Solar,
}

impl PanelId {
    pub const ALL: [Self; 8] = [
        Self::Temperature,
        Self::Humidity,
        Self::Pressure,
        Self::Wind,
        Self::Rain,
        Self::Uv,
        Self::WindDirection,
        Self::Solar,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Temperature => "temperature",
            Self::Humidity => "humidity",
            Self::Pressure => "pressure",
            Self::Wind => "wind",
            Self::Rain => "rain",
            Self::Uv => "uv",
            Self::WindDirection => "wind-direction",
            Self::Solar => "solar",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == s)
    }
}

/// Metric cards under the hero readout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CardId {
    Wind,
    Humidity,
    Pressure,
    Rain,
    Uv,
    Solar,
    DewPoint,
    FeelsLike,
    Station,
}

impl CardId {
    pub const ALL: [Self; 9] = [
        Self::Wind,
        Self::Humidity,
        Self::Pressure,
        Self::Rain,
        Self::Uv,
        Self::Solar,
        Self::DewPoint,
        Self::FeelsLike,
        Self::Station,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wind => "wind",
            Self::Humidity => "humidity",
            Self::Pressure => "pressure",
            Self::Rain => "rain",
            Self::Uv => "uv",
            Self::Solar => "solar",
            Self::DewPoint => "dew-point",
            Self::FeelsLike => "feels-like",
            Self::Station => "station",
        }
    }

    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Nearby,
    Daily,
    Alerts,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionVisibility {
    pub nearby: bool,
    pub daily: bool,
    pub alerts: bool,
}

impl Default for SectionVisibility {
    fn default() -> Self {
        Self {
            nearby: true,
            daily: true,
            alerts: true,
        }
    }
}

impl SectionVisibility {
    #[must_use]
    pub fn is_visible(&self, section: Section) -> bool {
        match section {
            Section::Nearby => self.nearby,
            Section::Daily => self.daily,
            Section::Alerts => self.alerts,
        }
    }

    fn toggle(&mut self, section: Section) {
        match section {
            Section::Nearby => self.nearby = !self.nearby,
            Section::Daily => self.daily = !self.daily,
            Section::Alerts => self.alerts = !self.alerts,
        }
    }
}

/// Either a sliding "last N hours" window or a fixed start/end range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    Relative { hours: u32 },
    Absolute { start: DateTime<Utc>, end: DateTime<Utc> },
}

impl TimeWindow {
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        matches!(self, Self::Absolute { .. })
    }

    /// Short label for the summary card.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match *self {
            Self::Absolute { .. } => "Custom",
            Self::Relative { hours } if hours <= 6 => "6h",
            Self::Relative { hours } if hours <= 24 => "24h",
            Self::Relative { hours } if hours <= 48 => "48h",
            Self::Relative { .. } => "5d",
        }
    }
}

/// A user action against the view. Every intent is total: invalid input
/// leaves the state as it was, or clamps into range.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SelectStation(String),
    SelectRelativeWindow(u32),
    SelectAbsoluteWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    ToggleUnit,
    TogglePanel(PanelId),
    ToggleCard(CardId),
    ToggleSection(Section),
    SetRefreshInterval(u64),
    SetSliderPosition(f64),
}

impl Intent {
    /// Intents that change what is fetched or how it reads run a cycle at once.
    #[must_use]
    pub fn triggers_refresh(&self) -> bool {
        matches!(
            self,
            Self::SelectStation(_)
                | Self::SelectRelativeWindow(_)
                | Self::SelectAbsoluteWindow { .. }
                | Self::ToggleUnit
        )
    }
}

/// Values used when nothing (or nothing valid) was persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewDefaults {
    pub station_id: String,
    pub hours: u32,
    pub refresh_interval_ms: u64,
}

impl ViewDefaults {
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            station_id: config.default_station.clone(),
            hours: DEFAULT_HOURS,
            refresh_interval_ms: config
                .default_refresh_ms
                .clamp(MIN_REFRESH_MS, MAX_REFRESH_MS),
        }
    }
}

impl Default for ViewDefaults {
    fn default() -> Self {
        Self {
            station_id: "KALMILLP10".to_string(),
            hours: DEFAULT_HOURS,
            refresh_interval_ms: 30_000,
        }
    }
}

/// The single source of truth for what the dashboard shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    station_id: String,
    time_window: TimeWindow,
    unit_system: UnitSystem,
    visible_panels: BTreeSet<PanelId>,
    hidden_cards: BTreeSet<CardId>,
    sections: SectionVisibility,
    refresh_interval_ms: u64,
    slider_position_pct: f64,
}

impl ViewState {
    #[must_use]
    pub fn new(defaults: &ViewDefaults) -> Self {
        Self {
            station_id: defaults.station_id.clone(),
            time_window: TimeWindow::Relative {
                hours: defaults.hours.clamp(1, MAX_RELATIVE_HOURS),
            },
            unit_system: UnitSystem::Fahrenheit,
            visible_panels: PanelId::ALL.into_iter().collect(),
            hidden_cards: BTreeSet::new(),
            sections: SectionVisibility::default(),
            refresh_interval_ms: defaults
                .refresh_interval_ms
                .clamp(MIN_REFRESH_MS, MAX_REFRESH_MS),
            slider_position_pct: DEFAULT_SLIDER_PCT,
        }
    }

    #[must_use]
    pub fn station_id(&self) -> &str {
        &self.station_id
    }

    #[must_use]
    pub fn time_window(&self) -> TimeWindow {
        self.time_window
    }

    #[must_use]
    pub fn unit_system(&self) -> UnitSystem {
        self.unit_system
    }

    #[must_use]
    pub fn visible_panels(&self) -> &BTreeSet<PanelId> {
        &self.visible_panels
    }

    #[must_use]
    pub fn is_panel_visible(&self, panel: PanelId) -> bool {
        self.visible_panels.contains(&panel)
    }

    #[must_use]
    pub fn hidden_cards(&self) -> &BTreeSet<CardId> {
        &self.hidden_cards
    }

    #[must_use]
    pub fn is_card_visible(&self, card: CardId) -> bool {
        !self.hidden_cards.contains(&card)
    }

    #[must_use]
    pub fn sections(&self) -> SectionVisibility {
        self.sections
    }

    #[must_use]
    pub fn refresh_interval_ms(&self) -> u64 {
        self.refresh_interval_ms
    }

    #[must_use]
    pub fn slider_position_pct(&self) -> f64 {
        self.slider_position_pct
    }

    /// Apply one intent and return the resulting state. `self` is untouched.
    #[must_use]
    pub fn apply(&self, intent: &Intent) -> Self {
        let mut next = self.clone();
        match intent {
            Intent::SelectStation(id) => {
                let id = id.trim();
                if !id.is_empty() {
                    next.station_id = id.to_uppercase();
                }
            }
            Intent::SelectRelativeWindow(hours) => {
                if *hours > 0 {
                    next.time_window = TimeWindow::Relative {
                        hours: (*hours).min(MAX_RELATIVE_HOURS),
                    };
                }
            }
            Intent::SelectAbsoluteWindow { start, end } => {
                if start < end {
                    next.time_window = TimeWindow::Absolute {
                        start: *start,
                        end: *end,
                    };
                }
            }
            Intent::ToggleUnit => next.unit_system = next.unit_system.toggled(),
            Intent::TogglePanel(panel) => {
                if !next.visible_panels.remove(panel) {
                    next.visible_panels.insert(*panel);
                }
            }
            Intent::ToggleCard(card) => {
                if !next.hidden_cards.remove(card) {
                    next.hidden_cards.insert(*card);
                }
            }
            Intent::ToggleSection(section) => next.sections.toggle(*section),
            Intent::SetRefreshInterval(ms) => {
                if *ms > 0 {
                    next.refresh_interval_ms = (*ms).clamp(MIN_REFRESH_MS, MAX_REFRESH_MS);
                }
            }
            Intent::SetSliderPosition(pct) => {
                if pct.is_finite() {
                    next.slider_position_pct = pct.clamp(0.0, 100.0);
                }
            }
        }
        next
    }

    /// Rebuild a state from persisted settings, falling back field by field.
    #[must_use]
    pub fn restore(defaults: &ViewDefaults, settings: &PersistedSettings) -> Self {
        let mut state = Self::new(defaults);
        if let Some(id) = &settings.station {
            state = state.apply(&Intent::SelectStation(id.clone()));
        }
        if let Some(hours) = settings.hours {
            state = state.apply(&Intent::SelectRelativeWindow(hours));
        }
        if let Some(ms) = settings.refresh_ms {
            state = state.apply(&Intent::SetRefreshInterval(ms));
        }
        if settings.use_celsius == Some(true) {
            state.unit_system = UnitSystem::Celsius;
        }
        state
            .visible_panels
            .retain(|p| !settings.hidden_charts.contains(p));
        state.hidden_cards = settings.hidden_cards.iter().copied().collect();
        state.sections = SectionVisibility {
            nearby: settings.hide_nearby != Some(true),
            daily: settings.hide_daily != Some(true),
            alerts: settings.hide_alerts != Some(true),
        };
        state
    }
}

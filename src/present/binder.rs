//! Turns a snapshot and the view state into everything the surface draws.
//!
//! Nothing here fetches or mutates; `bind_view` is a pure function of its
//! inputs so a surface can be swapped without touching the derivations.

use chrono::{DateTime, TimeZone, Utc};
use std::fmt::Display;

use crate::metrics::{self, Extrema, STANDARD_PRESSURE_IN};
use crate::model::{
    Alert, DailyRollup, ForecastPeriod, NeighborSample, Sample, SampleField, ViewSnapshot,
};
use crate::present::advisories::{self, AlertLevel, ForecastInsight};
use crate::units::{self, ConditionIcon, PLACEHOLDER, UnitSystem};
use crate::view::{CardId, PanelId, Section, ViewState};

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayState {
    /// The station has produced nothing this cycle.
    NoData { station_id: String },
    Dashboard,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub display: DisplayState,
    pub station_id: String,
    pub live: bool,
    pub hero: HeroView,
    pub summary: SummaryView,
    pub cards: Vec<CardView>,
    pub panels: Vec<PanelContent>,
    pub daily: Vec<DailyRow>,
    pub alerts: Vec<AlertBanner>,
    pub nearby: Vec<NearbyCard>,
    pub forecast: Vec<ForecastCard>,
}

impl DashboardView {
    #[must_use]
    pub fn badge(&self) -> &'static str {
        if self.live { "LIVE" } else { "HISTORICAL" }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HeroView {
    pub temperature: String,
    pub unit: &'static str,
    pub icon: ConditionIcon,
    pub feels_like: String,
    pub dew_point: String,
    pub humidity: String,
    pub updated: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SummaryView {
    pub timeframe: &'static str,
    pub high: String,
    pub low: String,
    pub average: String,
    pub rain_total: String,
    pub uv_max: String,
    pub gust_max: String,
    pub samples: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub id: CardId,
    pub value: String,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelSeries {
    pub label: &'static str,
    pub values: Vec<Option<f64>>,
}

/// Data handed to one chart panel, already in display units.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelContent {
    pub id: PanelId,
    pub unit_label: &'static str,
    pub timestamps: Vec<DateTime<Utc>>,
    pub series: Vec<PanelSeries>,
    /// Statistics of the first series, computed before any zero fill.
    pub extrema: Extrema,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyRow {
    pub day: String,
    pub high: String,
    pub low: String,
    pub rain: String,
    pub gust: String,
    pub uv: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AlertBanner {
    pub level: AlertLevel,
    pub event: String,
    pub headline: String,
    pub expires: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NearbyCard {
    pub station_id: String,
    pub neighborhood: String,
    pub temperature: String,
    pub humidity: String,
    pub wind: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastCard {
    pub name: String,
    pub temperature: String,
    pub short_forecast: String,
    pub precipitation: String,
    pub insight: ForecastInsight,
}

/// Build the full view. Times are shown, and night is judged, in `tz`.
#[must_use]
pub fn bind_view<Tz>(snapshot: &ViewSnapshot, state: &ViewState, tz: &Tz) -> DashboardView
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let unit = state.unit_system();
    let sections = state.sections();
    let display = if snapshot.has_observations() {
        DisplayState::Dashboard
    } else {
        DisplayState::NoData {
            station_id: snapshot.station_id.clone(),
        }
    };

    DashboardView {
        display,
        station_id: snapshot.station_id.clone(),
        live: snapshot.live,
        hero: hero(snapshot.latest.as_ref(), unit, tz),
        summary: summary(snapshot, state),
        cards: cards(snapshot, state, tz),
        panels: PanelId::ALL
            .into_iter()
            .filter(|p| state.is_panel_visible(*p))
            .map(|p| panel_content(p, &snapshot.series, unit))
            .collect(),
        daily: if sections.is_visible(Section::Daily) {
            snapshot.daily.iter().map(|d| daily_row(d, unit)).collect()
        } else {
            Vec::new()
        },
        alerts: if sections.is_visible(Section::Alerts) {
            snapshot.alerts.iter().map(alert_banner).collect()
        } else {
            Vec::new()
        },
        nearby: if sections.is_visible(Section::Nearby) {
            snapshot.nearby.iter().map(|n| nearby_card(n, unit)).collect()
        } else {
            Vec::new()
        },
        forecast: snapshot
            .forecast
            .iter()
            .map(|f| forecast_card(f, unit))
            .collect(),
    }
}

fn hero<Tz>(latest: Option<&Sample>, unit: UnitSystem, tz: &Tz) -> HeroView
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let Some(sample) = latest else {
        return HeroView {
            temperature: PLACEHOLDER.to_string(),
            unit: unit.suffix(),
            icon: ConditionIcon::Clear,
            feels_like: PLACEHOLDER.to_string(),
            dew_point: PLACEHOLDER.to_string(),
            humidity: PLACEHOLDER.to_string(),
            updated: PLACEHOLDER.to_string(),
        };
    };

    let local = sample.timestamp.with_timezone(tz);
    HeroView {
        temperature: units::temperature_value(sample.temperature_f, unit),
        unit: unit.suffix(),
        icon: units::condition_icon(
            sample.temperature_f,
            sample.uv_index,
            sample.precip_rate_in_hr,
            units::is_night(&local),
        ),
        feels_like: units::display_temperature(metrics::feels_like(sample), unit),
        dew_point: units::display_temperature(sample.dew_point_f, unit),
        humidity: percent(sample.humidity_pct),
        updated: local.format("%b %d %H:%M").to_string(),
    }
}

fn summary(snapshot: &ViewSnapshot, state: &ViewState) -> SummaryView {
    let unit = state.unit_system();
    let summary = metrics::summarize(&snapshot.series);
    SummaryView {
        timeframe: state.time_window().label(),
        high: units::display_temperature(summary.temperature.max, unit),
        low: units::display_temperature(summary.temperature.min, unit),
        average: units::display_temperature(summary.temperature.avg, unit),
        rain_total: with_unit(units::format_fixed(summary.rain_total_max, 2), "in"),
        uv_max: units::format_fixed(summary.uv_max, 0),
        gust_max: with_unit(units::format_fixed(summary.gust_max, 0), "mph"),
        samples: summary.sample_count,
    }
}

fn cards<Tz>(snapshot: &ViewSnapshot, state: &ViewState, tz: &Tz) -> Vec<CardView>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let unit = state.unit_system();
    let empty = Sample::empty(snapshot.fetched_at);
    let latest = snapshot.latest.as_ref().unwrap_or(&empty);

    CardId::ALL
        .into_iter()
        .filter(|c| state.is_card_visible(*c))
        .map(|id| {
            let (value, detail) = match id {
                CardId::Wind => (
                    with_unit(units::format_fixed(latest.wind_speed_mph, 0), "mph"),
                    format!(
                        "{} gust {}",
                        units::compass_label(latest.wind_dir_deg).unwrap_or(PLACEHOLDER),
                        with_unit(units::format_fixed(latest.wind_gust_mph, 0), "mph"),
                    ),
                ),
                CardId::Humidity => (percent(latest.humidity_pct), String::new()),
                CardId::Pressure => {
                    let trend = units::pressure_trend(&snapshot.series);
                    (
                        with_unit(units::format_fixed(latest.pressure_in, 2), "inHg"),
                        format!(
                            "{} {} · {}",
                            trend.arrow(),
                            trend.label(),
                            pressure_deviation_label(metrics::pressure_deviation(latest)),
                        ),
                    )
                }
                CardId::Rain => (
                    with_unit(units::format_fixed(latest.precip_rate_in_hr, 2), "in/hr"),
                    format!(
                        "{} today",
                        with_unit(units::format_fixed(latest.precip_total_in, 2), "in")
                    ),
                ),
                CardId::Uv => (
                    units::format_fixed(latest.uv_index, 0),
                    units::uv_tier(latest.uv_index).label().to_string(),
                ),
                CardId::Solar => (
                    with_unit(units::format_fixed(latest.solar_radiation_wm2, 0), "W/m²"),
                    format!("{:.0}%", metrics::solar_percent(latest)),
                ),
                CardId::DewPoint => (
                    units::display_temperature(latest.dew_point_f, unit),
                    match metrics::dew_point_spread(latest) {
                        Some(spread) => {
                            format!("spread {:.1}{}", unit.convert_delta(spread), unit.suffix())
                        }
                        None => format!("spread {PLACEHOLDER}"),
                    },
                ),
                CardId::FeelsLike => (
                    units::display_temperature(metrics::feels_like(latest), unit),
                    String::new(),
                ),
                CardId::Station => (
                    snapshot.station_id.clone(),
                    format!(
                        "fetched {}",
                        snapshot.fetched_at.with_timezone(tz).format("%H:%M:%S")
                    ),
                ),
            };
            CardView { id, value, detail }
        })
        .collect()
}

/// Signed deviation from standard pressure, e.g. `+0.05 above standard`.
#[must_use]
pub fn pressure_deviation_label(deviation: Option<f64>) -> String {
    let Some(d) = deviation else {
        return PLACEHOLDER.to_string();
    };
    let rounded = (d * 100.0).round() / 100.0;
    if rounded > 0.0 {
        format!("+{rounded:.2} above standard")
    } else if rounded < 0.0 {
        format!("{rounded:.2} below standard")
    } else {
        format!("at standard ({STANDARD_PRESSURE_IN:.2})")
    }
}

/// Chart content for one panel.
///
/// Precipitation rate, UV and solar draw unknown readings as zero; every
/// other series keeps gaps. Extrema are taken before that fill.
#[must_use]
pub fn panel_content(id: PanelId, series: &[Sample], unit: UnitSystem) -> PanelContent {
    let fields: &[(SampleField, &'static str)] = match id {
        PanelId::Temperature => &[
            (SampleField::Temperature, "Temperature"),
            (SampleField::DewPoint, "Dew point"),
        ],
        PanelId::Humidity => &[(SampleField::Humidity, "Humidity")],
        PanelId::Pressure => &[(SampleField::Pressure, "Pressure")],
        PanelId::Wind => &[
            (SampleField::WindSpeed, "Wind speed"),
            (SampleField::WindGust, "Gust"),
        ],
        PanelId::Rain => &[
            (SampleField::PrecipRate, "Rate"),
            (SampleField::PrecipTotal, "Total"),
        ],
        PanelId::Uv => &[(SampleField::UvIndex, "UV index")],
        PanelId::WindDirection => &[(SampleField::WindDirection, "Direction")],
        PanelId::Solar => &[(SampleField::SolarRadiation, "Solar radiation")],
    };
    let unit_label = match id {
        PanelId::Temperature => unit.suffix(),
        PanelId::Humidity => "%",
        PanelId::Pressure => "inHg",
        PanelId::Wind => "mph",
        PanelId::Rain => "in",
        PanelId::Uv => "",
        PanelId::WindDirection => "°",
        PanelId::Solar => "W/m²",
    };

    let display = |field: SampleField, v: f64| {
        if field.is_temperature() {
            unit.convert(v)
        } else {
            v
        }
    };

    let mut extrema = fields
        .first()
        .map(|(field, _)| metrics::extrema(series, *field))
        .unwrap_or_default();
    if id == PanelId::Temperature {
        extrema = Extrema {
            min: extrema.min.map(|v| unit.convert(v)),
            max: extrema.max.map(|v| unit.convert(v)),
            avg: extrema.avg.map(|v| unit.convert(v)),
        };
    }

    PanelContent {
        id,
        unit_label,
        timestamps: series.iter().map(|s| s.timestamp).collect(),
        series: fields
            .iter()
            .map(|&(field, label)| PanelSeries {
                label,
                values: series
                    .iter()
                    .map(|s| {
                        let value = s.get(field).map(|v| display(field, v));
                        if zero_filled(field) {
                            Some(value.unwrap_or(0.0))
                        } else {
                            value
                        }
                    })
                    .collect(),
            })
            .collect(),
        extrema,
    }
}

fn zero_filled(field: SampleField) -> bool {
    matches!(
        field,
        SampleField::PrecipRate | SampleField::UvIndex | SampleField::SolarRadiation
    )
}

fn daily_row(rollup: &DailyRollup, unit: UnitSystem) -> DailyRow {
    DailyRow {
        day: rollup.day.format("%a %b %d").to_string(),
        high: units::display_temperature(rollup.temp_high_f, unit),
        low: units::display_temperature(rollup.temp_low_f, unit),
        rain: with_unit(units::format_fixed(rollup.rain_total, 2), "in"),
        gust: with_unit(units::format_fixed(rollup.wind_gust_max, 0), "mph"),
        uv: units::format_fixed(rollup.uv_max, 0),
    }
}

fn alert_banner(alert: &Alert) -> AlertBanner {
    AlertBanner {
        level: advisories::classify_severity(alert.severity.as_deref()),
        event: alert
            .event
            .clone()
            .unwrap_or_else(|| "Weather Alert".to_string()),
        headline: alert.headline.clone().unwrap_or_default(),
        expires: alert
            .expires
            .map(|at| at.format("%b %d %H:%M UTC").to_string()),
    }
}

fn nearby_card(neighbor: &NeighborSample, unit: UnitSystem) -> NearbyCard {
    NearbyCard {
        station_id: neighbor.station_id.clone(),
        neighborhood: neighbor
            .neighborhood
            .clone()
            .unwrap_or_else(|| PLACEHOLDER.to_string()),
        temperature: units::display_temperature(neighbor.temp_f, unit),
        humidity: percent(neighbor.humidity),
        wind: with_unit(units::format_fixed(neighbor.wind_speed, 0), "mph"),
    }
}

fn forecast_card(period: &ForecastPeriod, unit: UnitSystem) -> ForecastCard {
    ForecastCard {
        name: period.name.clone(),
        temperature: units::display_temperature(period.temperature_f, unit),
        short_forecast: period.short_forecast.clone(),
        precipitation: percent(period.precip_probability),
        insight: advisories::forecast_insight(period),
    }
}

fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.0}%"),
        None => PLACEHOLDER.to_string(),
    }
}

fn with_unit(formatted: String, unit: &str) -> String {
    if formatted == PLACEHOLDER {
        formatted
    } else {
        format!("{formatted} {unit}")
    }
}

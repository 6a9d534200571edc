//! Domain records shared by every layer of the dashboard.
//!
//! These are the validated shapes produced at the fetch boundary (see
//! `api::models`). Optional fields are `None` when a sensor is unavailable;
//! nothing downstream substitutes zero for a missing reading.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One timestamped weather observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub station_id: Option<String>,
    pub temperature_f: Option<f64>,
    pub dew_point_f: Option<f64>,
    pub heat_index_f: Option<f64>,
    pub wind_chill_f: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub wind_speed_mph: Option<f64>,
    pub wind_gust_mph: Option<f64>,
    pub wind_dir_deg: Option<f64>,
    pub pressure_in: Option<f64>,
    pub precip_rate_in_hr: Option<f64>,
    pub precip_total_in: Option<f64>,
    pub uv_index: Option<f64>,
    pub solar_radiation_wm2: Option<f64>,
}

impl Sample {
    /// A sample at `timestamp` with every sensor reading unknown.
    #[must_use]
    pub fn empty(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            station_id: None,
            temperature_f: None,
            dew_point_f: None,
            heat_index_f: None,
            wind_chill_f: None,
            humidity_pct: None,
            wind_speed_mph: None,
            wind_gust_mph: None,
            wind_dir_deg: None,
            pressure_in: None,
            precip_rate_in_hr: None,
            precip_total_in: None,
            uv_index: None,
            solar_radiation_wm2: None,
        }
    }

    /// Read a numeric field by name.
    #[must_use]
    pub fn get(&self, field: SampleField) -> Option<f64> {
        match field {
            SampleField::Temperature => self.temperature_f,
            SampleField::DewPoint => self.dew_point_f,
            SampleField::HeatIndex => self.heat_index_f,
            SampleField::WindChill => self.wind_chill_f,
            SampleField::Humidity => self.humidity_pct,
            SampleField::WindSpeed => self.wind_speed_mph,
            SampleField::WindGust => self.wind_gust_mph,
            SampleField::WindDirection => self.wind_dir_deg,
            SampleField::Pressure => self.pressure_in,
            SampleField::PrecipRate => self.precip_rate_in_hr,
            SampleField::PrecipTotal => self.precip_total_in,
            SampleField::UvIndex => self.uv_index,
            SampleField::SolarRadiation => self.solar_radiation_wm2,
        }
    }
}

/// Numeric fields of a [`Sample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleField {
    Temperature,
    DewPoint,
    HeatIndex,
    WindChill,
    Humidity,
    WindSpeed,
    WindGust,
    WindDirection,
    Pressure,
    PrecipRate,
    PrecipTotal,
    UvIndex,
    SolarRadiation,
}

impl SampleField {
    /// Fields measured in degrees Fahrenheit, which follow the unit toggle.
    #[must_use]
    pub fn is_temperature(self) -> bool {
        matches!(
            self,
            Self::Temperature | Self::DewPoint | Self::HeatIndex | Self::WindChill
        )
    }
}

/// Per-day aggregate computed server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRollup {
    pub day: NaiveDate,
    pub temp_high_f: Option<f64>,
    pub temp_low_f: Option<f64>,
    pub temp_avg_f: Option<f64>,
    pub humidity_high: Option<f64>,
    pub humidity_low: Option<f64>,
    pub pressure_avg: Option<f64>,
    pub wind_gust_max: Option<f64>,
    pub rain_total: Option<f64>,
    pub uv_max: Option<f64>,
    pub reading_count: u32,
}

/// An active weather alert for the station's area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub event: Option<String>,
    /// Free text as published; classify with `present::advisories::classify_severity`.
    pub severity: Option<String>,
    pub headline: Option<String>,
    pub description: Option<String>,
    pub expires: Option<DateTime<Utc>>,
}

/// A snapshot from a neighbouring station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeighborSample {
    pub station_id: String,
    pub neighborhood: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub temp_f: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
}

/// One period of the station-area forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastPeriod {
    pub name: String,
    pub start_time: Option<DateTime<Utc>>,
    pub is_daytime: bool,
    pub temperature_f: Option<f64>,
    pub wind_speed_mph: Option<f64>,
    pub precip_probability: Option<f64>,
    pub short_forecast: String,
}

/// Entry of the station directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
}

/// Caller identity returned by `/api/auth/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// The merged result of one refresh cycle.
///
/// Immutable once built. A later cycle produces a new snapshot; the series is
/// shared behind an `Arc` so chart bindings can detect a new fetch by identity.
#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    pub cycle: u64,
    pub station_id: String,
    pub latest: Option<Sample>,
    /// Chronological, oldest first.
    pub series: Arc<[Sample]>,
    pub daily: Vec<DailyRollup>,
    pub alerts: Vec<Alert>,
    pub nearby: Vec<NeighborSample>,
    pub forecast: Vec<ForecastPeriod>,
    /// False when `latest` was substituted from an absolute window's last sample.
    pub live: bool,
    pub fetched_at: DateTime<Utc>,
}

impl ViewSnapshot {
    /// True when the station itself produced any observation this cycle.
    ///
    /// Area-level sources (alerts, nearby, forecast) do not count: a station
    /// that has never reported is still in the "no data" state.
    #[must_use]
    pub fn has_observations(&self) -> bool {
        self.latest.is_some() || !self.series.is_empty() || !self.daily.is_empty()
    }
}

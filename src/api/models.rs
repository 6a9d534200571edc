//! Wire records for the weather data API and their validation into domain types.
//!
//! Every field is optional on the wire. Records that lack what the domain
//! requires (a parseable timestamp, a station id, a calendar day) are dropped
//! here so nothing downstream has to re-check presence.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Alert, DailyRollup, ForecastPeriod, NeighborSample, Sample};
use crate::units::to_fahrenheit;

/// Nearby list is capped at this many distinct stations.
pub const MAX_NEARBY: usize = 20;

/// Response item of `/api/current` and `/api/history`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ObservationRecord {
    #[serde(default)]
    pub station_id: Option<String>,
    #[serde(default)]
    pub obs_time_utc: Option<String>,
    #[serde(default)]
    pub temp_f: Option<f64>,
    #[serde(default)]
    pub humidity_pct: Option<f64>,
    #[serde(default)]
    pub dew_point_f: Option<f64>,
    #[serde(default)]
    pub heat_index_f: Option<f64>,
    #[serde(default)]
    pub wind_chill_f: Option<f64>,
    #[serde(default)]
    pub wind_speed_mph: Option<f64>,
    #[serde(default)]
    pub wind_dir_deg: Option<f64>,
    #[serde(default)]
    pub wind_gust_mph: Option<f64>,
    #[serde(default)]
    pub pressure_in: Option<f64>,
    #[serde(default)]
    pub precip_rate_in_hr: Option<f64>,
    #[serde(default)]
    pub precip_total_in: Option<f64>,
    #[serde(default)]
    pub solar_radiation_wm2: Option<f64>,
    #[serde(default)]
    pub uv_index: Option<f64>,
}

impl ObservationRecord {
    /// `None` when the observation time is missing or unparseable.
    #[must_use]
    pub fn into_sample(self) -> Option<Sample> {
        let timestamp = parse_instant(self.obs_time_utc.as_deref()?)?;
        Some(Sample {
            timestamp,
            station_id: self.station_id,
            temperature_f: self.temp_f,
            dew_point_f: self.dew_point_f,
            heat_index_f: self.heat_index_f,
            wind_chill_f: self.wind_chill_f,
            humidity_pct: self.humidity_pct,
            wind_speed_mph: self.wind_speed_mph,
            wind_gust_mph: self.wind_gust_mph,
            wind_dir_deg: self.wind_dir_deg,
            pressure_in: self.pressure_in,
            precip_rate_in_hr: self.precip_rate_in_hr,
            precip_total_in: self.precip_total_in,
            uv_index: self.uv_index,
            solar_radiation_wm2: self.solar_radiation_wm2,
        })
    }
}

/// Response item of `/api/daily`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailyRecord {
    #[serde(default)]
    pub day: Option<String>,
    #[serde(default)]
    pub temp_high_f: Option<f64>,
    #[serde(default)]
    pub temp_low_f: Option<f64>,
    #[serde(default)]
    pub temp_avg_f: Option<f64>,
    #[serde(default)]
    pub humidity_high: Option<f64>,
    #[serde(default)]
    pub humidity_low: Option<f64>,
    #[serde(default)]
    pub pressure_avg: Option<f64>,
    #[serde(default)]
    pub wind_gust_max: Option<f64>,
    #[serde(default)]
    pub rain_total: Option<f64>,
    #[serde(default)]
    pub uv_max: Option<f64>,
    #[serde(default)]
    pub reading_count: Option<u32>,
}

impl DailyRecord {
    #[must_use]
    pub fn into_rollup(self) -> Option<DailyRollup> {
        let day = NaiveDate::parse_from_str(self.day.as_deref()?, "%Y-%m-%d").ok()?;
        Some(DailyRollup {
            day,
            temp_high_f: self.temp_high_f,
            temp_low_f: self.temp_low_f,
            temp_avg_f: self.temp_avg_f,
            humidity_high: self.humidity_high,
            humidity_low: self.humidity_low,
            pressure_avg: self.pressure_avg,
            wind_gust_max: self.wind_gust_max,
            rain_total: self.rain_total,
            uv_max: self.uv_max,
            reading_count: self.reading_count.unwrap_or(0),
        })
    }
}

/// Response item of `/api/alerts`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AlertRecord {
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub expires: Option<String>,
}

impl From<AlertRecord> for Alert {
    fn from(record: AlertRecord) -> Self {
        Self {
            event: record.event,
            severity: record.severity,
            headline: record.headline,
            description: record.description,
            expires: record.expires.as_deref().and_then(parse_instant),
        }
    }
}

/// Response item of `/api/nearby`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NearbyRecord {
    #[serde(default, rename = "stationID")]
    pub station_id: Option<String>,
    #[serde(default)]
    pub neighborhood: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub temp_f: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub wind_speed: Option<f64>,
}

impl NearbyRecord {
    #[must_use]
    pub fn into_neighbor(self) -> Option<NeighborSample> {
        let station_id = self.station_id.filter(|id| !id.is_empty())?;
        Some(NeighborSample {
            station_id,
            neighborhood: self.neighborhood,
            lat: self.lat,
            lon: self.lon,
            temp_f: self.temp_f,
            humidity: self.humidity,
            wind_speed: self.wind_speed,
        })
    }
}

/// Response item of `/api/forecast`.
///
/// Accepts both snake_case and the camelCase names of the upstream forecast
/// service; wind speed may be a number or text such as `"5 to 10 mph"`, and
/// precipitation probability a number or `{"value": n}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ForecastRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, alias = "startTime")]
    pub start_time: Option<String>,
    #[serde(default, alias = "isDaytime")]
    pub is_daytime: Option<bool>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default, alias = "temperatureUnit")]
    pub temperature_unit: Option<String>,
    #[serde(default, alias = "windSpeed")]
    pub wind_speed: Option<serde_json::Value>,
    #[serde(default, alias = "probabilityOfPrecipitation")]
    pub precip_probability: Option<serde_json::Value>,
    #[serde(default, alias = "shortForecast")]
    pub short_forecast: Option<String>,
}

impl From<ForecastRecord> for ForecastPeriod {
    fn from(record: ForecastRecord) -> Self {
        let celsius = record
            .temperature_unit
            .as_deref()
            .is_some_and(|u| u.eq_ignore_ascii_case("c"));
        Self {
            name: record.name.unwrap_or_default(),
            start_time: record.start_time.as_deref().and_then(parse_instant),
            is_daytime: record.is_daytime.unwrap_or(true),
            temperature_f: record
                .temperature
                .map(|t| if celsius { to_fahrenheit(t) } else { t }),
            wind_speed_mph: record.wind_speed.as_ref().and_then(wind_speed_mph),
            precip_probability: record.precip_probability.as_ref().and_then(probability),
            short_forecast: record.short_forecast.unwrap_or_default(),
        }
    }
}

/// Highest number in a wind speed field.
fn wind_speed_mph(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s
            .split(|c: char| !(c.is_ascii_digit() || c == '.'))
            .filter_map(|part| part.parse::<f64>().ok())
            .reduce(f64::max),
        _ => None,
    }
}

fn probability(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::Object(map) => map.get("value").and_then(serde_json::Value::as_f64),
        _ => None,
    }
}

/// ISO-8601 instant; a timestamp without offset is taken as UTC.
#[must_use]
pub fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Validate a history payload item by item, then order it oldest first.
#[must_use]
pub fn samples_from_values(values: Vec<serde_json::Value>) -> Vec<Sample> {
    let total = values.len();
    let mut samples: Vec<Sample> = values
        .into_iter()
        .filter_map(|v| serde_json::from_value::<ObservationRecord>(v).ok())
        .filter_map(ObservationRecord::into_sample)
        .collect();

    if samples.len() < total {
        tracing::warn!(
            dropped = total - samples.len(),
            total,
            "Dropped history records without a valid observation time"
        );
    }

    samples.sort_by_key(|s| s.timestamp);
    samples
}

/// Daily rollups, newest day first.
#[must_use]
pub fn rollups_from_records(records: Vec<DailyRecord>) -> Vec<DailyRollup> {
    let mut rollups: Vec<DailyRollup> = records
        .into_iter()
        .filter_map(DailyRecord::into_rollup)
        .collect();
    rollups.sort_by(|a, b| b.day.cmp(&a.day));
    rollups
}

/// Neighbours with an id, first occurrence wins, at most [`MAX_NEARBY`].
#[must_use]
pub fn neighbors_from_records(records: Vec<NearbyRecord>) -> Vec<NeighborSample> {
    let mut seen = std::collections::HashSet::new();
    records
        .into_iter()
        .filter_map(NearbyRecord::into_neighbor)
        .filter(|n| seen.insert(n.station_id.clone()))
        .take(MAX_NEARBY)
        .collect()
}

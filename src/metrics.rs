//! Derived metrics over a window of samples.

use crate::model::{Sample, SampleField};

/// Standard sea-level pressure (inHg).
pub const STANDARD_PRESSURE_IN: f64 = 29.92;

/// Irradiance treated as a full solar bar (W/m²).
pub const SOLAR_FULL_SCALE_WM2: f64 = 1200.0;

/// Min, max and mean of the known values of one field.
///
/// All three are `None` when the window has no known value.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extrema {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
}

fn known_values(series: &[Sample], field: SampleField) -> impl Iterator<Item = f64> + '_ {
    series
        .iter()
        .filter_map(move |s| s.get(field))
        .filter(|v| !v.is_nan())
}

#[must_use]
pub fn extrema(series: &[Sample], field: SampleField) -> Extrema {
    let mut count = 0usize;
    let mut sum = 0.0;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;

    for v in known_values(series, field) {
        count += 1;
        sum += v;
        min = min.min(v);
        max = max.max(v);
    }

    if count == 0 {
        return Extrema::default();
    }
    Extrema {
        min: Some(min),
        max: Some(max),
        avg: Some(sum / count as f64),
    }
}

/// Most recent known value of a field.
#[must_use]
pub fn latest(series: &[Sample], field: SampleField) -> Option<f64> {
    series.iter().rev().find_map(|s| s.get(field))
}

/// Temperature minus dew point.
#[must_use]
pub fn dew_point_spread(sample: &Sample) -> Option<f64> {
    Some(sample.temperature_f? - sample.dew_point_f?)
}

/// Signed difference from standard pressure. Independent of the slope-based trend.
#[must_use]
pub fn pressure_deviation(sample: &Sample) -> Option<f64> {
    sample.pressure_in.map(|p| p - STANDARD_PRESSURE_IN)
}

/// Wind chill, else heat index, else the air temperature.
#[must_use]
pub fn feels_like(sample: &Sample) -> Option<f64> {
    sample
        .wind_chill_f
        .or(sample.heat_index_f)
        .or(sample.temperature_f)
}

/// Share of the solar bar to fill, 0 to 100.
#[must_use]
pub fn solar_percent(sample: &Sample) -> f64 {
    match sample.solar_radiation_wm2 {
        Some(w) if w > 0.0 => (w / SOLAR_FULL_SCALE_WM2 * 100.0).min(100.0),
        _ => 0.0,
    }
}

/// Headline figures for the selected window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowSummary {
    pub temperature: Extrema,
    pub rain_total_max: Option<f64>,
    pub uv_max: Option<f64>,
    pub gust_max: Option<f64>,
    pub sample_count: usize,
}

#[must_use]
pub fn summarize(series: &[Sample]) -> WindowSummary {
    WindowSummary {
        temperature: extrema(series, SampleField::Temperature),
        rain_total_max: extrema(series, SampleField::PrecipTotal).max,
        uv_max: extrema(series, SampleField::UvIndex).max,
        gust_max: extrema(series, SampleField::WindGust).max,
        sample_count: series.len(),
    }
}

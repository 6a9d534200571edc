//! Unit conversion and display classification.
//!
//! Everything here is a pure function over optional readings. Unknown input
//! always yields an explicit unknown output (`None`, [`PLACEHOLDER`],
//! `UvTier::Unknown`), never a zero.

use chrono::{DateTime, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::model::Sample;

/// Text shown in place of an unknown value.
pub const PLACEHOLDER: &str = "—";

/// Pressure change over the trailing samples that counts as a trend (inHg).
pub const PRESSURE_TREND_THRESHOLD: f64 = 0.02;

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum UnitSystem {
    #[default]
    Fahrenheit,
    Celsius,
}

impl UnitSystem {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Fahrenheit => Self::Celsius,
            Self::Celsius => Self::Fahrenheit,
        }
    }

    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Fahrenheit => "°F",
            Self::Celsius => "°C",
        }
    }

    /// Lowercase unit letter, used in column names.
    #[must_use]
    pub fn letter(self) -> &'static str {
        match self {
            Self::Fahrenheit => "f",
            Self::Celsius => "c",
        }
    }

    /// Convert a temperature difference (no offset applied).
    #[must_use]
    pub fn convert_delta(self, delta_f: f64) -> f64 {
        match self {
            Self::Fahrenheit => delta_f,
            Self::Celsius => delta_f * 5.0 / 9.0,
        }
    }

    /// Convert a Fahrenheit reading into this unit system.
    #[must_use]
    pub fn convert(self, fahrenheit: f64) -> f64 {
        match self {
            Self::Fahrenheit => fahrenheit,
            Self::Celsius => to_celsius(fahrenheit),
        }
    }
}

#[must_use]
pub fn to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

#[must_use]
pub fn to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Rounded temperature with its unit suffix, e.g. `72°F` or `22.2°C`.
#[must_use]
pub fn display_temperature(fahrenheit: Option<f64>, unit: UnitSystem) -> String {
    let Some(f) = fahrenheit else {
        return PLACEHOLDER.to_string();
    };
    match unit {
        // `+ 0.0` folds a rounded negative zero into `0`
        UnitSystem::Fahrenheit => format!("{}°F", f.round() + 0.0),
        UnitSystem::Celsius => format!("{:.1}°C", to_celsius(f)),
    }
}

/// Whole-degree temperature without a suffix, for the hero readout.
#[must_use]
pub fn temperature_value(fahrenheit: Option<f64>, unit: UnitSystem) -> String {
    match fahrenheit {
        Some(f) => format!("{}", unit.convert(f).round() + 0.0),
        None => PLACEHOLDER.to_string(),
    }
}

/// Fixed-decimal formatting with the placeholder for unknown values.
#[must_use]
pub fn format_fixed(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => PLACEHOLDER.to_string(),
    }
}

/// One of the 16 compass points for a bearing in degrees.
///
/// Each sector starts at a multiple of 22.5°; a bearing exactly on a sector
/// edge belongs to the next sector clockwise. Bearings wrap, so 360° is `N`.
///
/// Labels name the sector a bearing falls in, counted from the sector start,
/// not the nearest compass point: 350° is `NNW`, 22.4° is still `N`.
#[must_use]
pub fn compass_label(degrees: Option<f64>) -> Option<&'static str> {
    let degrees = degrees.filter(|d| d.is_finite())?;
    let sector = (degrees.rem_euclid(360.0) / 22.5).floor() as usize;
    Some(COMPASS_POINTS[sector % COMPASS_POINTS.len()])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureTrend {
    Rising,
    Falling,
    Steady,
}

impl PressureTrend {
    #[must_use]
    pub fn arrow(self) -> &'static str {
        match self {
            Self::Rising => "↑",
            Self::Falling => "↓",
            Self::Steady => "→",
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Rising => "rising",
            Self::Falling => "falling",
            Self::Steady => "steady",
        }
    }
}

/// Slope of the barometer over the last three samples.
///
/// Compares the oldest and newest known pressure among the trailing three
/// samples. Fewer than three samples, or fewer than two known pressures among
/// them, is reported as steady.
#[must_use]
pub fn pressure_trend(samples: &[Sample]) -> PressureTrend {
    if samples.len() < 3 {
        return PressureTrend::Steady;
    }
    let recent: Vec<f64> = samples[samples.len() - 3..]
        .iter()
        .filter_map(|s| s.pressure_in)
        .collect();
    if recent.len() < 2 {
        return PressureTrend::Steady;
    }

    let diff = recent[recent.len() - 1] - recent[0];
    if diff > PRESSURE_TREND_THRESHOLD {
        PressureTrend::Rising
    } else if diff < -PRESSURE_TREND_THRESHOLD {
        PressureTrend::Falling
    } else {
        PressureTrend::Steady
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum UvTier {
    Unknown,
    Low,
    Moderate,
    High,
    VeryHigh,
    Extreme,
}

impl UvTier {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => PLACEHOLDER,
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
            Self::VeryHigh => "Very High",
            Self::Extreme => "Extreme",
        }
    }
}

/// UV tier; each boundary (3, 6, 8, 11) is the inclusive lower bound of its tier.
#[must_use]
pub fn uv_tier(uv_index: Option<f64>) -> UvTier {
    match uv_index {
        None => UvTier::Unknown,
        Some(v) if v.is_nan() => UvTier::Unknown,
        Some(v) if v < 3.0 => UvTier::Low,
        Some(v) if v < 6.0 => UvTier::Moderate,
        Some(v) if v < 8.0 => UvTier::High,
        Some(v) if v < 11.0 => UvTier::VeryHigh,
        Some(_) => UvTier::Extreme,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionIcon {
    Rain,
    Night,
    FreezingNight,
    Sunny,
    PartlySunny,
    Freezing,
    Clear,
}

impl ConditionIcon {
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Self::Rain => "🌧️",
            Self::Night => "🌙",
            Self::FreezingNight => "❄️🌙",
            Self::Sunny => "☀️",
            Self::PartlySunny => "🌤️",
            Self::Freezing => "❄️",
            Self::Clear => "⛅",
        }
    }
}

/// Condition icon by precedence: precipitation, night, high UV, moderate UV,
/// freezing temperature, then clear.
#[must_use]
pub fn condition_icon(
    temperature_f: Option<f64>,
    uv_index: Option<f64>,
    precipitation: Option<f64>,
    is_night: bool,
) -> ConditionIcon {
    let freezing = temperature_f.is_some_and(|t| t < 32.0);
    let uv = uv_index.unwrap_or(0.0);

    if precipitation.is_some_and(|p| p > 0.0) {
        ConditionIcon::Rain
    } else if is_night {
        if freezing {
            ConditionIcon::FreezingNight
        } else {
            ConditionIcon::Night
        }
    } else if uv > 6.0 {
        ConditionIcon::Sunny
    } else if uv > 2.0 {
        ConditionIcon::PartlySunny
    } else if freezing {
        ConditionIcon::Freezing
    } else {
        ConditionIcon::Clear
    }
}

/// Night is 19:00 up to 06:00 local time.
#[must_use]
pub fn is_night_hour(hour: u32) -> bool {
    hour >= 19 || hour < 6
}

#[must_use]
pub fn is_night<Tz: TimeZone>(at: &DateTime<Tz>) -> bool {
    is_night_hour(at.hour())
}

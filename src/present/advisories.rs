//! Alert severity levels and forecast advice.

use crate::model::ForecastPeriod;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AlertLevel {
    Advisory,
    Watch,
    Warning,
}

impl AlertLevel {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Advisory => "advisory",
            Self::Watch => "watch",
            Self::Warning => "warning",
        }
    }
}

/// Map free-text severity onto a level. The whole value is compared without
/// regard to case: extreme or severe, then moderate. Anything else (including
/// missing or phrases like "moderate to severe") is an advisory.
#[must_use]
pub fn classify_severity(severity: Option<&str>) -> AlertLevel {
    let severity = severity.unwrap_or_default().to_lowercase();
    if matches!(severity.as_str(), "extreme" | "severe") {
        AlertLevel::Warning
    } else if severity == "moderate" {
        AlertLevel::Watch
    } else {
        AlertLevel::Advisory
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecastInsight {
    Umbrella,
    Hydration,
    WarmCoat,
    WindAlert,
    ClearSkies { daytime: bool },
    Overcast,
    Pleasant,
}

impl ForecastInsight {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Umbrella => "Rain likely, carry an umbrella",
            Self::Hydration => "Hot out there, stay hydrated",
            Self::WarmCoat => "Bundle up with a warm coat",
            Self::WindAlert => "Windy, secure loose objects",
            Self::ClearSkies { daytime: true } => "Clear skies, great day to be outside",
            Self::ClearSkies { daytime: false } => "Clear night, good for stargazing",
            Self::Overcast => "Overcast, a grey one",
            Self::Pleasant => "Pleasant conditions expected",
        }
    }
}

/// First matching rule wins.
#[must_use]
pub fn forecast_insight(period: &ForecastPeriod) -> ForecastInsight {
    let text = period.short_forecast.to_lowercase();

    if period.precip_probability.is_some_and(|p| p > 40.0) {
        ForecastInsight::Umbrella
    } else if period.temperature_f.is_some_and(|t| t > 85.0) {
        ForecastInsight::Hydration
    } else if period.temperature_f.is_some_and(|t| t < 40.0) {
        ForecastInsight::WarmCoat
    } else if period.wind_speed_mph.is_some_and(|w| w > 20.0) {
        ForecastInsight::WindAlert
    } else if text.contains("sunny") || text.contains("clear") {
        ForecastInsight::ClearSkies {
            daytime: period.is_daytime,
        }
    } else if text.contains("cloudy") {
        ForecastInsight::Overcast
    } else {
        ForecastInsight::Pleasant
    }
}

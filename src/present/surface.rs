use crate::present::binder::{DashboardView, DisplayState};

/// Whatever finally draws the dashboard.
pub trait Surface: Send {
    fn render(&mut self, view: &DashboardView);
}

/// Renders through `tracing`, for headless runs.
#[derive(Debug, Default)]
pub struct LogSurface;

impl Surface for LogSurface {
    fn render(&mut self, view: &DashboardView) {
        if let DisplayState::NoData { station_id } = &view.display {
            tracing::info!(station = %station_id, "No data yet for station");
            return;
        }

        tracing::info!(
            station = %view.station_id,
            mode = view.badge(),
            temperature = %format!("{}{}", view.hero.temperature, view.hero.unit),
            icon = view.hero.icon.glyph(),
            feels_like = %view.hero.feels_like,
            humidity = %view.hero.humidity,
            updated = %view.hero.updated,
            "Current conditions"
        );
        tracing::info!(
            timeframe = view.summary.timeframe,
            high = %view.summary.high,
            low = %view.summary.low,
            avg = %view.summary.average,
            rain = %view.summary.rain_total,
            gust = %view.summary.gust_max,
            samples = view.summary.samples,
            "Window summary"
        );
        for card in &view.cards {
            tracing::debug!(card = card.id.as_str(), value = %card.value, detail = %card.detail, "Card");
        }
        for panel in &view.panels {
            tracing::debug!(
                panel = panel.id.as_str(),
                points = panel.timestamps.len(),
                min = ?panel.extrema.min,
                max = ?panel.extrema.max,
                "Panel"
            );
        }
        for alert in &view.alerts {
            tracing::warn!(
                level = alert.level.label(),
                event = %alert.event,
                headline = %alert.headline,
                expires = ?alert.expires,
                "Weather alert"
            );
        }
        for row in &view.daily {
            tracing::debug!(day = %row.day, high = %row.high, low = %row.low, rain = %row.rain, "Daily");
        }
        for card in &view.nearby {
            tracing::debug!(station = %card.station_id, area = %card.neighborhood, temperature = %card.temperature, "Nearby");
        }
        for card in &view.forecast {
            tracing::info!(
                period = %card.name,
                temperature = %card.temperature,
                forecast = %card.short_forecast,
                advice = card.insight.message(),
                "Forecast"
            );
        }
    }
}

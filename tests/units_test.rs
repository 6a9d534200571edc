//! Unit conversion and classification tests.
//!
//! Run with: cargo test --test units_test

mod common;

use wx_dashboard::units::{
    self, ConditionIcon, PLACEHOLDER, PressureTrend, UnitSystem, UvTier,
};

#[test]
fn fahrenheit_celsius_round_trip() {
    for f in [-40.0, -3.7, 0.0, 32.0, 72.5, 98.6, 451.0] {
        let back = units::to_fahrenheit(units::to_celsius(f));
        assert!((back - f).abs() < 1e-6, "{f} came back as {back}");
    }
    assert!((units::to_celsius(212.0) - 100.0).abs() < 1e-9);
}

#[test]
fn display_temperature_rounding() {
    assert_eq!(units::display_temperature(Some(72.4), UnitSystem::Fahrenheit), "72°F");
    assert_eq!(units::display_temperature(Some(72.5), UnitSystem::Fahrenheit), "73°F");
    assert_eq!(units::display_temperature(Some(-0.2), UnitSystem::Fahrenheit), "0°F");
    assert_eq!(units::display_temperature(Some(72.0), UnitSystem::Celsius), "22.2°C");
    assert_eq!(units::display_temperature(None, UnitSystem::Celsius), PLACEHOLDER);
    assert_eq!(units::temperature_value(Some(72.0), UnitSystem::Celsius), "22");
    assert_eq!(units::temperature_value(None, UnitSystem::Fahrenheit), PLACEHOLDER);
}

#[test]
fn compass_labels() {
    assert_eq!(units::compass_label(Some(0.0)), Some("N"));
    assert_eq!(units::compass_label(Some(360.0)), Some("N"));
    // Sector-start labels, not nearest point
    assert_eq!(units::compass_label(Some(350.0)), Some("NNW"));
    assert_eq!(units::compass_label(Some(22.4)), Some("N"));
    assert_eq!(units::compass_label(Some(22.6)), Some("NNE"));
    assert_eq!(units::compass_label(Some(90.0)), Some("E"));
    assert_eq!(units::compass_label(Some(359.9)), Some("NNW"));
    assert_eq!(units::compass_label(Some(-90.0)), Some("W"));
    assert_eq!(units::compass_label(None), None);
    assert_eq!(units::compass_label(Some(f64::NAN)), None);
}

#[test]
fn pressure_trend_uses_last_three() {
    use common::with_pressure;

    assert_eq!(units::pressure_trend(&with_pressure(&[29.90, 29.91, 29.95])), PressureTrend::Rising);
    assert_eq!(units::pressure_trend(&with_pressure(&[29.95, 29.93, 29.92])), PressureTrend::Falling);
    assert_eq!(units::pressure_trend(&with_pressure(&[29.90, 29.90, 29.91])), PressureTrend::Steady);
    assert_eq!(units::pressure_trend(&with_pressure(&[29.00, 30.00])), PressureTrend::Steady);
    // Only the trailing three count
    assert_eq!(
        units::pressure_trend(&with_pressure(&[28.00, 29.95, 29.93, 29.92])),
        PressureTrend::Falling
    );
}

#[test]
fn pressure_trend_needs_two_known_values() {
    let mut samples = common::with_pressure(&[29.80, 29.90, 30.00]);
    samples[1].pressure_in = None;
    samples[2].pressure_in = None;
    assert_eq!(units::pressure_trend(&samples), PressureTrend::Steady);

    samples[2].pressure_in = Some(30.00);
    assert_eq!(units::pressure_trend(&samples), PressureTrend::Rising);
}

#[test]
fn uv_tiers() {
    assert_eq!(units::uv_tier(Some(2.9)), UvTier::Low);
    assert_eq!(units::uv_tier(Some(3.0)), UvTier::Moderate);
    assert_eq!(units::uv_tier(Some(6.0)), UvTier::High);
    assert_eq!(units::uv_tier(Some(8.0)), UvTier::VeryHigh);
    assert_eq!(units::uv_tier(Some(11.0)), UvTier::Extreme);
    assert_eq!(units::uv_tier(None), UvTier::Unknown);
}

#[test]
fn condition_icon_precedence() {
    // Precipitation beats night and UV
    assert_eq!(units::condition_icon(Some(20.0), Some(9.0), Some(0.1), true), ConditionIcon::Rain);
    assert_eq!(units::condition_icon(Some(50.0), Some(9.0), Some(0.0), true), ConditionIcon::Night);
    assert_eq!(
        units::condition_icon(Some(20.0), None, None, true),
        ConditionIcon::FreezingNight
    );
    assert_eq!(units::condition_icon(Some(20.0), Some(7.0), None, false), ConditionIcon::Sunny);
    assert_eq!(units::condition_icon(Some(20.0), Some(3.0), None, false), ConditionIcon::PartlySunny);
    assert_eq!(units::condition_icon(Some(20.0), Some(1.0), None, false), ConditionIcon::Freezing);
    assert_eq!(units::condition_icon(None, None, None, false), ConditionIcon::Clear);
}

#[test]
fn night_hours() {
    let night: Vec<u32> = (0..24).filter(|h| units::is_night_hour(*h)).collect();
    assert_eq!(night, vec![0, 1, 2, 3, 4, 5, 19, 20, 21, 22, 23]);
}

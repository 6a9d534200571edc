//! Derived metrics tests.
//!
//! Run with: cargo test --test metrics_test

mod common;

use wx_dashboard::metrics::{self, Extrema};
use wx_dashboard::model::{Sample, SampleField};

#[test]
fn extrema_of_empty_window_is_unknown() {
    assert_eq!(metrics::extrema(&[], SampleField::Temperature), Extrema::default());

    let gaps = vec![Sample::empty(common::t0())];
    let e = metrics::extrema(&gaps, SampleField::Humidity);
    assert_eq!((e.min, e.max, e.avg), (None, None, None));
}

#[test]
fn extrema_ignores_unknown_values() {
    let mut samples = common::series(3);
    samples[0].temperature_f = Some(60.0);
    samples[1].temperature_f = None;
    samples[2].temperature_f = Some(70.0);

    let e = metrics::extrema(&samples, SampleField::Temperature);
    assert_eq!(e.min, Some(60.0));
    assert_eq!(e.max, Some(70.0));
    assert_eq!(e.avg, Some(65.0));
}

#[test]
fn composite_fields() {
    let mut s = Sample::empty(common::t0());
    assert_eq!(metrics::dew_point_spread(&s), None);
    assert_eq!(metrics::pressure_deviation(&s), None);
    assert_eq!(metrics::feels_like(&s), None);
    assert_eq!(metrics::solar_percent(&s), 0.0);

    s.temperature_f = Some(75.0);
    s.dew_point_f = Some(60.0);
    s.pressure_in = Some(29.80);
    s.solar_radiation_wm2 = Some(600.0);
    assert_eq!(metrics::dew_point_spread(&s), Some(15.0));
    assert!((metrics::pressure_deviation(&s).unwrap() + 0.12).abs() < 1e-9);
    assert_eq!(metrics::feels_like(&s), Some(75.0));
    assert_eq!(metrics::solar_percent(&s), 50.0);

    s.heat_index_f = Some(80.0);
    assert_eq!(metrics::feels_like(&s), Some(80.0));
    s.wind_chill_f = Some(70.0);
    assert_eq!(metrics::feels_like(&s), Some(70.0));

    s.solar_radiation_wm2 = Some(5000.0);
    assert_eq!(metrics::solar_percent(&s), 100.0);
}

#[test]
fn window_summary() {
    let mut samples = common::series(4);
    samples[1].precip_total_in = Some(0.12);
    samples[3].precip_total_in = Some(0.30);
    samples[2].wind_gust_mph = Some(18.0);

    let summary = metrics::summarize(&samples);
    assert_eq!(summary.sample_count, 4);
    assert_eq!(summary.temperature.min, Some(60.0));
    assert_eq!(summary.temperature.max, Some(63.0));
    assert_eq!(summary.rain_total_max, Some(0.30));
    assert_eq!(summary.gust_max, Some(18.0));
    assert_eq!(summary.uv_max, None);
    assert_eq!(metrics::latest(&samples, SampleField::PrecipTotal), Some(0.30));
}

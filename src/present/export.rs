//! CSV export of the samples inside the visible range.

use std::io::Write;
use std::path::Path;

use crate::chart::VisibleRange;
use crate::error::AppResult;
use crate::model::{Sample, SampleField};
use crate::units::UnitSystem;

const COLUMNS: [(SampleField, &str); 13] = [
    (SampleField::Temperature, "temperature"),
    (SampleField::DewPoint, "dew_point"),
    (SampleField::HeatIndex, "heat_index"),
    (SampleField::WindChill, "wind_chill"),
    (SampleField::Humidity, "humidity_pct"),
    (SampleField::WindSpeed, "wind_speed_mph"),
    (SampleField::WindGust, "wind_gust_mph"),
    (SampleField::WindDirection, "wind_dir_deg"),
    (SampleField::Pressure, "pressure_in"),
    (SampleField::PrecipRate, "precip_rate_in_hr"),
    (SampleField::PrecipTotal, "precip_total_in"),
    (SampleField::UvIndex, "uv_index"),
    (SampleField::SolarRadiation, "solar_radiation_wm2"),
];

/// Write one row per sample inside `range` (all samples when `None`).
///
/// Temperatures are written in `unit`; unknown readings are empty cells.
/// Returns the number of data rows written.
///
/// # Errors
///
/// Returns `AppError::Csv` or `AppError::Io` if writing fails.
pub fn write_csv<W: Write>(
    writer: W,
    series: &[Sample],
    range: Option<&VisibleRange>,
    unit: UnitSystem,
) -> AppResult<usize> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec!["time".to_string()];
    for (field, name) in COLUMNS {
        if field.is_temperature() {
            header.push(format!("{name}_{}", unit.letter()));
        } else {
            header.push(name.to_string());
        }
    }
    csv.write_record(&header)?;

    let mut rows = 0;
    for sample in series
        .iter()
        .filter(|s| range.is_none_or(|r| r.contains(s.timestamp)))
    {
        let mut record = Vec::with_capacity(COLUMNS.len() + 1);
        record.push(sample.timestamp.to_rfc3339());
        for (field, _) in COLUMNS {
            let value = sample.get(field).map(|v| {
                if field.is_temperature() {
                    unit.convert(v)
                } else {
                    v
                }
            });
            record.push(value.map(|v| v.to_string()).unwrap_or_default());
        }
        csv.write_record(&record)?;
        rows += 1;
    }

    csv.flush()?;
    Ok(rows)
}

/// # Errors
///
/// Returns `AppError::Io` if the file cannot be created.
pub fn export_to_path(
    path: &Path,
    series: &[Sample],
    range: Option<&VisibleRange>,
    unit: UnitSystem,
) -> AppResult<usize> {
    let file = std::fs::File::create(path)?;
    let rows = write_csv(file, series, range, unit)?;
    tracing::info!(path = %path.display(), rows, "Exported visible range");
    Ok(rows)
}

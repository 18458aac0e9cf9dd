//! Plain-text rendering of lookup results.

use std::{fmt::Display, io::Write};

use crate::model::{Forecast, ForecastQuery, ForecastResult};

/// Shown in place of any field the API left out.
pub const PLACEHOLDER: &str = "n/a";

fn or_placeholder<T: Display>(value: Option<T>, suffix: &str) -> String {
    match value {
        Some(v) if suffix.is_empty() => v.to_string(),
        Some(v) => format!("{v} {suffix}"),
        None => PLACEHOLDER.to_string(),
    }
}

/// Write the current-conditions summary.
pub fn render_current<W: Write>(
    query: &ForecastQuery,
    result: &ForecastResult,
    out: &mut W,
) -> std::io::Result<()> {
    let temp_unit = result.units.temperature_suffix();

    writeln!(out, "Current weather for {}, {}:", query.city(), query.country())?;
    writeln!(out, "\tLocation:    {}", or_placeholder(result.location.as_deref(), ""))?;
    writeln!(out, "\tTemperature: {} {temp_unit}", result.temperature)?;
    writeln!(out, "\tFeels like:  {}", or_placeholder(result.feels_like, temp_unit))?;
    writeln!(
        out,
        "\tLow / High:  {} / {}",
        or_placeholder(result.temp_min, temp_unit),
        or_placeholder(result.temp_max, temp_unit)
    )?;
    writeln!(out, "\tConditions:  {}", result.description)?;
    writeln!(out, "\tHumidity:    {}%", result.humidity)?;
    writeln!(out, "\tPressure:    {}", or_placeholder(result.pressure, "hPa"))?;
    writeln!(
        out,
        "\tWind:        {}",
        or_placeholder(result.wind_speed, result.units.speed_suffix())
    )?;
    writeln!(
        out,
        "\tObserved:    {}",
        or_placeholder(result.observed_at.map(|t| t.format("%Y-%m-%d %H:%M UTC")), "")
    )?;

    Ok(())
}

/// Write one line per forecast step.
pub fn render_forecast<W: Write>(
    query: &ForecastQuery,
    forecast: &Forecast,
    out: &mut W,
) -> std::io::Result<()> {
    let country = forecast.country.as_deref().unwrap_or(query.country());
    writeln!(out, "Weather forecast for {}, {}:", forecast.city, country)?;

    if forecast.entries.is_empty() {
        writeln!(out, "\tNo forecast data available.")?;
        return Ok(());
    }

    let temp_unit = forecast.units.temperature_suffix();
    for entry in &forecast.entries {
        writeln!(
            out,
            "\t{}: {} {temp_unit}, {} ({}% humidity)",
            entry.at.format("%Y-%m-%d %H:%M"),
            entry.temperature,
            entry.description,
            entry.humidity,
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ForecastEntry, Units};
    use chrono::{TimeZone, Utc};

    fn sample_result() -> ForecastResult {
        ForecastResult {
            location: Some("New York, US".into()),
            temperature: 15.2,
            feels_like: Some(14.1),
            temp_min: Some(12.0),
            temp_max: Some(17.5),
            description: "clear sky".into(),
            humidity: 60.0,
            pressure: Some(1013),
            wind_speed: Some(3.6),
            observed_at: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap()),
            units: Units::Imperial,
        }
    }

    fn render(result: &ForecastResult) -> String {
        let query = ForecastQuery::new("New York", None).unwrap();
        let mut buf = Vec::new();
        render_current(&query, result, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn current_output_contains_values_verbatim() {
        let text = render(&sample_result());

        assert!(text.starts_with("Current weather for New York, us:"));
        assert!(text.contains("15.2 °F"));
        assert!(text.contains("clear sky"));
        assert!(text.contains("60%"));
        assert!(text.contains("1013 hPa"));
        assert!(text.contains("3.6 mph"));
        assert!(text.contains("2024-05-01 12:30 UTC"));
        assert!(!text.contains(PLACEHOLDER));
    }

    #[test]
    fn missing_optional_fields_render_placeholder() {
        let result = ForecastResult {
            location: None,
            feels_like: None,
            temp_min: None,
            temp_max: None,
            pressure: None,
            wind_speed: None,
            observed_at: None,
            ..sample_result()
        };
        let text = render(&result);

        assert!(text.contains("Location:    n/a"));
        assert!(text.contains("Feels like:  n/a"));
        assert!(text.contains("Low / High:  n/a / n/a"));
        assert!(text.contains("Wind:        n/a"));
        assert!(text.contains("Observed:    n/a"));
        // Required fields still shown.
        assert!(text.contains("15.2"));
        assert!(text.contains("clear sky"));
    }

    #[test]
    fn metric_units_change_suffixes() {
        let result = ForecastResult { units: Units::Metric, ..sample_result() };
        let text = render(&result);
        assert!(text.contains("15.2 °C"));
        assert!(text.contains("3.6 m/s"));
    }

    #[test]
    fn forecast_lists_each_entry() {
        let query = ForecastQuery::new("London", Some("uk")).unwrap();
        let forecast = Forecast {
            city: "London".into(),
            country: Some("GB".into()),
            units: Units::Imperial,
            entries: vec![
                ForecastEntry {
                    at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
                    temperature: 55.4,
                    description: "light rain".into(),
                    humidity: 80.0,
                },
                ForecastEntry {
                    at: Utc.with_ymd_and_hms(2024, 5, 1, 15, 0, 0).unwrap(),
                    temperature: 57.0,
                    description: "broken clouds".into(),
                    humidity: 72.0,
                },
            ],
        };

        let mut buf = Vec::new();
        render_forecast(&query, &forecast, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "Weather forecast for London, GB:");
        assert_eq!(lines[1], "\t2024-05-01 12:00: 55.4 °F, light rain (80% humidity)");
        assert_eq!(lines[2], "\t2024-05-01 15:00: 57 °F, broken clouds (72% humidity)");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn empty_forecast_says_so() {
        let query = ForecastQuery::new("Nowhere", None).unwrap();
        let forecast = Forecast { city: "Nowhere".into(), country: None, units: Units::Metric, entries: vec![] };

        let mut buf = Vec::new();
        render_forecast(&query, &forecast, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("Weather forecast for Nowhere, us:"));
        assert!(text.contains("No forecast data available."));
    }
}

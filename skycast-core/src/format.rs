//! Display formatting for weather values.
//!
//! The output shapes here are load-bearing: downstream consumers show the
//! strings verbatim, so the rules (truncation, unit labels, 12-hour clock)
//! must stay stable.

use chrono::{Local, TimeZone};

use crate::model::ForecastResult;

/// Temperature in °C, truncated toward zero. 21.9 becomes "21°C",
/// -0.5 becomes "0°C".
pub fn temperature(celsius: f64) -> String {
    format!("{}°C", celsius.trunc() as i64)
}

/// Wind speed followed by the "KM/H" label.
///
/// The upstream value is metric (m/s); the label does not match it. This
/// mirrors the behavior consumers already depend on, so the value is not
/// converted here.
pub fn wind_speed(speed: f64) -> String {
    format!("{speed} KM/H")
}

pub fn humidity(pct: u8) -> String {
    format!("{pct}%")
}

pub fn pressure(hpa: u32) -> String {
    format!("{hpa}hPa")
}

/// Location line: city name followed by country code.
pub fn location(city: &str, country: &str) -> String {
    format!("{city}, {country}")
}

/// Image URL for an OpenWeather icon identifier.
pub fn icon_url(icon: &str) -> String {
    format!("https://openweathermap.org/img/w/{icon}.png")
}

/// Unix seconds rendered as a 12-hour wall-clock time ("06:30 PM") in the
/// local timezone.
pub fn clock_time(unix_secs: i64) -> String {
    clock_time_in(unix_secs, &Local)
}

/// [`clock_time`] in an explicit timezone.
pub fn clock_time_in<Tz: TimeZone>(unix_secs: i64, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    match tz.timestamp_opt(unix_secs, 0).single() {
        Some(dt) => dt.format("%I:%M %p").to_string(),
        None => "--:--".to_string(),
    }
}

/// One display row of the forecast panel.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    pub time: String,
    pub temperature: String,
    pub description: String,
    pub icon_url: String,
}

/// Map forecast entries to display rows, preserving upstream order.
/// Pure function of the input; safe to re-run.
pub fn forecast_rows(result: &ForecastResult) -> Vec<ForecastRow> {
    forecast_rows_in(result, &Local)
}

/// [`forecast_rows`] in an explicit timezone.
pub fn forecast_rows_in<Tz: TimeZone>(result: &ForecastResult, tz: &Tz) -> Vec<ForecastRow>
where
    Tz::Offset: std::fmt::Display,
{
    result
        .entries
        .iter()
        .map(|entry| ForecastRow {
            time: clock_time_in(entry.timestamp_unix, tz),
            temperature: temperature(entry.temperature_c),
            description: entry.description.clone(),
            icon_url: icon_url(&entry.icon),
        })
        .collect()
}

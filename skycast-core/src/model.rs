use serde::{Deserialize, Serialize};

/// Geographic coordinates as reported by the weather endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

/// One observation of the current weather for a city.
///
/// Immutable once built; a new search produces a new value instead of
/// mutating this one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub city: String,
    pub country: String,
    pub coord: Coord,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub humidity_pct: u8,
    pub pressure_hpa: u32,
    /// Wind speed as reported upstream (metric units).
    pub wind_speed: f64,
    pub description: String,
    pub icon: String,
    /// Unix seconds.
    pub sunrise_unix: i64,
    /// Unix seconds.
    pub sunset_unix: i64,
    /// When the observation was taken, Unix seconds.
    pub observed_unix: i64,
}

/// One 3-hour step of the five-day forecast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// Unix seconds.
    pub timestamp_unix: i64,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub temp_min_c: f64,
    pub temp_max_c: f64,
    pub description: String,
    pub icon: String,
}

/// Forecast entries for a city, in the chronological order the upstream
/// API returned them. The five-day/3-hour granularity is a property of
/// the endpoint, not enforced here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResult {
    pub city: String,
    pub country: String,
    pub entries: Vec<ForecastEntry>,
}

/// Air-pollution measurement for one coordinate pair at fetch time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PollutionReading {
    /// Air-quality index, 1 (best) to 5 (worst); `None` when the server
    /// omitted it.
    pub aqi: Option<i64>,
    pub components: PollutionComponents,
}

/// Pollutant concentrations in μg/m³.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PollutionComponents {
    pub co: f64,
    pub no: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
    pub nh3: f64,
}

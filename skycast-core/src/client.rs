use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::error::ApiError;
use crate::model::{
    Coord, CurrentWeather, ForecastEntry, ForecastResult, PollutionComponents, PollutionReading,
};

/// Production base URL for the OpenWeather REST API.
pub const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// All requests ask for metric units.
const UNITS: &str = "metric";

/// Upper bound on any single round trip.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Read operations against the weather API.
///
/// The presenter depends on this seam instead of the concrete client so
/// the orchestration logic can be exercised against scripted responses.
#[async_trait]
pub trait WeatherApi: Send + Sync {
    /// Current weather for a city by name.
    async fn current_weather(&self, city: &str) -> Result<CurrentWeather, ApiError>;

    /// Five-day/3-hour forecast for a city by name.
    async fn forecast(&self, city: &str) -> Result<ForecastResult, ApiError>;

    /// Air-pollution reading for a coordinate pair.
    async fn pollution(&self, lat: f64, lon: f64) -> Result<PollutionReading, ApiError>;
}

/// HTTP client for the three OpenWeather endpoints.
///
/// Stateless beyond the connection pool: every call is a fresh round
/// trip, nothing is cached and nothing is retried.
#[derive(Debug, Clone)]
pub struct WeatherApiClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiClient {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_base_url(api_key, OPENWEATHER_BASE_URL.to_string())
    }

    /// Client pointed at an alternative server; used by tests.
    pub fn with_base_url(api_key: String, base_url: String) -> Result<Self> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { api_key, base_url, http })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!("GET {url}");

        let res = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(ApiError::Network)?;

        let status = res.status();
        let body = res.text().await.map_err(ApiError::Network)?;

        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        serde_json::from_str(&body).map_err(|source| ApiError::Decode { endpoint, source })
    }
}

#[async_trait]
impl WeatherApi for WeatherApiClient {
    async fn current_weather(&self, city: &str) -> Result<CurrentWeather, ApiError> {
        let parsed: OwCurrentResponse = self
            .get_json(
                "weather",
                &[("q", city), ("appid", self.api_key.as_str()), ("units", UNITS)],
            )
            .await?;

        let (description, icon) = primary_condition(&parsed.weather);

        Ok(CurrentWeather {
            city: parsed.name,
            country: parsed.sys.country,
            coord: Coord { lat: parsed.coord.lat, lon: parsed.coord.lon },
            temperature_c: parsed.main.temp,
            feels_like_c: parsed.main.feels_like,
            temp_min_c: parsed.main.temp_min,
            temp_max_c: parsed.main.temp_max,
            humidity_pct: parsed.main.humidity,
            pressure_hpa: parsed.main.pressure,
            wind_speed: parsed.wind.speed,
            description,
            icon,
            sunrise_unix: parsed.sys.sunrise,
            sunset_unix: parsed.sys.sunset,
            observed_unix: parsed.dt,
        })
    }

    async fn forecast(&self, city: &str) -> Result<ForecastResult, ApiError> {
        let parsed: OwForecastResponse = self
            .get_json(
                "forecast",
                &[("q", city), ("appid", self.api_key.as_str()), ("units", UNITS)],
            )
            .await?;

        let entries = parsed
            .list
            .into_iter()
            .map(|item| {
                let (description, icon) = primary_condition(&item.weather);
                ForecastEntry {
                    timestamp_unix: item.dt,
                    temperature_c: item.main.temp,
                    feels_like_c: item.main.feels_like,
                    temp_min_c: item.main.temp_min,
                    temp_max_c: item.main.temp_max,
                    description,
                    icon,
                }
            })
            .collect();

        Ok(ForecastResult {
            city: parsed.city.name,
            country: parsed.city.country,
            entries,
        })
    }

    async fn pollution(&self, lat: f64, lon: f64) -> Result<PollutionReading, ApiError> {
        let lat = lat.to_string();
        let lon = lon.to_string();

        let parsed: OwPollutionResponse = self
            .get_json(
                "air_pollution",
                &[
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("appid", self.api_key.as_str()),
                    ("units", UNITS),
                ],
            )
            .await?;

        // The endpoint returns a list; only the first reading is used.
        // An empty list renders downstream as "no data".
        Ok(parsed
            .list
            .into_iter()
            .next()
            .map(|item| PollutionReading {
                aqi: item.main.aqi,
                components: item.components,
            })
            .unwrap_or_default())
    }
}

fn primary_condition(weather: &[OwWeather]) -> (String, String) {
    weather
        .first()
        .map(|w| (w.description.clone(), w.icon.clone()))
        .unwrap_or_else(|| ("Unknown".to_string(), String::new()))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() > MAX {
        format!("{}...", &body[..MAX])
    } else {
        body.to_string()
    }
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    pressure: u32,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    dt: i64,
    coord: OwCoord,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwForecastItem {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    city: OwCity,
    list: Vec<OwForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OwAqi {
    aqi: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct OwPollutionItem {
    main: OwAqi,
    components: PollutionComponents,
}

#[derive(Debug, Deserialize)]
struct OwPollutionResponse {
    list: Vec<OwPollutionItem>,
}

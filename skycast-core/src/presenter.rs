use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Local, TimeZone};
use tracing::{debug, warn};

use crate::aqi;
use crate::client::WeatherApi;
use crate::error::ApiError;
use crate::format::{self, ForecastRow};
use crate::model::{CurrentWeather, PollutionComponents};

/// Fully-resolved, framework-agnostic snapshot of one weather query.
///
/// Every field is already display-formatted; the rendering layer shows
/// them verbatim and never reaches back into the domain model.
#[derive(Debug, Clone)]
pub struct WeatherSnapshot {
    /// "Chełm, PL"
    pub location: String,
    pub description: String,
    /// "21°C"
    pub temperature: String,
    pub feels_like: String,
    pub temp_min: String,
    pub temp_max: String,
    /// "64%"
    pub humidity: String,
    /// "1015hPa"
    pub pressure: String,
    /// "3.6 KM/H"
    pub wind: String,
    /// "06:00 AM"
    pub sunrise: String,
    pub sunset: String,
    pub last_update: String,
    pub icon_url: String,
    /// Absent when the pollution fetch failed; the rest of the snapshot
    /// stays valid.
    pub air_quality: Option<AirQuality>,
}

/// Air-quality section of a snapshot.
#[derive(Debug, Clone)]
pub struct AirQuality {
    /// "Good" .. "Very Poor", or "no data".
    pub label: &'static str,
    pub aqi: Option<i64>,
    pub components: PollutionComponents,
}

/// Forecast panel content: title plus one row per forecast entry.
#[derive(Debug, Clone)]
pub struct ForecastPanel {
    pub title: String,
    pub rows: Vec<ForecastRow>,
}

/// Result of a [`WeatherPresenter::refresh`] call.
#[derive(Debug)]
pub enum RefreshOutcome {
    /// The query is still the newest one; render this snapshot.
    Fresh(WeatherSnapshot),
    /// A newer query was issued while this one was in flight; its result
    /// must not be rendered.
    Superseded,
}

/// Orchestrates the dependent fetches for one weather view.
///
/// Current weather comes first; its coordinates feed the pollution
/// fetch. Each refresh is tagged with a generation number so a reply
/// that arrives after a newer query has started is discarded instead of
/// overwriting fresher state.
pub struct WeatherPresenter<A> {
    api: A,
    generation: AtomicU64,
}

impl<A: WeatherApi> WeatherPresenter<A> {
    pub fn new(api: A) -> Self {
        Self { api, generation: AtomicU64::new(0) }
    }

    /// Fetch current weather and air quality for `city` and assemble a
    /// snapshot.
    ///
    /// A current-weather failure stops the refresh; pollution is never
    /// attempted with anything but coordinates from a successful
    /// current-weather response. A pollution failure only costs the
    /// air-quality section.
    pub async fn refresh(&self, city: &str) -> Result<RefreshOutcome, ApiError> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let weather = match self.api.current_weather(city).await {
            Ok(weather) => weather,
            Err(_) if self.is_stale(generation) => {
                debug!("dropping failed response for superseded query \"{city}\"");
                return Ok(RefreshOutcome::Superseded);
            }
            Err(err) => return Err(err),
        };
        if self.is_stale(generation) {
            debug!("dropping stale response for \"{city}\"");
            return Ok(RefreshOutcome::Superseded);
        }

        let air_quality = match self.api.pollution(weather.coord.lat, weather.coord.lon).await {
            Ok(reading) => Some(AirQuality {
                label: aqi::classify_opt(reading.aqi),
                aqi: reading.aqi,
                components: reading.components,
            }),
            Err(err) => {
                warn!("air pollution fetch failed for \"{city}\": {err}");
                None
            }
        };
        if self.is_stale(generation) {
            debug!("dropping stale response for \"{city}\"");
            return Ok(RefreshOutcome::Superseded);
        }

        Ok(RefreshOutcome::Fresh(build_snapshot(&weather, air_quality, &Local)))
    }

    /// Fetch and format the five-day forecast. Independent of
    /// [`refresh`](Self::refresh); only runs when the panel is opened.
    pub async fn forecast_panel(&self, city: &str) -> Result<ForecastPanel, ApiError> {
        let result = self.api.forecast(city).await?;

        Ok(ForecastPanel {
            title: format!("Five days forecast in {}", result.city),
            rows: format::forecast_rows(&result),
        })
    }

    fn is_stale(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) != generation
    }
}

/// Assemble a snapshot in an explicit timezone.
pub fn build_snapshot<Tz: TimeZone>(
    weather: &CurrentWeather,
    air_quality: Option<AirQuality>,
    tz: &Tz,
) -> WeatherSnapshot
where
    Tz::Offset: std::fmt::Display,
{
    WeatherSnapshot {
        location: format::location(&weather.city, &weather.country),
        description: weather.description.clone(),
        temperature: format::temperature(weather.temperature_c),
        feels_like: format::temperature(weather.feels_like_c),
        temp_min: format::temperature(weather.temp_min_c),
        temp_max: format::temperature(weather.temp_max_c),
        humidity: format::humidity(weather.humidity_pct),
        pressure: format::pressure(weather.pressure_hpa),
        wind: format::wind_speed(weather.wind_speed),
        sunrise: format::clock_time_in(weather.sunrise_unix, tz),
        sunset: format::clock_time_in(weather.sunset_unix, tz),
        last_update: format::clock_time_in(weather.observed_unix, tz),
        icon_url: format::icon_url(&weather.icon),
        air_quality,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coord, CurrentWeather, ForecastResult, PollutionReading};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::{Arc, Mutex};
    use tokio::sync::Notify;

    fn sample_weather(city: &str) -> CurrentWeather {
        CurrentWeather {
            city: city.to_string(),
            country: "PL".to_string(),
            coord: Coord { lat: 51.1431, lon: 23.4716 },
            temperature_c: 21.9,
            feels_like_c: 21.2,
            temp_min_c: 19.4,
            temp_max_c: 23.1,
            humidity_pct: 64,
            pressure_hpa: 1015,
            wind_speed: 3.6,
            description: "scattered clouds".to_string(),
            icon: "03d".to_string(),
            sunrise_unix: 1717999200,
            sunset_unix: 1718044200,
            observed_unix: 1718020800,
        }
    }

    fn sample_reading() -> PollutionReading {
        PollutionReading {
            aqi: Some(2),
            components: PollutionComponents { co: 230.3, ..Default::default() },
        }
    }

    /// Scripted API double. `slow_city` parks its current-weather call on
    /// a gate until the test releases it; `pollution_status` of `Some(n)`
    /// turns every pollution fetch into an HTTP failure.
    struct ScriptedApi {
        slow_city: Option<String>,
        gate: Arc<Notify>,
        pollution_status: Option<u16>,
        pollution_coords: Mutex<Vec<(f64, f64)>>,
    }

    impl ScriptedApi {
        fn plain() -> Self {
            Self {
                slow_city: None,
                gate: Arc::new(Notify::new()),
                pollution_status: None,
                pollution_coords: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl WeatherApi for ScriptedApi {
        async fn current_weather(&self, city: &str) -> Result<CurrentWeather, ApiError> {
            if self.slow_city.as_deref() == Some(city) {
                self.gate.notified().await;
            }
            Ok(sample_weather(city))
        }

        async fn forecast(&self, city: &str) -> Result<ForecastResult, ApiError> {
            Ok(ForecastResult {
                city: city.to_string(),
                country: "PL".to_string(),
                entries: Vec::new(),
            })
        }

        async fn pollution(&self, lat: f64, lon: f64) -> Result<PollutionReading, ApiError> {
            self.pollution_coords.lock().expect("not poisoned").push((lat, lon));

            match self.pollution_status {
                Some(status) => Err(ApiError::Http { status, body: String::new() }),
                None => Ok(sample_reading()),
            }
        }
    }

    #[tokio::test]
    async fn refresh_assembles_full_snapshot() {
        let presenter = WeatherPresenter::new(ScriptedApi::plain());

        let outcome = presenter.refresh("Chełm").await.expect("refresh succeeds");

        let RefreshOutcome::Fresh(snapshot) = outcome else {
            panic!("expected a fresh snapshot");
        };
        assert_eq!(snapshot.location, "Chełm, PL");
        assert_eq!(snapshot.temperature, "21°C");
        assert_eq!(snapshot.wind, "3.6 KM/H");
        let air = snapshot.air_quality.expect("air quality present");
        assert_eq!(air.label, "Fair");
    }

    #[tokio::test]
    async fn pollution_uses_coordinates_from_current_weather() {
        let presenter = WeatherPresenter::new(ScriptedApi::plain());

        presenter.refresh("Chełm").await.expect("refresh succeeds");

        let coords = presenter.api.pollution_coords.lock().expect("not poisoned");
        assert_eq!(coords.as_slice(), &[(51.1431, 23.4716)]);
    }

    #[tokio::test]
    async fn refresh_degrades_when_pollution_fetch_fails() {
        let mut api = ScriptedApi::plain();
        api.pollution_status = Some(500);
        let presenter = WeatherPresenter::new(api);

        let outcome = presenter.refresh("Chełm").await.expect("refresh still succeeds");

        let RefreshOutcome::Fresh(snapshot) = outcome else {
            panic!("expected a fresh snapshot");
        };
        // Weather fields survive; only the air-quality section is gone.
        assert_eq!(snapshot.temperature, "21°C");
        assert!(snapshot.air_quality.is_none());
    }

    #[tokio::test]
    async fn stale_response_is_discarded() {
        let mut api = ScriptedApi::plain();
        api.slow_city = Some("Lublin".to_string());
        let gate = Arc::clone(&api.gate);
        let presenter = Arc::new(WeatherPresenter::new(api));

        // Query A parks on the gate inside current_weather.
        let first = tokio::spawn({
            let presenter = Arc::clone(&presenter);
            async move { presenter.refresh("Lublin").await }
        });
        tokio::task::yield_now().await;

        // Query B completes while A is still in flight.
        let second = presenter.refresh("Chełm").await.expect("second refresh succeeds");
        let RefreshOutcome::Fresh(snapshot) = second else {
            panic!("newest query must produce a snapshot");
        };
        assert_eq!(snapshot.location, "Chełm, PL");

        // A's reply arrives last and must be dropped.
        gate.notify_one();
        let first = first.await.expect("task completes").expect("no fetch error");
        assert!(matches!(first, RefreshOutcome::Superseded));
    }

    #[tokio::test]
    async fn forecast_panel_titles_after_city() {
        let presenter = WeatherPresenter::new(ScriptedApi::plain());

        let panel = presenter.forecast_panel("Chełm").await.expect("forecast succeeds");

        assert_eq!(panel.title, "Five days forecast in Chełm");
        assert!(panel.rows.is_empty());
    }

    #[test]
    fn snapshot_formats_every_field() {
        let snapshot = build_snapshot(&sample_weather("Chełm"), None, &Utc);

        assert_eq!(snapshot.location, "Chełm, PL");
        assert_eq!(snapshot.description, "scattered clouds");
        assert_eq!(snapshot.feels_like, "21°C");
        assert_eq!(snapshot.temp_min, "19°C");
        assert_eq!(snapshot.temp_max, "23°C");
        assert_eq!(snapshot.humidity, "64%");
        assert_eq!(snapshot.pressure, "1015hPa");
        assert_eq!(snapshot.sunrise, "06:00 AM");
        assert_eq!(snapshot.sunset, "06:30 PM");
        assert_eq!(snapshot.icon_url, "https://openweathermap.org/img/w/03d.png");
        assert!(snapshot.air_quality.is_none());
    }
}

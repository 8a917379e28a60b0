//! Core library for the `skycast` weather app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather REST client and its error taxonomy
//! - Presentation: weather snapshots, forecast rows, air-quality labels
//!
//! It is used by `skycast-cli`, but can also be reused by other binaries or services.

pub mod aqi;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod model;
pub mod presenter;

pub use client::{OPENWEATHER_BASE_URL, WeatherApi, WeatherApiClient};
pub use config::{Config, DEFAULT_CITY};
pub use error::ApiError;
pub use model::{
    Coord, CurrentWeather, ForecastEntry, ForecastResult, PollutionComponents, PollutionReading,
};
pub use presenter::{
    AirQuality, ForecastPanel, RefreshOutcome, WeatherPresenter, WeatherSnapshot,
};

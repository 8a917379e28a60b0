use anyhow::Result;
use clap::{Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};

use skycast_core::client::WeatherApiClient;
use skycast_core::config::Config;
use skycast_core::model::PollutionComponents;
use skycast_core::presenter::{RefreshOutcome, WeatherPresenter, WeatherSnapshot};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "City weather, forecast and air quality")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key and a default city.
    Configure,

    /// Show current weather and air quality for a city.
    Show {
        /// City name; falls back to the configured default.
        city: Option<String>,

        /// Also print the pollution component concentrations.
        #[arg(long)]
        details: bool,
    },

    /// Show the five-day forecast for a city.
    Forecast {
        /// City name; falls back to the configured default.
        city: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, details } => show(city, details).await,
            Command::Forecast { city } => forecast(city).await,
        }
    }
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;

    let default_city = Text::new("Default city:")
        .with_default(&config.default_city)
        .prompt()?;

    config.set_api_key(api_key);
    config.default_city = default_city;
    config.save()?;

    println!("Configuration saved to {}", Config::config_file_path()?.display());
    Ok(())
}

/// Build the presenter and resolve the effective city for a command.
fn presenter_for(city: Option<String>) -> Result<(WeatherPresenter<WeatherApiClient>, String)> {
    let config = Config::load()?;
    let client = WeatherApiClient::new(config.api_key()?.to_string())?;
    let city = city.unwrap_or_else(|| config.default_city.clone());

    Ok((WeatherPresenter::new(client), city))
}

async fn show(city: Option<String>, details: bool) -> Result<()> {
    let (presenter, city) = presenter_for(city)?;

    match presenter.refresh(&city).await? {
        RefreshOutcome::Fresh(snapshot) => print_snapshot(&snapshot, details),
        // Cannot happen for a single sequential query, but the contract
        // says a superseded result is never rendered.
        RefreshOutcome::Superseded => {}
    }

    Ok(())
}

async fn forecast(city: Option<String>) -> Result<()> {
    let (presenter, city) = presenter_for(city)?;

    let panel = presenter.forecast_panel(&city).await?;

    println!("{}", panel.title);
    for row in &panel.rows {
        println!("{}  {}  {}", row.time, row.temperature, row.description);
    }

    Ok(())
}

fn print_snapshot(snapshot: &WeatherSnapshot, details: bool) {
    println!("{}", snapshot.location);
    println!("{}", snapshot.description);
    println!("{}", snapshot.temperature);
    println!("Feels like: {}", snapshot.feels_like);
    println!("Min temp: {}", snapshot.temp_min);
    println!("Max temp: {}", snapshot.temp_max);
    println!("Humidity: {}", snapshot.humidity);
    println!("Pressure: {}", snapshot.pressure);
    println!("Wind: {}", snapshot.wind);
    println!("Sunrise: {}", snapshot.sunrise);
    println!("Sunset: {}", snapshot.sunset);
    println!("Last Update: {}", snapshot.last_update);
    println!("Icon: {}", snapshot.icon_url);

    match &snapshot.air_quality {
        Some(air) => {
            println!("Air quality: {}", air.label);
            if details {
                print_components(&air.components);
            }
        }
        None => println!("Air quality: no data"),
    }
}

fn print_components(c: &PollutionComponents) {
    println!("  co:    {} μg/m³", c.co);
    println!("  no:    {} μg/m³", c.no);
    println!("  no2:   {} μg/m³", c.no2);
    println!("  o3:    {} μg/m³", c.o3);
    println!("  so2:   {} μg/m³", c.so2);
    println!("  pm2_5: {} μg/m³", c.pm2_5);
    println!("  pm10:  {} μg/m³", c.pm10);
    println!("  nh3:   {} μg/m³", c.nh3);
}

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use inquire::{Password, PasswordDisplayMode, Text};
use weather_core::{
    AggregationError, Config, Location, WeatherPanel, fetch_weather, provider_from_config,
};

use crate::{render, watch};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "CWA weather dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the API key and default location.
    Configure,

    /// Fetch once and print the dashboard panel.
    Show {
        #[command(flatten)]
        location: LocationArgs,

        /// Print the merged record as JSON instead of the panel.
        #[arg(long)]
        json: bool,
    },

    /// Interactive dashboard: Enter refreshes, `q` quits.
    Watch {
        #[command(flatten)]
        location: LocationArgs,
    },
}

/// Per-invocation overrides of the configured location.
#[derive(Debug, Args)]
pub struct LocationArgs {
    /// Observation station name, e.g. "臺北".
    #[arg(long)]
    pub station: Option<String>,

    /// County or city name for the forecast, e.g. "臺北市".
    #[arg(long)]
    pub county: Option<String>,
}

impl LocationArgs {
    fn resolve(self, configured: &Location) -> Location {
        Location {
            station: self.station.unwrap_or_else(|| configured.station.clone()),
            county: self.county.unwrap_or_else(|| configured.county.clone()),
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { location, json } => {
                let config = Config::load()?;
                let provider = provider_from_config(&config)?;
                let location = location.resolve(&config.location);

                let record = until_interrupted(
                    fetch_weather(provider.as_ref(), &location),
                    tokio::signal::ctrl_c(),
                )
                .await?;

                if json {
                    println!("{}", serde_json::to_string_pretty(&record)?);
                } else {
                    render::print_panel(&WeatherPanel::from(&record));
                }
                Ok(())
            }
            Command::Watch { location } => {
                let config = Config::load()?;
                let provider = provider_from_config(&config)?;
                let location = location.resolve(&config.location);

                watch::run(provider.as_ref(), &location).await
            }
        }
    }
}

/// Runs `work` unless `interrupt` resolves first; dropping `work` cancels its requests.
async fn until_interrupted<T>(
    work: impl Future<Output = Result<T, AggregationError>>,
    interrupt: impl Future,
) -> anyhow::Result<T> {
    tokio::select! {
        result = work => Ok(result?),
        _ = interrupt => anyhow::bail!("Interrupted; in-flight requests dropped"),
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("CWA open-data API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    let station = Text::new("Observation station:")
        .with_default(&config.location.station)
        .prompt()
        .context("Failed to read station")?;

    let county = Text::new("Forecast county/city:")
        .with_default(&config.location.county)
        .prompt()
        .context("Failed to read county")?;

    config.set_api_key(api_key);
    config.location = Location { station, county };

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());

    Ok(())
}

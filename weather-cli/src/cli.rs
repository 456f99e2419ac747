use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use weather_dashboard_core::{
    Coordinates, CredentialPrompt, CredentialResolver, DashboardConfig, DashboardController,
    FileStore, KeyValueStore, OpenWeatherClient,
};

use crate::host::{InquirePrompt, StaticGeolocator, TerminalRenderer};

type Dashboard = DashboardController<OpenWeatherClient, TerminalRenderer>;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-dashboard", version, about = "Current weather and a short forecast")]
pub struct Cli {
    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Enter and save an OpenWeatherMap API key.
    Configure,

    /// Show weather for a city (the configured default if omitted).
    Show { city: Option<String> },

    /// Show weather for a position.
    Locate {
        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,
    },

    /// Keep refreshing until interrupted.
    Watch {
        city: Option<String>,

        /// Refresh interval in minutes (overrides the config file).
        #[arg(long)]
        every: Option<u64>,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config_path = match &self.config {
            Some(path) => path.clone(),
            None => DashboardConfig::config_file_path()?,
        };
        let config = DashboardConfig::load_from(&config_path)?;
        let store: Arc<dyn KeyValueStore> =
            Arc::new(FileStore::new(store_path(self.config.as_deref())?));
        let resolver =
            CredentialResolver::new(&config, store).with_prompt(Box::new(InquirePrompt));

        match self.command {
            Command::Configure => {
                let Some(candidate) = InquirePrompt.prompt() else {
                    println!("Cancelled. The dashboard will run in demo mode.");
                    return Ok(());
                };
                match resolver.accept(&candidate) {
                    Some(_) => {
                        if !config_path.exists() {
                            config.save_to(&config_path)?;
                            info!(path = %config_path.display(), "Wrote default settings");
                        }
                        println!("API key saved.");
                    }
                    None => println!(
                        "That key looks too short (need at least {} characters). Nothing saved.",
                        config.min_credential_len
                    ),
                }
            }
            Command::Show { city } => {
                let dashboard = build_dashboard(&config, &resolver)?;
                show(&dashboard, city.as_deref()).await;
            }
            Command::Locate { lat, lon } => {
                let dashboard = build_dashboard(&config, &resolver)?;
                let position = lat.zip(lon).map(|(lat, lon)| Coordinates::new(lat, lon));
                dashboard.use_geolocation(&StaticGeolocator(position)).await;
            }
            Command::Watch { city, every } => {
                let dashboard = build_dashboard(&config, &resolver)?;
                let minutes = every.unwrap_or(config.refresh_interval_minutes).max(1);
                watch(&dashboard, city.as_deref(), Duration::from_secs(minutes * 60)).await?;
            }
        }

        Ok(())
    }
}

/// The credential store sits next to the config file in use.
fn store_path(config: Option<&Path>) -> anyhow::Result<PathBuf> {
    match config {
        Some(path) => Ok(path.with_file_name("store.toml")),
        None => DashboardConfig::store_file_path(),
    }
}

fn build_dashboard(
    config: &DashboardConfig,
    resolver: &CredentialResolver,
) -> anyhow::Result<Dashboard> {
    let credential = resolver.resolve();
    let client = OpenWeatherClient::new(config).context("Failed to build HTTP client")?;
    Ok(DashboardController::new(client, TerminalRenderer, config, credential))
}

async fn show(dashboard: &Dashboard, city: Option<&str>) {
    match city {
        Some(city) if !city.trim().is_empty() => {
            dashboard.search(city).await;
        }
        _ => {
            dashboard.start().await;
        }
    }
}

async fn watch(dashboard: &Dashboard, city: Option<&str>, every: Duration) -> anyhow::Result<()> {
    show(dashboard, city).await;

    let mut ticker = tokio::time::interval(every);
    // the first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                dashboard.refresh().await;
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                info!("Stopping refresh loop");
                return Ok(());
            }
        }
    }
}

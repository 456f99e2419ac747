//! Terminal stand-ins for the page environment: prompt, position source and
//! renderer.

use async_trait::async_trait;
use chrono::{DateTime, Local};
use inquire::{Password, PasswordDisplayMode};
use weather_dashboard_core::{
    Coordinates, CredentialPrompt, CurrentSlots, ForecastCard, GeolocationError, Geolocator,
    Notice, NoticeLevel, RenderTarget,
};

/// Asks for the key on the terminal. Esc or Ctrl-C cancels into demo mode.
#[derive(Debug, Default)]
pub struct InquirePrompt;

impl CredentialPrompt for InquirePrompt {
    fn prompt(&self) -> Option<String> {
        Password::new("OpenWeatherMap API key:")
            .without_confirmation()
            .with_display_mode(PasswordDisplayMode::Masked)
            .with_help_message(
                "Get a free key from https://openweathermap.org/api, or press Esc for demo mode",
            )
            .prompt()
            .ok()
    }
}

/// Position given on the command line. Without one the device has no fix.
#[derive(Debug, Clone, Copy)]
pub struct StaticGeolocator(pub Option<Coordinates>);

#[async_trait]
impl Geolocator for StaticGeolocator {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        self.0.ok_or(GeolocationError::Unavailable)
    }
}

#[derive(Debug, Default)]
pub struct TerminalRenderer;

impl RenderTarget for TerminalRenderer {
    fn show_current(&mut self, slots: &CurrentSlots) {
        println!();
        println!("{}", slots.city);
        println!("  {}  {} ({})", slots.temperature, slots.description, slots.icon.icon);
        println!("  Feels like {}", slots.feels_like);
        println!("  Humidity {}  Wind {}  Pressure {}", slots.humidity, slots.wind, slots.pressure);
    }

    fn show_forecast(&mut self, cards: &[ForecastCard]) {
        println!();
        for card in cards {
            println!(
                "  {:<12} {:>6}  {} ({})",
                card.label, card.temperature, card.description, card.icon.icon
            );
        }
    }

    fn show_last_updated(&mut self, at: DateTime<Local>) {
        println!();
        println!("Last updated {}", at.format("%H:%M:%S"));
    }

    fn notify(&mut self, notice: &Notice) {
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Error => "error",
        };
        eprintln!("[{tag}] {}", notice.text);
    }
}

//! Display slots the controller writes into. The render target never
//! feeds anything back.

use std::time::Duration;

use chrono::{DateTime, Local};

use crate::{
    model::{ForecastEntry, Units, WeatherSnapshot},
    visual::{IconVisual, background_for, icon_visual},
};

/// How long a notice stays up before it dismisses itself.
pub const NOTICE_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Non-fatal, auto-dismissing status message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    pub dismiss_after: Duration,
}

impl Notice {
    pub fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
            dismiss_after: NOTICE_TTL,
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Info, text)
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Success, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, text)
    }
}

/// Formatted current-conditions slots.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentSlots {
    pub city: String,
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind: String,
    pub pressure: String,
    pub description: String,
    pub icon: IconVisual,
    pub background: &'static str,
}

impl CurrentSlots {
    pub fn from_snapshot(snapshot: &WeatherSnapshot, units: Units) -> Self {
        let suffix = units.temperature_suffix();
        Self {
            city: snapshot.location.clone(),
            temperature: format!("{}{suffix}", snapshot.temperature),
            feels_like: format!("{}{suffix}", snapshot.feels_like),
            humidity: format!("{}%", snapshot.humidity),
            wind: format!("{} km/h", snapshot.wind_kmh),
            pressure: format!("{} hPa", snapshot.pressure_hpa),
            description: snapshot.description.clone(),
            icon: icon_visual(&snapshot.icon),
            background: background_for(snapshot.category),
        }
    }
}

/// One forecast card.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastCard {
    pub label: String,
    pub icon: IconVisual,
    pub temperature: String,
    pub description: String,
}

impl ForecastCard {
    pub fn from_entry(entry: &ForecastEntry, units: Units) -> Self {
        Self {
            label: entry.label.clone(),
            icon: icon_visual(&entry.icon),
            temperature: format!("{}{}", entry.temperature, units.temperature_suffix()),
            description: entry.description.clone(),
        }
    }
}

pub trait RenderTarget: Send {
    fn show_current(&mut self, slots: &CurrentSlots);
    fn show_forecast(&mut self, cards: &[ForecastCard]);
    fn show_last_updated(&mut self, at: DateTime<Local>);
    fn notify(&mut self, notice: &Notice);
}
